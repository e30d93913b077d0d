use crate::platform::{PlatformClient, PlatformError};
use crate::spec::ResourceSpec;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeployError {
    /// The spec failed local validation, nothing was sent to the platform
    #[error("invalid resource spec: {0}")]
    InvalidSpec(String),

    /// Platform failure, passed through unchanged
    #[error("{0}")]
    Other(String),
}

impl From<PlatformError> for DeployError {
    fn from(error: PlatformError) -> Self {
        // NotFound only means something to the update probe
        DeployError::Other(error.to_string())
    }
}

/// The branch through which the function got deployed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Created,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Outcome::Updated => write!(f, "Updated"),
            Outcome::Created => write!(f, "Created"),
        }
    }
}

/// Update the function if it exists, create it otherwise
///
/// The update call is the existence probe, so the common path is a single
/// round trip. Only `NotFound` on update leads to creation, any other error is
/// returned as is.
pub async fn deploy<C>(client: &C, spec: &ResourceSpec) -> Result<Outcome, DeployError>
where
    C: PlatformClient + ?Sized,
{
    spec.validate()?;
    log::debug!("Updating {} on {}", spec.id, client.name());

    match client.update(&spec.id, spec).await {
        Ok(()) => {
            log::info!("Updated {} on {}", spec.id, client.name());
            Ok(Outcome::Updated)
        }

        Err(PlatformError::NotFound) => {
            log::warn!(
                "{} does not exist on {}, creating it",
                spec.id,
                client.name()
            );

            client
                .create(spec)
                .await
                .inspect_err(|err| log::error!("Failed to create {}: {err}", spec.id))?;

            log::info!("Created {} on {}", spec.id, client.name());
            Ok(Outcome::Created)
        }

        Err(PlatformError::Other(detail)) => {
            log::error!("Failed to update {}: {detail}", spec.id);
            Err(DeployError::Other(detail))
        }
    }
}
