use crate::config::build_config;
use crate::error::Error;
use eyre::WrapErr;
use std::path::Path;

/// GCP access token used as a bearer token for the Cloud Functions API
///
/// Obtaining the token (e.g. `gcloud auth print-access-token`) happens outside.
pub(crate) struct Credentials {
    pub(crate) token: String,
}

impl Credentials {
    /// First checks environment variable, if not found, reads from file
    pub(crate) fn new(token_file: Option<&Path>) -> eyre::Result<Self> {
        let env_name = build_config().gcp_token_env;
        let token = std::env::var(env_name).unwrap_or_default();

        if !token.trim().is_empty() {
            log::info!("Using GCP token from env {env_name}");
            return Ok(Self::from_token(&token));
        }

        let missing = Error::new(
            "GCP access token not found",
            Some(&format!(
                "Set {env_name} or point [gcp].token_file to a file with the token."
            )),
        );

        let path = token_file.ok_or(missing.clone())?;
        log::info!("Using GCP token from {}", path.display());

        let token = std::fs::read_to_string(path).wrap_err(missing.clone())?;

        if token.trim().is_empty() {
            return Err(missing.into());
        }

        Ok(Self::from_token(&token))
    }

    fn from_token(token: &str) -> Self {
        Credentials {
            token: token.trim().to_string(),
        }
    }
}
