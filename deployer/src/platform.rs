use crate::spec::ResourceSpec;
use async_trait::async_trait;

/// Failure reported by a platform client
///
/// Clients translate vendor error codes into these two cases.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// The function does not exist on the platform
    #[error("resource not found")]
    NotFound,

    /// Any other failure: auth, quota, malformed request, transport, timeout
    #[error("{0}")]
    Other(String),
}

/// Already authenticated access to a cloud function platform
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Short platform name used in logs
    fn name(&self) -> &str;

    /// Refresh an existing function in place
    async fn update(&self, id: &str, spec: &ResourceSpec) -> Result<(), PlatformError>;

    async fn create(&self, spec: &ResourceSpec) -> Result<(), PlatformError>;
}
