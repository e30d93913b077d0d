pub(crate) mod aws;
pub(crate) mod gcp;

use crate::config::{build_config, FileConfig};
use crate::credentials::Credentials;
use crate::error::Error;
use fnpush_deployer::PlatformClient;
use std::sync::Arc;

/// Supported cloud function platforms
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Provider {
    /// AWS Lambda
    Aws,

    /// Google Cloud Functions
    Gcp,
}

impl Provider {
    /// Authenticated client for the provider, configured from fnpush.toml
    pub(crate) async fn client(&self, config: &FileConfig) -> eyre::Result<Arc<dyn PlatformClient>> {
        let client: Arc<dyn PlatformClient> = match self {
            Provider::Aws => {
                let region = config.aws.as_ref().and_then(|aws| aws.region.as_deref());
                Arc::new(aws::LambdaClient::new(region).await)
            }

            Provider::Gcp => {
                let gcp = config.gcp.as_ref().ok_or(Error::new(
                    "Missing [gcp] section",
                    Some("Add the project name under [gcp] in the config."),
                ))?;

                let credentials = Credentials::new(gcp.token_file.as_deref())?;

                let api_base = gcp
                    .api_base
                    .as_deref()
                    .unwrap_or(build_config().gcp_api_base);

                Arc::new(
                    gcp::CloudFunctionsClient::new(&credentials.token, &gcp.project, &gcp.region)
                        .with_api_base(api_base),
                )
            }
        };

        Ok(client)
    }
}
