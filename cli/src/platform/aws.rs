use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_lambda::error::{DisplayErrorContext, SdkError};
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{Environment, FunctionCode, Runtime};
use aws_sdk_lambda::Client;
use fnpush_deployer::{PlatformClient, PlatformError, ResourceSpec};
use serde::Deserialize;
use std::collections::HashMap;

/// AWS Lambda, authenticated with the default credentials chain
pub(crate) struct LambdaClient {
    client: Client,
}

impl LambdaClient {
    pub(crate) async fn new(region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }

        LambdaClient {
            client: Client::new(&loader.load().await),
        }
    }
}

/// Where the function code comes from
#[derive(Debug, PartialEq)]
enum Code {
    Zip(Vec<u8>),
    S3 { bucket: String, key: String },
}

impl Code {
    async fn load(artifact: &str) -> Result<Self, PlatformError> {
        if artifact.starts_with("s3://") {
            let (bucket, key) = parse_s3_uri(artifact)?;
            return Ok(Code::S3 { bucket, key });
        }

        tokio::fs::read(artifact)
            .await
            .map(Code::Zip)
            .map_err(|err| PlatformError::Other(format!("Failed to read {artifact}: {err}")))
    }
}

fn parse_s3_uri(uri: &str) -> Result<(String, String), PlatformError> {
    uri.strip_prefix("s3://")
        .and_then(|path| path.split_once('/'))
        .filter(|(bucket, key)| !bucket.is_empty() && !key.is_empty())
        .map(|(bucket, key)| (bucket.to_string(), key.to_string()))
        .ok_or_else(|| PlatformError::Other(format!("Malformed S3 URI: {uri}")))
}

/// Lambda specific fields of the spec, unknown keys are ignored
#[derive(Debug, Deserialize, PartialEq)]
struct Extras {
    role: Option<String>,

    #[serde(default = "default_publish")]
    publish: bool,

    /// Seconds
    timeout: Option<i32>,

    /// MB
    memory_size: Option<i32>,

    description: Option<String>,

    #[serde(default)]
    environment: HashMap<String, String>,
}

fn default_publish() -> bool {
    true
}

impl Extras {
    fn from_spec(spec: &ResourceSpec) -> Result<Self, PlatformError> {
        let extra = serde_json::Value::Object(spec.extra.clone().into_iter().collect());

        serde_json::from_value(extra).map_err(|err| {
            PlatformError::Other(format!("Invalid Lambda fields for \"{}\": {err}", spec.id))
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

/// Keep the full chain of the SDK error, its Display is just "service error"
fn other<E, R>(err: SdkError<E, R>) -> PlatformError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    PlatformError::Other(DisplayErrorContext(&err).to_string())
}

#[async_trait]
impl PlatformClient for LambdaClient {
    fn name(&self) -> &str {
        "aws"
    }

    /// Replace the code only, configuration stays as is
    async fn update(&self, id: &str, spec: &ResourceSpec) -> Result<(), PlatformError> {
        let extras = Extras::from_spec(spec)?;

        let request = self
            .client
            .update_function_code()
            .function_name(id)
            .publish(extras.publish);

        let request = match Code::load(&spec.artifact).await? {
            Code::Zip(bytes) => request.zip_file(Blob::new(bytes)),
            Code::S3 { bucket, key } => request.s3_bucket(bucket).s3_key(key),
        };

        let response = request.send().await.map_err(|err| {
            if err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception())
            {
                PlatformError::NotFound
            } else {
                other(err)
            }
        })?;

        log::debug!(
            "Lambda {id} updated to version {}",
            response.version().unwrap_or("$LATEST")
        );

        Ok(())
    }

    async fn create(&self, spec: &ResourceSpec) -> Result<(), PlatformError> {
        let extras = Extras::from_spec(spec)?;

        let role = extras.role.ok_or_else(|| {
            PlatformError::Other(format!(
                "The \"role\" field is required to create Lambda \"{}\"",
                spec.id
            ))
        })?;

        let code = match Code::load(&spec.artifact).await? {
            Code::Zip(bytes) => FunctionCode::builder().zip_file(Blob::new(bytes)).build(),
            Code::S3 { bucket, key } => FunctionCode::builder().s3_bucket(bucket).s3_key(key).build(),
        };

        let environment = (!extras.environment.is_empty()).then(|| {
            Environment::builder()
                .set_variables(Some(extras.environment))
                .build()
        });

        let response = self
            .client
            .create_function()
            .function_name(&spec.id)
            .role(role)
            .code(code)
            .publish(extras.publish)
            .set_handler(non_empty(&spec.entry_point))
            .set_runtime(non_empty(&spec.runtime).map(|r| Runtime::from(r.as_str())))
            .set_timeout(extras.timeout)
            .set_memory_size(extras.memory_size)
            .set_description(extras.description)
            .set_environment(environment)
            .send()
            .await
            .map_err(other)?;

        log::debug!(
            "Lambda {} created: {}",
            spec.id,
            response.function_arn().unwrap_or_default()
        );

        Ok(())
    }
}
