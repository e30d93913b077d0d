use crate::config::build_config;
use async_trait::async_trait;
use fnpush_deployer::{PlatformClient, PlatformError, ResourceSpec};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Google Cloud Functions v1 REST API
pub(crate) struct CloudFunctionsClient {
    client: reqwest::Client,
    api_base: String,
    access_token: String,
    project: String,
    region: String,
}

/// Where Cloud Functions takes the code from
#[derive(Debug, PartialEq)]
enum Source {
    /// gs://bucket/object
    ArchiveUrl(String),

    /// Signed URL the local zip was uploaded to
    UploadUrl(String),
}

/// How a 404 from the API is reported
#[derive(Clone, Copy, PartialEq)]
enum NotFound {
    /// The request addressed the function itself, so 404 means it does not exist
    Function,

    /// Any other resource, e.g. a missing project or location
    Failure,
}

/// Spec extras meant for AWS Lambda, not valid CloudFunction fields
const LAMBDA_FIELDS: [&str; 4] = ["role", "publish", "memory_size", "environment"];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateUploadUrlResponse {
    upload_url: String,
}

impl CloudFunctionsClient {
    pub(crate) fn new(access_token: &str, project: &str, region: &str) -> Self {
        CloudFunctionsClient {
            client: reqwest::Client::new(),
            api_base: build_config().gcp_api_base.to_string(),
            access_token: access_token.to_string(),
            project: project.to_string(),
            region: region.to_string(),
        }
    }

    pub(crate) fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn location(&self) -> String {
        format!("projects/{}/locations/{}", self.project, self.region)
    }

    fn function_name(&self, id: &str) -> String {
        format!("{}/functions/{id}", self.location())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base)
    }

    /// Send an authorized request and parse the JSON response
    async fn send(
        &self,
        request: RequestBuilder,
        path: &str,
        not_found: NotFound,
    ) -> Result<Value, PlatformError> {
        let result = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .inspect_err(|err| log::error!("{err:?}"))
            .map_err(|err| PlatformError::Other(format!("Request to {path} failed: {err}")))?;

        let status = result.status();

        let text = result
            .text()
            .await
            .map_err(|err| PlatformError::Other(format!("Failed to read response: {err}")))?;

        log::debug!("Got status from {path}: {status}");
        log::debug!("Got response from {path}: {text}");

        if !status.is_success() {
            return Err(status_error(status, &text, not_found));
        }

        serde_json::from_str(&text)
            .map_err(|err| PlatformError::Other(format!("Could not parse response: {err}")))
    }

    /// Resolve the artifact, uploading a local zip to a signed URL first
    async fn source(&self, artifact: &str) -> Result<Source, PlatformError> {
        if artifact.starts_with("gs://") {
            return Ok(Source::ArchiveUrl(artifact.to_string()));
        }

        let bytes = tokio::fs::read(artifact)
            .await
            .map_err(|err| PlatformError::Other(format!("Failed to read {artifact}: {err}")))?;

        let path = format!("{}/functions:generateUploadUrl", self.location());

        let response: GenerateUploadUrlResponse = serde_json::from_value(
            self.send(
                self.client.post(self.url(&path)).json(&json!({})),
                &path,
                NotFound::Failure,
            )
            .await?,
        )
        .map_err(|err| PlatformError::Other(format!("No upload URL in response: {err}")))?;

        log::info!("Uploading {artifact} ({} bytes)", bytes.len());

        self.client
            .put(&response.upload_url)
            .header("content-type", "application/zip")
            .header(
                "x-goog-content-length-range",
                format!("0,{}", build_config().gcp_upload_limit),
            )
            .body(bytes)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|err| PlatformError::Other(format!("Failed to upload {artifact}: {err}")))?;

        Ok(Source::UploadUrl(response.upload_url))
    }
}

/// Full CloudFunction resource for create and patch requests
fn request_body(name: &str, spec: &ResourceSpec, source: &Source) -> Value {
    let mut body = Map::new();
    body.insert("name".into(), json!(name));

    if !spec.entry_point.is_empty() {
        body.insert("entryPoint".into(), json!(spec.entry_point));
    }

    if !spec.runtime.is_empty() {
        body.insert("runtime".into(), json!(spec.runtime));
    }

    match source {
        Source::ArchiveUrl(url) => body.insert("sourceArchiveUrl".into(), json!(url)),
        Source::UploadUrl(url) => body.insert("sourceUploadUrl".into(), json!(url)),
    };

    // HTTP function unless the spec says otherwise
    if !spec.extra.contains_key("eventTrigger") && !spec.extra.contains_key("httpsTrigger") {
        body.insert("httpsTrigger".into(), json!({}));
    }

    for (key, value) in &spec.extra {
        if LAMBDA_FIELDS.contains(&key.as_str()) {
            log::debug!("Skipping Lambda field \"{key}\" for Cloud Functions");
            continue;
        }

        body.insert(key.clone(), value.clone());
    }

    Value::Object(body)
}

/// Fields to patch, triggers can not be changed on an existing function
fn update_mask(body: &Value) -> String {
    body.as_object()
        .map(|fields| {
            fields
                .keys()
                .filter(|k| !matches!(k.as_str(), "name" | "httpsTrigger" | "eventTrigger"))
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_default()
}

fn status_error(status: StatusCode, text: &str, not_found: NotFound) -> PlatformError {
    if status == StatusCode::NOT_FOUND && not_found == NotFound::Function {
        return PlatformError::NotFound;
    }

    // Google APIs wrap the details in {"error": {"message": ...}}
    let message = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| text.to_string());

    PlatformError::Other(format!("{status}: {message}"))
}

#[async_trait]
impl PlatformClient for CloudFunctionsClient {
    fn name(&self) -> &str {
        "gcp"
    }

    async fn update(&self, id: &str, spec: &ResourceSpec) -> Result<(), PlatformError> {
        let name = self.function_name(id);
        let source = self.source(&spec.artifact).await?;
        let body = request_body(&name, spec, &source);

        let operation = self
            .send(
                self.client
                    .patch(format!("{}?updateMask={}", self.url(&name), update_mask(&body)))
                    .json(&body),
                &name,
                NotFound::Function,
            )
            .await?;

        log::info!("Started operation {}", operation["name"]);
        Ok(())
    }

    async fn create(&self, spec: &ResourceSpec) -> Result<(), PlatformError> {
        let path = format!("{}/functions", self.location());
        let source = self.source(&spec.artifact).await?;
        let body = request_body(&self.function_name(&spec.id), spec, &source);

        let operation = self
            .send(
                self.client.post(self.url(&path)).json(&body),
                &path,
                NotFound::Failure,
            )
            .await?;

        log::info!("Started operation {}", operation["name"]);
        Ok(())
    }
}
