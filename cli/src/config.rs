use eyre::{eyre, WrapErr};
use fnpush_deployer::ResourceSpec;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Defaults baked in at build time
pub(crate) struct BuildConfig<'a> {
    /// Deployment config looked up in the current dir
    pub(crate) config_file: &'a str,

    /// Env var holding a GCP OAuth access token
    pub(crate) gcp_token_env: &'a str,

    pub(crate) gcp_api_base: &'a str,
    pub(crate) gcp_default_region: &'a str,

    /// Max size of a zip uploaded to Cloud Functions, in bytes
    pub(crate) gcp_upload_limit: u64,
}

static CONFIG: OnceLock<BuildConfig> = OnceLock::new();

pub(crate) fn build_config() -> &'static BuildConfig<'static> {
    CONFIG.get_or_init(|| BuildConfig {
        config_file: option_env!("FNPUSH_CONFIG_FILE").unwrap_or("fnpush.toml"),
        gcp_token_env: option_env!("FNPUSH_GCP_TOKEN_ENV").unwrap_or("FNPUSH_GCP_ACCESS_TOKEN"),
        gcp_api_base: option_env!("FNPUSH_GCP_API_BASE")
            .unwrap_or("https://cloudfunctions.googleapis.com/v1"),
        gcp_default_region: "us-central1",
        gcp_upload_limit: 104_857_600,
    })
}

/// [aws]
/// region = "us-east-1"
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AwsSection {
    /// Falls back to the region of the AWS profile
    pub(crate) region: Option<String>,
}

/// [gcp]
/// project = "my-project"
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GcpSection {
    pub(crate) project: String,

    #[serde(default = "default_gcp_region")]
    pub(crate) region: String,

    /// File with an OAuth access token, used when the env var is not set
    pub(crate) token_file: Option<PathBuf>,

    /// Cloud Functions endpoint, the public API by default
    pub(crate) api_base: Option<String>,
}

fn default_gcp_region() -> String {
    build_config().gcp_default_region.to_string()
}

/// FileConfig is the structure of fnpush.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FileConfig {
    pub(crate) aws: Option<AwsSection>,
    pub(crate) gcp: Option<GcpSection>,

    /// [[function]]
    /// id = "fn-1"
    #[serde(default, rename = "function")]
    pub(crate) functions: Vec<ResourceSpec>,
}

impl FileConfig {
    pub(crate) fn from_path(path: &Path) -> eyre::Result<Self> {
        let toml_string = std::fs::read_to_string(path)
            .wrap_err(format!("Failed to read {}", path.display()))?;

        let mut config = Self::parse(&toml_string)
            .wrap_err(format!("Failed to parse {}", path.display()))?;

        // Local artifacts are relative to the config file, not to the cwd
        let base = path.parent().unwrap_or(Path::new(""));

        for function in config.functions.iter_mut() {
            function.artifact = resolve_artifact(base, &function.artifact);
        }

        if let Some(gcp) = config.gcp.as_mut() {
            gcp.token_file = gcp.token_file.as_ref().map(|file| base.join(file));
        }

        Ok(config)
    }

    pub(crate) fn parse(toml_string: &str) -> eyre::Result<Self> {
        Ok(toml::from_str(toml_string)?)
    }

    /// Functions to deploy, all of them if no ids requested
    pub(crate) fn select(&self, ids: &[String]) -> eyre::Result<Vec<ResourceSpec>> {
        let mut seen = HashSet::new();

        for function in &self.functions {
            if !seen.insert(function.id.as_str()) {
                return Err(eyre!("Function \"{}\" is declared more than once", function.id));
            }
        }

        if let Some(unknown) = ids.iter().find(|id| !seen.contains(id.as_str())) {
            return Err(eyre!("No function with id \"{unknown}\""));
        }

        let selected: Vec<ResourceSpec> = self
            .functions
            .iter()
            .filter(|f| ids.is_empty() || ids.contains(&f.id))
            .cloned()
            .collect();

        if selected.is_empty() {
            return Err(eyre!("No functions declared"));
        }

        Ok(selected)
    }
}

fn resolve_artifact(base: &Path, artifact: &str) -> String {
    if artifact.is_empty() || artifact.contains("://") || Path::new(artifact).is_absolute() {
        return artifact.to_string();
    }

    base.join(artifact).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
        [aws]
        region = "eu-west-1"

        [gcp]
        project = "demo"

        [[function]]
        id = "fn-1"
        artifact = "dist/fn-1.zip"
        entry_point = "index.handler"
        runtime = "nodejs20.x"

        [function.extra]
        role = "arn:aws:iam::1:role/exec"

        [[function]]
        id = "fn-2"
        artifact = "gs://builds/fn-2.zip"
    "#;

    #[test]
    fn parses_sections_and_functions() {
        let config = FileConfig::parse(CONFIG).unwrap();

        assert_eq!(config.aws.unwrap().region.as_deref(), Some("eu-west-1"));
        let gcp = config.gcp.unwrap();
        assert_eq!(gcp.project, "demo");
        assert_eq!(gcp.region, "us-central1");
        assert_eq!(gcp.api_base, None);
        assert_eq!(config.functions.len(), 2);
        assert_eq!(
            config.functions[0].extra_str("role"),
            Some("arn:aws:iam::1:role/exec")
        );
    }

    #[test]
    fn selects_all_functions_by_default() {
        let config = FileConfig::parse(CONFIG).unwrap();
        assert_eq!(config.select(&[]).unwrap().len(), 2);
    }

    #[test]
    fn selects_requested_functions() {
        let config = FileConfig::parse(CONFIG).unwrap();
        let selected = config.select(&["fn-2".to_string()]).unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "fn-2");
    }

    #[test]
    fn unknown_function_is_an_error() {
        let config = FileConfig::parse(CONFIG).unwrap();
        assert!(config.select(&["nope".to_string()]).is_err());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let config = FileConfig::parse(
            r#"
            [[function]]
            id = "fn-1"
            artifact = "a.zip"

            [[function]]
            id = "fn-1"
            artifact = "b.zip"
            "#,
        )
        .unwrap();

        assert!(config.select(&[]).is_err());
    }

    #[test]
    fn empty_config_has_nothing_to_deploy() {
        let config = FileConfig::parse("").unwrap();
        assert!(config.select(&[]).is_err());
    }

    #[test]
    fn local_artifacts_are_relative_to_config() {
        let base = Path::new("/work/project");

        assert_eq!(
            resolve_artifact(base, "dist/fn.zip"),
            "/work/project/dist/fn.zip"
        );
        assert_eq!(resolve_artifact(base, "s3://b/k.zip"), "s3://b/k.zip");
        assert_eq!(resolve_artifact(base, "/abs/fn.zip"), "/abs/fn.zip");
        assert_eq!(resolve_artifact(base, ""), "");
    }
}
