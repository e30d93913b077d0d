use crate::deploy::DeployError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Desired state of a deployed function
///
/// Built by the caller before deployment and never mutated by the deployer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Function name, unique within a platform and its scope (region, project)
    pub id: String,

    /// Packaged code: a local path, or a bucket URI understood by the platform
    pub artifact: String,

    #[serde(default)]
    pub entry_point: String,

    #[serde(default)]
    pub runtime: String,

    /// Platform-specific fields, e.g. the execution role for Lambda
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ResourceSpec {
    pub fn new(id: &str, artifact: &str) -> Self {
        ResourceSpec {
            id: id.to_string(),
            artifact: artifact.to_string(),
            ..Default::default()
        }
    }

    pub fn with_entry_point(mut self, entry_point: &str) -> Self {
        self.entry_point = entry_point.to_string();
        self
    }

    pub fn with_runtime(mut self, runtime: &str) -> Self {
        self.runtime = runtime.to_string();
        self
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// String value of an extra field, if it is present and is a string
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|value| value.as_str())
    }

    /// Check the fields required before any platform call
    pub fn validate(&self) -> Result<(), DeployError> {
        if self.id.trim().is_empty() {
            return Err(DeployError::InvalidSpec("identifier is empty".into()));
        }

        if self.artifact.trim().is_empty() {
            return Err(DeployError::InvalidSpec(format!(
                "artifact location is empty for \"{}\"",
                self.id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_spec_passes() {
        let spec = ResourceSpec::new("fn-1", "pkg.zip");
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn empty_identifier_is_rejected() {
        let spec = ResourceSpec::new("", "pkg.zip");
        assert!(matches!(spec.validate(), Err(DeployError::InvalidSpec(_))));
    }

    #[test]
    fn blank_artifact_is_rejected() {
        let spec = ResourceSpec::new("fn-1", "   ");
        assert!(matches!(spec.validate(), Err(DeployError::InvalidSpec(_))));
    }

    #[test]
    fn extras_are_sorted_by_key() {
        let spec = ResourceSpec::new("fn-1", "pkg.zip")
            .with_extra("timeout", 30)
            .with_extra("role", "arn:aws:iam::1:role/exec");

        assert_eq!(spec.extra_str("role"), Some("arn:aws:iam::1:role/exec"));
        assert_eq!(spec.extra_str("timeout"), None);
        assert_eq!(
            spec.extra.keys().collect::<Vec<_>>(),
            vec!["role", "timeout"]
        );
    }

    #[test]
    fn deserializes_from_toml() {
        let spec: ResourceSpec = toml::from_str(
            r#"
            id = "fn-1"
            artifact = "dist/fn-1.zip"
            entry_point = "index.handler"
            runtime = "nodejs20.x"

            [extra]
            role = "arn:aws:iam::1:role/exec"
            memory_size = 256
            "#,
        )
        .unwrap();

        assert_eq!(spec.entry_point, "index.handler");
        assert_eq!(spec.extra.get("memory_size"), Some(&serde_json::json!(256)));
    }
}
