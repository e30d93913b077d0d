use crate::platform::{PlatformClient, PlatformError};
use crate::spec::ResourceSpec;
use async_trait::async_trait;
use std::sync::Mutex;

/// Replays scripted responses and records every call as `"<op>:<id>"`
pub struct FakeClient {
    update: Result<(), PlatformError>,
    create: Result<(), PlatformError>,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeClient {
    fn default() -> Self {
        FakeClient {
            update: Ok(()),
            create: Ok(()),
            calls: Mutex::new(vec![]),
        }
    }
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_update(mut self, result: Result<(), PlatformError>) -> Self {
        self.update = result;
        self
    }

    pub fn on_create(mut self, result: Result<(), PlatformError>) -> Self {
        self.create = result;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl PlatformClient for FakeClient {
    fn name(&self) -> &str {
        "fake"
    }

    async fn update(&self, id: &str, _spec: &ResourceSpec) -> Result<(), PlatformError> {
        self.record(format!("update:{id}"));
        self.update.clone()
    }

    async fn create(&self, spec: &ResourceSpec) -> Result<(), PlatformError> {
        self.record(format!("create:{}", spec.id));
        self.create.clone()
    }
}
