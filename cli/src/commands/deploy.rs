mod pipeline;
mod progress;
mod runner;
use crate::platform::Provider;
use crate::runner::{Runnable, Runner};
use runner::DeployRunner;
use std::path::PathBuf;

#[derive(clap::Args, Clone)]
pub(crate) struct DeployCommand {
    /// Target platform
    #[arg(short, long, value_enum)]
    provider: Provider,

    /// Path to the deployment config, fnpush.toml in the current dir by default
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum number of parallel deployments
    #[arg(short, long, default_value_t = 3)]
    max_concurrency: usize,

    /// The set of function ids to deploy, comma separated
    #[arg(value_delimiter = ',')]
    functions: Vec<String>,
}

impl Runnable for DeployCommand {
    fn runner(&self) -> impl Runner {
        DeployRunner {
            command: self.clone(),
        }
    }
}
