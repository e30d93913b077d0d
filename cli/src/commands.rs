pub mod deploy;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Create or update functions on a cloud platform
    Deploy(deploy::DeployCommand),
}
