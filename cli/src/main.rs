mod commands;
mod config;
mod credentials;
mod error;
mod logger;
mod platform;
mod runner;
use crate::commands::Commands;
use crate::logger::Logger;
use crate::runner::{Runnable, Runner};
use clap::Parser;

#[derive(Parser)]
#[command(
    arg_required_else_help = true,
    name = "fnpush",
    version,
    about = "Push prebuilt function packages to AWS Lambda or Google Cloud Functions",
    long_about = "Updates each function in place if it already exists on the platform, creates it otherwise."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Derive a runner from the command and run it
async fn run(command: impl Runnable) {
    if let Err(err) = command.runner().run().await {
        err.exit()
    }
}

#[tokio::main]
async fn main() {
    Logger::init();

    // Match all commands here, in one place
    match Cli::parse().command {
        Commands::Deploy(cmd) => run(cmd).await,
    }
}
