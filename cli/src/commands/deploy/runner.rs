use super::pipeline::Pipeline;
use crate::commands::deploy::DeployCommand;
use crate::error::Error;
use crate::runner::Runner;
use eyre::Context;

pub(crate) struct DeployRunner {
    pub(crate) command: DeployCommand,
}

impl Runner for DeployRunner {
    /// Deploy requested functions to the selected platform
    async fn run(&mut self) -> Result<(), Error> {
        let config = self.config(self.command.config.as_deref())?;
        let functions = config.select(&self.command.functions)?;

        let client = self
            .command
            .provider
            .client(&config)
            .await
            .wrap_err("Failed to set up the platform client")?;

        Pipeline::builder()
            .set_max_concurrent(self.command.max_concurrency)
            .set_client(client)
            .build()
            .wrap_err("Failed to build pipeline")?
            .run(functions)
            .await?;

        Ok(())
    }
}
