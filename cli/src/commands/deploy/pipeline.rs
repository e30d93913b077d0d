use super::progress::{PipelineProgress, ProgressStatus};
use eyre::{eyre, OptionExt};
use fnpush_deployer::{deploy, PlatformClient, ResourceSpec};
use futures::future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// Deploys a set of functions concurrently, one upsert per function
pub struct Pipeline {
    client: Arc<dyn PlatformClient>,
    max_concurrent: usize,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub async fn run(self, functions: Vec<ResourceSpec>) -> eyre::Result<()> {
        let start_time = Instant::now();
        let pipeline_progress = PipelineProgress::new(functions.len() as u64);

        // Define maximum number of parallel deployments
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        let handles = functions.into_iter().map(|spec| {
            let client = Arc::clone(&self.client);
            let sem = Arc::clone(&semaphore);
            let pipeline_progress = pipeline_progress.clone();

            tokio::spawn(async move {
                let _permit = sem.acquire().await?;
                let progress = pipeline_progress.new_progress(&spec.id);
                progress.log_stage("Deploying");

                let result = deploy(client.as_ref(), &spec).await;
                pipeline_progress.total_progress_bar.inc(1);

                match result {
                    Ok(outcome) => {
                        progress.finish(&outcome.to_string(), ProgressStatus::Success, None);
                        eyre::Ok(())
                    }

                    Err(err) => {
                        progress.finish("Failed", ProgressStatus::Error, Some(&err.to_string()));
                        Err(eyre::Report::new(err)
                            .wrap_err(format!("Failed to deploy function: \"{}\"", spec.id)))
                    }
                }
            })
        });

        let results: Vec<eyre::Result<()>> = future::join_all(handles)
            .await
            .into_iter()
            .map(|res| res.map_err(eyre::Report::msg).and_then(|inner| inner))
            .collect();

        pipeline_progress.total_progress_bar.finish_and_clear();

        let total = results.len();
        let errors: Vec<_> = results.into_iter().filter_map(Result::err).collect();

        if !errors.is_empty() {
            log::error!("Failed to deploy functions: {errors:?}");

            return Err(eyre!(
                "Failed to deploy {} of {total} function(s) to {}",
                errors.len(),
                self.client.name(),
            ));
        }

        println!(
            "    {} {total} function(s) deployed to {} in {:.2}s",
            console::style("Finished").green().bold(),
            self.client.name(),
            start_time.elapsed().as_secs_f64(),
        );

        Ok(())
    }
}

#[derive(Default)]
pub struct PipelineBuilder {
    client: Option<Arc<dyn PlatformClient>>,
    max_concurrent: Option<usize>,
}

impl PipelineBuilder {
    pub fn build(self) -> eyre::Result<Pipeline> {
        Ok(Pipeline {
            client: self.client.ok_or_eyre("No platform client provided to the pipeline")?,

            // Zero permits would block forever
            max_concurrent: self.max_concurrent.unwrap_or(3).max(1),
        })
    }

    pub fn set_client(mut self, client: Arc<dyn PlatformClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn set_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = Some(max_concurrent);
        self
    }
}
