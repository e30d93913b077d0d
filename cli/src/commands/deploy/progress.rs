use crate::logger::Logger;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::{stdout, IsTerminal};

#[derive(Clone)]
pub(super) struct PipelineProgress {
    multi_progress: &'static MultiProgress,
    pub(super) total_progress_bar: ProgressBar,
}

impl PipelineProgress {
    pub(super) fn new(total_functions: u64) -> Self {
        let multi_progress = Logger::multi_progress();
        let total_progress_bar = multi_progress.add(ProgressBar::new(total_functions));

        total_progress_bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    format!(
                        "   {} [{{bar:30}}] {{pos}}/{{len}} {{wide_msg:.dim}}",
                        console::style("Deploying").cyan().bold()
                    )
                    .as_str(),
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        total_progress_bar.set_position(0);

        Self {
            multi_progress,
            total_progress_bar,
        }
    }

    pub(super) fn new_progress(&self, function_id: &str) -> Progress {
        Progress::new(self.multi_progress, &self.total_progress_bar, function_id)
    }
}

pub(super) struct Progress {
    progress_bar: ProgressBar,
    function_id: String,
}

pub(super) enum ProgressStatus {
    Success,
    Error,
}

impl Progress {
    fn new(
        multi_progress: &MultiProgress,
        total_progress_bar: &ProgressBar,
        function_id: &str,
    ) -> Self {
        let progress_bar =
            multi_progress.insert_before(total_progress_bar, ProgressBar::new_spinner());

        progress_bar.set_style(
            ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        Self {
            progress_bar,
            function_id: function_id.to_string(),
        }
    }

    pub(super) fn log_stage(&self, stage: &str) {
        let msg = format!(
            "{} {}",
            console::style(with_padding(stage)).green().bold(),
            self.function_id,
        );

        // Terminal or CI/CD?
        if stdout().is_terminal() {
            self.progress_bar.println(msg);
        } else {
            self.progress_bar.suspend(|| {
                println!("{msg}");
            });
        }
    }

    pub(super) fn finish(&self, stage: &str, status: ProgressStatus, message: Option<&str>) {
        let stage = console::style(with_padding(stage)).bold();

        let stage = match status {
            ProgressStatus::Success => stage.green(),
            ProgressStatus::Error => stage.red(),
        };

        let message = message.map(|m| format!(": {m}")).unwrap_or_default();

        self.progress_bar
            .finish_with_message(format!("{} {}{}", stage, self.function_id, message));
    }
}

// Right-aligned stage names in the cargo-like style
fn with_padding(message: &str) -> String {
    format!("{message:>12}")
}
