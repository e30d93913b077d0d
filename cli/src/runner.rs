use crate::config::{build_config, FileConfig};
use crate::error::Error;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};

pub(crate) trait Runner {
    /// Deployment config of the current directory, or of an explicit path
    fn config(&self, path: Option<&Path>) -> Result<FileConfig, Error> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(build_config().config_file));

        FileConfig::from_path(&path).map_err(|err| {
            self.error(
                Some("Config not found"),
                Some(&format!(
                    "Could not read {}, create it or pass --config.",
                    path.display()
                )),
                Some(err.into()),
            )
        })
    }

    /// Run the command
    ///
    /// Returns an error shown to the user in case of failure
    async fn run(&mut self) -> Result<(), Error>;

    /// Construct an error shown to the user
    fn error(
        &self,
        title: Option<&str>,
        description: Option<&str>,
        origin: Option<Box<dyn StdError>>,
    ) -> Error {
        if let Some(origin) = origin {
            log::error!("{origin:?}");
        }

        if let Some(title) = title {
            Error::new(title, description)
        } else {
            Error::new("Failed to run the command", None)
        }
    }
}

/// Return a runner for a command
pub(crate) trait Runnable {
    fn runner(&self) -> impl Runner;
}
