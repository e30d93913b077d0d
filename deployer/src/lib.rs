pub mod deploy;
pub mod fakes;
pub mod platform;
pub mod spec;

pub use deploy::{deploy, DeployError, Outcome};
pub use platform::{PlatformClient, PlatformError};
pub use spec::ResourceSpec;
