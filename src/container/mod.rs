//! Container runtime seam.
//!
//! Everything dexec needs from a container runtime goes through
//! [`ContainerDriver`]. [`DockerCli`] implements it by shelling out to the
//! `docker` binary; tests substitute an in-memory driver.

mod binds;
mod docker;

pub use binds::{host_directory, sanitise_path, BindSet, CONTAINER_BUILD_DIR};
pub use docker::DockerCli;

use thiserror::Error;

/// Errors reported by a container driver.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to launch container runtime '{runtime}': {source}")]
    Spawn {
        runtime: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{runtime} {command}' failed with status {status}: {stderr}")]
    CommandFailed {
        runtime: String,
        command: String,
        status: i32,
        stderr: String,
    },

    #[error("Unexpected output from '{runtime} {command}': {message}")]
    UnexpectedOutput {
        runtime: String,
        command: String,
        message: String,
    },
}

/// Everything needed to create one anonymous dexec container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    /// Full image reference (`repository:version`).
    pub image: String,
    /// Entrypoint arguments.
    pub command: Vec<String>,
    /// Volume binds in `host:container[:mode]` form.
    pub binds: Vec<String>,
    /// Allocate a pseudo-terminal.
    pub tty: bool,
}

/// Narrow view of a container runtime.
///
/// Containers are always created with stdin open so the attached program
/// can read from the caller's terminal or pipe.
#[allow(async_fn_in_trait)]
pub trait ContainerDriver {
    /// Check that the runtime daemon answers.
    async fn ping(&self) -> Result<(), DriverError>;

    async fn image_exists(&self, reference: &str) -> Result<bool, DriverError>;

    async fn pull_image(&self, reference: &str) -> Result<(), DriverError>;

    /// Local images as `repository:tag` references.
    async fn list_images(&self) -> Result<Vec<String>, DriverError>;

    async fn remove_image(&self, reference: &str) -> Result<(), DriverError>;

    /// Create (but do not start) a container, returning its id.
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String, DriverError>;

    /// Start the container with this process's stdio attached. Returns
    /// once the attachment ends.
    async fn start_attached(&self, id: &str) -> Result<(), DriverError>;

    /// Block until the container stops and return its exit code.
    async fn wait_container(&self, id: &str) -> Result<i32, DriverError>;

    async fn kill_container(&self, id: &str) -> Result<(), DriverError>;

    async fn remove_container(&self, id: &str) -> Result<(), DriverError>;
}
