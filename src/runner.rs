//! Run orchestration: from parsed options to a container exit code.

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use regex::Regex;
use thiserror::Error;
use tokio::io::AsyncRead;

use crate::args::{build_container_spec, OptionKind, ParsedOptions};
use crate::container::{ContainerDriver, ContainerSpec, DriverError};
use crate::image::{resolve, ContainerImage, ImageRegistry, ResolutionError};
use crate::input::StdinSource;

/// Exit status reported when the execution timeout kills the container.
pub const TIMEOUT_STATUS_CODE: i32 = 124;

/// Exit status reported when Ctrl-C kills the container.
pub const INTERRUPTED_STATUS_CODE: i32 = 130;

const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(5);

static DEXEC_IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^dexec/lang-[^:\s]+(:.+)?$").expect("image pattern is a valid regex")
});

/// Whether `reference` names one of the dexec language images.
pub fn is_dexec_image(reference: &str) -> bool {
    DEXEC_IMAGE_PATTERN.is_match(reference)
}

/// What an invocation asks for before any container work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ShowVersion,
    ShowHelp,
    Execute,
}

/// Version wins over help; help is also shown when there is nothing to do.
pub fn requested_action(options: &ParsedOptions) -> Action {
    if options.has(OptionKind::VersionFlag) {
        return Action::ShowVersion;
    }

    let has_work = [
        OptionKind::Source,
        OptionKind::Extension,
        OptionKind::Image,
        OptionKind::CleanFlag,
    ]
    .into_iter()
    .any(|kind| options.has(kind));

    if options.has(OptionKind::HelpFlag) || !has_work {
        Action::ShowHelp
    } else {
        Action::Execute
    }
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("Request to container runtime timed out after {0:?}")]
    RuntimeTimeout(Duration),

    #[error("Failed to read source from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("Failed to switch terminal mode: {0}")]
    Terminal(#[source] std::io::Error),
}

/// Facts about the calling process that shape the container.
#[derive(Debug, Clone)]
pub struct HostContext {
    /// Absolute directory that sources and includes are relative to.
    pub host_dir: PathBuf,
    /// Whether stdin is an interactive terminal.
    pub interactive: bool,
}

/// Runs one dexec invocation against a container driver.
pub struct Runner<D> {
    driver: D,
    registry: ImageRegistry,
    timeout: Option<Duration>,
    ping_timeout: Duration,
}

impl<D: ContainerDriver> Runner<D> {
    pub fn new(driver: D, registry: ImageRegistry) -> Self {
        Self {
            driver,
            registry,
            timeout: None,
            ping_timeout: DEFAULT_PING_TIMEOUT,
        }
    }

    /// Kill the container if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ping_timeout(mut self, ping_timeout: Duration) -> Self {
        self.ping_timeout = ping_timeout;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Execute an invocation whose [`requested_action`] is `Execute`.
    ///
    /// In standard-input mode the code is read from `stdin` into a temp
    /// file in the host directory, which is removed when the run ends.
    pub async fn run<R>(
        &self,
        mut options: ParsedOptions,
        host: &HostContext,
        stdin: &mut R,
    ) -> Result<i32, RunError>
    where
        R: AsyncRead + Unpin,
    {
        self.check_runtime().await?;

        if options.has(OptionKind::CleanFlag) {
            let removed = self.clean_images().await?;
            tracing::info!(removed, "removed local dexec images");

            let wants_execution = options.has(OptionKind::Source)
                || options.has(OptionKind::Extension)
                || options.has(OptionKind::Image);
            if !wants_execution {
                return Ok(0);
            }
        }

        let image = resolve(&options, &self.registry)?;
        tracing::info!(image = %image, "resolved image");

        let stdin_source = if options.has(OptionKind::Source) {
            None
        } else {
            let source = StdinSource::capture(stdin, &host.host_dir, &image.extension)
                .await
                .map_err(RunError::Stdin)?;
            options.inject_stdin_source(source.file_name());
            Some(source)
        };

        self.fetch_image(&image, options.has(OptionKind::UpdateFlag))
            .await?;

        let tty = host.interactive && stdin_source.is_none();
        let spec = build_container_spec(&options, &image, &host.host_dir, tty);
        let code = self.execute(&spec).await;

        drop(stdin_source);
        code
    }

    /// Fail unless the runtime answers within the ping timeout.
    pub async fn check_runtime(&self) -> Result<(), RunError> {
        match tokio::time::timeout(self.ping_timeout, self.driver.ping()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(RunError::RuntimeTimeout(self.ping_timeout)),
        }
    }

    /// Remove every local dexec language image. Returns how many were removed.
    pub async fn clean_images(&self) -> Result<usize, RunError> {
        let mut removed = 0;
        for reference in self.driver.list_images().await? {
            if !is_dexec_image(&reference) {
                continue;
            }
            tracing::debug!(image = %reference, "removing image");
            self.driver.remove_image(&reference).await?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Pull `image` if it is missing locally or `force_update` is set.
    pub async fn fetch_image(
        &self,
        image: &ContainerImage,
        force_update: bool,
    ) -> Result<(), RunError> {
        let reference = image.reference();
        if force_update || !self.driver.image_exists(&reference).await? {
            tracing::info!(image = %reference, force_update, "pulling image");
            self.driver.pull_image(&reference).await?;
        }
        Ok(())
    }

    /// Create, run and remove one container, returning its exit code.
    ///
    /// The container is removed even when attaching or waiting fails.
    pub async fn execute(&self, spec: &ContainerSpec) -> Result<i32, RunError> {
        let id = self.driver.create_container(spec).await?;
        tracing::debug!(container = %id, image = %spec.image, "created container");

        let outcome = self.attach_and_wait(&id, spec.tty).await;

        if let Err(e) = self.driver.remove_container(&id).await {
            tracing::warn!(container = %id, "failed to remove container: {}", e);
        }
        outcome
    }

    async fn attach_and_wait(&self, id: &str, tty: bool) -> Result<i32, RunError> {
        if tty {
            enable_raw_mode().map_err(RunError::Terminal)?;
        }
        let _restore = scopeguard::guard(tty, |raw| {
            if raw {
                let _ = disable_raw_mode();
            }
        });

        let deadline = async {
            match self.timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            result = self.attach(id) => Ok(result?),
            _ = deadline => {
                tracing::warn!(container = %id, timeout = ?self.timeout, "execution timed out, killing container");
                self.driver.kill_container(id).await?;
                Ok(TIMEOUT_STATUS_CODE)
            }
            Ok(()) = tokio::signal::ctrl_c() => {
                tracing::warn!(container = %id, "interrupted, killing container");
                self.driver.kill_container(id).await?;
                Ok(INTERRUPTED_STATUS_CODE)
            }
        }
    }

    async fn attach(&self, id: &str) -> Result<i32, DriverError> {
        self.driver.start_attached(id).await?;
        self.driver.wait_container(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(args: &[&str]) -> ParsedOptions {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        ParsedOptions::from_os_args(&args).unwrap()
    }

    #[test]
    fn dexec_image_pattern() {
        assert!(is_dexec_image("dexec/lang-c:1.0.2"));
        assert!(is_dexec_image("dexec/lang-rust"));
        assert!(!is_dexec_image("dexec/other:1"));
        assert!(!is_dexec_image("me/dexec/lang-c:1"));
        assert!(!is_dexec_image("dexec/lang-:1"));
    }

    #[test]
    fn version_beats_help() {
        assert_eq!(requested_action(&options(&["dexec", "-h", "-v"])), Action::ShowVersion);
    }

    #[test]
    fn help_when_nothing_to_run() {
        assert_eq!(requested_action(&options(&["dexec"])), Action::ShowHelp);
        assert_eq!(requested_action(&options(&["dexec", "-C", "dir"])), Action::ShowHelp);
        assert_eq!(requested_action(&options(&["dexec", "a.py", "--help"])), Action::ShowHelp);
    }

    #[test]
    fn execute_with_source_override_or_clean() {
        assert_eq!(requested_action(&options(&["dexec", "a.py"])), Action::Execute);
        assert_eq!(requested_action(&options(&["dexec", "-e", "py"])), Action::Execute);
        assert_eq!(requested_action(&options(&["dexec", "--image=x/y"])), Action::Execute);
        assert_eq!(requested_action(&options(&["dexec", "--clean"])), Action::Execute);
    }
}
