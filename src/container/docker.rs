//! [`ContainerDriver`] backed by the `docker` command-line client.

use std::process::{Output, Stdio};

use serde::Deserialize;
use tokio::process::Command;

use crate::container::{ContainerDriver, ContainerSpec, DriverError};

/// One line of `docker image ls --format '{{json .}}'`.
#[derive(Debug, Deserialize)]
struct ImageSummary {
    #[serde(rename = "Repository")]
    repository: String,
    #[serde(rename = "Tag")]
    tag: String,
}

impl ImageSummary {
    /// `repository:tag`, or `None` for dangling images.
    fn reference(&self) -> Option<String> {
        if self.repository == "<none>" || self.tag == "<none>" {
            return None;
        }
        Some(format!("{}:{}", self.repository, self.tag))
    }
}

/// Drives containers through the Docker CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    bin: String,
}

impl DockerCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.bin);
        command.args(args);
        command
    }

    fn spawn_error(&self, source: std::io::Error) -> DriverError {
        DriverError::Spawn {
            runtime: self.bin.clone(),
            source,
        }
    }

    /// Run a short-lived helper command with captured output, failing on a
    /// non-zero exit.
    async fn output(&self, args: &[&str]) -> Result<Output, DriverError> {
        tracing::debug!(runtime = %self.bin, ?args, "running container runtime command");
        let output = self
            .command(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(DriverError::CommandFailed {
                runtime: self.bin.clone(),
                command: args.join(" "),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }

    fn unexpected(&self, args: &[&str], message: impl Into<String>) -> DriverError {
        DriverError::UnexpectedOutput {
            runtime: self.bin.clone(),
            command: args.join(" "),
            message: message.into(),
        }
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl ContainerDriver for DockerCli {
    async fn ping(&self) -> Result<(), DriverError> {
        self.output(&["version", "--format", "{{.Server.Version}}"])
            .await
            .map(|_| ())
    }

    async fn image_exists(&self, reference: &str) -> Result<bool, DriverError> {
        let status = self
            .command(&["image", "inspect", "--format", "{{.Id}}", reference])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;
        Ok(status.success())
    }

    async fn pull_image(&self, reference: &str) -> Result<(), DriverError> {
        self.output(&["pull", "--quiet", reference]).await.map(|_| ())
    }

    async fn list_images(&self) -> Result<Vec<String>, DriverError> {
        let args = ["image", "ls", "--all", "--format", "{{json .}}"];
        let output = self.output(&args).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        let mut references = Vec::new();
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            let summary: ImageSummary = serde_json::from_str(line)
                .map_err(|e| self.unexpected(&args, format!("{e}: {line}")))?;
            references.extend(summary.reference());
        }
        Ok(references)
    }

    async fn remove_image(&self, reference: &str) -> Result<(), DriverError> {
        self.output(&["image", "rm", reference]).await.map(|_| ())
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<String, DriverError> {
        let mut args: Vec<&str> = vec!["create", "--interactive"];
        if spec.tty {
            args.push("--tty");
        }
        for bind in &spec.binds {
            args.push("--volume");
            args.push(bind);
        }
        args.push(&spec.image);
        args.extend(spec.command.iter().map(String::as_str));

        let output = self.output(&args).await?;
        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if id.is_empty() {
            return Err(self.unexpected(&args[..1], "no container id printed"));
        }
        Ok(id)
    }

    async fn start_attached(&self, id: &str) -> Result<(), DriverError> {
        // The attach client's own exit status is not the container's.
        self.command(&["start", "--attach", "--interactive", id])
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;
        Ok(())
    }

    async fn wait_container(&self, id: &str) -> Result<i32, DriverError> {
        let args = ["wait", id];
        let output = self.output(&args).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .parse()
            .map_err(|_| self.unexpected(&args, format!("not an exit code: {}", stdout.trim())))
    }

    async fn kill_container(&self, id: &str) -> Result<(), DriverError> {
        self.output(&["kill", id]).await.map(|_| ())
    }

    async fn remove_container(&self, id: &str) -> Result<(), DriverError> {
        self.output(&["rm", "--force", id]).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_summary_reference() {
        let line = r#"{"Containers":"N/A","ID":"abc","Repository":"dexec/lang-c","Tag":"1.0.2"}"#;
        let summary: ImageSummary = serde_json::from_str(line).unwrap();
        assert_eq!(summary.reference().as_deref(), Some("dexec/lang-c:1.0.2"));

        let dangling = ImageSummary {
            repository: "<none>".into(),
            tag: "<none>".into(),
        };
        assert_eq!(dangling.reference(), None);
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let driver = DockerCli::new("dexec-test-no-such-runtime");
        match driver.ping().await {
            Err(DriverError::Spawn { runtime, .. }) => {
                assert_eq!(runtime, "dexec-test-no-such-runtime")
            }
            other => panic!("expected spawn error, got {other:?}"),
        }
    }
}
