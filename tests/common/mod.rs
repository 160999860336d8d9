//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

use dexec::args::ParsedOptions;
use dexec::container::{ContainerDriver, ContainerSpec, DriverError};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::time::Duration;

pub const CONTAINER_ID: &str = "c0ffee";

/// Build options from a command line without the program name.
pub fn options(args: &[&str]) -> ParsedOptions {
    let mut full = vec!["dexec".to_string()];
    full.extend(args.iter().map(|s| s.to_string()));
    ParsedOptions::from_os_args(&full).expect("test arguments should parse")
}

/// One driver call, recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Ping,
    ImageExists(String),
    Pull(String),
    ListImages,
    RemoveImage(String),
    Create(ContainerSpec),
    Start(String),
    Wait(String),
    Kill(String),
    Remove(String),
}

/// In-memory container driver that records every call.
pub struct RecordingDriver {
    calls: Mutex<Vec<Call>>,
    local_images: Mutex<HashSet<String>>,
    exit_code: i32,
    ping_delay: Option<Duration>,
    run_delay: Option<Duration>,
    fail_start: bool,
    /// Contents of the first source file, read while the container exists.
    seen_source: Mutex<Option<String>>,
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            local_images: Mutex::new(HashSet::new()),
            exit_code: 0,
            ping_delay: None,
            run_delay: None,
            fail_start: false,
            seen_source: Mutex::new(None),
        }
    }

    pub fn with_local_images(self, images: &[&str]) -> Self {
        self.local_images
            .lock()
            .extend(images.iter().map(|s| s.to_string()));
        self
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Make `ping` take this long.
    pub fn with_ping_delay(mut self, delay: Duration) -> Self {
        self.ping_delay = Some(delay);
        self
    }

    /// Make the attached container run this long.
    pub fn with_run_delay(mut self, delay: Duration) -> Self {
        self.run_delay = Some(delay);
        self
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn local_images(&self) -> HashSet<String> {
        self.local_images.lock().clone()
    }

    pub fn created_spec(&self) -> Option<ContainerSpec> {
        self.calls().into_iter().find_map(|call| match call {
            Call::Create(spec) => Some(spec),
            _ => None,
        })
    }

    pub fn seen_source(&self) -> Option<String> {
        self.seen_source.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

fn failure(command: &str) -> DriverError {
    DriverError::CommandFailed {
        runtime: "mock".to_string(),
        command: command.to_string(),
        status: 1,
        stderr: "mock failure".to_string(),
    }
}

impl ContainerDriver for RecordingDriver {
    async fn ping(&self) -> Result<(), DriverError> {
        self.record(Call::Ping);
        if let Some(delay) = self.ping_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn image_exists(&self, reference: &str) -> Result<bool, DriverError> {
        self.record(Call::ImageExists(reference.to_string()));
        Ok(self.local_images.lock().contains(reference))
    }

    async fn pull_image(&self, reference: &str) -> Result<(), DriverError> {
        self.record(Call::Pull(reference.to_string()));
        self.local_images.lock().insert(reference.to_string());
        Ok(())
    }

    async fn list_images(&self) -> Result<Vec<String>, DriverError> {
        self.record(Call::ListImages);
        let mut images: Vec<String> = self.local_images.lock().iter().cloned().collect();
        images.sort();
        Ok(images)
    }

    async fn remove_image(&self, reference: &str) -> Result<(), DriverError> {
        self.record(Call::RemoveImage(reference.to_string()));
        if self.local_images.lock().remove(reference) {
            Ok(())
        } else {
            Err(failure("image rm"))
        }
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<String, DriverError> {
        self.record(Call::Create(spec.clone()));

        // Bind sources look like `host:container[:mode]`.
        let host_path = spec
            .binds
            .first()
            .and_then(|bind| bind.split(':').next())
            .map(str::to_string);
        if let Some(path) = host_path {
            *self.seen_source.lock() = std::fs::read_to_string(path).ok();
        }
        Ok(CONTAINER_ID.to_string())
    }

    async fn start_attached(&self, id: &str) -> Result<(), DriverError> {
        self.record(Call::Start(id.to_string()));
        if self.fail_start {
            return Err(failure("start"));
        }
        if let Some(delay) = self.run_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn wait_container(&self, id: &str) -> Result<i32, DriverError> {
        self.record(Call::Wait(id.to_string()));
        Ok(self.exit_code)
    }

    async fn kill_container(&self, id: &str) -> Result<(), DriverError> {
        self.record(Call::Kill(id.to_string()));
        Ok(())
    }

    async fn remove_container(&self, id: &str) -> Result<(), DriverError> {
        self.record(Call::Remove(id.to_string()));
        Ok(())
    }
}
