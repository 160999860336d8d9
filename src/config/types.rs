use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::image::{ContainerImage, ImageRegistry, UNKNOWN_NAME};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    /// Extra or replacement registry rows.
    #[serde(default)]
    pub images: Vec<ImageEntry>,
}

/// Default settings for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Container runtime binary (default: "docker").
    #[serde(default = "default_docker_bin")]
    pub docker_bin: String,
    /// Kill the container after this many seconds; 0 disables (default: 0).
    #[serde(default)]
    pub timeout_seconds: u64,
    /// How long to wait for the runtime to answer a ping (default: 5).
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout_seconds: u64,
}

/// A registry row declared in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEntry {
    /// File extension without the leading dot (e.g., "kt").
    pub extension: String,
    /// Display name (e.g., "Kotlin").
    #[serde(default = "default_image_name")]
    pub name: String,
    /// Repository without a tag (e.g., "dexec/lang-kotlin").
    pub repository: String,
    #[serde(default = "default_image_version")]
    pub version: String,
}

fn default_docker_bin() -> String {
    "docker".to_string()
}

fn default_ping_timeout() -> u64 {
    5
}

fn default_image_name() -> String {
    UNKNOWN_NAME.to_string()
}

fn default_image_version() -> String {
    crate::image::DEFAULT_VERSION.to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            docker_bin: default_docker_bin(),
            timeout_seconds: 0,
            ping_timeout_seconds: default_ping_timeout(),
        }
    }
}

impl Config {
    /// Execution timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        match self.defaults.timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.defaults.ping_timeout_seconds)
    }

    /// The built-in registry with this config's rows applied on top.
    pub fn registry(&self) -> ImageRegistry {
        self.images
            .iter()
            .fold(ImageRegistry::builtin(), |registry, entry| {
                registry.with_image(ContainerImage::new(
                    entry.name.clone(),
                    entry.extension.clone(),
                    entry.repository.clone(),
                    entry.version.clone(),
                ))
            })
    }
}
