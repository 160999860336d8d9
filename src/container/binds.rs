//! Volume bind builder: all mounts in one place.

use std::path::{Path, PathBuf};

use crate::args::extract_basename_and_permission;

/// Where sources and includes appear inside a dexec container.
pub const CONTAINER_BUILD_DIR: &str = "/tmp/dexec/build";

/// Builder for the `-v host:container[:mode]` binds of one container.
#[derive(Debug, Clone)]
pub struct BindSet {
    host_dir: String,
    binds: Vec<String>,
}

impl BindSet {
    /// Binds relative to `host_dir`, which should be absolute.
    pub fn new(host_dir: &Path) -> Self {
        Self {
            host_dir: sanitise_path(host_dir),
            binds: Vec::new(),
        }
    }

    /// Sources default to the runtime's read-write mount.
    pub fn with_sources(mut self, sources: &[String]) -> Self {
        for source in sources {
            let bind = self.bind(source, "");
            self.binds.push(bind);
        }
        self
    }

    /// Includes default to read-only.
    pub fn with_includes(mut self, includes: &[String]) -> Self {
        for include in includes {
            let bind = self.bind(include, "ro");
            self.binds.push(bind);
        }
        self
    }

    /// Build the final bind list.
    pub fn build(self) -> Vec<String> {
        self.binds
    }

    fn bind(&self, raw: &str, default_permission: &str) -> String {
        let (path, permission) = extract_basename_and_permission(raw);
        let permission = if permission.is_empty() {
            default_permission
        } else {
            permission
        };
        let path = path.trim_start_matches("./");
        let mut bind = format!(
            "{}/{}:{}/{}",
            self.host_dir.trim_end_matches('/'),
            path,
            CONTAINER_BUILD_DIR,
            path
        );
        if !permission.is_empty() {
            bind.push(':');
            bind.push_str(permission);
        }
        bind
    }
}

/// Convert a host path into the form the Docker daemon expects.
///
/// Windows paths (`C:\Users\me`) become `/c/Users/me`; anything else is
/// returned unchanged.
pub fn sanitise_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let bytes = raw.as_bytes();
    let is_drive_path = bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'\\' || bytes[2] == b'/');

    if !is_drive_path {
        return raw.into_owned();
    }

    let drive = (bytes[0] as char).to_ascii_lowercase();
    let rest = raw[2..].replace('\\', "/");
    format!("/{}{}", drive, rest)
}

/// Directory the sources are relative to: the `-C` value made absolute, or
/// the current directory.
pub fn host_directory(target_dir: Option<&str>) -> std::io::Result<PathBuf> {
    match target_dir {
        Some(dir) => std::path::absolute(dir),
        None => std::env::current_dir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn source_bind_without_permission() {
        let binds = BindSet::new(Path::new("/foo"))
            .with_sources(&strings(&["bar"]))
            .build();
        assert_eq!(binds, vec!["/foo/bar:/tmp/dexec/build/bar"]);
    }

    #[test]
    fn include_defaults_to_read_only() {
        let binds = BindSet::new(Path::new("/foo/"))
            .with_includes(&strings(&["data", "out:rw"]))
            .build();
        assert_eq!(
            binds,
            vec![
                "/foo/data:/tmp/dexec/build/data:ro",
                "/foo/out:/tmp/dexec/build/out:rw",
            ]
        );
    }

    #[test]
    fn explicit_source_permission_is_kept() {
        let binds = BindSet::new(Path::new("/work"))
            .with_sources(&strings(&["./main.rs:ro"]))
            .build();
        assert_eq!(binds, vec!["/work/main.rs:/tmp/dexec/build/main.rs:ro"]);
    }

    #[test]
    fn windows_paths_are_rewritten() {
        assert_eq!(sanitise_path(Path::new("C:\\Users\\me")), "/c/Users/me");
        assert_eq!(sanitise_path(Path::new("d:/src")), "/d/src");
        assert_eq!(sanitise_path(Path::new("/home/me")), "/home/me");
        assert_eq!(sanitise_path(Path::new("relative")), "relative");
    }

    #[test]
    fn host_directory_defaults_to_cwd() {
        assert_eq!(host_directory(None).unwrap(), std::env::current_dir().unwrap());
        assert!(host_directory(Some("sub")).unwrap().is_absolute());
    }
}
