//! `path[:ro|:rw]` values shared by sources and includes.

/// Split a source/include value into its path and permission suffix.
///
/// Only a trailing `:ro` or `:rw` counts as a permission; any other colon
/// stays part of the path. The permission is empty when absent.
pub fn extract_basename_and_permission(raw: &str) -> (&str, &str) {
    match raw.rsplit_once(':') {
        Some((path, permission @ ("ro" | "rw"))) if !path.is_empty() => (path, permission),
        _ => (raw, ""),
    }
}

/// Extension of a source value: everything after the last `.` of the path,
/// ignoring any permission suffix. Empty when there is no `.`.
pub fn extract_file_extension(raw: &str) -> &str {
    let (path, _) = extract_basename_and_permission(raw);
    path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_suffix() {
        assert_eq!(extract_basename_and_permission("file.txt:ro"), ("file.txt", "ro"));
        assert_eq!(extract_basename_and_permission("file.txt:rw"), ("file.txt", "rw"));
        assert_eq!(extract_basename_and_permission("file.txt"), ("file.txt", ""));
    }

    #[test]
    fn other_colons_stay_in_path() {
        assert_eq!(extract_basename_and_permission("C:\\src\\a.c"), ("C:\\src\\a.c", ""));
        assert_eq!(extract_basename_and_permission("a.c:rx"), ("a.c:rx", ""));
        assert_eq!(extract_basename_and_permission(":ro"), (":ro", ""));
    }

    #[test]
    fn extension_after_last_dot() {
        assert_eq!(extract_file_extension("foo.bar"), "bar");
        assert_eq!(extract_file_extension("foo.bar.foobar"), "foobar");
        assert_eq!(extract_file_extension("foo.rs:ro"), "rs");
        assert_eq!(extract_file_extension("Makefile"), "");
    }
}
