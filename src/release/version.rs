//! Release tag normalization
//!
//! GitHub tags carry a leading `v` (`v5.2.0`); package versions do not.

/// Tag form of a version: always `v`-prefixed
pub fn to_tag(version: &str) -> String {
    if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{version}")
    }
}

/// Package form of a tag: never `v`-prefixed
pub fn to_package_version(tag: &str) -> String {
    tag.trim_start_matches('v').to_string()
}
