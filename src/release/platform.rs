//! Host architecture guard

use crate::error::{PackagerError, Result};

/// The only architecture upstream ships Linux binaries for
pub const SUPPORTED_ARCH: &str = "x86_64";

/// Architecture of the running binary
pub fn host_arch() -> &'static str {
    std::env::consts::ARCH
}

/// Fail unless `arch` is the supported target
pub fn ensure_supported(arch: &str, project: &str) -> Result<()> {
    if arch == SUPPORTED_ARCH {
        Ok(())
    } else {
        Err(PackagerError::UnsupportedArchitecture {
            arch: arch.to_string(),
            project: project.to_string(),
        })
    }
}
