//! External tool detection.

use crate::error::{ForgeError, Result};

/// Version control is required: droids are installed into a checkout.
pub const VCS_TOOL: &str = "git";

/// The Factory CLI that actually runs droids. Optional at install time.
pub const COMPANION_TOOL: &str = "droid";

pub fn available(tool: &str) -> bool {
    which::which(tool).is_ok()
}

/// Fatal when absent; checked before any filesystem mutation.
pub fn require(tool: &str) -> Result<()> {
    if available(tool) {
        Ok(())
    } else {
        Err(ForgeError::PrerequisiteMissing(tool.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_is_reported_by_name() {
        let err = require("definitely-not-a-real-tool-zzz").unwrap_err();
        assert!(err.to_string().contains("definitely-not-a-real-tool-zzz"));
    }

    #[test]
    fn shell_is_available() {
        // `sh` exists on every platform we build for.
        assert!(available("sh"));
    }
}
