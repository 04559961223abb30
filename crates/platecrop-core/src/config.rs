// SPDX-License-Identifier: MIT
//
// Session configuration — viewport bounds, input polling, overlay tint.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for an interactive crop session.
///
/// Passed explicitly into the session constructor; there are no process-wide
/// tuning globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum preview width in display pixels.
    pub max_display_width: u32,
    /// Maximum preview height in display pixels.
    pub max_display_height: u32,
    /// Input poll interval in milliseconds. The preview re-renders at most
    /// once per interval.
    pub poll_interval_ms: u64,
    /// Green-channel tint added to pixels outside the keep region.
    pub overlay_tint: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_display_width: 1920,
            max_display_height: 1080,
            poll_interval_ms: 33,
            overlay_tint: 51,
        }
    }
}

impl SessionConfig {
    /// Load settings from a JSON file, falling back to defaults when the
    /// file does not exist. A present-but-malformed file is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_config_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = SessionConfig::load_or_default(dir.path().join("platecrop.json"))
            .expect("defaults");
        assert_eq!(config.max_display_width, 1920);
        assert_eq!(config.max_display_height, 1080);
        assert_eq!(config.poll_interval_ms, 33);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("platecrop.json");
        let mut file = std::fs::File::create(&path).expect("create");
        write!(
            file,
            r#"{{"max_display_width": 1280, "max_display_height": 720, "poll_interval_ms": 16, "overlay_tint": 64}}"#
        )
        .expect("write");

        let config = SessionConfig::load_or_default(&path).expect("load");
        assert_eq!(config.max_display_width, 1280);
        assert_eq!(config.max_display_height, 720);
        assert_eq!(config.poll_interval_ms, 16);
        assert_eq!(config.overlay_tint, 64);
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("platecrop.json");
        std::fs::write(&path, "not json").expect("write");
        assert!(SessionConfig::load_or_default(&path).is_err());
    }
}
