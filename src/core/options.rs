//! Decoder configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::util::{Error, Result};

/// Default element nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Options controlling a decode. Loadable from JSON; missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Maximum element nesting depth, root included.
    pub max_depth: usize,
    /// Fail on the first reference left unresolved after the full parse.
    pub strict: bool,
    /// Treat `id` on library elements as mandatory.
    pub require_library_ids: bool,
    /// Trim whitespace around captured character data.
    pub trim_text: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strict: false,
            require_library_ids: false,
            trim_text: true,
        }
    }
}

impl DecodeOptions {
    /// Strict variant of the defaults.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Default config file location (`<config dir>/collada/options.json`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("collada");
            p.push("options.json");
            p
        })
    }

    /// Load options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        let mut options: Self = serde_json::from_str(&text)?;
        if options.max_depth == 0 {
            options.max_depth = DEFAULT_MAX_DEPTH;
        }
        Ok(options)
    }

    /// Load options from the default location, falling back to defaults when
    /// the file is absent or unreadable.
    pub fn load_default() -> Self {
        Self::default_path()
            .and_then(|p| Self::load(p).ok())
            .unwrap_or_default()
    }

    /// Save options as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Cooperative cancellation flag shared between a decode and its caller.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token in the "not cancelled" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The decode stops at its next iteration step.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
