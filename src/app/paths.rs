// SPDX-License-Identifier: MPL-2.0
//! Where FormCheck keeps its files.
//!
//! The data directory holds the model and the workout history; the config
//! directory holds `settings.toml`.
//!
//! # Path Resolution Order
//!
//! 1. **Explicit override** - parameter to `_with_override()` functions (for tests)
//! 2. **CLI arguments** (`--data-dir`, `--config-dir`) - set via [`init_cli_overrides`]
//! 3. **Environment variables** (`FORMCHECK_DATA_DIR`, `FORMCHECK_CONFIG_DIR`)
//! 4. **Platform default** - via `dirs` crate

use crate::config::defaults::DEFAULT_MODEL_FILENAME;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used for directory naming.
const APP_NAME: &str = "FormCheck";

/// Environment variable to override the data directory.
pub const ENV_DATA_DIR: &str = "FORMCHECK_DATA_DIR";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "FORMCHECK_CONFIG_DIR";

static CLI_DATA_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Records `--data-dir` and `--config-dir` for the rest of the process.
///
/// Only the first call has an effect.
pub fn init_cli_overrides(data_dir: Option<PathBuf>, config_dir: Option<PathBuf>) {
    let _ = CLI_DATA_DIR.set(data_dir);
    let _ = CLI_CONFIG_DIR.set(config_dir);
}

fn resolve(
    override_path: Option<PathBuf>,
    cli: &OnceLock<Option<PathBuf>>,
    env_var: &str,
    platform: fn() -> Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Some(path) = cli.get().and_then(Clone::clone) {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(env_var) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    platform().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Returns the application data directory path.
///
/// Platform defaults:
/// - Linux: `~/.local/share/FormCheck/`
/// - macOS: `~/Library/Application Support/FormCheck/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\FormCheck\`
///
/// Returns `None` if the data directory cannot be determined.
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

/// Returns the application data directory path, preferring `override_path`.
pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, &CLI_DATA_DIR, ENV_DATA_DIR, dirs::data_dir)
}

/// Returns the application config directory path.
///
/// Returns `None` if the config directory cannot be determined.
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Returns the application config directory path, preferring `override_path`.
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, &CLI_CONFIG_DIR, ENV_CONFIG_DIR, dirs::config_dir)
}

/// Default model location: [`DEFAULT_MODEL_FILENAME`] in the data directory.
pub fn default_model_path() -> Option<PathBuf> {
    get_app_data_dir().map(|mut path| {
        path.push(DEFAULT_MODEL_FILENAME);
        path
    })
}
