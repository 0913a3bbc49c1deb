//! API password loading.
//!
//! Precedence: `SIA_API_PASSWORD` (non-empty) over the `apipassword` file in
//! the Sia data directory.

use std::path::{Path, PathBuf};

use crate::error::CliError;

pub const PASSWORD_ENV: &str = "SIA_API_PASSWORD";
pub const PASSWORD_FILE: &str = "apipassword";

/// Default siad data directory:
///
/// Linux:   $HOME/.sia
/// MacOS:   $HOME/Library/Application Support/Sia
/// Windows: %LOCALAPPDATA%\Sia
pub fn default_sia_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir().unwrap_or_default().join("Sia")
    } else if cfg!(target_os = "macos") {
        dirs::home_dir()
            .unwrap_or_default()
            .join("Library")
            .join("Application Support")
            .join("Sia")
    } else {
        dirs::home_dir().unwrap_or_default().join(".sia")
    }
}

/// Load the default password from the environment or the default data dir.
pub fn load_default_password() -> Result<String, CliError> {
    let from_env = std::env::var(PASSWORD_ENV).ok();
    load_password(from_env.as_deref(), &default_sia_dir())
}

/// Resolve a password from an optional environment value, falling back to
/// `<dir>/apipassword` (trimmed).
pub fn load_password(env_value: Option<&str>, dir: &Path) -> Result<String, CliError> {
    if let Some(value) = env_value
        && !value.is_empty()
    {
        log::debug!("using API password from {PASSWORD_ENV}");
        return Ok(value.to_string());
    }

    let path = dir.join(PASSWORD_FILE);
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| CliError::Credentials(format!("{}: {e}", path.display())))?;
    log::debug!("using API password from {}", path.display());
    Ok(raw.trim().to_string())
}
