//! File System Utilities
//!
//! Configuration directory management.

use directories::ProjectDirs;
use home::home_dir;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Get or create the application's configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/thing-console/` or `$XDG_CONFIG_HOME/thing-console/`
/// - **macOS**: `~/Library/Application Support/com.tchjjc.thing-console/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\tchjjc\thing-console\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    let Some(project_dirs) = ProjectDirs::from("com", "tchjjc", "thing-console") else {
        return Err(Error::Invalid {
            message: "Could not determine project directories".to_string(),
        });
    };

    let config_dir = project_dirs.config_dir();

    if !config_dir.exists() {
        fs::create_dir_all(config_dir)?;
    }

    // Migrate a legacy dot-directory config if one exists
    if let Some(home) = home_dir() {
        let old_path = home.join(".thing-console");
        if old_path.exists() {
            for entry in fs::read_dir(&old_path)?.flatten() {
                if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                    let _ = fs::copy(entry.path(), config_dir.join(entry.file_name()));
                }
            }
            let _ = fs::remove_dir_all(&old_path);
        }
    }

    Ok(config_dir.to_path_buf())
}

/// Get the data directory for larger files (e.g. rolling log output)
pub fn get_or_create_data_dir() -> Result<PathBuf> {
    let Some(project_dirs) = ProjectDirs::from("com", "tchjjc", "thing-console") else {
        return Err(Error::Invalid {
            message: "Could not determine project directories".to_string(),
        });
    };

    let data_dir = project_dirs.data_dir();

    if !data_dir.exists() {
        fs::create_dir_all(data_dir)?;
    }

    Ok(data_dir.to_path_buf())
}
