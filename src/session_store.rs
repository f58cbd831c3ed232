use std::fs;
use std::path::PathBuf;

use crate::models::session::Session;

const SESSION_FILE: &str = "session.json";

// EXPENSO_HOME wins so tests and scripts can point the store anywhere;
// otherwise the session lives under ~/.expenso.
pub fn expenso_home() -> Result<PathBuf, String> {
    if let Ok(home) = std::env::var("EXPENSO_HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir()
        .map(|home| home.join(".expenso"))
        .ok_or_else(|| "Could not determine home directory".to_string())
}

pub fn session_path() -> Result<PathBuf, String> {
    Ok(expenso_home()?.join(SESSION_FILE))
}

// A missing file just means nobody is logged in.
pub fn load_session() -> Result<Option<Session>, String> {
    let path = session_path()?;
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read session from {}: {}", path.display(), e))?;

    let session = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse session from {}: {}", path.display(), e))?;

    Ok(Some(session))
}

pub fn save_session(session: &Session) -> Result<(), String> {
    let path = session_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
    }

    let contents = serde_json::to_string_pretty(session)
        .map_err(|e| format!("Failed to serialize session: {}", e))?;

    // The token is a credential, keep the file private to the user.
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&path)
            .map_err(|e| format!("Failed to open {} for writing: {}", path.display(), e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| format!("Failed to write to {}: {}", path.display(), e))?;
    }

    #[cfg(not(unix))]
    {
        fs::write(&path, contents)
            .map_err(|e| format!("Failed to write to {}: {}", path.display(), e))?;
    }

    Ok(())
}

pub fn clear_session() -> Result<(), String> {
    let path = session_path()?;
    if path.exists() {
        fs::remove_file(&path)
            .map_err(|e| format!("Failed to remove {}: {}", path.display(), e))?;
    }
    Ok(())
}
