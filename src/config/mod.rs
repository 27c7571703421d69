mod session;
mod settings;

pub use session::{Session, SESSION_TTL_HOURS};
pub use settings::{ApiSettings, Config, DisplaySettings, PublicSettings};

use crate::error::{Result, TallerError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.taller/ or the XDG equivalent)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "taller") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        TallerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".taller"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    if !config_dir.exists() {
        return Err(TallerError::ConfigNotFound(config_dir.to_path_buf()));
    }
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(TallerError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| TallerError::ConfigParse { path, source: e })
}

fn session_path(config_dir: &Path) -> PathBuf {
    config_dir.join("session.toml")
}

/// Load session.toml, if a login was stored
pub fn load_session(config_dir: &Path) -> Result<Option<Session>> {
    let path = session_path(config_dir);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| TallerError::ConfigParse { path, source: e })
}

/// Save session.toml
pub fn save_session(config_dir: &Path, session: &Session) -> Result<()> {
    if !config_dir.exists() {
        return Err(TallerError::ConfigNotFound(config_dir.to_path_buf()));
    }
    let path = session_path(config_dir);
    let content = toml::to_string_pretty(session).map_err(|e| TallerError::ConfigWrite {
        path: path.clone(),
        source: e,
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Remove session.toml. Returns false when there was nothing to remove.
pub fn clear_session(config_dir: &Path) -> Result<bool> {
    let path = session_path(config_dir);
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}

/// Create the config directory with a template config.toml
pub fn init_config_dir(config_dir: &Path, api_url: Option<&str>) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(TallerError::AlreadyInitialized(config_dir.to_path_buf()));
    }
    fs::create_dir_all(config_dir)?;
    fs::create_dir_all(config_dir.join("downloads"))?;

    let content = match api_url {
        Some(url) => CONFIG_TEMPLATE.replace(DEFAULT_API_URL, url),
        None => CONFIG_TEMPLATE.to_string(),
    };
    let path = config_dir.join("config.toml");
    fs::write(&path, content)?;
    Ok(path)
}

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
base_url = "http://localhost:3000/api"
# 0 disables the request timeout
timeout_secs = 30

[display]
currency_symbol = "Bs"

[public]
# Page customers open to leave a rating, shared by 'taller ratings link'
# rating_url = "https://taller.example.com/valoracion"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn template_parses() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.display.currency_symbol, "Bs");
        assert!(config.public.rating_url.is_none());
    }

    #[test]
    fn init_writes_custom_api_url() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("taller");
        init_config_dir(&dir, Some("https://api.taller.bo/api")).unwrap();

        let config = load_config(&dir).unwrap();
        assert_eq!(config.api.base_url, "https://api.taller.bo/api");
        assert!(dir.join("downloads").is_dir());
        assert!(matches!(
            init_config_dir(&dir, None),
            Err(TallerError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn session_round_trip_and_clear() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_path_buf();
        assert!(load_session(&dir).unwrap().is_none());

        save_session(&dir, &Session::new("tok-1", Some("ana@taller.bo".into()))).unwrap();
        let loaded = load_session(&dir).unwrap().unwrap();
        assert_eq!(loaded.token, "tok-1");

        assert!(clear_session(&dir).unwrap());
        assert!(!clear_session(&dir).unwrap());
    }

    #[test]
    fn missing_config_dir_is_reported() {
        let temp = TempDir::new().unwrap();
        let err = load_config(&temp.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("taller init"));
    }
}
