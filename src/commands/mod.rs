//! Subcommand handlers. Each `cmd_*` fetches through the API client and
//! prints a table or a one-line confirmation.

pub mod commissions;
pub mod invoices;
pub mod lookups;
pub mod orders;
pub mod ratings;
pub mod reports;
pub mod session;

use chrono::{Local, NaiveDate, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::{debug, info};

use taller::config::{load_config, load_session, Config};
use taller::format::format_money;
use taller::{ApiClient, Credential, Result, TallerError};

/// Everything a command needs: loaded config plus any overrides from the
/// command line or environment
pub struct Context {
    pub config_dir: PathBuf,
    pub config: Config,
    token: Option<String>,
}

impl Context {
    pub fn load(config_dir: PathBuf, api_url: Option<String>, token: Option<String>) -> Result<Self> {
        let config = match (load_config(&config_dir), api_url) {
            (Ok(mut config), Some(url)) => {
                config.api.base_url = url;
                config
            }
            (Ok(config), None) => config,
            (
                Err(TallerError::ConfigNotFound(_) | TallerError::ConfigFileNotFound(_)),
                Some(url),
            ) => {
                debug!("no config.toml, using API URL from the command line");
                Config::with_base_url(url)
            }
            (Err(e), _) => return Err(e),
        };

        Ok(Self {
            config_dir,
            config,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Credential from `--token`/`TALLER_TOKEN`, else from the stored session
    pub fn credential(&self) -> Result<Credential> {
        if let Some(token) = &self.token {
            return Ok(Credential::new(token.trim()));
        }
        let session = load_session(&self.config_dir)?.ok_or(TallerError::NotLoggedIn)?;
        if session.is_expired_at(Utc::now()) {
            return Err(TallerError::SessionExpired(session.label()));
        }
        Ok(Credential::new(session.token))
    }

    /// Client for authenticated calls
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::from_config(&self.config, Some(self.credential()?))
    }

    /// Client for public calls; carries a credential only if one is at hand
    pub fn public_client(&self) -> Result<ApiClient> {
        ApiClient::from_config(&self.config, self.credential().ok())
    }

    pub fn money(&self, value: f64) -> String {
        format_money(value, &self.config.display.currency_symbol)
    }

    /// Default place for downloaded files
    pub fn download_path(&self, file_name: &str) -> PathBuf {
        self.config_dir.join("downloads").join(file_name)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn print_table<R: Tabled>(rows: Vec<R>) {
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

/// Write downloaded bytes, creating parent directories as needed
pub fn save_download(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "saved download");
    println!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Text for an optional table cell
pub fn or_na(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("N/A")
        .to_string()
}
