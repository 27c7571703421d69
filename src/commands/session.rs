use chrono::{Local, Utc};
use std::path::Path;

use taller::config::{clear_session, init_config_dir, load_session, save_session, Session};
use taller::{Result, TallerError};

use super::Context;

/// Initialize config directory with a template config.toml
pub fn cmd_init(cfg_dir: &Path, api_url: Option<&str>) -> Result<()> {
    let config_path = init_config_dir(cfg_dir, api_url)?;

    println!("Initialized taller config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point it at your backend:  $EDITOR {}",
        config_path.display()
    );
    println!("  2. Log in with your token:    taller login --token <TOKEN>");
    println!();
    println!("Then try:");
    println!("  taller commissions summary");

    Ok(())
}

/// Store an access token in session.toml
pub fn cmd_login(cfg_dir: &Path, token: Option<&str>, email: Option<String>) -> Result<()> {
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| TallerError::validation("token", "pass --token or set TALLER_TOKEN"))?;

    let session = Session::new(token, email);
    save_session(cfg_dir, &session)?;

    println!("Logged in as {}", session.label());
    println!(
        "Session valid until {}",
        session
            .expires_at()
            .with_timezone(&Local)
            .format("%d/%m/%Y %H:%M")
    );
    Ok(())
}

/// Remove the stored session
pub fn cmd_logout(cfg_dir: &Path) -> Result<()> {
    if clear_session(cfg_dir)? {
        println!("Logged out.");
    } else {
        println!("No stored session.");
    }
    Ok(())
}

/// Show backend and session information
pub fn cmd_status(ctx: &Context) -> Result<()> {
    println!("Config:   {}", ctx.config_dir.join("config.toml").display());
    println!("Backend:  {}", ctx.config.api.base_url);
    match ctx.config.api.timeout() {
        Some(timeout) => println!("Timeout:  {}s", timeout.as_secs()),
        None => println!("Timeout:  none"),
    }

    match load_session(&ctx.config_dir)? {
        None => println!("Session:  not logged in"),
        Some(session) if session.is_expired_at(Utc::now()) => {
            println!("Session:  {} (expired)", session.label())
        }
        Some(session) => println!(
            "Session:  {} (valid until {})",
            session.label(),
            session
                .expires_at()
                .with_timezone(&Local)
                .format("%d/%m/%Y %H:%M")
        ),
    }
    Ok(())
}
