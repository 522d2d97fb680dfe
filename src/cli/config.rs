//! `taskdeck config`

use clap::Subcommand;

use super::Context;
use crate::error::{Result, TaskError};
use crate::storage::config::{config_path, load_config_from, save_config, Config};
use crate::store::ConsistencyMode;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (token masked)
    Show,
    /// Set the API base URL
    SetUrl { url: String },
    /// Store the bearer token
    SetToken { token: String },
    /// strict | legacy
    SetConsistency {
        #[arg(value_parser = parse_mode)]
        mode: ConsistencyMode,
    },
}

fn parse_mode(raw: &str) -> std::result::Result<ConsistencyMode, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(ConsistencyMode::Strict),
        "legacy" => Ok(ConsistencyMode::Legacy),
        _ => Err(format!("'{}' is not one of strict, legacy", raw)),
    }
}

pub fn execute(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show(ctx),
        ConfigAction::SetUrl { url } => {
            let url = url.trim().to_string();
            url::Url::parse(&url)
                .map_err(|e| TaskError::config(format!("invalid url '{}': {}", url, e)))?;
            edit(|config| config.server.base_url = url)
        }
        ConfigAction::SetToken { token } => {
            let token = Some(token.trim().to_string()).filter(|t| !t.is_empty());
            edit(|config| config.server.token = token)
        }
        ConfigAction::SetConsistency { mode } => edit(|config| config.store.consistency = mode),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let mut shown = ctx.config.clone();
    if shown.server.token.is_some() {
        shown.server.token = Some("***".to_string());
    }
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        println!("# {}", config_path().display());
        print!("{}", toml::to_string_pretty(&shown)?);
    }
    Ok(())
}

/// Edits the file only; environment and flag overrides are not written back
fn edit(apply: impl FnOnce(&mut Config)) -> Result<()> {
    let path = config_path();
    let mut config = load_config_from(&path)?;
    apply(&mut config);
    save_config(&config)?;
    println!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("Strict"), Ok(ConsistencyMode::Strict));
        assert_eq!(parse_mode("legacy"), Ok(ConsistencyMode::Legacy));
        assert!(parse_mode("eventual").is_err());
    }
}
