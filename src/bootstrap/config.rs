//! # Configuration Resolution / 配置解析
//!
//! Loads `.env`, reads the TOML config file and applies command line
//! overrides. Missing optional files fall back to defaults; a file named
//! explicitly with `--config` must exist.
//! 命令行参数优先于配置文件。

use std::path::{Path, PathBuf};

use anyhow::Context;
use sc_core::config::AppConfig;
use sc_infra::config::load_config;
use sc_infra::fs::{app_data_dir, default_config_path};

use crate::cli::Cli;

/// Configuration after file loading and CLI overrides.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: AppConfig,
    /// The file the configuration was read from, if any.
    pub source: Option<PathBuf>,
    pub data_dir: PathBuf,
}

pub fn resolve_config(cli: &Cli) -> anyhow::Result<ResolvedConfig> {
    load_dotenv();

    let (path, required) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (default_config_path()?, false),
    };
    let (mut config, source) = load_or_default(&path, required)?;
    apply_cli_overrides(&mut config, cli);

    let data_dir = match &config.storage.data_dir {
        Some(dir) => dir.clone(),
        None => app_data_dir().context("Failed to resolve the application data directory")?,
    };

    Ok(ResolvedConfig {
        config,
        source,
        data_dir,
    })
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(err) if err.not_found() => {}
        Err(err) => eprintln!("Ignoring unreadable .env file: {err}"),
    }
}

fn load_or_default(
    path: &Path,
    required: bool,
) -> anyhow::Result<(AppConfig, Option<PathBuf>)> {
    if !required && !path.exists() {
        return Ok((AppConfig::default(), None));
    }
    let config = load_config(path)?;
    Ok((config, Some(path.to_path_buf())))
}

fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(name) = &cli.device_name {
        config.general.device_name = Some(name.clone());
    }
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = Some(dir.clone());
    }
    if cli.no_network {
        config.network.enabled = false;
    }
}
