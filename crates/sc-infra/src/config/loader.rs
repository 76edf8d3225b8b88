//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML configuration file into the [`AppConfig`] DTO. Fields the
//! file leaves out take the DTO defaults; deciding what to do when the file
//! is missing is up to the caller.
//! 仅负责读取和解析 TOML，缺失文件的处理由调用方决定。

use anyhow::Context;
use sc_core::config::AppConfig;
use std::path::Path;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if:
/// - File cannot be read (I/O error)
/// - Content is not valid TOML or does not match the config shape
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    AppConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}
