//! Application configuration domain model

mod app_config;

pub use app_config::{
    AnalysisConfig, AppConfig, ConfigError, GeneralConfig, NetworkConfig, StorageConfig,
    SyncConfig,
};
