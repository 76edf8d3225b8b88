//! # Dependency Injection / 依赖注入模块
//!
//! Creates the infra and platform adapters and groups them into [`AppDeps`].
//! 创建 infra 层与 platform 层的具体实现并注入到 App。
//!
//! Adapter choices follow configuration only:
//!
//! - Gemini analyzer when analysis is enabled and an API key resolves,
//!   otherwise the local heuristic analyzer.
//! - libp2p network unless networking is disabled.
//!
//! This is the only place that depends on sc-infra, sc-platform and sc-app together.

use std::path::Path;
use std::sync::Arc;

use sc_app::AppDeps;
use sc_core::config::{AnalysisConfig, AppConfig};
use sc_core::ports::*;
use sc_infra::fs::{identity_dir, storage_path};
use sc_infra::{FileKeyValueStore, GeminiAnalyzer, HeuristicAnalyzer, SystemClock};
use sc_platform::{ClipboardRsAdapter, DisabledNetworkAdapter, FileIdentityStore, Libp2pNetworkAdapter};
use tracing::{info, warn};

use super::config::ResolvedConfig;

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Analyzer initialization failed: {0}")]
    AnalyzerInit(String),

    #[error("Network initialization failed: {0}")]
    NetworkInit(String),
}

/// Infrastructure layer implementations / 基础设施层实现
struct InfraLayer {
    storage: Arc<dyn KeyValueStorePort>,
    analyzer: Arc<dyn ContentAnalyzerPort>,
    clock: Arc<dyn ClockPort>,
}

/// Platform layer implementations / 平台层实现
struct PlatformLayer {
    network: Arc<dyn NetworkPort>,
    clipboard: Arc<dyn SystemClipboardPort>,
}

fn create_analyzer(config: &AnalysisConfig) -> WiringResult<Arc<dyn ContentAnalyzerPort>> {
    if !config.enabled {
        info!("AI analysis disabled, classifying clips locally");
        return Ok(Arc::new(HeuristicAnalyzer));
    }

    match config.resolve_api_key() {
        Some(api_key) => {
            let analyzer = GeminiAnalyzer::new(config, api_key)
                .map_err(|e| WiringError::AnalyzerInit(format!("{e:#}")))?;
            info!(model = %config.model, "Using Gemini analyzer");
            Ok(Arc::new(analyzer))
        }
        None => {
            warn!(
                env_var = %config.api_key_env,
                "No API key configured, classifying clips locally"
            );
            Ok(Arc::new(HeuristicAnalyzer))
        }
    }
}

fn create_infra_layer(config: &AppConfig, data_dir: &Path) -> WiringResult<InfraLayer> {
    let storage = FileKeyValueStore::new(storage_path(data_dir), config.storage.quota_bytes);
    info!(path = %storage.path().display(), "Using file key/value store");

    Ok(InfraLayer {
        storage: Arc::new(storage),
        analyzer: create_analyzer(&config.analysis)?,
        clock: Arc::new(SystemClock),
    })
}

fn create_platform_layer(config: &AppConfig, data_dir: &Path) -> WiringResult<PlatformLayer> {
    let network: Arc<dyn NetworkPort> = if config.network.enabled {
        let identity_store = Arc::new(FileIdentityStore::new(identity_dir(data_dir)));
        let adapter = Libp2pNetworkAdapter::new(identity_store, &config.network_config())
            .map_err(|e| WiringError::NetworkInit(format!("{e:#}")))?;
        Arc::new(adapter)
    } else {
        info!("Networking disabled");
        Arc::new(DisabledNetworkAdapter::new())
    };

    Ok(PlatformLayer {
        network,
        clipboard: Arc::new(ClipboardRsAdapter::new()),
    })
}

/// Wire all dependencies for the application.
/// 为应用程序装配所有依赖。
pub fn wire_dependencies(
    resolved: &ResolvedConfig,
    notifier: Arc<dyn NotifierPort>,
) -> WiringResult<AppDeps> {
    let infra = create_infra_layer(&resolved.config, &resolved.data_dir)?;
    let platform = create_platform_layer(&resolved.config, &resolved.data_dir)?;

    Ok(AppDeps {
        storage: infra.storage,
        analyzer: infra.analyzer,
        network: platform.network,
        clipboard: platform.clipboard,
        notifier,
        clock: infra.clock,
    })
}
