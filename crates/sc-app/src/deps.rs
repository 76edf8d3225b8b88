//! # Application Dependencies / 应用依赖
//!
//! This module defines the dependency grouping for App construction.
//! 此模块定义 App 构造的依赖分组。
//!
//! **Note / 注意**: This is NOT a Builder pattern.
//! - No build steps / 无构建步骤
//! - No default values / 无默认值
//! - Just parameter grouping / 仅用于参数打包

use std::sync::Arc;
use sc_core::ports::*;

/// Application dependency grouping.
/// 应用依赖分组。
///
/// All dependencies are required; the bootstrap layer picks the adapters.
pub struct AppDeps {
    // Storage dependencies / 存储依赖
    pub storage: Arc<dyn KeyValueStorePort>,

    // Analysis dependencies / 分析依赖
    pub analyzer: Arc<dyn ContentAnalyzerPort>,

    // Network dependencies / 网络依赖
    pub network: Arc<dyn NetworkPort>,

    // Clipboard dependencies / 剪贴板依赖
    pub clipboard: Arc<dyn SystemClipboardPort>,

    // UI dependencies / UI 依赖
    pub notifier: Arc<dyn NotifierPort>,

    // System dependencies / 系统依赖
    pub clock: Arc<dyn ClockPort>,
}
