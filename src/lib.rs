// ==========================================
// IPC 报价数量监控系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + calamine / rust_xlsxwriter
// 系统定位: 报价数量监控看板 (Controle de Cotações)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - Excel / CSV
pub mod export;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 命令行集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CriticalityBand, CriticalityOption, Month};

// 领域实体
pub use domain::{ExceptionRegistry, QuotationRecord, QuotationTable, UploadBatch, UploadKind};

// 引擎
pub use engine::{AggregationEngine, ChartEngine, DetailFilter, MergeEngine};

// API
pub use api::{ConfigApi, DashboardApi, DetailApi, UploadApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Controle de Cotações";
