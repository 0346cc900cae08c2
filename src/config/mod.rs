// ==========================================
// IPC 报价数量监控系统 - 配置层
// ==========================================
// 职责: 导入参数与界面语言的读取/写入
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod ingest_settings;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigEntry, ConfigManager};
pub use ingest_settings::IngestSettings;
