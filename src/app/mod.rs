// ==========================================
// IPC 报价数量监控系统 - 应用层
// ==========================================
// 职责: 命令行集成, 连接终端与后端 API
// ==========================================

pub mod cli;
pub mod render;
pub mod state;

// 重导出
pub use cli::{run, Cli, Command};
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
