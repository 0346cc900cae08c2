// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 基于临时数据库构建完整的 AppState
// ==========================================

use ipc_cotacoes::app::AppState;
use ipc_cotacoes::config::config_keys;
use ipc_cotacoes::logging;
use std::error::Error;
use tempfile::{NamedTempFile, TempDir};

/// API测试环境
///
/// 临时文件随环境一起释放
pub struct ApiTestEnv {
    pub state: AppState,
    pub db_path: String,
    pub work_dir: TempDir,
    _db_file: NamedTempFile,
}

impl ApiTestEnv {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        logging::init_test();
        let db_file = NamedTempFile::new()?;
        let db_path = db_file.path().to_string_lossy().to_string();
        let state = AppState::new(db_path.clone())?;
        Ok(Self {
            state,
            db_path,
            work_dir: tempfile::tempdir()?,
            _db_file: db_file,
        })
    }

    /// 只读取给定地区的工作表
    pub fn with_regions(regions: &str) -> Result<Self, Box<dyn Error>> {
        let env = Self::new()?;
        env.state
            .config_api
            .update_config(config_keys::REGION_SHEETS, regions)?;
        Ok(env)
    }

    /// 在同一数据库上重新创建 AppState（模拟重启）
    pub fn reopen(&self) -> Result<AppState, Box<dyn Error>> {
        Ok(AppState::new(self.db_path.clone())?)
    }

    pub fn file(&self, name: &str) -> std::path::PathBuf {
        self.work_dir.path().join(name)
    }
}
