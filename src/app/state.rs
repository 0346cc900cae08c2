// ==========================================
// IPC 报价数量监控系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和 API 实例
// 说明: 所有仓储共享同一个 SQLite 连接
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{ConfigApi, DashboardApi, DetailApi, UploadApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::repository::{QuotationStore, SqliteQuotationStore, UploadLogRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "IPC_COTACOES_DB";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 上传 API
    pub upload_api: Arc<UploadApi>,

    /// 看板 API
    pub dashboard_api: Arc<DashboardApi>,

    /// 明细 API
    pub detail_api: Arc<DetailApi>,

    /// 配置管理 API
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 为内存库）
    ///
    /// # 返回
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("não foi possível abrir o banco de dados: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("falha ao criar as tabelas: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let store: Arc<dyn QuotationStore> = Arc::new(SqliteQuotationStore::from_connection(conn.clone()));
        let upload_log = Arc::new(UploadLogRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("não foi possível criar o ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let upload_api = Arc::new(UploadApi::new(store.clone(), upload_log, config_manager.clone()));
        let dashboard_api = Arc::new(DashboardApi::new(store.clone()));
        let detail_api = Arc::new(DetailApi::new(store));
        let config_api = Arc::new(ConfigApi::new(config_manager));

        if let Err(e) = config_api.apply_locale() {
            tracing::warn!("界面语言初始化失败(使用默认语言): {}", e);
        }

        tracing::info!("AppState初始化完成");
        Ok(Self {
            db_path,
            upload_api,
            dashboard_api,
            detail_api,
            config_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: IPC_COTACOES_DB 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./controle_cotacoes.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("ipc-cotacoes");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("controle_cotacoes.db");
        }
    }

    path.to_string_lossy().to_string()
}

