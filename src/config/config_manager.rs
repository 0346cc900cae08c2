// ==========================================
// IPC 报价数量监控系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::ingest_settings::{
    parse_region_list, IngestSettings, DEFAULT_EXCEPTION_SHEET, DEFAULT_HEADER_SKIP_ROWS,
    DEFAULT_LOCALE, DEFAULT_REGION_SHEETS, DEFAULT_WINDOW_START,
};
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::domain::types::Month;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// 支持的界面语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["pt-BR", "en"];

// ==========================================
// ConfigEntry - 配置项（含生效值）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    /// 未写入 config_kv, 使用默认值
    pub is_default: bool,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 会对传入连接再次应用统一 PRAGMA 并建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = lock(&conn)?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = lock(&self.conn)?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn get_config_or_default(&self, key: &str) -> RepositoryResult<(String, bool)> {
        match self.get_global_config_value(key)? {
            Some(v) => Ok((v, false)),
            None => Ok((default_value(key).unwrap_or_default(), true)),
        }
    }

    /// 写入配置（先校验, 再 UPSERT）
    ///
    /// # 返回
    /// - Ok(String): 规范化后写入的值
    /// - Err(FieldValueError): 未知键或非法值
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<String> {
        let normalized = validate_value(key, value)?;

        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, normalized],
        )?;

        info!(key = key, value = %normalized, "配置已更新");
        Ok(normalized)
    }

    /// 列出全部已知配置项及其生效值
    pub fn list(&self) -> RepositoryResult<Vec<ConfigEntry>> {
        config_keys::ALL
            .iter()
            .map(|key| {
                let (value, is_default) = self.get_config_or_default(key)?;
                Ok(ConfigEntry {
                    key: key.to_string(),
                    value,
                    is_default,
                })
            })
            .collect()
    }

    /// 读取导入参数
    ///
    /// 已存储但无法解析的值回退为默认值（记录 warn）
    pub fn load_ingest_settings(&self) -> RepositoryResult<IngestSettings> {
        let defaults = IngestSettings::default();

        let region_sheets = self
            .parsed(config_keys::REGION_SHEETS, |v| parse_region_list(v))?
            .unwrap_or(defaults.region_sheets);
        let header_skip_rows = self
            .parsed(config_keys::HEADER_SKIP_ROWS, |v| {
                v.trim().parse::<usize>().map_err(|e| e.to_string())
            })?
            .unwrap_or(defaults.header_skip_rows);
        let window_start = self
            .parsed(config_keys::WINDOW_START, |v| v.parse::<Month>())?
            .unwrap_or(defaults.window_start);
        let exception_sheet = self
            .get_global_config_value(config_keys::EXCEPTION_SHEET)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.exception_sheet);

        Ok(IngestSettings {
            region_sheets,
            header_skip_rows,
            window_start,
            exception_sheet,
        })
    }

    /// 界面语言
    pub fn locale(&self) -> RepositoryResult<String> {
        let (value, _) = self.get_config_or_default(config_keys::LOCALE)?;
        if SUPPORTED_LOCALES.contains(&value.as_str()) {
            Ok(value)
        } else {
            warn!(config_key = config_keys::LOCALE, raw_value = %value, "不支持的语言, 使用默认值");
            Ok(DEFAULT_LOCALE.to_string())
        }
    }

    fn parsed<T, F>(&self, key: &str, parse: F) -> RepositoryResult<Option<T>>
    where
        F: FnOnce(&str) -> Result<T, String>,
    {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(None),
        };
        match parse(&raw) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                warn!(config_key = key, raw_value = %raw, error = %e, "配置格式错误, 使用默认值");
                Ok(None)
            }
        }
    }
}

fn lock(conn: &Arc<Mutex<Connection>>) -> RepositoryResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| RepositoryError::LockError(e.to_string()))
}

/// 配置键默认值
pub fn default_value(key: &str) -> Option<String> {
    let value = match key {
        config_keys::REGION_SHEETS => DEFAULT_REGION_SHEETS.join(","),
        config_keys::HEADER_SKIP_ROWS => DEFAULT_HEADER_SKIP_ROWS.to_string(),
        config_keys::WINDOW_START => DEFAULT_WINDOW_START.to_string(),
        config_keys::EXCEPTION_SHEET => DEFAULT_EXCEPTION_SHEET.to_string(),
        config_keys::LOCALE => DEFAULT_LOCALE.to_string(),
        _ => return None,
    };
    Some(value)
}

/// 校验并规范化配置值
pub fn validate_value(key: &str, value: &str) -> RepositoryResult<String> {
    let invalid = |message: String| RepositoryError::FieldValueError {
        field: key.to_string(),
        message,
    };

    match key {
        config_keys::REGION_SHEETS => parse_region_list(value).map(|r| r.join(",")).map_err(invalid),
        config_keys::HEADER_SKIP_ROWS => value
            .trim()
            .parse::<usize>()
            .map(|n| n.to_string())
            .map_err(|e| invalid(e.to_string())),
        config_keys::WINDOW_START => value
            .parse::<Month>()
            .map(|m| m.to_string())
            .map_err(invalid),
        config_keys::EXCEPTION_SHEET => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(invalid("o nome da aba não pode ser vazio".to_string()))
            } else {
                Ok(trimmed.to_string())
            }
        }
        config_keys::LOCALE => {
            let trimmed = value.trim();
            if SUPPORTED_LOCALES.contains(&trimmed) {
                Ok(trimmed.to_string())
            } else {
                Err(invalid(format!("idiomas suportados: {}", SUPPORTED_LOCALES.join(", "))))
            }
        }
        _ => Err(invalid("chave de configuração desconhecida".to_string())),
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导入
    pub const REGION_SHEETS: &str = "ingest/region_sheets";
    pub const HEADER_SKIP_ROWS: &str = "ingest/header_skip_rows";
    pub const WINDOW_START: &str = "ingest/window_start";
    pub const EXCEPTION_SHEET: &str = "ingest/exception_sheet";

    // 界面
    pub const LOCALE: &str = "ui/locale";

    pub const ALL: [&str; 5] = [REGION_SHEETS, HEADER_SKIP_ROWS, WINDOW_START, EXCEPTION_SHEET, LOCALE];
}
