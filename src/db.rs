// ==========================================
// IPC 报价数量监控系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout, 减少多会话写入时的偶发 busy 错误
// - 建立固定结构的表（宽表由存储层按月份列动态重建）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 慢 SQL 阈值环境变量（毫秒, 未设置则不记录）
pub const SLOW_SQL_ENV: &str = "IPC_COTACOES_SLOW_SQL_MS";

static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);

const FIXED_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL DEFAULT 'global',
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS historico_uploads (
    batch_id TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    file_name TEXT,
    uploaded_at TEXT NOT NULL,
    row_count INTEGER NOT NULL,
    months_added TEXT NOT NULL,
    unmatched_rows INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_historico_uploads_time ON historico_uploads(uploaded_at);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    install_slow_sql_profile(&mut conn);
    Ok(conn)
}

/// 建立固定结构的表并写入 schema_version（幂等）
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(FIXED_SCHEMA)?;
    if read_schema_version(conn)?.is_none() {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [CURRENT_SCHEMA_VERSION],
        )?;
    }
    Ok(())
}

/// 读取 schema_version（若表不存在或为空则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    if !table_exists(conn, "schema_version")? {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 表是否存在
pub fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1",
            [name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// 安装慢 SQL 日志（阈值取自 IPC_COTACOES_SLOW_SQL_MS）
pub fn install_slow_sql_profile(conn: &mut Connection) {
    let threshold = std::env::var(SLOW_SQL_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0);
    SLOW_SQL_THRESHOLD_MS.store(threshold, Ordering::Relaxed);

    if threshold == 0 {
        conn.profile(None);
        return;
    }
    conn.profile(Some(slow_sql_callback));
}

fn slow_sql_callback(sql: &str, duration: Duration) {
    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold > 0 && ms >= threshold {
        let short: String = sql.trim().replace('\n', " ").chars().take(240).collect();
        tracing::warn!(elapsed_ms = ms, threshold_ms = threshold, sql = %short, "慢 SQL");
    }
}
