// ==========================================
// IPC 报价数量监控系统 - 上传历史仓储
// ==========================================
// 表: historico_uploads
// 红线: 只追加, 不修改历史记录
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::upload::{UploadBatch, UploadKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct UploadLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UploadLogRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 记录一次上传
    pub fn insert(&self, batch: &UploadBatch) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO historico_uploads (
                batch_id, kind, file_name, uploaded_at,
                row_count, months_added, unmatched_rows
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                batch.batch_id,
                batch.kind.to_string(),
                batch.file_name,
                batch.uploaded_at,
                batch.row_count as i64,
                serde_json::to_string(&batch.months_added)?,
                batch.unmatched_rows as i64,
            ],
        )?;
        Ok(())
    }

    /// 最近的上传记录（按时间倒序）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<UploadBatch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, kind, file_name, uploaded_at,
                   row_count, months_added, unmatched_rows
            FROM historico_uploads
            ORDER BY uploaded_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )?;

        let batches = stmt
            .query_map(params![limit as i64], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(batches)
    }
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err.into())
}

fn map_row(row: &Row<'_>) -> SqliteResult<UploadBatch> {
    let kind: String = row.get(1)?;
    let months_json: String = row.get(5)?;
    let uploaded_at: DateTime<Utc> = row.get(3)?;

    Ok(UploadBatch {
        batch_id: row.get(0)?,
        kind: kind.parse::<UploadKind>().map_err(|e| conversion_error(1, e))?,
        file_name: row.get(2)?,
        uploaded_at,
        row_count: row.get::<_, i64>(4)?.max(0) as usize,
        months_added: serde_json::from_str(&months_json).map_err(|e| conversion_error(5, e))?,
        unmatched_rows: row.get::<_, i64>(6)?.max(0) as usize,
    })
}
