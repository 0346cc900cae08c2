// ==========================================
// IPC 报价数量监控系统 - SQLite 报价存储
// ==========================================
// 表结构: controle_cotacoes ("UF", "Código", "Descrição", 每月一列 "MM/YYYY" REAL)
//         excessoes ("DESCRIÇÃO")
// 写入: DROP + CREATE + INSERT, 同一事务内完成
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection, table_exists};
use crate::domain::exception::ExceptionRegistry;
use crate::domain::quotation::{QuotationRecord, QuotationTable, RecordKey};
use crate::domain::types::Month;
use crate::importer::header_normalizer::{CODE_HEADER, DESCRIPTION_HEADER, REGION_HEADER};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::quotation_store::{QuotationStore, EXCEPTION_TABLE, QUOTATION_TABLE};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

/// excessoes 表的列名
const EXCEPTION_COLUMN: &str = "DESCRIÇÃO";

pub struct SqliteQuotationStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteQuotationStore {
    /// 创建新的 SqliteQuotationStore 实例
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

    /// 从已有连接创建存储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

/// SQL 标识符加引号（列名含 '/' 与重音字符）
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Text(s) => Some(s.trim().to_string()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        Value::Real(f) => Some(f.to_string()),
        Value::Blob(_) => None,
    }
}

fn value_to_count(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Real(f) => Some(*f),
        Value::Text(s) => s.trim().parse::<f64>().ok(),
        Value::Null | Value::Blob(_) => None,
    }
    .filter(|v| v.is_finite())
}

impl QuotationStore for SqliteQuotationStore {
    #[instrument(skip(self))]
    fn load_quotations(&self) -> RepositoryResult<QuotationTable> {
        let conn = self.get_conn()?;
        if !table_exists(&conn, QUOTATION_TABLE)? {
            debug!("报价表不存在, 返回空表");
            return Ok(QuotationTable::new());
        }

        let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_ident(QUOTATION_TABLE)))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let schema_error = |message: String| RepositoryError::SchemaError {
            table: QUOTATION_TABLE.to_string(),
            message,
        };
        let position = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| schema_error(format!("coluna ausente: {}", name)))
        };
        let region_idx = position(REGION_HEADER)?;
        let code_idx = position(CODE_HEADER)?;
        let description_idx = position(DESCRIPTION_HEADER)?;

        let mut month_cols: Vec<(usize, Month)> = Vec::new();
        for (idx, name) in columns.iter().enumerate() {
            if idx == region_idx || idx == code_idx || idx == description_idx {
                continue;
            }
            let month = Month::parse(name)
                .ok_or_else(|| schema_error(format!("coluna de mês inválida: {}", name)))?;
            month_cols.push((idx, month));
        }

        let mut table = QuotationTable::with_months(month_cols.iter().map(|(_, m)| *m));
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let text_at = |idx: usize| -> rusqlite::Result<String> {
                Ok(value_to_text(&row.get::<_, Value>(idx)?).unwrap_or_default())
            };
            let key = RecordKey::new(text_at(region_idx)?, text_at(code_idx)?, text_at(description_idx)?);

            let mut record = QuotationRecord::new(key);
            for &(idx, month) in &month_cols {
                record.set_value(month, value_to_count(&row.get::<_, Value>(idx)?));
            }
            if !table.push(record) {
                warn!("持久化报价表中存在重复主键, 保留首行");
            }
        }

        debug!(rows = table.len(), months = table.months().len(), "报价表读取完成");
        Ok(table)
    }

    #[instrument(skip(self, table), fields(rows = table.len(), months = table.months().len()))]
    fn replace_quotations(&self, table: &QuotationTable) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let months: Vec<Month> = table.months().iter().copied().collect();
        let mut column_defs = vec![
            format!("{} TEXT NOT NULL", quote_ident(REGION_HEADER)),
            format!("{} TEXT NOT NULL", quote_ident(CODE_HEADER)),
            format!("{} TEXT NOT NULL", quote_ident(DESCRIPTION_HEADER)),
        ];
        column_defs.extend(months.iter().map(|m| format!("{} REAL", quote_ident(&m.to_string()))));

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({columns});",
            table = quote_ident(QUOTATION_TABLE),
            columns = column_defs.join(", ")
        ))?;

        let placeholders: Vec<String> = (1..=months.len() + 3).map(|i| format!("?{}", i)).collect();
        {
            let mut insert = tx.prepare(&format!(
                "INSERT INTO {} VALUES ({})",
                quote_ident(QUOTATION_TABLE),
                placeholders.join(", ")
            ))?;
            for record in table.rows() {
                let mut values: Vec<Value> = vec![
                    Value::Text(record.key.region.clone()),
                    Value::Text(record.key.code.clone()),
                    Value::Text(record.key.description.clone()),
                ];
                values.extend(
                    months
                        .iter()
                        .map(|m| record.value(*m).map_or(Value::Null, Value::Real)),
                );
                insert.execute(params_from_iter(values))?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        debug!("报价表已整体替换");
        Ok(())
    }

    fn load_exceptions(&self) -> RepositoryResult<ExceptionRegistry> {
        let conn = self.get_conn()?;
        if !table_exists(&conn, EXCEPTION_TABLE)? {
            return Ok(ExceptionRegistry::new());
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {}",
            quote_ident(EXCEPTION_COLUMN),
            quote_ident(EXCEPTION_TABLE)
        ))?;
        let descriptions = stmt
            .query_map([], |row| row.get::<_, Value>(0))?
            .map(|v| v.map(|value| value_to_text(&value)))
            .collect::<rusqlite::Result<Vec<Option<String>>>>()?;

        Ok(descriptions.into_iter().flatten().collect())
    }

    #[instrument(skip(self, registry), fields(count = registry.len()))]
    fn replace_exceptions(&self, registry: &ExceptionRegistry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({column} TEXT NOT NULL);",
            table = quote_ident(EXCEPTION_TABLE),
            column = quote_ident(EXCEPTION_COLUMN)
        ))?;
        {
            let mut insert = tx.prepare(&format!(
                "INSERT INTO {} ({}) VALUES (?1)",
                quote_ident(EXCEPTION_TABLE),
                quote_ident(EXCEPTION_COLUMN)
            ))?;
            for description in registry.iter() {
                insert.execute(params![description])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }
}
