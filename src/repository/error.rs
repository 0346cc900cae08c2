// ==========================================
// IPC 报价数量监控系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("registro não encontrado: {entity} (id={id})")]
    NotFound { entity: String, id: String },

    #[error("falha ao conectar ao banco de dados: {0}")]
    DatabaseConnectionError(String),

    #[error("falha ao obter o bloqueio do banco de dados: {0}")]
    LockError(String),

    #[error("falha na transação: {0}")]
    DatabaseTransactionError(String),

    #[error("falha na consulta: {0}")]
    DatabaseQueryError(String),

    #[error("estrutura de tabela inválida ({table}): {message}")]
    SchemaError { table: String, message: String },

    // ===== 数据质量错误 =====
    #[error("valor inválido (campo={field}): {message}")]
    FieldValueError { field: String, message: String },

    // ===== 通用错误 =====
    #[error("erro interno: {0}")]
    InternalError(String),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::InternalError(format!("falha de serialização: {}", err))
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
