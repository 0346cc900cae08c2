// ==========================================
// IPC 报价数量监控系统 - API 层错误类型
// ==========================================
// 职责: 汇总下层错误, 转换为面向用户的消息
// 约束: code() 为机器可读的稳定错误码（--json 输出）
// ==========================================

use crate::export::ExportError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("entrada inválida: {0}")]
    InvalidInput(String),

    // ==========================================
    // 导入错误（文件结构错误不修改已存储的数据）
    // ==========================================
    #[error("erro ao interpretar o arquivo: {0}")]
    ParseError(String),

    #[error("falha na importação: {0}")]
    ImportError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("erro de banco de dados: {0}")]
    DatabaseError(String),

    #[error("falha ao conectar ao banco de dados: {0}")]
    DatabaseConnectionError(String),

    #[error("falha na transação: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 导出错误
    // ==========================================
    #[error("falha na exportação: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("erro interno: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 稳定错误码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::ParseError(_) => "PARSE_ERROR",
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
            ApiError::DatabaseTransactionError(_) => "DATABASE_TRANSACTION_ERROR",
            ApiError::ExportError(_) => "EXPORT_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::DatabaseError(format!("{} (id={}) não encontrado", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => ApiError::DatabaseTransactionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("falha ao obter o bloqueio: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::SchemaError { table, message } => {
                ApiError::DatabaseError(format!("tabela {}: {}", table, message))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("{}: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        if err.is_parse_error() {
            ApiError::ParseError(err.to_string())
        } else {
            match err {
                ImportError::ConfigValueError { .. } => ApiError::InvalidInput(err.to_string()),
                _ => ApiError::ImportError(err.to_string()),
            }
        }
    }
}

// ==========================================
// 从 ExportError 转换
// ==========================================
impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
