// ==========================================
// IPC 报价数量监控系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 错误信息直接展示给用户（葡语）
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("arquivo não encontrado: {0}")]
    FileNotFound(String),

    #[error("formato de arquivo não suportado: {0} (apenas .xlsx/.xls)")]
    UnsupportedFormat(String),

    #[error("falha ao ler o arquivo: {0}")]
    FileReadError(String),

    #[error("falha ao interpretar o Excel: {0}")]
    ExcelParseError(String),

    // ===== 结构错误 (ParseError) =====
    #[error("aba obrigatória ausente: '{0}'")]
    SheetNotFound(String),

    #[error("aba '{sheet}': linha de cabeçalho ausente (esperada na linha {row})")]
    HeaderRowMissing { sheet: String, row: usize },

    #[error("aba '{sheet}': coluna obrigatória ausente: '{column}'")]
    ColumnMissing { sheet: String, column: String },

    #[error("aba '{sheet}': cabeçalho de mês inválido: '{header}'")]
    InvalidMonthHeader { sheet: String, header: String },

    // ===== 配置错误 =====
    #[error("configuração inválida (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 通用错误 =====
    #[error("erro interno: {0}")]
    InternalError(String),
}

impl ImportError {
    /// 是否为文件结构错误（缺少工作表/列/表头）
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ImportError::ExcelParseError(_)
                | ImportError::SheetNotFound(_)
                | ImportError::HeaderRowMissing { .. }
                | ImportError::ColumnMissing { .. }
                | ImportError::InvalidMonthHeader { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
