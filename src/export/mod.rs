// ==========================================
// IPC 报价数量监控系统 - 导出层
// ==========================================
// 支持: .xlsx（rust_xlsxwriter, 单工作表, 按等级着色）/ .csv
// ==========================================

pub mod csv_export;
pub mod xlsx_export;

use std::path::Path;
use thiserror::Error;

pub use csv_export::{write_detail_csv, write_history_csv, write_last_month_csv, write_status_csv};
pub use xlsx_export::{write_detail_xlsx, write_status_xlsx, DETAIL_SHEET, STATUS_SHEET};

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("formato de exportação não suportado: {0} (use .xlsx ou .csv)")]
    UnsupportedFormat(String),

    #[error("falha ao gerar o Excel: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("falha ao gerar o CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("falha ao gravar o arquivo: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// 导出格式（按文件扩展名）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> ExportResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ExportError::UnsupportedFormat(ext)),
        }
    }
}
