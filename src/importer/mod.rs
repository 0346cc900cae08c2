// ==========================================
// IPC 报价数量监控系统 - 导入层
// ==========================================
// 职责: 读取上传的工作簿, 生成报价宽表与例外清单
// 支持: Excel (.xlsx / .xls)
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod exception_importer;
pub mod file_parser;
pub mod header_normalizer;
pub mod quotation_importer;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use exception_importer::ExceptionImporter;
pub use file_parser::{CellValue, ExcelWorkbook, InMemoryWorkbook, SheetGrid, WorkbookSource};
pub use header_normalizer::{classify_header, clean_header, HeaderKind, MonthWindow};
pub use quotation_importer::QuotationImporter;
