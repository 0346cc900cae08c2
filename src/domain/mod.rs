// ==========================================
// IPC 报价数量监控系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod exception;
pub mod quotation;
pub mod summary;
pub mod types;
pub mod upload;

// 重导出核心类型
pub use exception::ExceptionRegistry;
pub use quotation::{item_label, QuotationRecord, QuotationTable, RecordKey, NATIONAL_REGION};
pub use summary::{
    BarChartSeries, BarPoint, CellStyle, ComparativeSummary, DetailCell, DetailRow, DetailTable,
    HistoricalChart, HistoricalSeries, LongFormQuotation, ReferenceLine, SeriesPoint, StatusView,
};
pub use types::{
    CriticalityBand, CriticalityOption, Month, EXCEPTION_COLOR, EXCEPTION_COUNT_LABEL,
    EXCEPTION_DESCRIPTION, EXCEPTION_LABEL,
};
pub use upload::{UploadBatch, UploadKind};
