// ==========================================
// IPC 报价数量监控系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供命令行调用
// 约束: 存储通过 QuotationStore 显式注入
// ==========================================

pub mod config_api;
pub mod dashboard_api;
pub mod detail_api;
pub mod error;
pub mod upload_api;

// 重导出核心类型
pub use config_api::ConfigApi;
pub use dashboard_api::{hex_color, DashboardApi, FilterOptions, LegendEntry};
pub use detail_api::DetailApi;
pub use error::{ApiError, ApiResult};
pub use upload_api::{ExceptionUploadResponse, QuotationUploadResponse, UploadApi};
