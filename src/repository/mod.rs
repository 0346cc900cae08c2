// ==========================================
// IPC 报价数量监控系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口, 屏蔽数据库细节
// 约束: 数据值一律参数化; 动态列名只来自 Month 格式化结果
// ==========================================

pub mod error;
pub mod quotation_store;
pub mod quotation_store_sqlite;
pub mod upload_log_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use quotation_store::{InMemoryQuotationStore, QuotationStore, EXCEPTION_TABLE, QUOTATION_TABLE};
pub use quotation_store_sqlite::SqliteQuotationStore;
pub use upload_log_repo::UploadLogRepository;
