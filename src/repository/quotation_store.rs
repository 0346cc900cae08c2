// ==========================================
// IPC 报价数量监控系统 - 报价存储接口
// ==========================================
// 红线: Repository 不含业务逻辑
// 语义: 每次上传整体替换对应的表
// ==========================================

use crate::domain::exception::ExceptionRegistry;
use crate::domain::quotation::QuotationTable;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::sync::Mutex;

/// 持久化表名: 报价宽表
pub const QUOTATION_TABLE: &str = "controle_cotacoes";
/// 持久化表名: 例外清单
pub const EXCEPTION_TABLE: &str = "excessoes";

// ==========================================
// QuotationStore Trait
// ==========================================
// 实现者: SqliteQuotationStore / InMemoryQuotationStore
pub trait QuotationStore: Send + Sync {
    /// 读取报价宽表（表不存在时返回空表）
    fn load_quotations(&self) -> RepositoryResult<QuotationTable>;

    /// 整体替换报价宽表
    fn replace_quotations(&self, table: &QuotationTable) -> RepositoryResult<()>;

    /// 读取例外清单（表不存在时返回空清单）
    fn load_exceptions(&self) -> RepositoryResult<ExceptionRegistry>;

    /// 整体替换例外清单
    fn replace_exceptions(&self, registry: &ExceptionRegistry) -> RepositoryResult<()>;
}

// ==========================================
// InMemoryQuotationStore - 内存实现
// ==========================================
#[derive(Debug, Default)]
pub struct InMemoryQuotationStore {
    quotations: Mutex<QuotationTable>,
    exceptions: Mutex<ExceptionRegistry>,
}

impl InMemoryQuotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(quotations: QuotationTable, exceptions: ExceptionRegistry) -> Self {
        Self {
            quotations: Mutex::new(quotations),
            exceptions: Mutex::new(exceptions),
        }
    }
}

fn lock_err<E: std::fmt::Display>(e: E) -> RepositoryError {
    RepositoryError::LockError(e.to_string())
}

impl QuotationStore for InMemoryQuotationStore {
    fn load_quotations(&self) -> RepositoryResult<QuotationTable> {
        Ok(self.quotations.lock().map_err(lock_err)?.clone())
    }

    fn replace_quotations(&self, table: &QuotationTable) -> RepositoryResult<()> {
        *self.quotations.lock().map_err(lock_err)? = table.clone();
        Ok(())
    }

    fn load_exceptions(&self) -> RepositoryResult<ExceptionRegistry> {
        Ok(self.exceptions.lock().map_err(lock_err)?.clone())
    }

    fn replace_exceptions(&self, registry: &ExceptionRegistry) -> RepositoryResult<()> {
        *self.exceptions.lock().map_err(lock_err)? = registry.clone();
        Ok(())
    }
}
