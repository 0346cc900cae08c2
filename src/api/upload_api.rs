// ==========================================
// IPC 报价数量监控系统 - 上传 API
// ==========================================
// 职责: 报价文件/例外文件上传, 上传历史查询
// 流程: 解析 → 读取已存数据 → 增量合并 → 整体替换 → 记录批次
// 红线: 解析失败时已存数据保持不变
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::exception::ExceptionRegistry;
use crate::domain::quotation::QuotationTable;
use crate::domain::types::Month;
use crate::domain::upload::{UploadBatch, UploadKind};
use crate::engine::MergeEngine;
use crate::i18n::t_with_args;
use crate::importer::{ExceptionImporter, ExcelWorkbook, QuotationImporter, WorkbookSource};
use crate::repository::{QuotationStore, UploadLogRepository};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 报价上传结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationUploadResponse {
    pub batch_id: String,
    pub file_name: Option<String>,
    /// 首次上传（已存表为空）
    pub first_load: bool,
    /// 上传文件解析出的行数
    pub parsed_rows: usize,
    /// 新增的月份列
    pub months_added: Vec<Month>,
    /// 已存表中不存在、被忽略的新商品行
    pub unmatched_rows: usize,
    /// 合并后表的行数
    pub total_rows: usize,
    /// 合并后表的月份列数
    pub total_months: usize,
    /// 面向用户的摘要
    pub message: String,
}

/// 例外清单上传结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionUploadResponse {
    pub batch_id: String,
    pub file_name: Option<String>,
    pub count: usize,
    pub message: String,
}

pub struct UploadApi {
    store: Arc<dyn QuotationStore>,
    upload_log: Arc<UploadLogRepository>,
    config: Arc<ConfigManager>,
}

impl UploadApi {
    pub fn new(
        store: Arc<dyn QuotationStore>,
        upload_log: Arc<UploadLogRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            store,
            upload_log,
            config,
        }
    }

    /// 上传报价工作簿文件
    pub fn upload_quotations(&self, path: &Path, today: NaiveDate) -> ApiResult<QuotationUploadResponse> {
        let mut workbook = ExcelWorkbook::open(path)?;
        self.upload_quotations_from(&mut workbook, file_name_of(path), today)
    }

    /// 上传报价工作簿（任意工作簿来源）
    #[instrument(skip(self, workbook), fields(file_name = ?file_name))]
    pub fn upload_quotations_from<W: WorkbookSource>(
        &self,
        workbook: &mut W,
        file_name: Option<String>,
        today: NaiveDate,
    ) -> ApiResult<QuotationUploadResponse> {
        let settings = self.config.load_ingest_settings()?;
        let incoming = QuotationImporter::new(settings).import(workbook, today)?;
        self.merge_and_store(incoming, file_name)
    }

    fn merge_and_store(
        &self,
        incoming: QuotationTable,
        file_name: Option<String>,
    ) -> ApiResult<QuotationUploadResponse> {
        let parsed_rows = incoming.len();
        let current = self.store.load_quotations()?;
        let outcome = MergeEngine::new().merge(current, incoming);

        let changed = outcome.first_load || !outcome.added_months.is_empty();
        if changed {
            self.store.replace_quotations(&outcome.table)?;
        }

        let batch = UploadBatch {
            batch_id: Uuid::new_v4().to_string(),
            kind: UploadKind::Quotations,
            file_name: file_name.clone(),
            uploaded_at: Utc::now(),
            row_count: parsed_rows,
            months_added: outcome.added_months.iter().map(|m| m.to_string()).collect(),
            unmatched_rows: outcome.unmatched_rows,
        };
        self.record(&batch);

        let months_text = batch.months_added.join(", ");
        let mut message = if outcome.first_load {
            t_with_args(
                "upload.first_load",
                &[
                    ("rows", &outcome.table.len().to_string()),
                    ("months", &outcome.table.months().len().to_string()),
                ],
            )
        } else if outcome.added_months.is_empty() {
            t_with_args("upload.no_new_months", &[])
        } else {
            t_with_args("upload.quotations_done", &[("months", &months_text)])
        };
        if outcome.unmatched_rows > 0 {
            message.push(' ');
            message.push_str(&t_with_args(
                "upload.unmatched",
                &[("count", &outcome.unmatched_rows.to_string())],
            ));
        }

        info!(
            batch_id = %batch.batch_id,
            first_load = outcome.first_load,
            months_added = %months_text,
            unmatched_rows = outcome.unmatched_rows,
            "报价上传完成"
        );

        Ok(QuotationUploadResponse {
            batch_id: batch.batch_id,
            file_name,
            first_load: outcome.first_load,
            parsed_rows,
            total_rows: outcome.table.len(),
            total_months: outcome.table.months().len(),
            months_added: outcome.added_months,
            unmatched_rows: outcome.unmatched_rows,
            message,
        })
    }

    /// 上传例外清单文件
    pub fn upload_exceptions(&self, path: &Path) -> ApiResult<ExceptionUploadResponse> {
        let mut workbook = ExcelWorkbook::open(path)?;
        self.upload_exceptions_from(&mut workbook, file_name_of(path))
    }

    /// 上传例外清单（任意工作簿来源）, 整体替换已存清单
    #[instrument(skip(self, workbook), fields(file_name = ?file_name))]
    pub fn upload_exceptions_from<W: WorkbookSource>(
        &self,
        workbook: &mut W,
        file_name: Option<String>,
    ) -> ApiResult<ExceptionUploadResponse> {
        let settings = self.config.load_ingest_settings()?;
        let registry: ExceptionRegistry =
            ExceptionImporter::new(settings.exception_sheet).import(workbook)?;
        self.store.replace_exceptions(&registry)?;

        let batch = UploadBatch {
            batch_id: Uuid::new_v4().to_string(),
            kind: UploadKind::Exceptions,
            file_name: file_name.clone(),
            uploaded_at: Utc::now(),
            row_count: registry.len(),
            months_added: Vec::new(),
            unmatched_rows: 0,
        };
        self.record(&batch);
        info!(batch_id = %batch.batch_id, count = registry.len(), "例外清单上传完成");

        Ok(ExceptionUploadResponse {
            batch_id: batch.batch_id,
            file_name,
            count: registry.len(),
            message: t_with_args("upload.exceptions_done", &[("count", &registry.len().to_string())]),
        })
    }

    /// 最近的上传记录
    pub fn list_uploads(&self, limit: usize) -> ApiResult<Vec<UploadBatch>> {
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit deve ser maior que zero".to_string()));
        }
        Ok(self.upload_log.list_recent(limit)?)
    }

    // 上传历史写入失败不影响上传结果
    fn record(&self, batch: &UploadBatch) {
        if let Err(e) = self.upload_log.insert(batch) {
            warn!(batch_id = %batch.batch_id, error = %e, "上传历史写入失败");
        }
    }
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().to_string())
}
