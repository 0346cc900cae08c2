// ==========================================
// IPC 报价数量监控系统 - 聚合流水线
// ==========================================
// 步骤: 全国汇总(BR) → 宽转长 → 标记例外 → 地区×月份计数
// 红线: 全部为派生计算, 无持久化副作用
// ==========================================

use crate::domain::exception::ExceptionRegistry;
use crate::domain::quotation::{QuotationRecord, QuotationTable, RecordKey, NATIONAL_REGION};
use crate::domain::summary::{ComparativeSummary, LongFormQuotation, StatusView};
use crate::domain::types::Month;
use crate::engine::criticality::classify;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

// ==========================================
// AggregationEngine - 聚合引擎
// ==========================================
#[derive(Debug, Default)]
pub struct AggregationEngine;

impl AggregationEngine {
    pub fn new() -> Self {
        Self
    }

    /// 全国汇总: 按 (Código, Descrição) 跨地区求和, UF = "BR", 追加到原表之后
    ///
    /// 说明:
    /// - 已存在的 BR 行不参与求和
    /// - 某月没有任何地区有值时, BR 该月为 0（空和视为零）
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn with_national_rollup(&self, table: &QuotationTable) -> QuotationTable {
        // (code, description) → 首次出现顺序 + 各月合计
        let mut order: Vec<(String, String)> = Vec::new();
        let mut sums: HashMap<(String, String), BTreeMap<Month, f64>> = HashMap::new();

        for record in table.rows() {
            if record.key.region == NATIONAL_REGION {
                continue;
            }
            let item = (record.key.code.clone(), record.key.description.clone());
            let entry = sums.entry(item.clone()).or_insert_with(|| {
                order.push(item);
                BTreeMap::new()
            });
            for (month, value) in &record.values {
                *entry.entry(*month).or_insert(0.0) += value;
            }
        }

        let mut result = table.clone();
        for (code, description) in order {
            let mut values = sums.remove(&(code.clone(), description.clone())).unwrap_or_default();
            for month in table.months() {
                values.entry(*month).or_insert(0.0);
            }
            let record = QuotationRecord {
                key: RecordKey::new(NATIONAL_REGION, code, description),
                values,
            };
            result.push(record);
        }
        for month in table.months() {
            result.add_month(*month);
        }

        debug!(rows = result.len(), "全国汇总完成");
        result
    }

    /// 宽表转长表, 并按描述标记例外
    pub fn melt(&self, table: &QuotationTable, exceptions: &ExceptionRegistry) -> Vec<LongFormQuotation> {
        let mut long = Vec::with_capacity(table.len() * table.months().len());
        for record in table.rows() {
            let is_exception = exceptions.contains(&record.key.description);
            let item_label = record.key.item_label();
            for month in table.months() {
                long.push(LongFormQuotation {
                    region: record.key.region.clone(),
                    code: record.key.code.clone(),
                    description: record.key.description.clone(),
                    month: *month,
                    value: record.value(*month),
                    is_exception,
                    item_label: item_label.clone(),
                });
            }
        }
        long
    }

    /// 对比汇总: 按 (UF, Data) 计数
    ///
    /// # 规则
    /// - Total: 非例外且值非空
    /// - 各等级: 非例外且值落入该等级
    /// - Excessão: 例外且值非空
    /// - 长表中出现的每个 (UF, Data) 都有一行, 缺失计数为 0
    pub fn comparative_summary(&self, long: &[LongFormQuotation]) -> Vec<ComparativeSummary> {
        let mut groups: BTreeMap<(String, Month), ComparativeSummary> = BTreeMap::new();

        for row in long {
            let summary = groups
                .entry((row.region.clone(), row.month))
                .or_insert_with(|| ComparativeSummary::new(row.region.clone(), row.month));

            if row.value.is_none() {
                continue;
            }
            if row.is_exception {
                summary.excecao += 1;
                continue;
            }
            summary.total += 1;
            if let Some(band) = classify(row.value) {
                summary.increment_band(band);
            }
        }

        groups.into_values().collect()
    }

    /// 最近月份（长表中最大日期）
    pub fn most_recent_month(&self, long: &[LongFormQuotation]) -> Option<Month> {
        long.iter().map(|r| r.month).max()
    }

    /// 当月状态视图: 全国汇总 → 长表 → 汇总 → 过滤最近月份
    #[instrument(skip_all, fields(rows = table.len(), exceptions = exceptions.len()))]
    pub fn status_view(&self, table: &QuotationTable, exceptions: &ExceptionRegistry) -> StatusView {
        let with_br = self.with_national_rollup(table);
        let long = self.melt(&with_br, exceptions);
        let month = match self.most_recent_month(&long) {
            Some(m) => m,
            None => return StatusView::default(),
        };

        let rows = self
            .comparative_summary(&long)
            .into_iter()
            .filter(|s| s.month == Some(month))
            .collect();

        StatusView {
            month: Some(month),
            rows,
        }
    }
}
