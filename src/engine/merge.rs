// ==========================================
// IPC 报价数量监控系统 - 增量合并引擎
// ==========================================
// 职责: 将新上传的宽表合并进已持久化宽表
// 红线: 只新增月份列, 不覆盖已有月份, 不新增行
// ==========================================
// 幂等: 同一文件合并两次, 第二次为 no-op
// ==========================================

use crate::domain::quotation::QuotationTable;
use crate::domain::types::Month;
use tracing::{debug, info, instrument, warn};

/// 合并结果
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// 合并后的宽表
    pub table: QuotationTable,
    /// 新增的月份列（按时间排序）
    pub added_months: Vec<Month>,
    /// incoming 中主键不在 current 的行数（被丢弃）
    pub unmatched_rows: usize,
    /// current 为空, 直接采用 incoming
    pub first_load: bool,
}

// ==========================================
// MergeEngine - 增量合并引擎
// ==========================================
#[derive(Debug, Default)]
pub struct MergeEngine;

impl MergeEngine {
    pub fn new() -> Self {
        Self
    }

    /// 增量合并
    ///
    /// # 规则
    /// 1) current 无记录 → 直接返回 incoming（首次上传）
    /// 2) new_months = incoming.months - current.months
    /// 3) new_months 为空 → 原样返回 current
    /// 4) 否则按 (UF, Código, Descrição) 左连接 new_months
    #[instrument(skip_all, fields(current_rows = current.len(), incoming_rows = incoming.len()))]
    pub fn merge(&self, current: QuotationTable, incoming: QuotationTable) -> MergeOutcome {
        if current.is_empty() {
            info!(months = incoming.months().len(), "当前基础表为空, 采用新上传数据");
            let added_months = incoming.months().iter().copied().collect();
            return MergeOutcome {
                table: incoming,
                added_months,
                unmatched_rows: 0,
                first_load: true,
            };
        }

        let new_months: Vec<Month> = incoming
            .months()
            .iter()
            .filter(|m| !current.has_month(**m))
            .copied()
            .collect();

        if new_months.is_empty() {
            debug!("没有新的月份列, 基础表保持不变");
            return MergeOutcome {
                table: current,
                added_months: Vec::new(),
                unmatched_rows: 0,
                first_load: false,
            };
        }

        let unmatched_rows = incoming
            .rows()
            .iter()
            .filter(|r| !current.contains_key(&r.key))
            .count();
        if unmatched_rows > 0 {
            warn!(
                unmatched_rows,
                "新上传数据中有商品不在基础表中, 增量合并不会新增这些行"
            );
        }

        let mut table = current;
        for month in &new_months {
            table.add_month(*month);
        }

        for row in 0..table.len() {
            let key = table.rows()[row].key.clone();
            let source = incoming.get(&key);
            for month in &new_months {
                let value = source.and_then(|r| r.value(*month));
                table.set_value(row, *month, value);
            }
        }

        info!(
            added = ?new_months.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
            "增量合并完成"
        );

        MergeOutcome {
            table,
            added_months: new_months,
            unmatched_rows,
            first_load: false,
        }
    }
}

/// 增量合并（只返回合并后的表）
pub fn merge(current: QuotationTable, incoming: QuotationTable) -> QuotationTable {
    MergeEngine::new().merge(current, incoming).table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quotation::{QuotationRecord, RecordKey};

    fn m(month: u32, year: i32) -> Month {
        Month::new(year, month).unwrap()
    }

    fn record(region: &str, code: &str, desc: &str, values: &[(Month, f64)]) -> QuotationRecord {
        let mut r = QuotationRecord::new(RecordKey::new(region, code, desc));
        for (month, v) in values {
            r.set_value(*month, Some(*v));
        }
        r
    }

    fn current() -> QuotationTable {
        [
            record("SP", "1001", "Arroz", &[(m(1, 2024), 30.0)]),
            record("RJ", "1001", "Arroz", &[(m(1, 2024), 12.0)]),
        ]
        .into_iter()
        .collect()
    }

    fn incoming() -> QuotationTable {
        [
            record("SP", "1001", "Arroz", &[(m(1, 2024), 999.0), (m(2, 2024), 60.0)]),
            record("MG", "1001", "Arroz", &[(m(2, 2024), 10.0)]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_first_load_takes_incoming() {
        let outcome = MergeEngine::new().merge(QuotationTable::new(), incoming());
        assert!(outcome.first_load);
        assert_eq!(outcome.table, incoming());
        assert_eq!(outcome.added_months, vec![m(1, 2024), m(2, 2024)]);
    }

    #[test]
    fn test_adds_only_new_months_and_preserves_existing_values() {
        let outcome = MergeEngine::new().merge(current(), incoming());
        let table = outcome.table;

        assert_eq!(outcome.added_months, vec![m(2, 2024)]);
        assert_eq!(outcome.unmatched_rows, 1);
        assert_eq!(table.len(), 2);

        let sp = table.get(&RecordKey::new("SP", "1001", "Arroz")).unwrap();
        assert_eq!(sp.value(m(1, 2024)), Some(30.0)); // 不被覆盖
        assert_eq!(sp.value(m(2, 2024)), Some(60.0));

        let rj = table.get(&RecordKey::new("RJ", "1001", "Arroz")).unwrap();
        assert_eq!(rj.value(m(1, 2024)), Some(12.0));
        assert_eq!(rj.value(m(2, 2024)), None);
        assert!(table.has_month(m(2, 2024)));

        assert!(!table.contains_key(&RecordKey::new("MG", "1001", "Arroz")));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge(current(), incoming());
        let twice = merge(once.clone(), incoming());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_new_months_returns_current_unchanged() {
        let same_months: QuotationTable =
            [record("SP", "1001", "Arroz", &[(m(1, 2024), 1.0)])].into_iter().collect();
        let outcome = MergeEngine::new().merge(current(), same_months);
        assert!(outcome.added_months.is_empty());
        assert_eq!(outcome.table, current());
    }
}
