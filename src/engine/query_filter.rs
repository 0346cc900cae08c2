// ==========================================
// IPC 报价数量监控系统 - 明细查询筛选
// ==========================================
// 条件(逻辑与): 地区 → 商品 → 月份 → 临界等级
// 任一条件为空集 = 不筛选
// ==========================================

use crate::domain::exception::ExceptionRegistry;
use crate::domain::quotation::QuotationTable;
use crate::domain::summary::{CellStyle, DetailCell, DetailRow, DetailTable};
use crate::domain::types::{CriticalityOption, Month};
use crate::engine::criticality::classify;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// 明细查询条件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailQuery {
    pub regions: BTreeSet<String>,
    pub item_labels: BTreeSet<String>,
    pub months: BTreeSet<Month>,
    pub criticality: BTreeSet<CriticalityOption>,
}

// ==========================================
// DetailFilter - 明细筛选器
// ==========================================
#[derive(Debug, Default)]
pub struct DetailFilter;

impl DetailFilter {
    pub fn new() -> Self {
        Self
    }

    /// 执行筛选
    ///
    /// # 临界等级规则
    /// - 例外行: 仅当选中 "Exceção" 时保留
    /// - 非例外行: 所选月份中至少一个非空值落入所选等级
    pub fn apply(
        &self,
        table: &QuotationTable,
        exceptions: &ExceptionRegistry,
        query: &DetailQuery,
    ) -> DetailTable {
        let months: Vec<Month> = if query.months.is_empty() {
            table.months().iter().copied().collect()
        } else {
            table
                .months()
                .iter()
                .filter(|m| query.months.contains(*m))
                .copied()
                .collect()
        };

        let mut rows = Vec::new();
        for record in table.rows() {
            if !query.regions.is_empty() && !query.regions.contains(&record.key.region) {
                continue;
            }
            let item_label = record.key.item_label();
            if !query.item_labels.is_empty() && !query.item_labels.contains(&item_label) {
                continue;
            }

            let is_exception = exceptions.contains(&record.key.description);
            if !query.criticality.is_empty()
                && !matches_criticality(is_exception, &months, |m| record.value(m), &query.criticality)
            {
                continue;
            }

            let cells = months
                .iter()
                .map(|month| {
                    let value = record.value(*month);
                    let style = if is_exception {
                        CellStyle::Exception
                    } else {
                        classify(value).map(CellStyle::Band).unwrap_or(CellStyle::Plain)
                    };
                    DetailCell {
                        month: *month,
                        value,
                        style,
                    }
                })
                .collect();

            rows.push(DetailRow {
                region: record.key.region.clone(),
                code: record.key.code.clone(),
                description: record.key.description.clone(),
                item_label,
                is_exception,
                cells,
            });
        }

        debug!(rows = rows.len(), months = months.len(), "明细筛选完成");
        DetailTable { months, rows }
    }
}

fn matches_criticality<F>(
    is_exception: bool,
    months: &[Month],
    value_of: F,
    selected: &BTreeSet<CriticalityOption>,
) -> bool
where
    F: Fn(Month) -> Option<f64>,
{
    if is_exception {
        return selected.contains(&CriticalityOption::Exception);
    }
    months.iter().any(|m| {
        classify(value_of(*m))
            .map(|band| selected.contains(&CriticalityOption::Band(band)))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quotation::{QuotationRecord, RecordKey};
    use crate::domain::types::CriticalityBand;

    fn m(month: u32, year: i32) -> Month {
        Month::new(year, month).unwrap()
    }

    fn table() -> QuotationTable {
        [
            QuotationRecord::new(RecordKey::new("SP", "1001", "Arroz"))
                .with_value(m(1, 2024), 30.0)
                .with_value(m(2, 2024), 60.0),
            QuotationRecord::new(RecordKey::new("RJ", "1001", "Arroz"))
                .with_value(m(1, 2024), 10.0)
                .with_value(m(2, 2024), 120.0),
            QuotationRecord::new(RecordKey::new("SP", "3003", "Gasolina")).with_value(m(2, 2024), 5.0),
        ]
        .into_iter()
        .collect()
    }

    fn exceptions() -> ExceptionRegistry {
        ["Gasolina"].into_iter().collect()
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let result = DetailFilter::new().apply(&table(), &exceptions(), &DetailQuery::default());
        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.months, vec![m(1, 2024), m(2, 2024)]);
    }

    #[test]
    fn test_region_and_item_filters_combine() {
        let query = DetailQuery {
            regions: ["SP".to_string()].into_iter().collect(),
            item_labels: ["1001 - Arroz".to_string()].into_iter().collect(),
            ..DetailQuery::default()
        };
        let result = DetailFilter::new().apply(&table(), &exceptions(), &query);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].region, "SP");
    }

    #[test]
    fn test_month_filter_restricts_projection_and_criticality() {
        // 只看 01/2024 的 SuperCrítico: RJ(10) 命中, SP(30) 不命中
        let query = DetailQuery {
            months: [m(1, 2024)].into_iter().collect(),
            criticality: [CriticalityOption::Band(CriticalityBand::SuperCritico)]
                .into_iter()
                .collect(),
            ..DetailQuery::default()
        };
        let result = DetailFilter::new().apply(&table(), &exceptions(), &query);
        assert_eq!(result.months, vec![m(1, 2024)]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].region, "RJ");
        assert_eq!(result.rows[0].cells.len(), 1);
    }

    #[test]
    fn test_exception_rows_only_match_exception_option() {
        // Gasolina=5 本应是 SuperCrítico, 但作为例外不参与等级筛选
        let band_only = DetailQuery {
            criticality: [CriticalityOption::Band(CriticalityBand::SuperCritico)]
                .into_iter()
                .collect(),
            ..DetailQuery::default()
        };
        let result = DetailFilter::new().apply(&table(), &exceptions(), &band_only);
        assert!(result.rows.iter().all(|r| !r.is_exception));

        let exception_only = DetailQuery {
            criticality: [CriticalityOption::Exception].into_iter().collect(),
            ..DetailQuery::default()
        };
        let result = DetailFilter::new().apply(&table(), &exceptions(), &exception_only);
        assert_eq!(result.rows.len(), 1);
        assert!(result.rows[0].is_exception);
        assert!(result.rows[0]
            .cells
            .iter()
            .all(|c| c.style == CellStyle::Exception));
    }

    #[test]
    fn test_cells_carry_band_style() {
        let result = DetailFilter::new().apply(&table(), &exceptions(), &DetailQuery::default());
        let sp = &result.rows[0];
        assert_eq!(sp.cells[0].style, CellStyle::Band(CriticalityBand::Critico));
        assert_eq!(sp.cells[1].style, CellStyle::Band(CriticalityBand::Aceitavel));
    }
}
