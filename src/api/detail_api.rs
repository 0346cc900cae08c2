// ==========================================
// IPC 报价数量监控系统 - 明细 API
// ==========================================
// 职责: 按地区/商品/月份/临界等级筛选的明细表
// 说明: 明细包含全国汇总行 BR
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::summary::DetailTable;
use crate::engine::{AggregationEngine, DetailFilter, DetailQuery};
use crate::repository::QuotationStore;
use std::sync::Arc;
use tracing::instrument;

pub struct DetailApi {
    store: Arc<dyn QuotationStore>,
    aggregation: AggregationEngine,
    filter: DetailFilter,
}

impl DetailApi {
    pub fn new(store: Arc<dyn QuotationStore>) -> Self {
        Self {
            store,
            aggregation: AggregationEngine::new(),
            filter: DetailFilter::new(),
        }
    }

    /// 明细查询（各条件 AND 组合, 空条件不过滤）
    #[instrument(skip_all)]
    pub fn detail(&self, query: &DetailQuery) -> ApiResult<DetailTable> {
        let table = self.store.load_quotations()?;
        let exceptions = self.store.load_exceptions()?;
        let with_br = self.aggregation.with_national_rollup(&table);

        Ok(self.filter.apply(&with_br, &exceptions, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exception::ExceptionRegistry;
    use crate::domain::quotation::{QuotationRecord, QuotationTable, RecordKey};
    use crate::domain::summary::CellStyle;
    use crate::domain::types::{CriticalityBand, CriticalityOption, Month};
    use crate::repository::InMemoryQuotationStore;

    fn month(m: u32) -> Month {
        Month::new(2024, m).unwrap()
    }

    fn api() -> DetailApi {
        let table: QuotationTable = vec![
            QuotationRecord::new(RecordKey::new("SP", "1001", "Arroz")).with_value(month(1), 30.0),
            QuotationRecord::new(RecordKey::new("SP", "2001", "Café")).with_value(month(1), 5.0),
        ]
        .into_iter()
        .collect();
        let registry: ExceptionRegistry = ["Café"].into_iter().collect();
        DetailApi::new(Arc::new(InMemoryQuotationStore::with_data(table, registry)))
    }

    #[test]
    fn test_unfiltered_includes_national_rows() {
        let detail = api().detail(&DetailQuery::default()).unwrap();
        assert_eq!(detail.rows.len(), 4);
        assert!(detail.rows.iter().any(|r| r.region == "BR"));
    }

    #[test]
    fn test_criticality_filter() {
        let query = DetailQuery {
            regions: ["SP".to_string()].into_iter().collect(),
            criticality: [CriticalityOption::Band(CriticalityBand::Critico)].into_iter().collect(),
            ..DetailQuery::default()
        };
        let detail = api().detail(&query).unwrap();
        assert_eq!(detail.rows.len(), 1);
        assert_eq!(detail.rows[0].item_label, "1001 - Arroz");
        assert_eq!(detail.rows[0].cells[0].style, CellStyle::Band(CriticalityBand::Critico));

        let query = DetailQuery {
            regions: ["SP".to_string()].into_iter().collect(),
            criticality: [CriticalityOption::Exception].into_iter().collect(),
            ..DetailQuery::default()
        };
        let detail = api().detail(&query).unwrap();
        assert_eq!(detail.rows.len(), 1);
        assert!(detail.rows[0].is_exception);
        assert_eq!(detail.rows[0].cells[0].style, CellStyle::Exception);
    }
}
