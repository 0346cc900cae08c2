// ==========================================
// IPC 报价数量监控系统 - 看板 API
// ==========================================
// 职责: 当月状态视图、最近月份柱状图、历史序列、图例
// 说明: 每次调用都从存储重新计算, 不缓存派生结果
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::summary::{BarChartSeries, HistoricalChart, LongFormQuotation, StatusView};
use crate::domain::types::{CriticalityBand, Month, EXCEPTION_COLOR, EXCEPTION_DESCRIPTION, EXCEPTION_LABEL};
use crate::engine::{AggregationEngine, BarChartRequest, ChartEngine, HistoricalRequest};
use crate::repository::QuotationStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// 可选筛选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// 含 BR
    pub regions: BTreeSet<String>,
    pub items: BTreeSet<String>,
    pub months: BTreeSet<Month>,
}

/// 图例条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub description: String,
    /// #RRGGBB
    pub color: String,
}

pub struct DashboardApi {
    store: Arc<dyn QuotationStore>,
    aggregation: AggregationEngine,
    charts: ChartEngine,
}

impl DashboardApi {
    pub fn new(store: Arc<dyn QuotationStore>) -> Self {
        Self {
            store,
            aggregation: AggregationEngine::new(),
            charts: ChartEngine::new(),
        }
    }

    // 全国汇总后的长表
    fn long_form(&self) -> ApiResult<Vec<LongFormQuotation>> {
        let table = self.store.load_quotations()?;
        let exceptions = self.store.load_exceptions()?;
        let with_br = self.aggregation.with_national_rollup(&table);
        let long = self.aggregation.melt(&with_br, &exceptions);
        debug!(rows = long.len(), "长表已生成");
        Ok(long)
    }

    /// 当月状态视图（最近月份的地区汇总）
    pub fn status_view(&self) -> ApiResult<StatusView> {
        let table = self.store.load_quotations()?;
        let exceptions = self.store.load_exceptions()?;
        Ok(self.aggregation.status_view(&table, &exceptions))
    }

    /// 筛选项（地区、商品、月份）
    pub fn filter_options(&self) -> ApiResult<FilterOptions> {
        let long = self.long_form()?;
        Ok(FilterOptions {
            regions: self.charts.available_regions(&long),
            items: self.charts.available_items(&long),
            months: long.iter().map(|r| r.month).collect(),
        })
    }

    /// 最近月份柱状图
    ///
    /// # 返回
    /// - Ok(None): 没有任何数据
    pub fn last_month_chart(&self, request: &BarChartRequest) -> ApiResult<Option<BarChartSeries>> {
        let long = self.long_form()?;
        Ok(self.charts.last_month_bar(&long, request))
    }

    /// 历史序列
    ///
    /// # 错误
    /// - InvalidInput: 地区或商品未选择
    pub fn historical_chart(&self, request: &HistoricalRequest) -> ApiResult<HistoricalChart> {
        if request.regions.is_empty() {
            return Err(ApiError::InvalidInput("selecione ao menos uma região".to_string()));
        }
        if request.item_labels.is_empty() {
            return Err(ApiError::InvalidInput("selecione ao menos um item".to_string()));
        }
        let long = self.long_form()?;
        Ok(self.charts.historical(&long, request))
    }

    /// 图例: 四个等级 + 例外
    pub fn legend(&self) -> Vec<LegendEntry> {
        let mut entries: Vec<LegendEntry> = CriticalityBand::ALL
            .iter()
            .map(|band| LegendEntry {
                label: band.label().to_string(),
                description: band.description().to_string(),
                color: hex_color(band.color()),
            })
            .collect();
        entries.push(LegendEntry {
            label: EXCEPTION_LABEL.to_string(),
            description: EXCEPTION_DESCRIPTION.to_string(),
            color: hex_color(EXCEPTION_COLOR),
        });
        entries
    }
}

/// 0xRRGGBB → "#RRGGBB"
pub fn hex_color(rgb: u32) -> String {
    format!("#{:06X}", rgb & 0x00FF_FFFF)
}
