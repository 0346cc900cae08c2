// ==========================================
// IPC 报价数量监控系统 - 图表序列
// ==========================================
// 职责: 最近月份柱状图 / 历史序列折线图的数据准备
// 说明: 只产出序列数据, 绘图由前端负责
// ==========================================

use crate::domain::quotation::NATIONAL_REGION;
use crate::domain::summary::{
    BarChartSeries, BarPoint, HistoricalChart, HistoricalSeries, LongFormQuotation, ReferenceLine,
    SeriesPoint,
};
use crate::domain::types::Month;
use std::collections::{BTreeMap, BTreeSet};

/// 柱状图请求
#[derive(Debug, Clone, Default)]
pub struct BarChartRequest {
    /// 为空时默认除 BR 外的全部地区
    pub regions: BTreeSet<String>,
    /// 为空时默认按字母序的第一个商品
    pub item_label: Option<String>,
}

/// 历史序列请求（地区和商品均不能为空）
#[derive(Debug, Clone, Default)]
pub struct HistoricalRequest {
    pub regions: BTreeSet<String>,
    pub item_labels: BTreeSet<String>,
}

// 均值（忽略空值）; 全空返回 None
#[derive(Debug, Default)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

// ==========================================
// ChartEngine - 图表序列引擎
// ==========================================
#[derive(Debug, Default)]
pub struct ChartEngine;

impl ChartEngine {
    pub fn new() -> Self {
        Self
    }

    /// 最近月份可选的地区（含 BR）
    pub fn available_regions(&self, long: &[LongFormQuotation]) -> BTreeSet<String> {
        long.iter().map(|r| r.region.clone()).collect()
    }

    /// 可选的商品标签
    pub fn available_items(&self, long: &[LongFormQuotation]) -> BTreeSet<String> {
        long.iter().map(|r| r.item_label.clone()).collect()
    }

    /// 最近月份柱状图
    ///
    /// # 返回
    /// - None: 数据为空（无月份或无商品）
    /// - Some(series): points 可能为空（所选组合无数据）
    pub fn last_month_bar(
        &self,
        long: &[LongFormQuotation],
        request: &BarChartRequest,
    ) -> Option<BarChartSeries> {
        let last = long.iter().map(|r| r.month).max()?;
        let in_month: Vec<&LongFormQuotation> = long.iter().filter(|r| r.month == last).collect();

        let item_label = match &request.item_label {
            Some(label) => label.clone(),
            None => in_month.iter().map(|r| r.item_label.clone()).min()?,
        };

        let regions: BTreeSet<String> = if request.regions.is_empty() {
            in_month
                .iter()
                .filter(|r| r.region != NATIONAL_REGION)
                .map(|r| r.region.clone())
                .collect()
        } else {
            request.regions.clone()
        };

        let mut by_region: BTreeMap<String, MeanAcc> = BTreeMap::new();
        for row in in_month
            .iter()
            .filter(|r| r.item_label == item_label && regions.contains(&r.region))
        {
            by_region.entry(row.region.clone()).or_default().push(row.value);
        }

        let points = by_region
            .into_iter()
            .filter_map(|(region, acc)| acc.mean().map(|value| BarPoint { region, value }))
            .collect();

        Some(BarChartSeries {
            month: last,
            item_label,
            points,
        })
    }

    /// 历史序列: 每个 (地区, 商品) 一条曲线, 同月多行取均值
    pub fn historical(&self, long: &[LongFormQuotation], request: &HistoricalRequest) -> HistoricalChart {
        let mut groups: BTreeMap<(String, String), BTreeMap<Month, MeanAcc>> = BTreeMap::new();

        for row in long.iter().filter(|r| {
            request.regions.contains(&r.region) && request.item_labels.contains(&r.item_label)
        }) {
            groups
                .entry((row.region.clone(), row.item_label.clone()))
                .or_default()
                .entry(row.month)
                .or_default()
                .push(row.value);
        }

        let series = groups
            .into_iter()
            .map(|((region, item_label), months)| HistoricalSeries {
                region,
                item_label,
                points: months
                    .into_iter()
                    .filter_map(|(month, acc)| acc.mean().map(|value| SeriesPoint { month, value }))
                    .collect(),
            })
            .filter(|s| !s.points.is_empty())
            .collect();

        HistoricalChart {
            series,
            reference_lines: reference_lines(),
        }
    }
}

/// 参考线: (数值, 颜色, 标签)
const REFERENCE_LINES: [(f64, u32, &str); 4] = [
    (25.0, 0xFF4D4D, "Limite Crítico (<25)"),
    (50.0, 0xFFA500, "Limite Mediano (<50)"),
    (75.0, 0xFCDA51, "Limite Relevante (<75)"),
    (100.0, 0x66CC66, "Limite Aceitável (<100)"),
];

/// 历史图的水平参考线
pub fn reference_lines() -> Vec<ReferenceLine> {
    REFERENCE_LINES
        .iter()
        .map(|(value, color, label)| ReferenceLine {
            label: label.to_string(),
            value: *value,
            color: *color,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(month: u32, year: i32) -> Month {
        Month::new(year, month).unwrap()
    }

    fn row(region: &str, label: &str, month: Month, value: Option<f64>) -> LongFormQuotation {
        let (code, desc) = label.split_once(" - ").unwrap();
        LongFormQuotation {
            region: region.to_string(),
            code: code.to_string(),
            description: desc.to_string(),
            month,
            value,
            is_exception: false,
            item_label: label.to_string(),
        }
    }

    fn sample() -> Vec<LongFormQuotation> {
        vec![
            row("SP", "1001 - Arroz", m(1, 2024), Some(30.0)),
            row("SP", "1001 - Arroz", m(2, 2024), Some(60.0)),
            row("RJ", "1001 - Arroz", m(2, 2024), Some(40.0)),
            row("BR", "1001 - Arroz", m(2, 2024), Some(100.0)),
            row("SP", "2002 - Feijão", m(2, 2024), None),
        ]
    }

    #[test]
    fn test_bar_defaults_exclude_br_and_pick_first_item() {
        let chart = ChartEngine::new()
            .last_month_bar(&sample(), &BarChartRequest::default())
            .unwrap();
        assert_eq!(chart.month, m(2, 2024));
        assert_eq!(chart.item_label, "1001 - Arroz");
        let regions: Vec<_> = chart.points.iter().map(|p| p.region.as_str()).collect();
        assert_eq!(regions, vec!["RJ", "SP"]);
    }

    #[test]
    fn test_bar_without_data_has_no_points() {
        let request = BarChartRequest {
            regions: ["SP".to_string()].into_iter().collect(),
            item_label: Some("2002 - Feijão".to_string()),
        };
        let chart = ChartEngine::new().last_month_bar(&sample(), &request).unwrap();
        assert!(chart.is_empty());
    }

    #[test]
    fn test_bar_on_empty_dataset() {
        assert!(ChartEngine::new()
            .last_month_bar(&[], &BarChartRequest::default())
            .is_none());
    }

    #[test]
    fn test_historical_series_sorted_by_month() {
        let request = HistoricalRequest {
            regions: ["SP".to_string()].into_iter().collect(),
            item_labels: ["1001 - Arroz".to_string()].into_iter().collect(),
        };
        let chart = ChartEngine::new().historical(&sample(), &request);
        assert_eq!(chart.series.len(), 1);
        let points: Vec<_> = chart.series[0].points.iter().map(|p| (p.month, p.value)).collect();
        assert_eq!(points, vec![(m(1, 2024), 30.0), (m(2, 2024), 60.0)]);
        let values: Vec<f64> = chart.reference_lines.iter().map(|l| l.value).collect();
        assert_eq!(values, vec![25.0, 50.0, 75.0, 100.0]);
        assert_eq!(chart.reference_lines[1].label, "Limite Mediano (<50)");
    }

    #[test]
    fn test_historical_duplicate_rows_use_mean() {
        let mut long = sample();
        long.push(row("SP", "1001 - Arroz", m(2, 2024), Some(80.0)));
        let request = HistoricalRequest {
            regions: ["SP".to_string()].into_iter().collect(),
            item_labels: ["1001 - Arroz".to_string()].into_iter().collect(),
        };
        let chart = ChartEngine::new().historical(&long, &request);
        assert_eq!(chart.series[0].points[1].value, 70.0);
    }
}
