// ==========================================
// IPC 报价数量监控系统 - 派生视图模型
// ==========================================
// 职责: 长表、对比汇总、图表序列、明细表
// 红线: 均为读时重算, 不落库
// ==========================================

use crate::domain::types::{CriticalityBand, Month, EXCEPTION_COLOR};
use serde::{Deserialize, Serialize};

// ==========================================
// LongFormQuotation - 长表行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongFormQuotation {
    pub region: String,
    pub code: String,
    pub description: String,
    pub month: Month,
    pub value: Option<f64>,
    pub is_exception: bool,
    /// "Código - Descrição"
    pub item_label: String,
}

// ==========================================
// ComparativeSummary - 地区 × 月份 计数
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparativeSummary {
    #[serde(rename = "UF")]
    pub region: String,
    #[serde(rename = "Data")]
    pub month: Option<Month>,
    #[serde(rename = "Total")]
    pub total: usize,
    #[serde(rename = "SuperCrítico")]
    pub super_critico: usize,
    #[serde(rename = "Crítico")]
    pub critico: usize,
    #[serde(rename = "Aceitável")]
    pub aceitavel: usize,
    #[serde(rename = "Suficiente")]
    pub suficiente: usize,
    #[serde(rename = "Excessão")]
    pub excecao: usize,
}

impl ComparativeSummary {
    pub fn new(region: impl Into<String>, month: Month) -> Self {
        Self {
            region: region.into(),
            month: Some(month),
            ..Self::default()
        }
    }

    /// 某等级的计数
    pub fn band_count(&self, band: CriticalityBand) -> usize {
        match band {
            CriticalityBand::SuperCritico => self.super_critico,
            CriticalityBand::Critico => self.critico,
            CriticalityBand::Aceitavel => self.aceitavel,
            CriticalityBand::Suficiente => self.suficiente,
        }
    }

    pub(crate) fn increment_band(&mut self, band: CriticalityBand) {
        match band {
            CriticalityBand::SuperCritico => self.super_critico += 1,
            CriticalityBand::Critico => self.critico += 1,
            CriticalityBand::Aceitavel => self.aceitavel += 1,
            CriticalityBand::Suficiente => self.suficiente += 1,
        }
    }
}

/// 当月状态视图
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    /// 最近月份；数据为空时为 None
    pub month: Option<Month>,
    pub rows: Vec<ComparativeSummary>,
}

impl StatusView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// 图表序列
// ==========================================

/// 柱状图单点（一个地区）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarPoint {
    pub region: String,
    pub value: f64,
}

/// 最近月份柱状图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartSeries {
    pub month: Month,
    pub item_label: String,
    pub points: Vec<BarPoint>,
}

impl BarChartSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 历史序列单点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub month: Month,
    pub value: f64,
}

/// 一条历史曲线: (地区, 商品)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub region: String,
    pub item_label: String,
    pub points: Vec<SeriesPoint>,
}

/// 水平参考线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
    pub color: u32,
}

/// 历史序列视图
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalChart {
    pub series: Vec<HistoricalSeries>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl HistoricalChart {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

// ==========================================
// 明细表
// ==========================================

/// 单元格着色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStyle {
    Band(CriticalityBand),
    Exception,
    Plain,
}

impl CellStyle {
    /// (底色, 字色)
    pub fn colors(&self) -> Option<(u32, u32)> {
        match self {
            CellStyle::Band(band) => Some((band.color(), band.font_color())),
            CellStyle::Exception => Some((EXCEPTION_COLOR, 0xFFFFFF)),
            CellStyle::Plain => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailCell {
    pub month: Month,
    pub value: Option<f64>,
    pub style: CellStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub region: String,
    pub code: String,
    /// 内部字段, 导出时不输出
    pub description: String,
    pub item_label: String,
    /// 内部字段, 导出时不输出
    pub is_exception: bool,
    pub cells: Vec<DetailCell>,
}

impl DetailRow {
    pub fn value(&self, month: Month) -> Option<f64> {
        self.cells
            .iter()
            .find(|c| c.month == month)
            .and_then(|c| c.value)
    }
}

/// 明细视图（保留行身份, 列为所选月份）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailTable {
    pub months: Vec<Month>,
    pub rows: Vec<DetailRow>,
}

impl DetailTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
