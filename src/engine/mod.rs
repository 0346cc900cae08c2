// ==========================================
// IPC 报价数量监控系统 - 引擎层
// ==========================================
// 职责: 临界判定、增量合并、聚合、图表序列、明细筛选
// 红线: 引擎为纯计算, 不访问存储
// ==========================================

pub mod aggregation;
pub mod charts;
pub mod criticality;
pub mod merge;
pub mod query_filter;

// 重导出核心引擎
pub use aggregation::AggregationEngine;
pub use charts::{reference_lines, BarChartRequest, ChartEngine, HistoricalRequest};
pub use criticality::classify;
pub use merge::{merge, MergeEngine, MergeOutcome};
pub use query_filter::{DetailFilter, DetailQuery};
