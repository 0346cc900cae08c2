// ==========================================
// IPC 报价数量监控系统 - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 代码归一 / 数值强制转换
// 红线: 非数值不报错, 一律视为缺失
// ==========================================

use crate::importer::file_parser::CellValue;

pub struct DataCleaner;

impl DataCleaner {
    /// 文本单元格 → 去空白后的文本; 空白视为 None
    pub fn normalize_text(&self, value: &CellValue) -> Option<String> {
        let text = match value {
            CellValue::Empty => return None,
            CellValue::Number(n) => format_number(*n),
            other => other.to_string(),
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 商品代码: 数值型 1001.0 → "1001"
    pub fn normalize_code(&self, value: &CellValue) -> Option<String> {
        self.normalize_text(value)
    }

    /// 报价数量强制转换
    ///
    /// - 数值 → 原值
    /// - 数值文本 → 解析值
    /// - 其他（含逗号分隔的文本, 如 "1,234"） → None
    pub fn coerce_count(&self, value: &CellValue) -> Option<f64> {
        let parsed = match value {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Empty | CellValue::Bool(_) => None,
        };
        parsed.filter(|v| v.is_finite())
    }
}

// 整数值的浮点数去掉 ".0"
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
