// ==========================================
// IPC 报价数量监控系统 - 表头规范化
// ==========================================
// 职责: 清洗表头、识别结构列与月份列、月份窗口过滤
// 规则: 去掉 "(Q...)" 数量单位注释; 内嵌 MM/YYYY 视为月份列
// ==========================================

use crate::domain::types::Month;
use once_cell::sync::Lazy;
use regex::Regex;

static QUANTITY_ANNOTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(Q.*\)").unwrap());
static MONTH_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{2}/\d{4})").unwrap());

/// 代码列名
pub const CODE_HEADER: &str = "Código";
/// 描述列名
pub const DESCRIPTION_HEADER: &str = "Descrição";
/// 地区列名
pub const REGION_HEADER: &str = "UF";

/// 表头类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderKind {
    Code,
    Description,
    Month(Month),
    /// 带有 MM/YYYY 但不是合法月份（如 13/2024）
    InvalidMonth(String),
    /// 其他结构列（不属于类型化模式）
    Other(String),
    Empty,
}

/// 去掉数量单位注释并去除首尾空白
pub fn clean_header(raw: &str) -> String {
    QUANTITY_ANNOTATION.replace_all(raw, "").trim().to_string()
}

/// 识别表头
pub fn classify_header(raw: &str) -> HeaderKind {
    let cleaned = clean_header(raw);
    if cleaned.is_empty() {
        return HeaderKind::Empty;
    }
    let lowered = cleaned.to_lowercase();
    if lowered == CODE_HEADER.to_lowercase() {
        return HeaderKind::Code;
    }
    if lowered == DESCRIPTION_HEADER.to_lowercase() {
        return HeaderKind::Description;
    }
    match MONTH_PATTERN.captures(&cleaned) {
        Some(caps) => match Month::parse(&caps[1]) {
            Some(month) => HeaderKind::Month(month),
            None => HeaderKind::InvalidMonth(cleaned),
        },
        None => HeaderKind::Other(cleaned),
    }
}

// ==========================================
// MonthWindow - 支持的月份窗口
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: Month,
    pub end: Month,
}

impl MonthWindow {
    pub fn new(start: Month, end: Month) -> Self {
        Self { start, end }
    }

    /// [start, end] 闭区间
    pub fn contains(&self, month: Month) -> bool {
        month >= self.start && month <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_header_strips_quantity_annotation() {
        assert_eq!(clean_header("01/2024 (Qtd)"), "01/2024");
        assert_eq!(clean_header("Cotações 02/2024 (Quantidade de cotações)"), "Cotações 02/2024");
        assert_eq!(clean_header("  Descrição  "), "Descrição");
    }

    #[test]
    fn test_classify_structural_headers() {
        assert_eq!(classify_header("Código"), HeaderKind::Code);
        assert_eq!(classify_header("código"), HeaderKind::Code);
        assert_eq!(classify_header("Descrição"), HeaderKind::Description);
        assert_eq!(classify_header(""), HeaderKind::Empty);
        assert_eq!(classify_header("Peso"), HeaderKind::Other("Peso".into()));
    }

    #[test]
    fn test_classify_month_headers() {
        assert_eq!(
            classify_header("Mês 03/2024 (Qtd)"),
            HeaderKind::Month(Month::new(2024, 3).unwrap())
        );
        assert_eq!(
            classify_header("13/2024"),
            HeaderKind::InvalidMonth("13/2024".into())
        );
    }

    #[test]
    fn test_month_window_is_inclusive() {
        let window = MonthWindow::new(Month::new(2024, 1).unwrap(), Month::new(2024, 6).unwrap());
        assert!(window.contains(Month::new(2024, 1).unwrap()));
        assert!(window.contains(Month::new(2024, 6).unwrap()));
        assert!(!window.contains(Month::new(2023, 12).unwrap()));
        assert!(!window.contains(Month::new(2024, 7).unwrap()));
    }
}
