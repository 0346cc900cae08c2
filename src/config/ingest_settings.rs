// ==========================================
// IPC 报价数量监控系统 - 导入参数
// ==========================================
// 职责: 导入所需的可配置参数（地区工作表、表头跳过行数、月份窗口起点）
// 来源: config_kv 表, 缺省时使用默认值
// ==========================================

use crate::domain::quotation::NATIONAL_REGION;
use crate::domain::types::Month;
use serde::{Deserialize, Serialize};

/// 默认地区工作表
pub const DEFAULT_REGION_SHEETS: [&str; 7] = ["SP", "RJ", "MG", "BA", "RS", "PE", "DF"];
/// 默认表头前跳过行数
pub const DEFAULT_HEADER_SKIP_ROWS: usize = 6;
/// 默认例外工作表名
pub const DEFAULT_EXCEPTION_SHEET: &str = "itens com excessões";
/// 默认界面语言
pub const DEFAULT_LOCALE: &str = "pt-BR";

/// 默认月份窗口起点 01/2024
pub const DEFAULT_WINDOW_START: Month = Month::from_parts(2024, 1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSettings {
    pub region_sheets: Vec<String>,
    pub header_skip_rows: usize,
    pub window_start: Month,
    pub exception_sheet: String,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            region_sheets: DEFAULT_REGION_SHEETS.iter().map(|s| s.to_string()).collect(),
            header_skip_rows: DEFAULT_HEADER_SKIP_ROWS,
            window_start: DEFAULT_WINDOW_START,
            exception_sheet: DEFAULT_EXCEPTION_SHEET.to_string(),
        }
    }
}

/// 解析逗号分隔的地区列表
///
/// 名称即工作表名, 只去除首尾空白, 保留大小写
///
/// # 返回
/// - Err: 列表为空、包含 BR 或存在重复（忽略大小写）
pub fn parse_region_list(raw: &str) -> Result<Vec<String>, String> {
    let mut regions: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let region = part.trim().to_string();
        if region.is_empty() {
            continue;
        }
        if region.to_lowercase() == NATIONAL_REGION.to_lowercase() {
            return Err(format!("'{}' é reservado para o agregado nacional", NATIONAL_REGION));
        }
        if regions.iter().any(|r| r.to_lowercase() == region.to_lowercase()) {
            return Err(format!("região duplicada: {}", region));
        }
        regions.push(region);
    }
    if regions.is_empty() {
        return Err("a lista de regiões não pode ser vazia".to_string());
    }
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = IngestSettings::default();
        assert_eq!(settings.region_sheets.len(), 7);
        assert_eq!(settings.header_skip_rows, 6);
        assert_eq!(settings.window_start.to_string(), "01/2024");
        assert_eq!(settings.exception_sheet, "itens com excessões");
    }

    #[test]
    fn test_parse_region_list() {
        assert_eq!(
            parse_region_list(" SP, RJ ,,MG").unwrap(),
            vec!["SP".to_string(), "RJ".to_string(), "MG".to_string()]
        );
        assert_eq!(
            parse_region_list("Goiânia , Belém").unwrap(),
            vec!["Goiânia".to_string(), "Belém".to_string()]
        );
        assert!(parse_region_list("SP,BR").is_err());
        assert!(parse_region_list("SP,br").is_err());
        assert!(parse_region_list("SP,SP").is_err());
        assert!(parse_region_list("Belém,BELÉM").is_err());
        assert!(parse_region_list(" , ").is_err());
    }
}
