// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、测试用 Excel 工作簿生成
// ==========================================

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::error::Error;
use std::path::Path;
use tempfile::NamedTempFile;

/// 报价工作簿默认跳过的行数
pub const SKIP_ROWS: u32 = 6;

/// 例外工作表名
pub const EXCEPTION_SHEET: &str = "itens com excessões";

/// 创建临时测试数据库
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();
    Ok((temp_file, db_path))
}

/// 测试商品行: (Código, Descrição, 各月份值)
pub struct FixtureItem {
    pub code: &'static str,
    pub description: &'static str,
    pub values: Vec<Option<f64>>,
}

impl FixtureItem {
    pub fn new(code: &'static str, description: &'static str, values: &[f64]) -> Self {
        Self {
            code,
            description,
            values: values.iter().copied().map(Some).collect(),
        }
    }
}

/// 写入报价工作簿: 每个地区一个工作表, 前 6 行为标题区, 第 7 行为表头
///
/// 月份表头带 "(Qtd)" 注释, 与实际文件一致
pub fn write_quotation_workbook(
    path: &Path,
    regions: &[&str],
    months: &[&str],
    items: &[FixtureItem],
) -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();
    for region in regions {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*region)?;
        sheet.write_string(0, 0, "Controle de Cotações")?;
        sheet.write_string(1, 0, format!("UF: {}", region))?;

        sheet.write_string(SKIP_ROWS, 0, "Código")?;
        sheet.write_string(SKIP_ROWS, 1, "Descrição")?;
        for (idx, month) in months.iter().enumerate() {
            sheet.write_string(SKIP_ROWS, 2 + idx as u16, format!("{} (Qtd)", month))?;
        }

        for (offset, item) in items.iter().enumerate() {
            let row = SKIP_ROWS + 1 + offset as u32;
            sheet.write_string(row, 0, item.code)?;
            sheet.write_string(row, 1, item.description)?;
            for (idx, value) in item.values.iter().enumerate() {
                if let Some(v) = value {
                    sheet.write_number(row, 2 + idx as u16, *v)?;
                }
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

/// 写入例外工作簿: (Código, DESCRIÇÃO, 是否例外)
pub fn write_exception_workbook(path: &Path, rows: &[(&str, &str, bool)]) -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXCEPTION_SHEET)?;
    sheet.write_string(0, 0, "Código")?;
    sheet.write_string(0, 1, "DESCRIÇÃO")?;
    sheet.write_string(0, 2, "excessão")?;
    for (idx, (code, description, flagged)) in rows.iter().enumerate() {
        let row = 1 + idx as u32;
        sheet.write_string(row, 0, *code)?;
        sheet.write_string(row, 1, *description)?;
        if *flagged {
            sheet.write_string(row, 2, "x")?;
        }
    }
    workbook.save(path)?;
    Ok(())
}
