// ==========================================
// IPC 报价数量监控系统 - Excel 导出
// ==========================================
// 工作表: "Visão Geral"（当月状态）/ "Controle_Cotacoes"（明细）
// 明细: 不输出 Descrição / Exceção 列; 月份单元格按等级着色, 例外为灰色
// ==========================================

use crate::domain::summary::{DetailTable, StatusView};
use crate::domain::types::CriticalityBand;
use crate::export::ExportResult;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet};
use std::path::Path;
use tracing::info;

pub const STATUS_SHEET: &str = "Visão Geral";
pub const DETAIL_SHEET: &str = "Controle_Cotacoes";

pub const STATUS_HEADERS: [&str; 8] = [
    "UF",
    "Data",
    "Total",
    "SuperCrítico",
    "Crítico",
    "Aceitável",
    "Suficiente",
    "Excessão",
];

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_background_color(Color::RGB(0xD9D9D9))
}

fn write_headers(sheet: &mut Worksheet, headers: &[String], format: &Format) -> ExportResult<()> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, format)?;
    }
    Ok(())
}

/// 当月状态视图 → "Visão Geral"
pub fn write_status_xlsx(view: &StatusView, path: &Path) -> ExportResult<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(STATUS_SHEET)?;

    let headers: Vec<String> = STATUS_HEADERS.iter().map(|h| h.to_string()).collect();
    write_headers(sheet, &headers, &header_format())?;

    for (idx, row) in view.rows.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string(r, 0, &row.region)?;
        sheet.write_string(r, 1, row.month.map(|m| m.to_string()).unwrap_or_default())?;
        sheet.write_number(r, 2, row.total as f64)?;
        for (offset, band) in CriticalityBand::ALL.iter().enumerate() {
            sheet.write_number(r, 3 + offset as u16, row.band_count(*band) as f64)?;
        }
        sheet.write_number(r, 7, row.excecao as f64)?;
    }

    sheet.autofit();
    workbook.save(path)?;
    info!(path = %path.display(), rows = view.rows.len(), "状态视图已导出");
    Ok(())
}

/// 明细表 → "Controle_Cotacoes"
pub fn write_detail_xlsx(detail: &DetailTable, path: &Path) -> ExportResult<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(DETAIL_SHEET)?;

    let mut headers = vec!["UF".to_string(), "Item".to_string(), "Código".to_string()];
    headers.extend(detail.months.iter().map(|m| m.to_string()));
    write_headers(sheet, &headers, &header_format())?;

    for (idx, row) in detail.rows.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string(r, 0, &row.region)?;
        sheet.write_string(r, 1, &row.item_label)?;
        sheet.write_string(r, 2, &row.code)?;

        for (offset, cell) in row.cells.iter().enumerate() {
            let col = 3 + offset as u16;
            let format = cell.style.colors().map(|(background, font)| {
                Format::new()
                    .set_background_color(Color::RGB(background))
                    .set_font_color(Color::RGB(font))
            });
            match (cell.value, format) {
                (Some(v), Some(f)) => {
                    sheet.write_number_with_format(r, col, v, &f)?;
                }
                (Some(v), None) => {
                    sheet.write_number(r, col, v)?;
                }
                // 例外行的空单元格同样着灰色
                (None, Some(f)) => {
                    sheet.write_blank(r, col, &f)?;
                }
                (None, None) => {}
            }
        }
    }

    sheet.autofit();
    workbook.save(path)?;
    info!(path = %path.display(), rows = detail.rows.len(), "明细表已导出");
    Ok(())
}
