// ==========================================
// IPC 报价数量监控系统 - 例外清单导入器
// ==========================================
// 输入: 工作表 "itens com excessões", 第一行为表头
// 输出: excessão 非空的行的 DESCRIÇÃO 集合
// ==========================================

use crate::domain::exception::ExceptionRegistry;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{cell, ExcelWorkbook, WorkbookSource};
use std::path::Path;
use tracing::{info, instrument};

/// 例外标记列
pub const EXCEPTION_FLAG_HEADER: &str = "excessão";
/// 例外描述列
pub const EXCEPTION_DESCRIPTION_HEADER: &str = "DESCRIÇÃO";

pub struct ExceptionImporter {
    sheet_name: String,
    cleaner: DataCleaner,
}

impl ExceptionImporter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            cleaner: DataCleaner,
        }
    }

    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> ImportResult<ExceptionRegistry> {
        let mut workbook = ExcelWorkbook::open(path)?;
        self.import(&mut workbook)
    }

    #[instrument(skip(self, workbook), fields(sheet = %self.sheet_name))]
    pub fn import<W: WorkbookSource>(&self, workbook: &mut W) -> ImportResult<ExceptionRegistry> {
        let grid = workbook
            .read_sheet(&self.sheet_name)?
            .ok_or_else(|| ImportError::SheetNotFound(self.sheet_name.clone()))?;

        // 表头为第一个非空行
        let header_row = grid
            .iter()
            .position(|row| row.iter().any(|c| !c.is_blank()))
            .ok_or_else(|| ImportError::HeaderRowMissing {
                sheet: self.sheet_name.clone(),
                row: 1,
            })?;

        let find_column = |name: &str| -> ImportResult<usize> {
            grid[header_row]
                .iter()
                .position(|c| {
                    self.cleaner
                        .normalize_text(c)
                        .map_or(false, |h| h.to_lowercase() == name.to_lowercase())
                })
                .ok_or_else(|| ImportError::ColumnMissing {
                    sheet: self.sheet_name.clone(),
                    column: name.to_string(),
                })
        };
        let flag_col = find_column(EXCEPTION_FLAG_HEADER)?;
        let description_col = find_column(EXCEPTION_DESCRIPTION_HEADER)?;

        let registry: ExceptionRegistry = ((header_row + 1)..grid.len())
            .filter(|&row| !cell(&grid, row, flag_col).is_blank())
            .filter_map(|row| self.cleaner.normalize_text(cell(&grid, row, description_col)))
            .collect();

        info!(count = registry.len(), "例外清单导入完成");
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::file_parser::{CellValue, InMemoryWorkbook};

    const SHEET: &str = "itens com excessões";

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_import_keeps_flagged_rows() {
        let grid = vec![
            vec![text("Código"), text("DESCRIÇÃO"), text("excessão")],
            vec![text("1"), text("Café"), text("sim")],
            vec![text("2"), text("Arroz"), CellValue::Empty],
            vec![text("3"), text(" Leite "), CellValue::Number(1.0)],
            vec![text("4"), CellValue::Empty, text("sim")],
        ];
        let mut wb = InMemoryWorkbook::new().with_sheet(SHEET, grid);
        let registry = ExceptionImporter::new(SHEET).import(&mut wb).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("Café"));
        assert!(registry.contains("Leite"));
        assert!(!registry.contains("Arroz"));
    }

    #[test]
    fn test_import_missing_sheet() {
        let mut wb = InMemoryWorkbook::new().with_sheet("Planilha1", vec![]);
        let err = ExceptionImporter::new(SHEET).import(&mut wb).unwrap_err();
        assert!(matches!(err, ImportError::SheetNotFound(_)));
    }

    #[test]
    fn test_import_missing_column() {
        let grid = vec![vec![text("DESCRIÇÃO")], vec![text("Café")]];
        let mut wb = InMemoryWorkbook::new().with_sheet(SHEET, grid);
        let err = ExceptionImporter::new(SHEET).import(&mut wb).unwrap_err();
        assert!(matches!(err, ImportError::ColumnMissing { ref column, .. } if column == "excessão"));
    }
}
