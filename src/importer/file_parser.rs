// ==========================================
// IPC 报价数量监控系统 - 工作簿读取
// ==========================================
// 支持: Excel (.xlsx/.xls) 经 calamine 读取
// 输出: 按绝对行列定位的单元格网格
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// 空单元格或纯空白文本
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// 工作表网格: rows[r][c], r/c 为工作表中的绝对位置（从 0 开始）
pub type SheetGrid = Vec<Vec<CellValue>>;

/// 读取网格中的单元格（越界视为空）
pub fn cell(grid: &SheetGrid, row: usize, col: usize) -> &CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    grid.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
}

// ==========================================
// WorkbookSource Trait
// ==========================================
// 用途: 屏蔽具体表格库, 便于测试注入内存工作簿
pub trait WorkbookSource {
    /// 工作表名称列表
    fn sheet_names(&self) -> Vec<String>;

    /// 读取工作表
    ///
    /// # 返回
    /// - Ok(None): 工作表不存在
    fn read_sheet(&mut self, name: &str) -> ImportResult<Option<SheetGrid>>;
}

// ==========================================
// ExcelWorkbook - calamine 实现
// ==========================================
pub struct ExcelWorkbook {
    sheets: Sheets<BufReader<File>>,
}

impl ExcelWorkbook {
    /// 打开 Excel 文件（.xlsx / .xls）
    pub fn open<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let sheets = open_workbook_auto(path)?;
        Ok(Self { sheets })
    }
}

impl WorkbookSource for ExcelWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> ImportResult<Option<SheetGrid>> {
        let actual = match self
            .sheets
            .sheet_names()
            .into_iter()
            .find(|s| s.trim() == name.trim())
        {
            Some(s) => s,
            None => return Ok(None),
        };

        let range = self.sheets.worksheet_range(&actual)?;

        // calamine 的 Range 从第一个非空单元格开始, 这里还原为绝对位置
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut grid: SheetGrid = vec![Vec::new(); row_offset];
        for data_row in range.rows() {
            let mut row = vec![CellValue::Empty; col_offset];
            row.extend(data_row.iter().map(CellValue::from));
            grid.push(row);
        }

        Ok(Some(grid))
    }
}

// ==========================================
// InMemoryWorkbook - 内存工作簿
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    order: Vec<String>,
    sheets: HashMap<String, SheetGrid>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: impl Into<String>, grid: SheetGrid) -> Self {
        let name = name.into();
        if !self.sheets.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.sheets.insert(name, grid);
        self
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn read_sheet(&mut self, name: &str) -> ImportResult<Option<SheetGrid>> {
        Ok(self.sheets.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excel_open_file_not_found() {
        let result = ExcelWorkbook::open("non_existent.xlsx");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_excel_open_rejects_other_extensions() {
        let temp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let result = ExcelWorkbook::open(temp.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_in_memory_workbook_lookup() {
        let mut wb = InMemoryWorkbook::new().with_sheet(
            "SP",
            vec![vec![CellValue::Text("Código".into()), CellValue::Number(1.0)]],
        );
        assert_eq!(wb.sheet_names(), vec!["SP".to_string()]);
        assert!(wb.read_sheet("SP").unwrap().is_some());
        assert!(wb.read_sheet("RJ").unwrap().is_none());
    }

    #[test]
    fn test_cell_out_of_bounds_is_empty() {
        let grid: SheetGrid = vec![vec![CellValue::Number(1.0)]];
        assert_eq!(cell(&grid, 0, 0), &CellValue::Number(1.0));
        assert_eq!(cell(&grid, 5, 5), &CellValue::Empty);
    }
}
