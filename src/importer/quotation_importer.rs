// ==========================================
// IPC 报价数量监控系统 - 报价工作簿导入器
// ==========================================
// 流程: 逐地区读取工作表 → 定位表头 → 识别列 → 清洗行 → 合成宽表
// 红线: 结构错误立即失败, 不产生部分结果
// ==========================================

use crate::config::IngestSettings;
use crate::domain::quotation::{QuotationRecord, QuotationTable, RecordKey};
use crate::domain::types::Month;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{cell, ExcelWorkbook, SheetGrid, WorkbookSource};
use crate::importer::header_normalizer::{
    classify_header, HeaderKind, MonthWindow, CODE_HEADER, DESCRIPTION_HEADER,
};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

// 单个工作表的列布局
struct SheetLayout {
    code_col: usize,
    description_col: usize,
    month_cols: Vec<(usize, Month)>,
}

pub struct QuotationImporter {
    settings: IngestSettings,
    cleaner: DataCleaner,
}

impl QuotationImporter {
    pub fn new(settings: IngestSettings) -> Self {
        Self {
            settings,
            cleaner: DataCleaner,
        }
    }

    pub fn settings(&self) -> &IngestSettings {
        &self.settings
    }

    /// 从 Excel 文件导入
    pub fn import_file<P: AsRef<Path>>(&self, path: P, today: NaiveDate) -> ImportResult<QuotationTable> {
        let mut workbook = ExcelWorkbook::open(path)?;
        self.import(&mut workbook, today)
    }

    /// 导入报价工作簿
    ///
    /// # 参数
    /// - workbook: 每个配置地区一张工作表
    /// - today: 当前日期（决定月份窗口终点）
    ///
    /// # 返回
    /// - Ok(QuotationTable): 只含窗口内且至少有一个数值的月份列
    /// - Err: 缺少工作表/表头/必需列, 或存在非法月份表头
    #[instrument(skip(self, workbook), fields(today = %today))]
    pub fn import<W: WorkbookSource>(
        &self,
        workbook: &mut W,
        today: NaiveDate,
    ) -> ImportResult<QuotationTable> {
        let window = MonthWindow::new(self.settings.window_start, Month::from_date(today));
        let mut table = QuotationTable::new();
        let mut skipped = 0usize;
        let mut duplicates = 0usize;

        for region in &self.settings.region_sheets {
            let grid = workbook
                .read_sheet(region)?
                .ok_or_else(|| ImportError::SheetNotFound(region.clone()))?;

            let layout = self.resolve_layout(region, &grid, &window)?;
            debug!(
                sheet = %region,
                month_columns = layout.month_cols.len(),
                "表头解析完成"
            );

            for row in (self.settings.header_skip_rows + 1)..grid.len() {
                let code = self.cleaner.normalize_code(cell(&grid, row, layout.code_col));
                let description = self
                    .cleaner
                    .normalize_text(cell(&grid, row, layout.description_col));

                let (code, description) = match (code, description) {
                    (Some(c), Some(d)) => (c, d),
                    (None, None) if row_is_blank(&grid, row) => continue,
                    _ => {
                        skipped += 1;
                        debug!(sheet = %region, row = row + 1, "缺少代码或描述, 跳过该行");
                        continue;
                    }
                };

                let mut record = QuotationRecord::new(RecordKey::new(region.as_str(), code, description));
                for &(col, month) in &layout.month_cols {
                    record.set_value(month, self.cleaner.coerce_count(cell(&grid, row, col)));
                }

                if !table.push(record) {
                    duplicates += 1;
                    warn!(sheet = %region, row = row + 1, "重复的 (UF, Código, Descrição), 保留首次出现的行");
                }
            }
        }

        if skipped > 0 {
            warn!(skipped = skipped, "跳过缺少代码或描述的行");
        }
        info!(
            rows = table.len(),
            months = table.months().len(),
            duplicates = duplicates,
            "报价工作簿导入完成"
        );
        Ok(table)
    }

    // 解析表头行, 返回列布局
    fn resolve_layout(
        &self,
        sheet: &str,
        grid: &SheetGrid,
        window: &MonthWindow,
    ) -> ImportResult<SheetLayout> {
        let header_row = self.settings.header_skip_rows;
        let header_missing = || ImportError::HeaderRowMissing {
            sheet: sheet.to_string(),
            row: header_row + 1,
        };
        let headers = grid.get(header_row).ok_or_else(header_missing)?;
        if headers.iter().all(|c| c.is_blank()) {
            return Err(header_missing());
        }

        let mut code_col = None;
        let mut description_col = None;
        let mut month_cols: Vec<(usize, Month)> = Vec::new();

        for (col, raw) in headers.iter().enumerate() {
            let text = self.cleaner.normalize_text(raw).unwrap_or_default();
            match classify_header(&text) {
                HeaderKind::Code => {
                    code_col.get_or_insert(col);
                }
                HeaderKind::Description => {
                    description_col.get_or_insert(col);
                }
                HeaderKind::Month(month) => {
                    if !window.contains(month) {
                        debug!(sheet = %sheet, month = %month, "月份不在窗口内, 丢弃该列");
                    } else if month_cols.iter().any(|(_, m)| *m == month) {
                        warn!(sheet = %sheet, month = %month, "重复的月份列, 保留第一列");
                    } else {
                        month_cols.push((col, month));
                    }
                }
                HeaderKind::InvalidMonth(header) => {
                    // 整列为空的非法表头会被当作空列丢弃
                    if column_has_data(grid, header_row + 1, col) {
                        return Err(ImportError::InvalidMonthHeader {
                            sheet: sheet.to_string(),
                            header,
                        });
                    }
                }
                HeaderKind::Other(header) => {
                    if column_has_data(grid, header_row + 1, col) {
                        warn!(sheet = %sheet, column = %header, "非模式列, 已丢弃");
                    }
                }
                HeaderKind::Empty => {}
            }
        }

        let missing = |column: &str| ImportError::ColumnMissing {
            sheet: sheet.to_string(),
            column: column.to_string(),
        };
        Ok(SheetLayout {
            code_col: code_col.ok_or_else(|| missing(CODE_HEADER))?,
            description_col: description_col.ok_or_else(|| missing(DESCRIPTION_HEADER))?,
            month_cols,
        })
    }
}

fn row_is_blank(grid: &SheetGrid, row: usize) -> bool {
    grid.get(row).map_or(true, |cells| cells.iter().all(|c| c.is_blank()))
}

fn column_has_data(grid: &SheetGrid, first_row: usize, col: usize) -> bool {
    (first_row..grid.len()).any(|row| !cell(grid, row, col).is_blank())
}
