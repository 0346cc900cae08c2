// ==========================================
// IPC 报价数量监控系统 - CSV 导出
// ==========================================
// 列与 Excel 导出一致; 空值写为空字符串
// ==========================================

use crate::domain::summary::{BarChartSeries, DetailTable, HistoricalChart, StatusView};
use crate::domain::types::CriticalityBand;
use crate::export::xlsx_export::STATUS_HEADERS;
use crate::export::ExportResult;
use std::io::Write;

fn number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

pub fn write_status_csv<W: Write>(view: &StatusView, out: W) -> ExportResult<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(STATUS_HEADERS)?;
    for row in &view.rows {
        let mut record = vec![
            row.region.clone(),
            row.month.map(|m| m.to_string()).unwrap_or_default(),
            row.total.to_string(),
        ];
        record.extend(CriticalityBand::ALL.iter().map(|b| row.band_count(*b).to_string()));
        record.push(row.excecao.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_detail_csv<W: Write>(detail: &DetailTable, out: W) -> ExportResult<()> {
    let mut writer = csv::Writer::from_writer(out);
    let mut header = vec!["UF".to_string(), "Item".to_string(), "Código".to_string()];
    header.extend(detail.months.iter().map(|m| m.to_string()));
    writer.write_record(&header)?;

    for row in &detail.rows {
        let mut record = vec![row.region.clone(), row.item_label.clone(), row.code.clone()];
        record.extend(row.cells.iter().map(|c| c.value.map(number).unwrap_or_default()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_last_month_csv<W: Write>(series: &BarChartSeries, out: W) -> ExportResult<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["UF", "Item", "Data", "Valor"])?;
    let month = series.month.to_string();
    for point in &series.points {
        writer.write_record([
            point.region.as_str(),
            series.item_label.as_str(),
            month.as_str(),
            number(point.value).as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_history_csv<W: Write>(chart: &HistoricalChart, out: W) -> ExportResult<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["UF", "Item", "Data", "Valor"])?;
    for series in &chart.series {
        for point in &series.points {
            writer.write_record([
                series.region.as_str(),
                series.item_label.as_str(),
                point.month.to_string().as_str(),
                number(point.value).as_str(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summary::{ComparativeSummary, DetailCell, DetailRow, CellStyle};
    use crate::domain::types::Month;

    fn month(m: u32) -> Month {
        Month::new(2024, m).unwrap()
    }

    #[test]
    fn test_status_csv() {
        let mut summary = ComparativeSummary::new("SP", month(2));
        summary.total = 1;
        summary.aceitavel = 1;
        let view = StatusView {
            month: Some(month(2)),
            rows: vec![summary],
        };
        let mut buf = Vec::new();
        write_status_csv(&view, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "UF,Data,Total,SuperCrítico,Crítico,Aceitável,Suficiente,Excessão");
        assert_eq!(lines[1], "SP,02/2024,1,0,0,1,0,0");
    }

    #[test]
    fn test_detail_csv_blank_for_missing() {
        let detail = DetailTable {
            months: vec![month(1), month(2)],
            rows: vec![DetailRow {
                region: "SP".to_string(),
                code: "1001".to_string(),
                description: "Arroz".to_string(),
                item_label: "1001 - Arroz".to_string(),
                is_exception: false,
                cells: vec![
                    DetailCell {
                        month: month(1),
                        value: Some(30.0),
                        style: CellStyle::Plain,
                    },
                    DetailCell {
                        month: month(2),
                        value: None,
                        style: CellStyle::Plain,
                    },
                ],
            }],
        };
        let mut buf = Vec::new();
        write_detail_csv(&detail, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().nth(1), Some("SP,1001 - Arroz,1001,30,"));
    }
}
