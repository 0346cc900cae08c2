// ==========================================
// IPC 报价数量监控系统 - 终端输出渲染
// ==========================================
// 格式: Markdown 表格（tabled）
// 空结果: 输出本地化的空状态提示, 不视为错误
// ==========================================

use crate::api::{ExceptionUploadResponse, FilterOptions, LegendEntry, QuotationUploadResponse};
use crate::config::ConfigEntry;
use crate::domain::summary::{BarChartSeries, CellStyle, DetailTable, HistoricalChart, StatusView};
use crate::domain::types::{CriticalityBand, EXCEPTION_LABEL};
use crate::domain::upload::UploadBatch;
use crate::i18n::{t, t_with_args};
use tabled::builder::Builder;
use tabled::settings::Style;

fn markdown(header: Vec<String>, rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }
    builder.build().with(Style::markdown()).to_string()
}

fn number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// 当月状态视图
pub fn render_status(view: &StatusView) -> String {
    let month = match view.month {
        Some(m) if !view.is_empty() => m,
        _ => return t("empty.no_data"),
    };

    let rows = view
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.region.clone(), month.to_string(), row.total.to_string()];
            cells.extend(CriticalityBand::ALL.iter().map(|b| row.band_count(*b).to_string()));
            cells.push(row.excecao.to_string());
            cells
        })
        .collect();

    format!(
        "### {}\n\n{}",
        t_with_args("status.title", &[("month", &month.to_string())]),
        markdown(
            strings(&["UF", "Data", "Total", "SuperCrítico", "Crítico", "Aceitável", "Suficiente", "Excessão"]),
            rows
        )
    )
}

/// 最近月份柱状图数据
pub fn render_last_month(series: Option<&BarChartSeries>) -> String {
    let series = match series {
        Some(s) => s,
        None => return t("empty.no_data"),
    };
    let title = t_with_args("chart.last_month_title", &[("month", &series.month.to_string())]);
    if series.is_empty() {
        return format!("### {}\n\n{}", title, t("empty.no_match"));
    }

    let rows = series
        .points
        .iter()
        .map(|p| vec![p.region.clone(), number(p.value)])
        .collect();
    format!(
        "### {}\n\n**{}**\n\n{}",
        title,
        series.item_label,
        markdown(strings(&["UF", "Valor"]), rows)
    )
}

/// 历史序列（每个 地区/商品 一列）
pub fn render_history(chart: &HistoricalChart) -> String {
    let title = t("chart.history_title");
    if chart.is_empty() {
        return format!("### {}\n\n{}", title, t("empty.no_match"));
    }

    let months: std::collections::BTreeSet<_> = chart
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.month))
        .collect();

    let mut header = vec!["Data".to_string()];
    header.extend(chart.series.iter().map(|s| format!("{} / {}", s.region, s.item_label)));

    let rows = months
        .iter()
        .map(|month| {
            let mut cells = vec![month.to_string()];
            cells.extend(chart.series.iter().map(|s| {
                s.points
                    .iter()
                    .find(|p| p.month == *month)
                    .map(|p| number(p.value))
                    .unwrap_or_default()
            }));
            cells
        })
        .collect();

    let lines: Vec<String> = chart
        .reference_lines
        .iter()
        .map(|l| format!("- {}: {}", l.label, number(l.value)))
        .collect();

    format!(
        "### {}\n\n{}\n\n{}:\n{}",
        title,
        markdown(header, rows),
        t("chart.reference_lines"),
        lines.join("\n")
    )
}

/// 明细表（单元格附带等级）
pub fn render_detail(detail: &DetailTable) -> String {
    if detail.is_empty() {
        return t("empty.no_match");
    }

    let mut header = strings(&["UF", "Item"]);
    header.extend(detail.months.iter().map(|m| m.to_string()));

    let rows = detail
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.region.clone(), row.item_label.clone()];
            cells.extend(row.cells.iter().map(|cell| match (cell.value, cell.style) {
                (None, _) => String::new(),
                (Some(v), CellStyle::Band(band)) => format!("{} ({})", number(v), band.label()),
                (Some(v), CellStyle::Exception) => format!("{} ({})", number(v), EXCEPTION_LABEL),
                (Some(v), CellStyle::Plain) => number(v),
            }));
            cells
        })
        .collect();

    format!("### {}\n\n{}", t("detail.title"), markdown(header, rows))
}

pub fn render_legend(entries: &[LegendEntry]) -> String {
    let rows = entries
        .iter()
        .map(|e| vec![e.label.clone(), e.description.clone(), e.color.clone()])
        .collect();
    format!(
        "### {}\n\n{}",
        t("legend.title"),
        markdown(strings(&["Criticidade", "Descrição", "Cor"]), rows)
    )
}

pub fn render_filter_options(options: &FilterOptions) -> String {
    if options.months.is_empty() {
        return t("empty.no_data");
    }
    let join = |items: Vec<String>| items.join(", ");
    format!(
        "UF: {}\nItens: {}\nDatas: {}",
        join(options.regions.iter().cloned().collect()),
        options.items.len(),
        join(options.months.iter().map(|m| m.to_string()).collect())
    )
}

pub fn render_uploads(batches: &[UploadBatch]) -> String {
    if batches.is_empty() {
        return t("empty.no_history");
    }
    let rows = batches
        .iter()
        .map(|b| {
            vec![
                b.uploaded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                b.kind.to_string(),
                b.file_name.clone().unwrap_or_default(),
                b.row_count.to_string(),
                b.months_added.join(", "),
                b.unmatched_rows.to_string(),
            ]
        })
        .collect();
    markdown(
        strings(&["Data/Hora", "Tipo", "Arquivo", "Linhas", "Meses novos", "Ignoradas"]),
        rows,
    )
}

pub fn render_config(entries: &[ConfigEntry]) -> String {
    let rows = entries
        .iter()
        .map(|e| {
            vec![
                e.key.clone(),
                e.value.clone(),
                if e.is_default { "padrão".to_string() } else { String::new() },
            ]
        })
        .collect();
    markdown(strings(&["Chave", "Valor", ""]), rows)
}

pub fn render_quotation_upload(response: &QuotationUploadResponse) -> String {
    response.message.clone()
}

pub fn render_exception_upload(response: &ExceptionUploadResponse) -> String {
    response.message.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summary::{BarPoint, ComparativeSummary};
    use crate::domain::types::Month;

    #[test]
    fn test_render_status_markdown() {
        let month = Month::new(2024, 2).unwrap();
        let mut summary = ComparativeSummary::new("SP", month);
        summary.total = 1;
        summary.aceitavel = 1;
        let text = render_status(&StatusView {
            month: Some(month),
            rows: vec![summary],
        });
        assert!(text.contains("| UF "));
        assert!(text.contains("| SP "));
        assert!(text.contains("02/2024"));
    }

    #[test]
    fn test_render_last_month_lists_points() {
        let series = BarChartSeries {
            month: Month::new(2024, 3).unwrap(),
            item_label: "1001 - Arroz".to_string(),
            points: vec![BarPoint {
                region: "SP".to_string(),
                value: 42.5,
            }],
        };
        let text = render_last_month(Some(&series));
        assert!(text.contains("03/2024"));
        assert!(text.contains("1001 - Arroz"));
        assert!(text.contains("42.50"));
    }

    #[test]
    fn test_render_empty_detail_is_not_a_table() {
        let text = render_detail(&DetailTable::default());
        assert!(!text.contains('|'));
    }
}
