// ==========================================
// IPC 报价数量监控系统 - 命令行接口
// ==========================================
// 职责: 解析命令行参数, 调用 API 层, 返回待输出文本
// 输出: 默认 Markdown 表格; --json 输出结构化 JSON
// ==========================================

use crate::api::ApiError;
use crate::app::render;
use crate::app::state::AppState;
use crate::domain::summary::{BarChartSeries, DetailTable, HistoricalChart, StatusView};
use crate::domain::types::{CriticalityOption, Month};
use crate::engine::{BarChartRequest, DetailQuery, HistoricalRequest};
use crate::export::{self, ExportError, ExportFormat, ExportResult};
use crate::i18n::t_with_args;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "ipc-cotacoes",
    version,
    about = "Controle de Cotações - acompanhamento da quantidade de cotações do IPC"
)]
pub struct Cli {
    /// Caminho do banco SQLite (padrão: IPC_COTACOES_DB ou diretório de dados do usuário)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Saída em JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Data de referência (YYYY-MM-DD) usada para limitar os meses importados
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Quadro do mês mais recente por UF
    Status {
        /// Exporta para .xlsx ou .csv
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Séries para gráficos
    Chart {
        #[command(subcommand)]
        chart: ChartCommand,
    },
    /// Tabela detalhada com filtros
    Detail {
        #[arg(long = "region")]
        regions: Vec<String>,
        #[arg(long = "item")]
        items: Vec<String>,
        /// Mês no formato MM/YYYY
        #[arg(long = "month")]
        months: Vec<Month>,
        /// SuperCrítico, Crítico, Aceitável, Suficiente ou Exceção
        #[arg(long)]
        criticality: Vec<CriticalityOption>,
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Envio de planilhas
    Upload {
        #[command(subcommand)]
        upload: UploadCommand,
    },
    /// Histórico de envios
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Legenda de criticidade
    Legend,
    /// Valores disponíveis para os filtros
    Options,
    /// Configurações
    Config {
        #[command(subcommand)]
        config: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ChartCommand {
    /// Média do último mês por UF para um item
    LastMonth {
        #[arg(long = "region")]
        regions: Vec<String>,
        #[arg(long)]
        item: Option<String>,
        /// Exporta para .csv
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Série histórica por UF e item
    History {
        #[arg(long = "region", required = true)]
        regions: Vec<String>,
        #[arg(long = "item", required = true)]
        items: Vec<String>,
        /// Exporta para .csv
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum UploadCommand {
    /// Planilha de cotações (uma aba por UF)
    Quotations { file: PathBuf },
    /// Planilha de itens com exceção
    Exceptions { file: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    List,
    Set { key: String, value: String },
}

// 文本或 JSON 输出
fn output<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}

fn exported(path: &Path) -> String {
    t_with_args("export.done", &[("path", &path.display().to_string())])
}

fn csv_file(path: &Path) -> ExportResult<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

fn export_status(view: &StatusView, path: &Path) -> ExportResult<()> {
    match ExportFormat::from_path(path)? {
        ExportFormat::Xlsx => export::write_status_xlsx(view, path),
        ExportFormat::Csv => export::write_status_csv(view, csv_file(path)?),
    }
}

fn export_detail(detail: &DetailTable, path: &Path) -> ExportResult<()> {
    match ExportFormat::from_path(path)? {
        ExportFormat::Xlsx => export::write_detail_xlsx(detail, path),
        ExportFormat::Csv => export::write_detail_csv(detail, csv_file(path)?),
    }
}

// 图表数据只支持 CSV
fn require_csv(path: &Path) -> ExportResult<()> {
    match ExportFormat::from_path(path)? {
        ExportFormat::Csv => Ok(()),
        ExportFormat::Xlsx => Err(ExportError::UnsupportedFormat("xlsx".to_string())),
    }
}

fn export_last_month(series: &BarChartSeries, path: &Path) -> ExportResult<()> {
    require_csv(path)?;
    export::write_last_month_csv(series, csv_file(path)?)
}

fn export_history(chart: &HistoricalChart, path: &Path) -> ExportResult<()> {
    require_csv(path)?;
    export::write_history_csv(chart, csv_file(path)?)
}

/// 地区参数 → 已存地区名（忽略大小写匹配, 未知名称原样保留）
fn resolve_regions(state: &AppState, regions: &[String]) -> anyhow::Result<BTreeSet<String>> {
    if regions.is_empty() {
        return Ok(BTreeSet::new());
    }
    let known = state.dashboard_api.filter_options()?.regions;
    Ok(regions
        .iter()
        .map(|raw| {
            let name = raw.trim();
            known
                .iter()
                .find(|k| k.to_lowercase() == name.to_lowercase())
                .cloned()
                .unwrap_or_else(|| name.to_string())
        })
        .collect())
}

/// 执行命令, 返回待输出到 stdout 的文本
pub fn run(cli: &Cli, state: &AppState) -> anyhow::Result<String> {
    let json = cli.json;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    match &cli.command {
        Command::Status { export } => {
            let view = state.dashboard_api.status_view()?;
            if let Some(path) = export {
                export_status(&view, path).map_err(ApiError::from)?;
                return Ok(exported(path));
            }
            output(json, &view, render::render_status)
        }

        Command::Chart { chart } => match chart {
            ChartCommand::LastMonth { regions, item, export } => {
                let request = BarChartRequest {
                    regions: resolve_regions(state, regions)?,
                    item_label: item.clone(),
                };
                let series = state.dashboard_api.last_month_chart(&request)?;
                if let Some(path) = export {
                    let series = series.context(render::render_last_month(None))?;
                    export_last_month(&series, path).map_err(ApiError::from)?;
                    return Ok(exported(path));
                }
                output(json, &series, |s| render::render_last_month(s.as_ref()))
            }
            ChartCommand::History { regions, items, export } => {
                let request = HistoricalRequest {
                    regions: resolve_regions(state, regions)?,
                    item_labels: items.iter().cloned().collect(),
                };
                let chart = state.dashboard_api.historical_chart(&request)?;
                if let Some(path) = export {
                    export_history(&chart, path).map_err(ApiError::from)?;
                    return Ok(exported(path));
                }
                output(json, &chart, render::render_history)
            }
        },

        Command::Detail {
            regions,
            items,
            months,
            criticality,
            export,
        } => {
            let query = DetailQuery {
                regions: resolve_regions(state, regions)?,
                item_labels: items.iter().cloned().collect(),
                months: months.iter().copied().collect(),
                criticality: criticality.iter().copied().collect(),
            };
            let detail = state.detail_api.detail(&query)?;
            if let Some(path) = export {
                export_detail(&detail, path).map_err(ApiError::from)?;
                return Ok(exported(path));
            }
            output(json, &detail, render::render_detail)
        }

        Command::Upload { upload } => match upload {
            UploadCommand::Quotations { file } => {
                info!(file = %file.display(), today = %today, "开始上传报价文件");
                let response = state.upload_api.upload_quotations(file, today)?;
                output(json, &response, render::render_quotation_upload)
            }
            UploadCommand::Exceptions { file } => {
                info!(file = %file.display(), "开始上传例外文件");
                let response = state.upload_api.upload_exceptions(file)?;
                output(json, &response, render::render_exception_upload)
            }
        },

        Command::History { limit } => {
            let batches = state.upload_api.list_uploads(*limit)?;
            output(json, &batches, |b| render::render_uploads(b))
        }

        Command::Legend => {
            let legend = state.dashboard_api.legend();
            output(json, &legend, |l| render::render_legend(l))
        }

        Command::Options => {
            let options = state.dashboard_api.filter_options()?;
            output(json, &options, render::render_filter_options)
        }

        Command::Config { config } => match config {
            ConfigCommand::List => {
                let entries = state.config_api.list_configs()?;
                output(json, &entries, |e| render::render_config(e))
            }
            ConfigCommand::Set { key, value } => {
                let entry = state.config_api.update_config(key, value)?;
                output(json, &entry, |e| {
                    t_with_args("config.updated", &[("key", &e.key), ("value", &e.value)])
                })
            }
        },
    }
}
