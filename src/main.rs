// ==========================================
// IPC 报价数量监控系统 - 命令行主入口
// ==========================================
// stdout: 命令结果; stderr: 日志与错误
// 退出码: 成功 0, 失败 1
// ==========================================

use clap::Parser;
use ipc_cotacoes::api::ApiError;
use ipc_cotacoes::app::{get_default_db_path, run, AppState, Cli};
use std::process::ExitCode;

fn error_code(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<ApiError>()
        .map(ApiError::code)
        .unwrap_or("INTERNAL_ERROR")
}

fn main() -> ExitCode {
    // 初始化日志系统
    ipc_cotacoes::logging::init();

    let cli = Cli::parse();

    tracing::debug!("系统版本: {}", ipc_cotacoes::VERSION);

    // 获取数据库路径
    let db_path = cli.db.clone().unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let result = AppState::new(db_path)
        .map_err(anyhow::Error::msg)
        .and_then(|state| run(&cli, &state));

    match result {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("命令执行失败: {:#}", err);
            if cli.json {
                let body = serde_json::json!({
                    "code": error_code(&err),
                    "message": format!("{:#}", err),
                });
                eprintln!("{}", body);
            } else {
                eprintln!("Erro: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}
