// ==========================================
// IPC 报价数量监控系统 - 日志初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 日志写入 stderr, stdout 只输出命令结果
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=ipc_cotacoes=trace
///
/// # 示例
/// ```no_run
/// use ipc_cotacoes::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with_default("info");
}

/// 以指定默认级别初始化（RUST_LOG 优先）
///
/// 重复调用时忽略（try_init）
pub fn init_with_default(default_level: &str) {
    // 从环境变量读取日志级别
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // 配置日志格式
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
