use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志系统，输出到 stderr
///
/// `RUST_LOG` 优先，否则使用配置中的级别。
///
/// 示例:
/// - RUST_LOG=debug courier send Users/List
/// - RUST_LOG=courier=trace courier send Users/List
pub fn init_logger(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // 重复初始化（例如测试中）时忽略
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();

    tracing::debug!("Logger initialized");
}
