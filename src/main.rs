mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use courier::config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConfigLoader::find_and_load()?;

    // 初始化日志系统
    courier::logger::init_logger(&config.log_level);

    cli::run(cli, &config).await
}
