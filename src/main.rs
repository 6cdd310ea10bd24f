//! Notification Bridge CLI
//!
//! 用脚本驱动通知桥接，查看平台能力

use anyhow::Result;
use clap::{Parser, Subcommand};
use notification_bridge::cli::{handle_capabilities, handle_replay, CapabilitiesArgs, ReplayArgs};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "nbridge")]
#[command(about = "Notification Bridge - 原生通知库与移动 OS 通知框架之间的桥接")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 执行 JSON Lines 脚本，打印所有 OS 调用和回调
    Replay(ReplayArgs),
    /// 打印平台能力和紧急程度映射
    Capabilities(CapabilitiesArgs),
}

fn main() -> Result<()> {
    // 通过 RUST_LOG 控制日志级别，默认为 info
    // 例如: RUST_LOG=debug nbridge replay script.jsonl
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("notification_bridge=info,nbridge=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay(args) => handle_replay(args)?,
        Commands::Capabilities(args) => handle_capabilities(args)?,
    }

    Ok(())
}
