//! # carctl CLI
//!
//! Toyota 车辆控制器的离线仿真工具。
//!
//! ```bash
//! # 运行内置场景
//! carctl-cli simulate --model PRIUS
//!
//! # 运行场景文件，输出 JSON
//! carctl-cli simulate --scenario stop_and_go.toml --format json
//!
//! # 生成车辆配置模板
//! carctl-cli profile --model COROLLA --interceptor > corolla.toml
//!
//! # 查看保活报文
//! carctl-cli statics --model RAV4H
//! ```
//!
//! 日志级别由 `RUST_LOG` 控制，默认 `carctl_cli=info`。

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod scenario;

use commands::{ProfileCommand, SimulateCommand, StaticsCommand};

/// carctl CLI - 车辆控制器仿真工具
#[derive(Parser, Debug)]
#[command(name = "carctl-cli")]
#[command(about = "Offline simulation tool for the Toyota car controller", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 按场景逐帧运行控制器
    Simulate {
        #[command(flatten)]
        args: SimulateCommand,
    },

    /// 打印车辆配置
    Profile {
        #[command(flatten)]
        args: ProfileCommand,
    },

    /// 列出保活报文
    Statics {
        #[command(flatten)]
        args: StaticsCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，不干扰 JSON 输出）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carctl_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { args } => args.execute(),
        Commands::Profile { args } => args.execute(),
        Commands::Statics { args } => args.execute(),
    }
}
