mod commands;
mod render;
mod utils;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skylaunch")]
#[command(
    about = "Keep knocking on OCI availability domains until your instance launches",
    long_about = None
)]
struct Cli {
    /// デバッグログを有効化 (RUST_LOG より優先)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 成功するまで可用性ドメインを巡回してインスタンス作成を再試行
    Launch {
        /// 設定ファイル (デフォルト: SKYLAUNCH_CONFIG, ./skylaunch.json, ...)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// 成功しないまま指定ラウンド数に達したら終了
        #[arg(long)]
        max_rounds: Option<u64>,
        /// 試行する可用性ドメイン（指定順、複数指定可）
        #[arg(short = 'z', long = "zone")]
        zones: Vec<String>,
    },
    /// 対話形式で設定ファイルを作成
    Init {
        /// 設定ファイルの書き込み先 (デフォルト: ./skylaunch.json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// 設定を確認
    #[command(subcommand)]
    Config(ConfigCommands),
    /// oci CLI のインストールと認証を確認
    Check,
    /// Always Free 枠に対する現在のリソース使用量を表示
    Usage {
        /// 設定ファイル
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// バージョン情報を表示
    Version,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// 現在の設定を表示
    Show {
        /// 設定ファイル
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Launch {
            config,
            max_rounds,
            zones,
        } => return commands::launch::handle(config, max_rounds, zones).await,
        Commands::Init { config } => commands::init::handle(config).await?,
        Commands::Config(ConfigCommands::Show { config }) => {
            commands::config::handle_show(config).await?
        }
        Commands::Check => return commands::check::handle().await,
        Commands::Usage { config } => commands::usage::handle(config).await?,
        Commands::Version => {
            println!("skylaunch {}", env!("CARGO_PKG_VERSION"));
        }
    }
    Ok(ExitCode::SUCCESS)
}
