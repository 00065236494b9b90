//! rothello: 探索エンジンのコマンドラインハーネス
//!
//! # よく使うコマンド例
//!
//! - 初期局面で1手考える:
//!   `cargo run -p rothello-cli -- think --startpos --time-ms 1000`
//!
//! - 固定深さで盤面テキストを解析し、JSONで出力:
//!   `cargo run -p rothello-cli -- think --board "<64マス> X" --depth 6 --json`
//!
//! - 重み付き評価と石差評価で10局対戦し、結果をJSONLに追記:
//!   `cargo run -p rothello-cli -- selfplay --games 10 --black-eval weighted --white-eval material --out runs/selfplay.jsonl`

mod selfplay;
mod think;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "rothello Othello engine harness")]
struct Cli {
    /// Log filter used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search one position and print the chosen move
    Think(think::ThinkArgs),
    /// Play complete games between two engines
    Selfplay(selfplay::SelfplayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .format_timestamp_millis()
        .init();

    match cli.command {
        Command::Think(args) => think::run(args),
        Command::Selfplay(args) => selfplay::run(args),
    }
}
