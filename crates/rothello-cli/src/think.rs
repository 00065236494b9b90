//! `think` サブコマンド

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rothello_core::position::STARTPOS;
use rothello_core::{Board, Engine, EngineConfig, EvalKind, SearchOutcome};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ThinkArgs {
    /// Board text: 64 cells (X black, O white, - or . empty; `/` and spaces ignored) then the side to move
    #[arg(long, conflicts_with = "startpos")]
    board: Option<String>,

    /// Use the standard starting position (default when --board is not given)
    #[arg(long)]
    startpos: bool,

    /// TOML config file (sections [search] and [eval])
    #[arg(long)]
    config: Option<PathBuf>,

    /// Time budget per move in milliseconds (0 = unlimited)
    #[arg(long)]
    time_ms: Option<u64>,

    /// Search a single fixed depth instead of iterative deepening
    #[arg(long)]
    depth: Option<i32>,

    /// Evaluator (material | weighted)
    #[arg(long)]
    eval: Option<EvalKind>,

    /// Print the outcome as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct ThinkReport<'a> {
    board: String,
    eval: String,
    #[serde(flatten)]
    outcome: &'a SearchOutcome,
}

/// 設定ファイルとコマンドライン指定を合わせた設定
pub(crate) fn load_config(path: Option<&Path>, time_ms: Option<u64>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(ms) = time_ms {
        config.search.time_budget_ms = ms;
    }
    config.validate().context("validating config")?;
    Ok(config)
}

pub fn run(args: ThinkArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref(), args.time_ms)?;
    if let Some(eval) = args.eval {
        config.eval = eval;
    }

    let text = args.board.as_deref().unwrap_or(STARTPOS);
    let mut board: Board = text.parse().with_context(|| format!("parsing board '{text}'"))?;

    let eval_name = config.eval.to_string();
    let mut engine = Engine::new(config.search, config.eval).context("creating engine")?;
    let outcome = match args.depth {
        Some(depth) => engine.search_fixed_depth(&mut board, depth),
        None => engine.think(&mut board),
    };

    if args.json {
        let report = ThinkReport {
            board: board.to_string(),
            eval: eval_name,
            outcome: &outcome,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{board}");
        println!("{outcome}");
    }
    Ok(())
}
