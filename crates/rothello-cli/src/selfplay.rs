//! `selfplay` サブコマンド
//!
//! 2つのエンジンを `Position` の契約だけを通して対局させる（合法手がなければパス）。
//! `--out` を指定すると1局ごとに1行のJSONを追記する。

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use rothello_core::{Board, Color, Engine, EvalKind, Position, SearchConfig};
use serde::Serialize;

use crate::think::load_config;

#[derive(Args, Debug)]
pub struct SelfplayArgs {
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Evaluator for Black (material | weighted)
    #[arg(long, default_value = "weighted")]
    black_eval: EvalKind,

    /// Evaluator for White (material | weighted)
    #[arg(long, default_value = "material")]
    white_eval: EvalKind,

    /// TOML config file; its [search] section applies to both sides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Time budget per move in milliseconds (0 = unlimited)
    #[arg(long)]
    time_ms: Option<u64>,

    /// Search every move at a fixed depth instead of iterative deepening
    #[arg(long)]
    depth: Option<i32>,

    /// Append one JSON record per game to this file
    #[arg(long)]
    out: Option<PathBuf>,
}

/// 1局分の記録
#[derive(Serialize)]
struct GameRecord {
    game: u32,
    finished_at: String,
    black: String,
    white: String,
    moves: Vec<String>,
    black_discs: u32,
    white_discs: u32,
    winner: &'static str,
    final_board: String,
}

struct Player {
    engine: Engine<EvalKind>,
    depth: Option<i32>,
}

impl Player {
    fn new(search: &SearchConfig, eval: EvalKind, depth: Option<i32>) -> Result<Self> {
        let engine = Engine::new(search.clone(), eval).context("creating engine")?;
        Ok(Self { engine, depth })
    }

    fn choose(&mut self, board: &mut Board) -> Option<rothello_core::Square> {
        match self.depth {
            Some(depth) => self.engine.search_fixed_depth(board, depth).best_move,
            None => self.engine.compute(board),
        }
    }
}

fn play_game(black: &mut Player, white: &mut Player) -> Result<(Board, Vec<String>)> {
    black.engine.new_game();
    white.engine.new_game();

    let mut board = Board::new();
    let mut moves = Vec::new();
    while !board.is_game_over() {
        let player = match board.current_player() {
            Color::Black => &mut *black,
            Color::White => &mut *white,
        };
        match player.choose(&mut board) {
            Some(mv) => {
                board
                    .try_apply(mv)
                    .with_context(|| format!("engine returned illegal move {mv} on {board}"))?;
                moves.push(mv.to_string());
            }
            None => {
                board.pass();
                moves.push("pass".to_string());
            }
        }
    }
    Ok((board, moves))
}

pub fn run(args: SelfplayArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.time_ms)?;
    let mut black = Player::new(&config.search, args.black_eval.clone(), args.depth)?;
    let mut white = Player::new(&config.search, args.white_eval.clone(), args.depth)?;

    let mut writer = match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            Some(BufWriter::new(file))
        }
        None => None,
    };

    let (mut black_wins, mut white_wins, mut draws) = (0u32, 0u32, 0u32);
    for game in 1..=args.games {
        let (board, moves) = play_game(&mut black, &mut white)?;
        let winner = match board.winner() {
            Some(Color::Black) => {
                black_wins += 1;
                "black"
            }
            Some(Color::White) => {
                white_wins += 1;
                "white"
            }
            None => {
                draws += 1;
                "draw"
            }
        };
        let (b, w) = (board.count(Color::Black), board.count(Color::White));
        println!("game {game}: {b}-{w} {winner} ({} plies)", moves.len());
        log::info!("game {game} moves: {}", moves.join(" "));

        if let Some(w_out) = writer.as_mut() {
            let record = GameRecord {
                game,
                finished_at: Local::now().to_rfc3339(),
                black: args.black_eval.to_string(),
                white: args.white_eval.to_string(),
                moves,
                black_discs: b,
                white_discs: w,
                winner,
                final_board: board.to_string(),
            };
            writeln!(w_out, "{}", serde_json::to_string(&record)?)?;
        }
    }

    if let Some(mut w_out) = writer {
        w_out.flush()?;
    }

    println!(
        "summary: black({}) {black_wins} / white({}) {white_wins} / draw {draws}",
        args.black_eval, args.white_eval
    );
    Ok(())
}
