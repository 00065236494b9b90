//! 局面表現モジュール
//!
//! 探索コアが局面に要求する操作を `Position` トレイトとして定義し、
//! その参照実装としてビットボード版の `Board` を提供する。
//!
//! - `Position`: 探索コアが使う操作の契約（合法手列挙・着手・パス・巻き戻し・参照系クエリ）
//! - `Board`: ビットボード実装（手の実行・巻き戻しを `Snapshot` のスタックで管理）
//! - `zobrist`: Zobristハッシュ乱数テーブルと局面キー計算
//! - 盤面テキスト形式の解析・出力
//!
//! `apply` / `pass` と `undo` は厳密な LIFO で対応させる。探索コアは各子ノードの探索後、
//! どの経路（カットオフ・時間切れ・通常終了）で戻る場合でも必ず `undo` してから親に戻る。

mod board;
pub mod zobrist;

pub use board::{Board, STARTPOS};

use thiserror::Error;

use crate::types::{Color, MoveList, Square};

/// 局面操作・解析のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// 盤面テキストのマス数が64でない
    #[error("board text must contain 64 cells, found {0}")]
    InvalidLength(usize),

    /// 盤面テキストに解釈できない文字がある
    #[error("invalid cell character '{0}'")]
    InvalidCell(char),

    /// 手番の指定が解釈できない
    #[error("invalid side to move '{0}'")]
    InvalidSide(String),

    /// マス名が解釈できない
    #[error("invalid square name '{0}'")]
    InvalidSquare(String),

    /// 非合法手
    #[error("illegal move {0}")]
    IllegalMove(Square),
}

/// 探索コアが局面に要求する操作
///
/// 盤面表現（配列・ビットボード等）はこの契約を満たせば差し替え可能。
/// `apply(m)` 直後の `undo()` は、全マス・手番・石数・内部の履歴スタックを
/// ビット単位で元に戻さなければならない。
pub trait Position {
    /// 手番側の合法手（なければ空＝パスが必要）
    fn legal_moves(&self) -> MoveList;

    /// 着手して石を裏返し、手番を交代する。`undo` で完全に戻せる状態を積む。
    ///
    /// `mv` は `legal_moves` に含まれる手でなければならない。
    fn apply(&mut self, mv: Square);

    /// 直前の `apply` / `pass` を取り消す
    fn undo(&mut self);

    /// 石を置かずに手番を交代する（`undo` で取り消す）
    fn pass(&mut self);

    /// 手番側に合法手が1つ以上あるか
    ///
    /// 強制パス直後に呼び、連続パス（終局）を検出するのに使う。
    fn is_legal(&self) -> bool;

    /// マスの石（空きなら `None`）
    fn cell_at(&self, sq: Square) -> Option<Color>;

    /// 指定色の石数
    fn count(&self, color: Color) -> u32;

    /// 手番
    fn current_player(&self) -> Color;

    /// 局面のハッシュキー
    ///
    /// 既定実装は `cell_at` と `current_player` から Zobrist キーを毎回計算する。
    /// 差分更新できる実装は上書きしてよいが、既定実装と同じ値を返すこと。
    fn key(&self) -> u64 {
        zobrist::compute_key(self)
    }

    /// 空きマス数
    fn empty_count(&self) -> u32 {
        64 - self.count(Color::Black) - self.count(Color::White)
    }
}

/// `cell_at` から (手番側, 相手側) のビットボードを組み立てる
///
/// 評価関数や手の並べ替えが `Position` の実装に依存せずにビット演算を使うための補助。
pub fn occupancy<P: Position + ?Sized>(pos: &P) -> (u64, u64) {
    let me = pos.current_player();
    let mut mine = 0u64;
    let mut theirs = 0u64;
    for sq in Square::all() {
        match pos.cell_at(sq) {
            Some(c) if c == me => mine |= sq.bit(),
            Some(_) => theirs |= sq.bit(),
            None => {}
        }
    }
    (mine, theirs)
}
