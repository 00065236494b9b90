//! 石差評価

use super::Evaluator;
use crate::position::Position;
use crate::types::Value;

/// 手番側の石数から相手の石数を引いた値を返す評価
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Material;

impl Evaluator for Material {
    #[inline]
    fn evaluate<P: Position + ?Sized>(&self, pos: &P) -> Value {
        let me = pos.current_player();
        let diff = pos.count(me) as i32 - pos.count(me.opponent()) as i32;
        Value::new(diff)
    }
}
