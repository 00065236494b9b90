//! 置換表本体

use super::entry::TTEntry;

/// 置換表
///
/// スロット数は2の冪で固定。`store` は衝突したスロットを無条件に上書きする。
pub struct TranspositionTable {
    slots: Vec<Option<TTEntry>>,
    mask: u64,
}

impl TranspositionTable {
    /// 新しい置換表を作成（容量は2以上の2の冪に切り上げる）
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2).next_power_of_two();
        Self {
            slots: vec![None; capacity],
            mask: capacity as u64 - 1,
        }
    }

    /// 容量を変更（内容は破棄される）
    pub fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(2).next_power_of_two();
        if capacity != self.slots.len() {
            *self = Self::new(capacity);
        } else {
            self.clear();
        }
    }

    /// 容量（スロット数）
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// クリア
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash & self.mask) as usize
    }

    /// ハッシュが一致するエントリを返す
    ///
    /// 深さや境界による打ち切り判定は呼び出し側（`TTEntry::cutoff`）で行う。
    #[inline]
    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        self.slots[self.index(hash)].filter(|e| e.hash == hash)
    }

    /// エントリを書き込む（常に上書き）
    #[inline]
    pub fn store(&mut self, entry: TTEntry) {
        let index = self.index(entry.hash);
        self.slots[index] = Some(entry);
    }

    /// 使用率を1000分率で返す（先頭1000スロットを標本にする）
    pub fn hashfull(&self) -> i32 {
        let sample = 1000.min(self.slots.len());
        let used = self.slots[..sample].iter().filter(|s| s.is_some()).count();
        (used * 1000 / sample) as i32
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(super::DEFAULT_TT_CAPACITY)
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("capacity", &self.capacity())
            .field("hashfull", &self.hashfull())
            .finish()
    }
}
