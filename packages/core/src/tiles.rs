//! 拼写字母块
//!
//! 每个条目生成一次字母块：目标单词转大写后按字符拆分，再随机打乱。
//! 已放入答案区的字母块仍保留在银行里 (标记为已放置)，所以
//! "银行中可用的字母 + 答案区的字母" 始终等于目标单词的字符多重集。

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 字母块 id：在目标单词中的字符位置，单个条目内唯一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub ch: char,
    pub is_placed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileBoard {
    target: Vec<char>,
    /// 银行，按打乱后的顺序
    bank: Vec<Tile>,
    /// 答案区，按放置顺序
    answer: Vec<TileId>,
}

impl TileBoard {
    /// 按随机顺序生成字母块
    pub fn shuffled<R: Rng + ?Sized>(content: &str, rng: &mut R) -> Self {
        let mut board = Self::in_order(content);
        board.bank.shuffle(rng);
        board
    }

    /// 不打乱，字母块顺序与单词一致
    pub fn in_order(content: &str) -> Self {
        let target: Vec<char> = content.to_uppercase().chars().collect();
        let bank = target
            .iter()
            .enumerate()
            .map(|(idx, ch)| Tile {
                id: TileId(idx as u32),
                ch: *ch,
                is_placed: false,
            })
            .collect();
        Self {
            target,
            bank,
            answer: Vec::new(),
        }
    }

    pub fn target(&self) -> String {
        self.target.iter().collect()
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.bank
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.bank.iter().find(|tile| tile.id == id)
    }

    /// 银行中还能点的字母块
    pub fn available(&self) -> impl Iterator<Item = &Tile> {
        self.bank.iter().filter(|tile| !tile.is_placed)
    }

    /// 答案区的字母块，按放置顺序
    pub fn answer(&self) -> Vec<&Tile> {
        self.answer.iter().filter_map(|id| self.tile(*id)).collect()
    }

    pub fn answer_text(&self) -> String {
        self.answer().iter().map(|tile| tile.ch).collect()
    }

    pub fn is_full(&self) -> bool {
        self.answer.len() == self.target.len()
    }

    pub fn is_correct(&self) -> bool {
        self.is_full() && self.answer().iter().map(|tile| tile.ch).eq(self.target.iter().copied())
    }

    /// 把银行里的字母块放到答案末尾。已放置或不存在的 id 返回 false
    pub fn place(&mut self, id: TileId) -> bool {
        match self.bank.iter_mut().find(|tile| tile.id == id) {
            Some(tile) if !tile.is_placed => {
                tile.is_placed = true;
                self.answer.push(id);
                true
            }
            _ => false,
        }
    }

    /// 从答案区任意位置取回字母块
    pub fn retract(&mut self, id: TileId) -> bool {
        let Some(pos) = self.answer.iter().position(|placed| *placed == id) else {
            return false;
        };
        self.answer.remove(pos);
        if let Some(tile) = self.bank.iter_mut().find(|tile| tile.id == id) {
            tile.is_placed = false;
        }
        true
    }

    /// 全部放回银行，清空答案
    pub fn reset(&mut self) {
        self.answer.clear();
        for tile in &mut self.bank {
            tile.is_placed = false;
        }
    }

    /// 银行可用字母与答案字母合起来是否仍是目标单词的字符多重集
    pub fn preserves_letters(&self) -> bool {
        let mut letters: Vec<char> = self
            .available()
            .map(|tile| tile.ch)
            .chain(self.answer().iter().map(|tile| tile.ch))
            .collect();
        let mut expected = self.target.clone();
        letters.sort_unstable();
        expected.sort_unstable();
        letters == expected && self.answer.len() == self.bank.iter().filter(|t| t.is_placed).count()
    }
}
