//! 最短経路探索のためのジャンプ表
//!
//! 各要素位置について、その位置で終わる単語のうち、テキスト先頭からの累積パスコストが
//! 最小になるものを記録します。

use crate::dictionary::word_idx::WordIdx;
use crate::segment::Segment;
use crate::text::Text;

/// ある要素位置で終わる最良の単語
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jump {
    /// テキスト先頭からこの位置の直後までの最小パスコスト
    pub min_distance: f32,
    /// 最小コストを与えた単語。未知語の場合は`None`。
    pub word: Option<WordIdx>,
    /// 単語の要素数
    pub len: usize,
}

/// 要素位置ごとのジャンプ記録
///
/// 未訪問の位置は`None`で表します。
#[derive(Default, Debug)]
pub struct JumpTable {
    jumps: Vec<Option<Jump>>,
}

impl JumpTable {
    /// `len`要素分の未訪問の記録で初期化します。
    pub fn reset(&mut self, len: usize) {
        self.jumps.clear();
        self.jumps.resize(len, None);
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.jumps.len()
    }

    /// `pos`で終わる経路の最小パスコストを返します。未訪問の場合は`None`です。
    #[inline(always)]
    pub fn min_distance(&self, pos: usize) -> Option<f32> {
        self.jumps[pos].map(|jump| jump.min_distance)
    }

    #[inline(always)]
    pub fn get(&self, pos: usize) -> Option<&Jump> {
        self.jumps[pos].as_ref()
    }

    /// `end`で終わる単語の候補で記録を更新します。
    ///
    /// 未訪問の場合か、新しいコストが現在の最小値より真に小さい場合にのみ置き換えます。
    /// 同じコストの候補は先に登録されたものが残ります。
    #[inline(always)]
    pub fn update(&mut self, end: usize, distance: f32, word: Option<WordIdx>, len: usize) {
        let slot = &mut self.jumps[end];
        if slot.is_none_or(|jump| distance < jump.min_distance) {
            *slot = Some(Jump {
                min_distance: distance,
                word,
                len,
            });
        }
    }

    /// 末尾から記録をたどり、最短経路をセグメントの列として`out`に書き出します。
    ///
    /// セグメントの位置は`text`のバイト位置です。
    pub fn backtrack(&self, text: &Text, out: &mut Vec<Segment>) {
        out.clear();
        let mut end = self.jumps.len();
        while end > 0 {
            // Every position is reached at least by the single-element fallback.
            let (word, len) = self.jumps[end - 1].map_or((None, 1), |jump| (jump.word, jump.len));
            let start = end - len;
            out.push(Segment::new(
                text.byte_position(start),
                text.byte_position(end),
                word,
            ));
            end = start;
        }
        out.reverse();
    }
}
