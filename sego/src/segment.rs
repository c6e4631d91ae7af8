//! 分かち書きの結果を表す型
//!
//! [`Segment`]は認識された1語の入力中のバイト範囲と単語を表し、
//! [`Segments`]は1つの入力に対する分かち書き結果全体を保持します。

use std::ops::Range;

use crate::dictionary::{Dictionary, WordIdx};
use crate::render;
use crate::text::Text;
use crate::token::{Token, TokenIter};

/// 認識された1語の範囲
///
/// 位置はバイト単位です。未知語の場合、単語は`None`です。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    start: usize,
    end: usize,
    word: Option<WordIdx>,
}

impl Segment {
    #[inline(always)]
    pub(crate) const fn new(start: usize, end: usize, word: Option<WordIdx>) -> Self {
        Self { start, end, word }
    }

    /// 開始バイト位置を返します。
    #[inline(always)]
    pub fn start(&self) -> usize {
        self.start
    }

    /// 終了バイト位置を返します。
    #[inline(always)]
    pub fn end(&self) -> usize {
        self.end
    }

    /// バイト範囲を返します。
    #[inline(always)]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// 辞書の単語を返します。未知語の場合は`None`です。
    #[inline(always)]
    pub fn word_idx(&self) -> Option<WordIdx> {
        self.word
    }
}

/// 1つの入力に対する分かち書き結果
///
/// セグメントは入力の先頭から順に並び、隣り合うセグメントの境界は一致します。
/// 全セグメントを連結すると入力全体になります。
pub struct Segments<'a> {
    dict: &'a Dictionary,
    input: &'a [u8],
    text: Text<'a>,
    segments: Vec<Segment>,
}

impl<'a> Segments<'a> {
    pub(crate) fn new(
        dict: &'a Dictionary,
        input: &'a [u8],
        text: Text<'a>,
        segments: Vec<Segment>,
    ) -> Self {
        Self {
            dict,
            input,
            text,
            segments,
        }
    }

    /// セグメント数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    #[inline(always)]
    pub fn get(&self, i: usize) -> Option<&Segment> {
        self.segments.get(i)
    }

    /// 要素分割済みの入力を返します。
    #[inline(always)]
    pub fn text(&self) -> &Text<'a> {
        &self.text
    }

    /// `i`番目のトークンを返します。
    ///
    /// # パニック
    ///
    /// `i`がセグメント数以上の場合にパニックします。
    #[inline(always)]
    pub fn token(&self, i: usize) -> Token<'_> {
        Token::new(self.dict, self.text.as_bytes(), self.input, self.segments[i])
    }

    /// トークンのイテレータを返します。
    pub fn iter(&self) -> TokenIter<'_> {
        TokenIter::new(self.dict, self.text.as_bytes(), self.input, &self.segments)
    }

    /// `<表記>/<品詞> `の形式で連結した文字列を返します。
    ///
    /// `search`が`true`の場合、細分割を持つ単語はその部分に展開されます。
    ///
    /// # 例
    ///
    /// ```
    /// use sego::{Dictionary, Segmenter, WordEntry};
    ///
    /// let dict = Dictionary::from_entries([WordEntry::new("中国", 10, "ns")])?;
    /// let segmenter = Segmenter::new(dict);
    /// assert_eq!(segmenter.segment("中国人").to_tagged_string(false), "中国/ns 人/x ");
    /// # Ok::<(), sego::errors::SegoError>(())
    /// ```
    pub fn to_tagged_string(&self, search: bool) -> String {
        render::to_tagged_string(self.iter(), search)
    }

    /// 各トークンの表記を並べたリストを返します。
    ///
    /// `search`が`true`の場合、細分割を持つ単語はその部分に展開されます。
    pub fn to_strings(&self, search: bool) -> Vec<String> {
        render::to_strings(self.iter(), search)
    }

    /// 細分割を再帰的に含めたキーワードの総数を返します。
    pub fn num_keywords(&self) -> usize {
        render::count_keywords(self.iter())
    }
}

impl<'s, 'a> IntoIterator for &'s Segments<'a> {
    type Item = Token<'s>;
    type IntoIter = TokenIter<'s>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
