//! 辞書の語彙情報を管理するモジュール
//!
//! このモジュールは、単語の表記、頻度、パスコスト、品詞を管理する
//! 語彙データ構造と、辞書ソースの行を解析する関数を提供します。

mod map;

use crate::dictionary::lexicon::map::WordMap;
use crate::dictionary::word_idx::WordIdx;
use crate::errors::Result;
use crate::text::Text;

/// 辞書ソースから供給される1件の単語エントリ
///
/// `(表記, 頻度, 品詞)` の三つ組です。品詞がない場合は空文字列にします。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordEntry {
    /// 単語の表記
    pub text: String,
    /// ソース辞書での出現頻度
    pub frequency: u64,
    /// 品詞タグ
    pub pos: String,
}

impl WordEntry {
    /// 新しいエントリを作成します。
    pub fn new<T, P>(text: T, frequency: u64, pos: P) -> Self
    where
        T: Into<String>,
        P: Into<String>,
    {
        Self {
            text: text.into(),
            frequency,
            pos: pos.into(),
        }
    }
}

/// 確定済みの辞書に格納された単語
///
/// パスコスト`distance`は `log2(総頻度) - log2(頻度)` で、頻度が低いほど大きくなります。
/// コストの和を最小化することは、単語の生起確率の積を最大化することに相当します。
#[derive(Clone, Debug)]
pub struct Word {
    pub(crate) text: Text<'static>,
    pub(crate) frequency: u64,
    pub(crate) distance: f32,
    pub(crate) pos: String,
}

impl Word {
    /// 要素に分割済みの表記を返します。
    #[inline(always)]
    pub fn text(&self) -> &Text<'static> {
        &self.text
    }

    /// 出現頻度を返します。
    #[inline(always)]
    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    /// パスコストを返します。
    #[inline(always)]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// 品詞タグを返します。品詞がない場合は空文字列です。
    #[inline(always)]
    pub fn pos(&self) -> &str {
        &self.pos
    }
}

/// 単語の接頭辞検索の結果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LexMatch {
    /// 一致した単語
    pub word_idx: WordIdx,
    /// 一致した単語の要素数
    pub len: usize,
}

impl LexMatch {
    #[inline(always)]
    pub(crate) const fn new(word_idx: WordIdx, len: usize) -> Self {
        Self { word_idx, len }
    }
}

/// 接頭辞検索のために要素列を文字列へ展開する作業領域
///
/// 要素の境界を文字位置で記録し、トライの一致結果のうち要素境界で終わるものだけを
/// 採用するために使います。
#[derive(Default, Debug)]
pub(crate) struct Haystack {
    chars: Vec<char>,
    ends: Vec<usize>,
}

impl Haystack {
    /// `text`の`start..end`の要素で作業領域を埋めます。
    ///
    /// 辞書の単語はすべて有効なUTF-8なので、不正なバイトを含む要素に到達した時点で
    /// 展開を打ち切ります。
    pub fn reset(&mut self, text: &Text, start: usize, end: usize) {
        self.chars.clear();
        self.ends.clear();
        for i in start..end {
            let Ok(element) = std::str::from_utf8(text.element(i)) else {
                break;
            };
            self.chars.extend(element.chars());
            self.ends.push(self.chars.len());
        }
    }
}

/// 単語の語彙情報
pub(crate) struct Lexicon {
    map: WordMap,
    words: Vec<Word>,
}

impl Lexicon {
    /// 単語の配列から新しいインスタンスを構築します。
    ///
    /// 単語の表記は互いに異なっていなければなりません。
    pub fn from_words(words: Vec<Word>) -> Result<Self> {
        let keys = words
            .iter()
            .map(|w| std::str::from_utf8(w.text.as_bytes()))
            .collect::<Result<Vec<&str>, _>>()?;
        let map = WordMap::new(keys)?;
        Ok(Self { map, words })
    }

    /// 作業領域に展開された要素列の接頭辞に一致する単語を、要素数の少ない順に返します。
    #[inline(always)]
    pub fn common_prefix_iterator<'a>(
        &'a self,
        haystack: &'a Haystack,
    ) -> impl Iterator<Item = LexMatch> + 'a {
        self.map
            .common_prefix_iterator(&haystack.chars)
            .filter_map(move |(word_id, num_chars)| {
                haystack
                    .ends
                    .binary_search(&num_chars)
                    .ok()
                    .map(|i| LexMatch::new(WordIdx::new(word_id), i + 1))
            })
    }

    /// 表記が完全に一致する単語を返します。
    pub fn find(&self, key: &str) -> Option<WordIdx> {
        self.map.get(key).map(WordIdx::new)
    }

    #[inline(always)]
    pub fn word(&self, word_idx: WordIdx) -> &Word {
        &self.words[word_idx.index()]
    }

    #[inline(always)]
    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

/// 辞書ソースの1行を解析した結果
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct SourceLine<'a> {
    pub text: &'a str,
    pub frequency: i64,
    pub pos: &'a str,
}

/// `<表記> <頻度> [<品詞>]` 形式の1行を解析します。
///
/// フィールドは半角スペース1つで区切られます。フィールドが2つ未満の行や、
/// 頻度が整数でない行に対しては`None`を返します。4つ目以降のフィールドは無視します。
pub(crate) fn parse_line(line: &str) -> Option<SourceLine<'_>> {
    let mut fields = line.split(' ');
    let text = fields.next()?;
    let frequency = fields.next()?.parse().ok()?;
    let pos = fields.next().unwrap_or("");
    Some(SourceLine {
        text,
        frequency,
        pos,
    })
}
