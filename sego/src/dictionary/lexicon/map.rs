//! 単語マッピングとトライ構造
//!
//! このモジュールは、単語をトライ構造で効率的に検索するための
//! データ構造を提供します。

pub mod trie;

use std::collections::BTreeMap;

use crate::dictionary::lexicon::map::trie::Trie;
use crate::errors::Result;

/// 単語をトライ構造で管理するマップ
///
/// 単語が1つもない場合はトライを構築しません。
pub struct WordMap {
    trie: Option<Trie>,
}

impl WordMap {
    /// 単語のイテレータから新しいインスタンスを作成します。
    ///
    /// `i`番目の単語にはIDとして`i`が割り当てられます。
    pub fn new<I, W>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut b = WordMapBuilder::new();
        for (i, w) in words.into_iter().enumerate() {
            b.add_record(w.as_ref().to_string(), u32::try_from(i)?);
        }
        b.build()
    }

    /// 入力の接頭辞に一致する単語のIDと終端文字位置を、短い順に返します。
    #[inline(always)]
    pub fn common_prefix_iterator<'a>(
        &'a self,
        input: &'a [char],
    ) -> impl Iterator<Item = (u32, usize)> + 'a {
        self.trie
            .iter()
            .flat_map(move |trie| trie.prefixes(input))
            .map(|m| (m.word_id, m.num_chars))
    }

    /// 表記が完全に一致する単語のIDを返します。
    #[inline(always)]
    pub fn get(&self, word: &str) -> Option<u32> {
        self.trie.as_ref()?.get(word)
    }
}

/// 単語マップを構築するビルダー
#[derive(Default)]
pub struct WordMapBuilder {
    map: BTreeMap<String, u32>,
}

impl WordMapBuilder {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn add_record(&mut self, word: String, id: u32) {
        self.map.insert(word, id);
    }

    pub fn build(self) -> Result<WordMap> {
        if self.map.is_empty() {
            return Ok(WordMap { trie: None });
        }
        let entries: Vec<(String, u32)> = self.map.into_iter().collect();
        Ok(WordMap {
            trie: Some(Trie::from_records(&entries)?),
        })
    }
}
