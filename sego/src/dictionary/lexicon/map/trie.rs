//! 単語の表記を引くためのダブル配列トライ
//!
//! 接頭辞検索は分かち書きの各位置で呼ばれるため、入力を文字の配列として受け取り、
//! 一致した位置も文字数で返します。要素境界との照合は呼び出し側で行います。

use crate::errors::{Result, SegoError};

/// 表記から単語IDを引くトライ
pub struct Trie {
    da: crawdad::Trie,
}

/// 接頭辞に一致した単語
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrefixMatch {
    /// 単語ID
    pub word_id: u32,
    /// 一致した接頭辞の文字数
    pub num_chars: usize,
}

impl Trie {
    /// `(表記, 単語ID)` の組からトライを構築します。
    ///
    /// # エラー
    ///
    /// 表記が重複している場合や空の場合に [`SegoError`] を返します。
    pub fn from_records<K>(records: &[(K, u32)]) -> Result<Self>
    where
        K: AsRef<str>,
    {
        let da = crawdad::Trie::from_records(records.iter().map(|(key, id)| (key, *id)))
            .map_err(|e| SegoError::invalid_argument("records", e.to_string()))?;
        Ok(Self { da })
    }

    /// `input`の接頭辞になっている単語を、短い順に返します。
    #[inline(always)]
    pub fn prefixes<'a>(&'a self, input: &'a [char]) -> impl Iterator<Item = PrefixMatch> + 'a {
        self.da
            .common_prefix_search(input.iter().copied())
            .map(|(word_id, num_chars)| PrefixMatch { word_id, num_chars })
    }

    /// 表記が`key`と完全に一致する単語のIDを返します。
    #[inline(always)]
    pub fn get(&self, key: &str) -> Option<u32> {
        self.da.exact_match(key.chars())
    }
}
