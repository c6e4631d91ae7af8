//! トークンの結果コンテナ
//!
//! このモジュールは、分かち書きの結果として得られるトークンを表現する型を提供します。
//! トークンは分かち書き結果と辞書への軽量な参照であり、表記、品詞、頻度、
//! 位置情報などへのアクセスを提供します。

use std::borrow::Cow;
use std::ops::Range;
use std::slice;

use crate::dictionary::{Dictionary, Word, WordIdx};
use crate::segment::Segment;

/// 未知語に割り当てられるパスコスト
pub const UNKNOWN_DISTANCE: f32 = 32.0;

/// 未知語に割り当てられる頻度
pub const UNKNOWN_FREQUENCY: u64 = 1;

/// 未知語に割り当てられる品詞タグ
pub const UNKNOWN_POS: &str = "x";

/// 分かち書きの結果トークン
///
/// 入力のバイト列と辞書への参照を保持します。検索モード用の細分割から得られた
/// 子トークンの場合、参照先は入力ではなく親の単語の表記になります。
#[derive(Clone, Copy)]
pub struct Token<'a> {
    dict: &'a Dictionary,
    folded: &'a [u8],
    raw: &'a [u8],
    seg: Segment,
}

impl<'a> Token<'a> {
    #[inline(always)]
    pub(crate) const fn new(
        dict: &'a Dictionary,
        folded: &'a [u8],
        raw: &'a [u8],
        seg: Segment,
    ) -> Self {
        Self {
            dict,
            folded,
            raw,
            seg,
        }
    }

    /// トークンのバイト単位の位置範囲を取得します。
    #[inline(always)]
    pub fn range_byte(&self) -> Range<usize> {
        self.seg.range()
    }

    /// 小文字化済みの表記を取得します。
    ///
    /// 辞書と照合された形であり、タグ付き出力にはこちらが使われます。
    #[inline(always)]
    pub fn text(&self) -> &'a [u8] {
        &self.folded[self.range_byte()]
    }

    /// トークンの表層形（元のテキスト中の文字列）を取得します。
    ///
    /// 入力が不正なUTF-8を含む場合は置換文字に置き換えられます。
    #[inline(always)]
    pub fn surface(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(&self.raw[self.range_byte()])
    }

    /// 辞書の単語インデックスを取得します。未知語の場合は`None`です。
    #[inline(always)]
    pub fn word_idx(&self) -> Option<WordIdx> {
        self.seg.word_idx()
    }

    /// 辞書の単語を取得します。未知語の場合は`None`です。
    #[inline(always)]
    pub fn word(&self) -> Option<&'a Word> {
        self.word_idx().map(|idx| self.dict.word(idx))
    }

    /// 未知語かどうかを返します。
    #[inline(always)]
    pub fn is_unknown(&self) -> bool {
        self.seg.word_idx().is_none()
    }

    /// 品詞タグを取得します。
    #[inline(always)]
    pub fn pos(&self) -> &'a str {
        self.word().map_or(UNKNOWN_POS, Word::pos)
    }

    /// 頻度を取得します。
    #[inline(always)]
    pub fn frequency(&self) -> u64 {
        self.word().map_or(UNKNOWN_FREQUENCY, Word::frequency)
    }

    /// パスコストを取得します。
    #[inline(always)]
    pub fn distance(&self) -> f32 {
        self.word().map_or(UNKNOWN_DISTANCE, Word::distance)
    }

    /// 検索モード用の細分割を子トークンとして返します。
    ///
    /// 未知語や細分割が計算されていない辞書の単語に対しては空のイテレータを返します。
    pub fn children(&self) -> TokenIter<'a> {
        let Some(idx) = self.word_idx() else {
            return TokenIter::new(self.dict, &[], &[], &[]);
        };
        let bytes = self.dict.word(idx).text().as_bytes();
        TokenIter::new(self.dict, bytes, bytes, self.dict.search_segments(idx))
    }

    /// 所有権を持つ [`TokenBuf`] に変換します。
    pub fn to_buf(&self) -> TokenBuf {
        TokenBuf {
            surface: self.surface().into_owned(),
            text: String::from_utf8_lossy(self.text()).into_owned(),
            pos: self.pos().to_string(),
            range_byte: self.range_byte(),
            frequency: self.frequency(),
            distance: self.distance(),
            word_idx: self.word_idx(),
        }
    }
}

impl std::fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("surface", &self.surface())
            .field("range_byte", &self.range_byte())
            .field("pos", &self.pos())
            .field("frequency", &self.frequency())
            .field("distance", &self.distance())
            .finish()
    }
}

/// トークンのイテレータ
#[derive(Clone)]
pub struct TokenIter<'a> {
    dict: &'a Dictionary,
    folded: &'a [u8],
    raw: &'a [u8],
    segments: slice::Iter<'a, Segment>,
}

impl<'a> TokenIter<'a> {
    #[inline(always)]
    pub(crate) fn new(
        dict: &'a Dictionary,
        folded: &'a [u8],
        raw: &'a [u8],
        segments: &'a [Segment],
    ) -> Self {
        Self {
            dict,
            folded,
            raw,
            segments: segments.iter(),
        }
    }
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = Token<'a>;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        let seg = *self.segments.next()?;
        Some(Token::new(self.dict, self.folded, self.raw, seg))
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.segments.size_hint()
    }
}

impl ExactSizeIterator for TokenIter<'_> {}

/// 所有権を持つトークン
///
/// 入力や辞書への参照を持たないため、スレッド間で受け渡しできます。
#[derive(Clone, Debug, PartialEq)]
pub struct TokenBuf {
    /// 表層形
    pub surface: String,
    /// 小文字化済みの表記
    pub text: String,
    /// 品詞タグ
    pub pos: String,
    /// バイト単位の位置範囲
    pub range_byte: Range<usize>,
    /// 頻度
    pub frequency: u64,
    /// パスコスト
    pub distance: f32,
    /// 辞書の単語インデックス
    pub word_idx: Option<WordIdx>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::WordEntry;
    use crate::segmenter::Segmenter;

    #[test]
    fn test_token_accessors() {
        let dict = Dictionary::from_entries([
            WordEntry::new("GitHub", 8, "nz"),
            WordEntry::new("网站", 8, ""),
        ])
        .unwrap();
        let segmenter = Segmenter::new(dict);
        let segments = segmenter.segment("GitHub是网站");
        assert_eq!(segments.len(), 3);

        let token = segments.token(0);
        assert_eq!(token.surface(), "GitHub");
        assert_eq!(token.text(), b"github");
        assert_eq!(token.pos(), "nz");
        assert_eq!(token.frequency(), 8);
        assert_eq!(token.distance(), 1.0);
        assert_eq!(token.range_byte(), 0..6);
        assert!(!token.is_unknown());

        let token = segments.token(1);
        assert_eq!(token.surface(), "是");
        assert!(token.is_unknown());
        assert_eq!(token.pos(), UNKNOWN_POS);
        assert_eq!(token.frequency(), UNKNOWN_FREQUENCY);
        assert_eq!(token.distance(), UNKNOWN_DISTANCE);
        assert_eq!(token.word_idx(), None);
        assert_eq!(token.children().len(), 0);

        assert_eq!(segments.token(2).pos(), "");
    }

    #[test]
    fn test_surface_of_invalid_utf8() {
        let dict = Dictionary::from_entries([WordEntry::new("a", 8, "n")]).unwrap();
        let segmenter = Segmenter::new(dict);
        let input = [b'a', 0xff];
        let segments = segmenter.segment(&input[..]);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments.token(1).surface(), "\u{fffd}");
        assert_eq!(segments.token(1).range_byte(), 1..2);
    }

    #[test]
    fn test_to_buf() {
        let dict = Dictionary::from_entries([WordEntry::new("中国", 8, "ns")]).unwrap();
        let segmenter = Segmenter::new(dict);
        let segments = segmenter.segment("中国");
        let buf = segments.token(0).to_buf();
        assert_eq!(
            buf,
            TokenBuf {
                surface: "中国".to_string(),
                text: "中国".to_string(),
                pos: "ns".to_string(),
                range_byte: 0..6,
                frequency: 8,
                distance: 0.0,
                word_idx: Some(WordIdx::new(0)),
            }
        );
    }
}
