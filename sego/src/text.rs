//! 入力テキストの要素分割を提供するモジュール
//!
//! このモジュールは、生のバイト列を辞書引きの最小単位である「要素」の列に
//! 分割します。連続する英数字（2バイト以内のUTF-8で表現される文字に限る）は
//! 1つの要素にまとめられてASCII小文字に変換され、それ以外のコードポイント
//! （漢字、句読点、記号など）はそれぞれが1つの要素になります。
//!
//! 小文字化はASCIIの範囲だけで行われるため、変換後のバイト列は入力と同じ長さを
//! 保ちます。したがって要素の境界は入力のバイト位置としてそのまま使えます。

use std::borrow::Cow;
use std::fmt;

/// 要素の列として表現されたテキスト
///
/// 内部では小文字化済みのバイト列と、各要素の終端バイト位置を保持します。
/// 等価性と大きさは要素数ではなく、連結されたバイト列によって定義されます。
///
/// # フィールド
///
/// * `bytes` - 小文字化済みのバイト列（変換が不要な場合は入力を借用）
/// * `ends` - 各要素の終端バイト位置
#[derive(Default, Clone)]
pub struct Text<'a> {
    bytes: Cow<'a, [u8]>,
    ends: Vec<usize>,
}

impl<'a> Text<'a> {
    /// 入力を要素の列に分割します
    ///
    /// 不正なUTF-8のバイトは特別扱いせず、1バイトずつ独立した要素になります。
    /// 正規化（NFC/NFKC）は行いません。
    ///
    /// # 引数
    ///
    /// * `input` - 分割するバイト列または文字列
    ///
    /// # 例
    ///
    /// ```
    /// use sego::Text;
    ///
    /// let text = Text::split("GitHub是一个网站");
    /// let elements: Vec<&[u8]> = text.elements().collect();
    /// assert_eq!(elements[0], b"github");
    /// assert_eq!(text.len(), 6);
    /// ```
    pub fn split<S>(input: &'a S) -> Self
    where
        S: AsRef<[u8]> + ?Sized,
    {
        let input = input.as_ref();

        // Every ASCII upper-case letter belongs to an alphanumeric run.
        let bytes = if input.iter().any(u8::is_ascii_uppercase) {
            Cow::Owned(input.to_ascii_lowercase())
        } else {
            Cow::Borrowed(input)
        };

        let mut ends = Vec::with_capacity(input.len() / 3 + 1);
        compute_ends(input, &mut ends);

        Self { bytes, ends }
    }

    /// 入力の借用を切り離した所有版を返します
    pub fn into_owned(self) -> Text<'static> {
        Text {
            bytes: Cow::Owned(self.bytes.into_owned()),
            ends: self.ends,
        }
    }

    /// 要素数を返します
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    /// 要素を1つも含まない場合に`true`を返します
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// 小文字化済みの連結バイト列を返します
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 連結バイト列の長さを返します
    #[inline(always)]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// `i`番目の要素の開始バイト位置を返します
    ///
    /// `i == self.len()` の場合はテキスト全体のバイト長を返します。
    #[inline(always)]
    pub fn byte_position(&self, i: usize) -> usize {
        if i == 0 { 0 } else { self.ends[i - 1] }
    }

    /// `i`番目の要素を返します
    #[inline(always)]
    pub fn element(&self, i: usize) -> &[u8] {
        &self.bytes[self.byte_position(i)..self.ends[i]]
    }

    /// 要素のイテレータを返します
    pub fn elements(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.len()).map(move |i| self.element(i))
    }
}

impl Text<'static> {
    /// 確保済みの領域を再利用して`input`を分割し直します
    pub(crate) fn refill(&mut self, input: &[u8]) {
        let bytes = self.bytes.to_mut();
        bytes.clear();
        bytes.extend_from_slice(input);
        bytes.make_ascii_lowercase();

        self.ends.clear();
        compute_ends(input, &mut self.ends);
    }
}

impl PartialEq<Text<'_>> for Text<'_> {
    fn eq(&self, other: &Text<'_>) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Text<'_> {}

impl fmt::Debug for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.elements().map(String::from_utf8_lossy))
            .finish()
    }
}

impl fmt::Display for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

/// 英数字として連結される文字かどうかを判定します
///
/// ラテン文字圏の英数字だけを対象にするため、UTF-8で2バイトを超える文字
/// （漢数字など）は常に単独の要素になります。
#[inline(always)]
fn is_word_char(c: char) -> bool {
    c.len_utf8() <= 2 && c.is_alphanumeric()
}

fn compute_ends(input: &[u8], ends: &mut Vec<usize>) {
    let mut pos = 0;
    let mut in_word = false;

    for chunk in input.utf8_chunks() {
        for c in chunk.valid().chars() {
            if is_word_char(c) {
                in_word = true;
                pos += c.len_utf8();
                continue;
            }
            if in_word {
                ends.push(pos);
                in_word = false;
            }
            pos += c.len_utf8();
            ends.push(pos);
        }

        // Each malformed byte stands alone.
        for _ in chunk.invalid() {
            if in_word {
                ends.push(pos);
                in_word = false;
            }
            pos += 1;
            ends.push(pos);
        }
    }

    if in_word {
        ends.push(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(text: &Text) -> String {
        let mut output = String::new();
        for e in text.elements() {
            output.push_str(&String::from_utf8_lossy(e));
            output.push('/');
        }
        output
    }

    #[test]
    fn test_split() {
        let cases = [
            ("中国有十三亿人口", "中/国/有/十/三/亿/人/口/"),
            (
                "GitHub is a web-based hosting service, for software development projects.",
                "github/ /is/ /a/ /web/-/based/ /hosting/ /service/,/ /for/ /software/ /development/ /projects/./",
            ),
            (
                "中国雅虎Yahoo! China致力于，领先的公益民生门户网站。",
                "中/国/雅/虎/yahoo/!/ /china/致/力/于/，/领/先/的/公/益/民/生/门/户/网/站/。/",
            ),
            ("こんにちは", "こ/ん/に/ち/は/"),
            ("안녕하세요", "안/녕/하/세/요/"),
            ("Я тоже рада Вас видеть", "Я/ /тоже/ /рада/ /Вас/ /видеть/"),
            ("¿Cómo van las cosas", "¿/cómo/ /van/ /las/ /cosas/"),
            ("Wie geht es Ihnen", "wie/ /geht/ /es/ /ihnen/"),
            ("Je suis enchanté de cette pièce", "je/ /suis/ /enchanté/ /de/ /cette/ /pièce/"),
        ];

        for (input, expected) in cases {
            assert_eq!(joined(&Text::split(input)), expected, "input: {input}");
        }
    }

    #[test]
    fn test_split_empty() {
        let text = Text::split("");
        assert!(text.is_empty());
        assert_eq!(text.byte_len(), 0);
        assert_eq!(text.byte_position(0), 0);
    }

    #[test]
    fn test_byte_position() {
        let text = Text::split("ab中c1");
        assert_eq!(text.len(), 3);
        assert_eq!(text.byte_position(0), 0);
        assert_eq!(text.byte_position(1), 2);
        assert_eq!(text.byte_position(2), 5);
        assert_eq!(text.byte_position(3), 7);
        assert_eq!(text.element(2), b"c1");
    }

    #[test]
    fn test_cjk_numerals_are_not_merged() {
        // 三 is a number, but needs three bytes.
        let text = Text::split("三3");
        assert_eq!(joined(&text), "三/3/");
    }

    #[test]
    fn test_split_invalid_utf8() {
        let input = [b'a', 0xe4, 0xb8, b'b', 0xff];
        let text = Text::split(&input[..]);
        let elements: Vec<&[u8]> = text.elements().collect();
        let expected: Vec<&[u8]> = vec![b"a", &[0xe4], &[0xb8], b"b", &[0xff]];
        assert_eq!(elements, expected);
        assert_eq!(text.byte_len(), input.len());
    }

    #[test]
    fn test_split_is_idempotent() {
        let inputs = ["Hello World", "中国雅虎Yahoo! China", "MiXeD 123abcDEF"];
        for input in inputs {
            let first = Text::split(input);
            let second = Text::split(first.as_bytes());
            assert_eq!(first, second);
            assert_eq!(joined(&first), joined(&second));
        }
    }

    #[test]
    fn test_refill() {
        let mut text = Text::default();
        text.refill("Hello 世界".as_bytes());
        assert_eq!(text, Text::split("Hello 世界"));
        assert_eq!(joined(&text), "hello/ /世/界/");
        text.refill(b"");
        assert!(text.is_empty());
        assert_eq!(text.byte_len(), 0);
    }

    #[test]
    fn test_borrowed_when_already_lowercase() {
        let text = Text::split("already lower");
        assert!(matches!(text.bytes, Cow::Borrowed(_)));
        let text = Text::split("Upper");
        assert!(matches!(text.bytes, Cow::Owned(_)));
    }
}
