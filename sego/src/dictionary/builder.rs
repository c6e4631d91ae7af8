//! 辞書構築のためのビルダー
//!
//! このモジュールは、辞書ソースや単語エントリの列から [`Dictionary`] を構築するための
//! ビルダーを提供します。ビルダーは単語の追加だけを受け付け、[`finalize`] で
//! パスコストを確定させた読み取り専用の辞書に変換されます。確定後の辞書に
//! 単語を追加する手段はありません。
//!
//! [`finalize`]: DictionaryBuilder::finalize

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use hashbrown::HashMap;

use crate::dictionary::lexicon::{parse_line, Lexicon, Word, WordEntry};
use crate::dictionary::Dictionary;
use crate::errors::{Result, SegoError};
use crate::text::Text;
use crate::utils::FromU32;

/// 辞書ソースから読み込む単語の最小頻度のデフォルト値
pub const MIN_TOKEN_FREQUENCY: u64 = 2;

/// 1つの辞書ソースを読み込んだ結果の統計
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceStats {
    /// 読み込んだ行数
    pub lines: usize,
    /// 新しく追加された単語数
    pub accepted: usize,
    /// 既存の単語を上書きした数
    pub overridden: usize,
    /// 形式が不正でスキップした行数
    pub skipped_malformed: usize,
    /// 頻度が最小頻度未満でスキップした行数
    pub skipped_low_frequency: usize,
}

/// 単語の追加結果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inserted {
    /// 新しい単語として追加された
    New,
    /// 同じ表記の単語を上書きした
    Overridden,
}

/// パスコストが未確定の単語
struct RawWord {
    text: Text<'static>,
    frequency: u64,
    pos: String,
}

/// [`Dictionary`] を構築するビルダー
///
/// 同じ表記の単語が複数回追加された場合は、後から追加されたものの頻度と品詞が
/// 採用されます。基本辞書の後にユーザー辞書を読み込むと、ユーザー辞書が優先されます。
/// 総頻度は表記ごとに1回だけ数えられます。
///
/// # 例
///
/// ```
/// use sego::dictionary::{DictionaryBuilder, WordEntry};
///
/// let mut builder = DictionaryBuilder::new();
/// builder.insert(WordEntry::new("中国", 100, "ns"))?;
/// builder.insert(WordEntry::new("中国", 40, "n"))?;
/// let dict = builder.finalize()?;
///
/// assert_eq!(dict.num_words(), 1);
/// assert_eq!(dict.total_frequency(), 40);
/// # Ok::<(), sego::errors::SegoError>(())
/// ```
pub struct DictionaryBuilder {
    words: Vec<RawWord>,
    index: HashMap<String, u32>,
    total_frequency: u64,
    min_frequency: u64,
}

impl Default for DictionaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryBuilder {
    /// 空のビルダーを作成します。
    pub fn new() -> Self {
        Self {
            words: vec![],
            index: HashMap::new(),
            total_frequency: 0,
            min_frequency: MIN_TOKEN_FREQUENCY,
        }
    }

    /// 単語エントリの列からビルダーを作成します。
    ///
    /// エントリには最小頻度のフィルタを適用しません。
    ///
    /// # エラー
    ///
    /// 表記が空、または頻度が0のエントリが含まれる場合に [`SegoError`] を返します。
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = WordEntry>,
    {
        let mut builder = Self::new();
        for entry in entries {
            builder.insert(entry)?;
        }
        Ok(builder)
    }

    /// 辞書ソースから読み込む単語の最小頻度を指定します。
    ///
    /// デフォルト値は [`MIN_TOKEN_FREQUENCY`] です。0を指定した場合は1として扱います。
    pub const fn min_frequency(mut self, min_frequency: u64) -> Self {
        self.min_frequency = if min_frequency == 0 { 1 } else { min_frequency };
        self
    }

    /// これまでに追加された単語数を返します。
    #[inline(always)]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// これまでに追加された単語の総頻度を返します。
    #[inline(always)]
    pub fn total_frequency(&self) -> u64 {
        self.total_frequency
    }

    /// 単語を1件追加します。
    ///
    /// 表記は要素分割と同じ規則でASCII小文字に変換されてから登録されます。
    ///
    /// # エラー
    ///
    /// 表記が要素を1つも含まない場合や、頻度が0の場合、総頻度が`u64`の範囲を
    /// 超える場合に [`SegoError`] を返します。エラーの場合、ビルダーは変更されません。
    pub fn insert(&mut self, entry: WordEntry) -> Result<Inserted> {
        if entry.frequency == 0 {
            return Err(SegoError::invalid_argument(
                "entry",
                format!("the frequency of '{}' must be positive.", entry.text),
            ));
        }

        let key = entry.text.to_ascii_lowercase();
        let text = Text::split(key.as_str()).into_owned();
        if text.is_empty() {
            return Err(SegoError::invalid_argument("entry", "the text must not be empty."));
        }

        let overflow = || {
            SegoError::invalid_argument(
                "entry",
                format!("the total frequency overflows with '{}'.", entry.text),
            )
        };

        if let Some(&word_id) = self.index.get(&key) {
            let word = &mut self.words[usize::from_u32(word_id)];
            // The total always contains the frequency being replaced.
            self.total_frequency = (self.total_frequency - word.frequency)
                .checked_add(entry.frequency)
                .ok_or_else(overflow)?;
            word.frequency = entry.frequency;
            word.pos = entry.pos;
            return Ok(Inserted::Overridden);
        }

        let total_frequency = self
            .total_frequency
            .checked_add(entry.frequency)
            .ok_or_else(overflow)?;
        let word_id = u32::try_from(self.words.len())?;
        self.index.insert(key, word_id);
        self.words.push(RawWord {
            text,
            frequency: entry.frequency,
            pos: entry.pos,
        });
        self.total_frequency = total_frequency;
        Ok(Inserted::New)
    }

    /// 行形式の辞書ソースを読み込みます。
    ///
    /// 形式は1行に1単語の `<表記> <頻度> [<品詞>]` です。不正な行と最小頻度未満の行は
    /// スキップされ、読み込みは継続します。
    ///
    /// # エラー
    ///
    /// 読み込み中にI/Oエラーが発生した場合に [`SegoError`] を返します。
    pub fn read_source<R>(&mut self, rdr: R) -> Result<SourceStats>
    where
        R: Read,
    {
        let mut rdr = BufReader::new(rdr);
        let mut stats = SourceStats::default();
        let mut buf = vec![];

        loop {
            buf.clear();
            if rdr.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            stats.lines += 1;

            let mut line = buf.as_slice();
            if let Some(rest) = line.strip_suffix(b"\n") {
                line = rest;
            }
            if let Some(rest) = line.strip_suffix(b"\r") {
                line = rest;
            }

            let Some(parsed) = std::str::from_utf8(line).ok().and_then(parse_line) else {
                log::trace!("[sego] skipping malformed line {}", stats.lines);
                stats.skipped_malformed += 1;
                continue;
            };

            let frequency = match u64::try_from(parsed.frequency) {
                Ok(frequency) if frequency >= self.min_frequency => frequency,
                _ => {
                    stats.skipped_low_frequency += 1;
                    continue;
                }
            };

            match self.insert(WordEntry::new(parsed.text, frequency, parsed.pos)) {
                Ok(Inserted::New) => stats.accepted += 1,
                Ok(Inserted::Overridden) => stats.overridden += 1,
                Err(e) => {
                    log::trace!("[sego] skipping line {}: {}", stats.lines, e);
                    stats.skipped_malformed += 1;
                }
            }
        }

        Ok(stats)
    }

    /// ファイルから辞書ソースを読み込みます。
    ///
    /// 拡張子が`.zst`のファイルはZstandardで透過的に展開されます。
    ///
    /// # エラー
    ///
    /// ファイルが存在しない、読み込めない、またはディレクトリである場合に
    /// [`SegoError`] を返します。
    pub fn read_path<P>(&mut self, path: P) -> Result<SourceStats>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(SegoError::PathIsDirectory(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|source| SegoError::DictionaryOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let stats = if path.extension().is_some_and(|ext| ext == "zst") {
            self.read_source(zstd::Decoder::new(file)?)?
        } else {
            self.read_source(file)?
        };

        log::debug!(
            "[sego] loaded {}: {} lines, {} accepted, {} overridden, {} malformed, {} below frequency {}",
            path.display(),
            stats.lines,
            stats.accepted,
            stats.overridden,
            stats.skipped_malformed,
            stats.skipped_low_frequency,
            self.min_frequency,
        );
        Ok(stats)
    }

    /// 複数のファイルを順に読み込みます。
    ///
    /// 後に読み込んだファイルの単語が優先されます。いずれかのファイルの読み込みに
    /// 失敗した時点で中断します。
    pub fn read_paths<I, P>(&mut self, paths: I) -> Result<Vec<SourceStats>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths.into_iter().map(|path| self.read_path(path)).collect()
    }

    /// パスコストを確定させ、読み取り専用の [`Dictionary`] に変換します。
    ///
    /// 各単語のパスコストは `log2(総頻度) - log2(頻度)` です。
    pub fn finalize(self) -> Result<Dictionary> {
        let log_total_frequency = (self.total_frequency as f64).log2() as f32;

        let words: Vec<Word> = self
            .words
            .into_iter()
            .map(|w| Word {
                distance: log_total_frequency - (w.frequency as f64).log2() as f32,
                text: w.text,
                frequency: w.frequency,
                pos: w.pos,
            })
            .collect();
        let max_word_len = words.iter().map(|w| w.text.len()).max().unwrap_or(0);

        log::info!(
            "[sego] finalized dictionary: {} words, total frequency {}, max word length {}",
            words.len(),
            self.total_frequency,
            max_word_len,
        );

        let lexicon = Lexicon::from_words(words)?;
        Ok(Dictionary::new(lexicon, self.total_frequency, max_word_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_source() {
        let source = "中国 100 ns\n人口 20 n\r\n坏行\n频率 abc\n低频 1 n\n\n 5 x\n";
        let mut builder = DictionaryBuilder::new();
        let stats = builder.read_source(source.as_bytes()).unwrap();
        assert_eq!(
            stats,
            SourceStats {
                lines: 7,
                accepted: 2,
                overridden: 0,
                skipped_malformed: 4,
                skipped_low_frequency: 1,
            }
        );
        assert_eq!(builder.num_words(), 2);
        assert_eq!(builder.total_frequency(), 120);
    }

    #[test]
    fn test_read_source_invalid_utf8_line() {
        let mut source = "中国 100 ns\n".as_bytes().to_vec();
        source.extend_from_slice(&[0xff, b' ', b'5', b'\n']);
        source.extend_from_slice("人口 20 n".as_bytes());

        let mut builder = DictionaryBuilder::new();
        let stats = builder.read_source(source.as_slice()).unwrap();
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.skipped_malformed, 1);
    }

    #[test]
    fn test_override_adjusts_total() {
        let mut builder = DictionaryBuilder::new();
        assert_eq!(builder.insert(WordEntry::new("a", 1000, "n")).unwrap(), Inserted::New);
        assert_eq!(builder.insert(WordEntry::new("b", 10, "n")).unwrap(), Inserted::New);
        assert_eq!(
            builder.insert(WordEntry::new("A", 30, "v")).unwrap(),
            Inserted::Overridden
        );
        assert_eq!(builder.num_words(), 2);
        assert_eq!(builder.total_frequency(), 40);
    }

    #[test]
    fn test_total_frequency_overflow() {
        let max = i64::MAX;
        let source = format!("a {max} n\nb {max} n\nc {max} n\nd 1 n\n");
        let mut builder = DictionaryBuilder::new().min_frequency(1);
        let stats = builder.read_source(source.as_bytes()).unwrap();
        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.skipped_malformed, 1);
        assert_eq!(builder.num_words(), 3);
        assert_eq!(builder.total_frequency(), u64::MAX);

        // An override that would overflow keeps the previous entry.
        assert!(builder.insert(WordEntry::new("d", 2, "v")).is_err());
        assert_eq!(builder.total_frequency(), u64::MAX);
        let dict = builder.finalize().unwrap();
        let word = dict.word(dict.find("d").unwrap());
        assert_eq!(word.frequency(), 1);
        assert_eq!(word.pos(), "n");
    }

    #[test]
    fn test_insert_rejects_invalid_entries() {
        let mut builder = DictionaryBuilder::new();
        assert!(builder.insert(WordEntry::new("", 10, "n")).is_err());
        assert!(builder.insert(WordEntry::new("零", 0, "n")).is_err());
        assert_eq!(builder.num_words(), 0);
    }

    #[test]
    fn test_min_frequency() {
        let source = "a 1 n\nb 2 n\nc 3 n\n";

        let mut builder = DictionaryBuilder::new();
        let stats = builder.read_source(source.as_bytes()).unwrap();
        assert_eq!(stats.accepted, 2);

        let mut builder = DictionaryBuilder::new().min_frequency(3);
        let stats = builder.read_source(source.as_bytes()).unwrap();
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.skipped_low_frequency, 2);

        let mut builder = DictionaryBuilder::new().min_frequency(0);
        let stats = builder.read_source(source.as_bytes()).unwrap();
        assert_eq!(stats.accepted, 3);
    }

    #[test]
    fn test_finalize_distances() {
        let builder = DictionaryBuilder::from_entries([
            WordEntry::new("中国", 8, "ns"),
            WordEntry::new("人口", 8, "n"),
            WordEntry::new("十三亿", 16, "m"),
        ])
        .unwrap();
        let dict = builder.finalize().unwrap();

        assert_eq!(dict.total_frequency(), 32);
        assert_eq!(dict.max_word_len(), 3);
        let word = dict.word(dict.find("中国").unwrap());
        assert_eq!(word.distance(), 2.0);
        let word = dict.word(dict.find("十三亿").unwrap());
        assert_eq!(word.distance(), 1.0);
    }

    #[test]
    fn test_finalize_empty() {
        let dict = DictionaryBuilder::new().finalize().unwrap();
        assert_eq!(dict.num_words(), 0);
        assert_eq!(dict.max_word_len(), 0);
    }
}
