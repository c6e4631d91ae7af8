//! 分かち書きのための辞書モジュール。
//!
//! このモジュールは、単語の頻度からパスコストを求めた読み取り専用の辞書を提供します。
//! 主な機能として以下を提供します:
//!
//! - 行形式の辞書ソース（平文またはZstandard圧縮）の読み込み
//! - 複数の辞書ソースの重ね合わせ（後から読み込んだ単語が優先）
//! - 要素列に対する接頭辞検索
//! - 検索モード用の単語の細分割の事前計算
//! - プロセス全体で共有されるデフォルト辞書
//!
//! # 辞書の構築方法
//!
//! 辞書は[`DictionaryBuilder`]で単語を追加した後、[`DictionaryBuilder::finalize`]で
//! 確定させて得られます。確定後の辞書は不変であり、[`Arc`]で包んで複数のスレッドから
//! 同時に参照できます。
//!
//! - [`Dictionary::from_paths`]: 複数のファイルから辞書を構築する
//! - [`Dictionary::from_comma_separated`]: カンマ区切りのファイルリストから辞書を構築する
//! - [`Dictionary::from_entries`]: 単語エントリの列から辞書を構築する
//! - [`Dictionary::shared_default`]: デフォルト辞書を一度だけ読み込んで共有する
pub mod builder;
pub(crate) mod lexicon;
pub(crate) mod word_idx;

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, OnceLock};

use crate::dictionary::lexicon::{Haystack, Lexicon};
use crate::errors::{Result, SegoError};
use crate::segment::Segment;
use crate::segmenter::{self, Mode, Scratch};
use crate::text::Text;

pub use crate::dictionary::builder::{DictionaryBuilder, Inserted, SourceStats, MIN_TOKEN_FREQUENCY};
pub use crate::dictionary::lexicon::{LexMatch, Word, WordEntry};
pub use crate::dictionary::word_idx::WordIdx;

/// デフォルト辞書のパスを指定する環境変数の名前。
pub const DICTIONARY_ENV: &str = "SEGO_DICTIONARY";

/// データディレクトリに置かれるデフォルト辞書のファイル名。
pub const DEFAULT_DICTIONARY_FILE: &str = "dictionary.txt.zst";

/// グローバルデータディレクトリのパス。
///
/// ユーザー固有のローカルデータディレクトリ内の`sego`サブディレクトリを指します。
/// 各プラットフォームでの標準的なデータディレクトリ:
/// - Linux: `$XDG_DATA_HOME/sego` または `$HOME/.local/share/sego`
/// - macOS: `$HOME/Library/Application Support/sego`
/// - Windows: `{FOLDERID_LocalAppData}/sego`
pub static GLOBAL_DATA_DIR: LazyLock<Option<PathBuf>> =
    LazyLock::new(|| Some(dirs::data_local_dir()?.join("sego")));

static SHARED: SharedDictionary = SharedDictionary::new();

/// モードごとに一度だけ読み込まれる共有辞書
pub(crate) struct SharedDictionary {
    normal: OnceLock<Arc<Dictionary>>,
    search: OnceLock<Arc<Dictionary>>,
}

impl SharedDictionary {
    pub(crate) const fn new() -> Self {
        Self {
            normal: OnceLock::new(),
            search: OnceLock::new(),
        }
    }

    /// `mode`の辞書を返します。未読み込みの場合は`locate`で得たパスから読み込みます。
    ///
    /// 読み込みに失敗した場合は何もキャッシュしません。
    pub(crate) fn get_or_load<F>(&self, mode: Mode, locate: F) -> Result<Arc<Dictionary>>
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        let cell = match mode {
            Mode::Normal => &self.normal,
            Mode::Search => &self.search,
        };
        if let Some(dict) = cell.get() {
            return Ok(Arc::clone(dict));
        }

        let path = locate().ok_or_else(|| {
            SegoError::invalid_state(
                "could not locate the default dictionary",
                format!("set {DICTIONARY_ENV} to the path of a dictionary file"),
            )
        })?;
        let mut dict = Dictionary::from_paths([path])?;
        if mode == Mode::Search {
            dict = dict.with_search_segments();
        }

        let dict = Arc::new(dict);
        Ok(Arc::clone(cell.get_or_init(|| dict)))
    }
}

/// 確定済みの読み取り専用辞書。
///
/// 各単語のパスコストは構築時に確定しており、以後は変更されません。
/// 検索モードで使用する場合は、[`Dictionary::with_search_segments`]で
/// 各単語の細分割を事前に計算しておく必要があります。
pub struct Dictionary {
    lexicon: Lexicon,
    total_frequency: u64,
    max_word_len: usize,
    search_segments: Option<Vec<Box<[Segment]>>>,
}

impl Dictionary {
    pub(crate) fn new(lexicon: Lexicon, total_frequency: u64, max_word_len: usize) -> Self {
        Self {
            lexicon,
            total_frequency,
            max_word_len,
            search_segments: None,
        }
    }

    /// 単語エントリの列から辞書を構築します。
    ///
    /// # 引数
    ///
    /// * `entries` - `(表記, 頻度, 品詞)` の列
    ///
    /// # エラー
    ///
    /// 表記が空、または頻度が0のエントリが含まれる場合に [`SegoError`] を返します。
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = WordEntry>,
    {
        DictionaryBuilder::from_entries(entries)?.finalize()
    }

    /// 複数の辞書ファイルを順に読み込んで辞書を構築します。
    ///
    /// 同じ表記の単語は後に読み込んだファイルのものが優先されるため、
    /// 基本辞書、ユーザー辞書の順に指定します。
    ///
    /// # 引数
    ///
    /// * `paths` - 辞書ファイルのパス。拡張子が`.zst`のものは展開して読み込みます。
    ///
    /// # エラー
    ///
    /// いずれかのファイルが開けない場合、読み込み全体が中断されて [`SegoError`] を返します。
    pub fn from_paths<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut builder = DictionaryBuilder::new();
        builder.read_paths(paths)?;
        builder.finalize()
    }

    /// カンマ区切りのファイルリストから辞書を構築します。
    ///
    /// 各パスの前後の空白は取り除かれ、空の項目は無視されます。
    ///
    /// # 例
    ///
    /// ```no_run
    /// use sego::Dictionary;
    ///
    /// let dict = Dictionary::from_comma_separated("base.txt,user.txt")?;
    /// # Ok::<(), sego::errors::SegoError>(())
    /// ```
    pub fn from_comma_separated(list: &str) -> Result<Self> {
        let paths: Vec<&str> = list
            .split(',')
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .collect();
        if paths.is_empty() {
            return Err(SegoError::invalid_argument(
                "list",
                "no dictionary file is specified.",
            ));
        }
        Self::from_paths(paths)
    }

    /// デフォルト辞書のパスを返します。
    ///
    /// 環境変数`SEGO_DICTIONARY`が設定されていればその値を、そうでなければ
    /// [`GLOBAL_DATA_DIR`]内の`dictionary.txt.zst`を返します。
    pub fn default_path() -> Option<PathBuf> {
        match env::var_os(DICTIONARY_ENV) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => GLOBAL_DATA_DIR
                .as_ref()
                .map(|dir| dir.join(DEFAULT_DICTIONARY_FILE)),
        }
    }

    /// プロセス全体で共有されるデフォルト辞書を返します。
    ///
    /// 辞書はモードごとに最初の呼び出しで読み込まれ、以後は同じインスタンスが返されます。
    /// 検索モードの辞書は細分割が事前計算されています。
    ///
    /// # エラー
    ///
    /// デフォルト辞書のパスが決定できない場合や、読み込みに失敗した場合に
    /// [`SegoError`] を返します。失敗した場合は何もキャッシュされません。
    pub fn shared_default(mode: Mode) -> Result<Arc<Self>> {
        SHARED.get_or_load(mode, Self::default_path)
    }

    /// 単語数を返します。
    #[inline(always)]
    pub fn num_words(&self) -> usize {
        self.lexicon.words().len()
    }

    /// 全単語の頻度の総和を返します。
    #[inline(always)]
    pub fn total_frequency(&self) -> u64 {
        self.total_frequency
    }

    /// 単語の最大要素数を返します。
    #[inline(always)]
    pub fn max_word_len(&self) -> usize {
        self.max_word_len
    }

    /// 単語を返します。
    ///
    /// # パニック
    ///
    /// `word_idx`がこの辞書の単語を指していない場合にパニックします。
    #[inline(always)]
    pub fn word(&self, word_idx: WordIdx) -> &Word {
        self.lexicon.word(word_idx)
    }

    /// 全単語のイテレータを返します。
    pub fn words(&self) -> impl Iterator<Item = (WordIdx, &Word)> + '_ {
        self.lexicon
            .words()
            .iter()
            .enumerate()
            .map(|(i, word)| (WordIdx::new(i as u32), word))
    }

    /// 表記が完全に一致する単語を検索します。
    ///
    /// 表記は要素分割と同じ規則でASCII小文字に変換されてから照合されます。
    pub fn find(&self, text: &str) -> Option<WordIdx> {
        self.lexicon.find(&text.to_ascii_lowercase())
    }

    /// `text`の`start`番目の要素から始まる単語を、要素数の少ない順に返します。
    ///
    /// # 引数
    ///
    /// * `text` - 要素分割済みのテキスト
    /// * `start` - 検索を開始する要素の位置
    /// * `limit` - 一致させる最大の要素数。[`Dictionary::max_word_len`]で制限されます。
    pub fn lookup_prefixes(&self, text: &Text, start: usize, limit: usize) -> Vec<LexMatch> {
        let mut haystack = Haystack::default();
        let mut matches = vec![];
        self.lookup_prefixes_into(text, start, limit, &mut haystack, &mut matches);
        matches
    }

    pub(crate) fn lookup_prefixes_into(
        &self,
        text: &Text,
        start: usize,
        limit: usize,
        haystack: &mut Haystack,
        matches: &mut Vec<LexMatch>,
    ) {
        matches.clear();
        if start >= text.len() {
            return;
        }
        let end = text.len().min(start + limit.min(self.max_word_len));
        haystack.reset(text, start, end);
        matches.extend(self.lexicon.common_prefix_iterator(haystack));
    }

    /// 検索モード用の細分割が計算済みかどうかを返します。
    #[inline(always)]
    pub fn has_search_segments(&self) -> bool {
        self.search_segments.is_some()
    }

    /// 単語の細分割を返します。
    ///
    /// 各セグメントの位置は単語の表記内のバイト位置です。細分割が計算されていない場合や、
    /// 1要素の単語に対しては空のスライスを返します。
    pub fn search_segments(&self, word_idx: WordIdx) -> &[Segment] {
        match &self.search_segments {
            Some(segments) => &segments[word_idx.index()][..],
            None => &[],
        }
    }

    /// 検索モード用に各単語の細分割を計算します。
    ///
    /// 単語ごとに、その表記自身を検索モードで分かち書きした結果を保持します。
    /// 検索モードでは表記全体に一致する単語が除外されるため、細分割の各部分は
    /// 元の単語より必ず短くなります。辞書の単語を1つも含まない分割、つまり未知語だけの
    /// 分割は採用せず、その単語は細分割を持ちません。辞書の単語を含む分割では、
    /// 未知語の部分も細分割に残ります。
    pub fn with_search_segments(mut self) -> Self {
        if self.has_search_segments() {
            return self;
        }

        let mut scratch = Scratch::default();
        let mut buf = vec![];
        let segments: Vec<Box<[Segment]>> = self
            .lexicon
            .words()
            .iter()
            .map(|word| {
                segmenter::segment_text(&self, word.text(), Mode::Search, &mut scratch, &mut buf);
                if buf.iter().all(|seg| seg.word_idx().is_none()) {
                    buf.clear();
                }
                buf.as_slice().into()
            })
            .collect();

        log::info!(
            "[sego] prepared search segments: {} sub-segments for {} words",
            segments.iter().map(|s| s.len()).sum::<usize>(),
            segments.len(),
        );
        self.search_segments = Some(segments);
        self
    }

    /// 辞書を行形式で書き出します。
    ///
    /// 単語は表記の順に並べられ、品詞がない単語は `<表記> <頻度>` の形式で書き出されます。
    /// 書き出した結果は[`DictionaryBuilder::read_source`]で読み込めます。
    pub fn write_text<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        let mut words: Vec<&Word> = self.lexicon.words().iter().collect();
        words.sort_unstable_by(|a, b| a.text().as_bytes().cmp(b.text().as_bytes()));

        for word in words {
            wtr.write_all(word.text().as_bytes())?;
            write!(wtr, " {}", word.frequency())?;
            if !word.pos().is_empty() {
                write!(wtr, " {}", word.pos())?;
            }
            wtr.write_all(b"\n")?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(entries: &[(&str, u64, &str)]) -> Dictionary {
        Dictionary::from_entries(
            entries
                .iter()
                .map(|&(text, freq, pos)| WordEntry::new(text, freq, pos)),
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_prefixes_shortest_first() {
        let dict = build(&[
            ("中华人民共和国", 10, "ns"),
            ("中华", 20, "nz"),
            ("中", 30, "n"),
            ("华人", 5, "n"),
        ]);
        let text = Text::split("中华人民共和国成立");

        let lens: Vec<usize> = dict
            .lookup_prefixes(&text, 0, usize::MAX)
            .iter()
            .map(|m| m.len)
            .collect();
        assert_eq!(lens, vec![1, 2, 7]);

        let lens: Vec<usize> = dict
            .lookup_prefixes(&text, 0, 2)
            .iter()
            .map(|m| m.len)
            .collect();
        assert_eq!(lens, vec![1, 2]);

        let matches = dict.lookup_prefixes(&text, 1, usize::MAX);
        assert_eq!(matches.len(), 1);
        assert_eq!(dict.word(matches[0].word_idx).pos(), "n");
        assert_eq!(matches[0].len, 2);

        assert!(dict.lookup_prefixes(&text, 9, usize::MAX).is_empty());
    }

    #[test]
    fn test_lookup_prefixes_alphanumeric_elements() {
        let dict = build(&[("github", 10, "nz"), ("git", 10, "n"), ("github 网站", 3, "n")]);
        let text = Text::split("GitHub 网站");
        let matches = dict.lookup_prefixes(&text, 0, usize::MAX);
        let words: Vec<&[u8]> = matches
            .iter()
            .map(|m| dict.word(m.word_idx).text().as_bytes())
            .collect();
        let expected: Vec<&[u8]> = vec![b"github", "github 网站".as_bytes()];
        assert_eq!(words, expected);
        assert_eq!(matches[1].len, 4);
    }

    #[test]
    fn test_find_is_case_folded() {
        let dict = build(&[("GitHub", 10, "nz")]);
        assert!(dict.find("github").is_some());
        assert!(dict.find("GITHUB").is_some());
        assert!(dict.find("git").is_none());
    }

    #[test]
    fn test_search_segments() {
        let dict = build(&[
            ("中华人民共和国", 10, "ns"),
            ("中华", 20, "nz"),
            ("人民", 20, "n"),
            ("共和国", 20, "ns"),
            ("共和", 20, "nz"),
        ]);
        assert!(!dict.has_search_segments());
        let idx = dict.find("中华人民共和国").unwrap();
        assert!(dict.search_segments(idx).is_empty());

        let dict = dict.with_search_segments();
        assert!(dict.has_search_segments());

        let children = dict.search_segments(idx);
        let ranges: Vec<(usize, usize)> = children.iter().map(|s| (s.start(), s.end())).collect();
        assert_eq!(ranges, vec![(0, 6), (6, 12), (12, 21)]);

        // 共和国 keeps 共和 together with the unknown 国.
        let children = dict.search_segments(dict.find("共和国").unwrap());
        let words: Vec<bool> = children.iter().map(|s| s.word_idx().is_some()).collect();
        assert_eq!(words, vec![true, false]);

        // 中华 would only split into unknown characters.
        assert!(dict.search_segments(dict.find("中华").unwrap()).is_empty());

        // A single element is never subdivided.
        let dict = build(&[("中", 10, "n")]).with_search_segments();
        assert!(dict.search_segments(dict.find("中").unwrap()).is_empty());
    }

    #[test]
    fn test_write_text() {
        let dict = build(&[("人口", 12, "n"), ("中国", 100, ""), ("GitHub", 3, "nz")]);
        let mut buf = vec![];
        dict.write_text(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "github 3 nz\n中国 100\n人口 12 n\n"
        );
    }

    #[test]
    fn test_from_comma_separated_empty() {
        assert!(Dictionary::from_comma_separated(" , ").is_err());
    }
}
