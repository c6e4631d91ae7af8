//! 頻度に基づく最短経路の分かち書き器。
//!
//! このモジュールは、辞書の単語のパスコストの和が最小になるように入力を分割する
//! 分かち書き器を提供します。パスコストは単語の生起確率の負の対数なので、
//! 最短経路は生起確率の積が最大の分割に相当します。
//!
//! # 主要な構造体
//!
//! - [`Segmenter`]: 辞書と分割モードを保持する分かち書き器
//! - [`Worker`]: 作業領域を再利用して分かち書きを行うワーカー
//!
//! # 例
//!
//! ```
//! use sego::{Dictionary, Segmenter, WordEntry};
//!
//! let dict = Dictionary::from_entries([
//!     WordEntry::new("中国", 1000, "ns"),
//!     WordEntry::new("十三亿", 20, "m"),
//!     WordEntry::new("人口", 120, "n"),
//! ])?;
//! let segmenter = Segmenter::new(dict);
//! let mut worker = segmenter.new_worker();
//!
//! worker.reset_sentence("中国有十三亿人口");
//! worker.segment();
//!
//! let words: Vec<String> = worker.token_iter().map(|t| t.surface().into_owned()).collect();
//! assert_eq!(words, ["中国", "有", "十三亿", "人口"]);
//! # Ok::<(), sego::errors::SegoError>(())
//! ```
mod jumper;
pub mod worker;

use std::sync::Arc;

use crate::dictionary::lexicon::{Haystack, LexMatch};
use crate::dictionary::Dictionary;
use crate::errors::{Result, SegoError};
use crate::segment::{Segment, Segments};
use crate::segmenter::jumper::JumpTable;
use crate::segmenter::worker::Worker;
use crate::text::Text;
use crate::token::UNKNOWN_DISTANCE;

/// 分かち書きのモード
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// 最短経路の分割だけを出力します。
    #[default]
    Normal,
    /// 検索エンジン向けのモード。
    ///
    /// 入力全体に一致する単語を除外して、より細かい分割を優先します。
    /// 1要素だけの入力は分割しません。
    Search,
}

/// 分かち書きに使用する作業領域
#[derive(Default)]
pub(crate) struct Scratch {
    jumps: JumpTable,
    haystack: Haystack,
    matches: Vec<LexMatch>,
}

/// 辞書に基づいて入力を分かち書きする構造体。
///
/// 辞書は[`Arc`]で共有されるため、`Segmenter`のクローンは安価であり、
/// スレッドごとにクローンして使用できます。
#[derive(Clone)]
pub struct Segmenter {
    dict: Arc<Dictionary>,
    mode: Mode,
}

impl Segmenter {
    /// 新しい分かち書き器を作成します。
    ///
    /// # 引数
    ///
    /// * `dict` - 分かち書きに使用する辞書
    pub fn new(dict: Dictionary) -> Self {
        Self {
            dict: Arc::new(dict),
            mode: Mode::Normal,
        }
    }

    /// 共有された辞書から新しい分かち書き器を作成します。
    ///
    /// # 引数
    ///
    /// * `dict` - 共有される辞書への`Arc`参照
    ///
    /// # 例
    ///
    /// ```
    /// use std::sync::Arc;
    /// use sego::{Dictionary, Segmenter, WordEntry};
    ///
    /// let dict = Arc::new(Dictionary::from_entries([WordEntry::new("中国", 10, "ns")])?);
    /// let segmenter1 = Segmenter::from_shared_dictionary(dict.clone());
    /// let segmenter2 = Segmenter::from_shared_dictionary(dict);
    /// # Ok::<(), sego::errors::SegoError>(())
    /// ```
    pub fn from_shared_dictionary(dict: Arc<Dictionary>) -> Self {
        Self {
            dict,
            mode: Mode::Normal,
        }
    }

    /// 検索モードを使用するかどうかを設定します。
    ///
    /// 辞書を単独で所有している場合は、検索モード用の細分割をここで計算します。
    ///
    /// # 引数
    ///
    /// * `yes` - `true`の場合、検索モードで分かち書きします
    ///
    /// # エラー
    ///
    /// 辞書が共有されており、細分割が計算されていない場合に [`SegoError`] を返します。
    /// その場合は共有する前に [`Dictionary::with_search_segments`] を呼び出してください。
    pub fn search_mode(mut self, yes: bool) -> Result<Self> {
        if yes && !self.dict.has_search_segments() {
            let dict = Arc::try_unwrap(self.dict).map_err(|_| {
                SegoError::invalid_state(
                    "search segments are not prepared",
                    "the dictionary is shared with other owners",
                )
            })?;
            self.dict = Arc::new(dict.with_search_segments());
        }
        self.mode = if yes { Mode::Search } else { Mode::Normal };
        Ok(self)
    }

    /// 分かち書きのモードを返します。
    #[inline(always)]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// 辞書への参照を返します。
    #[inline(always)]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// 辞書の共有参照を返します。
    #[inline(always)]
    pub fn shared_dictionary(&self) -> &Arc<Dictionary> {
        &self.dict
    }

    /// 入力を分かち書きします。
    ///
    /// 入力は任意のバイト列で構いません。空の入力に対しては空の結果を返し、
    /// それ以外の入力は必ず全体が重なりなく分割されます。
    ///
    /// # 引数
    ///
    /// * `input` - 分かち書きする文字列またはバイト列
    pub fn segment<'a, S>(&'a self, input: &'a S) -> Segments<'a>
    where
        S: AsRef<[u8]> + ?Sized,
    {
        let text = Text::split(input);
        let mut scratch = Scratch::default();
        let mut segments = vec![];
        segment_text(&self.dict, &text, self.mode, &mut scratch, &mut segments);
        Segments::new(&self.dict, input.as_ref(), text, segments)
    }

    /// 新しいワーカーを作成します。
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }
}

/// 要素分割済みのテキストを分かち書きし、結果を`out`に書き出します。
///
/// 各位置について、その位置から始まる辞書の単語で終端位置の記録を更新します。
/// 1要素の単語が辞書にない位置には未知語を補うため、全位置が必ず到達可能になります。
pub(crate) fn segment_text(
    dict: &Dictionary,
    text: &Text,
    mode: Mode,
    scratch: &mut Scratch,
    out: &mut Vec<Segment>,
) {
    out.clear();
    let len = text.len();
    if len == 0 || (mode == Mode::Search && len == 1) {
        return;
    }

    let Scratch {
        jumps,
        haystack,
        matches,
    } = scratch;
    jumps.reset(len);

    for start in 0..len {
        let base = if start == 0 {
            0.0
        } else {
            jumps.min_distance(start - 1).unwrap_or(0.0)
        };

        dict.lookup_prefixes_into(text, start, dict.max_word_len(), haystack, matches);
        for m in matches.iter() {
            let end = start + m.len - 1;
            if mode == Mode::Search && start == 0 && end == len - 1 {
                continue;
            }
            let distance = base + dict.word(m.word_idx).distance();
            jumps.update(end, distance, Some(m.word_idx), m.len);
        }

        if matches.first().is_none_or(|m| m.len > 1) {
            jumps.update(start, base + UNKNOWN_DISTANCE, None, 1);
        }
    }

    jumps.backtrack(text, out);
}
