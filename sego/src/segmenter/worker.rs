//! 分かち書き処理のためのルーチンを提供するモジュール。
//!
//! ワーカーは入力と作業領域を保持し、再利用することで入力ごとのメモリ割り当てを避けます。
//! 大量の行を処理する場合は、スレッドごとに1つのワーカーを作成して使い回します。
use crate::render;
use crate::segment::Segment;
use crate::segmenter::{self, Scratch, Segmenter};
use crate::text::Text;
use crate::token::{Token, TokenIter};

/// 分かち書き処理のためのルーチンを提供する構造体。
///
/// # 例
///
/// ```
/// use sego::{Dictionary, Segmenter, WordEntry};
///
/// let dict = Dictionary::from_entries([WordEntry::new("人口", 10, "n")])?;
/// let segmenter = Segmenter::new(dict);
/// let mut worker = segmenter.new_worker();
///
/// for line in ["十三亿人口", "人口"] {
///     worker.reset_sentence(line);
///     worker.segment();
///     assert_eq!(worker.token(worker.num_segments() - 1).surface(), "人口");
/// }
/// # Ok::<(), sego::errors::SegoError>(())
/// ```
pub struct Worker {
    segmenter: Segmenter,
    input: Vec<u8>,
    text: Text<'static>,
    scratch: Scratch,
    segments: Vec<Segment>,
}

impl Worker {
    pub(crate) fn new(segmenter: Segmenter) -> Self {
        Self {
            segmenter,
            input: vec![],
            text: Text::default(),
            scratch: Scratch::default(),
            segments: vec![],
        }
    }

    /// 分かち書きする入力をリセットします。
    ///
    /// 以前の分かち書き結果は破棄されます。
    ///
    /// # 引数
    ///
    /// * `input` - 分かち書きする文字列またはバイト列
    pub fn reset_sentence<S>(&mut self, input: S)
    where
        S: AsRef<[u8]>,
    {
        self.segments.clear();
        self.input.clear();
        self.input.extend_from_slice(input.as_ref());
        self.text.refill(&self.input);
    }

    /// 設定された入力を分かち書きします。
    ///
    /// 結果は`token()`や`token_iter()`でアクセスできます。
    pub fn segment(&mut self) {
        segmenter::segment_text(
            self.segmenter.dictionary(),
            &self.text,
            self.segmenter.mode(),
            &mut self.scratch,
            &mut self.segments,
        );
    }

    /// 分かち書き結果のセグメント数を返します。
    #[inline(always)]
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// 分かち書き結果のセグメントを返します。
    #[inline(always)]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// `i`番目のトークンを返します。
    ///
    /// # パニック
    ///
    /// `i`がセグメント数以上の場合にパニックします。
    #[inline(always)]
    pub fn token(&self, i: usize) -> Token<'_> {
        Token::new(
            self.segmenter.dictionary(),
            self.text.as_bytes(),
            &self.input,
            self.segments[i],
        )
    }

    /// 分かち書き結果のトークンのイテレータを返します。
    #[inline(always)]
    pub fn token_iter(&self) -> TokenIter<'_> {
        TokenIter::new(
            self.segmenter.dictionary(),
            self.text.as_bytes(),
            &self.input,
            &self.segments,
        )
    }

    /// 分かち書き結果を`<表記>/<品詞> `の形式で連結した文字列を返します。
    pub fn to_tagged_string(&self, search: bool) -> String {
        render::to_tagged_string(self.token_iter(), search)
    }

    /// 分かち書き結果の表記を並べたリストを返します。
    pub fn to_strings(&self, search: bool) -> Vec<String> {
        render::to_strings(self.token_iter(), search)
    }
}
