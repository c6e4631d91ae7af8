//! 単語識別子
//!
//! このモジュールは、辞書内の単語を一意に識別するための
//! インデックス構造を提供します。

use crate::utils::FromU32;

/// 単語の識別子
///
/// 辞書が保持する単語配列への添字です。分かち書きの途中結果は単語への参照ではなく
/// この識別子を保持するため、辞書と結果の間にライフタイムの制約が生じません。
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct WordIdx {
    /// この単語のID
    pub word_id: u32,
}

impl WordIdx {
    /// 新しいインスタンスを作成します。
    #[inline(always)]
    pub(crate) const fn new(word_id: u32) -> Self {
        Self { word_id }
    }

    /// 単語配列への添字を返します。
    #[inline(always)]
    pub fn index(&self) -> usize {
        usize::from_u32(self.word_id)
    }
}
