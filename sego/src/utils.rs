//! 内部ユーティリティ関数と型変換トレイトを提供するモジュール

/// u32から他の型への変換を提供するトレイト
///
/// 単語IDは`u32`で保持されますが、配列の添字には`usize`が必要です。
/// 標準ライブラリの`TryFrom`と異なり、ポインタ幅の前提を利用して
/// 失敗しない変換を提供します。
pub trait FromU32 {
    /// u32値から実装型を生成する
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        // Since the pointer width is guaranteed to be 32 or 64,
        // the following process always succeeds.
        unsafe { Self::try_from(src).unwrap_unchecked() }
    }
}
