//! # Sego
//!
//! Segoは、単語の頻度に基づく最短経路探索による辞書駆動の分かち書きの実装です。
//!
//! ## 概要
//!
//! このライブラリは、中国語を主な対象として、任意のUnicodeテキストを辞書の単語の列に
//! 分割します。各単語のパスコストを頻度から求め、コストの和が最小となる分割を
//! 選ぶため、統計モデルや学習を必要とせず、同じ入力と辞書に対して常に同じ結果を返します。
//!
//! ## 主な機能
//!
//! - **要素分割**: 英数字の連続を1要素にまとめ、それ以外の文字を1文字ずつの要素に分割
//! - **最短経路の分かち書き**: 辞書にない文字も未知語として必ず全体を分割
//! - **検索モード**: 複合語を辞書の短い単語に細分割し、検索用のキーワードを増やす
//! - **辞書の重ね合わせ**: 基本辞書の後にユーザー辞書を読み込んで単語を上書き
//! - **スレッド間の共有**: 確定済みの辞書は不変であり、`Arc`で共有して並列に使用可能
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sego::{DictionaryBuilder, Segmenter};
//!
//! let source = "中国 1000 ns\n十三亿 20 m\n人口 120 n\n";
//!
//! let mut builder = DictionaryBuilder::new();
//! builder.read_source(source.as_bytes())?;
//! let dict = builder.finalize()?;
//!
//! let segmenter = Segmenter::new(dict);
//! let segments = segmenter.segment("中国有十三亿人口");
//! assert_eq!(segments.len(), 4);
//!
//! let t0 = segments.token(0);
//! assert_eq!(t0.surface(), "中国");
//! assert_eq!(t0.range_byte(), 0..6);
//! assert_eq!(t0.pos(), "ns");
//!
//! let t1 = segments.token(1);
//! assert_eq!(t1.surface(), "有");
//! assert!(t1.is_unknown());
//!
//! assert_eq!(segments.to_tagged_string(false), "中国/ns 有/x 十三亿/m 人口/n ");
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// 辞書データ構造とビルダー
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 分かち書き結果の文字列化
mod render;

/// 分かち書き結果の型
pub mod segment;

/// 分かち書き器の実装
pub mod segmenter;

/// 入力テキストの要素分割
pub mod text;

/// トークン型の定義
pub mod token;

/// 内部ユーティリティ関数
pub mod utils;


// Re-exports
pub use dictionary::{Dictionary, DictionaryBuilder, WordEntry};
pub use segment::{Segment, Segments};
pub use segmenter::{Mode, Segmenter};
pub use text::Text;

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
