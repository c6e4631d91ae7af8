//! 配布用辞書のビルドモジュール
//!
//! このモジュールは、複数の辞書ソースを重ね合わせて正規化し、
//! Zstandard圧縮した配布用の辞書ファイルを出力する機能を提供します。

use std::fs::File;
use std::io;
use std::path::PathBuf;

use sego::dictionary::{DictionaryBuilder, MIN_TOKEN_FREQUENCY};
use sego::errors::SegoError;

use clap::Parser;

/// ビルドコマンドの引数
#[derive(Parser, Debug)]
#[clap(
    name = "build",
    about = "A program to merge dictionary sources into a compressed dictionary."
)]
pub struct Args {
    /// Dictionary source files, merged in order. Later files override earlier ones.
    #[clap(short = 'i', long = "input", required = true)]
    inputs: Vec<PathBuf>,

    /// File to which the merged dictionary is output (in zstd).
    #[clap(short = 'o', long)]
    output: PathBuf,

    /// Minimum frequency of entries kept in the output.
    #[clap(short = 'm', long, default_value_t = MIN_TOKEN_FREQUENCY)]
    min_frequency: u64,

    /// Compression level of zstd.
    #[clap(short = 'l', long, default_value_t = 19)]
    level: i32,
}

/// ビルド処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書構築エラー
    #[error("Dictionary building failed: {0}")]
    Sego(#[from] SegoError),
}

/// ビルドコマンドを実行する
///
/// 指定されたソースを順に読み込み、表記順に整列した行形式でzstd圧縮して出力します。
///
/// # エラー
///
/// ファイルの読み書きや辞書構築に失敗した場合、`BuildError`を返します。
pub fn run(args: Args) -> Result<(), BuildError> {
    println!("Merging the dictionary sources...");
    let mut builder = DictionaryBuilder::new().min_frequency(args.min_frequency);
    for (path, stats) in args.inputs.iter().zip(builder.read_paths(&args.inputs)?) {
        println!(
            "  {}: {} lines, {} accepted, {} overridden, {} malformed, {} below frequency",
            path.display(),
            stats.lines,
            stats.accepted,
            stats.overridden,
            stats.skipped_malformed,
            stats.skipped_low_frequency,
        );
    }
    let dict = builder.finalize()?;

    println!("Writing the dictionary...");
    let file = File::create(&args.output)?;
    let mut encoder = zstd::Encoder::new(file, args.level)?;
    dict.write_text(&mut encoder)?;
    encoder.finish()?;

    println!(
        "Successfully built the dictionary of {} words to {}",
        dict.num_words(),
        args.output.display()
    );
    Ok(())
}
