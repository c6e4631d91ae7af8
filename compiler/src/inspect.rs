//! 辞書の内容を確認するモジュール
//!
//! 辞書を読み込み、単語数や総頻度などの統計と、指定した単語の情報を表示します。

use std::path::PathBuf;

use sego::dictionary::Dictionary;
use sego::errors::SegoError;

use clap::Parser;

/// 確認コマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "inspect", about = "A program to show statistics of dictionaries.")]
pub struct Args {
    /// Dictionary files, loaded in order.
    #[clap(short = 'i', long = "input", required = true)]
    inputs: Vec<PathBuf>,

    /// Words to look up.
    words: Vec<String>,
}

/// 確認処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// 辞書読み込みエラー
    #[error("Dictionary loading failed: {0}")]
    Sego(#[from] SegoError),
}

pub fn run(args: Args) -> Result<(), InspectError> {
    let dict = Dictionary::from_paths(&args.inputs)?;

    println!("words: {}", dict.num_words());
    println!("total frequency: {}", dict.total_frequency());
    println!("max word length: {}", dict.max_word_len());

    for text in &args.words {
        match dict.find(text) {
            Some(idx) => {
                let word = dict.word(idx);
                println!(
                    "{}\tfrequency={}\tdistance={}\tpos={}",
                    text,
                    word.frequency(),
                    word.distance(),
                    word.pos()
                );
            }
            None => println!("{text}\tnot found"),
        }
    }
    Ok(())
}
