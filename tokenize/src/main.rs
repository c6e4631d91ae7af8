//! 分かち書きを実行するユーティリティ
//!
//! このバイナリは、標準入力から読み込んだテキストを分かち書きし、
//! 指定された出力形式（tagged、wakati、detail）で結果を出力します。

use std::error::Error;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{mpsc, Arc};
use std::thread;

use sego::segmenter::worker::Worker;
use sego::{Dictionary, DictionaryBuilder, Mode, Segmenter};

use clap::Parser;

/// 出力モード
#[derive(Clone, Copy, Debug)]
enum OutputMode {
    Tagged,
    Wakati,
    Detail,
}

/// `OutputMode` の `FromStr` 実装
impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "tagged" => Ok(Self::Tagged),
            "wakati" => Ok(Self::Wakati),
            "detail" => Ok(Self::Detail),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "tokenize", about = "Segments text into dictionary words")]
struct Args {
    /// Dictionary files, loaded in order. Later files override earlier ones.
    /// Files ending in .zst are decompressed. Defaults to $SEGO_DICTIONARY.
    #[clap(short = 'i', long = "dict")]
    dicts: Vec<PathBuf>,

    /// Output mode. Choices are tagged, wakati, and detail.
    #[clap(short = 'O', long, default_value = "tagged")]
    output_mode: OutputMode,

    /// Expands compound words into their parts for search engines.
    #[clap(short = 's', long)]
    search: bool,

    /// Minimum frequency of dictionary entries.
    #[clap(short = 'm', long, default_value_t = sego::dictionary::MIN_TOKEN_FREQUENCY)]
    min_frequency: u64,

    /// Number of worker threads. Output keeps the input order.
    #[clap(short = 't', long, default_value_t = 1)]
    threads: usize,
}

/// 辞書を読み込み、分かち書き器を作成する
fn load_segmenter(args: &Args) -> Result<Segmenter, Box<dyn Error>> {
    let paths = if args.dicts.is_empty() {
        vec![Dictionary::default_path().ok_or("No dictionary is specified")?]
    } else {
        args.dicts.clone()
    };

    let mut builder = DictionaryBuilder::new().min_frequency(args.min_frequency);
    for (path, stats) in paths.iter().zip(builder.read_paths(&paths)?) {
        eprintln!(
            "{}: {} words, {} overridden, {} skipped",
            path.display(),
            stats.accepted,
            stats.overridden,
            stats.skipped_malformed + stats.skipped_low_frequency,
        );
    }
    let dict = builder.finalize()?;

    Ok(Segmenter::new(dict).search_mode(args.search)?)
}

/// 1行の分かち書き結果を書き出す
fn write_line<W>(worker: &Worker, mode: OutputMode, search: bool, out: &mut W) -> std::io::Result<()>
where
    W: Write,
{
    match mode {
        OutputMode::Tagged => {
            out.write_all(worker.to_tagged_string(search).as_bytes())?;
            out.write_all(b"\n")?;
        }
        OutputMode::Wakati => {
            out.write_all(worker.to_strings(search).join(" ").as_bytes())?;
            out.write_all(b"\n")?;
        }
        OutputMode::Detail => {
            for t in worker.token_iter() {
                writeln!(
                    out,
                    "{}\t{}\trange={:?}\tfrequency={}\tdistance={}\tchildren={}",
                    t.surface(),
                    t.pos(),
                    t.range_byte(),
                    t.frequency(),
                    t.distance(),
                    t.children().len(),
                )?;
            }
            out.write_all(b"EOS\n")?;
        }
    }
    Ok(())
}

/// 複数のスレッドで分かち書きし、入力順に出力する
fn run_parallel(segmenter: &Segmenter, args: &Args, lines: Vec<String>) -> Result<(), Box<dyn Error>> {
    let num_threads = args.threads.max(1);
    let chunk_len = lines.len().div_ceil(num_threads).max(1);
    let (tx, rx) = mpsc::channel();

    thread::scope(|s| {
        for (i, chunk) in lines.chunks(chunk_len).enumerate() {
            let segmenter = Segmenter::from_shared_dictionary(Arc::clone(segmenter.shared_dictionary()))
                .search_mode(segmenter.mode() == Mode::Search);
            let tx = tx.clone();
            s.spawn(move || {
                let result = segmenter.and_then(|segmenter| -> sego::errors::Result<Vec<u8>> {
                    let mut worker = segmenter.new_worker();
                    let mut buf = vec![];
                    for line in chunk {
                        worker.reset_sentence(line);
                        worker.segment();
                        write_line(&worker, args.output_mode, args.search, &mut buf)?;
                    }
                    Ok(buf)
                });
                let _ = tx.send((i, result));
            });
        }
    });
    drop(tx);

    let mut outputs: Vec<_> = rx.iter().collect();
    outputs.sort_by_key(|(i, _)| *i);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    for (_, output) in outputs {
        out.write_all(&output?)?;
    }
    out.flush()?;
    Ok(())
}

/// メイン関数
///
/// 辞書をロードし、標準入力から読み込んだテキストを分かち書きして、
/// 指定された形式で結果を標準出力に出力します。
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    eprintln!("Loading the dictionary...");
    let segmenter = load_segmenter(&args)?;
    eprintln!("Ready to segment");

    if args.threads > 1 {
        let lines = std::io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?;
        return run_parallel(&segmenter, &args, lines);
    }

    let mut worker = segmenter.new_worker();
    let is_tty = atty::is(atty::Stream::Stdout);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let line = line?;
        worker.reset_sentence(line);
        worker.segment();
        write_line(&worker, args.output_mode, args.search, &mut out)?;
        if is_tty {
            out.flush()?;
        }
    }

    Ok(())
}
