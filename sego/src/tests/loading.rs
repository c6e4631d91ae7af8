//! 辞書の読み込み機能に関するテスト
//!
//! 複数ファイルの重ね合わせ、Zstandard圧縮ファイル、読み込みエラーの扱いを検証します。

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::{tempdir, TempDir};

use crate::dictionary::{Dictionary, DictionaryBuilder, SharedDictionary, SourceStats};
use crate::errors::SegoError;
use crate::segmenter::{Mode, Segmenter};

struct TestEnv {
    _temp_dir: TempDir,
    work_dir: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create a temporary directory");
        let work_dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            work_dir,
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn write_zstd(&self, name: &str, content: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        let compressed = zstd::encode_all(content.as_bytes(), 3).unwrap();
        fs::write(&path, compressed).unwrap();
        path
    }
}

fn frequency_of(dict: &Dictionary, text: &str) -> u64 {
    dict.word(dict.find(text).unwrap()).frequency()
}

#[test]
fn test_later_file_wins() {
    let env = TestEnv::new();
    let first = env.write("a.txt", "a 1000 n\n");
    let second = env.write("b.txt", "a 1 n\n");

    let mut builder = DictionaryBuilder::new().min_frequency(1);
    builder.read_paths([&first, &second]).unwrap();
    let dict = builder.finalize().unwrap();

    assert_eq!(dict.num_words(), 1);
    assert_eq!(frequency_of(&dict, "a"), 1);
    assert_eq!(dict.total_frequency(), 1);
}

#[test]
fn test_low_frequency_override_is_skipped_by_default() {
    let env = TestEnv::new();
    let first = env.write("a.txt", "a 1000 n\n");
    let second = env.write("b.txt", "a 1 n\n");

    let dict = Dictionary::from_paths([&first, &second]).unwrap();
    assert_eq!(frequency_of(&dict, "a"), 1000);
}

#[test]
fn test_user_dictionary_overrides_pos() {
    let env = TestEnv::new();
    let base = env.write("base.txt", "中国 100 ns\n人口 50 n\n");
    let user = env.write("user.txt", "中国 20 nz\n");

    let dict = Dictionary::from_paths([&base, &user]).unwrap();
    assert_eq!(dict.num_words(), 2);
    assert_eq!(dict.total_frequency(), 70);

    let segmenter = Segmenter::new(dict);
    assert_eq!(
        segmenter.segment("中国人口").to_tagged_string(false),
        "中国/nz 人口/n "
    );
}

#[test]
fn test_comma_separated_list() {
    let env = TestEnv::new();
    let base = env.write("base.txt", "中国 100 ns\n");
    let user = env.write("user.txt", "中国 20 nz\n");

    let list = format!("{}, {}", base.display(), user.display());
    let dict = Dictionary::from_comma_separated(&list).unwrap();
    assert_eq!(frequency_of(&dict, "中国"), 20);
}

#[test]
fn test_missing_file_aborts_load() {
    let env = TestEnv::new();
    let base = env.write("base.txt", "中国 100 ns\n");
    let missing = env.work_dir.join("missing.txt");

    let result = Dictionary::from_paths([&base, &missing]);
    match result {
        Err(SegoError::DictionaryOpen { path, .. }) => assert_eq!(path, missing),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("loading a missing file must fail"),
    }
}

#[test]
fn test_directory_is_rejected() {
    let env = TestEnv::new();
    let mut builder = DictionaryBuilder::new();
    let result = builder.read_path(&env.work_dir);
    assert!(matches!(result, Err(SegoError::PathIsDirectory(_))));
}

#[test]
fn test_zstd_source() {
    let env = TestEnv::new();
    let content = "中国 100 ns\n十三亿 10 m\n人口 50 n\n坏行\n";
    let plain = env.write("dict.txt", content);
    let compressed = env.write_zstd("dict.txt.zst", content);

    let mut builder = DictionaryBuilder::new();
    let plain_stats = builder.read_path(&plain).unwrap();
    let mut builder = DictionaryBuilder::new();
    let zstd_stats = builder.read_path(&compressed).unwrap();
    assert_eq!(plain_stats, zstd_stats);
    assert_eq!(
        zstd_stats,
        SourceStats {
            lines: 4,
            accepted: 3,
            overridden: 0,
            skipped_malformed: 1,
            skipped_low_frequency: 0,
        }
    );

    let dict = builder.finalize().unwrap();
    let segmenter = Segmenter::new(dict);
    assert_eq!(
        segmenter.segment("中国有十三亿人口").to_strings(false),
        ["中国", "有", "十三亿", "人口"]
    );
}

#[test]
fn test_write_text_reloads() {
    let env = TestEnv::new();
    let source = env.write("dict.txt", "人口 50 n\nGitHub 10\n中国 100 ns\n中国 80 nz\n");
    let dict = Dictionary::from_paths([&source]).unwrap();

    let mut buf = vec![];
    dict.write_text(&mut buf).unwrap();
    let written = env.work_dir.join("written.txt");
    fs::write(&written, &buf).unwrap();

    let reloaded = Dictionary::from_paths([&written]).unwrap();
    assert_eq!(reloaded.num_words(), 3);
    assert_eq!(reloaded.total_frequency(), dict.total_frequency());
    for (_, word) in dict.words() {
        let text = String::from_utf8_lossy(word.text().as_bytes());
        let idx = reloaded.find(&text).unwrap();
        assert_eq!(reloaded.word(idx).frequency(), word.frequency());
        assert_eq!(reloaded.word(idx).pos(), word.pos());
    }
}

#[test]
fn test_shared_dictionary_is_loaded_once() {
    let env = TestEnv::new();
    let path = env.write_zstd("dictionary.txt.zst", "中华 40 nz\n人民 60 n\n中华人民 10 n\n");
    let shared = SharedDictionary::new();

    let first = shared
        .get_or_load(Mode::Search, || Some(path.clone()))
        .unwrap();
    assert!(first.has_search_segments());

    fs::remove_file(&path).unwrap();
    let second = shared
        .get_or_load(Mode::Search, || panic!("the cached dictionary must be reused"))
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // Each mode is cached separately.
    let result = shared.get_or_load(Mode::Normal, || Some(path.clone()));
    assert!(matches!(result, Err(SegoError::DictionaryOpen { .. })));
}

#[test]
fn test_shared_dictionary_failure_is_not_cached() {
    let env = TestEnv::new();
    let shared = SharedDictionary::new();

    let result = shared.get_or_load(Mode::Normal, || None);
    assert!(matches!(result, Err(SegoError::InvalidState(_))));

    let path = env.write("dictionary.txt", "中国 100 ns\n");
    let dict = shared.get_or_load(Mode::Normal, || Some(path)).unwrap();
    assert_eq!(dict.num_words(), 1);
    assert!(!dict.has_search_segments());
}
