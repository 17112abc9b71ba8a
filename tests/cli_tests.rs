mod common;

use common::{layout_text, write_file, COLEMAK_KEYS, QWERTY_KEYS};
use keystat::corpus::Corpus;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
    config: PathBuf,
    corpus: PathBuf,
    layouts: PathBuf,
    cache: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let layouts = dir.path().join("layouts");
        fs::create_dir(&layouts).unwrap();
        write_file(&layouts, "qwerty.txt", &layout_text("qwerty", QWERTY_KEYS));
        write_file(&layouts, "colemak.txt", &layout_text("colemak", COLEMAK_KEYS));

        let corpus = dir.path().join("corpus.json");
        common::sample_corpus().save_to_file(&corpus).unwrap();

        Self {
            config: dir.path().join("config.json"),
            cache: dir.path().join("cache").join("results.json"),
            corpus,
            layouts,
            dir,
        }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_keystat"))
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .output()
            .expect("Failed to run keystat")
    }

    fn analyze(&self, extra: &[&str]) -> Output {
        let mut args = vec![
            "analyze",
            "--corpus",
            self.corpus.to_str().unwrap(),
            "--layouts",
            self.layouts.to_str().unwrap(),
            "--cache",
            self.cache.to_str().unwrap(),
        ];
        args.extend_from_slice(extra);
        self.run(&args)
    }
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

#[test]
fn test_analyze_prints_tables_and_writes_cache() {
    let ctx = TestContext::new();
    let out = ctx.analyze(&[]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let text = stdout(&out);
    assert!(text.contains("Trigrams (AVG)"));
    assert!(Regex::new(r"\|\s*qwerty\s*\|").unwrap().is_match(&text));
    assert!(Regex::new(r"\|\s*colemak\s*\|").unwrap().is_match(&text));
    assert!(Regex::new(r"\d+\.\d{2}%").unwrap().is_match(&text));

    let cache = fs::read_to_string(&ctx.cache).unwrap();
    assert!(cache.contains("\"AVG\""));
    assert!(cache.contains("\"qwerty\""));
}

#[test]
fn test_analyze_single_layout_and_csv() {
    let ctx = TestContext::new();
    let csv_path = ctx.dir.path().join("out.csv");
    let out = ctx.analyze(&[
        "--thumb",
        "none",
        "--layout",
        "Colemak",
        "--csv",
        csv_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let text = stdout(&out);
    assert!(text.contains("colemak"));
    assert!(!text.contains("qwerty"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("layout,"));
    assert!(header.contains("roll-rt"));
    assert!(lines.next().unwrap().starts_with("colemak,"));
    assert!(lines.next().is_none());

    let cache = fs::read_to_string(&ctx.cache).unwrap();
    assert!(cache.contains("\"NONE\""));
}

#[test]
fn test_table_command() {
    let ctx = TestContext::new();
    let out = ctx.run(&["table"]);
    assert!(out.status.success());

    let text = stdout(&out);
    assert!(text.contains("Total: 1000 entries"));
    assert!(Regex::new(r"\|\s*sfT\s*\|\s*10\s*\|").unwrap().is_match(&text));
    assert!(Regex::new(r"\|\s*alternate\s*\|\s*200\s*\|").unwrap().is_match(&text));
}

#[test]
fn test_corpus_command() {
    let ctx = TestContext::new();
    let input = write_file(ctx.dir.path(), "texts.json", r#"{"texts": ["abc", "de"]}"#);
    let output = ctx.dir.path().join("gen.json");

    let out = ctx.run(&[
        "corpus",
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--name",
        "tiny",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let c = Corpus::load_from_file(&output).unwrap();
    assert_eq!(c.file, "tiny");
    assert_eq!(c.monogram_total(), 6);
}

#[test]
fn test_config_commands_persist() {
    let ctx = TestContext::new();
    assert!(ctx.run(&["config", "thumb", "RT"]).status.success());
    assert!(ctx
        .run(&["config", "sort", "40%roll", "-sfb"])
        .status
        .success());

    let shown = stdout(&ctx.run(&["config", "show"]));
    assert!(shown.contains("\"thumb-space\": \"RT\""));
    assert!(Regex::new(r#""weight": -0\.6"#).unwrap().is_match(&shown));

    assert!(ctx.run(&["config", "reset"]).status.success());
    let shown = stdout(&ctx.run(&["config", "show"]));
    assert!(shown.contains("\"thumb-space\": \"AVG\""));
}

#[test]
fn test_bad_inputs_fail() {
    let ctx = TestContext::new();
    let out = ctx.run(&[
        "analyze",
        "--corpus",
        ctx.dir.path().join("missing.json").to_str().unwrap(),
        "--layouts",
        ctx.layouts.to_str().unwrap(),
    ]);
    assert!(!out.status.success());

    let out = ctx.run(&["config", "sort", "bogus"]);
    assert!(!out.status.success());
}

#[test]
fn test_cache_clear() {
    let ctx = TestContext::new();
    assert!(ctx.analyze(&[]).status.success());
    assert!(ctx.cache.exists());

    let out = ctx.run(&["cache", "--cache", ctx.cache.to_str().unwrap(), "clear"]);
    assert!(out.status.success());
    assert!(!ctx.cache.exists());
}
