use context_repo_prep::{
    estimate_tokens, PrepConfig, RepoPreparer, Tier, PROMPT_OVERHEAD_TOKENS,
    TRUNCATED_TIER1_LINES,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, relative: &str, content: impl AsRef<[u8]>) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn prepare(root: &Path, config: PrepConfig) -> context_repo_prep::RepoManifest {
    RepoPreparer::new(config).unwrap().prepare(root).unwrap()
}

#[test]
fn empty_repository_yields_empty_manifest() {
    let temp = tempdir().unwrap();
    let manifest = prepare(temp.path(), PrepConfig::default());

    assert!(manifest.is_empty());
    assert_eq!(manifest.total_files, 0);
    assert_eq!(manifest.file_tree, "(empty)\n");
    assert!(manifest.tier1_files.is_empty());
    assert!(manifest.tier2_files.is_empty());
    assert!(manifest.tier3_files.is_empty());
    assert_eq!(
        manifest.estimated_tokens,
        PROMPT_OVERHEAD_TOKENS + estimate_tokens("(empty)\n")
    );
}

#[test]
fn null_bytes_exclude_a_file_without_binary_extension() {
    let temp = tempdir().unwrap();
    write(temp.path(), "data/records.py", b"ID = 1\0\0\x01");
    write(temp.path(), "app.py", "print('ok')\n");

    let manifest = prepare(temp.path(), PrepConfig::default());

    assert_eq!(manifest.total_files, 1);
    assert_eq!(manifest.stats.skipped_binary, 1);
    assert_eq!(manifest.file_tree, format!("{}/\n  app.py\n", manifest.repo_name));
    assert!(manifest.tier2_files.is_empty());
    assert!(manifest.tier3_files.is_empty());
}

#[test]
fn skip_dirs_lock_files_and_oversized_files_are_not_listed() {
    let temp = tempdir().unwrap();
    write(temp.path(), "node_modules/pkg/index.js", "module.exports = 1;\n");
    write(temp.path(), "web/dist/bundle.js", "var a;\n");
    write(temp.path(), "Cargo.lock", "# lock\n");
    write(temp.path(), "huge.rs", "x".repeat(2_048));
    write(temp.path(), "Cargo.toml", "[package]\nname = \"demo\"\n");

    let config = PrepConfig::default().with_max_file_size(1_024);
    let manifest = prepare(temp.path(), config);

    assert_eq!(manifest.total_files, 1);
    assert_eq!(manifest.tier1_files[0].path, "Cargo.toml");
    assert_eq!(manifest.stats.skipped_binary, 1);
    assert_eq!(manifest.stats.skipped_oversized, 1);
}

#[test]
fn every_reported_file_lands_in_exactly_one_tier() {
    let temp = tempdir().unwrap();
    write(temp.path(), "README.md", "# Demo\n");
    write(temp.path(), "config/settings.yaml", "debug: true\n");
    write(temp.path(), "src/routes.py", "def index():\n    return 'hi'\n");
    write(temp.path(), "src/util.go", "package src\n\nfunc Add(a, b int) int {\n\treturn a + b\n}\n");
    write(temp.path(), "src/Widget.tsx", "export function Widget() {\n  return null;\n}\n");
    write(temp.path(), "docs/guide.txt", "read me\n");
    write(temp.path(), "assets/site.css", "body {}\n");

    let manifest = prepare(temp.path(), PrepConfig::default());

    let mut seen = BTreeSet::new();
    for path in manifest
        .tier1_files
        .iter()
        .map(|r| r.path.clone())
        .chain(manifest.tier2_files.iter().map(|r| r.path.clone()))
        .chain(manifest.tier3_files.iter().cloned())
    {
        assert!(seen.insert(path.clone()), "{path} reported twice");
    }
    assert_eq!(seen.len(), manifest.total_files);
    assert_eq!(manifest.total_files, 7);

    let key: Vec<&str> = manifest.tier1_files.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(key, vec!["README.md", "config/settings.yaml", "src/routes.py"]);
    let outlined: Vec<&str> = manifest.tier2_files.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(outlined, vec!["src/Widget.tsx", "src/util.go"]);
    assert_eq!(manifest.tier3_files, vec!["assets/site.css", "docs/guide.txt"]);

    let go = &manifest.tier2_files[1];
    assert!(go.signatures.contains("func Add(a, b int) int {"));
    assert!(!go.signatures.contains("return a + b"));
}

#[test]
fn large_key_file_forces_demotion_and_truncation() {
    let temp = tempdir().unwrap();
    let line = format!("{}\n", "k".repeat(399));
    write(temp.path(), "main.py", line.repeat(4_000));
    for n in 0..20 {
        let body: String = (0..400)
            .map(|i| format!("def handler_{n}_{i}(request, response, context):\n    pass\n"))
            .collect();
        write(temp.path(), &format!("pkg/mod_{n:02}.py"), body);
    }

    let config = PrepConfig::default()
        .with_max_tokens(150_000)
        .with_max_file_size(2_000_000);
    let manifest = prepare(temp.path(), config);

    assert_eq!(manifest.total_files, 21);
    assert_eq!(manifest.stats.truncated, 1);
    assert!(manifest.stats.demoted > 0);
    assert_eq!(manifest.tier3_files.len(), manifest.stats.demoted);
    assert_eq!(
        manifest.tier1_files[0].content.lines().count(),
        TRUNCATED_TIER1_LINES + 2
    );

    let recomputed = PROMPT_OVERHEAD_TOKENS
        + estimate_tokens(&manifest.file_tree)
        + manifest.tier1_files.iter().map(|r| r.tokens()).sum::<usize>()
        + manifest.tier2_files.iter().map(|r| r.tokens()).sum::<usize>();
    assert_eq!(manifest.estimated_tokens, recomputed);
    assert!(manifest.within_budget(150_000));
}

#[test]
fn demoted_paths_move_to_the_listing() {
    let temp = tempdir().unwrap();
    for (name, defs) in [("big.py", 300), ("mid.py", 120), ("small.py", 10)] {
        let body: String = (0..defs)
            .map(|i| format!("def function_number_{i}(argument):\n    return argument\n"))
            .collect();
        write(temp.path(), &format!("lib/{name}"), body);
    }

    let probe = prepare(temp.path(), PrepConfig::default());
    assert!(probe.stats.demoted == 0);
    let big = probe.tier2_files.iter().find(|r| r.path == "lib/big.py").unwrap();
    let mid = probe.tier2_files.iter().find(|r| r.path == "lib/mid.py").unwrap();

    let limit = PROMPT_OVERHEAD_TOKENS + estimate_tokens(&probe.file_tree) + big.tokens() + mid.tokens();
    let manifest = prepare(temp.path(), PrepConfig::default().with_max_tokens(limit));

    let kept: Vec<&str> = manifest.tier2_files.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(kept, vec!["lib/big.py", "lib/mid.py"]);
    assert_eq!(manifest.tier3_files, vec!["lib/small.py"]);
    assert_eq!(manifest.stats.demoted, 1);
    assert!(manifest.within_budget(limit));
}

#[test]
fn manifest_is_deterministic() {
    let temp = tempdir().unwrap();
    write(temp.path(), "README.md", "# Demo\n");
    write(temp.path(), "src/b.rs", "pub fn b() {\n    1;\n}\n");
    write(temp.path(), "src/a.rs", "pub struct A;\n");

    let first = prepare(temp.path(), PrepConfig::default());
    let second = prepare(temp.path(), PrepConfig::default());

    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.file_tree, second.file_tree);
    assert_eq!(first.tier2_files, second.tier2_files);
    assert_eq!(
        first.tier2_files.iter().map(|r| r.language.as_str()).collect::<Vec<_>>(),
        vec!["rust", "rust"]
    );
    assert_eq!(Tier::Source.number(), 2);
}
