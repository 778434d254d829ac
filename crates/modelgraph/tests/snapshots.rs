//! Golden output tests
//!
//! The blog fixture is loaded from disk and its DOT output compared with a
//! checked-in file, so any change to ordering or formatting shows up here.

use std::path::{Path, PathBuf};

use modelgraph::prelude::*;
use modelgraph::to_dot;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_blog() -> Schema {
    let mut project = Project::new(&ProjectConfig {
        include: vec![fixtures()],
        require: vec!["blog".to_string()],
        ..Default::default()
    });
    let report = project.load();
    assert!(report.is_complete(), "{:?}", report.failures);
    report.schema
}

#[test]
fn test_blog_dot_matches_golden_file() {
    let graph = GraphBuilder::new(&NamingConfig::default())
        .build(&load_blog())
        .unwrap();

    let expected = std::fs::read_to_string(fixtures().join("blog.dot")).unwrap();
    assert_eq!(to_dot(&graph), expected);
}

#[test]
fn test_blog_dot_is_stable() {
    let config = NamingConfig::default();
    let first = to_dot(&GraphBuilder::new(&config).build(&load_blog()).unwrap());
    let second = to_dot(&GraphBuilder::new(&config).build(&load_blog()).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_blog_text_preview() {
    let graph = GraphBuilder::new(&NamingConfig::default())
        .build(&load_blog())
        .unwrap();
    let text = modelgraph::to_text(&graph);

    let edges: Vec<&str> = text.lines().rev().take(4).collect();
    assert_eq!(
        edges,
        vec![
            "Comment ──m:1──▶ Post",
            "Post ──1:m──▶ Comment",
            "Post ──m:1──▶ User",
            "User ──1:m──▶ Post",
        ]
    );
    assert!(text.contains("│ user: User"));
}
