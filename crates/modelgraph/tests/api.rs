//! Integration tests for the public API

use modelgraph::prelude::*;
use modelgraph::{build_graph, to_dot};

fn blog() -> Schema {
    let mut builder = SchemaBuilder::new();
    builder
        .model("Blog::User")
        .property("id", "Serial")
        .property("name", "String")
        .has_many("posts", "Post");
    builder
        .model("Blog::Post")
        .property("id", "Serial")
        .property("user_id", "Integer")
        .belongs_to("user", "User")
        .has_many("comments", "Comment");
    builder
        .model("Blog::Comment")
        .property("id", "Serial")
        .property("post_id", "Integer")
        .belongs_to("post", "Post");
    builder.build()
}

fn edges(graph: &Graph, kind: EdgeKind) -> Vec<(String, String)> {
    graph
        .edges_of_kind(kind)
        .filter_map(|edge| graph.endpoint_names(edge))
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
}

fn pair(from: &str, to: &str) -> (String, String) {
    (from.to_string(), to.to_string())
}

#[test]
fn test_blog_scenario() {
    let graph = build_graph(&blog(), &NamingConfig::default()).unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(
        edges(&graph, EdgeKind::OneToMany),
        vec![pair("User", "Post"), pair("Post", "Comment")]
    );
    assert_eq!(graph.inheritance_edges().count(), 0);

    let post = graph.node_named("Post").unwrap();
    let lines = post.column_lines();
    assert!(!lines.iter().any(|line| line.starts_with("user_id")));
    assert_eq!(lines.iter().filter(|line| *line == "user: User").count(), 1);
}

#[test]
fn test_full_names() {
    let naming = NamingConfig::new().with_full_names(true);
    let graph = build_graph(&blog(), &naming).unwrap();

    let names: Vec<&str> = graph.nodes().iter().map(|node| node.name.as_str()).collect();
    assert_eq!(names, vec!["Blog::User", "Blog::Post", "Blog::Comment"]);
    assert_eq!(
        graph.node_named("Blog::Post").unwrap().foreign_keys,
        vec![Column::new("user", "Blog::User")]
    );
}

#[test]
fn test_storage_style_with_repository_name() {
    let naming = NamingConfig::new()
        .with_convention(NamingConvention::Storage)
        .with_repository_name("default", "blogdb");
    let graph = build_graph(&blog(), &naming).unwrap();

    let post = graph.node_named("blogdb.blog_posts").unwrap();
    assert_eq!(post.foreign_keys, vec![Column::new("user_id", "blogdb.blog_users")]);
    assert_eq!(
        edges(&graph, EdgeKind::OneToMany)[0],
        pair("blogdb.blog_users", "blogdb.blog_posts")
    );
}

#[test]
fn test_inheritance_scenario() {
    let mut builder = SchemaBuilder::new();
    builder
        .model("User")
        .property("id", "Serial")
        .has_many("posts", "Post");
    builder.model("Post").belongs_to("author", "User");
    builder
        .model("Admin")
        .superclass("User")
        .has_one("badge", "Badge");
    builder.model("Badge");
    let schema = builder.build();

    let graph = build_graph(&schema, &NamingConfig::default()).unwrap();
    assert_eq!(edges(&graph, EdgeKind::Inheritance), vec![pair("User", "Admin")]);
    assert_eq!(edges(&graph, EdgeKind::OneToOne), vec![pair("Admin", "Badge")]);
}

#[test]
fn test_mixin_ancestor_draws_no_edge() {
    let mut builder = SchemaBuilder::new();
    builder.model("User");
    builder
        .model("Admin")
        .superclass("User")
        .include("Auditable");
    let schema = builder.build();

    let graph = build_graph(&schema, &NamingConfig::default()).unwrap();
    assert_eq!(graph.inheritance_edges().count(), 0);
}

#[test]
fn test_through_relationships_are_skipped() {
    let mut builder = SchemaBuilder::new();
    builder
        .model("Post")
        .has_many("taggings", "Tagging")
        .has_many_through("tags", "Tag", "taggings");
    builder.model("Tagging").belongs_to("post", "Post").belongs_to("tag", "Tag");
    builder.model("Tag");
    let schema = builder.build();

    let graph = build_graph(&schema, &NamingConfig::default()).unwrap();
    assert!(graph
        .edges()
        .iter()
        .all(|edge| edge.relationship.as_deref() != Some("tags")));
    assert_eq!(graph.relationship_edges().count(), 3);
}

#[test]
fn test_unresolvable_target() {
    let mut builder = SchemaBuilder::new();
    builder.model("Post").belongs_to("author", "Writer");
    let schema = builder.build();

    let err = build_graph(&schema, &NamingConfig::default()).unwrap_err();
    match &err {
        GraphError::UnresolvableTarget {
            model,
            relationship,
            target,
        } => {
            assert_eq!(model, "Post");
            assert_eq!(relationship, "author");
            assert_eq!(target, "Writer");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.is_configuration());
}

#[test]
fn test_target_outside_build_set() {
    let schema = blog();
    let post = schema.id_of("Blog::Post").unwrap();

    let config = NamingConfig::default();
    let err = GraphBuilder::new(&config)
        .build_models(&schema, &[post])
        .unwrap_err();
    assert!(matches!(err, GraphError::UnresolvableTarget { .. }));
}

#[test]
fn test_dot_uses_default_styles() {
    let graph = build_graph(&blog(), &NamingConfig::default()).unwrap();
    let dot = to_dot(&graph);

    assert!(dot.contains("n0 -> n1 [color=\"blue\", label=\" 1:m\"];"));
    assert!(dot.contains("n1 -> n0 [color=\"gray\", label=\" m:1\"];"));
}

#[test]
fn test_graph_serializes_to_json() {
    let graph = build_graph(&blog(), &NamingConfig::default()).unwrap();
    let json = serde_json::to_value(&graph).unwrap();

    assert_eq!(json["nodes"][0]["name"], "User");
    assert_eq!(json["edges"][0]["kind"], "one_to_many");
    assert_eq!(json["edges"][0]["from"], 0);
}
