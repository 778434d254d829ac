//! Property tests over generated schemas

use modelgraph::classifier::{self, Classification};
use modelgraph::prelude::*;
use proptest::prelude::*;

const PROPERTY_NAMES: &[&str] = &["id", "name", "user_id", "post_id", "tag_id", "title"];
const RELATIONSHIP_NAMES: &[&str] = &["user", "post", "tag", "owner"];

#[derive(Debug, Clone)]
struct GeneratedModel {
    properties: Vec<usize>,
    relationships: Vec<(u8, usize, usize)>,
}

fn model_strategy(model_count: usize) -> impl Strategy<Value = GeneratedModel> {
    (
        prop::collection::vec(0..PROPERTY_NAMES.len(), 0..6),
        prop::collection::vec(
            (0u8..4, 0..RELATIONSHIP_NAMES.len(), 0..model_count),
            0..5,
        ),
    )
        .prop_map(|(properties, relationships)| GeneratedModel {
            properties,
            relationships,
        })
}

fn schema_strategy() -> impl Strategy<Value = Schema> {
    (1usize..6)
        .prop_flat_map(|count| prop::collection::vec(model_strategy(count), count))
        .prop_map(|models| {
            let mut builder = SchemaBuilder::new();
            for (index, model) in models.iter().enumerate() {
                let mut declared = builder.model(&format!("M{}", index));
                for property in &model.properties {
                    declared = declared.property(PROPERTY_NAMES[*property], "String");
                }
                for (kind, name, target) in &model.relationships {
                    let name = RELATIONSHIP_NAMES[*name];
                    let target = format!("M{}", target);
                    declared = match kind {
                        0 => declared.has_many(name, &target),
                        1 => declared.has_one(name, &target),
                        2 => declared.belongs_to(name, &target),
                        _ => declared.has_many_through(name, &target, "owner"),
                    };
                }
            }
            builder.build()
        })
}

proptest! {
    #[test]
    fn own_properties_and_foreign_keys_are_disjoint(schema in schema_strategy()) {
        for model in schema.models() {
            let keys: Vec<&str> = classifier::foreign_keys(model).map(|fk| fk.key).collect();
            for property in classifier::own_properties(model) {
                prop_assert!(!keys.contains(&property.name.as_str()));
            }
        }
    }

    #[test]
    fn classification_is_idempotent(schema in schema_strategy()) {
        for model in schema.models() {
            let first = Classification::of(model);
            let second = Classification::of(model);
            let derived: Vec<_> = classifier::derived_relationships(model).collect();
            let derived_again: Vec<_> = classifier::derived_relationships(model).collect();

            prop_assert_eq!(first.own_properties, second.own_properties);
            prop_assert_eq!(first.foreign_keys, second.foreign_keys);
            prop_assert_eq!(first.relationships, second.relationships);
            prop_assert_eq!(derived, derived_again);
        }
    }

    #[test]
    fn derived_relationships_never_become_edges(schema in schema_strategy()) {
        let graph = GraphBuilder::new(&NamingConfig::default()).build(&schema).unwrap();

        let expected: usize = schema
            .models()
            .iter()
            .map(|model| classifier::graph_relationships(model).count())
            .sum();
        prop_assert_eq!(graph.relationship_edges().count(), expected);

        for edge in graph.relationship_edges() {
            let node = graph.node(edge.from).unwrap();
            let model = schema.model(node.model).unwrap();
            let name = edge.relationship.as_deref().unwrap();
            prop_assert!(model
                .relationships()
                .iter()
                .any(|r| r.name == name && !r.kind.is_derived()));
        }
    }

    #[test]
    fn every_model_gets_exactly_one_node(schema in schema_strategy()) {
        let graph = GraphBuilder::new(&NamingConfig::default()).build(&schema).unwrap();
        prop_assert_eq!(graph.node_count(), schema.len());
        prop_assert_eq!(graph.inheritance_edges().count(), 0);
    }
}
