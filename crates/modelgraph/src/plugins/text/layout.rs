//! Grid layout for record boxes
//!
//! Boxes are placed left to right, wrapping after a fixed number per row.

use unicode_width::UnicodeWidthStr;

use crate::graph::{Graph, Node, NodeId};

/// Record box with its position on the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedRecord {
    pub node: NodeId,
    pub title: String,
    pub properties: Vec<String>,
    pub foreign_keys: Vec<String>,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Default)]
pub struct RecordLayoutResult {
    pub records: Vec<PositionedRecord>,
    pub width: usize,
    pub height: usize,
}

/// Grid layout of one box per node
#[derive(Debug, Clone)]
pub struct RecordLayout {
    box_padding: usize,
    box_spacing: usize,
    max_records_per_row: usize,
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self {
            box_padding: 1,
            box_spacing: 2,
            max_records_per_row: 3,
        }
    }
}

impl RecordLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records_per_row(mut self, count: usize) -> Self {
        self.max_records_per_row = count.max(1);
        self
    }

    fn dimensions(&self, node: &Node, properties: &[String], foreign_keys: &[String]) -> (usize, usize) {
        let content_width = properties
            .iter()
            .chain(foreign_keys)
            .map(|line| UnicodeWidthStr::width(line.as_str()))
            .chain(std::iter::once(UnicodeWidthStr::width(node.name.as_str())))
            .max()
            .unwrap_or(0);

        // borders on both sides
        let width = content_width + self.box_padding * 2 + 2;

        // top border, title, bottom border, plus a separated section per list
        let mut height = 3;
        if !properties.is_empty() {
            height += 1 + properties.len();
        }
        if !foreign_keys.is_empty() {
            height += 1 + foreign_keys.len();
        }

        (width, height)
    }

    pub fn layout(&self, graph: &Graph) -> RecordLayoutResult {
        let mut result = RecordLayoutResult::default();
        let mut x = 0;
        let mut y = 0;
        let mut row_height = 0;
        let mut in_row = 0;

        for node in graph.nodes() {
            if in_row >= self.max_records_per_row {
                y += row_height + self.box_spacing;
                x = 0;
                row_height = 0;
                in_row = 0;
            }

            let properties: Vec<String> = node.properties.iter().map(ToString::to_string).collect();
            let foreign_keys: Vec<String> = node.foreign_keys.iter().map(ToString::to_string).collect();
            let (width, height) = self.dimensions(node, &properties, &foreign_keys);

            result.records.push(PositionedRecord {
                node: node.id,
                title: node.name.clone(),
                properties,
                foreign_keys,
                x,
                y,
                width,
                height,
            });

            result.width = result.width.max(x + width);
            x += width + self.box_spacing;
            row_height = row_height.max(height);
            in_row += 1;
        }

        result.height = if result.records.is_empty() { 0 } else { y + row_height };
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::naming::NamingConfig;
    use crate::schema::Schema;

    fn graph_of(count: usize) -> Graph {
        let mut builder = Schema::builder();
        for i in 0..count {
            builder.model(&format!("Model{}", i)).property("id", "Serial");
        }
        let schema = builder.build();
        GraphBuilder::new(&NamingConfig::default()).build(&schema).unwrap()
    }

    #[test]
    fn test_empty_layout() {
        let result = RecordLayout::new().layout(&Graph::new());
        assert!(result.records.is_empty());
        assert_eq!(result.width, 0);
        assert_eq!(result.height, 0);
    }

    #[test]
    fn test_record_dimensions() {
        let mut builder = Schema::builder();
        builder
            .model("Post")
            .property("title", "String")
            .belongs_to("user", "User");
        builder.model("User");
        let schema = builder.build();
        let graph = GraphBuilder::new(&NamingConfig::default()).build(&schema).unwrap();

        let result = RecordLayout::new().layout(&graph);
        let post = &result.records[0];
        assert_eq!(post.properties, vec!["title: String"]);
        assert_eq!(post.foreign_keys, vec!["user: User"]);
        // "title: String" is 13 wide, plus padding and borders
        assert_eq!(post.width, 17);
        assert_eq!(post.height, 7);

        let user = &result.records[1];
        assert_eq!(user.height, 3);
        assert_eq!(user.x, post.width + 2);
    }

    #[test]
    fn test_rows_wrap() {
        let graph = graph_of(4);
        let result = RecordLayout::new().layout(&graph);

        assert_eq!(result.records[3].x, 0);
        assert!(result.records[3].y > 0);
        assert_eq!(result.records[2].y, 0);

        let single = RecordLayout::new().with_records_per_row(1).layout(&graph);
        assert!(single.records.iter().all(|record| record.x == 0));
    }
}
