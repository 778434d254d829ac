//! Box-drawing text renderer
//!
//! Draws one record box per node, then lists the edges one per line:
//!
//! ```text
//! ┌──────────────┐  ┌────────────────┐
//! │     User     │  │      Post      │
//! ├──────────────┤  ├────────────────┤
//! │ id: Serial   │  │ title: String  │
//! └──────────────┘  ├────────────────┤
//!                   │ user: User     │
//!                   └────────────────┘
//!
//! User ──1:m──▶ Post
//! ```

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, span, Level};

use super::layout::{PositionedRecord, RecordLayout};
use crate::core::{EdgeKind, EdgeStyles, OutputFormat, RenderRequest, Renderer, TextCanvas};
use crate::graph::{Edge, Graph};

const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';
const HORIZONTAL: char = '─';
const VERTICAL: char = '│';
const T_LEFT: char = '├';
const T_RIGHT: char = '┤';

/// One rendered edge line with the kind it was drawn for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLine {
    pub kind: EdgeKind,
    pub text: String,
}

/// Text rendering split into the box grid and the edge list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDiagram {
    pub boxes: String,
    pub edges: Vec<EdgeLine>,
}

impl fmt::Display for TextDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.boxes)?;
        if !self.edges.is_empty() {
            write!(f, "\n\n")?;
            let lines: Vec<&str> = self.edges.iter().map(|line| line.text.as_str()).collect();
            write!(f, "{}", lines.join("\n"))?;
        }
        Ok(())
    }
}

/// Renders graphs as box-drawing text
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    layout: RecordLayout,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: RecordLayout) -> Self {
        Self { layout }
    }

    fn draw_section(canvas: &mut TextCanvas, record: &PositionedRecord, y: usize, lines: &[String]) -> usize {
        let (x, w) = (record.x, record.width);
        let mut cy = y;

        canvas.set(x, cy, T_LEFT);
        canvas.draw_horizontal(x + 1, cy, w - 2, HORIZONTAL);
        canvas.set(x + w - 1, cy, T_RIGHT);
        cy += 1;

        for line in lines {
            canvas.set(x, cy, VERTICAL);
            canvas.draw_text(x + 2, cy, line);
            canvas.set(x + w - 1, cy, VERTICAL);
            cy += 1;
        }

        cy
    }

    fn draw_record(canvas: &mut TextCanvas, record: &PositionedRecord) {
        let (x, w) = (record.x, record.width);
        let mut cy = record.y;

        canvas.set(x, cy, TOP_LEFT);
        canvas.draw_horizontal(x + 1, cy, w - 2, HORIZONTAL);
        canvas.set(x + w - 1, cy, TOP_RIGHT);
        cy += 1;

        canvas.set(x, cy, VERTICAL);
        canvas.draw_text_centered(x + 1, cy, w - 2, &record.title);
        canvas.set(x + w - 1, cy, VERTICAL);
        cy += 1;

        if !record.properties.is_empty() {
            cy = Self::draw_section(canvas, record, cy, &record.properties);
        }
        if !record.foreign_keys.is_empty() {
            cy = Self::draw_section(canvas, record, cy, &record.foreign_keys);
        }

        canvas.set(x, cy, BOTTOM_LEFT);
        canvas.draw_horizontal(x + 1, cy, w - 2, HORIZONTAL);
        canvas.set(x + w - 1, cy, BOTTOM_RIGHT);
    }

    fn edge_line(graph: &Graph, styles: &EdgeStyles, edge: &Edge) -> Option<EdgeLine> {
        let (from, to) = graph.endpoint_names(edge)?;
        let (middle, arrow) = match (edge.kind, styles.label(edge.kind)) {
            (EdgeKind::Inheritance, _) => ("─────".to_string(), '▷'),
            (_, Some(label)) => (format!("──{}──", label), '▶'),
            (_, None) => ("─────".to_string(), '▶'),
        };

        Some(EdgeLine {
            kind: edge.kind,
            text: format!("{} {}{} {}", from, middle, arrow, to),
        })
    }

    /// Render the graph into boxes and edge lines
    pub fn render_diagram(&self, graph: &Graph, styles: &EdgeStyles) -> TextDiagram {
        let layout = self.layout.layout(graph);

        let mut canvas = TextCanvas::new(layout.width, layout.height);
        for record in &layout.records {
            Self::draw_record(&mut canvas, record);
        }

        let edges = graph
            .edges()
            .iter()
            .filter_map(|edge| Self::edge_line(graph, styles, edge))
            .collect();

        TextDiagram {
            boxes: canvas.to_string(),
            edges,
        }
    }

    pub fn render_to_string(&self, graph: &Graph, styles: &EdgeStyles) -> String {
        self.render_diagram(graph, styles).to_string()
    }
}

impl Renderer for TextRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<PathBuf> {
        let render_span = span!(Level::DEBUG, "render_text", nodes = request.graph.node_count());
        let _enter = render_span.enter();

        let path = request.target.path();
        let mut output = self.render_to_string(request.graph, request.styles);
        output.push('\n');

        request
            .target
            .ensure_parent_dir()
            .with_context(|| format!("creating directory for {}", path.display()))?;
        std::fs::write(&path, output).with_context(|| format!("writing {}", path.display()))?;

        debug!(path = %path.display(), "Text diagram written");
        Ok(path)
    }

    fn name(&self) -> &'static str {
        "text"
    }

    fn supports(&self, format: OutputFormat) -> bool {
        format == OutputFormat::Txt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OutputTarget;
    use crate::graph::GraphBuilder;
    use crate::naming::NamingConfig;
    use crate::schema::Schema;

    fn user_post_graph() -> Graph {
        let mut builder = Schema::builder();
        builder
            .model("User")
            .property("id", "Serial")
            .has_many("posts", "Post");
        builder
            .model("Post")
            .property("title", "String")
            .belongs_to("user", "User");
        builder.model("Admin").superclass("User");
        let schema = builder.build();
        GraphBuilder::new(&NamingConfig::default()).build(&schema).unwrap()
    }

    #[test]
    fn test_boxes() {
        let diagram = TextRenderer::new().render_diagram(&user_post_graph(), &EdgeStyles::default());
        let lines: Vec<&str> = diagram.boxes.lines().collect();

        assert!(lines[0].starts_with("┌──"));
        assert!(lines[1].contains("User"));
        assert!(lines[1].contains("Post"));
        assert!(lines[1].contains("Admin"));
        assert!(diagram.boxes.contains("│ id: Serial"));
        assert!(diagram.boxes.contains("│ user: User"));
    }

    #[test]
    fn test_wide_names_keep_box_aligned() {
        let mut builder = Schema::builder();
        builder.model("用户").property("名前", "String");
        let schema = builder.build();
        let graph = GraphBuilder::new(&NamingConfig::default()).build(&schema).unwrap();

        let diagram = TextRenderer::new().render_diagram(&graph, &EdgeStyles::default());
        let widths: Vec<usize> = diagram
            .boxes
            .lines()
            .map(unicode_width::UnicodeWidthStr::width)
            .collect();

        assert_eq!(widths.len(), 5);
        assert!(widths.iter().all(|&width| width == widths[0]));
        assert!(diagram.boxes.contains("用户"));
        assert!(diagram.boxes.contains("│ 名前: String │"));
    }

    #[test]
    fn test_edge_lines() {
        let diagram = TextRenderer::new().render_diagram(&user_post_graph(), &EdgeStyles::default());
        let texts: Vec<&str> = diagram.edges.iter().map(|line| line.text.as_str()).collect();

        assert_eq!(
            texts,
            vec![
                "User ──1:m──▶ Post",
                "Post ──m:1──▶ User",
                "User ─────▷ Admin",
            ]
        );
        assert_eq!(diagram.edges[2].kind, EdgeKind::Inheritance);
    }

    #[test]
    fn test_unlabeled_relationship() {
        let mut styles = EdgeStyles::default();
        styles.set_label(EdgeKind::OneToMany, "").unwrap();
        let diagram = TextRenderer::new().render_diagram(&user_post_graph(), &styles);
        assert_eq!(diagram.edges[0].text, "User ─────▶ Post");
    }

    #[test]
    fn test_display_joins_sections() {
        let output = TextRenderer::new().render_to_string(&user_post_graph(), &EdgeStyles::default());
        assert!(output.contains("┘\n\nUser ──1:m──▶ Post"));
        assert!(output.ends_with("User ─────▷ Admin"));
    }

    #[test]
    fn test_render_writes_txt() {
        let dir = tempfile::tempdir().unwrap();
        let graph = user_post_graph();
        let styles = EdgeStyles::default();
        let target = OutputTarget::new(dir.path().join("preview"), OutputFormat::Txt);

        let renderer = TextRenderer::new();
        assert!(renderer.supports(OutputFormat::Txt));
        assert!(!renderer.supports(OutputFormat::Png));

        let path = renderer
            .render(&RenderRequest::new(&graph, &styles, &target))
            .unwrap();
        assert_eq!(path, dir.path().join("preview.txt"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("User ──1:m──▶ Post"));
    }
}
