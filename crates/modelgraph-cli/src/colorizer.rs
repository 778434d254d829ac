//! Terminal colorization for text diagram previews
//!
//! Applies ANSI escape codes with crossterm: box outlines in a fixed
//! color, each edge line in the color configured for its kind.

use crossterm::style::{Color, Stylize};
use modelgraph::plugins::TextDiagram;
use modelgraph::EdgeStyles;

/// Map a Graphviz color name or `#rrggbb` value to a terminal color
///
/// Unknown names yield `None` and the line is left uncolored.
pub fn terminal_color(name: &str) -> Option<Color> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex(hex);
    }

    let color = match name.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "darkred" => Color::DarkRed,
        "green" => Color::Green,
        "darkgreen" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "orange" | "darkyellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "darkblue" | "navy" => Color::DarkBlue,
        "magenta" | "purple" => Color::Magenta,
        "darkmagenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "darkcyan" | "teal" => Color::DarkCyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Grey,
        "darkgray" | "darkgrey" => Color::DarkGrey,
        _ => return None,
    };
    Some(color)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Colorize a text diagram using the configured edge colors
pub fn colorize_diagram(diagram: &TextDiagram, styles: &EdgeStyles) -> String {
    let mut result = String::with_capacity(diagram.boxes.len() * 2);

    let lines: Vec<String> = diagram.boxes.lines().map(colorize_box_line).collect();
    result.push_str(&lines.join("\n"));

    if !diagram.edges.is_empty() {
        result.push_str("\n\n");
        let edges: Vec<String> = diagram
            .edges
            .iter()
            .map(|edge| match terminal_color(styles.color(edge.kind)) {
                Some(color) => format!("{}", edge.text.as_str().with(color)),
                None => edge.text.clone(),
            })
            .collect();
        result.push_str(&edges.join("\n"));
    }

    result
}

/// Color box-drawing characters, leave titles and columns alone
fn colorize_box_line(line: &str) -> String {
    let mut result = String::with_capacity(line.len() * 2);
    for c in line.chars() {
        match c {
            '┌' | '┐' | '└' | '┘' | '├' | '┤' | '─' | '│' => {
                result.push_str(&format!("{}", c.to_string().with(Color::DarkGrey)));
            }
            _ => result.push(c),
        }
    }
    result
}
