//! Edge colors and labels keyed by edge kind

use std::collections::BTreeMap;

use super::{EdgeKind, GraphError};

/// Color and label tables handed to renderers
///
/// Every edge kind has a color. Relationship kinds may carry a short label;
/// inheritance edges never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeStyles {
    colors: BTreeMap<EdgeKind, String>,
    labels: BTreeMap<EdgeKind, String>,
}

impl Default for EdgeStyles {
    fn default() -> Self {
        let colors = [
            (EdgeKind::OneToMany, "blue"),
            (EdgeKind::OneToOne, "red"),
            (EdgeKind::ManyToOne, "gray"),
            (EdgeKind::Inheritance, "cyan"),
        ];
        let labels = [
            (EdgeKind::OneToMany, "1:m"),
            (EdgeKind::OneToOne, "1:1"),
            (EdgeKind::ManyToOne, "m:1"),
        ];

        Self {
            colors: colors
                .into_iter()
                .map(|(kind, color)| (kind, color.to_string()))
                .collect(),
            labels: labels
                .into_iter()
                .map(|(kind, label)| (kind, label.to_string()))
                .collect(),
        }
    }
}

impl EdgeStyles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for an edge kind
    pub fn color(&self, kind: EdgeKind) -> &str {
        self.colors.get(&kind).map(String::as_str).unwrap_or("black")
    }

    /// Label for an edge kind, `None` when the kind is unlabeled
    pub fn label(&self, kind: EdgeKind) -> Option<&str> {
        self.labels
            .get(&kind)
            .map(String::as_str)
            .filter(|label| !label.is_empty())
    }

    pub fn set_color(&mut self, kind: EdgeKind, color: impl Into<String>) -> Result<(), GraphError> {
        let color = color.into();
        if color.trim().is_empty() {
            return Err(GraphError::style_error(format!("empty color for {}", kind)));
        }
        self.colors.insert(kind, color);
        Ok(())
    }

    /// Replace the label of a relationship kind; an empty label removes it
    pub fn set_label(&mut self, kind: EdgeKind, label: impl Into<String>) -> Result<(), GraphError> {
        if !kind.is_labelable() {
            return Err(GraphError::style_error(format!(
                "{} edges are unlabeled",
                kind
            )));
        }
        self.labels.insert(kind, label.into());
        Ok(())
    }

    /// Apply a `KIND=COLOR` override
    pub fn apply_color_override(&mut self, spec: &str) -> Result<(), GraphError> {
        let (kind, color) = parse_override(spec)?;
        self.set_color(kind, color)
    }

    /// Apply a `KIND=TEXT` label override
    pub fn apply_label_override(&mut self, spec: &str) -> Result<(), GraphError> {
        let (kind, label) = parse_override(spec)?;
        self.set_label(kind, label)
    }

    /// Build a style table from string-keyed override maps
    pub fn from_overrides<'a>(
        colors: impl IntoIterator<Item = (&'a String, &'a String)>,
        labels: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Result<Self, GraphError> {
        let mut styles = Self::default();
        for (kind, color) in colors {
            styles.set_color(kind.parse()?, color.as_str())?;
        }
        for (kind, label) in labels {
            styles.set_label(kind.parse()?, label.as_str())?;
        }
        Ok(styles)
    }
}

/// Split `one_to_many=green` into its edge kind and value
pub fn parse_override(spec: &str) -> Result<(EdgeKind, String), GraphError> {
    let (kind, value) = spec.split_once('=').ok_or_else(|| {
        GraphError::style_error(format!("expected KIND=VALUE, got '{}'", spec))
    })?;
    Ok((kind.parse()?, value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let styles = EdgeStyles::default();
        assert_eq!(styles.color(EdgeKind::OneToMany), "blue");
        assert_eq!(styles.color(EdgeKind::OneToOne), "red");
        assert_eq!(styles.color(EdgeKind::Inheritance), "cyan");
        assert_eq!(styles.label(EdgeKind::OneToMany), Some("1:m"));
        assert_eq!(styles.label(EdgeKind::OneToOne), Some("1:1"));
        assert_eq!(styles.label(EdgeKind::Inheritance), None);
    }

    #[test]
    fn test_overrides_are_independent() {
        let mut styles = EdgeStyles::default();
        styles.apply_color_override("one_to_many=green").unwrap();
        styles.apply_label_override("one_to_one=has one").unwrap();

        assert_eq!(styles.color(EdgeKind::OneToMany), "green");
        assert_eq!(styles.color(EdgeKind::OneToOne), "red");
        assert_eq!(styles.label(EdgeKind::OneToOne), Some("has one"));
        assert_eq!(styles.label(EdgeKind::OneToMany), Some("1:m"));
    }

    #[test]
    fn test_inheritance_label_rejected() {
        let mut styles = EdgeStyles::default();
        let err = styles.apply_label_override("inheritance=is a").unwrap_err();
        assert!(matches!(err, GraphError::InvalidStyle { .. }));
        assert_eq!(styles.label(EdgeKind::Inheritance), None);
    }

    #[test]
    fn test_empty_label_removes_it() {
        let mut styles = EdgeStyles::default();
        styles.set_label(EdgeKind::ManyToOne, "").unwrap();
        assert_eq!(styles.label(EdgeKind::ManyToOne), None);
    }

    #[test]
    fn test_malformed_overrides() {
        let mut styles = EdgeStyles::default();
        assert!(styles.apply_color_override("one_to_many").is_err());
        assert!(matches!(
            styles.apply_color_override("many_to_many=red"),
            Err(GraphError::InvalidEdgeKind { .. })
        ));
        assert!(styles.apply_color_override("one_to_one=  ").is_err());
    }

    #[test]
    fn test_from_overrides() {
        let colors = BTreeMap::from([("inheritence".to_string(), "black".to_string())]);
        let labels = BTreeMap::from([("one_to_many".to_string(), "has many".to_string())]);
        let styles = EdgeStyles::from_overrides(&colors, &labels).unwrap();
        assert_eq!(styles.color(EdgeKind::Inheritance), "black");
        assert_eq!(styles.label(EdgeKind::OneToMany), Some("has many"));
    }
}
