//! Model definition file parser using chumsky
//!
//! Files are line oriented. Each non-blank line holds one statement:
//!
//! ```text
//! require "blog/user"
//!
//! model Blog::Post < Blog::Entry
//!   storage blog_posts
//!   property title: String
//!   belongs_to user: Blog::User
//!   has_many tags: Blog::Tag, through: taggings
//! end
//! ```
//!
//! `#` starts a comment outside of quoted strings.

use std::path::Path;

use chumsky::prelude::*;

use crate::core::GraphError;
use crate::schema::SchemaBuilder;

/// Association keyword of a relationship statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    BelongsTo,
    HasOne,
    HasMany,
}

/// Parsed model file statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `require "path"`
    Require(String),
    /// `model Name` or `model Name < Parent`
    Model {
        name: String,
        superclass: Option<String>,
    },
    End,
    /// `property name: Type`
    Property { name: String, type_name: String },
    /// `belongs_to|has_one|has_many name: Target[, key: k][, through: r]`
    Relationship {
        association: Association,
        name: String,
        target: String,
        key: Option<String>,
        through: Option<String>,
    },
    Storage(String),
    Repository(String),
    Include(String),
}

impl Statement {
    fn keyword(&self) -> &'static str {
        match self {
            Statement::Require(_) => "require",
            Statement::Model { .. } => "model",
            Statement::End => "end",
            Statement::Property { .. } => "property",
            Statement::Relationship {
                association: Association::BelongsTo,
                ..
            } => "belongs_to",
            Statement::Relationship {
                association: Association::HasOne,
                ..
            } => "has_one",
            Statement::Relationship {
                association: Association::HasMany,
                ..
            } => "has_many",
            Statement::Storage(_) => "storage",
            Statement::Repository(_) => "repository",
            Statement::Include(_) => "include",
        }
    }
}

/// A `model ... end` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDefinition {
    pub name: String,
    pub superclass: Option<String>,
    /// Line of the `model` statement
    pub line: usize,
    pub members: Vec<Statement>,
}

/// Contents of one model file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFile {
    pub requires: Vec<String>,
    pub models: Vec<ModelDefinition>,
}

impl ModelFile {
    /// Register every model block with a schema builder, in file order
    pub fn register(&self, builder: &mut SchemaBuilder) {
        for definition in &self.models {
            let mut model = builder.model(&definition.name);
            if let Some(superclass) = &definition.superclass {
                model = model.superclass(superclass);
            }

            for member in &definition.members {
                model = match member {
                    Statement::Property { name, type_name } => {
                        model.property(name.as_str(), type_name.as_str())
                    }
                    Statement::Relationship {
                        association,
                        name,
                        target,
                        key,
                        through,
                    } => match (association, key, through) {
                        (Association::BelongsTo, Some(key), _) => {
                            model.belongs_to_with_key(name, target, key)
                        }
                        (Association::BelongsTo, None, _) => model.belongs_to(name, target),
                        (Association::HasOne, Some(key), _) => model.has_one_with_key(name, target, key),
                        (Association::HasOne, None, _) => model.has_one(name, target),
                        (Association::HasMany, _, Some(via)) => model.has_many_through(name, target, via),
                        (Association::HasMany, _, None) => model.has_many(name, target),
                    },
                    Statement::Storage(storage) => model.storage(storage),
                    Statement::Repository(repository) => model.repository(repository),
                    Statement::Include(module) => model.include(module),
                    Statement::Require(_) | Statement::Model { .. } | Statement::End => model,
                };
            }
        }
    }
}

/// Model file parser
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelFileParser;

impl ModelFileParser {
    pub fn new() -> Self {
        Self
    }

    /// Spaces and tabs
    fn inline_ws<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, (), extra::Err<Rich<'src, char>>> + Clone {
        one_of(" \t").repeated().ignored()
    }

    fn required_ws<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, (), extra::Err<Rich<'src, char>>> + Clone {
        one_of(" \t").repeated().at_least(1).ignored()
    }

    /// Parse an identifier (property, relationship or option name)
    fn identifier<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone {
        any()
            .filter(|c: &char| c.is_alphanumeric() || *c == '_')
            .repeated()
            .at_least(1)
            .collect::<String>()
    }

    /// Parse a constant path such as `Blog::User` or `::User`
    fn constant_path<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone {
        just("::")
            .or_not()
            .then(
                Self::identifier()
                    .separated_by(just("::"))
                    .at_least(1)
                    .collect::<Vec<String>>(),
            )
            .map(|(root, segments)| {
                let path = segments.join("::");
                match root {
                    Some(_) => format!("::{}", path),
                    None => path,
                }
            })
    }

    /// Parse a quoted string
    fn quoted_string<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone {
        just('"')
            .ignore_then(any().filter(|c| *c != '"').repeated().collect::<String>())
            .then_ignore(just('"'))
    }

    /// `keyword <ws> value`
    fn keyword_value<'src, T>(
        keyword: &'static str,
        value: impl chumsky::Parser<'src, &'src str, T, extra::Err<Rich<'src, char>>> + Clone,
    ) -> impl chumsky::Parser<'src, &'src str, T, extra::Err<Rich<'src, char>>> + Clone {
        just(keyword).ignore_then(Self::required_ws()).ignore_then(value)
    }

    fn model_parser<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, Statement, extra::Err<Rich<'src, char>>> + Clone
    {
        let superclass = Self::inline_ws()
            .ignore_then(just('<'))
            .ignore_then(Self::inline_ws())
            .ignore_then(Self::constant_path());

        Self::keyword_value("model", Self::constant_path())
            .then(superclass.or_not())
            .map(|(name, superclass)| Statement::Model { name, superclass })
    }

    /// `name: Type`
    fn typed_name<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, (String, String), extra::Err<Rich<'src, char>>> + Clone
    {
        Self::identifier()
            .then_ignore(Self::inline_ws())
            .then_ignore(just(':'))
            .then_ignore(Self::inline_ws())
            .then(Self::constant_path())
    }

    fn relationship_parser<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, Statement, extra::Err<Rich<'src, char>>> + Clone
    {
        let association = just("belongs_to")
            .to(Association::BelongsTo)
            .or(just("has_one").to(Association::HasOne))
            .or(just("has_many").to(Association::HasMany));

        let option = just(',')
            .padded_by(Self::inline_ws())
            .ignore_then(Self::identifier())
            .then_ignore(Self::inline_ws())
            .then_ignore(just(':'))
            .then_ignore(Self::inline_ws())
            .then(Self::identifier());

        association
            .then_ignore(Self::required_ws())
            .then(Self::typed_name())
            .then(option.repeated().collect::<Vec<(String, String)>>())
            .try_map(|((association, (name, target)), options), span| {
                let mut key = None;
                let mut through = None;
                for (option, value) in options {
                    match (option.as_str(), association) {
                        ("key", Association::BelongsTo | Association::HasOne) => key = Some(value),
                        ("through", Association::HasMany) => through = Some(value),
                        _ => {
                            return Err(Rich::custom(
                                span,
                                format!("option '{}' is not valid here", option),
                            ))
                        }
                    }
                }

                Ok(Statement::Relationship {
                    association,
                    name,
                    target,
                    key,
                    through,
                })
            })
    }

    /// Parse a single statement
    fn statement_parser<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, Statement, extra::Err<Rich<'src, char>>> + Clone
    {
        let require = Self::keyword_value("require", Self::quoted_string()).map(Statement::Require);
        let property = Self::keyword_value("property", Self::typed_name())
            .map(|(name, type_name)| Statement::Property { name, type_name });
        let storage = Self::keyword_value("storage", Self::identifier()).map(Statement::Storage);
        let repository =
            Self::keyword_value("repository", Self::identifier()).map(Statement::Repository);
        let include = Self::keyword_value("include", Self::constant_path()).map(Statement::Include);
        let end_block = just("end").to(Statement::End);

        require
            .or(Self::model_parser())
            .or(property)
            .or(Self::relationship_parser())
            .or(storage)
            .or(repository)
            .or(include)
            .or(end_block)
    }

    /// Parse one trimmed line, returning the message and byte offset on failure
    fn parse_line(&self, line: &str) -> Result<Statement, (String, usize)> {
        let parser = Self::statement_parser().then_ignore(end());

        parser.parse(line).into_result().map_err(|errors| {
            errors
                .first()
                .map(|error| (error.to_string(), error.span().start))
                .unwrap_or_else(|| ("invalid statement".to_string(), 0))
        })
    }

    /// Parse a single statement, outside of any file
    pub fn parse_statement(&self, input: &str) -> Result<Statement, GraphError> {
        let trimmed = input.trim();
        self.parse_line(trimmed).map_err(|(message, offset)| {
            GraphError::parse_error("<input>", message, 1, column_of(trimmed, 0, offset))
        })
    }

    /// Parse a whole model file
    pub fn parse(&self, file: &Path, input: &str) -> Result<ModelFile, GraphError> {
        let mut result = ModelFile::default();
        let mut current: Option<ModelDefinition> = None;

        for (index, raw) in input.lines().enumerate() {
            let line_number = index + 1;
            let code = strip_comment(raw);
            let trimmed = code.trim();
            if trimmed.is_empty() {
                continue;
            }
            let indent = code.chars().take_while(|c| c.is_whitespace()).count();

            let statement = self.parse_line(trimmed).map_err(|(message, offset)| {
                GraphError::parse_error(file, message, line_number, column_of(trimmed, indent, offset))
            })?;

            match statement {
                Statement::Model { name, superclass } => {
                    if let Some(open) = &current {
                        return Err(GraphError::parse_error(
                            file,
                            format!("model {} is still open, missing 'end'", open.name),
                            line_number,
                            indent + 1,
                        ));
                    }
                    current = Some(ModelDefinition {
                        name,
                        superclass,
                        line: line_number,
                        members: Vec::new(),
                    });
                }
                Statement::End => match current.take() {
                    Some(definition) => result.models.push(definition),
                    None => {
                        return Err(GraphError::parse_error(
                            file,
                            "'end' without an open model".to_string(),
                            line_number,
                            indent + 1,
                        ))
                    }
                },
                Statement::Require(path) => result.requires.push(path),
                member => match current.as_mut() {
                    Some(open) => open.members.push(member),
                    None => {
                        return Err(GraphError::parse_error(
                            file,
                            format!("'{}' outside of a model", member.keyword()),
                            line_number,
                            indent + 1,
                        ))
                    }
                },
            }
        }

        if let Some(open) = current {
            return Err(GraphError::parse_error(
                file,
                format!("model {} is missing 'end'", open.name),
                open.line,
                1,
            ));
        }

        Ok(result)
    }
}

/// Drop a trailing `#` comment that is not inside a quoted string
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (position, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..position],
            _ => {}
        }
    }
    line
}

/// 1-based column of a byte offset inside a trimmed line
fn column_of(trimmed: &str, indent: usize, offset: usize) -> usize {
    let chars = trimmed
        .get(..offset)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(offset);
    indent + chars + 1
}
