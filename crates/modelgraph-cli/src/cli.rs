//! Command-line interface for the modelgraph utility
//!
//! Loads model definition files, builds the schema graph and writes it as
//! a Graphviz diagram, a text preview or JSON.

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::colorizer::colorize_diagram;
use modelgraph::config::{DiagramConfig, Preset};
use modelgraph::core::logging::init_logging;
use modelgraph::loader::ProjectConfig;
use modelgraph::naming::NamingConfig;
use modelgraph::plugins::{Orchestrator, TextRenderer};
use modelgraph::{NamingConvention, OutputFormat};

/// Modelgraph - Draw ORM model schemas as diagrams
#[derive(Parser)]
#[command(name = "modelgraph")]
#[command(about = "Generate relational and schema diagrams from ORM model definitions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Where to find model files
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectArgs {
    /// Directory to search for model files (repeatable)
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub include: Vec<PathBuf>,

    /// Model file to load, relative to an include directory (repeatable)
    #[arg(short = 'r', long = "require", value_name = "PATH")]
    pub require: Vec<String>,

    /// Glob of model files to load from every include directory (repeatable)
    #[arg(short = 'R', long = "require-all", value_name = "GLOB")]
    pub require_all: Vec<String>,

    /// Manifest group whose directories are added to the includes (repeatable)
    #[arg(long = "bundle", value_name = "GROUP")]
    pub bundle: Vec<String>,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ProjectArgs {
    fn apply(&self, project: &mut ProjectConfig) {
        extend_unique(&mut project.include, &self.include);
        extend_unique(&mut project.require, &self.require);
        extend_unique(&mut project.require_all, &self.require_all);
        extend_unique(&mut project.bundle, &self.bundle);
    }
}

/// How models and columns are named
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingArgs {
    /// Display name for a repository, as NAME=DISPLAY (repeatable)
    #[arg(long = "repository-name", value_name = "NAME=DISPLAY", value_parser = parse_key_value)]
    pub repository_names: Vec<(String, String)>,

    /// Naming convention for models and keys
    #[arg(long, value_enum)]
    pub naming: Option<NamingChoice>,

    /// Show fully qualified model names
    #[arg(long)]
    pub full_names: bool,
}

impl NamingArgs {
    fn apply(&self, naming: &mut NamingConfig) {
        for (name, display) in &self.repository_names {
            naming.repository_names.insert(name.clone(), display.clone());
        }
        if let Some(choice) = self.naming {
            naming.convention = choice.into();
        }
        if self.full_names {
            naming.full_names = true;
        }
    }
}

/// Edge colors and labels
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleArgs {
    /// Edge color override, as KIND=COLOR (repeatable)
    #[arg(long = "color", value_name = "KIND=COLOR")]
    pub colors: Vec<String>,

    /// Edge label override, as KIND=TEXT (repeatable)
    #[arg(long = "label", value_name = "KIND=TEXT")]
    pub labels: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one diagram at PATH.<format>
    Graphviz {
        /// Output path without extension
        path: PathBuf,

        /// Output format
        #[arg(short = 'F', long, value_enum)]
        format: Option<FormatChoice>,

        #[command(flatten)]
        project: ProjectArgs,

        #[command(flatten)]
        naming: NamingArgs,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Generate the relational and schema diagrams into a directory
    Doc {
        /// Default include, require and bundle settings
        #[arg(long, value_enum)]
        preset: Option<PresetChoice>,

        /// Directory for relational_diagram and schema_diagram
        #[arg(long, default_value = "doc")]
        output_dir: PathBuf,

        /// Output format
        #[arg(short = 'F', long, value_enum)]
        format: Option<FormatChoice>,

        #[command(flatten)]
        project: ProjectArgs,

        #[command(flatten)]
        naming: NamingArgs,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Print a text rendering of the graph
    Preview {
        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        ansi: ColorChoice,

        #[command(flatten)]
        project: ProjectArgs,

        #[command(flatten)]
        naming: NamingArgs,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Print the built graph as JSON
    Inspect {
        #[command(flatten)]
        project: ProjectArgs,

        #[command(flatten)]
        naming: NamingArgs,
    },
}

/// Supported output formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatChoice {
    Png,
    Svg,
    Pdf,
    Dot,
    Txt,
}

impl From<FormatChoice> for OutputFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Png => OutputFormat::Png,
            FormatChoice::Svg => OutputFormat::Svg,
            FormatChoice::Pdf => OutputFormat::Pdf,
            FormatChoice::Dot => OutputFormat::Dot,
            FormatChoice::Txt => OutputFormat::Txt,
        }
    }
}

/// Naming conventions
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum NamingChoice {
    /// Class names and relationship names
    #[value(alias = "ruby", alias = "relational")]
    Language,
    /// Table names and key columns
    #[value(alias = "sql", alias = "schema")]
    Storage,
}

impl From<NamingChoice> for NamingConvention {
    fn from(value: NamingChoice) -> Self {
        match value {
            NamingChoice::Language => NamingConvention::Language,
            NamingChoice::Storage => NamingConvention::Storage,
        }
    }
}

/// Project layout presets
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum PresetChoice {
    /// `ext` and `lib`, bundle group `runtime`
    Library,
    /// `app/models/*.model`
    Rails,
    /// `models/*.model`
    Padrino,
}

impl From<PresetChoice> for Preset {
    fn from(value: PresetChoice) -> Self {
        match value {
            PresetChoice::Library => Preset::Library,
            PresetChoice::Rails => Preset::Rails,
            PresetChoice::Padrino => Preset::Padrino,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

fn extend_unique<T: Clone + PartialEq>(target: &mut Vec<T>, values: &[T]) {
    for value in values {
        if !target.contains(value) {
            target.push(value.clone());
        }
    }
}

/// Merge configuration sources
///
/// Starts from the config file (or defaults when none is given). Preset
/// entries are then placed ahead of the file's entries, and flag values are
/// appended last. Naming and style flags override the file's settings.
pub fn diagram_config(
    preset: Option<Preset>,
    project: &ProjectArgs,
    naming: &NamingArgs,
    style: Option<&StyleArgs>,
) -> Result<DiagramConfig> {
    let mut config = match &project.config {
        Some(path) => DiagramConfig::from_file(path)?,
        None => DiagramConfig::default(),
    };

    if let Some(preset) = preset {
        preset.apply(&mut config.project);
    }

    project.apply(&mut config.project);
    naming.apply(&mut config.naming);

    if let Some(style) = style {
        for spec in &style.colors {
            config.styles.add_color(spec)?;
        }
        for spec in &style.labels {
            config.styles.add_label(spec)?;
        }
    }

    debug!(
        includes = config.project.include.len(),
        requires = config.project.require.len(),
        convention = %config.naming.convention,
        "Merged configuration"
    );
    Ok(config)
}

/// Main CLI application
pub struct ModelgraphApp {
    orchestrator: Orchestrator,
}

impl ModelgraphApp {
    /// Create a new application instance with the default renderers
    pub fn new() -> Self {
        Self {
            orchestrator: Orchestrator::with_default_renderers(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("MODELGRAPH_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| cli.log_level.as_str().to_string());

        let log_format_str = std::env::var("MODELGRAPH_LOG_FORMAT")
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level_str), Some(&log_format_str)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Modelgraph v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Graphviz {
                path,
                format,
                project,
                naming,
                style,
            } => {
                let config = diagram_config(None, &project, &naming, Some(&style))?;
                self.graphviz_command(config, path, format, cli.verbose)
            }
            Commands::Doc {
                preset,
                output_dir,
                format,
                project,
                naming,
                style,
            } => {
                let config = diagram_config(preset.map(Into::into), &project, &naming, Some(&style))?;
                self.doc_command(config, &output_dir, format, cli.verbose)
            }
            Commands::Preview {
                ansi,
                project,
                naming,
                style,
            } => {
                let config = diagram_config(None, &project, &naming, Some(&style))?;
                self.preview_command(config, ansi, cli.verbose)
            }
            Commands::Inspect { project, naming } => {
                let config = diagram_config(None, &project, &naming, None)?;
                self.inspect_command(config, cli.verbose)
            }
        }
    }

    /// Handle the graphviz command
    fn graphviz_command(
        &self,
        mut config: DiagramConfig,
        path: PathBuf,
        format: Option<FormatChoice>,
        verbose: bool,
    ) -> Result<()> {
        config.output.file = path;
        if let Some(format) = format {
            config.output.format = format.into();
        }

        let report = self.orchestrator.generate(&config)?;
        self.report(&report, verbose);
        Ok(())
    }

    /// Handle the doc command
    fn doc_command(
        &self,
        mut config: DiagramConfig,
        output_dir: &Path,
        format: Option<FormatChoice>,
        verbose: bool,
    ) -> Result<()> {
        if let Some(format) = format {
            config.output.format = format.into();
        }

        let configs = Orchestrator::paired_configs(&config, output_dir);
        let report = self.orchestrator.generate_all(&configs)?;
        self.report(&report, verbose);
        Ok(())
    }

    /// Handle the preview command
    fn preview_command(&self, config: DiagramConfig, ansi: ColorChoice, verbose: bool) -> Result<()> {
        let styles = config.styles.to_styles()?;
        let loaded = self.orchestrator.load(&config.project);
        if verbose {
            eprintln!("Loaded {} models", loaded.schema.len());
        }

        let graph = self.orchestrator.build(&loaded.schema, &config.naming)?;
        let diagram = TextRenderer::new().render_diagram(&graph, &styles);

        let output = if self.should_colorize(ansi) {
            colorize_diagram(&diagram, &styles)
        } else {
            diagram.to_string()
        };
        self.write_stdout(&output)
    }

    /// Handle the inspect command
    fn inspect_command(&self, config: DiagramConfig, verbose: bool) -> Result<()> {
        let loaded = self.orchestrator.load(&config.project);
        if verbose {
            eprintln!("Loaded {} models", loaded.schema.len());
        }

        let graph = self.orchestrator.build(&loaded.schema, &config.naming)?;
        let json = serde_json::to_string_pretty(&graph)
            .map_err(|e| anyhow!("Failed to serialize graph: {}", e))?;
        self.write_stdout(&json)
    }

    fn report(&self, report: &modelgraph::plugins::RunReport, verbose: bool) {
        if verbose {
            eprintln!(
                "Loaded {} models ({} failed paths)",
                report.model_count, report.load_failures
            );
            for output in &report.outputs {
                eprintln!("Wrote {}", output.display());
            }
        }
    }

    /// Determine if we should colorize the preview
    fn should_colorize(&self, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                crossterm::tty::IsTty::is_tty(&std::io::stdout())
            }
        }
    }

    fn write_stdout(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        if content.is_empty() || content.ends_with('\n') {
            write!(stdout, "{}", content)?;
        } else {
            writeln!(stdout, "{}", content)?;
        }
        stdout.flush()?;
        Ok(())
    }
}

impl Default for ModelgraphApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_cli_parsing_graphviz_command() {
        let cli = parse(&[
            "modelgraph",
            "graphviz",
            "doc/diagram",
            "-I",
            "lib",
            "-r",
            "blog",
            "-R",
            "models/*.model",
            "-F",
            "png",
            "--repository-name",
            "default=blogdb",
            "--naming",
            "sql",
            "--full-names",
            "--color",
            "one_to_many=green",
            "--label",
            "one_to_one=has one",
        ]);

        match cli.command {
            Commands::Graphviz {
                path,
                format,
                project,
                naming,
                style,
            } => {
                assert_eq!(path, PathBuf::from("doc/diagram"));
                assert_eq!(format, Some(FormatChoice::Png));
                assert_eq!(project.include, vec![PathBuf::from("lib")]);
                assert_eq!(project.require, vec!["blog"]);
                assert_eq!(project.require_all, vec!["models/*.model"]);
                assert_eq!(
                    naming.repository_names,
                    vec![("default".to_string(), "blogdb".to_string())]
                );
                assert_eq!(naming.naming, Some(NamingChoice::Storage));
                assert!(naming.full_names);
                assert_eq!(style.colors, vec!["one_to_many=green"]);
                assert_eq!(style.labels, vec!["one_to_one=has one"]);
            }
            _ => panic!("Expected Graphviz command"),
        }
    }

    #[test]
    fn test_cli_parsing_doc_command() {
        let cli = parse(&["modelgraph", "doc", "--preset", "rails"]);

        match cli.command {
            Commands::Doc {
                preset,
                output_dir,
                format,
                ..
            } => {
                assert_eq!(preset, Some(PresetChoice::Rails));
                assert_eq!(output_dir, PathBuf::from("doc"));
                assert!(format.is_none());
            }
            _ => panic!("Expected Doc command"),
        }
    }

    #[test]
    fn test_cli_parsing_preview_command() {
        let cli = parse(&["modelgraph", "preview", "--ansi", "never", "--color", "inheritance=red"]);

        match cli.command {
            Commands::Preview { ansi, style, .. } => {
                assert_eq!(ansi, ColorChoice::Never);
                assert_eq!(style.colors, vec!["inheritance=red"]);
            }
            _ => panic!("Expected Preview command"),
        }
    }

    #[test]
    fn test_cli_global_logging_flags() {
        let cli = parse(&["modelgraph", "inspect", "--log-level", "debug", "--log-format", "json"]);
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Commands::Inspect { .. }));
    }

    #[test]
    fn test_cli_rejects_bad_repository_name() {
        assert!(Cli::try_parse_from(["modelgraph", "inspect", "--repository-name", "blogdb"]).is_err());
        assert!(Cli::try_parse_from(["modelgraph", "graphviz", "out", "-F", "jpeg"]).is_err());
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("default = blogdb").unwrap(),
            ("default".to_string(), "blogdb".to_string())
        );
        assert!(parse_key_value("=blogdb").is_err());
    }

    #[test]
    fn test_config_merge_order() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("modelgraph.json");
        fs::write(
            &config_path,
            r#"{
                "project": { "include": ["vendor"] },
                "naming": { "convention": "storage-style" },
                "styles": { "colors": { "one_to_many": "green" } }
            }"#,
        )
        .unwrap();

        let project = ProjectArgs {
            include: vec![PathBuf::from("src")],
            config: Some(config_path),
            ..Default::default()
        };
        let naming = NamingArgs {
            naming: Some(NamingChoice::Language),
            ..Default::default()
        };
        let style = StyleArgs {
            colors: vec!["one_to_many=purple".to_string()],
            labels: Vec::new(),
        };

        let config = diagram_config(Some(Preset::Library), &project, &naming, Some(&style)).unwrap();
        assert_eq!(
            config.project.include,
            vec![
                PathBuf::from("ext"),
                PathBuf::from("lib"),
                PathBuf::from("vendor"),
                PathBuf::from("src")
            ]
        );
        assert_eq!(config.project.bundle, vec!["runtime"]);
        assert_eq!(config.naming.convention, NamingConvention::Language);
        assert_eq!(config.styles.colors["one_to_many"], "purple");
    }

    #[test]
    fn test_invalid_style_flag_is_an_error() {
        let style = StyleArgs {
            colors: Vec::new(),
            labels: vec!["inheritance=is a".to_string()],
        };
        let result = diagram_config(None, &ProjectArgs::default(), &NamingArgs::default(), Some(&style));
        assert!(result.is_err());
    }

    #[test]
    fn test_graphviz_command_writes_dot() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("blog.model"),
            "model User\n  property id: Serial\nend\n",
        )
        .unwrap();

        let cli = parse(&[
            "modelgraph",
            "graphviz",
            dir.path().join("out/diagram").to_str().unwrap(),
            "-F",
            "dot",
            "-I",
            dir.path().to_str().unwrap(),
            "-r",
            "blog",
        ]);

        let mut app = ModelgraphApp::new();
        app.run(cli).unwrap();

        let dot = fs::read_to_string(dir.path().join("out/diagram.dot")).unwrap();
        assert!(dot.contains("n0 [label=\"{ User | id: Serial }\"];"));
    }
}
