//! CLI error types, rendered by miette with source snippets and help.

// Fields in these structs are read by miette's Diagnostic derive macro
#![allow(unused)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// Error when the i18n.toml configuration file is not found.
#[derive(Debug, Diagnostic, Error)]
#[error("i18n.toml configuration file not found in {}", expected_path.display())]
#[diagnostic(
    code(ts_catalogue::config::not_found),
    help(
        "Pass catalogue files explicitly, or create an i18n.toml with the following content:\n\n  \
          fallback_language = \"en\"\n  \
          assets_dir = \"i18n\"\n"
    )
)]
pub struct ConfigNotFoundError {
    /// The directory where the config was expected.
    pub expected_path: PathBuf,
}

/// Error when parsing the i18n.toml configuration file.
#[derive(Debug, Diagnostic, Error)]
#[error("failed to parse i18n.toml configuration")]
#[diagnostic(code(ts_catalogue::config::parse_error))]
pub struct ConfigParseError {
    #[source_code]
    pub src: NamedSource<String>,

    #[label("error occurred here")]
    pub span: Option<SourceSpan>,

    #[help]
    pub help: String,
}

/// Error when i18n.toml parses but holds invalid values.
#[derive(Debug, Diagnostic, Error)]
#[error("invalid i18n.toml configuration")]
#[diagnostic(code(ts_catalogue::config::invalid))]
pub struct ConfigInvalidError {
    pub path: PathBuf,

    #[help]
    pub help: String,
}

/// Error when the assets directory doesn't exist.
#[derive(Debug, Diagnostic, Error)]
#[error("assets directory not found: {}", path.display())]
#[diagnostic(
    code(ts_catalogue::config::assets_not_found),
    help("Create the assets directory or update assets_dir in i18n.toml")
)]
pub struct AssetsNotFoundError {
    pub path: PathBuf,
}

/// A catalogue that failed to load.
#[derive(Debug, Diagnostic, Error)]
#[error("malformed catalogue: {message}")]
#[diagnostic(code(ts_catalogue::check::malformed), severity(Error))]
pub struct MalformedCatalogueError {
    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,

    pub message: String,
}

/// A translation whose placeholders disagree with its source.
#[derive(Debug, Diagnostic, Error)]
#[error("placeholder mismatch in context '{context}'")]
#[diagnostic(code(ts_catalogue::check::placeholder), severity(Warning))]
pub struct PlaceholderWarning {
    #[source_code]
    pub src: NamedSource<String>,

    #[label("{issue}")]
    pub span: Option<SourceSpan>,

    pub context: String,
    pub issue: String,

    #[help]
    pub help: String,
}

/// Same as [`PlaceholderWarning`], reported under `--strict`.
#[derive(Debug, Diagnostic, Error)]
#[error("placeholder mismatch in context '{context}'")]
#[diagnostic(code(ts_catalogue::check::placeholder), severity(Error))]
pub struct PlaceholderError {
    #[source_code]
    pub src: NamedSource<String>,

    #[label("{issue}")]
    pub span: Option<SourceSpan>,

    pub context: String,
    pub issue: String,

    #[help]
    pub help: String,
}

impl From<PlaceholderWarning> for PlaceholderError {
    fn from(warning: PlaceholderWarning) -> Self {
        Self {
            src: warning.src,
            span: warning.span,
            context: warning.context,
            issue: warning.issue,
            help: warning.help,
        }
    }
}

/// Aggregated validation report containing multiple issues.
#[derive(Debug, Diagnostic, Error)]
#[error("check found {error_count} error(s) and {warning_count} warning(s)")]
#[diagnostic(code(ts_catalogue::check::report))]
pub struct ValidationReport {
    pub error_count: usize,
    pub warning_count: usize,

    #[related]
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Diagnostic, Error)]
pub enum ValidationIssue {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Malformed(#[from] MalformedCatalogueError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    PlaceholderWarning(#[from] PlaceholderWarning),

    #[error(transparent)]
    #[diagnostic(transparent)]
    PlaceholderError(#[from] PlaceholderError),
}

impl ValidationIssue {
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::PlaceholderWarning(_))
    }
}

/// Error when formatting fails for a catalogue file.
#[derive(Debug, Diagnostic, Error)]
#[error("failed to format {}", path.display())]
#[diagnostic(code(ts_catalogue::format::failed))]
pub struct FormatError {
    pub path: PathBuf,

    #[help]
    pub help: String,
}

/// Report for format command results.
#[derive(Debug, Diagnostic, Error)]
#[error("formatted {formatted_count} file(s), {error_count} error(s)")]
#[diagnostic(code(ts_catalogue::format::report))]
pub struct FormatReport {
    pub formatted_count: usize,
    pub error_count: usize,

    #[related]
    pub errors: Vec<FormatError>,
}

/// `format --check` found files that are not normalized.
#[derive(Debug, Diagnostic, Error)]
#[error("{count} file(s) would be reformatted")]
#[diagnostic(
    code(ts_catalogue::format::unformatted),
    help("Run `ts-catalogue format` to rewrite them")
)]
pub struct UnformattedError {
    pub count: usize,
}

#[derive(Debug, Diagnostic, Error)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    ConfigNotFound(#[from] ConfigNotFoundError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ConfigParse(#[from] ConfigParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ConfigInvalid(#[from] ConfigInvalidError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    AssetsNotFound(#[from] AssetsNotFoundError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Malformed(#[from] MalformedCatalogueError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationReport),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Format(#[from] FormatReport),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Unformatted(#[from] UnformattedError),

    #[error("no catalogue files found")]
    #[diagnostic(
        code(ts_catalogue::no_catalogues),
        help("Pass .ts files or directories, or point --config-dir at a crate with i18n.toml")
    )]
    NoCatalogues,

    #[error("IO error: {0}")]
    #[diagnostic(code(ts_catalogue::io))]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(ts_catalogue::other))]
    Other(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Other(format!("{:#}", err))
    }
}

/// Span of the tag starting at `offset`, through its closing `>`.
pub fn tag_span(source: &str, offset: usize) -> Option<SourceSpan> {
    let rest = source.get(offset..)?;
    let start = offset + (rest.len() - rest.trim_start().len());
    let len = source[start..]
        .find('>')
        .map(|end| end + 1)
        .unwrap_or(0);
    Some(SourceSpan::new(start.into(), len))
}

/// Span of the `n`th occurrence of `needle`, counting from zero.
pub fn find_span(source: &str, needle: &str, n: usize) -> Option<SourceSpan> {
    if needle.is_empty() {
        return None;
    }
    source
        .match_indices(needle)
        .nth(n)
        .map(|(offset, matched)| SourceSpan::new(offset.into(), matched.len()))
}
