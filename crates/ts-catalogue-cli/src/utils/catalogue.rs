use crate::core::{CliError, MalformedCatalogueError, PlaceholderWarning, find_span, tag_span};
use fs_err as fs;
use miette::{NamedSource, SourceSpan};
use std::path::{Path, PathBuf};
use ts_catalogue_core::{Catalogue, LoadOptions, LocatedIssue, MalformedCatalogue};

/// A catalogue file read from disk, parsed or not.
#[derive(Debug)]
pub struct LoadedCatalogue {
    pub path: PathBuf,
    pub content: String,
    pub result: Result<Catalogue, MalformedCatalogue>,
}

impl LoadedCatalogue {
    pub fn read(path: &Path, options: LoadOptions) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        let result = Catalogue::parse_with(&content, options);
        if let Err(err) = &result {
            tracing::debug!("{} failed to load: {}", path.display(), err);
        }
        Ok(Self {
            path: path.to_path_buf(),
            content,
            result,
        })
    }

    /// The parsed catalogue, or its load failure as a diagnostic.
    pub fn into_catalogue(self) -> Result<Catalogue, CliError> {
        match self.result {
            Ok(catalogue) => Ok(catalogue),
            Err(err) => Err(malformed_diagnostic(&self.path, self.content, &err).into()),
        }
    }

    fn source(&self) -> NamedSource<String> {
        NamedSource::new(self.path.display().to_string(), self.content.clone())
    }

    pub fn placeholder_warning(&self, located: &LocatedIssue<'_>) -> PlaceholderWarning {
        let source = &located.message.source;
        PlaceholderWarning {
            src: self.source(),
            span: find_span(&self.content, source, 0),
            context: located.context.to_string(),
            issue: located.issue.to_string(),
            help: format!("source text: \"{}\"", source),
        }
    }
}

/// Builds the diagnostic for a failed load, locating the problem in the file
/// when possible.
pub fn malformed_diagnostic(
    path: &Path,
    content: String,
    err: &MalformedCatalogue,
) -> MalformedCatalogueError {
    let span = locate(&content, err);
    MalformedCatalogueError {
        src: NamedSource::new(path.display().to_string(), content),
        span,
        message: err.to_string(),
    }
}

fn locate(content: &str, err: &MalformedCatalogue) -> Option<SourceSpan> {
    if let Some(position) = err.position() {
        return usize::try_from(position)
            .ok()
            .and_then(|offset| tag_span(content, offset));
    }

    match err {
        MalformedCatalogue::DuplicateContext { name } => {
            find_span(content, &format!("<name>{}</name>", name), 1)
        },
        MalformedCatalogue::AmbiguousPluralForms { source_text, .. }
        | MalformedCatalogue::MixedPluralForms { source_text, .. } => {
            find_span(content, &format!("<source>{}</source>", source_text), 0)
        },
        MalformedCatalogue::InvalidLanguage { value, .. } => {
            find_span(content, &format!("language=\"{}\"", value), 0)
        },
        _ => None,
    }
}
