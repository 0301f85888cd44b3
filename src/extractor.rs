//! Spot extraction runs.
//!
//! A run loads the input once, builds the [`ColorantCatalog`], resolves the
//! requested names and then performs one pass per output document:
//!
//! 1. a keep pass per resolved colorant, written to `<stem>.<colorant>.pdf`
//! 2. a remove pass for all resolved colorants, written to
//!    `<stem>.<remaining_suffix>.pdf`
//!
//! Every pass starts from its own copy of the loaded document. Pages whose
//! content cannot be tokenized are left as they are and reported in the
//! [`RunReport`]; only loading the input or saving an output aborts a run.

use crate::catalog::{ColorantCatalog, PageView, Selection};
use crate::config::ExtractorConfig;
use crate::document::{DocumentModel, LopdfDocument};
use crate::error::{Error, Result};
use crate::object::ObjectRef;
use crate::output::{OutputNames, claim_unique};
use crate::rewrite::{RewriteRequest, rewrite_content};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Colorant name written over neutralized Separation arrays.
const NEUTRAL_COLORANT: &str = "None";

/// A page that could not be rewritten in one output.
#[derive(Debug)]
pub struct PageFailure {
    /// Output document the page belongs to
    pub output: PathBuf,
    /// 1-based page number
    pub page_number: usize,
    /// Why the page was left unmodified
    pub error: Error,
}

/// Summary of a finished run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files written, in the order they were produced
    pub outputs: Vec<PathBuf>,
    /// Requested names with no matching colorant
    pub unresolved: Vec<String>,
    /// Pages left unmodified
    pub page_failures: Vec<PageFailure>,
}

impl RunReport {
    /// Whether every name resolved and every page was rewritten.
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.page_failures.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created {} file(s):", self.outputs.len())?;
        for output in &self.outputs {
            writeln!(f, "  {}", output.display())?;
        }
        if !self.unresolved.is_empty() {
            writeln!(f, "Unresolved colorant(s): {}", self.unresolved.join(", "))?;
        }
        if !self.page_failures.is_empty() {
            writeln!(f, "Page(s) left unmodified:")?;
            for failure in &self.page_failures {
                writeln!(
                    f,
                    "  page {} in {}: {}",
                    failure.page_number,
                    failure.output.display(),
                    failure.error
                )?;
            }
        }
        Ok(())
    }
}

/// Runs spot extraction over documents.
#[derive(Debug, Clone, Default)]
pub struct SpotExtractor {
    config: ExtractorConfig,
}

impl SpotExtractor {
    /// Create an extractor with the given configuration.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract `colorants` from the PDF at `input`.
    ///
    /// # Errors
    ///
    /// Fails when the input cannot be loaded or an output cannot be written.
    pub fn run<S: AsRef<str>>(&self, input: &Path, colorants: &[S]) -> Result<RunReport> {
        let names = OutputNames::new(input, self.config.output_dir.as_deref())?;
        log::info!("Loading {}", input.display());
        let doc = LopdfDocument::open(input)?.with_compression(self.config.compress);
        self.run_document(&doc, &names, colorants)
    }

    /// Extract `colorants` from an already loaded document.
    pub fn run_document<D, S>(
        &self,
        doc: &D,
        names: &OutputNames,
        colorants: &[S],
    ) -> Result<RunReport>
    where
        D: DocumentModel + Clone,
        S: AsRef<str>,
    {
        let catalog = ColorantCatalog::build(doc);
        log::info!("Found {} spot colorant(s)", catalog.len());

        let resolution = catalog.resolve(colorants);
        for name in &resolution.unresolved {
            log::warn!("Colorant '{}' not found in document", name);
        }

        let mut report = RunReport {
            unresolved: resolution.unresolved,
            ..RunReport::default()
        };

        // The remaining file keeps its plain name; colorants that collide
        // with it or with each other get numbered.
        let mut taken = HashSet::new();
        let remaining_path = claim_unique(&mut taken, names.remaining(&self.config.remaining_suffix));
        let keep_paths: Vec<PathBuf> = resolution
            .selected
            .iter()
            .map(|s| claim_unique(&mut taken, names.colorant(s.colorant_name())))
            .collect();

        for (selection, path) in resolution.selected.iter().zip(&keep_paths) {
            let request = RewriteRequest::KeepOnly(selection.entries.clone());
            let neutral = self.keep_neutralized(&catalog, selection);
            log::info!("Creating {}", path.display());
            self.run_pass(doc, &catalog, &request, &neutral, path, &mut report)?;
        }

        let removed: Vec<_> = resolution
            .selected
            .iter()
            .flat_map(|s| s.entries.iter().cloned())
            .collect();
        let neutral: Vec<ObjectRef> = if self.config.neutralize_separations {
            removed.iter().map(|e| e.source).collect()
        } else {
            Vec::new()
        };
        log::info!("Creating {}", remaining_path.display());
        self.run_pass(
            doc,
            &catalog,
            &RewriteRequest::RemoveSet(removed),
            &neutral,
            &remaining_path,
            &mut report,
        )?;

        Ok(report)
    }

    /// Separations to neutralize in the keep output for `selection`.
    fn keep_neutralized(&self, catalog: &ColorantCatalog, selection: &Selection) -> Vec<ObjectRef> {
        if !self.config.neutralize_separations {
            return Vec::new();
        }
        catalog
            .entries()
            .iter()
            .filter(|e| !selection.entries.iter().any(|s| s.source == e.source))
            .map(|e| e.source)
            .collect()
    }

    /// Rewrite every page of a copy of `source` and save it to `path`.
    fn run_pass<D: DocumentModel + Clone>(
        &self,
        source: &D,
        catalog: &ColorantCatalog,
        request: &RewriteRequest,
        neutral: &[ObjectRef],
        path: &Path,
        report: &mut RunReport,
    ) -> Result<()> {
        let mut doc = source.clone();
        let empty_view = PageView::default();

        let mut pages = Vec::new();
        for (index, page) in doc.page_ids().into_iter().enumerate() {
            match doc.page_content(page) {
                Ok(content) if content.is_empty() => {
                    log::debug!("Page {} has no content", index + 1);
                },
                Ok(content) => pages.push((index, page, content)),
                Err(error) => record_failure(report, path, index, error),
            }
        }

        let rewrite = |(_, page, content): &(usize, ObjectRef, Vec<u8>)| {
            let view = catalog.page_view(*page).unwrap_or(&empty_view);
            rewrite_content(content, request, view)
        };
        let rewritten: Vec<Result<Vec<u8>>> = if self.config.parallel {
            use rayon::prelude::*;
            pages.par_iter().map(rewrite).collect()
        } else {
            pages.iter().map(rewrite).collect()
        };

        for ((index, page, _), result) in pages.into_iter().zip(rewritten) {
            match result.and_then(|content| doc.set_page_content(page, content)) {
                Ok(()) => log::debug!("Page {} rewritten", index + 1),
                Err(error) => record_failure(report, path, index, error),
            }
        }

        for &reference in neutral {
            if let Err(e) = doc.rename_colorant(reference, NEUTRAL_COLORANT) {
                log::warn!("Could not neutralize {}: {}", reference, e);
            }
        }

        doc.save(path)?;
        report.outputs.push(path.to_path_buf());
        Ok(())
    }
}

fn record_failure(report: &mut RunReport, path: &Path, index: usize, error: Error) {
    log::warn!("Page {} left unmodified in {}: {}", index + 1, path.display(), error);
    report.page_failures.push(PageFailure {
        output: path.to_path_buf(),
        page_number: index + 1,
        error,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display() {
        let report = RunReport {
            outputs: vec![PathBuf::from("a.Gold.pdf"), PathBuf::from("a.remaining.pdf")],
            unresolved: vec!["Silver".to_string()],
            page_failures: vec![PageFailure {
                output: PathBuf::from("a.Gold.pdf"),
                page_number: 3,
                error: Error::ParseError {
                    offset: 7,
                    reason: "unreadable token".to_string(),
                },
            }],
        };

        let text = report.to_string();
        assert!(text.starts_with("Created 2 file(s):\n  a.Gold.pdf\n  a.remaining.pdf\n"));
        assert!(text.contains("Unresolved colorant(s): Silver"));
        assert!(text.contains("page 3 in a.Gold.pdf: Failed to parse content stream at byte 7"));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_clean_report() {
        let report = RunReport {
            outputs: vec![PathBuf::from("a.remaining.pdf")],
            ..RunReport::default()
        };
        assert!(report.is_clean());
        assert_eq!(report.to_string(), "Created 1 file(s):\n  a.remaining.pdf\n");
    }
}
