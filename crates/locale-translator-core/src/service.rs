//! Translating localization files into one output file per target language.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use crate::document::{leaf_count, read_document, write_document};
use crate::error::{Error, Result};
use crate::language::Language;
use crate::translator::TranslationEngine;
use crate::util::extension_of;

/// A file written (or reused) for one target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTranslationResult {
    pub file_path: PathBuf,
    pub target_language: Language,
}

/// What happened to one target language of a batch
#[derive(Debug)]
pub struct LanguageOutcome {
    pub target_language: Language,
    pub result: Result<FileTranslationResult>,
}

/// Per-language outcomes of a batch run, in the order languages were attempted
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<LanguageOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &FileTranslationResult> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (Language, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.target_language, e)))
    }

    pub fn into_successes(self) -> Vec<FileTranslationResult> {
        self.outcomes.into_iter().filter_map(|o| o.result.ok()).collect()
    }
}

/// Translates JSON documents with a [`TranslationEngine`]
pub struct DocumentTranslator {
    engine: Arc<dyn TranslationEngine>,
    output_dir: PathBuf,
}

impl DocumentTranslator {
    /// Write translated files into the working directory
    pub fn new(engine: Arc<dyn TranslationEngine>) -> Self {
        Self::with_output_dir(engine, ".")
    }

    pub fn with_output_dir(engine: Arc<dyn TranslationEngine>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            output_dir: output_dir.into(),
        }
    }

    /// Output path for `target`: `{output_dir}/{iso_code}.{extension}`
    pub fn output_path(&self, target: Language, extension: &str) -> PathBuf {
        let file_name = format!("{}.{}", target.iso_code(), extension);
        if self.output_dir == Path::new(".") {
            PathBuf::from(file_name)
        } else {
            self.output_dir.join(file_name)
        }
    }

    /// Translate one file into one language.
    ///
    /// Translating into the source language returns the original path without
    /// touching the engine or the filesystem. Errors are returned as-is.
    pub async fn translate_file(
        &self,
        path: &Path,
        source: Language,
        target: Language,
    ) -> Result<FileTranslationResult> {
        if source == target {
            return Ok(FileTranslationResult {
                file_path: path.to_path_buf(),
                target_language: target,
            });
        }

        let extension = extension_of(path);
        if extension != "json" {
            return Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: extension.to_string(),
            });
        }

        let doc = read_document(path).await?;
        info!(
            "Translating {} ({} strings) from {} to {} with {}",
            path.display(),
            leaf_count(&doc),
            source,
            target,
            self.engine.name()
        );

        let translated = self.engine.translate_document(doc, source, target).await?;

        let output = self.output_path(target, extension);
        write_document(&output, &translated).await?;
        info!("Saved {} for {}", output.display(), target);

        Ok(FileTranslationResult {
            file_path: output,
            target_language: target,
        })
    }

    /// Translate one file into several languages, recording each outcome.
    ///
    /// An empty `targets` means every language except `source`. A failure in
    /// one language is logged and recorded; the remaining languages still run.
    pub async fn translate_file_report(&self, path: &Path, source: Language, targets: &[Language]) -> BatchReport {
        let mut report = BatchReport::default();

        for target in resolve_targets(source, targets) {
            let result = self.translate_file(path, source, target).await;
            if let Err(ref e) = result {
                error!("An error occurred while translating file to {}: {}", target, e);
            }
            report.outcomes.push(LanguageOutcome {
                target_language: target,
                result,
            });
        }

        report
    }

    /// Like [`Self::translate_file_report`], keeping only the languages that succeeded.
    pub async fn translate_file_batch(
        &self,
        path: &Path,
        source: Language,
        targets: &[Language],
    ) -> Vec<FileTranslationResult> {
        self.translate_file_report(path, source, targets)
            .await
            .into_successes()
    }
}

/// Target list for a batch: explicit targets in caller order without
/// duplicates, or every language but the source.
fn resolve_targets(source: Language, targets: &[Language]) -> Vec<Language> {
    if targets.is_empty() {
        return Language::all_except(source);
    }

    let mut resolved = Vec::with_capacity(targets.len());
    for target in targets {
        if !resolved.contains(target) {
            resolved.push(*target);
        }
    }
    resolved
}
