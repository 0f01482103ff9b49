//! Import/export service
//!
//! JSON is the lossless exchange format. CSV is an export-only flat view
//! with one row per person; the student/friend structure cannot be rebuilt
//! from it.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::application::{ApplicationError, ApplicationResult, ImportFailure, IoResultExt};
use crate::domain::{validate, Document, ValidationMode};
use crate::infrastructure::traits::{Clock, FileSystem};

/// Default export file name prefix.
pub const DEFAULT_EXPORT_PREFIX: &str = "partyguests";

/// Timestamp layout used in export file names (`yyyy-MM-dd HH:mm:ss`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const CSV_HEADER: &str = "Name,State,Type";

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/plain",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Service for converting the document to and from external files.
pub struct ExchangeService {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    prefix: String,
    mode: ValidationMode,
}

impl ExchangeService {
    /// Create a new exchange service.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
        prefix: impl Into<String>,
        mode: ValidationMode,
    ) -> Self {
        Self {
            fs,
            clock,
            prefix: prefix.into(),
            mode,
        }
    }

    /// Pretty-printed, lossless JSON.
    pub fn to_json(&self, document: &Document) -> ApplicationResult<String> {
        serde_json::to_string_pretty(document).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize document".to_string(),
            source: Box::new(e),
        })
    }

    /// Parse and validate JSON text. `source_name` only labels errors.
    pub fn parse_json(&self, text: &str, source_name: &str) -> ApplicationResult<Document> {
        let import_error = |failure| ApplicationError::ImportParse {
            source_name: source_name.to_string(),
            failure,
        };
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| import_error(ImportFailure::Syntax(e.to_string())))?;
        validate(&value, self.mode).map_err(|e| import_error(ImportFailure::Invalid(e)))
    }

    /// Flat table: each student followed by its friends, then all teachers.
    pub fn to_csv(&self, document: &Document) -> String {
        let mut out = String::new();
        out.push_str(CSV_HEADER);
        out.push('\n');
        for student in &document.students {
            push_row(&mut out, &student.name, student.state.as_str(), "Student");
            let friend_of = format!("Friend of {}", student.name);
            for friend in &student.friends {
                push_row(&mut out, &friend.name, friend.state.as_str(), &friend_of);
            }
        }
        for teacher in &document.teachers {
            push_row(&mut out, &teacher.name, teacher.state.as_str(), "Teacher");
        }
        out
    }

    /// `<prefix>-<yyyy-MM-dd HH:mm:ss>.<ext>`
    pub fn file_name(&self, format: ExportFormat, at: NaiveDateTime) -> String {
        format!(
            "{}-{}.{}",
            self.prefix,
            at.format(TIMESTAMP_FORMAT),
            format.extension()
        )
    }

    /// Render the document in `format`.
    pub fn render(&self, document: &Document, format: ExportFormat) -> ApplicationResult<String> {
        match format {
            ExportFormat::Json => self.to_json(document),
            ExportFormat::Csv => Ok(self.to_csv(document)),
        }
    }

    /// Write an export file into `dir` and return its path.
    pub fn export(
        &self,
        document: &Document,
        format: ExportFormat,
        dir: &Path,
    ) -> ApplicationResult<PathBuf> {
        let content = self.render(document, format)?;
        let target = dir.join(self.file_name(format, self.clock.now()));
        self.fs
            .ensure_parent(&target)
            .with_path_context("create export dir", dir)?;
        self.fs
            .write(&target, &content)
            .with_path_context("write export", &target)?;
        info!(
            "export: {} people as {} ({}) to {}",
            document.headcount(),
            format,
            format.media_type(),
            target.display()
        );
        Ok(target)
    }

    /// Read and validate a user-selected JSON file.
    ///
    /// `None` means nothing was selected. A file that is not UTF-8 text is
    /// an `ImportParse` syntax failure. The caller's document is never
    /// touched here; replacing it is up to the caller.
    pub fn import(&self, file: Option<&Path>) -> ApplicationResult<Document> {
        let file = file.ok_or(ApplicationError::NoFileSelected)?;
        debug!("import: file={}", file.display());
        let source_name = file.display().to_string();
        let text = match self.fs.read_to_string(file) {
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(ApplicationError::ImportParse {
                    source_name,
                    failure: ImportFailure::Syntax(format!("not valid UTF-8: {e}")),
                });
            }
            other => other.with_path_context("read import file", file)?,
        };
        self.parse_json(&text, &source_name)
    }
}

fn push_row(out: &mut String, name: &str, state: &str, kind: &str) {
    out.push_str(&csv_field(name));
    out.push(',');
    out.push_str(state);
    out.push(',');
    out.push_str(&csv_field(kind));
    out.push('\n');
}

/// Quote a field if it contains a delimiter, quote or line break.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_plain_text_when_quoting_then_unchanged() {
        assert_eq!(csv_field("Alice"), "Alice");
    }

    #[test]
    fn given_comma_or_quote_when_quoting_then_wraps_and_doubles() {
        assert_eq!(csv_field("Doe, John"), "\"Doe, John\"");
        assert_eq!(csv_field("The \"Boss\""), "\"The \"\"Boss\"\"\"");
    }

    #[test]
    fn given_formats_when_asking_media_type_then_matches_exports() {
        assert_eq!(ExportFormat::Json.media_type(), "application/json");
        assert_eq!(ExportFormat::Csv.media_type(), "text/plain");
    }
}
