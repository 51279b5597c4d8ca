//! Error taxonomy and data-quality diagnostics for catalog loading
//!
//! Only [`DataSourceError`] is fatal. The recoverable kinds are recorded as
//! [`Diagnostic`] entries while the loader substitutes a documented default.

use crate::{debug, warn};
use std::fmt;
use thiserror::Error;

/// Fatal catalog load failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSourceError {
    /// The backing table could not be fetched
    #[error("Catalog table '{table}' is unavailable: {reason}")]
    SourceUnavailable {
        /// Table (sheet tab) name
        table: String,
        /// Underlying cause
        reason: String,
    },

    /// A required column is absent from a table header
    #[error("Catalog table '{table}' is missing required column '{column}'")]
    MissingColumn {
        /// Table (sheet tab) name
        table: String,
        /// Column name
        column: String,
    },

    /// The table has no header row at all
    #[error("Catalog table '{table}' is empty")]
    EmptyTable {
        /// Table (sheet tab) name
        table: String,
    },
}

/// Kinds of recoverable data-quality findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    /// An optional column is absent; a default was substituted
    SchemaDefault,
    /// A cell failed numeric/categorical parsing; a neutral value was substituted
    ValueCoercion,
    /// A referenced major abbreviation matches no known major
    AffinityResolution,
}

impl DiagnosticKind {
    /// Short label for log lines and summaries
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SchemaDefault => "schema default",
            Self::ValueCoercion => "value coercion",
            Self::AffinityResolution => "affinity resolution",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One recoverable data-quality finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Finding kind
    pub kind: DiagnosticKind,
    /// Table the finding belongs to
    pub table: String,
    /// Human-readable description
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.table, self.message)
    }
}

/// Findings collected during one catalog load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadDiagnostics {
    entries: Vec<Diagnostic>,
}

impl LoadDiagnostics {
    /// Create an empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a finding and log it
    ///
    /// Affinity findings are user-relevant and logged as warnings; the
    /// silent-default kinds only show up at debug level.
    pub fn record(&mut self, kind: DiagnosticKind, table: &str, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            table: table.to_string(),
            message: message.into(),
        };
        match kind {
            DiagnosticKind::AffinityResolution => warn!("{diagnostic}"),
            DiagnosticKind::SchemaDefault | DiagnosticKind::ValueCoercion => {
                debug!("{diagnostic}");
            }
        }
        self.entries.push(diagnostic);
    }

    /// Number of findings of one kind
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Total number of findings
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the load was clean
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate findings in the order they were recorded
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// One-line count summary, e.g. "2 schema default, 5 value coercion, 0 affinity resolution"
    #[must_use]
    pub fn summary_line(&self) -> String {
        [
            DiagnosticKind::SchemaDefault,
            DiagnosticKind::ValueCoercion,
            DiagnosticKind::AffinityResolution,
        ]
        .iter()
        .map(|kind| format!("{} {kind}", self.count(*kind)))
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_count() {
        let mut diagnostics = LoadDiagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.record(DiagnosticKind::ValueCoercion, "Core", "credits 'N/A' for M101");
        diagnostics.record(DiagnosticKind::ValueCoercion, "Core", "term '' for M102");
        diagnostics.record(DiagnosticKind::SchemaDefault, "Core", "no 'group' column");

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.count(DiagnosticKind::ValueCoercion), 2);
        assert_eq!(diagnostics.count(DiagnosticKind::AffinityResolution), 0);
        assert_eq!(
            diagnostics.summary_line(),
            "1 schema default, 2 value coercion, 0 affinity resolution"
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            kind: DiagnosticKind::AffinityResolution,
            table: "Core".to_string(),
            message: "major 'XX' is not defined".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "[affinity resolution] Core: major 'XX' is not defined"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = DataSourceError::MissingColumn {
            table: "Majors".to_string(),
            column: "total_credits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Catalog table 'Majors' is missing required column 'total_credits'"
        );
    }
}
