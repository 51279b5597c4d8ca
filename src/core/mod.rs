//! Core credit-tracking engine
//!
//! Data flows leaves first: [`loader`] builds a [`models::Catalog`],
//! [`classifier`] partitions it for one major, [`selection`] records what the
//! student has completed and [`aggregator`] sums the credits. [`session`] ties
//! the pieces together for the presentation layer.

pub mod aggregator;
pub mod classifier;
pub mod diagnostics;
pub mod loader;
pub mod models;
pub mod report;
pub mod selection;
pub mod session;

pub use aggregator::{summarize, CreditSummary};
pub use classifier::{classify, MajorCurriculum};
pub use diagnostics::{DataSourceError, DiagnosticKind, LoadDiagnostics};
pub use selection::{CrossListPolicy, SelectionState};
pub use session::{Session, SessionError};
