pub mod engine;
pub mod index;
pub mod issue;
pub mod report;
pub mod resolver;
pub mod walker;

pub use engine::{ValidateError, ValidateOptions, validate, validate_with};
pub use issue::{Issue, IssueKind};
pub use report::{DocumentReport, Report, SourceMap};
