pub mod types;

pub use types::{Category, DocumentKind, Finding, Severity, SeverityCounts, Status};
