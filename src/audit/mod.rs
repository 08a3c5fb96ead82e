//! Repository audits: listing, per-repository inspection and reporting.
//!
//! The [`runner::AuditRunner`] walks each listing scope with a
//! [`paginator::RepositoryPaginator`], hands every repository to a
//! [`auditor::RepositoryAuditor`] and writes the output of
//! [`render::render_report`].

pub mod auditor;
pub mod paginator;
pub mod render;
pub mod report;
pub mod runner;
pub mod settings;

pub use auditor::RepositoryAuditor;
pub use paginator::RepositoryPaginator;
pub use render::render_report;
pub use report::{AuditReport, CollaboratorRecord};
pub use runner::{AuditRunner, AuditSummary};
pub use settings::{ApiBackend, AuditSettings};
