//! Support modules for the audit BDD tests.

pub(crate) mod harness;
#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use harness::{
    listed_repository, mount_audit_gates, mount_audit_sections, mount_get, mount_graphql_listing,
    noteworthy_graphql_repository, quiet_graphql_repository,
};
pub(crate) use runtime::SharedRuntime;
pub(crate) use state::{AuditState, AuditTarget, ensure_runtime_and_server, run_audit};
