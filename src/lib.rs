//! # wadjet
//!
//! Access-scoped analytics over collaborative knowledge graphs.
//!
//! Given a requesting identity and a time/scope filter, wadjet resolves the
//! universe of ontology projects, groups, and organizations the requester may
//! see, collects ACL-filtered individual- and comment-events through a
//! read-only [`gateway::RepositoryGateway`], merges partial query rows into
//! canonical records, and assembles four ranked report sections.
//!
//! ## Architecture
//!
//! - **Scope resolver** (`scope`): policy-table authorization narrowing
//! - **Event collector** (`collect`): time-window and ACL row filtering
//! - **Merger** (`merge`): first-non-null-wins canonicalization
//! - **Section builders** (`report`): pure KPI and top-N construction
//! - **Orchestrator** (`dashboard`): sequences the above into a [`report::Report`]
//!
//! ## Library usage
//!
//! ```no_run
//! use wadjet::dashboard::Dashboard;
//! use wadjet::gateway::MemoryGateway;
//! use wadjet::model::{DashboardFilters, ScopeSelection};
//!
//! let store = MemoryGateway::load(std::path::Path::new("store.json")).unwrap();
//! let filters = DashboardFilters {
//!     start: None,
//!     end: None,
//!     scope: ScopeSelection::All,
//! };
//! let report = Dashboard::new(&store).report("alice", &filters).unwrap();
//! println!("{report}");
//! ```

pub mod acl;
pub mod collect;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod merge;
pub mod model;
pub mod report;
pub mod scope;
