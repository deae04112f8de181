//! Release pipeline
//!
//! ```text
//! graph::resolve ─┐
//!                 ├─> ReleaseOrchestrator ─> Releaser (external) ─> TagCommitter
//! ChangeDetector ─┘
//! ```
//!
//! # Invariants
//!
//! 1. **Dependencies publish first**: packages are released one at a time
//!    in publish order; unchanged packages are skipped.
//! 2. **First failure stops the run**: packages already released stay
//!    released, nothing after the failure is attempted, no tag is created.
//! 3. **One tag per run**: `<root>@<version>-<YYMMDDHHMMSS>`, pushed
//!    atomically with the release commit; a clean tree tags nothing.

pub mod changes;
pub mod orchestrator;
pub mod plan;
pub mod publisher;
pub mod tag;

pub use changes::{ChangeBase, ChangeDetector, ChangeSet};
pub use orchestrator::{ReleaseMode, ReleaseOrchestrator, ReleaseOutcome, ReleaseReport, ReleaseStatus};
pub use plan::ReleasePlan;
pub use publisher::{CommandReleaser, Releaser};
pub use tag::{FinalizeOutcome, TagCommitter, default_commit_message};
