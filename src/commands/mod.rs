//! CLI commands for release-rail
//!
//! ## Releasing
//! - **run**: Publish changed packages in dependency order, then commit, tag and push
//! - **plan**: Show publish order, layers and changed packages without side effects
//!
//! ## Check-in
//! - **commit**: Commit pending package changes with a release tag
//! - **tag**: Tag unpushed commits and push them
//!
//! ## Registry
//! - **versions**: List published versions of a package
//!
//! Repository commands accept `&ReleaseContext` to avoid redundant loads.

pub mod commit;
pub mod plan;
pub mod run;
pub mod tag;
pub mod versions;

pub use commit::run_commit;
pub use plan::run_plan;
pub use run::run_release;
pub use tag::run_tag;
pub use versions::run_versions;
