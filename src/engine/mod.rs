//! engine
//!
//! Turns a parsed repository and the CLI flags into API calls and output.
//!
//! # Architecture
//!
//! - [`modes`]: picks check, dry-run or apply from the flags
//! - [`configure`]: sequences fetch, update and verify against a
//!   [`crate::forge::GitHubApi`]
//! - [`runner`]: runs the selected mode and renders the result through an
//!   [`crate::ui::output::OutputSink`]
//!
//! # Invariants
//!
//! - Every API call is sequential; nothing runs in parallel
//! - At most one write per invocation, and only in apply mode
//! - Errors are forwarded unchanged; the engine never softens a failure
//!
//! # Example
//!
//! ```ignore
//! use delete_branch_on_merge::engine::Controller;
//!
//! let controller = Controller::new(&client, &output);
//! controller.run(&repo, false, true, &cancel).await?;
//! ```

pub mod configure;
pub mod modes;
pub mod runner;

pub use configure::Configurator;
pub use modes::Mode;
pub use runner::Controller;
