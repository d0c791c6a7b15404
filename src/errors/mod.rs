//! Error types and error handling for the front end.
//!
//! Two independent tracks:
//!
//! - `errors`: fatal structural errors carrying a source position, returned
//!   through `Result` and unwound with `?`
//! - `diagnostics`: recoverable semantic errors collected in a sink while
//!   parsing continues, plus fatal errors that were caught and recovered from

pub mod diagnostics;
pub mod errors;
