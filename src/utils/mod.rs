pub mod dry_run;
pub mod error;
pub mod formatting;
pub mod progress;
pub mod summary;
