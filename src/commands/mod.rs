//! CLI command implementations.

mod compare;
mod models;
mod process;

pub use compare::execute_compare;
pub use models::{validate_process_args, CompareArgs, ProcessArgs};
pub use process::execute_process;
