pub mod check;
pub mod run;
pub mod status;

// Re-export all command functions
pub use check::cmd_check;
pub use run::{RunOptions, cmd_run};
pub use status::cmd_status;
