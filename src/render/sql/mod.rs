//! MySQL statement rendering shared by table creation and the migration plan.

pub mod constraint;
pub mod table;

pub use constraint::{render_add_constraint, render_constraint, render_drop_constraint};
pub use table::render_create_table;
