pub mod fake_db;
pub mod schema;
