pub mod export;
pub mod sqlite;

pub use export::write_json;
pub use sqlite::{count_rows, load_records, replace_table, DEFAULT_DB_PATH, DEFAULT_TABLE};
