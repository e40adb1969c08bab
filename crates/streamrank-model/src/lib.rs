pub mod raw_table;
pub mod song_record;

pub use raw_table::*;
pub use song_record::*;
