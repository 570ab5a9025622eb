//! Result files consumed by the static viewer.

mod json;

pub use json::{read_result_file, result_file_name, write_result_file, ResultEntry, ResultFile};
