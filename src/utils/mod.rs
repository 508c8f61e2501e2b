pub mod formatter;
pub mod json;

pub use formatter::{ResponseFormat, ResponseFormatter};
pub use json::{format_json, is_valid_json, minify_json};
