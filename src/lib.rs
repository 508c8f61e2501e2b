pub mod collection;
pub mod config;
pub mod error;
pub mod generator;
pub mod history;
pub mod http;
pub mod logger;
pub mod utils;
pub mod workspace;

// Re-export commonly used types
pub use collection::{export_folder, import_folder};
pub use error::{CourierError, Result};
pub use generator::{CodeLanguage, generate_curl, generate_python, generate_swift};
pub use http::{ApiRequest, Client, Response, execute};
pub use utils::{format_json, is_valid_json, minify_json};
pub use workspace::{Folder, Workspace};
