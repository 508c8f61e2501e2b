//! 文件夹级别的导入 / 导出（版本化 JSON）

pub mod codec;
pub mod schema;

pub use codec::{export_folder, import_folder};
pub use schema::{ExportContainer, ExportableKeyValue, ExportableRequest, FORMAT_VERSION};
