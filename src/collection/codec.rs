use chrono::Utc;
use tracing::{info, warn};

use crate::collection::schema::{ExportContainer, ExportedFolder, FORMAT_VERSION};
use crate::utils::json::sort_keys;
use crate::workspace::Folder;
use crate::{CourierError, Result};

/// 导出文件夹为 JSON（缩进、key 按字典序），包含明文的认证信息
pub fn export_folder(folder: &Folder) -> Result<Vec<u8>> {
    let container = ExportContainer {
        version: FORMAT_VERSION.to_string(),
        export_date: Utc::now(),
        folder: ExportedFolder {
            name: folder.name.clone(),
            requests: folder
                .sorted_requests()
                .into_iter()
                .map(Into::into)
                .collect(),
        },
    };

    let value = serde_json::to_value(&container)
        .map_err(|e| CourierError::ExportEncode(e.to_string()))?;
    let bytes = serde_json::to_vec_pretty(&sort_keys(value))
        .map_err(|e| CourierError::ExportEncode(e.to_string()))?;

    info!(
        "Exported folder '{}' ({} requests)",
        folder.name,
        container.folder.requests.len()
    );
    Ok(bytes)
}

/// 从导出文件创建新的文件夹
///
/// 文件夹和请求都使用新的 id；请求的排序号按数组位置重新分配，
/// 文件夹的排序号为 `existing_folder_count`
pub fn import_folder(bytes: &[u8], existing_folder_count: usize) -> Result<Folder> {
    let container: ExportContainer =
        serde_json::from_slice(bytes).map_err(|e| CourierError::ImportDecode(e.to_string()))?;

    if container.version != FORMAT_VERSION {
        warn!(
            "Importing collection with format version {} (expected {})",
            container.version, FORMAT_VERSION
        );
    }

    let mut folder = Folder::new(container.folder.name);
    folder.sort_order = i32::try_from(existing_folder_count).unwrap_or(i32::MAX);
    for (index, exported) in container.folder.requests.into_iter().enumerate() {
        let mut request = exported.into_request(i32::try_from(index).unwrap_or(i32::MAX));
        request.folder_id = Some(folder.id);
        folder.requests.push(request);
    }

    info!(
        "Imported folder '{}' ({} requests)",
        folder.name,
        folder.requests.len()
    );
    Ok(folder)
}
