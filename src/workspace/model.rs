use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::ApiRequest;
use crate::{CourierError, Result};

/// 文件夹独占其中的请求，删除文件夹即删除全部请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub requests: Vec<ApiRequest>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sort_order: 0,
            created_at: now,
            updated_at: now,
            requests: Vec::new(),
        }
    }

    /// 追加请求，维护 folder_id 和排序号
    pub fn push_request(&mut self, mut request: ApiRequest) -> &mut ApiRequest {
        request.folder_id = Some(self.id);
        request.sort_order = self.next_sort_order();
        self.updated_at = Utc::now();
        self.requests.push(request);
        let last = self.requests.len() - 1;
        &mut self.requests[last]
    }

    pub fn next_sort_order(&self) -> i32 {
        self.requests
            .iter()
            .map(|r| r.sort_order + 1)
            .max()
            .unwrap_or(0)
    }

    /// Requests in display order.
    pub fn sorted_requests(&self) -> Vec<&ApiRequest> {
        let mut requests: Vec<&ApiRequest> = self.requests.iter().collect();
        requests.sort_by_key(|r| r.sort_order);
        requests
    }

    pub fn find_request(&self, name: &str) -> Option<&ApiRequest> {
        self.requests.iter().find(|r| r.name == name)
    }

    pub fn find_request_mut(&mut self, name: &str) -> Option<&mut ApiRequest> {
        self.requests.iter_mut().find(|r| r.name == name)
    }

    pub fn remove_request(&mut self, id: Uuid) -> Option<ApiRequest> {
        let index = self.requests.iter().position(|r| r.id == id)?;
        self.updated_at = Utc::now();
        Some(self.requests.remove(index))
    }
}

/// 全部文件夹；请求通过 `文件夹名/请求名` 定位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub folders: Vec<Folder>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_folder(&mut self, name: &str) -> Result<&mut Folder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CourierError::Other("文件夹名不能为空".to_string()));
        }
        if name.contains('/') {
            return Err(CourierError::Other(format!(
                "文件夹名不能包含 '/': {}",
                name
            )));
        }
        if self.find_folder(name).is_some() {
            return Err(CourierError::Other(format!("文件夹已存在: {}", name)));
        }
        let mut folder = Folder::new(name);
        folder.sort_order = self.next_sort_order();
        Ok(self.insert_folder(folder))
    }

    /// 插入已构建好的文件夹（例如导入结果），同名时追加序号
    ///
    /// 名称中的 `/` 会替换为 `-`，否则无法用 `文件夹/请求` 定位。
    pub fn insert_folder(&mut self, mut folder: Folder) -> &mut Folder {
        let name = folder.name.replace('/', "-");
        folder.name = unique_name(&name, |n| self.find_folder(n).is_some());
        for request in &mut folder.requests {
            request.folder_id = Some(folder.id);
        }
        self.folders.push(folder);
        let last = self.folders.len() - 1;
        &mut self.folders[last]
    }

    pub fn add_request(&mut self, folder: &str, request: ApiRequest) -> Result<&ApiRequest> {
        let folder = self.folder_mut(folder)?;
        if folder.find_request(&request.name).is_some() {
            return Err(CourierError::Other(format!(
                "请求已存在: {}/{}",
                folder.name, request.name
            )));
        }
        Ok(&*folder.push_request(request))
    }

    /// 复制请求到同一文件夹，名称为 `<name> Copy`
    pub fn duplicate_request(&mut self, path: &str) -> Result<&ApiRequest> {
        let (folder_name, request_name) = split_path(path)?;
        let folder = self.folder_mut(folder_name)?;
        let source = folder
            .find_request(request_name)
            .ok_or_else(|| CourierError::NotFound(path.to_string()))?;
        let name = unique_name(&format!("{} Copy", source.name), |n| {
            folder.find_request(n).is_some()
        });
        let copy = source.duplicate(name);
        Ok(&*folder.push_request(copy))
    }

    pub fn delete_request(&mut self, path: &str) -> Result<ApiRequest> {
        let (folder_name, request_name) = split_path(path)?;
        let folder = self.folder_mut(folder_name)?;
        let id = folder
            .find_request(request_name)
            .map(|r| r.id)
            .ok_or_else(|| CourierError::NotFound(path.to_string()))?;
        folder
            .remove_request(id)
            .ok_or_else(|| CourierError::NotFound(path.to_string()))
    }

    /// 删除文件夹及其中全部请求
    pub fn delete_folder(&mut self, name: &str) -> Result<Folder> {
        let index = self
            .folders
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| CourierError::NotFound(name.to_string()))?;
        Ok(self.folders.remove(index))
    }

    pub fn find_folder(&self, name: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.name == name)
    }

    pub fn find_request(&self, path: &str) -> Result<&ApiRequest> {
        let (folder_name, request_name) = split_path(path)?;
        self.find_folder(folder_name)
            .and_then(|f| f.find_request(request_name))
            .ok_or_else(|| CourierError::NotFound(path.to_string()))
    }

    /// Folders in display order.
    pub fn sorted_folders(&self) -> Vec<&Folder> {
        let mut folders: Vec<&Folder> = self.folders.iter().collect();
        folders.sort_by_key(|f| f.sort_order);
        folders
    }

    fn next_sort_order(&self) -> i32 {
        self.folders
            .iter()
            .map(|f| f.sort_order + 1)
            .max()
            .unwrap_or(0)
    }

    fn folder_mut(&mut self, name: &str) -> Result<&mut Folder> {
        self.folders
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| CourierError::NotFound(name.to_string()))
    }
}

fn split_path(path: &str) -> Result<(&str, &str)> {
    match path.split_once('/') {
        Some((folder, request)) if !folder.is_empty() && !request.is_empty() => {
            Ok((folder, request))
        }
        _ => Err(CourierError::Other(format!(
            "请求路径格式应为 <文件夹>/<请求>: {}",
            path
        ))),
    }
}

fn unique_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{} {}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}
