use super::model::Workspace;
use crate::Result;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// 工作区持久化为单个 JSON 文件
///
/// 读取持有共享锁，修改在同一把排他锁内完成 读取-修改-写回，
/// 多个进程同时操作时不会互相覆盖。
pub struct WorkspaceStore {
    file_path: PathBuf,
}

impl WorkspaceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// 文件不存在时返回空工作区
    pub fn load(&self) -> Result<Workspace> {
        if !self.file_path.exists() {
            return Ok(Workspace::default());
        }
        let mut file = File::open(&self.file_path)?;
        file.lock_shared()?;
        read_workspace(&mut file)
    }

    pub fn save(&self, workspace: &Workspace) -> Result<()> {
        self.update(|current| {
            *current = workspace.clone();
            Ok(())
        })
    }

    /// 在排他锁内修改工作区；闭包返回错误时文件保持不变
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Workspace) -> Result<T>,
    {
        self.ensure_dir()?;
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.file_path)?;
        file.lock_exclusive()?;

        let mut workspace = read_workspace(&mut file)?;
        let output = f(&mut workspace)?;

        let json = serde_json::to_vec_pretty(&workspace)?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&json)?;
        file.flush()?;
        Ok(output)
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

fn read_workspace(file: &mut File) -> Result<Workspace> {
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    if content.trim().is_empty() {
        return Ok(Workspace::default());
    }
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CourierError;
    use crate::http::{ApiRequest, HttpMethod};
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = WorkspaceStore::new(dir.path().join("workspace.json"));
        assert!(store.load().unwrap().folders.is_empty());
    }

    #[test]
    fn test_update_persists() {
        let dir = TempDir::new().unwrap();
        let store = WorkspaceStore::new(dir.path().join("nested").join("workspace.json"));

        store
            .update(|ws| {
                ws.create_folder("Users")?;
                ws.add_request("Users", ApiRequest::new("List", HttpMethod::Get, "https://x"))?;
                Ok(())
            })
            .unwrap();

        let loaded = store.load().unwrap();
        let request = loaded.find_request("Users/List").unwrap();
        assert_eq!(request.folder_id, Some(loaded.folders[0].id));
    }

    #[test]
    fn test_failed_update_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let store = WorkspaceStore::new(dir.path().join("workspace.json"));
        store.update(|ws| ws.create_folder("Users").map(|_| ())).unwrap();

        let result = store.update(|ws| {
            ws.delete_folder("Users")?;
            ws.delete_folder("Users").map(|_| ())
        });
        assert!(matches!(result, Err(CourierError::NotFound(_))));
        assert!(store.load().unwrap().find_folder("Users").is_some());
    }

    #[test]
    fn test_save_overwrites_shorter_content() {
        let dir = TempDir::new().unwrap();
        let store = WorkspaceStore::new(dir.path().join("workspace.json"));
        let mut ws = Workspace::default();
        ws.create_folder("A long folder name").unwrap();
        store.save(&ws).unwrap();

        store.save(&Workspace::default()).unwrap();
        assert!(store.load().unwrap().folders.is_empty());
    }
}
