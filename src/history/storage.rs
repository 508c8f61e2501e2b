use super::model::HistoryEntry;
use crate::Result;
use crate::config::HistoryConfig;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const HISTORY_DIR_ENV: &str = "COURIER_HISTORY_DIR";
const DEFAULT_HISTORY_DIR: &str = ".courier";
const HISTORY_FILE: &str = "history.jsonl";
// 超过该大小才检查是否需要压缩
const COMPACTION_THRESHOLD_BYTES: u64 = 20 * 1024 * 1024;
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// JSONL 格式的历史记录文件，每行一个条目
pub struct HistoryStorage {
    file_path: PathBuf,
    max_entries: usize,
    compaction_threshold: u64,
}

impl Default for HistoryStorage {
    fn default() -> Self {
        Self::from_config(&HistoryConfig::default())
    }
}

impl HistoryStorage {
    /// 目录优先取 `COURIER_HISTORY_DIR`，其次是配置文件
    pub fn from_config(config: &HistoryConfig) -> Self {
        let dir = std::env::var(HISTORY_DIR_ENV)
            .ok()
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .or_else(|| config.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_DIR));
        Self::new_with_path(dir.join(HISTORY_FILE)).with_max_entries(config.max_entries)
    }

    pub fn new_with_path(path: PathBuf) -> Self {
        Self {
            file_path: path,
            max_entries: DEFAULT_MAX_ENTRIES,
            compaction_threshold: COMPACTION_THRESHOLD_BYTES,
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn with_compaction_threshold(mut self, bytes: u64) -> Self {
        self.compaction_threshold = bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.file_path
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

    /// 追加一条记录
    ///
    /// 写入期间持有排他锁，多进程并发追加不会产生交错的行。
    pub fn append(&self, entry: &HistoryEntry) -> Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string(entry)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;
        file.lock_exclusive()?;
        writeln!(file, "{}", json)?;
        Ok(())
    }

    /// 全部记录，按时间从旧到新
    ///
    /// 压缩在读取时进行，追加路径保持简单。
    pub fn list(&self) -> Result<Vec<HistoryEntry>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }
        self.compact_if_needed()?;

        let file = File::open(&self.file_path)?;
        file.lock_shared()?;
        Ok(parse_entries(BufReader::new(&file)))
    }

    /// 最近 N 条，顺序同 `list`
    pub fn tail(&self, n: usize) -> Result<Vec<HistoryEntry>> {
        let entries = self.list()?;
        let skip = entries.len().saturating_sub(n);
        Ok(entries.into_iter().skip(skip).collect())
    }

    pub fn clear(&self) -> Result<()> {
        if !self.file_path.exists() {
            return Ok(());
        }
        let file = OpenOptions::new().write(true).open(&self.file_path)?;
        file.lock_exclusive()?;
        file.set_len(0)?;
        Ok(())
    }

    fn compact_if_needed(&self) -> Result<()> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.file_path)?;
        if file.metadata()?.len() < self.compaction_threshold {
            return Ok(());
        }

        file.lock_exclusive()?;
        // 拿到锁之后再检查一次，其他进程可能已经压缩过
        if file.metadata()?.len() < self.compaction_threshold {
            return Ok(());
        }

        let entries = parse_entries(BufReader::new(&file));
        if entries.len() <= self.max_entries {
            return Ok(());
        }
        let dropped = entries.len() - self.max_entries;

        // 截断后在同一个句柄上重写，锁始终有效
        file.set_len(0)?;
        let mut file = file;
        file.seek(SeekFrom::Start(0))?;
        let mut writer = BufWriter::new(file);
        for entry in &entries[dropped..] {
            writeln!(writer, "{}", serde_json::to_string(entry)?)?;
        }
        writer.flush()?;

        debug!("Compacted history: dropped {} oldest entries", dropped);
        Ok(())
    }
}

/// 无法解析的行直接跳过
fn parse_entries(reader: impl BufRead) -> Vec<HistoryEntry> {
    reader
        .lines()
        .map_while(|line| line.ok())
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(&line).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use chrono::Utc;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn entry(url: &str) -> HistoryEntry {
        HistoryEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            url: url.to_string(),
            method: HttpMethod::Get,
            request_headers: Vec::new(),
            request_body: None,
            status_code: Some(200),
            response_headers: Some(Vec::new()),
            response_body: Some("ok".to_string()),
            response_time_ms: Some(1.0),
            response_size_bytes: Some(2),
            was_successful: true,
            saved_request_id: None,
        }
    }

    fn storage(dir: &TempDir) -> HistoryStorage {
        HistoryStorage::new_with_path(dir.path().join("history.jsonl"))
    }

    #[test]
    fn test_append_and_list() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        storage.append(&entry("https://a")).unwrap();
        storage.append(&entry("https://b")).unwrap();

        let list = storage.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].url, "https://a");
        assert_eq!(list[1].url, "https://b");
    }

    #[test]
    fn test_list_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(storage(&dir).list().unwrap().is_empty());
    }

    #[test]
    fn test_tail() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        for i in 0..10 {
            storage.append(&entry(&format!("https://x/{}", i))).unwrap();
        }

        let tail = storage.tail(3).unwrap();
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[0].url, "https://x/7");
        assert_eq!(tail[2].url, "https://x/9");
    }

    #[test]
    fn test_skips_corrupt_lines() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        storage.append(&entry("https://a")).unwrap();
        let mut file = OpenOptions::new().append(true).open(storage.path()).unwrap();
        writeln!(file, "{{not json").unwrap();
        drop(file);
        storage.append(&entry("https://b")).unwrap();

        assert_eq!(storage.list().unwrap().len(), 2);
    }

    #[test]
    fn test_compaction_keeps_newest() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir)
            .with_max_entries(3)
            .with_compaction_threshold(1);
        for i in 0..8 {
            storage.append(&entry(&format!("https://x/{}", i))).unwrap();
        }

        let list = storage.list().unwrap();
        let urls: Vec<_> = list.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x/5", "https://x/6", "https://x/7"]);

        let lines = fs::read_to_string(storage.path()).unwrap().lines().count();
        assert_eq!(lines, 3);
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        storage.clear().unwrap();
        storage.append(&entry("https://a")).unwrap();
        storage.clear().unwrap();
        assert!(storage.list().unwrap().is_empty());
    }
}
