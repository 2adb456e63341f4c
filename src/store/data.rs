//! 键值记录存储
//!
//! 按集合名与记录ID读写JSON记录；巡检只使用read/update/list，
//! create/delete供外部记录管理流程使用

use crate::error::StoreError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 键值记录存储trait
#[async_trait]
pub trait DataStore: Send + Sync {
    /// 创建记录（已存在则失败）
    async fn create(
        &self,
        collection: &str,
        id: &str,
        record: &serde_json::Value,
    ) -> Result<(), StoreError>;

    /// 读取记录
    async fn read(&self, collection: &str, id: &str) -> Result<serde_json::Value, StoreError>;

    /// 更新已存在的记录
    async fn update(
        &self,
        collection: &str,
        id: &str,
        record: &serde_json::Value,
    ) -> Result<(), StoreError>;

    /// 删除记录
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// 列出集合内全部记录ID
    async fn list(&self, collection: &str) -> Result<Vec<String>, StoreError>;
}

/// 基于文件的记录存储
///
/// 每条记录落盘为`<base_dir>/<collection>/<id>.json`
pub struct FileDataStore {
    /// 数据根目录
    base_dir: PathBuf,
}

impl FileDataStore {
    /// 创建新的文件记录存储
    ///
    /// # 参数
    /// * `base_dir` - 数据根目录
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// 拼装记录文件路径
    fn record_path(&self, collection: &str, id: &str) -> PathBuf {
        self.base_dir.join(collection).join(format!("{id}.json"))
    }

    /// 记录不存在时构造NotFound错误
    fn not_found(collection: &str, id: &str) -> StoreError {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl DataStore for FileDataStore {
    async fn create(
        &self,
        collection: &str,
        id: &str,
        record: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let path = self.record_path(collection, id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if fs::try_exists(&path).await? {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        let data = serde_json::to_vec(record)?;
        fs::write(&path, data).await?;
        Ok(())
    }

    async fn read(&self, collection: &str, id: &str) -> Result<serde_json::Value, StoreError> {
        let path = self.record_path(collection, id);
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Self::not_found(collection, id));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&data)?)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        record: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let path = self.record_path(collection, id);
        if !fs::try_exists(&path).await? {
            return Err(Self::not_found(collection, id));
        }

        let data = serde_json::to_vec(record)?;
        fs::write(&path, data).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let path = self.record_path(collection, id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Self::not_found(collection, id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.base_dir.join(collection);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // 集合目录尚未创建等价于空集合
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if let Some(id) = Path::new(&name)
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(".json"))
            {
                ids.push(id.to_string());
            }
        }

        ids.sort();
        Ok(ids)
    }
}
