//! 巡检结果日志存储
//!
//! 每个检查项对应一个追加写入的活动日志`<id>.log`，轮转时压缩为
//! 不可变归档`<archive_id>.gz.b64`（gzip后base64编码）并清空活动日志

use crate::error::LogError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// 活动日志文件后缀
const ACTIVE_SUFFIX: &str = ".log";

/// 归档文件后缀
const ARCHIVE_SUFFIX: &str = ".gz.b64";

/// 结果日志存储trait
#[async_trait]
pub trait LogStore: Send + Sync {
    /// 向活动日志追加一行（自动补换行，文件不存在则创建）
    async fn append(&self, log_id: &str, line: &str) -> Result<(), LogError>;

    /// 列出日志标识
    ///
    /// # 参数
    /// * `include_archived` - 是否把归档也计入
    async fn list(&self, include_archived: bool) -> Result<Vec<String>, LogError>;

    /// 把活动日志压缩为指定归档
    async fn compress(&self, log_id: &str, archive_id: &str) -> Result<(), LogError>;

    /// 解压归档，还原原始内容
    async fn decompress(&self, archive_id: &str) -> Result<String, LogError>;

    /// 清空活动日志（保留文件本身，后续追加不受影响）
    async fn truncate(&self, log_id: &str) -> Result<(), LogError>;
}

/// 基于文件的结果日志存储
pub struct FileLogStore {
    /// 日志根目录
    base_dir: PathBuf,
}

impl FileLogStore {
    /// 创建新的文件日志存储
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn active_path(&self, log_id: &str) -> PathBuf {
        self.base_dir.join(format!("{log_id}{ACTIVE_SUFFIX}"))
    }

    fn archive_path(&self, archive_id: &str) -> PathBuf {
        self.base_dir.join(format!("{archive_id}{ARCHIVE_SUFFIX}"))
    }

    /// gzip压缩后base64编码
    fn encode(content: &[u8]) -> Result<String, LogError> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(content)
            .map_err(|e| LogError::Compression(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| LogError::Compression(e.to_string()))?;
        Ok(BASE64.encode(compressed))
    }

    /// base64解码后gzip解压
    fn decode(encoded: &str) -> Result<String, LogError> {
        let compressed = BASE64
            .decode(encoded.trim())
            .map_err(|e| LogError::Compression(e.to_string()))?;
        let mut decoder = GzDecoder::new(compressed.as_slice());
        let mut content = String::new();
        decoder
            .read_to_string(&mut content)
            .map_err(|e| LogError::Compression(e.to_string()))?;
        Ok(content)
    }
}

#[async_trait]
impl LogStore for FileLogStore {
    async fn append(&self, log_id: &str, line: &str) -> Result<(), LogError> {
        fs::create_dir_all(&self.base_dir).await?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.active_path(log_id))
            .await?;
        file.write_all(format!("{line}\n").as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn list(&self, include_archived: bool) -> Result<Vec<String>, LogError> {
        let mut entries = match fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };

            if let Some(id) = name.strip_suffix(ACTIVE_SUFFIX) {
                ids.push(id.to_string());
            } else if include_archived {
                if let Some(id) = name.strip_suffix(ARCHIVE_SUFFIX) {
                    ids.push(id.to_string());
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    async fn compress(&self, log_id: &str, archive_id: &str) -> Result<(), LogError> {
        let content = match fs::read(self.active_path(log_id)).await {
            Ok(content) if !content.is_empty() => content,
            Ok(_) => {
                return Err(LogError::EmptyLog {
                    log_id: log_id.to_string(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LogError::EmptyLog {
                    log_id: log_id.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        // 归档不可变：目标已存在视为失败，绝不覆盖
        let archive_path = self.archive_path(archive_id);
        if fs::try_exists(&archive_path).await? {
            return Err(LogError::ArchiveExists {
                archive_id: archive_id.to_string(),
            });
        }

        let encoded = Self::encode(&content)?;
        fs::write(&archive_path, encoded).await?;
        Ok(())
    }

    async fn decompress(&self, archive_id: &str) -> Result<String, LogError> {
        let encoded = fs::read_to_string(self.archive_path(archive_id)).await?;
        Self::decode(&encoded)
    }

    async fn truncate(&self, log_id: &str) -> Result<(), LogError> {
        // 以截断方式打开，保留文件本身
        fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(self.active_path(log_id))
            .await?;
        Ok(())
    }
}
