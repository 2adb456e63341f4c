//! 配置加载器实现
//!
//! 提供TOML配置文件解析与错误处理功能

use crate::config::types::{validate_config, WorkerConfig};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<WorkerConfig>` - 加载的配置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<WorkerConfig>;

    /// 从字符串加载配置
    ///
    /// # 参数
    /// * `content` - 配置文件内容
    ///
    /// # 返回
    /// * `Result<WorkerConfig>` - 加载的配置或错误
    async fn load_from_string(&self, content: &str) -> Result<WorkerConfig>;
}

/// TOML配置加载器实现
#[derive(Debug, Clone, Default)]
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    /// 创建新的TOML配置加载器
    pub fn new() -> Self {
        Self
    }

    /// 解析TOML内容并验证
    fn parse_toml(&self, content: &str) -> Result<WorkerConfig> {
        let config: WorkerConfig = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {e}")))?;

        validate_config(&config).map_err(ConfigError::ValidationError)?;

        Ok(config)
    }
}

#[async_trait]
impl ConfigLoader for TomlConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<WorkerConfig> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config = self.parse_toml(&content)?;
        info!("配置加载成功: {}", path.display());
        Ok(config)
    }

    async fn load_from_string(&self, content: &str) -> Result<WorkerConfig> {
        self.parse_toml(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_load_from_string_with_defaults() {
        let loader = TomlConfigLoader::new();
        let config = loader.load_from_string("").await.unwrap();

        assert_eq!(config.sweep_interval_seconds, 60);
        assert_eq!(config.logs_dir, PathBuf::from(".logs"));
        assert!(config.twilio.is_none());
    }

    #[tokio::test]
    async fn test_load_from_string_full() {
        let content = r#"
            data_dir = "/var/lib/uptime-vitals/data"
            logs_dir = "/var/lib/uptime-vitals/logs"
            sweep_interval_seconds = 30
            log_rotation_interval_hours = 12
            log_level = "debug"
            json_logs = true

            [twilio]
            account_sid = "AC123"
            auth_token = "secret"
            from_phone = "+15005550006"
        "#;

        let loader = TomlConfigLoader::new();
        let config = loader.load_from_string(content).await.unwrap();

        assert_eq!(config.sweep_interval_seconds, 30);
        assert_eq!(config.log_rotation_interval_hours, 12);
        assert!(config.json_logs);
        assert_eq!(config.twilio.unwrap().account_sid, "AC123");
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_config() {
        let loader = TomlConfigLoader::new();
        let result = loader
            .load_from_string("sweep_interval_seconds = 0")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let loader = TomlConfigLoader::new();
        let result = loader.load_from_file("/nonexistent/uptime-vitals.toml").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("uptime-vitals.toml");
        std::fs::write(&path, "sweep_interval_seconds = 15\n").unwrap();

        let loader = TomlConfigLoader::new();
        let config = loader.load_from_file(&path).await.unwrap();
        assert_eq!(config.sweep_interval_seconds, 15);
    }
}
