//! Kolosal API Key 存储模块
//!
//! # 设计思路
//!
//! 文案生成服务需要用户自己的 API Key。密钥只做“是否存在”的判断，
//! 不做格式校验，调用时才读取，保证用户修改后立即生效。
//!
//! # 实现思路
//!
//! - `CredentialStore` 抽象读写接口，编排器只依赖该 trait。
//! - `FileKeyStore` 将密钥写入数据目录下的 `settings.json`，键名固定为 `KOLOSAL_API_KEY`；
//!   文件中的其他字段原样保留。
//! - 设置文件损坏或不可读时按“未配置”处理，不阻断主流程。
//! - 读写均为同步 `std::fs`：文件只有一个小 JSON 对象，每轮处理只读一次，不缓存。
//! - `MemoryKeyStore` 用于测试与临时会话。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::AppError;

/// 设置文件中保存密钥的固定键名。
pub const CREDENTIAL_KEY: &str = "KOLOSAL_API_KEY";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// 密钥读写接口。
pub trait CredentialStore: Send + Sync {
    /// 读取密钥，空字符串视为未配置。
    fn get(&self) -> Result<Option<String>, AppError>;

    fn set(&self, credential: &str) -> Result<(), AppError>;
}

/// 基于 JSON 设置文件的密钥存储。
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    settings_path: PathBuf,
}

impl FileKeyStore {
    /// 在指定数据目录下打开（必要时创建）设置文件所在目录。
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Storage(format!("创建数据目录 '{}' 失败: {}", data_dir.display(), e))
        })?;

        Ok(Self {
            settings_path: data_dir.join(SETTINGS_FILE_NAME),
        })
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn load_settings(&self) -> serde_json::Map<String, serde_json::Value> {
        if !self.settings_path.exists() {
            return serde_json::Map::new();
        }

        let content = match fs::read_to_string(&self.settings_path) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("⚠️ 读取设置文件失败，按未配置处理: {}", err);
                return serde_json::Map::new();
            }
        };

        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                log::warn!("⚠️ 设置文件格式无效，按未配置处理: {}", self.settings_path.display());
                serde_json::Map::new()
            }
        }
    }
}

impl CredentialStore for FileKeyStore {
    fn get(&self) -> Result<Option<String>, AppError> {
        let settings = self.load_settings();
        Ok(settings
            .get(CREDENTIAL_KEY)
            .and_then(|value| value.as_str())
            .filter(|value| !value.is_empty())
            .map(str::to_string))
    }

    fn set(&self, credential: &str) -> Result<(), AppError> {
        let mut settings = self.load_settings();
        settings.insert(
            CREDENTIAL_KEY.to_string(),
            serde_json::Value::String(credential.to_string()),
        );

        let content = serde_json::to_string_pretty(&serde_json::Value::Object(settings))
            .map_err(|e| AppError::Storage(format!("序列化设置失败: {}", e)))?;
        fs::write(&self.settings_path, content)?;

        log::info!("🔑 Kolosal API Key 已保存");
        Ok(())
    }
}

/// 进程内密钥存储。
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    credential: Mutex<Option<String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Mutex::new(Some(credential.into())),
        }
    }
}

impl CredentialStore for MemoryKeyStore {
    fn get(&self) -> Result<Option<String>, AppError> {
        let guard = self
            .credential
            .lock()
            .map_err(|_| AppError::Storage("密钥存储锁已中毒".to_string()))?;
        Ok(guard.clone().filter(|value| !value.is_empty()))
    }

    fn set(&self, credential: &str) -> Result<(), AppError> {
        let mut guard = self
            .credential
            .lock()
            .map_err(|_| AppError::Storage("密钥存储锁已中毒".to_string()))?;
        *guard = Some(credential.to_string());
        Ok(())
    }
}
