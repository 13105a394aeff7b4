//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `ServiceConfig`，保证运行时行为可观测、可调整、可测试。
//! 包括两个外部 AI 服务的地址与模型、文案生成温度、图片体积上限、
//! 可选的请求超时，以及密钥文件所在目录。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置（Gemini 2.5 Flash + Kolosal GLM 4.6）。
//! - `from_env` 在默认值基础上按环境变量覆盖，解析失败直接报错而不是静默忽略。
//! - `validate` 做范围校验，错误统一为 `AppError::Config`。

use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_VISION_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_VISION_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_COPY_ENDPOINT: &str = "https://api.kolosal.ai/v1/chat/completions";
pub const DEFAULT_COPY_MODEL: &str = "GLM 4.6";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const MIN_IMAGE_BYTES: u64 = 1024;
const MAX_IMAGE_BYTES: u64 = 50 * 1024 * 1024;

/// 视觉描述服务（Gemini）配置。
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Gemini API Key，来自部署环境而非用户输入。
    pub api_key: String,
    /// API 根地址（不含 `/models/...`）。
    pub endpoint: String,
    pub model: String,
}

/// 文案生成服务（Kolosal，OpenAI 兼容接口）配置。
#[derive(Debug, Clone)]
pub struct CopyConfig {
    /// 完整的 chat completions 地址。
    pub endpoint: String,
    pub model: String,
    /// 采样温度（0.0 - 2.0）。
    pub temperature: f32,
}

/// 服务总配置。
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub vision: VisionConfig,
    pub copy: CopyConfig,
    /// 单张图片允许的最大体积（字节）。
    pub max_image_bytes: u64,
    /// 单次 HTTP 请求超时（秒），`None` 表示沿用传输层默认行为。
    pub request_timeout_secs: Option<u64>,
    /// 密钥文件所在目录。
    pub data_dir: PathBuf,
    /// 分享到 Facebook 时附带的页面地址。
    pub page_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            vision: VisionConfig {
                api_key: String::new(),
                endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
                model: DEFAULT_VISION_MODEL.to_string(),
            },
            copy: CopyConfig {
                endpoint: DEFAULT_COPY_ENDPOINT.to_string(),
                model: DEFAULT_COPY_MODEL.to_string(),
                temperature: DEFAULT_TEMPERATURE,
            },
            max_image_bytes: 20 * 1024 * 1024,
            request_timeout_secs: None,
            data_dir: default_data_dir(),
            page_url: "https://kontenkilat.ai/".to_string(),
        }
    }
}

impl ServiceConfig {
    /// 读取进程环境变量构建配置。
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 按给定查找函数覆盖默认配置，便于测试注入。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(key) = get("GEMINI_API_KEY").or_else(|| get("API_KEY")) {
            config.vision.api_key = key;
        }
        if let Some(endpoint) = get("KONTEN_KILAT_VISION_ENDPOINT") {
            config.vision.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(model) = get("KONTEN_KILAT_VISION_MODEL") {
            config.vision.model = model;
        }
        if let Some(endpoint) = get("KONTEN_KILAT_COPY_ENDPOINT") {
            config.copy.endpoint = endpoint;
        }
        if let Some(model) = get("KONTEN_KILAT_COPY_MODEL") {
            config.copy.model = model;
        }
        if let Some(raw) = get("KONTEN_KILAT_TEMPERATURE") {
            config.copy.temperature = raw.trim().parse::<f32>().map_err(|e| {
                AppError::Config(format!("KONTEN_KILAT_TEMPERATURE 无法解析：{}", e))
            })?;
        }
        if let Some(raw) = get("KONTEN_KILAT_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("KONTEN_KILAT_TIMEOUT_SECS 无法解析：{}", e))
            })?;
            config.request_timeout_secs = Some(secs);
        }
        if let Some(dir) = get("KONTEN_KILAT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = get("KONTEN_KILAT_PAGE_URL") {
            config.page_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// 范围校验。
    pub fn validate(&self) -> Result<(), AppError> {
        if self.vision.endpoint.trim().is_empty() || self.copy.endpoint.trim().is_empty() {
            return Err(AppError::Config("服务地址不能为空".to_string()));
        }
        if self.vision.model.trim().is_empty() || self.copy.model.trim().is_empty() {
            return Err(AppError::Config("模型名称不能为空".to_string()));
        }
        if !(0.0..=2.0).contains(&self.copy.temperature) {
            return Err(AppError::Config("temperature 必须在 0.0~2.0 之间".to_string()));
        }
        if let Some(secs) = self.request_timeout_secs {
            if !(1..=600).contains(&secs) {
                return Err(AppError::Config("request_timeout_secs 必须在 1~600 秒之间".to_string()));
            }
        }
        if !(MIN_IMAGE_BYTES..=MAX_IMAGE_BYTES).contains(&self.max_image_bytes) {
            return Err(AppError::Config("max_image_bytes 必须在 1KB~50MB 之间".to_string()));
        }
        Ok(())
    }
}

/// 默认数据目录：用户主目录下的 `.konten-kilat`，取不到主目录时回退到当前目录。
fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".konten-kilat")
}
