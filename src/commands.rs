//! # 命令层
//!
//! ## 设计思路
//!
//! 命令层只做参数接收与结果返回，不承载业务逻辑。
//! 流水线交给 `Orchestrator`，复制/分享交给 `output`，保持每个处理函数薄、稳定、易测试。
//!
//! 展示层只需要持有一个 `ContentStudio`：
//!
//! ```rust,ignore
//! let studio = ContentStudio::from_config(ServiceConfig::from_env()?)?;
//! studio.save_credential("sk-...")?;
//! let state = studio.on_image_selected(ImageSource::FilePath("produk.jpg".into())).await?;
//! for caption in studio.variations() {
//!     println!("{}", caption);
//! }
//! ```

use serde::Serialize;
use tokio::sync::watch;

use crate::clients::{CopyService, GeminiVisionClient, KolosalCopyClient, VisionService};
use crate::config::ServiceConfig;
use crate::error::AppError;
use crate::image_source::ImageSource;
use crate::key_store::{CredentialStore, FileKeyStore};
use crate::output::{
    ClipboardSink, SharePlatform, ShareTarget, SystemClipboard, append_promotional_suffix,
    share_target,
};
use crate::pipeline::{AnalysisState, Orchestrator};

/// 展示层可直接分支处理的错误结构。
#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
    pub code: &'static str,
    pub stage: &'static str,
    pub message: String,
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        Self {
            code: error.code(),
            stage: error.stage(),
            message: error.to_string(),
        }
    }
}

/// 生产环境使用的组合。
pub type DefaultStudio =
    ContentStudio<GeminiVisionClient, KolosalCopyClient, FileKeyStore, SystemClipboard>;

/// 展示层调用的全部处理函数。
pub struct ContentStudio<V, C, K, B> {
    orchestrator: Orchestrator<V, C, K>,
    clipboard: B,
    page_url: String,
}

impl DefaultStudio {
    /// 按配置组装真实的 Gemini / Kolosal 客户端、文件密钥存储与系统剪贴板。
    pub fn from_config(config: ServiceConfig) -> Result<Self, AppError> {
        config.validate()?;

        let vision = GeminiVisionClient::new(config.vision.clone(), config.request_timeout_secs)?;
        let copy = KolosalCopyClient::new(config.copy.clone(), config.request_timeout_secs)?;
        let credentials = FileKeyStore::open(&config.data_dir)?;

        log::info!(
            "⚙️ 服务已初始化 - vision={} copy={} data_dir={}",
            config.vision.model,
            config.copy.model,
            config.data_dir.display()
        );

        Ok(Self::new(
            Orchestrator::new(vision, copy, credentials, config.max_image_bytes),
            SystemClipboard,
            config.page_url,
        ))
    }
}

impl<V, C, K, B> ContentStudio<V, C, K, B>
where
    V: VisionService,
    C: CopyService,
    K: CredentialStore,
    B: ClipboardSink,
{
    pub fn new(orchestrator: Orchestrator<V, C, K>, clipboard: B, page_url: impl Into<String>) -> Self {
        Self {
            orchestrator,
            clipboard,
            page_url: page_url.into(),
        }
    }

    /// 用户选择了图片；见 [`Orchestrator::on_image_selected`]。
    pub async fn on_image_selected(&self, source: ImageSource) -> Result<AnalysisState, AppError> {
        self.orchestrator.on_image_selected(source).await
    }

    /// 复制单条文案：追加推广尾注后写入剪贴板，返回实际写入的文本。
    pub fn on_copy(&self, text: &str) -> Result<String, AppError> {
        let text = append_promotional_suffix(text);
        self.clipboard.set_text(&text)?;
        log::info!("📋 文案已复制 - {} 字符", text.chars().count());
        Ok(text)
    }

    /// 分享单条文案；需要先复制的平台会在这里写剪贴板，打开链接由展示层完成。
    pub fn on_share(&self, platform: SharePlatform, text: &str) -> Result<ShareTarget, AppError> {
        let target = share_target(platform, text, &self.page_url)?;
        if target.copy_first {
            self.clipboard.set_text(&target.text)?;
        }
        log::info!("📤 分享到 {}", platform);
        Ok(target)
    }

    /// 保存 Kolosal API Key（去除首尾空白）。
    pub fn save_credential(&self, credential: &str) -> Result<(), AppError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(AppError::MissingCredential);
        }
        self.orchestrator.credentials().set(credential)
    }

    pub fn has_credential(&self) -> Result<bool, AppError> {
        Ok(self.orchestrator.credentials().get()?.is_some())
    }

    pub fn snapshot(&self) -> AnalysisState {
        self.orchestrator.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.orchestrator.subscribe()
    }

    /// 当前结果拆分后的文案（展示用，不含尾注）。
    pub fn variations(&self) -> Vec<String> {
        self.orchestrator.variations()
    }
}
