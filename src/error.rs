//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，承载流水线各阶段（图片读取 / 视觉描述 /
//! 文案生成）以及配置、密钥存储、剪贴板等周边能力的错误。
//!
//! 展示层拿到的永远是 `AppError`（或状态里的错误字符串），
//! 通过 `Serialize` 获得人类可读的错误信息。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为各阶段错误（`ImageError` / `VisionError` / `CopyError`）提供 `From` 转换，无需手动 map。
//! - `code()` / `stage()` 为前端提供稳定的机器可读分支依据。
//! - 实现 `Serialize` 将错误序列化为字符串。

use serde::Serialize;

use crate::clients::{CopyError, VisionError};
use crate::image_source::ImageError;

/// 未携带任何信息的异常所使用的兜底文案。
pub const GENERIC_ERROR_MESSAGE: &str = "Terjadi kesalahan tidak terduga.";

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 未配置 Kolosal API Key，需提示用户先填写
    #[error("Mohon masukkan API Key Kolosal Anda terlebih dahulu di menu pengaturan.")]
    MissingCredential,

    /// 视觉描述阶段失败
    #[error("{0}")]
    Vision(#[from] VisionError),

    /// 文案生成阶段失败
    #[error("{0}")]
    Copy(#[from] CopyError),

    /// 图片读取 / 校验失败
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 配置非法
    #[error("Konfigurasi tidak valid: {0}")]
    Config(String),

    /// 密钥存储不可用
    #[error("Penyimpanan tidak tersedia: {0}")]
    Storage(String),

    /// 文件系统 I/O 错误
    #[error("Kesalahan sistem berkas: {0}")]
    Io(#[from] std::io::Error),

    /// 剪贴板读写操作失败
    #[error("Gagal menyalin ke clipboard: {0}")]
    Clipboard(String),

    /// 未预期的异常
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// 用于兜底的通用错误，空消息会替换为 [`GENERIC_ERROR_MESSAGE`]。
    pub fn generic(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Generic(GENERIC_ERROR_MESSAGE.to_string())
        } else {
            Self::Generic(message)
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "E_MISSING_CREDENTIAL",
            Self::Vision(err) => err.code(),
            Self::Copy(err) => err.code(),
            Self::Image(err) => err.code(),
            Self::Config(_) => "E_CONFIG",
            Self::Storage(_) => "E_STORAGE",
            Self::Io(_) => "E_IO",
            Self::Clipboard(_) => "E_CLIPBOARD",
            Self::Generic(_) => "E_GENERIC",
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::MissingCredential => "credential",
            Self::Vision(err) => err.stage(),
            Self::Copy(err) => err.stage(),
            Self::Image(err) => err.stage(),
            Self::Config(_) => "config",
            Self::Storage(_) | Self::Io(_) => "storage",
            Self::Clipboard(_) => "clipboard",
            Self::Generic(_) => "unknown",
        }
    }
}

/// 展示层只需要人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
