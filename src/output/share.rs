//! 社交平台分享目标。
//!
//! 支持直接带文案跳转的平台（X/Twitter、Facebook、LinkedIn）生成分享链接；
//! Instagram 与 TikTok 没有网页分享接口，先把文案写入剪贴板再打开首页。
//! 打开链接由展示层负责。

use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::formatter::append_promotional_suffix;
use crate::error::AppError;

/// 分享平台。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    Twitter,
    Facebook,
    LinkedIn,
    Instagram,
    TikTok,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 5] = [
        Self::Twitter,
        Self::Facebook,
        Self::LinkedIn,
        Self::Instagram,
        Self::TikTok,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::LinkedIn => "linkedin",
            Self::Instagram => "instagram",
            Self::TikTok => "tiktok",
        }
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SharePlatform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twitter" | "x" => Ok(Self::Twitter),
            "facebook" => Ok(Self::Facebook),
            "linkedin" => Ok(Self::LinkedIn),
            "instagram" => Ok(Self::Instagram),
            "tiktok" => Ok(Self::TikTok),
            other => Err(AppError::Config(format!("platform tidak dikenal: {}", other))),
        }
    }
}

/// 分享动作：要打开的地址，以及打开前是否需要先复制文案。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareTarget {
    pub platform: SharePlatform,
    pub url: String,
    /// 需要复制到剪贴板的文本（已追加推广尾注）。
    pub text: String,
    pub copy_first: bool,
}

/// 为指定平台构造分享目标，文案会先追加推广尾注。
pub fn share_target(
    platform: SharePlatform,
    text: &str,
    page_url: &str,
) -> Result<ShareTarget, AppError> {
    let text = append_promotional_suffix(text);

    let (url, copy_first) = match platform {
        SharePlatform::Twitter => (
            with_params("https://twitter.com/intent/tweet", &[("text", text.as_str())])?,
            false,
        ),
        SharePlatform::Facebook => (
            with_params(
                "https://www.facebook.com/sharer/sharer.php",
                &[("u", page_url), ("quote", text.as_str())],
            )?,
            false,
        ),
        SharePlatform::LinkedIn => (
            with_params(
                "https://www.linkedin.com/feed/",
                &[("shareActive", "true"), ("text", text.as_str())],
            )?,
            false,
        ),
        SharePlatform::Instagram => ("https://www.instagram.com/".to_string(), true),
        SharePlatform::TikTok => ("https://www.tiktok.com/".to_string(), true),
    };

    log::debug!("🔗 分享目标 - {} (copy_first={})", platform, copy_first);

    Ok(ShareTarget {
        platform,
        url,
        text,
        copy_first,
    })
}

fn with_params(base: &str, params: &[(&str, &str)]) -> Result<String, AppError> {
    Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| AppError::Config(format!("URL tidak valid: {}", e)))
}
