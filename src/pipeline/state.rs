//! # 状态模型
//!
//! ## 设计思路
//!
//! 每个会话只有一份 `AnalysisState`，每次状态迁移都整体替换，不做字段级原地修改。
//! 迁移逻辑是纯函数 `transition(&state, event) -> state`，可脱离网络单独测试。
//!
//! ## 状态机
//!
//! ```text
//! idle ──ImageSelected──▶ analyzing_image ──DescriptionReady──▶ generating_copy ──CopyReady──▶ complete
//!                               │                                     │
//!                               └──────────────Failed─────────────────┴──────────▶ error
//! ```
//!
//! 任何状态下都可以再次 `ImageSelected`，开始新一轮处理。
//!
//! ## 不变量
//!
//! - `error` 只在 `error` 状态下存在
//! - `final_copy` 只在 `complete` 状态下存在
//! - `image_description` 只在 `generating_copy` / `complete` 状态下存在

use serde::{Deserialize, Serialize};

use crate::error::GENERIC_ERROR_MESSAGE;

/// 流水线状态。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    #[default]
    Idle,
    AnalyzingImage,
    GeneratingCopy,
    Complete,
    Error,
}

impl AnalysisStatus {
    /// 处理中（两个工作状态）。
    pub fn is_busy(self) -> bool {
        matches!(self, Self::AnalyzingImage | Self::GeneratingCopy)
    }

    /// 进度指示文案，`idle` 时没有。
    pub fn progress_label(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::AnalyzingImage => Some("Fase 1: Analisis Visual"),
            Self::GeneratingCopy => Some("Fase 2: Penulisan Kreatif"),
            Self::Complete => Some("Selesai!"),
            Self::Error => Some("Error"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AnalyzingImage => "analyzing_image",
            Self::GeneratingCopy => "generating_copy",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

/// 会话状态快照。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisState {
    pub status: AnalysisStatus,
    /// 图片 Data URL（用于预览）。
    pub image_source: Option<String>,
    pub image_description: Option<String>,
    /// 文案生成阶段的原始输出。
    pub final_copy: Option<String>,
    pub error: Option<String>,
}

/// 驱动状态迁移的事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// 用户选择了新图片。
    ImageSelected,
    /// 图片已读取为 Data URL。
    ImageLoaded { data_url: String },
    DescriptionReady { description: String },
    CopyReady { raw: String },
    /// 当前阶段失败；`None` 时使用通用兜底文案。
    Failed { message: Option<String> },
}

/// 纯函数状态迁移；当前状态不接受的事件保持原状态不变。
pub fn transition(state: &AnalysisState, event: PipelineEvent) -> AnalysisState {
    match (state.status, event) {
        (_, PipelineEvent::ImageSelected) => AnalysisState {
            status: AnalysisStatus::AnalyzingImage,
            image_source: state.image_source.clone(),
            image_description: None,
            final_copy: None,
            error: None,
        },
        (AnalysisStatus::AnalyzingImage, PipelineEvent::ImageLoaded { data_url }) => AnalysisState {
            image_source: Some(data_url),
            ..state.clone()
        },
        (AnalysisStatus::AnalyzingImage, PipelineEvent::DescriptionReady { description }) => {
            AnalysisState {
                status: AnalysisStatus::GeneratingCopy,
                image_description: Some(description),
                ..state.clone()
            }
        }
        (AnalysisStatus::GeneratingCopy, PipelineEvent::CopyReady { raw }) => AnalysisState {
            status: AnalysisStatus::Complete,
            final_copy: Some(raw),
            ..state.clone()
        },
        (status, PipelineEvent::Failed { message }) if status.is_busy() => AnalysisState {
            status: AnalysisStatus::Error,
            image_source: state.image_source.clone(),
            image_description: None,
            final_copy: None,
            error: Some(
                message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            ),
        },
        _ => state.clone(),
    }
}
