//! # 外部 AI 服务客户端（clients）
//!
//! ## 设计思路
//!
//! 流水线依赖两个黑盒服务：
//! - 视觉描述（Gemini `generateContent`）：图片 → 客观描述文本
//! - 文案生成（Kolosal，OpenAI 兼容 chat completions）：描述 → 多条营销文案
//!
//! 编排器只依赖 `VisionService` / `CopyService` 两个 trait，
//! 具体 HTTP 实现与测试替身可以自由替换。
//!
//! ## 模块划分
//!
//! - `http`：共享的 HTTP 客户端构建与错误消息提取
//! - `prompts`：固定提示词
//! - `vision`：视觉描述客户端
//! - `copywriter`：文案生成客户端
//!
//! 两个客户端都只请求一次，不重试、不缓存。

mod copywriter;
mod http;
pub mod prompts;
mod vision;

#[cfg(test)]
pub(crate) mod test_server;

pub use copywriter::{CopyError, CopyService, KolosalCopyClient, NO_CONTENT_FALLBACK};
pub use http::extract_error_message;
pub use vision::{GeminiVisionClient, VisionError, VisionService};
