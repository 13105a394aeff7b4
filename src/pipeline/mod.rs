//! # 流水线模块（pipeline）
//!
//! ## 设计思路
//!
//! - `state`：状态模型与纯函数状态迁移
//! - `orchestrator`：按顺序调用视觉描述与文案生成，维护状态与运行号
//!
//! 调用链：
//!
//! ```text
//! on_image_selected
//!    ↓ 密钥检查（缺失直接返回 MissingCredential）
//!    ↓ ImageSelected（重置状态，运行号 +1）
//!    ├─ image_source::load_image   → ImageLoaded
//!    ├─ VisionService::describe    → DescriptionReady
//!    └─ CopyService::generate      → CopyReady
//!    ↓ 任一阶段失败 → Failed
//! ```

mod orchestrator;
mod state;

pub use orchestrator::Orchestrator;
pub use state::{AnalysisState, AnalysisStatus, PipelineEvent, transition};
