//! # Konten Kilat AI — 库入口
//!
//! 上传一张商品照片，得到三条可直接发布的社交媒体文案。
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  展示层（Web / 桌面前端）                  │
//! │   选择图片 · 进度指示 · 文案卡片 · 复制 / 分享 · 设置      │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ ContentStudio (Result<T, AppError> + watch 状态订阅)
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ commands ─── ContentStudio 处理函数                  │
//! │  │                                                       │
//! │  ├─ pipeline ─── 状态机 + 编排器（运行号丢弃过期结果）   │
//! │  │   ├─ image_source  路径 / 字节 / Data URL → Data URL  │
//! │  │   ├─ clients::vision      Gemini 视觉描述             │
//! │  │   └─ clients::copywriter  Kolosal 文案生成            │
//! │  │                                                       │
//! │  ├─ output ───── 拆分文案 · 推广尾注 · 分享链接 · 剪贴板 │
//! │  ├─ key_store ── Kolosal API Key（settings.json）        │
//! │  ├─ config ───── 端点 / 模型 / 温度 / 超时               │
//! │  └─ error ────── AppError (统一错误类型)                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，所有处理函数的返回类型 |
//! | [`config`] | 服务配置、环境变量覆盖与范围校验 |
//! | [`image_source`] | 图片读取、媒体类型识别、体积限制 |
//! | [`clients`] | Gemini 视觉描述与 Kolosal 文案生成客户端 |
//! | [`pipeline`] | `AnalysisState` 状态机与 `Orchestrator` |
//! | [`output`] | 文案拆分、推广尾注、分享目标、剪贴板 |
//! | [`key_store`] | 密钥存储（文件 / 内存） |
//! | [`commands`] | 展示层调用的 `ContentStudio` |

pub mod clients;
pub mod commands;
pub mod config;
pub mod error;
pub mod image_source;
pub mod key_store;
pub mod output;
pub mod pipeline;

pub use commands::{CommandError, ContentStudio, DefaultStudio};
pub use config::ServiceConfig;
pub use error::AppError;

/// 初始化日志；默认级别 `info`，可通过 `RUST_LOG` 覆盖。重复调用无副作用。
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
