//! # 输出模块
//!
//! ## 设计思路
//!
//! 文案生成阶段返回的是一整段原始文本。输出模块负责把它变成用户能用的东西：
//! 拆分为多条文案、复制或分享前追加推广尾注、构造平台分享链接、写入剪贴板。
//!
//! 展示时不追加尾注，尾注只出现在离开应用的文本里。

mod clipboard;
mod formatter;
mod share;

pub use clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
pub use formatter::{
    PROMOTIONAL_SUFFIX, VARIATION_DELIMITER, append_promotional_suffix, split_variations,
};
pub use share::{SharePlatform, ShareTarget, share_target};
