//! # 剪贴板写入
//!
//! ## 设计思路
//!
//! 复制与“复制后跳转”的分享动作都需要写系统剪贴板。
//! 通过 `ClipboardSink` 抽象隔离平台差异，测试中可替换为内存实现。
//!
//! ## 实现思路
//!
//! - `SystemClipboard` 每次写入都新建 `arboard::Clipboard`，不长期持有系统句柄。
//! - 写入失败统一转换为 `AppError::Clipboard`，不重试。

use std::sync::Mutex;

use crate::error::AppError;

/// 文本剪贴板写入接口。
pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), AppError>;
}

/// 系统剪贴板（`arboard`）。
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), AppError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| AppError::Clipboard(format!("无法访问剪贴板：{}", e)))?;

        clipboard
            .set_text(text.to_string())
            .map_err(|e| AppError::Clipboard(format!("复制失败：{}", e)))?;

        log::debug!("📋 已写入剪贴板 - {} 字符", text.chars().count());
        Ok(())
    }
}

/// 内存剪贴板，记录最后一次写入内容。
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    last: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_text(&self) -> Option<String> {
        self.last.lock().ok().and_then(|guard| guard.clone())
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<(), AppError> {
        let mut guard = self
            .last
            .lock()
            .map_err(|_| AppError::Clipboard("剪贴板状态锁已中毒".to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}
