//! # HTTP 公共能力
//!
//! ## 设计思路
//!
//! 两个客户端共用同一套“构建客户端 + 解析失败响应”的逻辑，
//! 保证错误文案的提取优先级一致。
//!
//! ## 错误消息提取优先级
//!
//! 1. JSON `error.message`
//! 2. JSON `message`
//! 3. JSON 但无标准字段：原文（< 200 字符），否则 `Error tidak diketahui (<status>)`
//! 4. 非 JSON：原文截断到 300 字符
//! 5. 响应体为空或不可读：状态码标准描述，再退回 `Status <code>`

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

const RAW_JSON_MESSAGE_MAX_CHARS: usize = 200;
const RAW_TEXT_MESSAGE_MAX_CHARS: usize = 300;

/// 构建 HTTP 客户端；`timeout_secs` 为 `None` 时不额外设置超时。
pub(crate) fn build_http_client(timeout_secs: Option<u64>) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// 从失败响应中提取人类可读的错误信息。
///
/// `body` 为 `None` 表示响应体读取失败。
pub fn extract_error_message(status: StatusCode, body: Option<&str>) -> String {
    let status_fallback = || {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Status {}", status.as_u16()))
    };

    let Some(raw) = body else {
        return status_fallback();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => {
            if let Some(message) = non_empty_str(value.pointer("/error/message")) {
                return message.to_string();
            }
            if let Some(message) = non_empty_str(value.get("message")) {
                return message.to_string();
            }
            if raw.chars().count() < RAW_JSON_MESSAGE_MAX_CHARS {
                raw.to_string()
            } else {
                format!("Error tidak diketahui ({})", status.as_u16())
            }
        }
        Err(_) if !raw.is_empty() => raw.chars().take(RAW_TEXT_MESSAGE_MAX_CHARS).collect(),
        Err(_) => status_fallback(),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// 传输层错误的简短描述。
pub(crate) fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("waktu permintaan habis: {}", err)
    } else if err.is_connect() {
        format!("tidak dapat terhubung: {}", err)
    } else {
        err.to_string()
    }
}
