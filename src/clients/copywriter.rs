//! # 文案生成客户端
//!
//! ## 设计思路
//!
//! 把视觉描述交给 Kolosal（OpenAI 兼容 chat completions），
//! 返回包含多条文案的原始文本，由输出模块再按分隔符拆分。
//!
//! ## 实现思路
//!
//! - 密钥为空时直接失败，不发出任何请求。
//! - 非 2xx：按 `extract_error_message` 的优先级提取错误信息，错误展示文本即该信息本身。
//! - 2xx：取 `choices[0].message.content`，缺失或为空时返回固定兜底文案（不是错误）。
//! - 单次请求，不重试。

use std::future::Future;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use super::http::{build_http_client, describe_transport_error, extract_error_message};
use super::prompts::{COPY_SYSTEM_PROMPT, copy_user_prompt};
use crate::config::CopyConfig;

/// 服务返回成功但没有内容时使用的兜底文案。
pub const NO_CONTENT_FALLBACK: &str = "Tidak ada konten yang dihasilkan.";

const NETWORK_FALLBACK: &str = "Gagal menghubungi layanan Kolosal AI.";

/// 文案生成阶段错误。
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("Kunci API Kolosal diperlukan.")]
    MissingCredential,

    /// 服务返回非 2xx，`message` 为提取后的错误信息。
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    InvalidResponse(String),
}

impl CopyError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "E_COPY_CREDENTIAL",
            Self::Service { .. } => "E_COPY_SERVICE",
            Self::Network(_) => "E_COPY_NETWORK",
            Self::InvalidResponse(_) => "E_COPY_RESPONSE",
        }
    }

    pub fn stage(&self) -> &'static str {
        "copy"
    }

    fn network(message: String) -> Self {
        if message.trim().is_empty() {
            Self::Network(NETWORK_FALLBACK.to_string())
        } else {
            Self::Network(message)
        }
    }
}

/// 描述 → 原始营销文案（多条，以分隔符隔开）。
pub trait CopyService: Send + Sync {
    fn generate(
        &self,
        description: &str,
        credential: &str,
    ) -> impl Future<Output = Result<String, CopyError>> + Send;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// 取首个候选的文本内容；结构缺失、为 `null` 或非字符串都视为没有内容。
fn first_content(body: &Value) -> Option<String> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

/// Kolosal 文案生成客户端。
pub struct KolosalCopyClient {
    http: reqwest::Client,
    config: CopyConfig,
}

impl KolosalCopyClient {
    pub fn new(config: CopyConfig, timeout_secs: Option<u64>) -> Result<Self, CopyError> {
        let http = build_http_client(timeout_secs)
            .map_err(|e| CopyError::network(format!("无法创建 HTTP 客户端：{}", e)))?;
        Ok(Self { http, config })
    }
}

impl CopyService for KolosalCopyClient {
    async fn generate(&self, description: &str, credential: &str) -> Result<String, CopyError> {
        if credential.is_empty() {
            return Err(CopyError::MissingCredential);
        }

        let user_prompt = copy_user_prompt(description);
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: COPY_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: self.config.temperature,
        };

        log::info!("✍️ 开始生成文案 - model={}", self.config.model);
        let start = Instant::now();

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await
            .map_err(|e| CopyError::network(describe_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.ok();
            let message = extract_error_message(status, raw.as_deref());
            log::error!("❌ Kolosal 返回错误 - HTTP {}: {}", status.as_u16(), message);
            return Err(CopyError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| CopyError::InvalidResponse(e.to_string()))?;

        let content = match first_content(&parsed) {
            Some(content) => content,
            None => {
                log::warn!("⚠️ Kolosal 未返回文案内容，使用兜底文案");
                NO_CONTENT_FALLBACK.to_string()
            }
        };

        log::info!(
            "✅ 文案生成完成 - {} 字符, {}ms",
            content.chars().count(),
            start.elapsed().as_millis()
        );
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::test_server::serve_once;
    use crate::config::{DEFAULT_COPY_MODEL, DEFAULT_TEMPERATURE};

    fn client_for(base: &str) -> KolosalCopyClient {
        KolosalCopyClient::new(
            CopyConfig {
                endpoint: format!("{}/v1/chat/completions", base),
                model: DEFAULT_COPY_MODEL.to_string(),
                temperature: DEFAULT_TEMPERATURE,
            },
            Some(5),
        )
        .expect("client init failed")
    }

    #[tokio::test]
    async fn sends_bearer_token_and_chat_body() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"Caption A---BATAS_VARIASI---Caption B"}}]}"#,
        );

        let copy = client_for(&base)
            .generate("a red sneaker", "sk-test")
            .await
            .expect("generate should succeed");
        let request = server.join().expect("server thread failed");

        assert_eq!(copy, "Caption A---BATAS_VARIASI---Caption B");
        assert!(request.head.starts_with("POST /v1/chat/completions"));
        assert_eq!(request.header("authorization").as_deref(), Some("Bearer sk-test"));
        assert_eq!(request.header("content-type").as_deref(), Some("application/json"));

        let body = request.json();
        assert_eq!(body["model"], "GLM 4.6");
        assert_eq!(body["temperature"].as_f64(), Some(0.7));
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], COPY_SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(
            body["messages"][1]["content"],
            "Buat materi pemasaran berdasarkan deskripsi visual ini: \"a red sneaker\""
        );
    }

    #[tokio::test]
    async fn unauthorized_response_yields_nested_message() {
        let (base, server) = serve_once("401 Unauthorized", r#"{"error":{"message":"invalid key"}}"#);

        let result = client_for(&base).generate("desc", "sk-bad").await;
        server.join().expect("server thread failed");

        let err = result.expect_err("401 should fail");
        assert!(matches!(err, CopyError::Service { status: 401, .. }));
        assert_eq!(err.to_string(), "invalid key");
    }

    #[tokio::test]
    async fn missing_content_returns_fallback_text() {
        let (base, server) = serve_once("200 OK", r#"{"choices":[{"message":{}}]}"#);

        let copy = client_for(&base)
            .generate("desc", "sk-test")
            .await
            .expect("missing content is not an error");
        server.join().expect("server thread failed");

        assert_eq!(copy, NO_CONTENT_FALLBACK);
    }

    #[tokio::test]
    async fn missing_choices_returns_fallback_text() {
        let (base, server) = serve_once("200 OK", r#"{"id":"cmpl-1"}"#);

        let copy = client_for(&base)
            .generate("desc", "sk-test")
            .await
            .expect("missing choices is not an error");
        server.join().expect("server thread failed");

        assert_eq!(copy, NO_CONTENT_FALLBACK);
    }

    #[tokio::test]
    async fn null_choice_returns_fallback_text() {
        let (base, server) = serve_once("200 OK", r#"{"choices":[null]}"#);

        let copy = client_for(&base)
            .generate("desc", "sk-test")
            .await
            .expect("null choice is not an error");
        server.join().expect("server thread failed");

        assert_eq!(copy, NO_CONTENT_FALLBACK);
    }

    #[tokio::test]
    async fn non_string_content_returns_fallback_text() {
        let (base, server) = serve_once("200 OK", r#"{"choices":[{"message":{"content":42}}]}"#);

        let copy = client_for(&base)
            .generate("desc", "sk-test")
            .await
            .expect("non-string content is not an error");
        server.join().expect("server thread failed");

        assert_eq!(copy, NO_CONTENT_FALLBACK);
    }

    #[tokio::test]
    async fn non_json_success_body_is_invalid_response() {
        let (base, server) = serve_once("200 OK", "<html>gateway</html>");

        let result = client_for(&base).generate("desc", "sk-test").await;
        server.join().expect("server thread failed");

        assert!(matches!(result, Err(CopyError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn closed_port_yields_network_error() {
        let result = client_for("http://127.0.0.1:9").generate("desc", "sk-test").await;

        let err = result.expect_err("nothing listens on port 9");
        assert!(matches!(err, CopyError::Network(_)));
        assert_eq!(err.code(), "E_COPY_NETWORK");
        assert!(!err.to_string().trim().is_empty());
    }

    #[tokio::test]
    async fn empty_credential_fails_without_request() {
        // 端口 9 上没有服务；若发出请求会得到网络错误而不是 MissingCredential
        let client = client_for("http://127.0.0.1:9");
        let result = client.generate("desc", "").await;
        assert!(matches!(result, Err(CopyError::MissingCredential)));
    }

    #[test]
    fn blank_network_message_uses_fallback() {
        assert_eq!(CopyError::network(String::new()).to_string(), NETWORK_FALLBACK);
    }
}
