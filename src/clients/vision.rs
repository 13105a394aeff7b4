//! # 视觉描述客户端
//!
//! ## 设计思路
//!
//! 给定图片（Base64 或 Data URL）与媒体类型，调用 Gemini `generateContent`
//! 得到一段客观的图片描述，作为文案生成阶段的输入。
//!
//! ## 实现思路
//!
//! - 发送前统一去掉 Data URL 前缀，只传纯 Base64。
//! - 请求体为 `inlineData` + 固定提示词两个 part。
//! - 成功时拼接首个候选的所有文本 part；为空视为失败。
//! - 任何失败（网络 / 配额 / 响应异常）都转换为 `VisionError`，不重试。

use std::future::Future;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::http::{build_http_client, describe_transport_error, extract_error_message};
use super::prompts::VISION_PROMPT;
use crate::config::VisionConfig;
use crate::image_source::strip_data_url_prefix;

/// 视觉描述阶段错误。
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Gagal menganalisis gambar: API Key Gemini belum dikonfigurasi.")]
    MissingApiKey,

    #[error("Gagal menganalisis gambar: {0}")]
    Network(String),

    #[error("Gagal menganalisis gambar: {message}")]
    Service { status: u16, message: String },

    #[error("Gagal menganalisis gambar: {0}")]
    InvalidResponse(String),

    #[error("Gagal menganalisis gambar: Gemini tidak mengembalikan teks deskripsi.")]
    EmptyResponse,
}

impl VisionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "E_VISION_API_KEY",
            Self::Network(_) => "E_VISION_NETWORK",
            Self::Service { .. } => "E_VISION_SERVICE",
            Self::InvalidResponse(_) => "E_VISION_RESPONSE",
            Self::EmptyResponse => "E_VISION_EMPTY",
        }
    }

    pub fn stage(&self) -> &'static str {
        "vision"
    }
}

/// 图片 → 描述文本。
pub trait VisionService: Send + Sync {
    /// `image_data` 可以是纯 Base64，也可以带 Data URL 前缀。
    fn describe(
        &self,
        image_data: &str,
        mime_type: &str,
    ) -> impl Future<Output = Result<String, VisionError>> + Send;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// 拼接首个候选的全部文本 part。
    fn text(self) -> String {
        self.candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts)
            .map(|parts| parts.into_iter().filter_map(|part| part.text).collect::<String>())
            .unwrap_or_default()
    }
}

/// Gemini 视觉描述客户端。
pub struct GeminiVisionClient {
    http: reqwest::Client,
    config: VisionConfig,
}

impl GeminiVisionClient {
    pub fn new(config: VisionConfig, timeout_secs: Option<u64>) -> Result<Self, VisionError> {
        let http = build_http_client(timeout_secs)
            .map_err(|e| VisionError::Network(format!("无法创建 HTTP 客户端：{}", e)))?;
        Ok(Self { http, config })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl VisionService for GeminiVisionClient {
    async fn describe(&self, image_data: &str, mime_type: &str) -> Result<String, VisionError> {
        if self.config.api_key.is_empty() {
            return Err(VisionError::MissingApiKey);
        }

        let data = strip_data_url_prefix(image_data);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Inline {
                        inline_data: InlineData { mime_type, data },
                    },
                    Part::Text { text: VISION_PROMPT },
                ],
            }],
        };

        log::info!(
            "🔍 开始视觉分析 - model={} mime={} payload={} bytes",
            self.config.model,
            mime_type,
            data.len()
        );
        let start = Instant::now();

        let response = self
            .http
            .post(self.generate_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VisionError::Network(describe_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.ok();
            let message = extract_error_message(status, raw.as_deref());
            log::error!("❌ Gemini 返回错误 - HTTP {}: {}", status.as_u16(), message);
            return Err(VisionError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| VisionError::InvalidResponse(e.to_string()))?;

        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(VisionError::EmptyResponse);
        }

        log::info!(
            "✅ 视觉分析完成 - {} 字符, {}ms",
            text.chars().count(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::test_server::serve_once;
    use crate::config::DEFAULT_VISION_MODEL;

    fn client_for(endpoint: &str) -> GeminiVisionClient {
        GeminiVisionClient::new(
            VisionConfig {
                api_key: "gem-test".to_string(),
                endpoint: endpoint.to_string(),
                model: DEFAULT_VISION_MODEL.to_string(),
            },
            Some(5),
        )
        .expect("client init failed")
    }

    #[tokio::test]
    async fn sends_stripped_payload_and_prompt() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"a red sneaker "},{"text":"on white background"}]}}]}"#,
        );

        let description = client_for(&base)
            .describe("data:image/png;base64,QUJD", "image/png")
            .await
            .expect("describe should succeed");
        let request = server.join().expect("server thread failed");

        assert_eq!(description, "a red sneaker on white background");
        assert!(request.head.starts_with("POST /models/gemini-2.5-flash:generateContent"));
        assert_eq!(request.header("x-goog-api-key").as_deref(), Some("gem-test"));

        let body = request.json();
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "QUJD");
        assert_eq!(parts[1]["text"], VISION_PROMPT);
    }

    #[tokio::test]
    async fn service_error_carries_extracted_message() {
        let (base, server) = serve_once(
            "429 Too Many Requests",
            r#"{"error":{"code":429,"message":"quota exceeded"}}"#,
        );

        let result = client_for(&base).describe("QUJD", "image/jpeg").await;
        server.join().expect("server thread failed");

        match result {
            Err(err @ VisionError::Service { status: 429, .. }) => {
                assert_eq!(err.to_string(), "Gagal menganalisis gambar: quota exceeded");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let (base, server) = serve_once("200 OK", r#"{"candidates":[]}"#);

        let result = client_for(&base).describe("QUJD", "image/png").await;
        server.join().expect("server thread failed");

        assert!(matches!(result, Err(VisionError::EmptyResponse)));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_request() {
        let client = GeminiVisionClient::new(
            VisionConfig {
                api_key: String::new(),
                endpoint: "http://127.0.0.1:9".to_string(),
                model: DEFAULT_VISION_MODEL.to_string(),
            },
            None,
        )
        .expect("client init failed");

        let result = client.describe("QUJD", "image/png").await;
        assert!(matches!(result, Err(VisionError::MissingApiKey)));
    }

    #[tokio::test]
    async fn closed_port_yields_network_error() {
        let result = client_for("http://127.0.0.1:9").describe("QUJD", "image/png").await;

        let err = result.expect_err("nothing listens on port 9");
        assert!(matches!(err, VisionError::Network(_)));
        assert_eq!(err.code(), "E_VISION_NETWORK");
        assert!(err.to_string().starts_with("Gagal menganalisis gambar: "));
    }
}
