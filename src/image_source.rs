//! # 图片输入模块
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“发往视觉服务的载荷”解耦：
//! - `ImageSource` 表示展示层交来的原始来源（文件路径 / 字节 / Data URL）
//! - `ImagePayload` 表示已读取、已校验、统一编码为 Data URL 的图片
//!
//! ## 实现思路
//!
//! - 媒体类型优先使用调用方声明的值，缺失时用 `infer` 按文件头识别。
//! - 只接受 `image/*`，与上传控件的 `accept="image/*"` 保持一致。
//! - 体积在读取后、编码前校验；Data URL 按 Base64 长度预估，避免先解码大载荷。

use std::path::PathBuf;

use base64::{Engine as _, engine::general_purpose};

const BASE64_MARKER: &str = "base64,";

/// 图片读取统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Format gambar tidak valid: {0}")]
    InvalidFormat(String),

    #[error("Gagal membaca data gambar: {0}")]
    Decode(String),

    #[error("Gagal membaca berkas gambar: {0}")]
    FileSystem(String),

    #[error("Ukuran gambar melebihi batas: {0}")]
    ResourceLimit(String),
}

impl ImageError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) => "E_IMAGE_FORMAT",
            Self::Decode(_) => "E_IMAGE_DECODE",
            Self::FileSystem(_) => "E_IMAGE_FILE",
            Self::ResourceLimit(_) => "E_IMAGE_LIMIT",
        }
    }

    pub fn stage(&self) -> &'static str {
        "image"
    }
}

/// 图片输入来源。
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// 本地文件路径。
    FilePath(PathBuf),
    /// 已在内存中的图片字节，`mime_type` 对应浏览器 `File.type`。
    Bytes {
        data: Vec<u8>,
        mime_type: Option<String>,
    },
    /// `data:image/...;base64,...` 形式的字符串。
    DataUrl(String),
}

/// 读取完成的图片：Data URL 与其媒体类型。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data_url: String,
    pub mime_type: String,
}

impl ImagePayload {
    /// 去掉 Data URL 前缀后的纯 Base64 数据。
    pub fn base64_data(&self) -> &str {
        strip_data_url_prefix(&self.data_url)
    }
}

/// 去掉 `data:<mime>;base64,` 前缀；没有前缀时原样返回。
pub fn strip_data_url_prefix(payload: &str) -> &str {
    match payload.find(BASE64_MARKER) {
        Some(idx) => &payload[idx + BASE64_MARKER.len()..],
        None => payload,
    }
}

/// 读取并校验图片，统一转换为 Data URL。
pub async fn load_image(source: ImageSource, max_bytes: u64) -> Result<ImagePayload, ImageError> {
    match source {
        ImageSource::FilePath(path) => {
            log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|e| ImageError::FileSystem(format!("{}: {}", path.display(), e)))?;
            ensure_within_limit(metadata.len(), max_bytes)?;

            let data = tokio::fs::read(&path)
                .await
                .map_err(|e| ImageError::FileSystem(format!("{}: {}", path.display(), e)))?;
            encode_bytes(&data, None, max_bytes)
        }
        ImageSource::Bytes { data, mime_type } => encode_bytes(&data, mime_type.as_deref(), max_bytes),
        ImageSource::DataUrl(data_url) => parse_data_url(data_url, max_bytes),
    }
}

fn encode_bytes(data: &[u8], declared: Option<&str>, max_bytes: u64) -> Result<ImagePayload, ImageError> {
    if data.is_empty() {
        return Err(ImageError::InvalidFormat("berkas kosong".to_string()));
    }
    ensure_within_limit(data.len() as u64, max_bytes)?;

    let mime_type = resolve_mime_type(data, declared)?;
    let encoded = general_purpose::STANDARD.encode(data);

    log::debug!("🖼️ 图片编码完成 - {} bytes, {}", data.len(), mime_type);

    Ok(ImagePayload {
        data_url: format!("data:{};base64,{}", mime_type, encoded),
        mime_type,
    })
}

fn parse_data_url(data_url: String, max_bytes: u64) -> Result<ImagePayload, ImageError> {
    let header_end = data_url
        .find(BASE64_MARKER)
        .ok_or_else(|| ImageError::InvalidFormat("penanda base64 tidak ditemukan".to_string()))?;

    let header = &data_url[..header_end];
    let declared = header
        .strip_prefix("data:")
        .map(|rest| rest.trim_end_matches(';'))
        .filter(|mime| !mime.is_empty());

    let encoded = &data_url[header_end + BASE64_MARKER.len()..];
    let estimated = (encoded.len() as u64).saturating_mul(3) / 4;
    ensure_within_limit(estimated, max_bytes)?;

    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| ImageError::Decode(format!("Base64: {}", e)))?;

    let mime_type = resolve_mime_type(&bytes, declared)?;
    Ok(ImagePayload { data_url, mime_type })
}

fn resolve_mime_type(data: &[u8], declared: Option<&str>) -> Result<String, ImageError> {
    let declared = declared.map(str::trim).filter(|mime| !mime.is_empty());

    let mime_type = match declared {
        Some(mime) => mime.to_ascii_lowercase(),
        None => infer::get(data)
            .map(|kind| kind.mime_type().to_string())
            .ok_or_else(|| ImageError::InvalidFormat("jenis berkas tidak dikenali".to_string()))?,
    };

    if !mime_type.starts_with("image/") {
        return Err(ImageError::InvalidFormat(format!("bukan berkas gambar: {}", mime_type)));
    }
    Ok(mime_type)
}

fn ensure_within_limit(size: u64, max_bytes: u64) -> Result<(), ImageError> {
    if size > max_bytes {
        return Err(ImageError::ResourceLimit(format!(
            "{:.2} MB (batas {:.2} MB)",
            size as f64 / 1024.0 / 1024.0,
            max_bytes as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}
