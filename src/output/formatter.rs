//! 文案输出格式化：按分隔符拆分多条文案，复制/分享前追加推广尾注。

/// 文案生成提示词中约定的分隔符。
pub const VARIATION_DELIMITER: &str = "---BATAS_VARIASI---";

/// 复制或分享前追加的推广尾注（屏幕展示时不追加）。
pub const PROMOTIONAL_SUFFIX: &str = "\n\n✨ Dibuat dengan Konten Kilat AI - Coba sekarang!";

/// 将原始输出拆分为多条文案。
///
/// - 含分隔符：按分隔符拆分，逐条去除首尾空白，丢弃空段，保持原顺序
/// - 不含分隔符：整段去除首尾空白后作为唯一一条（模型未遵守格式时的兜底）
/// - `None` 或空白：返回空列表
pub fn split_variations(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    if raw.contains(VARIATION_DELIMITER) {
        return raw
            .split(VARIATION_DELIMITER)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![trimmed.to_string()]
    }
}

/// 去除首尾空白后追加推广尾注。
pub fn append_promotional_suffix(text: &str) -> String {
    format!("{}{}", text.trim(), PROMOTIONAL_SUFFIX)
}
