//! 固定提示词。

/// 视觉描述阶段的指令：客观描述图片，供后续撰写营销文案使用。
pub const VISION_PROMPT: &str = "Deskripsikan gambar ini secara detail dan objektif. Fokus pada fitur visual utama, warna, suasana, dan objek yang terlihat. Deskripsi ini akan digunakan sebagai dasar untuk menulis materi pemasaran.";

/// 文案生成阶段的系统指令：三条风格不同的文案，用分隔符隔开。
pub const COPY_SYSTEM_PROMPT: &str = "Anda adalah 'Jago Konten AI'. Tugas Anda adalah membuat 3 variasi caption media sosial yang BERBEDA (misalnya: satu lucu, satu profesional, satu singkat) berdasarkan deskripsi visual produk. \n\nPENTING: Pisahkan setiap variasi konten dengan teks persis: '---BATAS_VARIASI---'. Jangan gunakan penomoran manual (1, 2, 3) di awal teks. Gunakan bahasa Indonesia yang menarik, emoji, dan hashtag.";

/// 用户消息：嵌入视觉描述。
pub fn copy_user_prompt(description: &str) -> String {
    format!(
        "Buat materi pemasaran berdasarkan deskripsi visual ini: \"{}\"",
        description
    )
}
