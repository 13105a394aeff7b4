// Shared helpers for integration tests
#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use konten_kilat::image_source::ImageSource;

// Same one-shot responder the client unit tests use.
#[path = "../../src/clients/test_server.rs"]
mod test_server;

pub(crate) use test_server::serve_once;

pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

pub fn png_bytes() -> ImageSource {
    ImageSource::Bytes {
        data: PNG_SIGNATURE.to_vec(),
        mime_type: None,
    }
}

pub fn unique_temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("konten-kilat-{label}-{nanos}"))
}
