//! 单次响应的本地 HTTP 服务，仅供测试使用。

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// 服务端收到的原始请求。
pub(crate) struct CapturedRequest {
    pub(crate) head: String,
    pub(crate) body: String,
}

impl CapturedRequest {
    pub(crate) fn header(&self, name: &str) -> Option<String> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.head.lines().find_map(|line| {
            line.to_ascii_lowercase()
                .starts_with(&prefix)
                .then(|| line[prefix.len()..].trim().to_string())
        })
    }

    pub(crate) fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be json")
    }
}

/// 启动只应答一次的服务，返回根地址与服务线程句柄。
pub(crate) fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
    let addr = listener.local_addr().expect("read local addr failed");
    let status_line = status_line.to_string();
    let body = body.to_string();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept failed");

        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];
        let captured = loop {
            let read = stream.read(&mut chunk).expect("read request failed");
            buffer.extend_from_slice(&chunk[..read]);

            let text = String::from_utf8_lossy(&buffer).to_string();
            if let Some(split) = text.find("\r\n\r\n") {
                let head = text[..split].to_string();
                let content_length = head
                    .lines()
                    .find_map(|line| {
                        let lower = line.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .and_then(|v| v.trim().parse::<usize>().ok())
                    })
                    .unwrap_or(0);
                let body_bytes = buffer.len() - (split + 4);
                if body_bytes >= content_length || read == 0 {
                    let request_body = String::from_utf8_lossy(&buffer[split + 4..]).to_string();
                    break CapturedRequest { head, body: request_body };
                }
            } else if read == 0 {
                break CapturedRequest { head: text, body: String::new() };
            }
        };

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).expect("write response failed");
        stream.flush().expect("flush failed");

        captured
    });

    (format!("http://127.0.0.1:{}", addr.port()), server)
}
