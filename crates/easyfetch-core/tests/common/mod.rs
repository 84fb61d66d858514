//! Recorded HTTP fixture for integration tests
//!
//! Serves a fixed list of canned responses, one per connection, from a
//! loopback listener on an ephemeral port.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// 200 response with a two-byte body
pub const OK: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok";

/// 404 response with empty body
pub const NOT_FOUND: &str =
    "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

/// 302 redirect to `location`
pub fn redirect(location: &str) -> String {
    format!(
        "HTTP/1.1 302 Found\r\nLocation: {location}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    )
}

/// One-shot HTTP fixture server
pub struct FixtureServer {
    addr: SocketAddr,
    thread: Option<JoinHandle<Vec<String>>>,
}

impl FixtureServer {
    /// Bind a loopback listener and serve `responses` in order
    pub fn start<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let responses: Vec<String> = responses.into_iter().map(Into::into).collect();
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture listener");
        let addr = listener.local_addr().expect("fixture address");

        let thread = thread::spawn(move || {
            let mut request_lines = Vec::with_capacity(responses.len());
            for response in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    break;
                };
                stream
                    .set_read_timeout(Some(Duration::from_secs(5)))
                    .expect("set read timeout");

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let text = String::from_utf8_lossy(&request);
                request_lines.push(text.lines().next().unwrap_or_default().to_string());

                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
            request_lines
        });

        Self {
            addr,
            thread: Some(thread),
        }
    }

    /// `http://127.0.0.1:PORT` without a trailing slash
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Wait for the server to finish and return the request lines it saw
    pub fn finish(mut self) -> Vec<String> {
        self.thread
            .take()
            .map(|t| t.join().expect("fixture thread panicked"))
            .unwrap_or_default()
    }
}
