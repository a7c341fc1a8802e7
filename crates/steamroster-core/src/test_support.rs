//! Loopback HTTP server for exercising the API client in tests.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub struct Reply {
    status_line: String,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::status("200 OK", body)
    }

    pub fn status(status_line: &str, body: impl Into<String>) -> Self {
        Self {
            status_line: status_line.to_string(),
            content_type: "application/json",
            body: body.into().into_bytes(),
        }
    }

    pub fn image(bytes: &[u8]) -> Self {
        Self {
            status_line: "200 OK".to_string(),
            content_type: "image/jpeg",
            body: bytes.to_vec(),
        }
    }
}

pub struct TestServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Request lines seen so far, as `METHOD target`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

/// Serve every connection with `handler(method, target)` until the test ends.
pub async fn spawn_router<F>(handler: F) -> TestServer
where
    F: Fn(&str, &str) -> Reply + Send + Sync + 'static,
{
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let address = listener.local_addr().expect("local address");
    let handler = Arc::new(handler);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let handler = Arc::clone(&handler);
            let recorded = Arc::clone(&recorded);
            tokio::spawn(async move {
                let mut buffer = vec![0_u8; 16 * 1024];
                let read = socket.read(&mut buffer).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buffer[..read]).into_owned();
                let mut parts = request.lines().next().unwrap_or_default().split_whitespace();
                let method = parts.next().unwrap_or_default().to_string();
                let target = parts.next().unwrap_or_default().to_string();
                recorded
                    .lock()
                    .expect("requests lock")
                    .push(format!("{method} {target}"));

                let reply = handler(&method, &target);
                let head = format!(
                    "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                    reply.status_line,
                    reply.content_type,
                    reply.body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&reply.body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    TestServer {
        base_url: format!("http://{address}"),
        requests,
    }
}

/// URL on a port nothing listens on.
pub async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind unused port");
    let address = listener.local_addr().expect("local address");
    drop(listener);
    format!("http://{address}")
}

/// Decoded value of query parameter `name` in a request target.
pub fn query_param(target: &str, name: &str) -> Option<String> {
    let url = reqwest::Url::parse(&format!("http://localhost{target}")).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[test]
fn query_param_decodes_values() {
    let target = "/ISteamUser/GetPlayerSummaries/v0002/?key=a+b&steamids=1%2C2";
    assert_eq!(query_param(target, "steamids").as_deref(), Some("1,2"));
    assert_eq!(query_param(target, "key").as_deref(), Some("a b"));
    assert_eq!(query_param(target, "missing"), None);
}
