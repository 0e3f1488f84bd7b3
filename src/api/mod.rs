pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{
    AnalysisResult, AnalyzeRequest, AudioFeatures, EmergencyRequest, HealthResponse,
    WellbeingSummary,
};

/// One-shot HTTP responder used by unit tests instead of a real service.
#[cfg(test)]
pub(crate) mod testing {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[derive(Clone)]
    pub struct Route {
        pub path_prefix: String,
        pub status: u16,
        pub body: String,
    }

    pub fn respond_json(path_prefix: &str, status: u16, body: &str) -> Route {
        Route {
            path_prefix: path_prefix.to_string(),
            status,
            body: body.to_string(),
        }
    }

    pub struct TestServer {
        addr: std::net::SocketAddr,
    }

    impl TestServer {
        /// Bind an ephemeral port and serve canned JSON per path prefix.
        pub async fn spawn(routes: Vec<Route>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();

            tokio::spawn(async move {
                loop {
                    let Ok((socket, _)) = listener.accept().await else {
                        break;
                    };
                    let routes = routes.clone();
                    tokio::spawn(handle_connection(socket, routes));
                }
            });

            Self { addr }
        }

        pub fn base_url(&self) -> String {
            format!("http://{}", self.addr)
        }
    }

    async fn handle_connection(mut socket: tokio::net::TcpStream, routes: Vec<Route>) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let header_end = loop {
            let n = match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter(|line| line.to_ascii_lowercase().starts_with("content-length:"))
            .filter_map(|line| line.split(':').nth(1))
            .filter_map(|v| v.trim().parse::<usize>().ok())
            .next()
            .unwrap_or(0);

        let body_received = buf.len() - (header_end + 4);
        if content_length > body_received {
            let mut rest = vec![0u8; content_length - body_received];
            let _ = socket.read_exact(&mut rest).await;
        }

        let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
        let (status, body) = routes
            .iter()
            .find(|route| path.starts_with(&route.path_prefix))
            .map(|route| (route.status, route.body.clone()))
            .unwrap_or((404, r#"{"error":"not found"}"#.to_string()));

        let reason = if status < 400 { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len(),
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    }

    /// A loopback address with nothing listening on it.
    pub async fn unreachable_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }
}
