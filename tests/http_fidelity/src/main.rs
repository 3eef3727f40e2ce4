fn main() {
    println!("Run `cargo test -p http-fidelity` to execute end-to-end HTTP tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use chunkup_client::{ClientError, HttpTransferClient, UploadResponse};
    use chunkup_engine::{EngineConfig, FileState, UploadEngine};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    fn load_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    /// One request as received by [`MockHttp`].
    #[derive(Debug, Clone)]
    struct Received {
        /// Request target, e.g. `/upload?filename=a&progress=10`.
        target: String,
        content_type: Option<String>,
        body: Vec<u8>,
    }

    impl Received {
        fn query_param(&self, key: &str) -> Option<&str> {
            let (_, query) = self.target.split_once('?')?;
            query
                .split('&')
                .find_map(|pair| pair.strip_prefix(key)?.strip_prefix('='))
        }
    }

    type Reply = Box<dyn Fn(usize, &Received) -> (u16, String) + Send + Sync>;

    /// HTTP/1.1 server answering one request per connection.
    struct MockHttp {
        base: String,
        received: Arc<Mutex<Vec<Received>>>,
    }

    impl MockHttp {
        /// `reply` gets the 0-based request number and the request.
        async fn start(reply: Reply) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base = format!("http://{}/upload", listener.local_addr().unwrap());
            let received = Arc::new(Mutex::new(Vec::new()));
            let log = Arc::clone(&received);

            tokio::spawn(async move {
                loop {
                    let (mut stream, _) = listener.accept().await.unwrap();
                    let Some(req) = read_request(&mut stream).await else {
                        continue;
                    };
                    let n = {
                        let mut log = log.lock().unwrap();
                        log.push(req.clone());
                        log.len() - 1
                    };
                    let (status, body) = reply(n, &req);
                    let resp = format!(
                        "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(resp.as_bytes()).await;
                    let _ = stream.shutdown().await;
                }
            });

            Self { base, received }
        }

        fn received(&self) -> Vec<Received> {
            self.received.lock().unwrap().clone()
        }
    }

    async fn read_request(stream: &mut TcpStream) -> Option<Received> {
        let mut buf = Vec::new();
        let mut tmp = [0u8; 8192];
        let head_end = loop {
            let n = stream.read(&mut tmp).await.ok()?;
            if n == 0 {
                return None;
            }
            buf.extend_from_slice(&tmp[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
        let mut lines = head.lines();
        let target = lines.next()?.split(' ').nth(1)?.to_string();
        let mut content_length = 0;
        let mut content_type = None;
        for line in lines {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().ok()?;
            } else if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.trim().to_string());
            }
        }

        let mut body = buf[head_end..].to_vec();
        while body.len() < content_length {
            let n = stream.read(&mut tmp).await.ok()?;
            if n == 0 {
                return None;
            }
            body.extend_from_slice(&tmp[..n]);
        }

        Some(Received {
            target,
            content_type,
            body,
        })
    }

    type Events = Arc<Mutex<Vec<(&'static str, usize, u8, String)>>>;

    fn recording_engine(base: &str, events: &Events) -> UploadEngine {
        let p = Arc::clone(events);
        let e = Arc::clone(events);
        let config = EngineConfig::new()
            .on_progress(move |i, pct, name| p.lock().unwrap().push(("progress", i, pct, name.into())))
            .on_error(move |i, pct, name| e.lock().unwrap().push(("error", i, pct, name.into())));
        let client = HttpTransferClient::with_base_url(base).unwrap();
        UploadEngine::new(config, Arc::new(client))
    }

    #[tokio::test]
    async fn binary_file_reassembles_exactly() {
        let accept = load_fixture("accept.json");
        let server = MockHttp::start(Box::new(move |_, _| (200, accept.clone()))).await;
        let events: Events = Arc::default();
        let engine = recording_engine(&server.base, &events);

        let data: Vec<u8> = (0..1024u32).map(|i| (i % 256) as u8).collect();
        let index = engine.register_and_start("all-bytes.bin", data.clone()).unwrap();
        assert_eq!(engine.join(index).await.unwrap(), FileState::Completed);

        let received = server.received();
        // 1024 / 10 = 102-byte blocks: ten full ones plus a 4-byte tail.
        assert_eq!(received.len(), 11);
        assert_eq!(received[10].body.len(), 4);

        let reassembled: Vec<u8> = received.iter().flat_map(|r| r.body.clone()).collect();
        assert_eq!(reassembled, data);

        for req in &received {
            assert!(req.target.starts_with("/upload?"), "target: {}", req.target);
            assert_eq!(req.query_param("filename"), Some("all-bytes.bin"));
            assert_eq!(req.content_type.as_deref(), Some("application/octet-stream"));
        }

        let url_progress: Vec<u8> = received
            .iter()
            .map(|r| r.query_param("progress").unwrap().parse().unwrap())
            .collect();
        let reported: Vec<u8> = events.lock().unwrap().iter().map(|e| e.2).collect();
        assert_eq!(url_progress, reported);
        assert_eq!(reported, vec![9, 19, 29, 39, 49, 59, 69, 79, 89, 99, 100]);
    }

    #[tokio::test]
    async fn server_rejection_on_third_chunk() {
        let accept = load_fixture("accept.json");
        let reject = load_fixture("reject.json");
        let server = MockHttp::start(Box::new(move |n, _| {
            (200, if n == 2 { reject.clone() } else { accept.clone() })
        }))
        .await;
        let events: Events = Arc::default();
        let engine = recording_engine(&server.base, &events);

        let index = engine.register_and_start("r.bin", vec![0u8; 1000]).unwrap();
        assert_eq!(engine.join(index).await.unwrap(), FileState::Failed);
        assert_eq!(server.received().len(), 3);

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                ("progress", index, 10, "r.bin".to_string()),
                ("progress", index, 20, "r.bin".to_string()),
                ("error", index, 30, "r.bin".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn non_success_status_fails_the_file() {
        let server = MockHttp::start(Box::new(|_, _| (500, "oops".into()))).await;
        let events: Events = Arc::default();
        let engine = recording_engine(&server.base, &events);

        let index = engine.register_and_start("s.bin", vec![0u8; 50]).unwrap();
        assert_eq!(engine.join(index).await.unwrap(), FileState::Failed);
        assert_eq!(server.received().len(), 1);
        assert_eq!(
            *events.lock().unwrap(),
            vec![("error", index, 10, "s.bin".to_string())]
        );
    }

    #[tokio::test]
    async fn unparsable_body_fails_the_file() {
        let missing = load_fixture("missing_result.json");
        let server = MockHttp::start(Box::new(move |_, _| (200, missing.clone()))).await;
        let events: Events = Arc::default();
        let engine = recording_engine(&server.base, &events);

        let index = engine.register_and_start("m.bin", vec![0u8; 100]).unwrap();
        assert_eq!(engine.join(index).await.unwrap(), FileState::Failed);
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "error");
    }

    #[tokio::test]
    async fn extra_response_fields_are_ignored() {
        let body = load_fixture("accept_extra_fields.json");
        let server = MockHttp::start(Box::new(move |_, _| (200, body.clone()))).await;
        let client = HttpTransferClient::with_base_url(&server.base).unwrap();

        let range = chunkup_transfer::ByteRange::new(vec![1u8, 2, 3].into(), 0, 3).unwrap();
        let resp = chunkup_client::TransferClient::send(&client, "?filename=x&progress=100", range)
            .await
            .unwrap();
        assert_eq!(resp, UploadResponse::accepted());
    }

    #[tokio::test]
    async fn missing_result_is_a_decode_error() {
        let body = load_fixture("missing_result.json");
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(parsed.get("result").is_none());

        let server = MockHttp::start(Box::new(move |_, _| (200, body.clone()))).await;
        let client = HttpTransferClient::with_base_url(&server.base).unwrap();

        let range = chunkup_transfer::ByteRange::new(vec![1u8].into(), 0, 1).unwrap();
        let err = chunkup_client::TransferClient::send(&client, "?filename=x&progress=100", range)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Json(_)), "unexpected error: {err}");
    }
}
