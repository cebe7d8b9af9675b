//! End-to-end tests: a request goes in one side of an in-memory duplex
//! stream, the full response comes out the other.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use wwwworker::config::SiteConfig;
use wwwworker::http::connection::Connection;

static NEXT_ROOT: AtomicUsize = AtomicUsize::new(0);

/// Creates a fresh document root under the system temp dir.
fn doc_root() -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "wwwworker-test-{}-{}",
        std::process::id(),
        NEXT_ROOT.fetch_add(1, Ordering::SeqCst)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn site(root: &Path) -> Arc<SiteConfig> {
    site_with_timeout(root, 5)
}

fn site_with_timeout(root: &Path, io_timeout_secs: u64) -> Arc<SiteConfig> {
    Arc::new(SiteConfig {
        document_root: root.to_path_buf(),
        server_name: "Test Server".to_string(),
        template_server_name: "Template Server".to_string(),
        io_timeout_secs,
    })
}

struct Reply {
    head: String,
    body: Vec<u8>,
}

impl Reply {
    fn status_line(&self) -> &str {
        self.head.lines().next().unwrap_or("")
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.head
            .lines()
            .skip(1)
            .filter_map(|l| l.split_once(": "))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    fn body_text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    fn from_raw(raw: &[u8]) -> Self {
        let split = raw
            .windows(2)
            .position(|w| w == b"\n\n")
            .expect("header block terminator");

        Reply {
            head: String::from_utf8(raw[..split + 1].to_vec()).unwrap(),
            body: raw[split + 2..].to_vec(),
        }
    }
}

async fn exchange(root: &Path, request: &[u8]) -> Reply {
    let (mut client, server) = tokio::io::duplex(1024);
    let conn = Connection::new(server, site(root));
    let handle = tokio::spawn(conn.run());

    client.write_all(request).await.unwrap();

    let mut raw = Vec::new();
    client.read_to_end(&mut raw).await.unwrap();
    handle.await.unwrap().unwrap();

    Reply::from_raw(&raw)
}

#[tokio::test]
async fn test_front_page() {
    let root = doc_root();
    let reply = exchange(&root, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("text/html"));
    assert_eq!(reply.body_text(), "<h3>My web server works!</h3>\n");
}

#[tokio::test]
async fn test_front_page_for_request_without_get() {
    let root = doc_root();
    let reply = exchange(&root, b"HEAD / HTTP/1.1\r\n\r\n").await;

    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.body_text(), "<h3>My web server works!</h3>\n");
}

#[tokio::test]
async fn test_malformed_get_serves_front_page() {
    let root = doc_root();
    std::fs::write(root.join("index.html"), "real page").unwrap();

    let reply = exchange(&root, b"GET /index.html\r\n\r\n").await;

    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.body_text(), "<h3>My web server works!</h3>\n");
}

#[tokio::test]
async fn test_templated_html() {
    let root = doc_root();
    std::fs::write(
        root.join("index.html"),
        "<html>\n<p><cs371date></p>\r\n<p><cs371server></p>\n</html>\n",
    )
    .unwrap();

    let reply = exchange(&root, b"GET /index.html HTTP/1.1\r\n\r\n").await;
    let today = chrono::Local::now().format("%d-%m-%Y").to_string();

    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("text/html"));
    assert_eq!(
        reply.body_text(),
        format!("<html><p>{}</p><p>Template Server</p></html>", today)
    );
}

#[tokio::test]
async fn test_unknown_extension_is_templated_as_html() {
    let root = doc_root();
    std::fs::write(root.join("notes.txt"), "by <cs371server>\n").unwrap();

    let reply = exchange(&root, b"GET /notes.txt HTTP/1.1\r\n\r\n").await;

    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("text/html"));
    assert_eq!(reply.body_text(), "by Template Server");
}

#[tokio::test]
async fn test_binary_passthrough() {
    let root = doc_root();
    std::fs::create_dir_all(root.join("img")).unwrap();
    let image: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    std::fs::write(root.join("img/logo.png"), &image).unwrap();

    let reply = exchange(&root, b"GET /img/logo.png HTTP/1.1\r\n\r\n").await;

    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("image/png"));
    assert_eq!(reply.body.len(), image.len());
    assert_eq!(reply.body, image);
}

#[tokio::test]
async fn test_binary_with_template_tokens_is_untouched() {
    let root = doc_root();
    let image = b"GIF89a<cs371date>\r\n\x00\xff".to_vec();
    std::fs::write(root.join("anim.gif"), &image).unwrap();

    let reply = exchange(&root, b"GET /anim.gif HTTP/1.1\r\n\r\n").await;

    assert_eq!(reply.header("Content-Type"), Some("image/gif"));
    assert_eq!(reply.body, image);
}

#[tokio::test]
async fn test_missing_image() {
    let root = doc_root();
    let reply = exchange(&root, b"GET /missing.png HTTP/1.1\r\n\r\n").await;

    assert_eq!(reply.status_line(), "HTTP/1.1 404 Not Found");
    assert_eq!(reply.header("Content-Type"), Some("image/png"));
    assert_eq!(reply.body_text(), "<h3>404 Page Not Found</h3>\n");
}

#[tokio::test]
async fn test_missing_target_for_every_content_type() {
    let root = doc_root();

    for name in ["gone.html", "gone.gif", "gone.jpeg", "gone.png", "gone"] {
        let request = format!("GET /{} HTTP/1.1\r\n\r\n", name);
        let reply = exchange(&root, request.as_bytes()).await;

        assert_eq!(reply.status_line(), "HTTP/1.1 404 Not Found", "{}", name);
        assert_eq!(reply.body_text(), "<h3>404 Page Not Found</h3>\n", "{}", name);
    }
}

#[tokio::test]
async fn test_directory_is_not_a_target() {
    let root = doc_root();
    std::fs::create_dir_all(root.join("sub")).unwrap();

    let reply = exchange(&root, b"GET /sub HTTP/1.1\r\n\r\n").await;

    assert_eq!(reply.status_line(), "HTTP/1.1 404 Not Found");
}

#[tokio::test]
async fn test_traversal_outside_root_is_not_found() {
    let root = doc_root();
    let outside = root.parent().unwrap().join("wwwworker-secret.html");
    std::fs::write(&outside, "secret").unwrap();

    let reply = exchange(&root, b"GET /../wwwworker-secret.html HTTP/1.1\r\n\r\n").await;

    assert_eq!(reply.status_line(), "HTTP/1.1 404 Not Found");
    assert!(!reply.body_text().contains("secret"));
}

#[tokio::test]
async fn test_header_block_shape() {
    let root = doc_root();
    let reply = exchange(&root, b"GET / HTTP/1.1\r\n\r\n").await;

    let lines: Vec<&str> = reply.head.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("HTTP/1.1 "));
    assert!(lines[1].starts_with("Date: ") && lines[1].ends_with(" GMT"));
    assert_eq!(lines[2], "Server: Test Server");
    assert_eq!(lines[3], "Connection: close");
    assert_eq!(lines[4], "Content-Type: text/html");
    assert_eq!(reply.header("Content-Length"), None);
}

#[tokio::test]
async fn test_client_hangup_before_request() {
    let root = doc_root();
    let (client, server) = tokio::io::duplex(64);
    drop(client);

    let result = Connection::new(server, site(&root)).run().await;

    // The write side is gone, so the header write fails and the
    // connection closes with an error.
    assert!(result.is_err());
}

#[tokio::test]
async fn test_incomplete_request_times_out() {
    let root = doc_root();
    let (mut client, server) = tokio::io::duplex(1024);

    // No blank line ever arrives; the client stays connected.
    client.write_all(b"GET /a.html HTTP/1.1\r\n").await.unwrap();

    let conn = Connection::new(server, site_with_timeout(&root, 1));
    let result = tokio::time::timeout(Duration::from_secs(5), conn.run())
        .await
        .expect("connection should give up on its own");

    let err = result.unwrap_err();
    assert!(err.to_string().contains("timed out reading request"));
    drop(client);
}

#[tokio::test]
async fn test_slow_reader_gets_whole_image() {
    let root = doc_root();
    let image: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
    std::fs::write(root.join("slow.png"), &image).unwrap();

    let (mut client, server) = tokio::io::duplex(256);
    let handle = tokio::spawn(Connection::new(server, site_with_timeout(&root, 1)).run());

    client.write_all(b"GET /slow.png HTTP/1.1\r\n\r\n").await.unwrap();

    // Drains 256 bytes every 100 ms: well past the 1 s deadline in total,
    // but never stalled for a full second.
    let mut raw = Vec::new();
    let mut chunk = [0u8; 256];
    loop {
        let n = client.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..n]);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    handle.await.unwrap().unwrap();

    let reply = Reply::from_raw(&raw);
    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.body.len(), image.len());
    assert_eq!(reply.body, image);
}

#[tokio::test]
async fn test_stalled_reader_times_out() {
    let root = doc_root();
    std::fs::write(root.join("big.png"), vec![0xAB; 64 * 1024]).unwrap();

    let (mut client, server) = tokio::io::duplex(256);
    client.write_all(b"GET /big.png HTTP/1.1\r\n\r\n").await.unwrap();

    // The client never reads the response.
    let conn = Connection::new(server, site_with_timeout(&root, 1));
    let result = tokio::time::timeout(Duration::from_secs(5), conn.run())
        .await
        .expect("connection should give up on its own");

    let err = result.unwrap_err();
    assert!(err.to_string().contains("timed out writing body"));
    drop(client);
}
