//! Shared utilities for integration testing.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use case_server::config::ServerConfig;
use case_server::{HttpServer, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A server running on an ephemeral port over a temporary tree.
///
/// The server stops when this is dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    pub root: TempDir,
    _shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a server over `root`, letting the caller adjust the config first.
pub async fn start_server<F>(root: TempDir, tweak: F) -> TestServer
where
    F: FnOnce(&mut ServerConfig),
{
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.site.root = root.path().to_path_buf();
    tweak(&mut config);

    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        root,
        _shutdown: shutdown,
    }
}

/// Build the tree most tests share:
///
/// ```text
/// index.html          (root index)
/// page.html
/// tool.py             (script)
/// docs/index.html
/// files/a.txt, files/b.txt, files/.hidden
/// ```
pub fn site_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "index.html", "<h1>home</h1>");
    write(dir.path(), "page.html", "<p>plain page</p>");
    write(dir.path(), "tool.py", "echo '<p>from script</p>'\n");
    write(dir.path(), "docs/index.html", "<h1>docs index</h1>");
    write(dir.path(), "files/a.txt", "a");
    write(dir.path(), "files/b.txt", "b");
    write(dir.path(), "files/.hidden", "h");
    dir
}

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
