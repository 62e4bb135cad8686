//! Test harness: serves a temporary directory on a loopback port and sends
//! raw HTTP/1.1 requests with hyper's client connection API.

#![allow(dead_code)]

use cachebox::config::{AppState, Config};
use cachebox::server;
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::header::HOST;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::sync::oneshot;

pub struct TestServer {
    pub addr: SocketAddr,
    pub root: TempDir,
    shutdown: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a server over a fresh directory holding `files` (path, contents)
    pub async fn start(files: &[(&str, &str)]) -> Self {
        Self::start_with(files, |_| {}).await
    }

    pub async fn start_with(files: &[(&str, &str)], configure: impl FnOnce(&mut Config)) -> Self {
        let root = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            write_file(root.path(), name, contents.as_bytes());
        }

        let mut config = Config::default();
        config.server.root = root.path().to_string_lossy().into_owned();
        config.logging.access_log = false;
        configure(&mut config);

        let listener = server::create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(config));

        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(server::serve_until(listener, state, async move {
            let _ = rx.await;
            "test shutdown"
        }));

        Self {
            addr,
            root,
            shutdown: Some(tx),
            task,
        }
    }

    pub async fn get(&self, path: &str) -> Response<Bytes> {
        self.request(Method::GET, path, &[]).await
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        headers: &[(&str, &str)],
    ) -> Response<Bytes> {
        let stream = TcpStream::connect(self.addr).await.unwrap();
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(HOST, self.addr.to_string());
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let req = builder.body(Empty::<Bytes>::new()).unwrap();

        let resp = sender.send_request(req).await.unwrap();
        let (parts, body) = resp.into_parts();
        let body = body.collect().await.unwrap().to_bytes();
        Response::from_parts(parts, body)
    }

    /// Stop accepting and wait for the accept loop to return
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.task).await.unwrap();
    }
}

pub fn write_file(root: &Path, name: &str, contents: &[u8]) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}
