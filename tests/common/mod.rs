//! Shared fixtures: a throwaway document root populated per test.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use devserve::config::Config;
use devserve::http::response::{Body, Response};
use tempfile::TempDir;
use tokio::io::AsyncReadExt;

pub const INDEX: &[u8] = b"<!DOCTYPE html><title>app shell</title>";

pub struct Site {
    _tmp: TempDir,
    pub dir: PathBuf,
    pub root: PathBuf,
}

impl Site {
    /// Empty site; `root` is `<dir>/public` so tests can plant files beside it.
    pub fn empty() -> Self {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_path_buf();
        let root = dir.join("public");
        std::fs::create_dir_all(&root).unwrap();
        Self {
            _tmp: tmp,
            dir,
            root,
        }
    }

    /// Site with a root index, a page, a nested directory with its own
    /// index, an asset, and a secret outside the root.
    pub fn standard() -> Self {
        let site = Self::empty();
        site.file("index.html", INDEX);
        site.file("login.html", b"<h1>login</h1>");
        site.file("docs/index.html", b"<h1>docs</h1>");
        site.file("assets/app.js", b"console.log('hi');");
        site.file("empty/.keep", b"");
        std::fs::write(site.dir.join("secret.txt"), b"top secret").unwrap();
        site
    }

    pub fn file(&self, rel: &str, contents: &[u8]) -> &Self {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
        self
    }

    pub fn remove(&self, rel: &str) {
        std::fs::remove_file(self.root.join(rel)).unwrap();
    }

    pub fn canonical(&self, rel: &str) -> PathBuf {
        self.root.join(rel).canonicalize().unwrap()
    }

    pub fn config(&self, spa_fallback: bool, cors: bool) -> Config {
        Config {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            document_root: self.root.clone(),
            enable_spa_fallback: spa_fallback,
            enable_cors: cors,
            shutdown_grace_secs: 1,
            ..Config::default()
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Drains a response body, reading streamed files to the end.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    match response.body {
        Body::Empty => Vec::new(),
        Body::Bytes(bytes) => bytes,
        Body::File { mut file, .. } => {
            let mut out = Vec::new();
            file.read_to_end(&mut out).await.unwrap();
            out
        }
    }
}
