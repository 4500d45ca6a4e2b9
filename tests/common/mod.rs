//! Shared fixtures: a mock release API and stub external tools

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tempfile::TempDir;

pub const LABEL: &str = "Linux 64 bit: Binary";

/// Release object the way the GitHub API returns it
pub fn release(tag: &str, labeled: bool) -> Value {
    let mut assets = vec![json!({
        "name": format!("tsetup.{tag}.exe"),
        "label": "Windows 32 bit: Installer",
        "browser_download_url": format!("https://example.invalid/{tag}/tsetup.exe"),
    })];
    if labeled {
        assets.push(json!({
            "name": format!("tsetup.{tag}.tar.xz"),
            "label": LABEL,
            "browser_download_url": format!("https://example.invalid/{tag}/tsetup.{tag}.tar.xz"),
        }));
    }
    json!({ "tag_name": tag, "assets": assets })
}

#[derive(Clone)]
struct MockState {
    releases: Arc<Vec<Value>>,
    status: StatusCode,
    raw_body: Option<&'static str>,
    hits: Arc<AtomicUsize>,
}

impl MockState {
    fn reply(&self, body: Option<Value>) -> Response {
        self.hits.fetch_add(1, Ordering::SeqCst);
        if !self.status.is_success() {
            return self.status.into_response();
        }
        if let Some(raw) = self.raw_body {
            return (StatusCode::OK, raw).into_response();
        }
        match body {
            Some(body) => axum::Json(body).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

async fn list_releases(State(state): State<MockState>) -> Response {
    let body = Value::Array(state.releases.as_ref().clone());
    state.reply(Some(body))
}

async fn latest_release(State(state): State<MockState>) -> Response {
    let body = state.releases.first().cloned();
    state.reply(body)
}

/// In-process stand-in for the GitHub releases API
pub struct MockApi {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl MockApi {
    pub async fn start(releases: Vec<Value>) -> Self {
        Self::start_with(releases, StatusCode::OK, None).await
    }

    pub async fn start_with_status(status: StatusCode) -> Self {
        Self::start_with(Vec::new(), status, None).await
    }

    pub async fn start_with_body(raw_body: &'static str) -> Self {
        Self::start_with(Vec::new(), StatusCode::OK, Some(raw_body)).await
    }

    async fn start_with(releases: Vec<Value>, status: StatusCode, raw_body: Option<&'static str>) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = MockState {
            releases: Arc::new(releases),
            status,
            raw_body,
            hits: hits.clone(),
        };
        let app = Router::new()
            .route("/repos/{owner}/{project}/releases", get(list_releases))
            .route("/repos/{owner}/{project}/releases/latest", get(latest_release))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API");
        let addr = listener.local_addr().expect("Failed to read mock API address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock API stopped");
        });

        Self {
            url: format!("http://{addr}"),
            hits,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

const WGET_STUB: &str = r#"#!/bin/sh
PATH=/usr/bin:/bin
here=$(dirname "$0")
touch "$here/wget-called"
out=""
while [ $# -gt 0 ]; do
    if [ "$1" = "-O" ]; then out="$2"; shift; fi
    shift
done
echo "stub archive" > "$out"
"#;

// Simulates an upstream archive with a top-level Telegram/ directory
const TAR_STUB: &str = r#"#!/bin/sh
PATH=/usr/bin:/bin
target=""
while [ $# -gt 0 ]; do
    if [ "$1" = "-C" ]; then target="$2"; shift; fi
    shift
done
mkdir -p "$target/Telegram"
echo "telegram binary" > "$target/Telegram/Telegram"
chmod 755 "$target/Telegram/Telegram"
"#;

const FPM_STUB: &str = r#"#!/bin/sh
PATH=/usr/bin:/bin
here=$(dirname "$0")
echo "$@" > "$here/fpm-args"
name=""; version=""; type=""; root=""
while [ $# -gt 0 ]; do
    case "$1" in
        --name) name="$2"; shift ;;
        --version) version="$2"; shift ;;
        --output-type) type="$2"; shift ;;
        --chdir) root="$2"; shift ;;
    esac
    shift
done
if [ ! -x "$root/opt/telegram/telegram" ]; then echo "missing executable in $root"; exit 2; fi
if [ ! -f "$root/opt/telegram/Telegram" ]; then echo "missing launcher in $root"; exit 2; fi
if [ ! -f "$root/usr/share/applications/telegram.desktop" ]; then echo "missing desktop entry"; exit 2; fi
echo "package" > "${name}_${version}_amd64.${type}"
echo "Created package {:path=>\"${name}_${version}_amd64.${type}\"}"
"#;

const FAILING_FPM_STUB: &str = r#"#!/bin/sh
echo "bad flag"
exit 1
"#;

/// Directory of stub `wget`, `tar` and `fpm` executables
pub struct StubTools {
    pub dir: TempDir,
}

impl StubTools {
    pub fn new() -> Self {
        Self::with_fpm(FPM_STUB)
    }

    pub fn with_failing_fpm() -> Self {
        Self::with_fpm(FAILING_FPM_STUB)
    }

    fn with_fpm(fpm: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create stub directory");
        write_executable(&dir.path().join("wget"), WGET_STUB);
        write_executable(&dir.path().join("tar"), TAR_STUB);
        write_executable(&dir.path().join("fpm"), fpm);
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn wget_called(&self) -> bool {
        self.path().join("wget-called").exists()
    }

    pub fn fpm_args(&self) -> String {
        fs::read_to_string(self.path().join("fpm-args")).expect("fpm was not invoked")
    }
}

fn write_executable(path: &Path, content: &str) {
    fs::write(path, content).expect("Failed to write stub");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("Failed to chmod stub");
}

/// Auxiliary tree shipped in the repository
pub fn bundled_files_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("files")
}

/// File names directly inside `dir`
pub fn entries(dir: &Path) -> Vec<String> {
    match fs::read_dir(dir) {
        Ok(read) => {
            let mut names: Vec<String> = read
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }
        Err(_) => Vec::new(),
    }
}
