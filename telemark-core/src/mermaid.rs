// Copyright (c) UnnamedOrange. Licensed under the MIT License.
// See the LICENSE file in the repository root for full license text.

//! Remote rendering of mermaid sources through mermaid.ink.
//!
//! The diagram source plus its rendering configuration is serialized to
//! JSON, DEFLATE-compressed and URL-safe base64 encoded into the `pako:`
//! token both mermaid.ink and mermaid.live accept. One GET with a bounded
//! timeout fetches the raster; responses are kept in a small in-process
//! cache so identical diagrams within a conversion batch hit the network
//! once.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use serde::Serialize;

/// Contract of the remote rendering collaborator. Any transport, timeout or
/// non-image-response condition is an error; the interpreter recovers from
/// it locally.
pub trait DiagramRenderer {
    fn render(&self, source: &str) -> crate::Result<RenderedDiagram>;
}

#[derive(Debug, Clone)]
pub struct RenderedDiagram {
    pub image: Vec<u8>,
    /// Link to an editable version of the diagram, used as the photo caption.
    pub edit_url: String,
}

// mermaid.ink rejects requests carrying a default client agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Serialize)]
struct GraphPayload<'a> {
    code: &'a str,
    mermaid: GraphConfig<'a>,
}

#[derive(Serialize)]
struct GraphConfig<'a> {
    theme: &'a str,
}

pub struct MermaidInkClient {
    http: reqwest::blocking::Client,
    theme: String,
    cache: Mutex<HashMap<String, (Instant, Vec<u8>)>>,
}

impl MermaidInkClient {
    pub fn new() -> crate::Result<Self> {
        Self::with_theme("neutral")
    }

    pub fn with_theme(theme: &str) -> crate::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            theme: theme.to_string(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    fn pako_token(&self, source: &str) -> crate::Result<String> {
        let payload = GraphPayload {
            code: source,
            mermaid: GraphConfig { theme: &self.theme },
        };
        let json = serde_json::to_vec(&payload)?;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&json)?;
        let compressed = encoder.finish()?;
        Ok(format!("pako:{}", URL_SAFE.encode(compressed)))
    }

    fn image_url(&self, token: &str) -> String {
        format!(
            "https://mermaid.ink/img/{token}?theme={}&width=500&scale=2&type=webp",
            self.theme
        )
    }

    fn edit_url(token: &str) -> String {
        format!("https://mermaid.live/edit/#{token}")
    }

    fn cached(&self, url: &str) -> Option<Vec<u8>> {
        let cache = self.cache.lock().ok()?;
        let (fetched_at, bytes) = cache.get(url)?;
        (fetched_at.elapsed() < CACHE_TTL).then(|| bytes.clone())
    }

    fn store(&self, url: &str, bytes: Vec<u8>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(url.to_string(), (Instant::now(), bytes));
        }
    }

    fn fetch(&self, url: &str) -> crate::Result<Vec<u8>> {
        if let Some(bytes) = self.cached(url) {
            return Ok(bytes);
        }
        tracing::debug!("downloading rendered diagram from {url}");
        let response = self.http.get(url).send()?.error_for_status()?;
        let bytes = response.bytes()?.to_vec();
        self.store(url, bytes.clone());
        Ok(bytes)
    }
}

impl DiagramRenderer for MermaidInkClient {
    fn render(&self, source: &str) -> crate::Result<RenderedDiagram> {
        let token = self.pako_token(source)?;
        let bytes = self.fetch(&self.image_url(&token))?;
        if !looks_like_image(&bytes) {
            tracing::debug!("diagram response is not a decodable image");
            return Err("diagram service did not return an image".into());
        }
        Ok(RenderedDiagram {
            image: bytes,
            edit_url: Self::edit_url(&token),
        })
    }
}

/// Magic-byte check over the formats the service can produce.
fn looks_like_image(data: &[u8]) -> bool {
    data.starts_with(b"\x89PNG\r\n\x1a\n")
        || data.starts_with(&[0xFF, 0xD8, 0xFF])
        || data.starts_with(b"GIF87a")
        || data.starts_with(b"GIF89a")
        || (data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP")
}
