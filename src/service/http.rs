// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Minimal HTTP/1.1 client for the floor-plan service.
//!
//! One connection per request (`Connection: close`), JSON bodies, multipart image upload, and
//! both `Content-Length` and chunked responses. Plain `http://` only.

use std::io;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::types::{
    Confirmation, ErrorPayload, GridDocument, GridPayload, ImageDataResponse, ImageUploadResponse,
    PathRequest, PathResponse, ProductPayload,
};
use super::{
    Backend, Endpoint, GridStore, ImageStore, Pathfinder, ProductStore, ServiceError, ServiceFuture,
};
use crate::config::ServiceConfig;

const MAX_ERROR_DETAIL: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBackend {
    host: String,
    port: u16,
    base_path: String,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let (host, port, base_path) = parse_base_url(base_url)?;
        Ok(Self { host, port, base_path, timeout })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.base_path)
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        method: &str,
        route: &str,
        body: Option<(&str, Vec<u8>)>,
    ) -> Result<HttpResponse, ServiceError> {
        let path = format!("{}{}", self.base_path, route);
        tracing::info!(%endpoint, method, %path, "service request");
        let request = encode_request(method, &self.host, self.port, &path, body);

        let exchange = async {
            let mut stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
            stream.write_all(&request).await?;
            stream.flush().await?;
            let mut raw = Vec::new();
            stream.read_to_end(&mut raw).await?;
            Ok::<_, io::Error>(raw)
        };

        let raw = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(source)) => {
                tracing::warn!(%endpoint, error = %source, "service transport error");
                return Err(ServiceError::Transport { endpoint, source });
            }
            Err(_) => {
                tracing::warn!(%endpoint, timeout_ms = self.timeout.as_millis() as u64, "service timeout");
                return Err(ServiceError::Timeout { endpoint, after: self.timeout });
            }
        };

        let response =
            parse_response(&raw).map_err(|reason| ServiceError::Decode { endpoint, reason })?;
        tracing::debug!(%endpoint, status = response.status, bytes = response.body.len(), "service response");
        if !(200..300).contains(&response.status) {
            return Err(ServiceError::Status {
                endpoint,
                status: response.status,
                detail: error_detail(&response.body),
            });
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        method: &str,
        route: &str,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<T, ServiceError> {
        let body = match body {
            Some(value) => Some((
                "application/json",
                serde_json::to_vec(value)
                    .map_err(|err| ServiceError::Decode { endpoint, reason: err.to_string() })?,
            )),
            None => None,
        };
        let response = self.send(endpoint, method, route, body).await?;
        serde_json::from_slice(&response.body)
            .map_err(|err| ServiceError::Decode { endpoint, reason: err.to_string() })
    }
}

/// Splits `http://host[:port][/prefix]` into its parts; the prefix never ends with `/`.
fn parse_base_url(url: &str) -> Result<(String, u16, String), ServiceError> {
    let invalid = |reason| ServiceError::InvalidUrl { url: url.to_owned(), reason };
    if url.starts_with("https://") {
        return Err(invalid("https is not supported; use a plain http:// endpoint"));
    }
    let rest = url.strip_prefix("http://").ok_or_else(|| invalid("expected an http:// url"))?;
    let (authority, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    };
    if authority.starts_with('[') {
        return Err(invalid("IPv6 literals are not supported; use a host name or IPv4 address"));
    }
    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, port.parse::<u16>().map_err(|_| invalid("invalid port"))?),
        None => (authority, 80),
    };
    if host.is_empty() {
        return Err(invalid("missing host"));
    }
    Ok((host.to_owned(), port, path.trim_end_matches('/').to_owned()))
}

fn checked_id(id: &str) -> Result<&str, ServiceError> {
    if id.is_empty() || id.contains('/') || id.contains(char::is_whitespace) {
        return Err(ServiceError::InvalidUrl {
            url: id.to_owned(),
            reason: "ids must be non-empty and contain no '/' or whitespace",
        });
    }
    Ok(id)
}

fn encode_request(
    method: &str,
    host: &str,
    port: u16,
    path: &str,
    body: Option<(&str, Vec<u8>)>,
) -> Vec<u8> {
    let mut head = format!(
        "{method} {path} HTTP/1.1\r\nHost: {host}:{port}\r\nAccept: application/json\r\nConnection: close\r\n"
    );
    let payload = match body {
        Some((content_type, bytes)) => {
            head.push_str(&format!("Content-Type: {content_type}\r\n"));
            bytes
        }
        None => Vec::new(),
    };
    head.push_str(&format!("Content-Length: {}\r\n\r\n", payload.len()));
    let mut out = head.into_bytes();
    out.extend_from_slice(&payload);
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HttpResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl HttpResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn parse_response(raw: &[u8]) -> Result<HttpResponse, String> {
    let head_end = memchr::memmem::find(raw, b"\r\n\r\n")
        .ok_or_else(|| "response ended before the header block".to_owned())?;
    let head = std::str::from_utf8(&raw[..head_end]).map_err(|_| "non-utf8 header".to_owned())?;
    let mut lines = head.split("\r\n");

    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/1.") {
        return Err(format!("unexpected status line {status_line:?}"));
    }
    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| format!("unexpected status line {status_line:?}"))?;

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .collect::<Vec<_>>();

    let mut response = HttpResponse { status, headers, body: Vec::new() };
    let body = &raw[head_end + 4..];
    let chunked = response
        .header("transfer-encoding")
        .is_some_and(|value| value.to_ascii_lowercase().contains("chunked"));
    response.body = if chunked {
        decode_chunked(body)?
    } else if let Some(length) = response.header("content-length") {
        let length = length.parse::<usize>().map_err(|_| format!("bad content-length {length:?}"))?;
        if body.len() < length {
            return Err(format!("body truncated ({} of {length} bytes)", body.len()));
        }
        body[..length].to_vec()
    } else {
        body.to_vec()
    };
    Ok(response)
}

fn decode_chunked(mut body: &[u8]) -> Result<Vec<u8>, String> {
    let mut out = Vec::new();
    loop {
        let line_end =
            memchr::memmem::find(body, b"\r\n").ok_or_else(|| "chunk size line missing".to_owned())?;
        let size_line = std::str::from_utf8(&body[..line_end]).map_err(|_| "bad chunk size".to_owned())?;
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size =
            usize::from_str_radix(size_hex, 16).map_err(|_| format!("bad chunk size {size_hex:?}"))?;
        body = &body[line_end + 2..];
        if size == 0 {
            return Ok(out);
        }
        let chunk_end = size
            .checked_add(2)
            .filter(|&end| body.len() >= end)
            .ok_or_else(|| "chunk truncated".to_owned())?;
        out.extend_from_slice(&body[..size]);
        body = &body[chunk_end..];
    }
}

fn error_detail(body: &[u8]) -> String {
    if let Ok(payload) = serde_json::from_slice::<ErrorPayload>(body) {
        return payload.message();
    }
    let text = String::from_utf8_lossy(body);
    crate::render::truncate_with_ellipsis(text.trim(), MAX_ERROR_DETAIL)
}

fn multipart_boundary() -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
    format!("floorgrid-{nanos:x}")
}

/// Single `file` field, the only form the upload endpoint accepts.
fn encode_multipart(boundary: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mime = image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    let file_name = file_name.replace('"', "");
    let mut out = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
    )
    .into_bytes();
    out.extend_from_slice(bytes);
    out.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    out
}

/// Image bytes from either a raw body or a JSON `{image|data: base64}` body.
fn decode_image_body(endpoint: Endpoint, response: HttpResponse) -> Result<Vec<u8>, ServiceError> {
    let is_json = response
        .header("content-type")
        .is_some_and(|value| value.to_ascii_lowercase().starts_with("application/json"));
    if !is_json {
        return Ok(response.body);
    }
    let decode = |reason: String| ServiceError::Decode { endpoint, reason };
    let payload: ImageDataResponse =
        serde_json::from_slice(&response.body).map_err(|err| decode(err.to_string()))?;
    let encoded = payload
        .image
        .or(payload.data)
        .ok_or_else(|| decode("no image data in response".to_owned()))?;
    // Data URLs carry a `data:<mime>;base64,` prefix.
    let encoded = encoded.rsplit_once(',').map_or(encoded.as_str(), |(_, data)| data);
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|err| decode(err.to_string()))
}

impl GridStore for HttpBackend {
    fn save_grid(&self, payload: GridPayload) -> ServiceFuture<'_, GridDocument> {
        Box::pin(async move {
            self.json(Endpoint::SaveGrid, "POST", "/api/grid/", Some(&payload)).await
        })
    }

    fn list_grids(&self) -> ServiceFuture<'_, Vec<GridDocument>> {
        Box::pin(async move {
            self.json(Endpoint::ListGrids, "GET", "/api/grid/", None::<&()>).await
        })
    }

    fn load_grid(&self, grid_id: String) -> ServiceFuture<'_, GridDocument> {
        Box::pin(async move {
            let route = format!("/api/grid/{}", checked_id(&grid_id)?);
            self.json(Endpoint::LoadGrid, "GET", &route, None::<&()>).await
        })
    }

    fn delete_grid(&self, grid_id: String) -> ServiceFuture<'_, Confirmation> {
        Box::pin(async move {
            let route = format!("/api/grid/{}", checked_id(&grid_id)?);
            self.json(Endpoint::DeleteGrid, "DELETE", &route, None::<&()>).await
        })
    }
}

impl ImageStore for HttpBackend {
    fn upload_image(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> ServiceFuture<'_, ImageUploadResponse> {
        Box::pin(async move {
            let endpoint = Endpoint::UploadImage;
            let boundary = multipart_boundary();
            let content_type = format!("multipart/form-data; boundary={boundary}");
            let body = encode_multipart(&boundary, &file_name, &bytes);
            let response =
                self.send(endpoint, "POST", "/api/upload-image/", Some((&content_type, body))).await?;
            serde_json::from_slice(&response.body)
                .map_err(|err| ServiceError::Decode { endpoint, reason: err.to_string() })
        })
    }

    fn fetch_image(&self, image_id: String) -> ServiceFuture<'_, Vec<u8>> {
        Box::pin(async move {
            let endpoint = Endpoint::FetchImage;
            let route = format!("/api/image/{}", checked_id(&image_id)?);
            let response = self.send(endpoint, "GET", &route, None).await?;
            decode_image_body(endpoint, response)
        })
    }
}

impl Pathfinder for HttpBackend {
    fn find_path(&self, request: PathRequest) -> ServiceFuture<'_, PathResponse> {
        Box::pin(async move {
            self.json(Endpoint::FindPath, "POST", "/api/pathfinding/", Some(&request)).await
        })
    }
}

impl ProductStore for HttpBackend {
    fn save_product(&self, product: ProductPayload) -> ServiceFuture<'_, Confirmation> {
        Box::pin(async move {
            self.json(Endpoint::SaveProduct, "POST", "/api/save_product", Some(&product)).await
        })
    }
}

impl Backend for HttpBackend {
    fn describe(&self) -> String {
        self.base_url()
    }
}
