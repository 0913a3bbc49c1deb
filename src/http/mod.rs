/*!
Request construction and dispatch.

build_request -> reqwest blocking `Request`
  - URL: http:// + address + path
  - GET  + params: form-urlencoded query string
  - POST + params (no explicit body): form-urlencoded body
  - POST always carries `Content-Type: application/x-www-form-urlencoded`
  - basic auth (empty user, API password) + User-Agent

Paths the URL parser would rewrite (dot segments, `?`, `#`, `\`, control
characters) are rejected, so the path sent is the path that was matched.

default_client -> reqwest defaults minus the total request timeout.
dispatch -> send, copy the body verbatim. The HTTP status is not inspected.
*/

use std::io::{ErrorKind, Read, Write};

use reqwest::Method;
use reqwest::blocking::{Client, ClientBuilder, Request};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use url::{Url, form_urlencoded};

use crate::cmd::parse::Params;
use crate::error::CliError;

pub const SCHEME: &str = "http://";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Everything needed to build one request.
#[derive(Debug, Clone, Copy)]
pub struct RequestSpec<'a> {
    pub method: &'a str,
    pub api_address: &'a str,
    pub request_path: &'a str,
    pub api_password: &'a str,
    pub user_agent: &'a str,
    pub params: &'a Params,
}

/// Client settings with no overall timeout; the body is relayed however long
/// it takes.
pub fn client_builder() -> ClientBuilder {
    Client::builder().timeout(None)
}

pub fn default_client() -> Result<Client, CliError> {
    client_builder().build().map_err(CliError::Transport)
}

/// Fails when `Url::parse` would not keep `path` as written.
pub fn check_request_path(path: &str) -> Result<(), CliError> {
    if let Some(c) = path
        .chars()
        .find(|c| matches!(c, '?' | '#' | '\\') || c.is_control())
    {
        return Err(CliError::Build(format!(
            "request path '{path}' contains '{}'",
            c.escape_default()
        )));
    }
    for seg in path.split('/') {
        let decoded = seg.to_ascii_lowercase().replace("%2e", ".");
        if decoded == "." || decoded == ".." {
            return Err(CliError::Build(format!(
                "request path '{path}' contains a '{seg}' segment"
            )));
        }
    }
    Ok(())
}

/// Encode params as `application/x-www-form-urlencoded` (keys sorted,
/// repeated values in order).
pub fn encode_params(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, values) in params {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}

pub fn build_request(
    client: &Client,
    spec: &RequestSpec<'_>,
    body: Option<Vec<u8>>,
) -> Result<Request, CliError> {
    let method = Method::from_bytes(spec.method.as_bytes())
        .map_err(|e| CliError::Build(format!("invalid method '{}': {e}", spec.method)))?;

    check_request_path(spec.request_path)?;
    let raw = format!("{SCHEME}{}{}", spec.api_address, spec.request_path);
    let mut url = Url::parse(&raw).map_err(|e| CliError::Build(format!("{raw}: {e}")))?;

    let has_params = !spec.params.is_empty();
    let mut body = body;
    if method == Method::GET && has_params {
        url.set_query(Some(&encode_params(spec.params)));
    } else if method == Method::POST && body.is_none() && has_params {
        body = Some(encode_params(spec.params).into_bytes());
    }

    log::info!("{method} {url}");

    let mut builder = client
        .request(method.clone(), url)
        .basic_auth("", Some(spec.api_password))
        .header(USER_AGENT, spec.user_agent);

    if method == Method::POST {
        builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE);
    }
    if let Some(body) = body {
        builder = builder.body(body);
    }

    builder.build().map_err(|e| CliError::Build(e.to_string()))
}

/// Send `request` and copy the response body into `out`. Returns the number
/// of body bytes written.
pub fn dispatch<W: Write>(
    client: &Client,
    request: Request,
    out: &mut W,
) -> Result<u64, CliError> {
    let mut response = client.execute(request).map_err(CliError::Transport)?;
    log::debug!("{} from {}", response.status(), response.url());

    let copied = relay_body(&mut response, out)?;
    log::debug!("relayed {copied} body bytes");
    Ok(copied)
}

/// Copy `body` into `out`. Read failures are `BodyRead`, write failures `Output`.
fn relay_body<R: Read, W: Write>(body: &mut R, out: &mut W) -> Result<u64, CliError> {
    let mut buf = [0u8; 8 * 1024];
    let mut copied = 0u64;
    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CliError::BodyRead(e.to_string())),
        };
        out.write_all(&buf[..n])
            .map_err(|e| CliError::Output(e.to_string()))?;
        copied += n as u64;
    }
    out.flush().map_err(|e| CliError::Output(e.to_string()))?;
    Ok(copied)
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    /// One-shot HTTP server: replies with `status_line` and `body`, reports
    /// the raw request (head and body) back through the channel.
    pub(crate) fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let head_len = buf
                .windows(4)
                .position(|w| w == b"\r\n\r\n")
                .map(|p| p + 4)
                .unwrap_or(buf.len());
            let head = String::from_utf8_lossy(&buf[..head_len]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buf.len() < head_len + body_len {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let _ = tx.send(String::from_utf8_lossy(&buf).to_string());
            let reply = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).unwrap();
        });
        (addr, rx)
    }

    /// Sends the head plus `first`, sleeps `stall`, then sends `rest`.
    pub(crate) fn serve_stalled(
        first: &'static str,
        stall: std::time::Duration,
        rest: &'static str,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{first}",
                first.len() + rest.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.flush().unwrap();
            std::thread::sleep(stall);
            let _ = stream.write_all(rest.as_bytes());
        });
        addr
    }
}
