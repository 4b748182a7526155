//! Canned QuickCheck page and a one-shot HTTP server for tests.
//!
//! The server runs on a plain `std` thread so that fetches can be exercised
//! without network access.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;

/// Trimmed copy of the status page as served to a device on the mobile network
pub const QUICKCHECK_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Vodafone QuickCheck</title></head>
<body>
<table width="100%"><tr><td><img src="logo.gif" alt="Vodafone"></td></tr></table>
<table width="100%">
  <tr>
    <td class="hd1">Ihr Datenvolumen</td>
    <td align="right"><span class="hd1">seit dem 01.03.2024</span></td>
  </tr>
</table>
<table width="100%">
  <tr><td>Tarif</td><td>Vodafone Red</td></tr>
  <tr><td>Inklusiv</td><td>Verbraucht</td></tr>
  <tr><td colspan="2">&nbsp;</td></tr>
  <tr><td>10 GB</td><td>3 GB</td><td>Stand: heute</td></tr>
</table>
</body>
</html>
"#;

/// Serve one response on an ephemeral local port and return its URL.
///
/// `content_type` of `None` omits the header.
pub fn serve_once(status_line: &str, content_type: Option<&str>, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let mut response = format!("HTTP/1.1 {}\r\n", status_line);
    if let Some(content_type) = content_type {
        response.push_str(&format!("Content-Type: {}\r\n", content_type));
    }
    response.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    ));

    std::thread::spawn(move || {
        let (mut stream, _) = match listener.accept() {
            Ok(conn) => conn,
            Err(_) => return,
        };

        // drain the request head before answering
        if let Ok(read_half) = stream.try_clone() {
            let mut reader = BufReader::new(read_half);
            let mut line = String::new();
            while matches!(reader.read_line(&mut line), Ok(n) if n > 0) {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
        }

        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    });

    format!("http://{}/", addr)
}

/// URL of a local port with nothing listening on it
pub fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}
