use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt};

/// Writes one JSON-RPC message with its `Content-Length` frame.
pub async fn send_msg<W: AsyncWriteExt + Unpin>(writer: &mut W, msg: &str) {
    let frame = format!("Content-Length: {}\r\n\r\n{}", msg.len(), msg);
    writer.write_all(frame.as_bytes()).await.unwrap();
    writer.flush().await.unwrap();
}

/// Reads the next framed message, or `None` once the server hangs up.
pub async fn recv_msg<R: AsyncBufReadExt + Unpin>(reader: &mut R) -> Option<String> {
    let mut length = None;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await.ok()? == 0 {
            return None;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some(value) = header_value(line, "content-length") {
            length = Some(value.parse::<usize>().unwrap_or_else(|e| {
                panic!("bad Content-Length header {line:?}: {e}")
            }));
        }
    }

    let mut body = vec![0u8; length?];
    reader.read_exact(&mut body).await.ok()?;
    Some(String::from_utf8(body).unwrap())
}

fn header_value<'l>(line: &'l str, name: &str) -> Option<&'l str> {
    let (key, value) = line.split_once(':')?;
    key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
}
