use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes the status line and headers, including the blank separator line.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers, sorted so the output is stable
    let mut headers: Vec<_> = resp.headers.iter().collect();
    headers.sort();
    for (k, v) in headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response to a client stream.
pub struct ResponseWriter {
    head: Vec<u8>,
    body: Body,
}

impl ResponseWriter {
    /// `send_body` is false for HEAD requests: headers still advertise the
    /// body length but no body bytes follow.
    pub fn new(response: Response, send_body: bool) -> Self {
        let head = serialize_head(&response);
        let body = if send_body { response.body } else { Body::Empty };
        Self { head, body }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(&self.head).await?;

        match &mut self.body {
            Body::Empty => {}
            Body::Bytes(bytes) => stream.write_all(bytes).await?,
            Body::File { file, len } => {
                // Never send more than the advertised Content-Length.
                let mut limited = file.take(*len);
                let copied = tokio::io::copy(&mut limited, stream).await?;
                if copied != *len {
                    anyhow::bail!("file shrank while streaming: sent {copied} of {len} bytes");
                }
            }
        }

        stream.flush().await?;
        Ok(())
    }
}
