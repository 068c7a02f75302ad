use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::sync::watch;

use crate::handler::Handler;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode, error_page};
use crate::http::writer::ResponseWriter;

const READ_CHUNK: usize = 4096;

pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    handler: Arc<Handler>,
    shutdown: watch::Receiver<bool>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, handler: Arc<Handler>, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            handler,
            shutdown,
            state: ConnectionState::Reading,
        }
    }

    /// Serves requests in arrival order until the client closes, asks to
    /// close, sends garbage, or the server shuts down while idle.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Ok(Some(req)) => ConnectionState::Processing(req),
                        Ok(None) => ConnectionState::Closed,
                        Err(response) => {
                            ConnectionState::Writing(ResponseWriter::new(response, true), false)
                        }
                    };
                }

                ConnectionState::Processing(req) => {
                    let keep_alive = req.keep_alive() && !*self.shutdown.borrow();
                    let mut response = self.handler.handle(&req).await;
                    if !keep_alive {
                        response.set_header("Connection", "close");
                    }

                    let send_body = req.method != Method::HEAD;
                    let writer = ResponseWriter::new(response, send_body);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(mut writer, keep_alive) => {
                    if let Err(e) = writer.write_to_stream(&mut self.stream).await {
                        // Client went away mid-response; nothing else to do for it.
                        tracing::debug!("write aborted: {e}");
                        break;
                    }

                    self.state = if keep_alive {
                        ConnectionState::Reading // go back for next request
                    } else {
                        ConnectionState::Closed
                    };
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }

    /// Reads until one full request is buffered.
    ///
    /// `Ok(None)` means the connection should close quietly. The inner `Err`
    /// carries the status response for a malformed request.
    pub async fn read_request(&mut self) -> anyhow::Result<Result<Option<Request>, Response>> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(Ok(Some(request)));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data
                }

                Err(e) => {
                    tracing::debug!("rejecting malformed request: {e:?}");
                    return Ok(Err(self.reject(e)));
                }
            }

            if *self.shutdown.borrow() && self.buffer.is_empty() {
                return Ok(Ok(None));
            }

            self.buffer.reserve(READ_CHUNK);
            let n = tokio::select! {
                n = self.stream.read_buf(&mut self.buffer) => n?,
                _ = self.shutdown.changed(), if self.buffer.is_empty() => {
                    return Ok(Ok(None));
                }
            };

            if n == 0 {
                // Client closed connection
                return Ok(Ok(None));
            }
        }
    }

    fn reject(&self, err: ParseError) -> Response {
        let status = match err {
            ParseError::BodyTooLarge => StatusCode::PayloadTooLarge,
            ParseError::UnsupportedVersion => StatusCode::HttpVersionNotSupported,
            _ => StatusCode::BadRequest,
        };
        let mut response = error_page(status);
        self.handler.decorate(&mut response);
        response.set_header("Connection", "close");
        response
    }
}
