//! Server-Sent Events decoding for the streaming generation endpoints.

use crate::Error;
use futures_util::{Stream, StreamExt};
use memchr::memmem;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Upper bound on bytes buffered while waiting for an event separator.
const MAX_BUFFERED_BYTES: usize = 1_000_000;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A Server-Sent Events (SSE) event.
#[derive(Debug, Clone, PartialEq)]
pub struct SseEvent {
    /// Event type (optional).
    pub event_type: Option<String>,
    /// Event data; multiple `data:` lines are joined with `\n`.
    pub data: String,
}

impl SseEvent {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            event_type: None,
            data: data.into(),
        }
    }

    /// `[DONE]` sentinel some gateways append after the last chunk.
    pub fn is_done(&self) -> bool {
        self.data.trim() == "[DONE]"
    }
}

/// Incremental SSE decoder over raw byte chunks.
///
/// Events may be split anywhere, including inside a multi-byte UTF-8
/// sequence; bytes are only decoded once a full event is buffered.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    started: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseEvent>, Error> {
        let mut chunk = chunk;
        if !self.started && !chunk.is_empty() {
            self.started = true;
            chunk = chunk.strip_prefix(UTF8_BOM).unwrap_or(chunk);
        }

        // CR bytes never carry meaning inside JSON payloads; dropping them
        // turns CRLF framing into plain LF framing.
        self.buffer.extend(chunk.iter().copied().filter(|&b| b != b'\r'));

        if self.buffer.len() > MAX_BUFFERED_BYTES {
            self.buffer.clear();
            return Err(Error::streaming("SSE buffer exceeded maximum size"));
        }

        let finder = memmem::Finder::new(b"\n\n");
        let mut events = Vec::new();
        let mut start = 0;

        while let Some(pos) = finder.find(&self.buffer[start..]) {
            let end = start + pos;
            let text = std::str::from_utf8(&self.buffer[start..end])
                .map_err(|e| Error::streaming(format!("Invalid UTF-8 in SSE event: {e}")))?;
            events.extend(parse_event(text));
            start = end + 2;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }

        Ok(events)
    }

    /// Flush whatever is left once the byte stream has ended.
    ///
    /// Gemini may close the stream without a trailing blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        let text = std::str::from_utf8(&rest).ok()?.trim();
        if text.is_empty() {
            return None;
        }
        let event = parse_event(text);
        if event.is_none() {
            tracing::warn!(bytes = rest.len(), "discarding trailing SSE data without a data field");
        }
        event
    }
}

/// Parse one complete event block. Blocks without `data:` lines yield nothing.
fn parse_event(text: &str) -> Option<SseEvent> {
    let mut event_type = None;
    let mut data_lines = Vec::new();

    for line in text.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "event" => event_type = Some(value.to_string()),
            "data" => data_lines.push(value),
            _ => {}
        }
    }

    if data_lines.is_empty() {
        return None;
    }

    Some(SseEvent {
        event_type,
        data: data_lines.join("\n"),
    })
}

/// A stream adapter yielding SSE events from a byte stream.
pub struct SseStream<S> {
    inner: S,
    decoder: SseDecoder,
    pending: VecDeque<SseEvent>,
    finished: bool,
}

impl<S> SseStream<S> {
    pub fn new(stream: S) -> Self {
        Self {
            inner: stream,
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }
}

impl<S, E> Stream for SseStream<S>
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    type Item = Result<SseEvent, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }
            if self.finished {
                return Poll::Ready(None);
            }

            match ready!(self.inner.poll_next_unpin(cx)) {
                Some(Ok(chunk)) => match self.decoder.push(&chunk) {
                    Ok(events) => self.pending.extend(events),
                    Err(e) => return Poll::Ready(Some(Err(e))),
                },
                Some(Err(e)) => {
                    return Poll::Ready(Some(Err(Error::streaming(format!("Stream error: {e}")))));
                }
                None => {
                    self.finished = true;
                    if let Some(event) = self.decoder.finish() {
                        self.pending.push_back(event);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = Result<bytes::Bytes, std::io::Error>> {
        let parts = parts.to_vec();
        stream::iter(parts.into_iter().map(|p| Ok(bytes::Bytes::from_static(p))))
    }

    #[tokio::test]
    async fn test_split_events() {
        let parts: [&[u8]; 3] = [b"data: Hel", b"lo World\n\ndata: ", b"Second\n\n"];
        let mut events = SseStream::new(chunks(&parts));

        assert_eq!(events.next().await.unwrap().unwrap().data, "Hello World");
        assert_eq!(events.next().await.unwrap().unwrap().data, "Second");
        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn test_multiline_data_and_event_type() {
        let parts: [&[u8]; 1] = [b"event: chunk\ndata: Line 1\ndata: Line 2\n\n"];
        let mut events = SseStream::new(chunks(&parts));

        let event = events.next().await.unwrap().unwrap();
        assert_eq!(event.event_type.as_deref(), Some("chunk"));
        assert_eq!(event.data, "Line 1\nLine 2");
    }

    #[tokio::test]
    async fn test_crlf_framing_and_bom() {
        let parts: [&[u8]; 2] = [b"\xEF\xBB\xBFdata: one\r\n\r\ndata: two\r", b"\n\r\n"];
        let mut events = SseStream::new(chunks(&parts));

        assert_eq!(events.next().await.unwrap().unwrap().data, "one");
        assert_eq!(events.next().await.unwrap().unwrap().data, "two");
        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn test_utf8_split_across_chunks() {
        // "é" is C3 A9
        let parts: [&[u8]; 2] = [b"data: caf\xC3", b"\xA9\n\n"];
        let mut events = SseStream::new(chunks(&parts));
        assert_eq!(events.next().await.unwrap().unwrap().data, "café");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_an_error() {
        let parts: [&[u8]; 1] = [b"data: bad \xFF\xFE\n\n"];
        let mut events = SseStream::new(chunks(&parts));
        assert!(events.next().await.unwrap().is_err());
    }

    #[tokio::test]
    async fn test_stream_ends_without_final_separator() {
        let parts: [&[u8]; 2] = [b"data: first\n\n", b"data: [DONE]"];
        let mut events = SseStream::new(chunks(&parts));

        assert_eq!(events.next().await.unwrap().unwrap().data, "first");
        assert!(events.next().await.unwrap().unwrap().is_done());
        assert!(events.next().await.is_none());
    }

    #[test]
    fn test_comments_and_blocks_without_data_are_skipped() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b": keep-alive\n\nevent: ping\n\ndata: x\n\n").unwrap();
        assert_eq!(events, vec![SseEvent::new("x")]);
        assert!(decoder.finish().is_none());
    }
}
