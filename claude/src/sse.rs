//! Server-sent event decoding for streamed replies.

use serde::Deserialize;

use crate::error::Error;
use crate::messages::StopReason;

/// What a streamed reply reports as it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Started { id: String, model: String },
    Text(String),
    Stopping(Option<StopReason>),
    Done,
    Ping,
    Failed(String),
    /// Frames with nothing for a text-only caller (block boundaries, tool deltas).
    Skipped,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Frame {
    MessageStart { message: Started },
    ContentBlockDelta { delta: Delta },
    MessageDelta { delta: Stopping },
    MessageStop,
    Ping,
    Error { error: Failure },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct Started {
    id: String,
    model: String,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct Stopping {
    stop_reason: Option<StopReason>,
}

#[derive(Deserialize)]
pub(crate) struct Failure {
    pub(crate) message: String,
}

impl From<Frame> for StreamEvent {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::MessageStart { message } => StreamEvent::Started {
                id: message.id,
                model: message.model,
            },
            Frame::ContentBlockDelta {
                delta: Delta::TextDelta { text },
            } => StreamEvent::Text(text),
            Frame::MessageDelta { delta } => StreamEvent::Stopping(delta.stop_reason),
            Frame::MessageStop => StreamEvent::Done,
            Frame::Ping => StreamEvent::Ping,
            Frame::Error { error } => StreamEvent::Failed(error.message),
            Frame::ContentBlockDelta { .. } | Frame::Other => StreamEvent::Skipped,
        }
    }
}

/// Bytes received so far that don't yet end in a newline.
///
/// Kept as raw bytes so a multi-byte character split across network
/// chunks is decoded only once the whole line is in.
#[derive(Debug, Default)]
pub(crate) struct SseBuffer {
    pending: Vec<u8>,
}

impl SseBuffer {
    /// Append a chunk and decode every line it completes.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<Result<StreamEvent, Error>> {
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(end) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = decode_line(line.trim_end_matches(['\n', '\r'])) {
                events.push(event);
            }
        }
        events
    }
}

/// Only `data:` lines carry payloads; `event:` names repeat the JSON `type`.
fn decode_line(line: &str) -> Option<Result<StreamEvent, Error>> {
    let data = line.strip_prefix("data:")?.trim_start();
    match data {
        "" => None,
        "[DONE]" => Some(Ok(StreamEvent::Done)),
        json => Some(
            serde_json::from_str::<Frame>(json)
                .map(StreamEvent::from)
                .map_err(|e| Error::Decode(format!("stream event: {e}"))),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_lines_wait_for_the_rest() {
        let mut sse = SseBuffer::default();
        let events = sse.push(
            b"event: content_block_delta\ndata: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hel\"}}\ndata: {\"type\":\"content_blo",
        );
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], Ok(StreamEvent::Text(text)) if text == "Hel"));

        let events = sse.push(b"ck_stop\",\"index\":0}\r\n\r\n");
        assert!(matches!(events[..], [Ok(StreamEvent::Skipped)]));
        assert!(sse.pending.is_empty());
    }

    #[test]
    fn test_split_multibyte_character() {
        let line = "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"caf\u{e9}\"}}\n";
        let bytes = line.as_bytes();
        let split = line.find('\u{e9}').unwrap() + 1;

        let mut sse = SseBuffer::default();
        assert!(sse.push(&bytes[..split]).is_empty());
        let events = sse.push(&bytes[split..]);
        assert!(matches!(&events[0], Ok(StreamEvent::Text(text)) if text == "café"));
    }

    #[test]
    fn test_lifecycle_frames() {
        let mut sse = SseBuffer::default();
        let events: Vec<StreamEvent> = sse
            .push(
                concat!(
                    "data: {\"type\":\"message_start\",\"message\":{\"id\":\"msg_1\",\"model\":\"m\",\"content\":[]}}\n",
                    "data: {\"type\":\"ping\"}\n",
                    "data: {\"type\":\"message_delta\",\"delta\":{\"stop_reason\":\"end_turn\"},\"usage\":{\"output_tokens\":4}}\n",
                    "data: {\"type\":\"message_stop\"}\n",
                )
                .as_bytes(),
            )
            .into_iter()
            .map(Result::unwrap)
            .collect();

        assert_eq!(
            events,
            vec![
                StreamEvent::Started { id: "msg_1".into(), model: "m".into() },
                StreamEvent::Ping,
                StreamEvent::Stopping(Some(StopReason::EndTurn)),
                StreamEvent::Done,
            ]
        );
    }

    #[test]
    fn test_error_frame_and_garbage() {
        let mut sse = SseBuffer::default();
        let events = sse.push(
            b"data: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}\ndata: {nope}\n",
        );
        assert!(matches!(&events[0], Ok(StreamEvent::Failed(message)) if message == "Overloaded"));
        assert!(matches!(events[1], Err(Error::Decode(_))));
    }
}
