// Helpers decoding stream messages into ticks
use crate::error::EngineError;
use shared::models::PriceTick;

/// Decodes one line of the price stream.
///
/// Accepts a bare JSON object (one tick per line) or an SSE `data:` field
/// carrying one. Blank lines, SSE comments and the other SSE fields (`event`,
/// `id`, `retry`) carry no tick and yield `Ok(None)`.
pub fn parse_stream_message(line: &str) -> Result<Option<PriceTick>, EngineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return Ok(None);
    }

    let payload = match line.split_once(':') {
        Some(("data", rest)) => rest.trim_start(),
        Some((field, _)) if matches!(field, "event" | "id" | "retry") => return Ok(None),
        _ => line,
    };
    if payload.is_empty() {
        return Ok(None);
    }

    serde_json::from_str::<PriceTick>(payload)
        .map(Some)
        .map_err(|e| EngineError::StreamMessage(format!("{}: {}", e, payload)))
}
