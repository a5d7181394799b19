// Handler reading raw stream lines and forwarding decoded ticks to ingestion
use super::helpers::parse_stream_message;
use crate::error::EngineError;
use shared::models::PriceTick;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Reads newline-delimited stream messages from `reader` and sends each
/// decoded tick over `sender`.
///
/// Lines that are not UTF-8 or do not decode are logged and skipped. Reading
/// stops at end of input or when the receiving side is gone. Returns the
/// number of ticks forwarded; only an I/O failure of the reader is an error.
pub async fn handle_forward_stream_lines<R>(
    reader: R,
    sender: mpsc::Sender<PriceTick>,
) -> Result<usize, EngineError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.split(b'\n');
    let mut line_no = 0usize;
    let mut forwarded = 0usize;

    while let Some(raw) = lines.next_segment().await? {
        line_no += 1;
        let line = match std::str::from_utf8(&raw) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping non UTF-8 stream line");
                continue;
            }
        };

        match parse_stream_message(line) {
            Ok(Some(tick)) => {
                if sender.send(tick).await.is_err() {
                    tracing::warn!("Ingestion task stopped early, discarding remaining input");
                    break;
                }
                forwarded += 1;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping malformed stream message")
            }
        }
    }

    tracing::debug!(lines = line_no, forwarded, "Finished reading stream input");
    Ok(forwarded)
}
