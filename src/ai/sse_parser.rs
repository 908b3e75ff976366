//! Server-Sent Events (SSE) parser for OpenAI-compatible streaming responses.

use bytes::Bytes;
use futures_util::Stream;
use serde::Deserialize;

use crate::error::AiError;

#[derive(Debug, Deserialize)]
struct StreamResponse {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// Converts a raw SSE byte stream into a stream of text chunks.
///
/// Lines are buffered across chunk boundaries; the stream ends at
/// `data: [DONE]` or when the body ends.
///
/// # Arguments
///
/// * `byte_stream` - The body of a streaming chat completion response
///
/// # Returns
///
/// A stream of the `delta.content` text of each event. A transport error is
/// yielded once as [`AiError::Stream`] and ends the stream.
pub fn sse_to_text_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String, AiError>> + Send {
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut buffer = String::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(AiError::Stream(e.to_string()));
                    return;
                }
            };

            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(line_end) = buffer.find('\n') {
                let line: String = buffer.drain(..=line_end).collect();
                let line = line.trim();

                if line == "data: [DONE]" {
                    return;
                }
                if let Some(content) = parse_sse_line(line) {
                    yield Ok(content);
                }
            }
        }

        // Some servers omit the trailing newline on the last event.
        if let Some(content) = parse_sse_line(buffer.trim()) {
            yield Ok(content);
        }
    }
}

/// Extracts the text content from one `data:` line.
///
/// # Arguments
///
/// * `line` - A trimmed SSE line (e.g., `data: {"choices":[...]}`)
///
/// # Returns
///
/// * `Some(content)` - The concatenated delta text of every choice
/// * `None` - For non-data lines, comments, empty deltas and lines that do
///   not parse
///
/// # Example
///
/// ```ignore
/// let line = r#"data: {"choices":[{"delta":{"content":"Hola"}}]}"#;
/// assert_eq!(parse_sse_line(line), Some("Hola".to_string()));
/// ```
fn parse_sse_line(line: &str) -> Option<String> {
    let json_str = line.strip_prefix("data:")?.trim_start();

    let response = serde_json::from_str::<StreamResponse>(json_str).ok()?;

    let content: String = response
        .choices
        .into_iter()
        .filter_map(|c| c.delta.content)
        .filter(|c| !c.is_empty())
        .collect();

    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[test]
    fn test_parse_sse_line_with_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hola"}}]}"#;
        assert_eq!(parse_sse_line(line), Some("Hola".to_string()));
    }

    #[test]
    fn test_parse_sse_line_without_space_after_colon() {
        let line = r#"data:{"choices":[{"delta":{"content":"Hola"}}]}"#;
        assert_eq!(parse_sse_line(line), Some("Hola".to_string()));
    }

    #[test]
    fn test_parse_sse_line_with_null_content() {
        let line = r#"data: {"choices":[{"delta":{}}]}"#;
        assert_eq!(parse_sse_line(line), None);
    }

    #[test]
    fn test_parse_sse_line_multiple_choices() {
        let line =
            r#"data: {"choices":[{"delta":{"content":"Buenos"}},{"delta":{"content":" días"}}]}"#;
        assert_eq!(parse_sse_line(line), Some("Buenos días".to_string()));
    }

    #[test]
    fn test_parse_sse_line_ignores_noise() {
        assert_eq!(parse_sse_line("data: [DONE]"), None);
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line("data: not json"), None);
        assert_eq!(parse_sse_line(""), None);
    }

    #[tokio::test]
    async fn test_stream_joins_lines_split_across_chunks() {
        let chunks: Vec<reqwest::Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"data: {\"choices\":[{\"delta\":{\"con")),
            Ok(Bytes::from_static(
                b"tent\":\"Hola\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\" amigo\"}}]}\n",
            )),
            Ok(Bytes::from_static(b"data: [DONE]\n")),
            Ok(Bytes::from_static(
                b"data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n",
            )),
        ];

        let stream = sse_to_text_stream(futures_util::stream::iter(chunks));
        let parts: Vec<String> = stream.map(|r| r.unwrap()).collect().await;

        assert_eq!(parts, vec!["Hola".to_string(), " amigo".to_string()]);
    }

    #[tokio::test]
    async fn test_stream_flushes_unterminated_last_line() {
        let chunks: Vec<reqwest::Result<Bytes>> = vec![Ok(Bytes::from_static(
            b"data: {\"choices\":[{\"delta\":{\"content\":\"fin\"}}]}",
        ))];

        let stream = sse_to_text_stream(futures_util::stream::iter(chunks));
        let parts: Vec<String> = stream.map(|r| r.unwrap()).collect().await;

        assert_eq!(parts, vec!["fin".to_string()]);
    }
}
