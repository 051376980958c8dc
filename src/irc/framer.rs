//! CRLF line framing over the read half of the connection.
//!
//! The stream sits behind a 2048-byte `BufReader`; each line is read with
//! `read_until(b'\n')` capped at [`MAX_LINE`], so a line split across reads
//! comes out whole and several lines in one read come out one at a time. A
//! bare `\n` also ends a line. Decoding is lossy UTF-8.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

pub const READ_CHUNK: usize = 2048;

/// Upper bound for one line: 512 bytes of message plus the 8191 byte IRCv3
/// tag budget. Longer runs without a terminator are cut at this length.
pub const MAX_LINE: usize = 512 + 8192;

pub struct LineReader<R> {
    inner: BufReader<R>,
    /// Leading bytes of a character cut in half by the length cap.
    carry: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::with_capacity(READ_CHUNK, inner),
            carry: Vec::new(),
        }
    }

    /// Next complete line with the terminator stripped.
    ///
    /// Returns `Ok(None)` once the peer has closed the stream and everything
    /// buffered has been handed out. Empty lines are skipped.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        loop {
            let mut raw = std::mem::take(&mut self.carry);
            let limit = (MAX_LINE - raw.len()) as u64;
            (&mut self.inner)
                .take(limit)
                .read_until(b'\n', &mut raw)
                .await?;

            if raw.is_empty() {
                return Ok(None);
            }
            if raw.last() != Some(&b'\n') && raw.len() >= MAX_LINE {
                tracing::warn!(len = raw.len(), "line exceeds limit, cutting unterminated");
                self.carry = split_partial_char(&mut raw);
            }

            let line = decode(&raw);
            if line.is_empty() {
                continue;
            }
            return Ok(Some(line));
        }
    }
}

/// Remove and return the bytes of a multi-byte character left incomplete at
/// the end of `raw`.
fn split_partial_char(raw: &mut Vec<u8>) -> Vec<u8> {
    let start = raw.len().saturating_sub(3);
    for i in (start..raw.len()).rev() {
        let b = raw[i];
        if b < 0x80 {
            break;
        }
        if b >= 0xC0 {
            let width = match b {
                0xF0..=0xFF => 4,
                0xE0..=0xEF => 3,
                _ => 2,
            };
            if raw.len() - i < width {
                return raw.split_off(i);
            }
            break;
        }
    }
    Vec::new()
}

fn decode(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    text.trim_end_matches(['\r', '\n']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    async fn collect(mut reader: LineReader<impl AsyncRead + Unpin>) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(line) = reader.next_line().await.unwrap() {
            out.push(line);
        }
        out
    }

    #[tokio::test]
    async fn test_single_line() {
        let reader = LineReader::new(&b":srv 001 me :Welcome\r\n"[..]);
        assert_eq!(collect(reader).await, vec![":srv 001 me :Welcome"]);
    }

    #[tokio::test]
    async fn test_multiple_lines_in_one_chunk() {
        let data = b"PING :a\r\n:n!u@h PRIVMSG #c :hi\r\n\r\nNOTICE * :x\n";
        let reader = LineReader::new(&data[..]);
        assert_eq!(
            collect(reader).await,
            vec!["PING :a", ":n!u@h PRIVMSG #c :hi", "NOTICE * :x"]
        );
    }

    #[tokio::test]
    async fn test_line_split_across_reads() {
        let (mut server, client) = tokio::io::duplex(64);
        let mut reader = LineReader::new(client);

        server.write_all(b":n!u@h PRIVMSG #c :hel").await.unwrap();
        let pending = tokio::spawn(async move {
            let line = reader.next_line().await.unwrap();
            (reader, line)
        });
        tokio::task::yield_now().await;
        server.write_all(b"lo\r\nPING").await.unwrap();
        let (mut reader, line) = pending.await.unwrap();
        assert_eq!(line.as_deref(), Some(":n!u@h PRIVMSG #c :hello"));

        server.write_all(b" :x\r\n").await.unwrap();
        drop(server);
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("PING :x"));
        assert_eq!(reader.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_trailing_fragment_at_eof() {
        let reader = LineReader::new(&b"ERROR :Closing link"[..]);
        assert_eq!(collect(reader).await, vec!["ERROR :Closing link"]);
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let mut reader = LineReader::new(&b""[..]);
        assert_eq!(reader.next_line().await.unwrap(), None);
        // Stays closed.
        assert_eq!(reader.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let reader = LineReader::new(&b"caf\xe9\r\n"[..]);
        assert_eq!(collect(reader).await, vec!["caf\u{fffd}"]);
    }

    #[tokio::test]
    async fn test_overlong_line_is_flushed() {
        let data = vec![b'a'; MAX_LINE + 10];
        let reader = LineReader::new(&data[..]);
        let lines = collect(reader).await;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), MAX_LINE);
        assert_eq!(lines[1].len(), 10);
    }

    #[tokio::test]
    async fn test_cut_keeps_multibyte_char_whole() {
        let mut data = vec![b'a'; MAX_LINE - 1];
        data.extend_from_slice("é\r\n".as_bytes());
        let lines = collect(LineReader::new(&data[..])).await;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "a".repeat(MAX_LINE - 1));
        assert_eq!(lines[1], "é");
    }
}
