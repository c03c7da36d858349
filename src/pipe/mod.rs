//! Pipe protocol: newline-delimited record exchange between processes
//!
//! One JSON-encoded record object per line, in pull order, no length
//! prefix, no schema header. Encoding and decoding follow the identical
//! rules, so one connector process's standard output can become another's
//! input stream with no special-casing based on origin.

use crate::stream::{Record, RecordStream, Source};
use async_trait::async_trait;
use eyre::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

/// Encode a stream onto a writer, one record per line.
///
/// Each record is written as it is pulled, so memory stays bounded to the
/// line in flight. Returns the number of records encoded.
///
/// # Errors
/// Returns an error on a terminal stream failure or a write failure;
/// lines already written stand.
pub async fn encode<W>(mut stream: RecordStream, mut writer: W) -> Result<usize>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut lines = 0usize;
    while let Some(record) = stream.produce().await? {
        writer
            .write_all(encode_line(&record)?.as_bytes())
            .await
            .context("failed to write pipe line")?;
        lines += 1;
    }
    writer.flush().await.context("failed to flush pipe")?;
    log::debug!("Encoded {lines} record(s) to pipe");
    Ok(lines)
}

/// Encode one record as a wire line, trailing newline included.
///
/// The single definition of the wire form: every writer emitting the pipe
/// format builds its lines here.
pub fn encode_line(record: &Record) -> Result<String> {
    let mut line = serde_json::to_string(record).context("failed to encode record")?;
    line.push('\n');
    Ok(line)
}

/// Decode a reader into a lazy record stream, one line at a time.
///
/// Blank lines are skipped. A line that is not a JSON object is a terminal
/// stream error.
pub fn decode<R>(reader: R) -> RecordStream
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    RecordStream::new(LineSource {
        lines: reader.lines(),
        number: 0,
    })
}

/// This process's standard input as a record stream
pub fn stdin_stream() -> RecordStream {
    decode(BufReader::new(tokio::io::stdin()))
}

/// Encode a stream onto this process's standard output
pub async fn encode_to_stdout(stream: RecordStream) -> Result<usize> {
    encode(stream, tokio::io::stdout()).await
}

struct LineSource<R> {
    lines: Lines<R>,
    number: usize,
}

#[async_trait]
impl<R> Source for LineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            self.number += 1;
            match self.lines.next_line().await.context("failed to read pipe line")? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => {
                    let record = serde_json::from_str::<Record>(&line)
                        .with_context(|| format!("invalid record object on pipe line {}", self.number))?;
                    return Ok(Some(record));
                }
                None => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().expect("test record must be an object").clone()
    }

    #[tokio::test]
    async fn test_round_trip_preserves_nesting() {
        let originals = vec![
            record(json!({"a": 1, "b": {"c": [1, 2, {"d": null}]}})),
            record(json!({"x": "text with \"quotes\" and \n newline"})),
            record(json!({})),
        ];

        let mut encoded: Vec<u8> = Vec::new();
        let count = encode(RecordStream::from_records(originals.clone()), &mut encoded)
            .await
            .unwrap();
        assert_eq!(count, 3);

        let decoded = decode(BufReader::new(Cursor::new(encoded)))
            .collect()
            .await
            .unwrap();
        assert_eq!(decoded, originals);
    }

    #[test]
    fn test_encode_line_is_the_wire_form() {
        let line = encode_line(&record(json!({"a": 1, "b": [1, {"c": null}]}))).unwrap();
        assert_eq!(line, "{\"a\":1,\"b\":[1,{\"c\":null}]}\n");
    }

    #[tokio::test]
    async fn test_one_record_per_line() {
        let records = vec![record(json!({"a": 1})), record(json!({"b": 2}))];
        let mut encoded: Vec<u8> = Vec::new();
        encode(RecordStream::from_records(records), &mut encoded)
            .await
            .unwrap();

        let text = String::from_utf8(encoded).unwrap();
        assert_eq!(text, "{\"a\":1}\n{\"b\":2}\n");
    }

    #[tokio::test]
    async fn test_blank_lines_skipped() {
        let input = "{\"a\":1}\n\n   \n{\"b\":2}\n";
        let decoded = decode(BufReader::new(Cursor::new(input.as_bytes().to_vec())))
            .collect()
            .await
            .unwrap();

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1]["b"], json!(2));
    }

    #[tokio::test]
    async fn test_non_object_line_is_terminal() {
        let input = "{\"a\":1}\n[1,2,3]\n{\"b\":2}\n";
        let mut stream = decode(BufReader::new(Cursor::new(input.as_bytes().to_vec())));

        assert_eq!(stream.produce().await.unwrap().unwrap()["a"], json!(1));
        assert!(stream.produce().await.is_err());
        // the stream latches closed after the error
        assert!(stream.produce().await.unwrap().is_none());
    }
}
