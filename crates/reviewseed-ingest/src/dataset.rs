//! Streaming reader for the JSONL dataset splits.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use reviewseed_core::{DatasetPaths, Error, Result};

/// Longest string value shown by [`preview_jsonl`] before truncation.
const PREVIEW_MAX_CHARS: usize = 120;

/// One line of the review dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub text: String,
    /// Star rating minus one, `0..=4`.
    pub label: i64,
    /// Split the record was read from. Stamped by the reader.
    #[serde(default)]
    pub split: String,
}

struct OpenSplit {
    split: String,
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_number: usize,
}

/// Iterates every record of every split, in split order then file order.
///
/// Blank lines are skipped. A line that is not a valid record yields an
/// error naming the file and line.
pub struct DatasetReader {
    pending: std::vec::IntoIter<(String, PathBuf)>,
    current: Option<OpenSplit>,
    records_read: usize,
}

impl DatasetReader {
    pub fn new(paths: &DatasetPaths) -> Self {
        Self::from_splits(paths.splits.clone())
    }

    /// Read an explicit `(split, path)` list.
    pub fn from_splits(splits: Vec<(String, PathBuf)>) -> Self {
        Self {
            pending: splits.into_iter(),
            current: None,
            records_read: 0,
        }
    }

    pub fn records_read(&self) -> usize {
        self.records_read
    }

    fn open_next(&mut self) -> Option<Result<()>> {
        let (split, path) = self.pending.next()?;
        debug!("Reading split {} from {}", split, path.display());
        match File::open(&path) {
            Ok(file) => {
                self.current = Some(OpenSplit {
                    split,
                    lines: BufReader::with_capacity(64 * 1024, file).lines(),
                    path,
                    line_number: 0,
                });
                Some(Ok(()))
            }
            Err(e) => Some(Err(Error::Dataset(format!(
                "cannot open {}: {}",
                path.display(),
                e
            )))),
        }
    }
}

impl Iterator for DatasetReader {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                if let Err(e) = self.open_next()? {
                    return Some(Err(e));
                }
            }
            let current = match self.current.as_mut() {
                Some(c) => c,
                None => continue,
            };

            let line = match current.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Some(Err(Error::Io(e))),
                None => {
                    self.current = None;
                    continue;
                }
            };
            current.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let parsed = serde_json::from_str::<RawRecord>(trimmed)
                .map(|mut record| {
                    record.split = current.split.clone();
                    record
                })
                .map_err(|e| {
                    Error::Dataset(format!(
                        "{}:{}: {}",
                        current.path.display(),
                        current.line_number,
                        e
                    ))
                });
            if parsed.is_ok() {
                self.records_read += 1;
            }
            return Some(parsed);
        }
    }
}

/// Print the first `limit` non-blank records of a JSONL file, one
/// `key: value` line per field in file order. Returns how many records were printed.
pub fn preview_jsonl(path: &Path, limit: usize, out: &mut impl Write) -> Result<usize> {
    let file = File::open(path)
        .map_err(|e| Error::Dataset(format!("cannot open {}: {}", path.display(), e)))?;

    let mut shown = 0;
    for line in BufReader::new(file).lines() {
        if shown >= limit {
            break;
        }
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(&line)?;
        shown += 1;

        writeln!(out, "--- record {} ---", shown)?;
        match value {
            serde_json::Value::Object(map) => {
                for (key, value) in map {
                    writeln!(out, "{}: {}", key, preview_value(&value))?;
                }
            }
            other => writeln!(out, "{}", preview_value(&other))?,
        }
    }
    Ok(shown)
}

fn preview_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => {
            let snippet: String = s.chars().take(PREVIEW_MAX_CHARS).collect();
            let suffix = if s.chars().count() > PREVIEW_MAX_CHARS {
                "…"
            } else {
                ""
            };
            format!("{}{}", snippet.replace('\n', "\\n"), suffix)
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_split(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_reads_all_splits_in_order_and_stamps_split() {
        let dir = TempDir::new().unwrap();
        let train = write_split(
            &dir,
            "train.jsonl",
            "{\"id\":\"a\",\"text\":\"よい\",\"label\":4,\"split\":\"bogus\"}\n\n{\"id\":\"b\",\"text\":\"だめ\",\"label\":0}\n",
        );
        let test = write_split(&dir, "test.jsonl", "{\"id\":\"c\",\"text\":\"普通\",\"label\":2}\n");

        let mut reader = DatasetReader::from_splits(vec![
            ("train".into(), train),
            ("test".into(), test),
        ]);
        let records: Vec<RawRecord> = reader.by_ref().map(|r| r.unwrap()).collect();

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(records[0].split, "train");
        assert_eq!(records[2].split, "test");
        assert_eq!(reader.records_read(), 3);
    }

    #[test]
    fn test_bad_line_reports_location() {
        let dir = TempDir::new().unwrap();
        let path = write_split(&dir, "train.jsonl", "{\"id\":\"a\",\"text\":\"x\",\"label\":1}\nnot json\n");
        let results: Vec<_> = DatasetReader::from_splits(vec![("train".into(), path)]).collect();
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err().to_string();
        assert!(err.contains("train.jsonl:2"), "{}", err);
    }

    #[test]
    fn test_missing_file_is_dataset_error() {
        let results: Vec<_> =
            DatasetReader::from_splits(vec![("train".into(), PathBuf::from("/nonexistent.jsonl"))])
                .collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(Error::Dataset(_))));
    }

    #[test]
    fn test_preview_truncates_and_escapes() {
        let dir = TempDir::new().unwrap();
        let long = "あ".repeat(130);
        let body = format!(
            "{{\"id\":\"x1\",\"label\":3,\"text\":\"一行目\\n二行目\"}}\n\n{{\"id\":\"x2\",\"label\":0,\"text\":\"{}\"}}\n{{\"id\":\"x3\",\"label\":1,\"text\":\"c\"}}\n",
            long
        );
        let path = write_split(&dir, "preview.jsonl", &body);

        let mut out = Vec::new();
        let shown = preview_jsonl(&path, 2, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(shown, 2);
        assert!(out.contains("--- record 1 ---"));
        assert!(out.contains("text: 一行目\\n二行目"));
        assert!(out.contains("label: 3"));
        assert!(out.contains(&format!("text: {}…", "あ".repeat(120))));
        assert!(!out.contains("x3"));
    }

    #[test]
    fn test_preview_keeps_file_key_order() {
        let dir = TempDir::new().unwrap();
        let path = write_split(
            &dir,
            "ordered.jsonl",
            "{\"text\":\"t\",\"label\":1,\"id\":\"a\"}\n",
        );

        let mut out = Vec::new();
        preview_jsonl(&path, 5, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(out, "--- record 1 ---\ntext: t\nlabel: 1\nid: a\n");
    }
}
