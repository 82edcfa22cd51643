use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::error::Error;

/// One transcript entry. Blank lines are kept so the source document's
/// vertical rhythm survives layout.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub index: usize,
    pub text: String,
}

pub fn read_transcript(path: &Path) -> Result<Vec<TextLine>> {
    let bytes = fs::read(path).map_err(|_| Error::InputNotFound {
        path: path.to_path_buf(),
    })?;
    let content = String::from_utf8(bytes).map_err(|_| Error::Encoding {
        path: path.to_path_buf(),
    })?;
    Ok(split_lines(&content))
}

fn split_lines(content: &str) -> Vec<TextLine> {
    let mut raw: Vec<&str> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    // A final newline terminates the last line, it does not open a new one.
    if raw.last() == Some(&"") {
        raw.pop();
    }
    raw.into_iter()
        .enumerate()
        .map(|(index, text)| TextLine {
            index,
            text: text.to_string(),
        })
        .collect()
}
