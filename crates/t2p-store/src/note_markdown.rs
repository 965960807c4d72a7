//! Notes file codec.
//!
//! The visible markdown is cosmetic output regenerated on every save. The
//! source of truth is a camelCase JSON serialization of the note list,
//! embedded between `<!-- T2P_NOTES_DATA` and `-->` markers.

use once_cell::sync::Lazy;
use regex::Regex;

use t2p_protocols::note::NoteList;

use crate::error::StoreError;

static DATA_BLOB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!-- T2P_NOTES_DATA\n(.*?)\n-->").unwrap());

/// Codec for the notes file.
pub struct NoteMarkdown;

impl NoteMarkdown {
    /// Extract the embedded JSON blob, if present.
    pub fn extract_blob(content: &str) -> Option<&str> {
        DATA_BLOB
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Parse the note list out of file content.
    ///
    /// Returns `None` when no data blob is present; a malformed blob is a
    /// `StoreError::Parse` for the caller to downgrade as it sees fit.
    pub fn parse(content: &str) -> Result<Option<NoteList>, StoreError> {
        let Some(blob) = Self::extract_blob(content) else {
            return Ok(None);
        };
        let list: NoteList = serde_json::from_str(blob).map_err(|e| StoreError::Parse {
            path: "<notes blob>".into(),
            reason: e.to_string(),
        })?;
        Ok(Some(list))
    }

    /// Render the full notes file: cosmetic markdown followed by the blob.
    pub fn render(list: &NoteList) -> Result<String, StoreError> {
        let json = serde_json::to_string_pretty(list)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        let mut content = String::from("# Notes\n\n");
        content.push_str(&format!(
            "Last updated: {}\n\n",
            list.last_updated.to_rfc3339()
        ));

        for note in &list.items {
            content.push_str(&format!("## {}\n\n", note.title));
            content.push_str(&format!("{}\n\n", note.content));
            if !note.tags.is_empty() {
                content.push_str(&format!("Tags: {}\n\n", note.tags.join(", ")));
            }
            content.push_str("---\n\n");
        }

        content.push_str(&format!("<!-- T2P_NOTES_DATA\n{}\n-->", json));
        Ok(content)
    }

    /// Content of a freshly created notes file with an empty list.
    pub fn default_file(list: &NoteList) -> Result<String, StoreError> {
        let json =
            serde_json::to_string(list).map_err(|e| StoreError::Serialize(e.to_string()))?;
        Ok(format!(
            "# Notes\n\nThis file contains notes managed by the t2p CLI tool.\n\n<!-- T2P_NOTES_DATA\n{}\n-->",
            json
        ))
    }
}

#[cfg(test)]
#[path = "note_markdown_tests.rs"]
mod tests;
