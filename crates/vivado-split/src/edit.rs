//! Line buffer and the edits applied to it
//!
//! A source file is held as a list of slots, one per line including its
//! terminator. Edits address slots by 0-based index at the moment they run.
//! Inserted text occupies a single slot no matter how many lines it holds,
//! so every later index in a sequence counts it as one.

use std::fmt;

use serde::Deserialize;

use crate::error::{PatchError, Result};

/// A single positional edit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum Edit {
    /// Replace slot `at` with the text
    Replace(usize, String),
    /// Insert the text as one slot before `at`; past the end appends
    Insert(usize, String),
    /// Remove slots `start..end`, clamped to the buffer
    Delete(usize, usize),
    /// Prepend a prefix to every slot in `start..end`
    Prefix(usize, usize, String),
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::Replace(at, _) => write!(f, "replace {}", at),
            Edit::Insert(at, text) => write!(f, "insert {} ({} lines)", at, text.lines().count()),
            Edit::Delete(start, end) => write!(f, "delete {}..{}", start, end),
            Edit::Prefix(start, end, prefix) => write!(f, "prefix {}..{} with {:?}", start, end, prefix),
        }
    }
}

/// Text split into editable slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    slots: Vec<String>,
}

impl LineBuffer {
    /// Split text into lines, keeping each line's `\n`
    ///
    /// `\r\n` is read as `\n`.
    pub fn from_text(text: &str) -> Self {
        let text = text.replace("\r\n", "\n");
        Self {
            slots: text.split_inclusive('\n').map(str::to_owned).collect(),
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the buffer has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in order
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Concatenate all slots back into text
    pub fn to_text(&self) -> String {
        self.slots.concat()
    }

    /// Apply one edit
    pub fn apply(&mut self, edit: &Edit) -> Result<()> {
        let len = self.slots.len();
        let out_of_range = || PatchError::OutOfRange {
            edit: edit.clone(),
            len,
        };

        match edit {
            Edit::Replace(at, text) => {
                let slot = self.slots.get_mut(*at).ok_or_else(out_of_range)?;
                *slot = text.clone();
            }
            Edit::Insert(at, text) => {
                self.slots.insert((*at).min(len), text.clone());
            }
            Edit::Delete(start, end) => {
                let end = (*end).min(len);
                let start = (*start).min(end);
                self.slots.drain(start..end);
            }
            Edit::Prefix(start, end, prefix) => {
                let slots = self.slots.get_mut(*start..*end).ok_or_else(out_of_range)?;
                for slot in slots {
                    slot.insert_str(0, prefix);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> LineBuffer {
        let text: String = (0..n).map(|i| format!("l{}\n", i)).collect();
        LineBuffer::from_text(&text)
    }

    #[test]
    fn test_from_text_keeps_terminators() {
        let buf = LineBuffer::from_text("a\nb\r\nc");
        assert_eq!(buf.slots(), &["a\n", "b\n", "c"]);
        assert_eq!(buf.to_text(), "a\nb\nc");
        assert!(LineBuffer::from_text("").is_empty());
    }

    #[test]
    fn test_replace() {
        let mut buf = numbered(3);
        buf.apply(&Edit::Replace(1, "x\n".into())).unwrap();
        assert_eq!(buf.to_text(), "l0\nx\nl2\n");

        let err = buf.apply(&Edit::Replace(3, "y\n".into())).unwrap_err();
        assert!(matches!(err, PatchError::OutOfRange { len: 3, .. }));
    }

    #[test]
    fn test_insert_is_one_slot() {
        let mut buf = numbered(4);
        buf.apply(&Edit::Insert(1, "a\nb\nc\n".into())).unwrap();
        assert_eq!(buf.len(), 5);

        // Index 2 is the old line 1, not the second inserted line
        buf.apply(&Edit::Replace(2, "X\n".into())).unwrap();
        assert_eq!(buf.to_text(), "l0\na\nb\nc\nX\nl2\nl3\n");
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut buf = numbered(2);
        buf.apply(&Edit::Insert(10, "tail\n".into())).unwrap();
        assert_eq!(buf.slots().last().unwrap(), "tail\n");
    }

    #[test]
    fn test_delete_is_clamped() {
        let mut buf = numbered(5);
        buf.apply(&Edit::Delete(1, 3)).unwrap();
        assert_eq!(buf.to_text(), "l0\nl3\nl4\n");

        buf.apply(&Edit::Delete(2, 100)).unwrap();
        assert_eq!(buf.to_text(), "l0\nl3\n");

        buf.apply(&Edit::Delete(50, 60)).unwrap();
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_prefix() {
        let mut buf = numbered(4);
        buf.apply(&Edit::Prefix(1, 3, "//".into())).unwrap();
        assert_eq!(buf.to_text(), "l0\n//l1\n//l2\nl3\n");

        assert!(buf.apply(&Edit::Prefix(2, 5, "//".into())).is_err());
        // A failed edit leaves the buffer alone
        assert_eq!(buf.to_text(), "l0\n//l1\n//l2\nl3\n");
    }

    #[test]
    fn test_delete_then_insert_block() {
        let mut buf = numbered(10);
        buf.apply(&Edit::Delete(2, 6)).unwrap();
        buf.apply(&Edit::Insert(2, "new0\nnew1\n".into())).unwrap();
        assert_eq!(buf.to_text(), "l0\nl1\nnew0\nnew1\nl6\nl7\nl8\nl9\n");
    }
}
