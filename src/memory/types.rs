/*!
 * Memory Types
 * Slot contents, slots, and fixed-size slot arrays
 */

use crate::core::types::SlotIndex;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Memory slot {index} out of bounds (memory has {len} slots)")]
    #[diagnostic(
        code(memory::out_of_bounds),
        help("Processes only own the slots they were created with.")
    )]
    OutOfBounds { index: SlotIndex, len: usize },
}

/// Content of a memory slot
///
/// The kernel never looks inside; each process interprets its own slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Content {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<Content>),
    Map(BTreeMap<String, Content>),
}

impl Content {
    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Empty)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Content::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Content::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Content::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Content::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Content::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Content]> {
        match self {
            Content::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Content>> {
        match self {
            Content::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, Content>> {
        match self {
            Content::Map(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Content {
    fn from(v: bool) -> Self {
        Content::Bool(v)
    }
}

impl From<i64> for Content {
    fn from(v: i64) -> Self {
        Content::Int(v)
    }
}

impl From<u64> for Content {
    fn from(v: u64) -> Self {
        Content::UInt(v)
    }
}

impl From<f64> for Content {
    fn from(v: f64) -> Self {
        Content::Float(v)
    }
}

impl From<&str> for Content {
    fn from(v: &str) -> Self {
        Content::Text(v.to_string())
    }
}

impl From<String> for Content {
    fn from(v: String) -> Self {
        Content::Text(v)
    }
}

impl From<Vec<u8>> for Content {
    fn from(v: Vec<u8>) -> Self {
        Content::Bytes(v)
    }
}

impl From<BTreeMap<String, Content>> for Content {
    fn from(v: BTreeMap<String, Content>) -> Self {
        Content::Map(v)
    }
}

/// One addressable memory cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub content: Content,
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Fixed-size array of slots
///
/// Length is set at allocation and never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Memory {
    slots: Vec<Slot>,
}

impl Memory {
    /// Allocate `len` empty slots
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![Slot::default(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: SlotIndex) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Read the content of a slot
    pub fn read(&self, index: SlotIndex) -> MemoryResult<&Content> {
        self.get(index)
            .map(|slot| &slot.content)
            .ok_or(MemoryError::OutOfBounds {
                index,
                len: self.len(),
            })
    }

    /// Check that `index` addresses a slot
    pub fn check(&self, index: SlotIndex) -> MemoryResult<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(MemoryError::OutOfBounds {
                index,
                len: self.len(),
            })
        }
    }

    /// Overwrite a slot
    pub(crate) fn store(&mut self, index: SlotIndex, content: Content) -> MemoryResult<()> {
        let len = self.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(MemoryError::OutOfBounds { index, len })?;
        slot.content = content;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }
}

impl<'a> IntoIterator for &'a Memory {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
