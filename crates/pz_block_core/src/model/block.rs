//! Block domain model.
//!
//! # Responsibility
//! - Define the persisted `Block` record and its write-side inputs.
//! - Enforce column length limits before data reaches the store.
//!
//! # Invariants
//! - `id` is assigned once by the store and never rewritten.
//! - `title` holds at most `TITLE_MAX_CHARS` characters.
//! - `content` holds at most `CONTENT_MAX_CHARS` characters.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned surrogate key of a block row.
pub type BlockId = i64;

/// Maximum `title` length, counted in characters.
pub const TITLE_MAX_CHARS: usize = 50;
/// Maximum `content` length, counted in characters.
pub const CONTENT_MAX_CHARS: usize = 10_000;

/// Validation failures for block fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockValidationError {
    TitleTooLong { len: usize },
    ContentTooLong { len: usize },
}

impl Display for BlockValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleTooLong { len } => write!(
                f,
                "title has {len} characters; at most {TITLE_MAX_CHARS} allowed"
            ),
            Self::ContentTooLong { len } => write!(
                f,
                "content has {len} characters; at most {CONTENT_MAX_CHARS} allowed"
            ),
        }
    }
}

impl Error for BlockValidationError {}

/// A titled content fragment persisted as one `pz_block` row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Block {
    /// Validates column length limits.
    pub fn validate(&self) -> Result<(), BlockValidationError> {
        validate_title(&self.title)?;
        validate_content(&self.content)
    }
}

/// Projection returned by paged title search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub id: BlockId,
    pub title: String,
}

/// Input for inserting a block; the store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlock {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NewBlock {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Validates column length limits.
    pub fn validate(&self) -> Result<(), BlockValidationError> {
        validate_title(&self.title)?;
        validate_content(&self.content)
    }
}

/// Input for updating an existing block.
///
/// `None` fields keep their stored value. `id` only selects the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockChanges {
    pub id: BlockId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl BlockChanges {
    /// Creates an update that leaves both columns unchanged.
    pub fn for_id(id: BlockId) -> Self {
        Self {
            id,
            title: None,
            content: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Validates the columns that will be written.
    pub fn validate(&self) -> Result<(), BlockValidationError> {
        if let Some(title) = self.title.as_deref() {
            validate_title(title)?;
        }
        if let Some(content) = self.content.as_deref() {
            validate_content(content)?;
        }
        Ok(())
    }
}

impl From<Block> for BlockChanges {
    /// Full replacement of both columns, as an admin form submit does.
    fn from(block: Block) -> Self {
        Self {
            id: block.id,
            title: Some(block.title),
            content: Some(block.content),
        }
    }
}

fn validate_title(title: &str) -> Result<(), BlockValidationError> {
    let len = title.chars().count();
    if len > TITLE_MAX_CHARS {
        return Err(BlockValidationError::TitleTooLong { len });
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), BlockValidationError> {
    let len = content.chars().count();
    if len > CONTENT_MAX_CHARS {
        return Err(BlockValidationError::ContentTooLong { len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        Block, BlockChanges, BlockValidationError, NewBlock, CONTENT_MAX_CHARS, TITLE_MAX_CHARS,
    };

    #[test]
    fn limits_count_characters_not_bytes() {
        let title = "区".repeat(TITLE_MAX_CHARS);
        assert!(title.len() > TITLE_MAX_CHARS);
        assert!(NewBlock::new(title, "").validate().is_ok());
    }

    #[test]
    fn rejects_title_over_limit() {
        let block = NewBlock::new("a".repeat(TITLE_MAX_CHARS + 1), "");
        assert_eq!(
            block.validate().unwrap_err(),
            BlockValidationError::TitleTooLong {
                len: TITLE_MAX_CHARS + 1
            }
        );
    }

    #[test]
    fn rejects_content_over_limit() {
        let block = Block {
            id: 7,
            title: String::new(),
            content: "x".repeat(CONTENT_MAX_CHARS + 1),
        };
        assert!(matches!(
            block.validate(),
            Err(BlockValidationError::ContentTooLong { .. })
        ));
    }

    #[test]
    fn changes_only_validate_present_fields() {
        let changes = BlockChanges::for_id(1).title("ok");
        assert!(changes.validate().is_ok());

        let too_long = BlockChanges::for_id(1).content("x".repeat(CONTENT_MAX_CHARS + 1));
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn block_serializes_with_original_field_names() {
        let block = Block {
            id: 1,
            title: "Hello".to_string(),
            content: "World".to_string(),
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "title": "Hello", "content": "World"})
        );
    }

    #[test]
    fn new_block_fields_default_to_empty() {
        let parsed: NewBlock = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, NewBlock::default());
    }
}
