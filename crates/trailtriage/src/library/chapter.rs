//! Legacy chapter-based reference content.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of content a chapter section can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentBlockType {
    /// Top-level heading.
    Heading,
    /// Secondary heading.
    Subheading,
    /// Body text.
    Paragraph,
    /// Unordered list.
    BulletList,
    /// Ordered list.
    NumberedList,
    /// Warning callout.
    Warning,
    /// Tip callout.
    Tip,
    /// Note callout.
    Note,
    /// Tabular data, usually with JSON metadata.
    Table,
    /// Step-by-step procedure.
    Procedure,
    /// Term definition.
    Definition,
    /// Worked example.
    Example,
}

/// One block of chapter content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    /// Block identifier.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// What kind of block this is.
    #[serde(rename = "type")]
    pub block_type: ContentBlockType,
    /// Text content.
    pub content: String,
    /// Position within the section.
    pub order_index: i32,
    /// Extra data such as table rows or list items, as JSON text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

/// A titled run of blocks within a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Section identifier.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Section title.
    pub title: String,
    /// Blocks in the section.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Position within the chapter.
    pub order_index: i32,
}

/// A numbered chapter of the field guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Chapter identifier.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Printed chapter number.
    pub chapter_number: i32,
    /// Chapter title.
    pub title: String,
    /// Optional subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Chapter sections.
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Position in the table of contents.
    pub order_index: i32,
    /// Whether the reader bookmarked it.
    #[serde(default)]
    pub is_bookmarked: bool,
}
