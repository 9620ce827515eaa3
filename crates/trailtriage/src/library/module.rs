//! Topic-based reference modules.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::chapter::ContentBlockType;

/// Topic grouping for modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleCategory {
    /// Patient assessment.
    Assessment,
    /// Environmental emergencies.
    Environmental,
    /// Medical emergencies.
    Medical,
    /// Trauma management.
    Trauma,
    /// Minor medical issues.
    #[serde(rename = "Minor Issues")]
    Minor,
    /// Evacuation and rescue.
    Evacuation,
    /// Communication.
    Communication,
    /// Anything else.
    General,
}

impl ModuleCategory {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Assessment => "Assessment",
            Self::Environmental => "Environmental",
            Self::Medical => "Medical",
            Self::Trauma => "Trauma",
            Self::Minor => "Minor Issues",
            Self::Evacuation => "Evacuation",
            Self::Communication => "Communication",
            Self::General => "General",
        }
    }

    /// Symbol name used for the module icon.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Assessment => "stethoscope",
            Self::Environmental => "thermometer",
            Self::Medical => "heart.circle",
            Self::Trauma => "cross.case",
            Self::Minor => "bandage",
            Self::Evacuation => "figure.walk",
            Self::Communication => "antenna.radiowaves.left.and.right",
            Self::General => "book",
        }
    }

    /// Accent color name.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Assessment => "blue",
            Self::Environmental => "orange",
            Self::Medical => "red",
            Self::Trauma => "purple",
            Self::Minor => "green",
            Self::Evacuation => "yellow",
            Self::Communication => "cyan",
            Self::General => "gray",
        }
    }
}

impl fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kinds of content a module section can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleBlockType {
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
    /// Tabular data.
    Table,
    /// Step-by-step procedure.
    Procedure,
    /// Term definition.
    Definition,
    /// Worked example.
    Example,
    /// Practice scenario.
    Scenario,
}

impl From<ContentBlockType> for ModuleBlockType {
    fn from(kind: ContentBlockType) -> Self {
        match kind {
            ContentBlockType::Heading => Self::Heading,
            ContentBlockType::Subheading => Self::Subheading,
            ContentBlockType::Paragraph => Self::Paragraph,
            ContentBlockType::BulletList => Self::BulletList,
            ContentBlockType::NumberedList => Self::NumberedList,
            ContentBlockType::Warning => Self::Warning,
            ContentBlockType::Tip => Self::Tip,
            ContentBlockType::Note => Self::Note,
            ContentBlockType::Table => Self::Table,
            ContentBlockType::Procedure => Self::Procedure,
            ContentBlockType::Definition => Self::Definition,
            ContentBlockType::Example => Self::Example,
        }
    }
}

/// One block of module content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleBlock {
    /// Block identifier.
    pub id: Uuid,
    /// What kind of block this is.
    #[serde(rename = "type")]
    pub block_type: ModuleBlockType,
    /// Text content.
    pub content: String,
    /// Position within the section.
    pub order_index: i32,
    /// Extra data such as table rows, as JSON text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    /// Where a scenario block takes place, as `"Park, State"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A titled run of blocks within a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSection {
    /// Section identifier.
    pub id: Uuid,
    /// Section title.
    pub title: String,
    /// Optional subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Blocks in the section.
    pub content: Vec<ModuleBlock>,
    /// Position within the module.
    pub order_index: i32,
}

/// A topic module of the field guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Module identifier.
    pub id: Uuid,
    /// Module title.
    pub module_title: String,
    /// Optional subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_subtitle: Option<String>,
    /// Topic grouping.
    pub category: ModuleCategory,
    /// Icon symbol name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_description: Option<String>,
    /// Module sections.
    pub sections: Vec<ModuleSection>,
    /// Position in the library.
    pub order_index: i32,
    /// Whether the reader bookmarked it.
    pub is_bookmarked: bool,
    /// Setting for the module's scenarios, as `"Park, State"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
