//! Chapter to module conversion.

use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;
use tracing::{debug, info};
use uuid::Uuid;

use super::chapter::{Chapter, ContentBlock, Section};
use super::locations::LocationPicker;
use super::module::{Module, ModuleBlock, ModuleBlockType, ModuleCategory, ModuleSection};
use crate::error::Result;

/// Title keywords, checked in order; the first rule with a hit wins.
const KEYWORD_RULES: &[(&[&str], &str, ModuleCategory)] = &[
    (
        &["environmental", "heat", "cold", "hypothermia", "altitude", "lightning"],
        "Environmental Emergencies",
        ModuleCategory::Environmental,
    ),
    (
        &["medical", "diabetic", "cardiac", "respiratory", "allergy", "anaphylaxis"],
        "Medical Emergencies",
        ModuleCategory::Medical,
    ),
    (
        &["trauma", "fracture", "spine", "head", "burn", "bleeding"],
        "Trauma Management",
        ModuleCategory::Trauma,
    ),
    (
        &["assessment", "primary", "secondary", "sample", "vitals"],
        "Patient Assessment",
        ModuleCategory::Assessment,
    ),
    (
        &["evacuation", "rescue", "extraction"],
        "Evacuation & Rescue",
        ModuleCategory::Evacuation,
    ),
    (
        &["communication", "radio", "signal"],
        "Communication",
        ModuleCategory::Communication,
    ),
    (
        &["minor", "micro", "blister", "dental", "skin"],
        "Minor Medical Issues",
        ModuleCategory::Minor,
    ),
];

/// Module title and category for a chapter.
///
/// Title keywords decide first; otherwise the chapter number picks a topic,
/// and chapters past nine keep their own title under [`ModuleCategory::General`].
#[must_use]
pub fn map_chapter_to_module(title: &str, chapter_number: i32) -> (String, ModuleCategory) {
    let lowered = title.to_lowercase();

    for (keywords, module_title, category) in KEYWORD_RULES {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return ((*module_title).to_string(), *category);
        }
    }

    let (module_title, category) = match chapter_number {
        1..=3 => ("Patient Assessment", ModuleCategory::Assessment),
        4..=6 => ("Trauma Management", ModuleCategory::Trauma),
        7 => ("Medical Emergencies", ModuleCategory::Medical),
        8 => ("Environmental Emergencies", ModuleCategory::Environmental),
        9 => ("Minor Medical Issues", ModuleCategory::Minor),
        _ => return (title.to_string(), ModuleCategory::General),
    };
    (module_title.to_string(), category)
}

fn soap_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)SOAA(?:['’ ])?P").expect("valid SOAP pattern"))
}

/// Rewrite legacy note-format names ("SOAA'P", "SOAAP", "SOAA P") to "SOAPNote".
#[must_use]
pub fn process_content(content: &str) -> String {
    soap_pattern().replace_all(content, "SOAPNote").into_owned()
}

fn migrate_block(block: &ContentBlock) -> ModuleBlock {
    ModuleBlock {
        id: Uuid::new_v4(),
        block_type: block.block_type.into(),
        content: process_content(&block.content),
        order_index: block.order_index,
        metadata: block.metadata.clone(),
        location: None,
    }
}

fn migrate_section(section: &Section) -> ModuleSection {
    ModuleSection {
        id: Uuid::new_v4(),
        title: section.title.clone(),
        subtitle: None,
        content: section.content.iter().map(migrate_block).collect(),
        order_index: section.order_index,
    }
}

/// Convert one chapter into a topic module.
#[must_use]
pub fn migrate_chapter(chapter: &Chapter) -> Module {
    let (module_title, category) = map_chapter_to_module(&chapter.title, chapter.chapter_number);
    debug!(
        chapter = chapter.chapter_number,
        title = %chapter.title,
        module = %module_title,
        category = %category,
        "Mapped chapter"
    );

    Module {
        id: Uuid::new_v4(),
        module_title,
        module_subtitle: chapter.subtitle.clone(),
        category,
        icon_name: Some(category.icon().to_string()),
        module_description: None,
        sections: chapter.sections.iter().map(migrate_section).collect(),
        order_index: chapter.order_index,
        is_bookmarked: chapter.is_bookmarked,
        location: None,
    }
}

/// Give Environmental and Evacuation modules, and every scenario block, a
/// park location. Returns how many locations were assigned.
///
/// Locations are not repeated across the batch until the picker's limits
/// are reached.
pub fn assign_locations<R: Rng + ?Sized>(modules: &mut [Module], rng: &mut R) -> usize {
    let mut picker = LocationPicker::new();
    let mut assigned = 0;

    for module in modules.iter_mut() {
        if matches!(
            module.category,
            ModuleCategory::Environmental | ModuleCategory::Evacuation
        ) {
            let location =
                picker.pick(rng, Some(module.category), LocationPicker::MODULE_LIMIT);
            debug!(module = %module.module_title, location = %location, "Assigned module location");
            module.location = Some(location);
            assigned += 1;
        }

        for section in &mut module.sections {
            for block in &mut section.content {
                if block.block_type == ModuleBlockType::Scenario {
                    block.location = Some(picker.pick(rng, None, LocationPicker::BLOCK_LIMIT));
                    assigned += 1;
                }
            }
        }
    }
    assigned
}

/// Convert every chapter, in ascending `order_index`, and assign scenario
/// locations with the thread-local generator.
#[must_use]
pub fn migrate_all(chapters: &[Chapter]) -> Vec<Module> {
    migrate_all_with_rng(chapters, &mut rand::thread_rng())
}

/// [`migrate_all`] with a caller-supplied generator.
pub fn migrate_all_with_rng<R: Rng + ?Sized>(chapters: &[Chapter], rng: &mut R) -> Vec<Module> {
    let mut ordered: Vec<&Chapter> = chapters.iter().collect();
    ordered.sort_by_key(|c| c.order_index);

    let mut modules: Vec<Module> = ordered.into_iter().map(migrate_chapter).collect();
    let located = assign_locations(&mut modules, rng);
    info!(modules = modules.len(), located, "Migrated chapters to modules");
    modules
}

/// Parse a JSON array of chapters.
///
/// # Errors
///
/// Returns an error if the text is not a valid chapter list.
pub fn parse_chapters(json: &str) -> Result<Vec<Chapter>> {
    Ok(serde_json::from_str(json)?)
}
