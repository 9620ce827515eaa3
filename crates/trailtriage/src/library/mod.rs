//! Field guide reference content and its chapter-to-module migration.

mod chapter;
mod locations;
mod migration;
mod module;

pub use chapter::{Chapter, ContentBlock, ContentBlockType, Section};
pub use locations::{
    candidates, category_filters, random_location, Elevation, LocationFilter, LocationPicker,
    ParkLocation, ParkType, Terrain, PARK_LOCATIONS,
};
pub use migration::{
    assign_locations, map_chapter_to_module, migrate_all, migrate_all_with_rng, migrate_chapter,
    parse_chapters, process_content,
};
pub use module::{Module, ModuleBlock, ModuleBlockType, ModuleCategory, ModuleSection};
