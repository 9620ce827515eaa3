//! Park locations used to set the scene for practice scenarios.
//!
//! Migration gives Environmental and Evacuation modules, and every scenario
//! block, a backcountry location. Picks avoid repeating a location until a
//! per-kind limit of used locations is reached.

use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use super::module::ModuleCategory;

/// Kind of public land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParkType {
    /// National park or preserve.
    NationalPark,
    /// National forest.
    NationalForest,
    /// State park.
    StatePark,
    /// Designated wilderness area.
    WildernessArea,
    /// National monument.
    NationalMonument,
}

/// Dominant terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    /// Mountain.
    Mountain,
    /// Desert.
    Desert,
    /// Forest.
    Forest,
    /// Alpine, above treeline.
    Alpine,
    /// Coastal.
    Coastal,
    /// Canyon country.
    Canyon,
    /// Tundra.
    Tundra,
}

/// Typical elevation band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Elevation {
    /// 2,000 to 5,000 ft.
    Low,
    /// 5,000 to 8,000 ft.
    Moderate,
    /// 8,000 to 11,000 ft.
    High,
    /// Above 11,000 ft.
    VeryHigh,
}

/// A park or wilderness area a scenario can take place in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParkLocation {
    /// Park name.
    pub name: &'static str,
    /// State or states it lies in.
    pub state: &'static str,
    /// Kind of land.
    pub park_type: ParkType,
    /// Dominant terrain.
    pub terrain: Terrain,
    /// Elevation band.
    pub elevation: Elevation,
    /// Whether it offers true backcountry.
    pub remote: bool,
}

impl fmt::Display for ParkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.state)
    }
}

const fn park(
    name: &'static str,
    state: &'static str,
    park_type: ParkType,
    terrain: Terrain,
    elevation: Elevation,
) -> ParkLocation {
    ParkLocation {
        name,
        state,
        park_type,
        terrain,
        elevation,
        remote: true,
    }
}

const fn frontcountry(
    name: &'static str,
    state: &'static str,
    park_type: ParkType,
    terrain: Terrain,
    elevation: Elevation,
) -> ParkLocation {
    ParkLocation {
        remote: false,
        ..park(name, state, park_type, terrain, elevation)
    }
}

use Elevation::{High, Low, Moderate, VeryHigh};
use ParkType::{NationalForest, NationalMonument, NationalPark, StatePark, WildernessArea};
use Terrain::{Alpine, Canyon, Coastal, Desert, Forest, Mountain, Tundra};

/// Every known location.
pub const PARK_LOCATIONS: &[ParkLocation] = &[
    park("Yellowstone National Park", "Wyoming/Montana/Idaho", NationalPark, Mountain, Moderate),
    park("Yosemite National Park", "California", NationalPark, Mountain, High),
    park("Rocky Mountain National Park", "Colorado", NationalPark, Alpine, VeryHigh),
    park("Grand Teton National Park", "Wyoming", NationalPark, Mountain, High),
    park("Glacier National Park", "Montana", NationalPark, Alpine, High),
    park("Mount Rainier National Park", "Washington", NationalPark, Alpine, VeryHigh),
    park("North Cascades National Park", "Washington", NationalPark, Alpine, VeryHigh),
    park("Olympic National Park", "Washington", NationalPark, Mountain, Moderate),
    park("Sequoia National Park", "California", NationalPark, Mountain, High),
    park("Kings Canyon National Park", "California", NationalPark, Mountain, High),
    park("Great Smoky Mountains National Park", "North Carolina/Tennessee", NationalPark, Mountain, Moderate),
    park("Shenandoah National Park", "Virginia", NationalPark, Mountain, Moderate),
    park("Acadia National Park", "Maine", NationalPark, Coastal, Low),
    park("Black Hills National Forest", "South Dakota", NationalForest, Mountain, Moderate),
    park("Grand Canyon National Park", "Arizona", NationalPark, Canyon, Moderate),
    park("Zion National Park", "Utah", NationalPark, Canyon, Moderate),
    park("Arches National Park", "Utah", NationalPark, Desert, Moderate),
    park("Canyonlands National Park", "Utah", NationalPark, Canyon, Moderate),
    park("Bryce Canyon National Park", "Utah", NationalPark, Canyon, High),
    park("Joshua Tree National Park", "California", NationalPark, Desert, Low),
    park("Death Valley National Park", "California", NationalPark, Desert, Low),
    park("Mojave National Preserve", "California", NationalPark, Desert, Moderate),
    park("Capitol Reef National Park", "Utah", NationalPark, Canyon, Moderate),
    park("Redwood National Park", "California", NationalPark, Forest, Low),
    park("Great Basin National Park", "Nevada", NationalPark, Mountain, High),
    park("Crater Lake National Park", "Oregon", NationalPark, Alpine, High),
    park("Mount Hood National Forest", "Oregon", NationalForest, Mountain, High),
    park("Baxter State Park", "Maine", StatePark, Mountain, Moderate),
    park("Adirondack Park", "New York", StatePark, Mountain, Moderate),
    park("White Mountain National Forest", "New Hampshire", NationalForest, Mountain, Moderate),
    park("San Juan National Forest", "Colorado", NationalForest, Mountain, High),
    park("Sawtooth National Forest", "Idaho", NationalForest, Mountain, High),
    park("Uinta-Wasatch-Cache National Forest", "Utah", NationalForest, Mountain, High),
    park("Big Bend National Park", "Texas", NationalPark, Desert, Moderate),
    park("Guadalupe Mountains National Park", "Texas", NationalPark, Desert, High),
    park("Chiricahua National Monument", "Arizona", NationalMonument, Desert, Moderate),
    park("Organ Pipe Cactus National Monument", "Arizona", NationalMonument, Desert, Low),
    park("Alleghany State Park", "Pennsylvania", StatePark, Forest, Low),
    frontcountry("Hocking Hills State Park", "Ohio", StatePark, Forest, Low),
    frontcountry("Letchworth State Park", "New York", StatePark, Forest, Low),
    park("Frank Church River of No Return Wilderness", "Idaho", WildernessArea, Mountain, Moderate),
    park("Selway-Bitterroot Wilderness", "Idaho/Montana", WildernessArea, Mountain, Moderate),
    park("Bob Marshall Wilderness", "Montana", WildernessArea, Mountain, High),
    park("Absaroka-Beartooth Wilderness", "Montana/Wyoming", WildernessArea, Alpine, VeryHigh),
    park("Weminuche Wilderness", "Colorado", WildernessArea, Alpine, VeryHigh),
    park("Maroon Bells-Snowmass Wilderness", "Colorado", WildernessArea, Alpine, VeryHigh),
    park("John Muir Wilderness", "California", WildernessArea, Alpine, VeryHigh),
    park("Ansel Adams Wilderness", "California", WildernessArea, Alpine, VeryHigh),
    park("Sawtooth Wilderness", "Idaho", WildernessArea, Mountain, High),
    park("Denali National Park", "Alaska", NationalPark, Tundra, VeryHigh),
    park("Gates of the Arctic National Park", "Alaska", NationalPark, Tundra, Moderate),
    park("Wrangell-St. Elias National Park", "Alaska", NationalPark, Alpine, VeryHigh),
    park("Kenai Fjords National Park", "Alaska", NationalPark, Coastal, Low),
    park("Haleakalā National Park", "Hawaii", NationalPark, Mountain, High),
    park("Hawaiʻi Volcanoes National Park", "Hawaii", NationalPark, Mountain, Moderate),
];

/// Used when no candidate matches.
const FALLBACK: ParkLocation = PARK_LOCATIONS[0];

/// Attributes a location must have. Unset fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationFilter {
    /// Required land type.
    pub park_type: Option<ParkType>,
    /// Required terrain.
    pub terrain: Option<Terrain>,
    /// Required elevation band.
    pub elevation: Option<Elevation>,
}

impl LocationFilter {
    const ANY: Self = Self {
        park_type: None,
        terrain: None,
        elevation: None,
    };

    const fn terrain(terrain: Terrain) -> Self {
        Self {
            terrain: Some(terrain),
            ..Self::ANY
        }
    }

    /// Whether `location` has every required attribute.
    #[must_use]
    pub fn matches(&self, location: &ParkLocation) -> bool {
        self.park_type.map_or(true, |t| t == location.park_type)
            && self.terrain.map_or(true, |t| t == location.terrain)
            && self.elevation.map_or(true, |e| e == location.elevation)
    }
}

const ANYWHERE: LocationFilter = LocationFilter::ANY;
const ALPINE: LocationFilter = LocationFilter::terrain(Alpine);
const CANYON: LocationFilter = LocationFilter::terrain(Canyon);
const DESERT: LocationFilter = LocationFilter::terrain(Desert);
const FOREST: LocationFilter = LocationFilter::terrain(Forest);
const MOUNTAIN: LocationFilter = LocationFilter::terrain(Mountain);

const HIGH_ALPINE: LocationFilter = LocationFilter {
    elevation: Some(VeryHigh),
    ..ALPINE
};

const WILDERNESS: LocationFilter = LocationFilter {
    park_type: Some(WildernessArea),
    ..ANYWHERE
};

/// Settings that suit a category: cold and heat extremes for environmental
/// topics, rugged terrain for trauma and evacuation, anywhere otherwise.
#[must_use]
pub fn category_filters(category: Option<ModuleCategory>) -> &'static [LocationFilter] {
    match category {
        Some(ModuleCategory::Environmental) => &[HIGH_ALPINE, DESERT, MOUNTAIN],
        Some(ModuleCategory::Trauma) => &[MOUNTAIN, FOREST, CANYON],
        Some(ModuleCategory::Evacuation) => &[ALPINE, MOUNTAIN, WILDERNESS],
        _ => &[ANYWHERE],
    }
}

/// Remote locations matching any of the category's filters, in table order.
#[must_use]
pub fn candidates(category: Option<ModuleCategory>) -> Vec<&'static ParkLocation> {
    let filters = category_filters(category);
    PARK_LOCATIONS
        .iter()
        .filter(|location| location.remote && filters.iter().any(|f| f.matches(location)))
        .collect()
}

/// A random location for `category`, formatted as `"Name, State"`.
pub fn random_location<R: Rng + ?Sized>(rng: &mut R, category: Option<ModuleCategory>) -> String {
    candidates(category)
        .choose(rng)
        .map_or_else(|| FALLBACK.to_string(), ToString::to_string)
}

/// Hands out scenario locations without repeats.
///
/// Each pick passes a limit: while fewer locations than that have been handed
/// out, used ones are skipped. Past the limit, or once every candidate is
/// used, repeats are allowed.
#[derive(Debug, Default)]
pub struct LocationPicker {
    used: HashSet<String>,
}

impl LocationPicker {
    /// Limit for module-level locations.
    pub const MODULE_LIMIT: usize = 50;

    /// Limit for scenario block locations.
    pub const BLOCK_LIMIT: usize = 100;

    /// A picker with nothing used yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a location for `category` and mark it used.
    pub fn pick<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        category: Option<ModuleCategory>,
        limit: usize,
    ) -> String {
        let pool = candidates(category);
        let fresh: Vec<_> = if self.used.len() < limit {
            pool.iter()
                .copied()
                .filter(|location| !self.used.contains(&location.to_string()))
                .collect()
        } else {
            Vec::new()
        };

        let choice = fresh
            .choose(rng)
            .or_else(|| pool.choose(rng))
            .map_or_else(|| FALLBACK.to_string(), ToString::to_string);
        self.used.insert(choice.clone());
        choice
    }

    /// How many distinct locations have been handed out.
    #[must_use]
    pub fn used(&self) -> usize {
        self.used.len()
    }
}
