use crate::grid::{footprint::*, orientation::*};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, error::Error, fmt, fs::File, io::BufReader, path::Path, sync::Arc};

pub const CATALOG_FILE: &str = "assets/buildings.json";

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum BuildingType {
    #[default]
    None,
    StandardRoom,
    Suite,
    Villa,
    MassageRoom,
    YogaStudio,
    MeditationRoom,
    Restaurant,
    JuiceBar,
    Garden,
    StaffRoom,
    Office,
    Utility,
}

impl BuildingType {
    pub fn display_name(&self) -> &'static str {
        match *self {
            BuildingType::None => "None",
            BuildingType::StandardRoom => "Standard Room",
            BuildingType::Suite => "Suite",
            BuildingType::Villa => "Villa",
            BuildingType::MassageRoom => "Massage Room",
            BuildingType::YogaStudio => "Yoga Studio",
            BuildingType::MeditationRoom => "Meditation Room",
            BuildingType::Restaurant => "Restaurant",
            BuildingType::JuiceBar => "Juice Bar",
            BuildingType::Garden => "Garden",
            BuildingType::StaffRoom => "Staff Room",
            BuildingType::Office => "Office",
            BuildingType::Utility => "Utility",
        }
    }
}

/// A placement constraint against the cells around a candidate origin.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjacencyRequirement {
    pub building_type: BuildingType,
    pub direction: GridDirection,
    /// The building type must NOT be found in the given direction.
    pub negative: bool,
}

impl AdjacencyRequirement {
    pub fn new(building_type: BuildingType, direction: GridDirection, negative: bool) -> Self {
        Self {
            building_type,
            direction,
            negative,
        }
    }
}

/// Read-only content definition of a placeable building.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingAsset {
    pub name: String,
    pub description: String,
    pub building_type: BuildingType,
    pub footprint: BuildingFootprint,
    pub construction_cost: i32,
    pub maintenance_cost: i32,
    pub base_revenue: i32,
    pub requires_water: bool,
    pub requires_electricity: bool,
    pub required_staff: BTreeMap<String, u32>,
    pub adjacency: Vec<AdjacencyRequirement>,
    pub max_guests: u32,
    pub supported_treatments: Vec<String>,
}

impl Default for BuildingAsset {
    fn default() -> Self {
        Self {
            name: "New Building".to_string(),
            description: "A building that can be placed on the grid.".to_string(),
            building_type: BuildingType::None,
            footprint: BuildingFootprint::default(),
            construction_cost: 1000,
            maintenance_cost: 50,
            base_revenue: 100,
            requires_water: false,
            requires_electricity: false,
            required_staff: BTreeMap::new(),
            adjacency: Vec::new(),
            max_guests: 1,
            supported_treatments: Vec::new(),
        }
    }
}

impl BuildingAsset {
    pub fn new(name: &str, building_type: BuildingType, footprint: BuildingFootprint) -> Self {
        Self {
            name: name.to_string(),
            building_type,
            footprint,
            ..default()
        }
    }

    pub fn with_staff(mut self, role: &str, count: u32) -> Self {
        self.required_staff.insert(role.to_string(), count);
        self
    }

    pub fn with_adjacency(mut self, requirement: AdjacencyRequirement) -> Self {
        self.adjacency.push(requirement);
        self
    }

    pub fn with_guests(mut self, max_guests: u32) -> Self {
        self.max_guests = max_guests;
        self
    }

    pub fn with_treatments(mut self, treatments: &[&str]) -> Self {
        self.supported_treatments = treatments.iter().map(|t| t.to_string()).collect();
        self
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Empty,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "could not read building catalog: {}", err),
            CatalogError::Parse(err) => write!(f, "malformed building catalog: {}", err),
            CatalogError::Empty => write!(f, "building catalog has no entries"),
        }
    }
}

impl Error for CatalogError {}

/// Every building the player can pick from, in palette order.
#[derive(Resource, Debug, Clone)]
pub struct BuildingCatalog {
    assets: Vec<Arc<BuildingAsset>>,
}

impl Default for BuildingCatalog {
    fn default() -> Self {
        let assets = vec![
            BuildingAsset::new("Standard Room", BuildingType::StandardRoom, BuildingFootprint::rectangle(1, 1))
                .with_staff("housekeeper", 1)
                .with_guests(2),
            BuildingAsset::new("Suite", BuildingType::Suite, BuildingFootprint::rectangle(2, 1))
                .with_staff("housekeeper", 1)
                .with_guests(2),
            BuildingAsset::new("Villa", BuildingType::Villa, BuildingFootprint::rectangle(2, 2))
                .with_staff("housekeeper", 2)
                .with_guests(4)
                .with_adjacency(AdjacencyRequirement::new(BuildingType::Utility, GridDirection::Any, true)),
            BuildingAsset::new("Massage Room", BuildingType::MassageRoom, BuildingFootprint::rectangle(1, 2))
                .with_staff("therapist", 1)
                .with_treatments(&["massage", "aromatherapy"]),
            BuildingAsset::new("Yoga Studio", BuildingType::YogaStudio, BuildingFootprint::rectangle(3, 2))
                .with_staff("instructor", 1)
                .with_guests(8)
                .with_treatments(&["yoga"]),
            BuildingAsset::new("Meditation Room", BuildingType::MeditationRoom, BuildingFootprint::rectangle(2, 2))
                .with_guests(6)
                .with_treatments(&["meditation"])
                .with_adjacency(AdjacencyRequirement::new(BuildingType::Restaurant, GridDirection::Any, true)),
            BuildingAsset::new("Restaurant", BuildingType::Restaurant, BuildingFootprint::rectangle(3, 3))
                .with_staff("cook", 2)
                .with_guests(12),
            BuildingAsset::new(
                "Juice Bar",
                BuildingType::JuiceBar,
                BuildingFootprint::shape(vec![IVec2::ZERO, IVec2::new(1, 0), IVec2::new(0, 1)]),
            )
            .with_staff("bartender", 1)
            .with_guests(4),
            BuildingAsset::new("Garden", BuildingType::Garden, BuildingFootprint::rectangle(2, 2)).with_guests(10),
            BuildingAsset::new("Staff Room", BuildingType::StaffRoom, BuildingFootprint::rectangle(2, 1)),
            BuildingAsset::new("Office", BuildingType::Office, BuildingFootprint::rectangle(2, 2))
                .with_staff("manager", 1),
            BuildingAsset::new("Utility", BuildingType::Utility, BuildingFootprint::rectangle(1, 1)),
        ];

        BuildingCatalog::new(assets)
    }
}

impl BuildingCatalog {
    pub fn new(assets: Vec<BuildingAsset>) -> Self {
        Self {
            assets: assets.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let assets: Vec<BuildingAsset> = serde_json::from_str(json).map_err(CatalogError::Parse)?;
        if assets.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(BuildingCatalog::new(assets))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path).map_err(CatalogError::Io)?;
        let assets: Vec<BuildingAsset> =
            serde_json::from_reader(BufReader::new(file)).map_err(CatalogError::Parse)?;
        if assets.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(BuildingCatalog::new(assets))
    }

    pub fn get(&self, index: usize) -> Option<&Arc<BuildingAsset>> {
        self.assets.get(index)
    }

    pub fn by_type(&self, building_type: BuildingType) -> Option<&Arc<BuildingAsset>> {
        self.assets.iter().find(|asset| asset.building_type == building_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<BuildingAsset>> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }
}

pub fn load_building_catalog(mut commands: Commands) {
    let catalog = match BuildingCatalog::load(CATALOG_FILE) {
        Ok(catalog) => {
            log::info!("Loaded {} building definitions from {:?}", catalog.len(), CATALOG_FILE);
            catalog
        }
        Err(err) => {
            log::warn!("{}; using the built-in building catalog", err);
            BuildingCatalog::default()
        }
    };
    commands.insert_resource(catalog);
}
