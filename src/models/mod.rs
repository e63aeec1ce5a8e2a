//! Built-in model recipes
//!
//! Voxel models produce a label grid plus palette and are meshed by
//! extraction; primitive models produce a mesh directly. Each carries the
//! preview settings it is meant to be viewed with.

pub mod primitive_cake;
pub mod primitive_spaceship;
pub mod voxel_cake;
pub mod voxel_spaceship;
pub mod voxel_station;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::mesh::{ExtractOptions, Extraction, TriMesh, extract};
use crate::render::ViewOptions;
use crate::voxel::{Palette, VoxelGrid};

pub use primitive_cake::CakeParams;
pub use voxel_station::StationVariant;

/// Label grid with its palette
#[derive(Clone, Debug)]
pub struct VoxelModel {
    pub name: &'static str,
    pub grid: VoxelGrid,
    pub palette: Palette,
    pub view: ViewOptions,
}

impl VoxelModel {
    pub fn extract(&self, options: &ExtractOptions) -> Result<Extraction> {
        log::info!(
            "Meshing {} ({} filled cells, {} labels)",
            self.name,
            self.grid.filled_count(),
            self.grid.label_counts().len()
        );
        extract(&self.grid, &self.palette, options)
    }
}

/// Mesh composed from primitives
#[derive(Clone, Debug)]
pub struct PrimitiveModel {
    pub name: &'static str,
    pub mesh: TriMesh,
    pub view: ViewOptions,
}

#[derive(Clone, Debug)]
pub enum Model {
    Voxel(VoxelModel),
    Primitive(PrimitiveModel),
}

impl Model {
    pub fn name(&self) -> &'static str {
        match self {
            Model::Voxel(m) => m.name,
            Model::Primitive(m) => m.name,
        }
    }

    pub fn view(&self) -> &ViewOptions {
        match self {
            Model::Voxel(m) => &m.view,
            Model::Primitive(m) => &m.view,
        }
    }

    /// Palette overrides only affect voxel models
    pub fn merge_palette(&mut self, overrides: &Palette) {
        match self {
            Model::Voxel(m) => m.palette.merge(overrides),
            Model::Primitive(m) if !overrides.is_empty() => {
                log::warn!("Palette overrides ignored for {}", m.name);
            }
            Model::Primitive(_) => {}
        }
    }

    /// Final mesh, extracting voxel models
    pub fn into_mesh(self, options: &ExtractOptions) -> Result<Extraction> {
        match self {
            Model::Voxel(m) => m.extract(options),
            Model::Primitive(m) => Ok(Extraction {
                mesh: m.mesh,
                missing_labels: Vec::new(),
            }),
        }
    }
}

/// Names of the built-in models
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    #[default]
    VoxelCake,
    VoxelSpaceship,
    StationCompact,
    StationCore,
    PrimitiveCake,
    PrimitiveSpaceship,
}

impl ModelKind {
    pub const ALL: [ModelKind; 6] = [
        ModelKind::VoxelCake,
        ModelKind::VoxelSpaceship,
        ModelKind::StationCompact,
        ModelKind::StationCore,
        ModelKind::PrimitiveCake,
        ModelKind::PrimitiveSpaceship,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::VoxelCake => "voxel-cake",
            ModelKind::VoxelSpaceship => "voxel-spaceship",
            ModelKind::StationCompact => "station-compact",
            ModelKind::StationCore => "station-core",
            ModelKind::PrimitiveCake => "primitive-cake",
            ModelKind::PrimitiveSpaceship => "primitive-spaceship",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn is_voxel(self) -> bool {
        !matches!(self, ModelKind::PrimitiveCake | ModelKind::PrimitiveSpaceship)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings shared by the primitive recipes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeOptions {
    /// Seed for randomized parts
    pub seed: u64,
    /// Paint primitive parts (the cake's own flag lives in `cake`)
    pub colored: bool,
    pub cake: CakeParams,
}

/// Build a model by kind
pub fn build(kind: ModelKind, options: &RecipeOptions) -> Result<Model> {
    let model = match kind {
        ModelKind::VoxelCake => Model::Voxel(voxel_cake::build()?),
        ModelKind::VoxelSpaceship => Model::Voxel(voxel_spaceship::build()?),
        ModelKind::StationCompact => Model::Voxel(voxel_station::build(StationVariant::Compact)?),
        ModelKind::StationCore => Model::Voxel(voxel_station::build(StationVariant::Core)?),
        ModelKind::PrimitiveCake => {
            let params = CakeParams {
                colored: options.cake.colored || options.colored,
                ..options.cake.clone()
            };
            Model::Primitive(primitive_cake::build(&params))
        }
        ModelKind::PrimitiveSpaceship => {
            Model::Primitive(primitive_spaceship::build(options.seed, options.colored))
        }
    };
    log::debug!("Built model {}", model.name());
    Ok(model)
}
