//! Per-tier quality parameter bundles.

use serde::Serialize;

use crate::tier::QualityTier;

/// How terrain chunk resolution is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerrainLodMode {
    /// Every chunk uses the fixed segment count of the named tier.
    Fixed(QualityTier),
    /// Chunk resolution is bucketed by distance against the LOD table.
    Adaptive,
}

/// Named optimization toggles applied alongside a tier.
///
/// A fixed-shape struct rather than a loose flag map: every field exists at
/// every tier, and a missing flag is a compile error rather than a silent
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OptimizationFlags {
    pub aggressive_culling: bool,
    pub reduced_textures: bool,
    pub simplified_shadows: bool,
    pub dynamic_resolution_scaling: bool,
}

/// The parameter bundle applied when a tier is entered.
///
/// Looked up per tier, never computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityPreset {
    pub terrain_lod: TerrainLodMode,
    /// Vegetation density scale in `[0, 1]`.
    pub vegetation_density: f64,
    pub water_reflections: bool,
    pub flags: OptimizationFlags,
}

impl QualityPreset {
    /// Construct a preset, validating value domains.
    ///
    /// # Panics
    ///
    /// Panics if `vegetation_density` is outside `[0, 1]`.
    pub fn new(
        terrain_lod: TerrainLodMode,
        vegetation_density: f64,
        water_reflections: bool,
        flags: OptimizationFlags,
    ) -> Self {
        assert!(
            (0.0..=1.0).contains(&vegetation_density),
            "vegetation_density must be in [0, 1], got {vegetation_density}"
        );
        Self {
            terrain_lod,
            vegetation_density,
            water_reflections,
            flags,
        }
    }

    /// The bundle for a tier.
    pub fn for_tier(tier: QualityTier) -> Self {
        match tier {
            QualityTier::Low => Self::new(
                TerrainLodMode::Fixed(QualityTier::Low),
                0.25,
                false,
                OptimizationFlags {
                    aggressive_culling: true,
                    reduced_textures: true,
                    simplified_shadows: true,
                    dynamic_resolution_scaling: true,
                },
            ),
            QualityTier::Medium => Self::new(
                TerrainLodMode::Adaptive,
                0.6,
                false,
                OptimizationFlags {
                    aggressive_culling: false,
                    reduced_textures: false,
                    simplified_shadows: true,
                    dynamic_resolution_scaling: true,
                },
            ),
            QualityTier::High => Self::new(
                TerrainLodMode::Adaptive,
                1.0,
                true,
                OptimizationFlags::default(),
            ),
        }
    }
}
