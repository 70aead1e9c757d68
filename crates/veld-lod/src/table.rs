//! Distance threshold tables scaled by device capability.

use serde::Serialize;
use veld_config::LodConfig;

/// Distance thresholds for a three-band LOD category, closest band first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceBand {
    /// Maximum distance for full detail.
    pub high: f64,
    /// Maximum distance for medium detail.
    pub medium: f64,
    /// Maximum distance for low detail; beyond this is the coarsest bucket.
    pub low: f64,
}

impl DistanceBand {
    fn scaled(&self, factor: f64) -> Self {
        Self {
            high: self.high * factor,
            medium: self.medium * factor,
            low: self.low * factor,
        }
    }
}

/// Water-specific distance thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaterDistances {
    /// Maximum distance at which reflections are rendered.
    pub reflection: f64,
    /// Maximum distance for high-detail water geometry.
    pub high_detail: f64,
    /// Maximum distance for medium-detail water geometry.
    pub medium_detail: f64,
}

impl WaterDistances {
    fn scaled(&self, factor: f64) -> Self {
        Self {
            reflection: self.reflection * factor,
            high_detail: self.high_detail * factor,
            medium_detail: self.medium_detail * factor,
        }
    }
}

/// Per-category LOD distance thresholds in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LodDistanceTable {
    pub terrain: DistanceBand,
    pub vegetation: DistanceBand,
    pub water: WaterDistances,
}

impl LodDistanceTable {
    /// Build the unscaled base table from configuration.
    pub fn from_config(config: &LodConfig) -> Self {
        Self {
            terrain: DistanceBand {
                high: config.terrain_high,
                medium: config.terrain_medium,
                low: config.terrain_low,
            },
            vegetation: DistanceBand {
                high: config.vegetation_high,
                medium: config.vegetation_medium,
                low: config.vegetation_low,
            },
            water: WaterDistances {
                reflection: config.water_reflection,
                high_detail: config.water_high_detail,
                medium_detail: config.water_medium_detail,
            },
        }
    }

    /// Every threshold multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            terrain: self.terrain.scaled(factor),
            vegetation: self.vegetation.scaled(factor),
            water: self.water.scaled(factor),
        }
    }
}

impl Default for LodDistanceTable {
    fn default() -> Self {
        Self::from_config(&LodConfig::default())
    }
}

/// Caches the scaled table, recomputing only when the factor changes.
#[derive(Debug, Clone)]
pub struct DistanceTableCache {
    base: LodDistanceTable,
    scaled: LodDistanceTable,
    factor: f64,
}

impl DistanceTableCache {
    /// Create a cache over `base`, initially scaled by `factor`.
    pub fn new(base: LodDistanceTable, factor: f64) -> Self {
        Self {
            base,
            scaled: base.scaled(factor),
            factor,
        }
    }

    /// The current scaled table.
    pub fn table(&self) -> &LodDistanceTable {
        &self.scaled
    }

    /// The factor the cached table was computed with.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Recompute if `factor` differs from the cached one.
    ///
    /// Returns `true` when the table was actually invalidated, so callers can
    /// gate their own downstream recomputation on it.
    pub fn refresh(&mut self, factor: f64) -> bool {
        if factor == self.factor {
            return false;
        }
        self.factor = factor;
        self.scaled = self.base.scaled(factor);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_scales_every_entry() {
        let base = LodDistanceTable::default();
        let half = base.scaled(0.5);
        assert_eq!(half.terrain.high, base.terrain.high * 0.5);
        assert_eq!(half.vegetation.low, base.vegetation.low * 0.5);
        assert_eq!(half.water.reflection, base.water.reflection * 0.5);
    }

    #[test]
    fn test_unit_factor_is_identity() {
        let base = LodDistanceTable::default();
        assert_eq!(base.scaled(1.0), base);
    }

    #[test]
    fn test_cache_refresh_only_on_change() {
        let mut cache = DistanceTableCache::new(LodDistanceTable::default(), 1.0);
        assert!(!cache.refresh(1.0), "same factor must not invalidate");
        assert!(cache.refresh(0.8), "new factor must invalidate");
        assert!(!cache.refresh(0.8), "repeated factor must not invalidate");
    }

    #[test]
    fn test_cache_table_matches_factor() {
        let base = LodDistanceTable::default();
        let mut cache = DistanceTableCache::new(base, 1.0);
        cache.refresh(0.3);
        assert_eq!(cache.table().terrain.medium, base.terrain.medium * 0.3);
        assert_eq!(cache.factor(), 0.3);
    }

    #[test]
    fn test_band_ordering_preserved_under_scaling() {
        let table = LodDistanceTable::default().scaled(0.42);
        assert!(table.terrain.high < table.terrain.medium);
        assert!(table.terrain.medium < table.terrain.low);
        assert!(table.water.reflection < table.water.high_detail);
    }
}
