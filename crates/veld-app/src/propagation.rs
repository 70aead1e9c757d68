//! Change-gated propagation of quality decisions to dependent systems.

use tracing::{debug, info};
use veld_lod::LodDistanceTable;
use veld_quality::QualityPreset;

use crate::collaborators::{VegetationCollaborator, WaterCollaborator};

/// What one propagation pass actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationOutcome {
    pub vegetation_regenerated: bool,
    pub water_recreated: bool,
}

/// Applies quality presets to the vegetation and water collaborators.
///
/// Propagation is idempotent and change-gated: vegetation is only reassigned
/// and regenerated when the density actually differs, and water is only
/// recreated when the reflection flag flips — re-applying the same preset
/// every cycle does nothing. Collaborators that have not been registered yet
/// are skipped and picked up on a later pass.
#[derive(Default)]
pub struct Propagator {
    vegetation: Option<Box<dyn VegetationCollaborator>>,
    water: Option<Box<dyn WaterCollaborator>>,
}

impl Propagator {
    /// Register the vegetation collaborator.
    pub fn set_vegetation(&mut self, vegetation: Box<dyn VegetationCollaborator>) {
        self.vegetation = Some(vegetation);
    }

    /// Register the water collaborator.
    pub fn set_water(&mut self, water: Box<dyn WaterCollaborator>) {
        self.water = Some(water);
    }

    /// Push a preset and the current distance table out to collaborators.
    pub fn apply(&mut self, preset: &QualityPreset, table: &LodDistanceTable) -> PropagationOutcome {
        let mut outcome = PropagationOutcome::default();

        match self.vegetation.as_mut() {
            Some(vegetation) => {
                vegetation.set_lod_distances(&table.vegetation);
                let current = vegetation.density_scale();
                if (current - preset.vegetation_density).abs() > f64::EPSILON {
                    vegetation.set_density_scale(preset.vegetation_density);
                    vegetation.regenerate();
                    outcome.vegetation_regenerated = true;
                    info!(
                        from = current,
                        to = preset.vegetation_density,
                        "vegetation density changed, regenerating"
                    );
                }
            }
            None => debug!("vegetation collaborator not registered, skipping"),
        }

        match self.water.as_mut() {
            Some(water) => {
                if water.reflection_enabled() != preset.water_reflections {
                    water.recreate(preset.water_reflections, &table.water);
                    outcome.water_recreated = true;
                    info!(reflections = preset.water_reflections, "water quality recreated");
                }
            }
            None => debug!("water collaborator not registered, skipping"),
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use veld_lod::{DistanceBand, WaterDistances};
    use veld_quality::{QualityPreset, QualityTier};

    struct StubVegetation {
        density: f64,
        regenerations: Rc<Cell<u32>>,
    }

    impl VegetationCollaborator for StubVegetation {
        fn density_scale(&self) -> f64 {
            self.density
        }
        fn set_density_scale(&mut self, scale: f64) {
            self.density = scale;
        }
        fn regenerate(&mut self) {
            self.regenerations.set(self.regenerations.get() + 1);
        }
        fn set_lod_distances(&mut self, _band: &DistanceBand) {}
    }

    struct StubWater {
        reflections: bool,
        recreations: Rc<Cell<u32>>,
    }

    impl WaterCollaborator for StubWater {
        fn reflection_enabled(&self) -> bool {
            self.reflections
        }
        fn recreate(&mut self, reflections: bool, _distances: &WaterDistances) {
            self.reflections = reflections;
            self.recreations.set(self.recreations.get() + 1);
        }
    }

    fn propagator_with_stubs() -> (Propagator, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let regenerations = Rc::new(Cell::new(0));
        let recreations = Rc::new(Cell::new(0));
        let mut propagator = Propagator::default();
        propagator.set_vegetation(Box::new(StubVegetation {
            density: 1.0,
            regenerations: Rc::clone(&regenerations),
        }));
        propagator.set_water(Box::new(StubWater {
            reflections: true,
            recreations: Rc::clone(&recreations),
        }));
        (propagator, regenerations, recreations)
    }

    #[test]
    fn test_changes_propagate_once() {
        let (mut propagator, regenerations, recreations) = propagator_with_stubs();
        let table = LodDistanceTable::default();
        let low = QualityPreset::for_tier(QualityTier::Low);

        let outcome = propagator.apply(&low, &table);
        assert!(outcome.vegetation_regenerated, "density 1.0 -> 0.25 regenerates");
        assert!(outcome.water_recreated, "reflections on -> off recreates");
        assert_eq!(regenerations.get(), 1);
        assert_eq!(recreations.get(), 1);
    }

    #[test]
    fn test_reapplying_same_preset_is_a_noop() {
        let (mut propagator, regenerations, recreations) = propagator_with_stubs();
        let table = LodDistanceTable::default();
        let low = QualityPreset::for_tier(QualityTier::Low);

        propagator.apply(&low, &table);
        for _ in 0..5 {
            let outcome = propagator.apply(&low, &table);
            assert_eq!(outcome, PropagationOutcome::default());
        }
        assert_eq!(regenerations.get(), 1, "regeneration must not repeat");
        assert_eq!(recreations.get(), 1, "recreation must not repeat");
    }

    #[test]
    fn test_missing_collaborators_are_skipped() {
        let mut propagator = Propagator::default();
        let table = LodDistanceTable::default();
        let outcome = propagator.apply(&QualityPreset::for_tier(QualityTier::High), &table);
        assert_eq!(outcome, PropagationOutcome::default());
    }

    #[test]
    fn test_high_preset_restores_reflections() {
        let (mut propagator, _, recreations) = propagator_with_stubs();
        let table = LodDistanceTable::default();

        propagator.apply(&QualityPreset::for_tier(QualityTier::Low), &table);
        propagator.apply(&QualityPreset::for_tier(QualityTier::High), &table);
        assert_eq!(recreations.get(), 2, "off then on is two recreations");
    }
}
