//! Configuration structs with sensible defaults, ordering validation, and RON
//! persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Mesh resolutions a terrain chunk may be generated at, coarsest last.
pub const CHUNK_RESOLUTIONS: [u32; 6] = [128, 64, 48, 32, 16, 8];

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Adaptive quality controller settings.
    pub quality: QualityConfig,
    /// Terrain generation and chunk pipeline settings.
    pub terrain: TerrainConfig,
    /// Base LOD distance tables, in world units.
    pub lod: LodConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// FPS-ratio bands driving quality decisions.
///
/// Each value is a fraction of the target frame rate. Only the ordering
/// `emergency < critical < below_target < headroom < good < excellent`
/// matters for correctness; the numbers themselves are tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FpsRatioBands {
    /// Below this ratio the pixel-ratio emergency lever also fires.
    pub emergency: f64,
    /// Below this ratio performance is considered critical.
    pub critical: f64,
    /// Below this ratio performance is below target.
    pub below_target: f64,
    /// Triangle pressure only forces a decrease when the ratio is under this.
    pub headroom: f64,
    /// Above this ratio (with low triangle load) quality may increase.
    pub good: f64,
    /// Above this ratio (with very low triangle load) quality may increase.
    pub excellent: f64,
}

impl Default for FpsRatioBands {
    fn default() -> Self {
        Self {
            emergency: 0.6,
            critical: 0.7,
            below_target: 0.9,
            headroom: 1.1,
            good: 1.2,
            excellent: 1.3,
        }
    }
}

/// Scene triangle-count bands driving quality decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TriangleBands {
    /// Below this count the scene is light enough for aggressive increases.
    pub low: u64,
    /// Below this count increases are permitted at all.
    pub medium: u64,
    /// Above this count decreases trigger unless fps headroom is ample.
    pub high: u64,
    /// Above this count decreases trigger unconditionally.
    pub critical: u64,
}

impl Default for TriangleBands {
    fn default() -> Self {
        Self {
            low: 200_000,
            medium: 300_000,
            high: 400_000,
            critical: 500_000,
        }
    }
}

/// Adaptive quality controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QualityConfig {
    /// Target frame rate the controller steers toward.
    pub target_fps: f64,
    /// Ring-buffer capacity for performance samples.
    pub sample_capacity: usize,
    /// Interval between performance samples, in milliseconds. At least 1000.
    pub reporting_interval_ms: f64,
    /// Interval between assessment cycles, in milliseconds.
    pub adjustment_interval_ms: f64,
    /// Minimum dwell time before a quality decrease is accepted.
    pub min_time_before_decrease_ms: f64,
    /// Minimum dwell time before a quality increase is accepted.
    /// Deliberately longer than the decrease dwell: dropping quality must
    /// react fast, raising it must not thrash.
    pub min_time_before_increase_ms: f64,
    /// Assessment cycles with fewer buffered samples than this are skipped.
    pub min_samples: usize,
    /// Wall-clock window of the startup capability benchmark.
    pub benchmark_window_ms: f64,
    /// Multiplier applied to the renderer pixel ratio on an emergency decrease.
    pub pixel_ratio_step: f64,
    /// Lowest pixel ratio the emergency lever may reach.
    pub pixel_ratio_floor: f64,
    /// FPS-ratio decision bands.
    pub fps_ratio: FpsRatioBands,
    /// Triangle-count decision bands.
    pub triangles: TriangleBands,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            sample_capacity: 100,
            reporting_interval_ms: 1000.0,
            adjustment_interval_ms: 5000.0,
            min_time_before_decrease_ms: 5000.0,
            min_time_before_increase_ms: 10_000.0,
            min_samples: 10,
            benchmark_window_ms: 2000.0,
            pixel_ratio_step: 0.9,
            pixel_ratio_floor: 0.6,
            fps_ratio: FpsRatioBands::default(),
            triangles: TriangleBands::default(),
        }
    }
}

/// Terrain generation and chunk pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Edge length of one chunk in world units.
    pub chunk_size: f64,
    /// Active radius around the viewer, in chunks.
    pub active_radius: u32,
    /// Segment count used on desktop-class devices regardless of distance.
    pub base_resolution: u32,
    /// Lowest terrain height, in world units. Used for AABB synthesis.
    pub min_height: f64,
    /// Highest terrain height, in world units. Used for AABB synthesis.
    pub max_height: f64,
    /// World seed for deterministic height generation.
    pub seed: u32,
    /// Number of noise octaves composited per height sample.
    pub octaves: u32,
    /// Spatial frequency of the first octave.
    pub frequency: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64.0,
            active_radius: 6,
            base_resolution: 64,
            min_height: -24.0,
            max_height: 96.0,
            seed: 0,
            octaves: 5,
            frequency: 0.004,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

/// Base LOD distance thresholds per category, in world units.
///
/// The runtime multiplies these by the controller's distance-scaling factor.
/// Within each category distances must be strictly increasing from the
/// closest (most detailed) band outward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    pub terrain_high: f64,
    pub terrain_medium: f64,
    pub terrain_low: f64,
    pub vegetation_high: f64,
    pub vegetation_medium: f64,
    pub vegetation_low: f64,
    pub water_reflection: f64,
    pub water_high_detail: f64,
    pub water_medium_detail: f64,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            terrain_high: 120.0,
            terrain_medium: 240.0,
            terrain_low: 480.0,
            vegetation_high: 60.0,
            vegetation_medium: 120.0,
            vegetation_low: 240.0,
            water_reflection: 90.0,
            water_high_detail: 180.0,
            water_medium_detail: 360.0,
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Emit a trace event for every assessment cycle, not just transitions.
    pub trace_decisions: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            trace_decisions: false,
        }
    }
}

// --- Validation ---

fn check_increasing(label: &str, values: &[f64]) -> Result<(), ConfigError> {
    for pair in values.windows(2) {
        if pair[0] >= pair[1] {
            return Err(ConfigError::Validation(format!(
                "{label} must be strictly increasing, got {} then {}",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

impl Config {
    /// Validate threshold ordering and value domains.
    ///
    /// Exact numbers are tuning and accepted as-is; only orderings and basic
    /// domains are enforced.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let q = &self.quality;
        let f = &q.fps_ratio;
        check_increasing(
            "quality.fps_ratio bands",
            &[
                f.emergency,
                f.critical,
                f.below_target,
                f.headroom,
                f.good,
                f.excellent,
            ],
        )?;
        let t = &q.triangles;
        check_increasing(
            "quality.triangles bands",
            &[
                t.low as f64,
                t.medium as f64,
                t.high as f64,
                t.critical as f64,
            ],
        )?;
        if q.target_fps <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "quality.target_fps must be positive, got {}",
                q.target_fps
            )));
        }
        if q.reporting_interval_ms < 1000.0 {
            return Err(ConfigError::Validation(format!(
                "quality.reporting_interval_ms must be at least 1000, got {}",
                q.reporting_interval_ms
            )));
        }
        if q.sample_capacity == 0 {
            return Err(ConfigError::Validation(
                "quality.sample_capacity must be nonzero".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&q.pixel_ratio_step) {
            return Err(ConfigError::Validation(format!(
                "quality.pixel_ratio_step must be in (0, 1), got {}",
                q.pixel_ratio_step
            )));
        }
        if !(0.0..=1.0).contains(&q.pixel_ratio_floor) {
            return Err(ConfigError::Validation(format!(
                "quality.pixel_ratio_floor must be in (0, 1], got {}",
                q.pixel_ratio_floor
            )));
        }

        let l = &self.lod;
        check_increasing(
            "lod terrain distances",
            &[l.terrain_high, l.terrain_medium, l.terrain_low],
        )?;
        check_increasing(
            "lod vegetation distances",
            &[l.vegetation_high, l.vegetation_medium, l.vegetation_low],
        )?;
        check_increasing(
            "lod water distances",
            &[l.water_reflection, l.water_high_detail, l.water_medium_detail],
        )?;

        let tr = &self.terrain;
        if tr.chunk_size <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "terrain.chunk_size must be positive, got {}",
                tr.chunk_size
            )));
        }
        if tr.min_height >= tr.max_height {
            return Err(ConfigError::Validation(format!(
                "terrain height range is empty: [{}, {}]",
                tr.min_height, tr.max_height
            )));
        }
        if !CHUNK_RESOLUTIONS.contains(&tr.base_resolution) {
            return Err(ConfigError::Validation(format!(
                "terrain.base_resolution {} is not one of {CHUNK_RESOLUTIONS:?}",
                tr.base_resolution
            )));
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("veld.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::Parse)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `veld.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::Write)?;

        let config_path = config_dir.join("veld.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::Write)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("veld.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::Parse)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
