//! One-shot device capability probe.
//!
//! Hardware enumeration (user-agent sniffing, GPU-string heuristics) is
//! unreliable, so the probe is only a weak prior: it seeds the pre-benchmark
//! tier and distance scale, and the capability benchmark is the authoritative
//! corrective signal. Nothing reads the probe after startup.

use serde::Serialize;

use crate::tier::QualityTier;

/// Coarse device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

/// Weak GPU-tier hint from the platform, when one is available at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GpuTierHint {
    #[default]
    Unknown,
    Integrated,
    Discrete,
}

/// Snapshot of device capabilities taken once at startup.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceProbe {
    pub class: DeviceClass,
    /// Native display pixel ratio; seeds the renderer.
    pub pixel_ratio: f64,
    /// Platform memory hint in megabytes, when exposed.
    pub memory_hint_mb: Option<u32>,
    pub gpu_tier: GpuTierHint,
}

impl DeviceProbe {
    /// A typical desktop probe.
    pub fn desktop() -> Self {
        Self {
            class: DeviceClass::Desktop,
            pixel_ratio: 1.0,
            memory_hint_mb: None,
            gpu_tier: GpuTierHint::Unknown,
        }
    }

    /// A typical mobile probe.
    pub fn mobile() -> Self {
        Self {
            class: DeviceClass::Mobile,
            pixel_ratio: 2.0,
            memory_hint_mb: Some(4096),
            gpu_tier: GpuTierHint::Integrated,
        }
    }

    /// Pre-benchmark tier: mobile devices start at `Medium`, desktops at `High`.
    pub fn initial_tier(&self) -> QualityTier {
        match self.class {
            DeviceClass::Mobile => QualityTier::Medium,
            DeviceClass::Desktop => QualityTier::High,
        }
    }

    /// Pre-benchmark distance-scaling factor.
    ///
    /// Both defaults sit below the benchmark's 0.8 growth cap so a fast
    /// device can still be rewarded with longer LOD distances.
    pub fn initial_distance_scale(&self) -> f64 {
        match self.class {
            DeviceClass::Mobile => 0.5,
            DeviceClass::Desktop => 0.65,
        }
    }
}
