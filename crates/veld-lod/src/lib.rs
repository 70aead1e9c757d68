//! LOD distance tables for the Veld engine.
//!
//! A [`LodDistanceTable`] is a pure function of the base table and the
//! controller's distance-scaling factor. The [`DistanceTableCache`] recomputes
//! it only when the factor actually changes, so downstream consumers can key
//! their own invalidation off a cheap boolean.

mod table;

pub use table::{DistanceBand, DistanceTableCache, LodDistanceTable, WaterDistances};
