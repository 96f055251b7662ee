//! Listing snapshots -- the flat, already-resolved inbound view of a listing.
//!
//! The engine never reads persistence itself; the caller loads the listing
//! and its related component records, then hands over one of these. Missing
//! components are `None` and resolve to absent attributes, never an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::value::AttributeMap;

/// Point-in-time snapshot of one listing's evaluable data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSnapshot {
    pub id: i64,
    pub base_price: Decimal,
    /// Condition label, e.g. `"used"`, `"refurbished"`, `"new"`.
    pub condition: Option<String>,
    pub manufacturer: Option<String>,
    /// Chassis form factor, e.g. `"tower"`, `"sff"`, `"laptop"`.
    pub form_factor: Option<String>,
    pub release_year: Option<i64>,
    /// Reference year for deriving `age_years`. Supplied by the caller, never
    /// read from the wall clock, so the same snapshot always resolves to the
    /// same attribute map.
    pub reference_year: Option<i64>,
    /// Pins this listing to a specific ruleset. A pin naming a ruleset that is
    /// no longer in the config is an error at evaluation time, never a silent
    /// fallback to the default.
    #[serde(default)]
    pub ruleset_override: Option<i64>,
    #[serde(default)]
    pub cpu: Option<CpuSpec>,
    #[serde(default)]
    pub gpu: Option<GpuSpec>,
    #[serde(default)]
    pub ram: Option<RamSpec>,
    #[serde(default)]
    pub storage: Option<StorageSpec>,
    /// Caller-supplied additional attributes. Merged into the resolved map
    /// without overriding resolver-owned keys.
    #[serde(default)]
    pub extra: AttributeMap,
}

impl ListingSnapshot {
    /// Minimal snapshot with just an id and base price.
    pub fn new(id: i64, base_price: Decimal) -> Self {
        ListingSnapshot {
            id,
            base_price,
            condition: None,
            manufacturer: None,
            form_factor: None,
            release_year: None,
            reference_year: None,
            ruleset_override: None,
            cpu: None,
            gpu: None,
            ram: None,
            storage: None,
            extra: AttributeMap::new(),
        }
    }
}

/// CPU component record, reduced to its evaluable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuSpec {
    pub model: String,
    pub cores: Option<i64>,
    pub threads: Option<i64>,
    pub base_clock_ghz: Option<Decimal>,
}

/// GPU component record, reduced to its evaluable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuSpec {
    pub model: String,
    pub vram_gb: Option<i64>,
}

/// RAM configuration, reduced to its evaluable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RamSpec {
    pub capacity_gb: i64,
    /// Generation label, e.g. `"ddr4"`.
    pub ddr_generation: Option<String>,
}

/// Primary storage device, reduced to its evaluable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSpec {
    pub capacity_gb: i64,
    /// Media label, e.g. `"ssd"`, `"hdd"`, `"nvme"`.
    pub media: Option<String>,
}
