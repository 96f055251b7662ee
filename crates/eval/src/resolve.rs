//! Attribute resolution -- the flat, typed view conditions evaluate against.
//!
//! Pure and side-effect-free: the same listing snapshot always yields the
//! same map. Missing components yield absent keys, never errors. `age_years`
//! derives from the snapshot's `reference_year`, never the wall clock, so
//! re-evaluation of an unchanged snapshot is reproducible.

use appraise_core::{AttrValue, AttributeMap, ListingSnapshot};

/// Resolve a listing snapshot to its evaluable attribute map.
///
/// Resolver-owned keys: `base_price`, `condition`, `manufacturer`,
/// `form_factor`, `release_year`, `age_years`, `ram_capacity_gb`,
/// `ram_ddr_generation`, `cpu.model`, `cpu.cores`, `cpu.threads`,
/// `cpu.base_clock_ghz`, `gpu.model`, `gpu.vram_gb`, `storage.capacity_gb`,
/// `storage.media`. Entries from `extra` are merged in last and never
/// override a resolver-owned key.
pub fn resolve_attributes(listing: &ListingSnapshot) -> AttributeMap {
    let mut attrs = AttributeMap::new();
    attrs.insert("base_price", AttrValue::Number(listing.base_price));

    if let Some(condition) = &listing.condition {
        attrs.insert("condition", AttrValue::Text(condition.clone()));
    }
    if let Some(manufacturer) = &listing.manufacturer {
        attrs.insert("manufacturer", AttrValue::Text(manufacturer.clone()));
    }
    if let Some(form_factor) = &listing.form_factor {
        attrs.insert("form_factor", AttrValue::Text(form_factor.clone()));
    }
    if let Some(year) = listing.release_year {
        attrs.insert("release_year", AttrValue::from(year));
        if let Some(age) = listing.reference_year.and_then(|r| r.checked_sub(year)) {
            attrs.insert("age_years", AttrValue::from(age));
        }
    }

    if let Some(cpu) = &listing.cpu {
        attrs.insert("cpu.model", AttrValue::Text(cpu.model.clone()));
        if let Some(cores) = cpu.cores {
            attrs.insert("cpu.cores", AttrValue::from(cores));
        }
        if let Some(threads) = cpu.threads {
            attrs.insert("cpu.threads", AttrValue::from(threads));
        }
        if let Some(clock) = cpu.base_clock_ghz {
            attrs.insert("cpu.base_clock_ghz", AttrValue::Number(clock));
        }
    }
    if let Some(gpu) = &listing.gpu {
        attrs.insert("gpu.model", AttrValue::Text(gpu.model.clone()));
        if let Some(vram) = gpu.vram_gb {
            attrs.insert("gpu.vram_gb", AttrValue::from(vram));
        }
    }
    if let Some(ram) = &listing.ram {
        attrs.insert("ram_capacity_gb", AttrValue::from(ram.capacity_gb));
        if let Some(generation) = &ram.ddr_generation {
            attrs.insert("ram_ddr_generation", AttrValue::Text(generation.clone()));
        }
    }
    if let Some(storage) = &listing.storage {
        attrs.insert("storage.capacity_gb", AttrValue::from(storage.capacity_gb));
        if let Some(media) = &storage.media {
            attrs.insert("storage.media", AttrValue::Text(media.clone()));
        }
    }

    for (key, value) in &listing.extra.0 {
        if !attrs.contains(key) {
            attrs.insert(key.clone(), value.clone());
        }
    }

    attrs
}
