//! Dynamic market-cap floor from the universe's size distribution.
//!
//! Selecting the top 70% of the universe by size means flooring at the 30th
//! percentile from the bottom, never below the static floor. An empty
//! universe falls back to the static floor.

/// Compute the dynamic floor from the active universe's market caps.
pub fn dynamic_mcap_floor(mut caps: Vec<f64>, static_floor: f64) -> f64 {
    if caps.is_empty() {
        return static_floor;
    }
    caps.sort_by(f64::total_cmp);
    let idx = ((caps.len() as f64 * 0.3) as usize).min(caps.len() - 1);
    static_floor.max(caps[idx])
}
