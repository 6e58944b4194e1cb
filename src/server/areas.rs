//! Area catalogue exposed to the frontend dropdowns

use crate::encoding::columns::{AREAS, DISTRICTS};
use std::collections::BTreeMap;

/// Known areas per district, in model column order
pub fn areas_by_district() -> BTreeMap<&'static str, Vec<&'static str>> {
    // Every modelled area belongs to the single modelled district
    DISTRICTS
        .iter()
        .map(|district| (*district, AREAS.to_vec()))
        .collect()
}
