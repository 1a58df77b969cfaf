//! Static cigarette brand reference data.
//!
//! Educational machine-yield style profiles from public reports. The
//! table is immutable and built once; lookups never fail, an unknown id
//! falls back to the reference brand.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Brand flavor category
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BrandCategory {
    FullFlavor,
    Light,
    Menthol,
    Reference,
}

/// One cigarette brand's per-cigarette chemistry profile
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CigaretteBrand {
    pub id: &'static str,
    pub name: &'static str,
    pub nicotine_mg: f64,
    pub tar_mg: f64,
    pub category: BrandCategory,
    pub source_note: &'static str,
}

/// Fallback brand id used whenever a lookup misses
pub const DEFAULT_BRAND_ID: &str = "average-us-king";

const YIELD_NOTE: &str = "Public machine-yield range";

const fn brand(
    id: &'static str,
    name: &'static str,
    nicotine_mg: f64,
    tar_mg: f64,
    category: BrandCategory,
) -> CigaretteBrand {
    CigaretteBrand {
        id,
        name,
        nicotine_mg,
        tar_mg,
        category,
        source_note: YIELD_NOTE,
    }
}

/// The full brand table. The reference entry is first so the fallback
/// lookup is a plain index.
pub static CIGARETTE_BRANDS: Lazy<Vec<CigaretteBrand>> = Lazy::new(|| {
    use BrandCategory::*;

    let mut brands = vec![CigaretteBrand {
        id: DEFAULT_BRAND_ID,
        name: "Average US king-size (reference)",
        nicotine_mg: 1.0,
        tar_mg: 12.0,
        category: Reference,
        source_note: "Reference profile",
    }];

    brands.extend([
        brand("marlboro-red", "Marlboro Red", 1.0, 12.0, FullFlavor),
        brand("marlboro-gold", "Marlboro Gold", 0.7, 8.0, Light),
        brand("marlboro-menthol", "Marlboro Menthol", 0.9, 11.0, Menthol),
        brand("camel-filters", "Camel Filters", 0.8, 11.0, FullFlavor),
        brand("camel-blue", "Camel Blue", 0.7, 8.0, Light),
        brand("camel-crush", "Camel Crush", 0.9, 11.0, Menthol),
        brand("newport-menthol", "Newport Menthol", 1.1, 13.0, Menthol),
        brand("newport-gold", "Newport Gold", 0.8, 9.0, Menthol),
        brand("parliament-full-flavor", "Parliament Full Flavor", 0.9, 10.0, FullFlavor),
        brand("parliament-lights", "Parliament Lights", 0.7, 8.0, Light),
        brand("pall-mall-red", "Pall Mall Red", 1.2, 16.0, FullFlavor),
        brand("pall-mall-blue", "Pall Mall Blue", 0.8, 10.0, Light),
        brand("american-spirit-original", "American Spirit Original", 1.2, 13.0, FullFlavor),
        brand("american-spirit-light-blue", "American Spirit Light Blue", 0.8, 9.0, Light),
        brand("winston-red", "Winston Red", 0.9, 12.0, FullFlavor),
        brand("winston-gold", "Winston Gold", 0.7, 8.0, Light),
        brand("lucky-strike-original-red", "Lucky Strike Original Red", 1.1, 13.0, FullFlavor),
        brand("kool-filter-kings", "Kool Filter Kings", 0.9, 12.0, Menthol),
        brand("salem-menthol", "Salem Menthol", 0.8, 10.0, Menthol),
        brand("virginia-slims-menthol", "Virginia Slims Menthol", 0.7, 9.0, Menthol),
        brand("misty-blue", "Misty Blue", 0.6, 7.0, Light),
        brand("l-m-red", "L&M Red", 0.9, 11.0, FullFlavor),
        brand("l-m-blue", "L&M Blue", 0.7, 8.0, Light),
        brand("chesterfield-red", "Chesterfield Red", 1.0, 12.0, FullFlavor),
        brand("basic-full-flavor", "Basic Full Flavor", 0.9, 12.0, FullFlavor),
        brand("basic-light", "Basic Light", 0.7, 8.0, Light),
        brand("doral-full-flavor", "Doral Full Flavor", 0.9, 11.0, FullFlavor),
        brand("doral-light", "Doral Light", 0.7, 8.0, Light),
        brand("kent-fhd", "Kent FHD", 0.8, 10.0, FullFlavor),
        brand("kent-lights", "Kent Lights", 0.6, 7.0, Light),
        brand("305s-red", "305s Red", 1.0, 12.0, FullFlavor),
        brand("305s-gold", "305s Gold", 0.7, 8.0, Light),
        brand("montego-red", "Montego Red", 0.9, 11.0, FullFlavor),
        brand("montego-blue", "Montego Blue", 0.7, 8.0, Light),
    ]);

    brands
});

/// Look up a brand by id, falling back to the reference brand for
/// unknown ids. Never fails.
pub fn brand_by_id(id: &str) -> &'static CigaretteBrand {
    CIGARETTE_BRANDS
        .iter()
        .find(|brand| brand.id == id)
        .unwrap_or(&CIGARETTE_BRANDS[0])
}

/// Whether an id resolves without the fallback
pub fn is_known_brand(id: &str) -> bool {
    CIGARETTE_BRANDS.iter().any(|brand| brand.id == id)
}

/// All brands, reference entry first
pub fn all_brands() -> &'static [CigaretteBrand] {
    &CIGARETTE_BRANDS
}
