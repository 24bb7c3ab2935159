//! Scope 3 factor tables: business travel, commuting, product
//! transport, spend-based sector factors, waste, and water
//! (`scope3-spend-factors.json` in spec.md §6, plus the travel/
//! transport/waste/water tables spec.md §3 describes as part of the
//! same bundle).

use std::collections::HashMap;

use crate::factors::{waste_key, Scope3Factors, WaterFactors};

use super::map_of;

pub fn scope3_factors() -> Scope3Factors {
    let business_travel_kg_per_pax_mile = map_of(vec![
        ("air_short_haul".to_string(), 0.154),
        ("air_long_haul".to_string(), 0.113),
        ("rail".to_string(), 0.041),
        ("car".to_string(), 0.170),
        ("bus".to_string(), 0.089),
    ]);

    let commuting_kg_per_mile = map_of(vec![
        ("drive_alone".to_string(), 0.347),
        ("carpool".to_string(), 0.174),
        ("public_transit".to_string(), 0.089),
        ("motorcycle".to_string(), 0.197),
        ("bike".to_string(), 0.0),
        ("walk".to_string(), 0.0),
        ("telecommute".to_string(), 0.0),
    ]);

    let product_transport_kg_per_ton_mile = map_of(vec![
        ("truck_medium_heavy".to_string(), 0.1616),
        ("rail".to_string(), 0.0252),
        ("waterborne_cargo".to_string(), 0.0159),
        ("air_freight".to_string(), 1.0310),
    ]);

    let spend_kg_per_usd = map_of(vec![
        ("food_and_beverage".to_string(), 0.42),
        ("it_equipment".to_string(), 0.25),
        ("office_supplies".to_string(), 0.35),
        ("professional_services".to_string(), 0.15),
        ("construction".to_string(), 0.38),
        ("packaging".to_string(), 0.45),
        ("chemicals".to_string(), 0.55),
        ("metals".to_string(), 0.48),
        ("textiles".to_string(), 0.40),
        ("furniture".to_string(), 0.33),
        ("other".to_string(), 0.30),
    ]);

    Scope3Factors {
        business_travel_kg_per_pax_mile,
        commuting_kg_per_mile,
        product_transport_kg_per_ton_mile,
        spend_kg_per_usd,
    }
}

pub fn waste_factors() -> HashMap<String, f64> {
    map_of(vec![
        (waste_key("mixed_msw", "landfill"), 0.52),
        (waste_key("mixed_msw", "incineration"), 0.35),
        (waste_key("paper", "landfill"), 0.55),
        (waste_key("paper", "recycling"), 0.05),
        (waste_key("cardboard", "recycling"), 0.04),
        (waste_key("food_waste", "landfill"), 0.75),
        (waste_key("food_waste", "composting"), 0.10),
        (waste_key("plastic", "landfill"), 0.45),
        (waste_key("plastic", "recycling"), 0.08),
        (waste_key("metal", "recycling"), 0.02),
        (waste_key("glass", "recycling"), 0.03),
        (waste_key("construction_debris", "landfill"), 0.30),
    ])
}

pub fn water_factors() -> WaterFactors {
    WaterFactors {
        supply_tco2e_per_1000_gal: 0.0013,
        treatment_tco2e_per_1000_gal: 0.0009,
    }
}
