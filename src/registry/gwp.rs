//! IPCC AR6 GWP-100 refrigerant table and default equipment leak rates
//! (`ipcc-ar6-gwp100.json` in spec.md §6).

use crate::factors::RefrigerantFactors;

use super::map_of;

pub fn refrigerant_factors() -> RefrigerantFactors {
    // (formal name, common name, GWP-100)
    let gases: Vec<(&str, &str, f64)> = vec![
        ("R-410A", "puron", 2256.0),
        ("R-404A", "suva 404a", 3943.0),
        ("R-134A", "norflurane", 1430.0),
        ("R-22", "freon-22", 1810.0),
        ("R-407C", "suva 9000", 1624.0),
        ("R-32", "difluoromethane", 675.0),
        ("R-454B", "opteon xl41", 465.0),
        ("R-1234YF", "opteon yf", 1.0),
        ("R-717", "ammonia", 0.0),
        ("R-744", "co2", 1.0),
    ];

    let gwp_by_formal_name = map_of(
        gases
            .iter()
            .map(|(formal, _, gwp)| (formal.to_uppercase(), *gwp))
            .collect(),
    );
    let gwp_by_common_name = map_of(
        gases
            .iter()
            .map(|(_, common, gwp)| (common.to_lowercase(), *gwp))
            .collect(),
    );

    let default_leak_rates_by_equipment = map_of(vec![
        ("split_ac".to_string(), 0.06),
        ("rooftop_unit".to_string(), 0.08),
        ("chiller".to_string(), 0.02),
        ("walk_in_cooler".to_string(), 0.15),
        ("walk_in_freezer".to_string(), 0.20),
        ("supermarket_rack".to_string(), 0.25),
        ("vrf_system".to_string(), 0.06),
        ("heat_pump".to_string(), 0.04),
    ]);

    RefrigerantFactors {
        gwp_by_formal_name,
        gwp_by_common_name,
        default_leak_rates_by_equipment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formal_and_common_name_agree() {
        let r = refrigerant_factors();
        assert_eq!(
            r.gwp_by_formal_name["R-410A"],
            r.gwp_by_common_name["puron"]
        );
    }

    #[test]
    fn default_leak_rate_exists_for_common_equipment() {
        let r = refrigerant_factors();
        assert!(r.default_leak_rates_by_equipment.contains_key("chiller"));
    }
}
