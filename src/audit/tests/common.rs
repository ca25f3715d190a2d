use std::sync::Arc;

use crate::audit::domain::{VenueMetrics, VenueState};
use crate::audit::reference::{MarketBenchmark, ReferenceTables, TierMedians, TierReference};
use crate::audit::tier::Tier;

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn active_venue(id: u32, name: &str, municipality: &str) -> VenueMetrics {
    VenueMetrics {
        id,
        name: name.to_string(),
        municipality: Some(municipality.to_string()),
        state: VenueState::Activo,
        year: Some(2025),
        fixed_costs: Some(4_000_000.0),
        variable_costs: Some(4_000_000.0),
        revenue: Some(20_000_000.0),
        area_m2: Some(400.0),
        guest_capacity: Some(500.0),
        event_count: Some(1.0),
        total_guests: Some(80.0),
        avg_ticket_per_event: None,
        avg_ticket_per_guest: None,
        contract_amount_foreign: Some(2_500.0),
        rent_paid: None,
    }
}

/// Small portfolio spanning every tier, one inactive venue, and one with gaps.
pub(super) fn sample_portfolio() -> Vec<VenueMetrics> {
    let mut palermo = active_venue(1, "Janos Palermo", "Palermo");
    palermo.revenue = Some(40_000_000.0);
    palermo.fixed_costs = Some(6_000_000.0);
    palermo.area_m2 = Some(300.0);

    let canning = active_venue(2, "Quinta Canning", "Canning");

    let mut merlo = active_venue(3, "Salón Merlo", "Merlo");
    merlo.revenue = Some(10_000_000.0);
    merlo.fixed_costs = Some(5_000_000.0);
    merlo.variable_costs = Some(7_000_000.0);

    let mut obra = active_venue(4, "Sans Souci", "San Isidro");
    obra.state = VenueState::Obra;

    let sparse = VenueMetrics {
        id: 5,
        name: "Salón Sin Datos".to_string(),
        municipality: None,
        year: Some(2024),
        ..VenueMetrics::default()
    };

    vec![palermo, canning, merlo, obra, sparse]
}

pub(super) fn tables_with_market(tier: Tier, market_cost_per_area: f64) -> Arc<ReferenceTables> {
    Arc::new(ReferenceTables::new(vec![TierReference {
        tier,
        benchmark: Some(MarketBenchmark {
            average_real_cost_per_area: market_cost_per_area,
            average_market_cost_per_area: market_cost_per_area,
            deviation_percent: 0.0,
            status: "Analizar".to_string(),
        }),
        medians: None,
    }]))
}

pub(super) fn tables_with_medians(tier: Tier, cost_per_pax: f64, cost_per_area: f64) -> Arc<ReferenceTables> {
    Arc::new(ReferenceTables::new(vec![TierReference {
        tier,
        benchmark: None,
        medians: Some(TierMedians {
            cost_per_pax,
            cost_per_area,
        }),
    }]))
}
