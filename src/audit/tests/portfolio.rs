use super::common::*;
use crate::audit::global::GlobalVerdict;
use crate::audit::performance::PerformanceClass;
use crate::audit::portfolio::{
    filter_year, portfolio_context, simulate, AuditSettings, PortfolioAuditor, SimulationError,
};
use crate::audit::semaphore::SemaphoreColor;
use crate::audit::simulation::RentReduction;
use crate::audit::tier::Tier;

fn auditor() -> PortfolioAuditor {
    PortfolioAuditor::new(AuditSettings::default())
}

#[test]
fn parallel_audit_matches_sequential_and_keeps_order() {
    let venues = sample_portfolio();
    let auditor = auditor();
    let report = auditor.audit(&venues);

    let ids: Vec<u32> = report.venues.iter().map(|audit| audit.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    for (venue, audit) in venues.iter().zip(&report.venues) {
        assert_eq!(&auditor.audit_venue(venue, report.context.as_ref()), audit);
    }
}

#[test]
fn tiers_are_assigned_from_location() {
    let report = auditor().audit(&sample_portfolio());
    let tiers: Vec<Tier> = report.venues.iter().map(|audit| audit.tier).collect();
    assert_eq!(
        tiers,
        vec![Tier::TWO, Tier::THREE, Tier::FIVE, Tier::ONE, Tier::FOUR]
    );
}

#[test]
fn context_excludes_inactive_venues() {
    let context = portfolio_context(&sample_portfolio()).expect("context");
    assert_eq!(context.max_margin, 30_000_000.0);
    assert_eq!(context.total_margin, 40_000_000.0);
}

#[test]
fn inactive_venue_keeps_other_semaphores() {
    let report = auditor().audit(&sample_portfolio());
    let obra = &report.venues[3];

    assert_eq!(obra.performance.color, SemaphoreColor::Gray);
    assert_eq!(obra.performance.classification, PerformanceClass::NotComputable);
    assert_eq!(obra.benchmark.color, SemaphoreColor::Gray);
    assert_eq!(obra.efficiency.color, SemaphoreColor::Green);
    // 4M paid against 2,500 USD at 1,470
    assert_eq!(obra.contract.contract_amount_local, Some(3_675_000.0));
    assert_eq!(obra.contract.color, SemaphoreColor::Yellow);
    assert_ne!(obra.global.verdict, GlobalVerdict::Unweighted);
}

#[test]
fn negative_margin_venue_is_critical() {
    let report = auditor().audit(&sample_portfolio());
    let merlo = &report.venues[2];

    assert_eq!(merlo.performance.margin_contribution, Some(-2_000_000.0));
    assert_eq!(merlo.performance.score, Some(0.0));
    assert_eq!(merlo.performance.color, SemaphoreColor::Critical);
}

#[test]
fn venue_without_data_is_unweighted() {
    let report = auditor().audit(&sample_portfolio());
    let sparse = &report.venues[4];

    assert_eq!(sparse.performance.color, SemaphoreColor::Gray);
    assert_eq!(sparse.benchmark.color, SemaphoreColor::Gray);
    assert_eq!(sparse.efficiency.color, SemaphoreColor::Gray);
    assert_eq!(sparse.contract.color, SemaphoreColor::Gray);
    assert_eq!(sparse.global.verdict, GlobalVerdict::Unweighted);
}

#[test]
fn summary_averages_skip_gray_metrics() {
    let report = auditor().audit(&sample_portfolio());
    let summary = &report.summary;

    assert_eq!(summary.venue_count, 5);
    assert_eq!(summary.active_count, 4);
    // (0.15 + 0.20 + 0.50) / 3
    assert_close(
        summary.average_rent_incidence.expect("incidence average"),
        0.85 / 3.0,
    );
    assert_eq!(summary.total_revenue, 70_000_000.0);
    assert_eq!(summary.total_margin, 40_000_000.0);
    assert_eq!(summary.color_counts.performance.gray, 2);
    assert_eq!(summary.color_counts.global.gray, 1);

    let alerts: Vec<u32> = summary.incidence_alerts.iter().map(|entry| entry.id).collect();
    assert_eq!(alerts, vec![3]);
    let top: Vec<u32> = summary.top_margin.iter().map(|entry| entry.id).collect();
    assert_eq!(top, vec![1, 2, 3]);
}

#[test]
fn total_margin_matches_scoring_context() {
    let mut venues = sample_portfolio();
    let mut closed_month = active_venue(6, "Salón Vacío", "Merlo");
    closed_month.revenue = Some(0.0);
    closed_month.variable_costs = Some(0.0);
    venues.push(closed_month);

    let report = auditor().audit(&venues);
    let context = report.context.expect("context");

    assert_eq!(report.summary.total_margin, context.total_margin);
    assert_eq!(report.summary.total_margin, 40_000_000.0);

    let idle = &report.venues[5].performance;
    assert_eq!(idle.margin_contribution, Some(-4_000_000.0));
    assert_eq!(idle.score, Some(0.0));
    assert_eq!(idle.color, SemaphoreColor::Critical);
}

#[test]
fn simulation_requires_complete_financials() {
    let venues = sample_portfolio();

    let result = simulate(&venues[1], RentReduction::new(25.0).expect("valid")).expect("simulated");
    assert_eq!(result.new_fixed_costs, 3_000_000.0);
    assert_eq!(result.margin_improvement, 1_000_000.0);

    assert_eq!(
        simulate(&venues[4], RentReduction::NONE),
        Err(SimulationError::MissingFinancials {
            venue_id: 5,
            field: "fixed costs"
        })
    );
}

#[test]
fn year_filter_keeps_matching_rows() {
    let venues = sample_portfolio();
    let filtered = filter_year(&venues, 2024);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, 5);
    assert!(filter_year(&venues, 1999).is_empty());
}
