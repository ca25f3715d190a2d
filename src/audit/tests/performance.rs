use super::common::*;
use crate::audit::performance::{
    multiplier, PerformanceClass, PerformanceInputs, PerformanceScorer, PortfolioContext,
    ScoreWeights, WeightsError,
};
use crate::audit::semaphore::SemaphoreColor;
use proptest::prelude::*;

fn reference_inputs() -> PerformanceInputs {
    PerformanceInputs {
        fixed_costs: 4_000_000.0,
        revenue: 20_000_000.0,
        variable_costs: 4_000_000.0,
        ticket_per_event: Some(25_000_000.0),
        ticket_per_guest: Some(325_000.0),
    }
}

fn context(max_margin: f64, total_margin: f64) -> PortfolioContext {
    PortfolioContext {
        max_margin,
        total_margin,
    }
}

#[test]
fn reference_venue_produces_expected_ratios() {
    let result = PerformanceScorer::default().score(&reference_inputs(), None);

    assert_eq!(result.margin_contribution, Some(12_000_000.0));
    assert_eq!(result.rent_incidence, Some(0.20));
    assert_eq!(result.multiplier, Some(4.0));
}

#[test]
fn composite_blends_sub_scores_with_default_weights() {
    let ctx = context(24_000_000.0, 48_000_000.0);
    let result = PerformanceScorer::default().score(&reference_inputs(), Some(&ctx));

    let sub_scores = result.sub_scores.expect("sub scores present");
    assert_close(sub_scores.margin, 50.0);
    assert_close(sub_scores.incidence, 40.0);
    assert_close(sub_scores.ticket_per_event, 50.0);
    assert_close(sub_scores.ticket_per_guest, 50.0);

    // 50*0.40 + 40*0.30 + 50*0.15 + 50*0.15
    assert_close(result.score.expect("score"), 47.0);
    assert_eq!(result.classification, PerformanceClass::Medium);
    assert_eq!(result.color, SemaphoreColor::Yellow);
    assert_close(result.margin_share.expect("share"), 0.25);
}

#[test]
fn venue_without_portfolio_context_is_its_own_margin_target() {
    let result = PerformanceScorer::default().score(&reference_inputs(), None);
    let sub_scores = result.sub_scores.expect("sub scores present");
    assert_eq!(sub_scores.margin, 100.0);
    assert_eq!(result.margin_share, None);
}

#[test]
fn negative_margin_floors_score_regardless_of_weights() {
    let inputs = PerformanceInputs {
        fixed_costs: 9_000_000.0,
        revenue: 10_000_000.0,
        variable_costs: 2_000_000.0,
        ticket_per_event: Some(40_000_000.0),
        ticket_per_guest: Some(900_000.0),
    };
    let weights = ScoreWeights::new(0.0, 0.0, 50.0, 50.0).expect("valid weights");

    let result = PerformanceScorer::new(weights).score(&inputs, None);

    assert_eq!(result.margin_contribution, Some(-1_000_000.0));
    assert_eq!(result.score, Some(0.0));
    assert_eq!(result.classification, PerformanceClass::CriticalRisk);
    assert_eq!(result.color, SemaphoreColor::Critical);
}

#[test]
fn zero_weights_divide_by_one_hundred() {
    let weights = ScoreWeights::new(0.0, 0.0, 0.0, 0.0).expect("valid weights");
    assert_eq!(weights.normalized(), [0.0; 4]);

    let result = PerformanceScorer::new(weights).score(&reference_inputs(), None);
    assert_eq!(result.score, Some(0.0));
}

#[test]
fn proportional_weights_score_identically() {
    let ctx = context(30_000_000.0, 60_000_000.0);
    let hundred = PerformanceScorer::new(ScoreWeights::new(40.0, 30.0, 15.0, 15.0).expect("valid"));
    let ten = PerformanceScorer::new(ScoreWeights::new(4.0, 3.0, 1.5, 1.5).expect("valid"));

    let a = hundred.score(&reference_inputs(), Some(&ctx)).score.expect("score");
    let b = ten.score(&reference_inputs(), Some(&ctx)).score.expect("score");
    assert_close(a, b);
}

#[test]
fn color_bands_are_closed_below_open_above() {
    assert_eq!(PerformanceClass::from_score(60.0), PerformanceClass::High);
    assert_eq!(PerformanceClass::from_score(59.999), PerformanceClass::Medium);
    assert_eq!(PerformanceClass::from_score(40.0), PerformanceClass::Medium);
    assert_eq!(PerformanceClass::from_score(39.999), PerformanceClass::Low);
    assert_eq!(PerformanceClass::from_score(5.0), PerformanceClass::Low);
    assert_eq!(PerformanceClass::from_score(4.999), PerformanceClass::CriticalRisk);
    assert_eq!(PerformanceClass::High.label(), "Alta");
    assert_eq!(PerformanceClass::CriticalRisk.label(), "Riesgo Crítico");
}

#[test]
fn missing_tickets_contribute_zero_points() {
    let inputs = PerformanceInputs {
        ticket_per_event: None,
        ticket_per_guest: None,
        ..reference_inputs()
    };
    let result = PerformanceScorer::default().score(&inputs, None);
    let sub_scores = result.sub_scores.expect("sub scores");
    assert_eq!(sub_scores.ticket_per_event, 0.0);
    assert_eq!(sub_scores.ticket_per_guest, 0.0);
    // 100*0.40 + 40*0.30
    assert_close(result.score.expect("score"), 52.0);
}

#[test]
fn zero_revenue_with_rent_is_critical() {
    let inputs = PerformanceInputs {
        fixed_costs: 4_000_000.0,
        revenue: 0.0,
        variable_costs: 0.0,
        ticket_per_event: None,
        ticket_per_guest: None,
    };
    let result = PerformanceScorer::default().score(&inputs, None);

    assert_eq!(result.margin_contribution, Some(-4_000_000.0));
    assert_eq!(result.rent_incidence, None);
    assert_eq!(result.sub_scores, None);
    assert_eq!(result.score, Some(0.0));
    assert_eq!(result.classification, PerformanceClass::CriticalRisk);
    assert_eq!(result.color, SemaphoreColor::Critical);
}

#[test]
fn zero_revenue_without_loss_is_not_computable() {
    let inputs = PerformanceInputs {
        fixed_costs: 0.0,
        revenue: 0.0,
        variable_costs: 0.0,
        ticket_per_event: None,
        ticket_per_guest: None,
    };
    let result = PerformanceScorer::default().score(&inputs, None);

    assert_eq!(result.rent_incidence, None);
    assert_eq!(result.score, None);
    assert_eq!(result.color, SemaphoreColor::Gray);
    assert_eq!(result.classification, PerformanceClass::NotComputable);
    assert_eq!(result.margin_contribution, Some(0.0));
}

#[test]
fn multiplier_returns_sentinel_for_degenerate_rent() {
    assert_eq!(multiplier(0.0, 1_000.0, 100.0), None);
    assert_eq!(multiplier(-10.0, 1_000.0, 100.0), None);
    assert_eq!(multiplier(100.0, 1_000.0, 100.0), Some(9.0));
}

#[test]
fn weights_reject_negative_and_non_finite_values() {
    assert_eq!(
        ScoreWeights::new(-1.0, 30.0, 15.0, 15.0),
        Err(WeightsError::Invalid {
            field: "margin",
            value: -1.0
        })
    );
    assert!(ScoreWeights::new(40.0, f64::INFINITY, 15.0, 15.0).is_err());
    assert!(ScoreWeights::new(40.0, 30.0, f64::NAN, 15.0).is_err());
    assert!(serde_json::from_str::<ScoreWeights>(
        r#"{"margin":-5,"incidence":1,"ticket_per_event":1,"ticket_per_guest":1}"#
    )
    .is_err());
}

#[test]
fn portfolio_context_aggregates_margins() {
    let ctx = PortfolioContext::from_margins([12.0, -3.0, 30.0]).expect("context");
    assert_eq!(ctx.max_margin, 30.0);
    assert_eq!(ctx.total_margin, 39.0);
    assert!(PortfolioContext::from_margins(Vec::<f64>::new()).is_none());
}

proptest! {
    #[test]
    fn score_is_always_bounded(
        fixed in 0.0f64..1e9,
        revenue in 1.0f64..1e10,
        variable in 0.0f64..1e9,
        event in proptest::option::of(0.0f64..1e9),
        guest in proptest::option::of(0.0f64..1e7),
        max_margin in -1e9f64..1e10,
        weights in proptest::array::uniform4(0.0f64..100.0),
    ) {
        let inputs = PerformanceInputs {
            fixed_costs: fixed,
            revenue,
            variable_costs: variable,
            ticket_per_event: event,
            ticket_per_guest: guest,
        };
        let weights = ScoreWeights::new(weights[0], weights[1], weights[2], weights[3]).expect("valid");
        let ctx = PortfolioContext { max_margin, total_margin: max_margin };
        let result = PerformanceScorer::new(weights).score(&inputs, Some(&ctx));

        let score = result.score.expect("positive revenue is computable");
        prop_assert!((0.0..=100.0).contains(&score));
        if revenue - fixed - variable < 0.0 {
            prop_assert_eq!(score, 0.0);
        }
    }

    #[test]
    fn losing_venue_scores_zero_even_without_revenue(
        fixed in 1.0f64..1e9,
        revenue in -1e6f64..=0.0,
        variable in 0.0f64..1e9,
        max_margin in -1e9f64..1e10,
    ) {
        let inputs = PerformanceInputs {
            fixed_costs: fixed,
            revenue,
            variable_costs: variable,
            ticket_per_event: None,
            ticket_per_guest: None,
        };
        let ctx = PortfolioContext { max_margin, total_margin: max_margin };
        let result = PerformanceScorer::default().score(&inputs, Some(&ctx));

        prop_assert_eq!(result.score, Some(0.0));
        prop_assert_eq!(result.color, SemaphoreColor::Critical);
        prop_assert_eq!(result.rent_incidence, None);
    }
}
