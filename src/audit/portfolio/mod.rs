mod summary;

pub use summary::{ColorCounts, DimensionCounts, PortfolioSummary, VenueHighlight};

use super::benchmark::{BenchmarkEngine, BenchmarkResult};
use super::contract::{audit_contract, ContractAuditResult, ExchangeRate};
use super::domain::{VenueMetrics, VenueState};
use super::efficiency::{EfficiencyEngine, EfficiencyResult};
use super::global::{global_status, GlobalStatus, StrategicWeights};
use super::performance::{
    PerformanceInputs, PerformanceResult, PerformanceScorer, PortfolioContext, ScoreWeights,
};
use super::reference::ReferenceTables;
use super::simulation::{simulate_rent_reduction, RentReduction, SimulationResult};
use super::tier::{assign_tier, Tier};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration injected by the caller for a portfolio pass.
#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub score_weights: ScoreWeights,
    pub strategic_weights: StrategicWeights,
    pub exchange_rate: Option<ExchangeRate>,
    pub tables: Arc<ReferenceTables>,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            score_weights: ScoreWeights::default(),
            strategic_weights: StrategicWeights::default(),
            exchange_rate: Some(ExchangeRate::default()),
            tables: Arc::new(ReferenceTables::builtin()),
        }
    }
}

/// Every semaphore computed for one venue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueAudit {
    pub id: u32,
    pub name: String,
    pub municipality: Option<String>,
    pub state: VenueState,
    pub year: Option<i32>,
    pub tier: Tier,
    pub tier_name: &'static str,
    pub performance: PerformanceResult,
    pub benchmark: BenchmarkResult,
    pub efficiency: EfficiencyResult,
    pub contract: ContractAuditResult,
    pub global: GlobalStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioAudit {
    pub context: Option<PortfolioContext>,
    pub venues: Vec<VenueAudit>,
    pub summary: PortfolioSummary,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("venue {venue_id} is missing {field}; simulation needs fixed costs, revenue and variable costs")]
    MissingFinancials { venue_id: u32, field: &'static str },
}

/// Runs the four scorers over a venue portfolio.
#[derive(Debug, Clone)]
pub struct PortfolioAuditor {
    scorer: PerformanceScorer,
    benchmark: BenchmarkEngine,
    efficiency: EfficiencyEngine,
    strategic_weights: StrategicWeights,
    exchange_rate: Option<ExchangeRate>,
}

impl PortfolioAuditor {
    pub fn new(settings: AuditSettings) -> Self {
        let AuditSettings {
            score_weights,
            strategic_weights,
            exchange_rate,
            tables,
        } = settings;

        Self {
            scorer: PerformanceScorer::new(score_weights),
            benchmark: BenchmarkEngine::new(Arc::clone(&tables)),
            efficiency: EfficiencyEngine::new(tables),
            strategic_weights,
            exchange_rate,
        }
    }

    pub fn audit(&self, venues: &[VenueMetrics]) -> PortfolioAudit {
        info!(venues = venues.len(), "auditing venue portfolio");

        let context = portfolio_context(venues);
        if context.is_none() {
            warn!("no active venue with complete financials; margin scores use per-venue context");
        }

        let audits: Vec<VenueAudit> = venues
            .par_iter()
            .map(|venue| self.audit_venue(venue, context.as_ref()))
            .collect();

        let summary = PortfolioSummary::build(venues, &audits, context.as_ref());
        info!(
            venues = summary.venue_count,
            incidence_alerts = summary.incidence_alerts.len(),
            "portfolio audit complete"
        );

        PortfolioAudit {
            context,
            venues: audits,
            summary,
        }
    }

    pub fn audit_venue(
        &self,
        venue: &VenueMetrics,
        context: Option<&PortfolioContext>,
    ) -> VenueAudit {
        let tier = assign_tier(venue.municipality.as_deref(), &venue.name);

        let performance = match performance_inputs(venue) {
            Some(inputs) if venue.is_active() => self.scorer.score(&inputs, context),
            _ => {
                debug!(venue_id = venue.id, state = venue.state.label(), "performance not computable");
                PerformanceResult::not_computable()
            }
        };

        let benchmark = match (venue.fixed_costs, venue.area_m2) {
            (Some(fixed), Some(area)) => self.benchmark.evaluate(fixed, area, tier),
            _ => BenchmarkResult::not_computable(tier),
        };

        let efficiency = match (venue.fixed_costs, venue.guest_capacity, venue.area_m2) {
            (Some(fixed), Some(pax), Some(area)) => self.efficiency.evaluate(fixed, pax, area, tier),
            _ => EfficiencyResult::not_computable(tier),
        };

        let contract = audit_contract(
            venue.contract_amount_foreign,
            venue.real_rent_paid(),
            self.exchange_rate,
        );

        let global = global_status(
            performance.color,
            benchmark.color,
            efficiency.color,
            contract.color,
            &self.strategic_weights,
        );

        VenueAudit {
            id: venue.id,
            name: venue.name.clone(),
            municipality: venue.municipality.clone(),
            state: venue.state,
            year: venue.year,
            tier,
            tier_name: tier.definition().name,
            performance,
            benchmark,
            efficiency,
            contract,
            global,
        }
    }
}

/// Margin context over active venues with positive revenue and complete costs.
pub fn portfolio_context(venues: &[VenueMetrics]) -> Option<PortfolioContext> {
    PortfolioContext::from_margins(
        venues
            .iter()
            .filter(|venue| venue.is_active() && venue.revenue.is_some_and(|revenue| revenue > 0.0))
            .filter_map(VenueMetrics::margin),
    )
}

pub fn filter_year(venues: &[VenueMetrics], year: i32) -> Vec<VenueMetrics> {
    venues
        .iter()
        .filter(|venue| venue.year == Some(year))
        .cloned()
        .collect()
}

/// What-if rent reduction against one venue's recorded financials.
pub fn simulate(
    venue: &VenueMetrics,
    reduction: RentReduction,
) -> Result<SimulationResult, SimulationError> {
    let inputs = performance_inputs(venue).ok_or_else(|| SimulationError::MissingFinancials {
        venue_id: venue.id,
        field: missing_financial(venue),
    })?;

    Ok(simulate_rent_reduction(
        inputs.fixed_costs,
        inputs.revenue,
        inputs.variable_costs,
        reduction,
    ))
}

fn performance_inputs(venue: &VenueMetrics) -> Option<PerformanceInputs> {
    Some(PerformanceInputs {
        fixed_costs: venue.fixed_costs?,
        revenue: venue.revenue?,
        variable_costs: venue.variable_costs?,
        ticket_per_event: venue.ticket_per_event(),
        ticket_per_guest: venue.ticket_per_guest(),
    })
}

fn missing_financial(venue: &VenueMetrics) -> &'static str {
    if venue.fixed_costs.is_none() {
        "fixed costs"
    } else if venue.revenue.is_none() {
        "revenue"
    } else {
        "variable costs"
    }
}
