//! Venue audit engine: four independent semaphores plus the rent what-if.
//!
//! Every scorer is a pure function of its inputs. Metrics that cannot be
//! computed come back as `None` with [`SemaphoreColor::Gray`] so callers can
//! leave them out of network averages.

pub mod benchmark;
pub mod contract;
pub mod domain;
pub mod efficiency;
pub mod global;
pub mod interpolate;
pub mod performance;
pub mod portfolio;
pub mod reference;
pub mod semaphore;
pub mod simulation;
pub mod tier;

#[cfg(test)]
mod tests;

pub use benchmark::{BenchmarkEngine, BenchmarkResult};
pub use contract::{audit_contract, ContractAuditResult, ExchangeRate, InvalidExchangeRate};
pub use domain::{VenueMetrics, VenueState};
pub use efficiency::{EfficiencyEngine, EfficiencyLabel, EfficiencyResult};
pub use global::{global_status, GlobalStatus, GlobalVerdict, StrategicWeights};
pub use interpolate::interpolate;
pub use performance::{
    PerformanceClass, PerformanceInputs, PerformanceResult, PerformanceScorer, PortfolioContext,
    ScoreWeights, SubScores, WeightsError,
};
pub use portfolio::{
    filter_year, portfolio_context, simulate, AuditSettings, PortfolioAudit, PortfolioAuditor,
    PortfolioSummary, SimulationError, VenueAudit, VenueHighlight,
};
pub use reference::{MarketBenchmark, ReferenceTables, TierMedians, TierReference};
pub use semaphore::{SemaphoreColor, Severity, UnknownColor};
pub use simulation::{simulate_rent_reduction, ReductionError, RentReduction, SimulationResult};
pub use tier::{assign_tier, InvalidTier, Tier, TierDefinition};
