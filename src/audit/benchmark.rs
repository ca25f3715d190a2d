use super::reference::ReferenceTables;
use super::semaphore::SemaphoreColor;
use super::tier::Tier;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const YELLOW_CEILING_PERCENT: f64 = 50.0;

/// Market-rate comparison. `deviation` is a percentage (50.0 means 50% above market).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub tier: Tier,
    pub cost_per_area: Option<f64>,
    pub market_cost_per_area: Option<f64>,
    pub deviation: Option<f64>,
    pub market_status: Option<String>,
    pub color: SemaphoreColor,
}

impl BenchmarkResult {
    pub fn not_computable(tier: Tier) -> Self {
        Self {
            tier,
            cost_per_area: None,
            market_cost_per_area: None,
            deviation: None,
            market_status: None,
            color: SemaphoreColor::Gray,
        }
    }
}

pub fn deviation_color(deviation: f64) -> SemaphoreColor {
    if deviation <= 0.0 {
        SemaphoreColor::Green
    } else if deviation <= YELLOW_CEILING_PERCENT {
        SemaphoreColor::Yellow
    } else {
        SemaphoreColor::Red
    }
}

/// Compares a venue's rent per m² against its tier's market reference.
#[derive(Debug, Clone)]
pub struct BenchmarkEngine {
    tables: Arc<ReferenceTables>,
}

impl BenchmarkEngine {
    pub fn new(tables: Arc<ReferenceTables>) -> Self {
        Self { tables }
    }

    pub fn evaluate(&self, fixed_costs: f64, area_m2: f64, tier: Tier) -> BenchmarkResult {
        let benchmark = self.tables.benchmark(tier);
        let market_cost_per_area = benchmark
            .map(|entry| entry.average_market_cost_per_area)
            .filter(|market| market.is_finite() && *market > 0.0);
        let cost_per_area = cost_per_area(fixed_costs, area_m2);

        let deviation = match (cost_per_area, market_cost_per_area) {
            (Some(cost), Some(market)) => {
                Some((cost - market) * 100.0 / market).filter(|value| value.is_finite())
            }
            _ => None,
        };

        BenchmarkResult {
            tier,
            cost_per_area,
            market_cost_per_area,
            deviation,
            market_status: benchmark.map(|entry| entry.status.clone()),
            color: deviation.map_or(SemaphoreColor::Gray, deviation_color),
        }
    }
}

/// Rent per m²; undefined for non-positive area or negative rent.
pub fn cost_per_area(fixed_costs: f64, area_m2: f64) -> Option<f64> {
    if area_m2 > 0.0 && fixed_costs >= 0.0 {
        Some(fixed_costs / area_m2).filter(|value| value.is_finite())
    } else {
        None
    }
}
