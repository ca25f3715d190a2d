use super::benchmark::cost_per_area;
use super::reference::ReferenceTables;
use super::semaphore::SemaphoreColor;
use super::tier::Tier;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const OPTIMAL_CEILING: f64 = 1.0;
pub const OVERCOST_CEILING: f64 = 1.25;
pub const FAVORABLE_CEILING: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyLabel {
    Favorable,
    Standard,
    Review,
}

impl EfficiencyLabel {
    pub fn from_index(index: f64) -> Self {
        if index < FAVORABLE_CEILING {
            Self::Favorable
        } else if index <= OVERCOST_CEILING {
            Self::Standard
        } else {
            Self::Review
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Favorable => "Favorable",
            Self::Standard => "Estándar",
            Self::Review => "Revisar",
        }
    }
}

/// Asset efficiency relative to tier norms.
///
/// `global_index` is the arithmetic mean of `pax_ratio` and `mt2_ratio`;
/// 1.0 means the venue pays exactly its tier median on both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyResult {
    pub tier: Tier,
    pub cost_per_pax: Option<f64>,
    pub cost_per_area: Option<f64>,
    pub pax_ratio: Option<f64>,
    pub mt2_ratio: Option<f64>,
    pub global_index: Option<f64>,
    /// `(global_index - 1) * 100`.
    pub median_deviation: Option<f64>,
    pub label: Option<EfficiencyLabel>,
    pub color: SemaphoreColor,
}

impl EfficiencyResult {
    pub fn not_computable(tier: Tier) -> Self {
        Self {
            tier,
            cost_per_pax: None,
            cost_per_area: None,
            pax_ratio: None,
            mt2_ratio: None,
            global_index: None,
            median_deviation: None,
            label: None,
            color: SemaphoreColor::Gray,
        }
    }
}

pub fn global_index(pax_ratio: f64, mt2_ratio: f64) -> f64 {
    (pax_ratio + mt2_ratio) / 2.0
}

pub fn index_color(index: f64) -> SemaphoreColor {
    if index <= OPTIMAL_CEILING {
        SemaphoreColor::Green
    } else if index <= OVERCOST_CEILING {
        SemaphoreColor::Yellow
    } else {
        SemaphoreColor::Red
    }
}

#[derive(Debug, Clone)]
pub struct EfficiencyEngine {
    tables: Arc<ReferenceTables>,
}

impl EfficiencyEngine {
    pub fn new(tables: Arc<ReferenceTables>) -> Self {
        Self { tables }
    }

    pub fn evaluate(
        &self,
        fixed_costs: f64,
        guest_capacity: f64,
        area_m2: f64,
        tier: Tier,
    ) -> EfficiencyResult {
        let Some(medians) = self
            .tables
            .medians(tier)
            .filter(|medians| medians.cost_per_pax > 0.0 && medians.cost_per_area > 0.0)
        else {
            return EfficiencyResult::not_computable(tier);
        };

        let cost_per_pax = cost_per_pax(fixed_costs, guest_capacity);
        let cost_per_area = cost_per_area(fixed_costs, area_m2);
        let (Some(per_pax), Some(per_area)) = (cost_per_pax, cost_per_area) else {
            return EfficiencyResult {
                cost_per_pax,
                cost_per_area,
                ..EfficiencyResult::not_computable(tier)
            };
        };

        let pax_ratio = per_pax / medians.cost_per_pax;
        let mt2_ratio = per_area / medians.cost_per_area;
        let index = global_index(pax_ratio, mt2_ratio);
        if !index.is_finite() {
            return EfficiencyResult::not_computable(tier);
        }

        EfficiencyResult {
            tier,
            cost_per_pax,
            cost_per_area,
            pax_ratio: Some(pax_ratio),
            mt2_ratio: Some(mt2_ratio),
            global_index: Some(index),
            median_deviation: Some((index - 1.0) * 100.0),
            label: Some(EfficiencyLabel::from_index(index)),
            color: index_color(index),
        }
    }
}

fn cost_per_pax(fixed_costs: f64, guest_capacity: f64) -> Option<f64> {
    if guest_capacity > 0.0 && fixed_costs >= 0.0 {
        Some(fixed_costs / guest_capacity).filter(|value| value.is_finite())
    } else {
        None
    }
}
