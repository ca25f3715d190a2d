use super::performance::{margin_contribution, rent_incidence};
use super::semaphore::SemaphoreColor;
use serde::{Deserialize, Serialize};

pub const MAX_REDUCTION_PERCENT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ReductionError {
    #[error("rent reduction must be between 0 and {max}%, got {value}")]
    OutOfRange { value: f64, max: f64 },
}

/// Hypothetical rent cut, as a percentage in `[0, 50]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RentReduction(f64);

impl RentReduction {
    pub const NONE: RentReduction = RentReduction(0.0);

    pub fn new(percent: f64) -> Result<Self, ReductionError> {
        if (0.0..=MAX_REDUCTION_PERCENT).contains(&percent) {
            Ok(Self(percent))
        } else {
            Err(ReductionError::OutOfRange {
                value: percent,
                max: MAX_REDUCTION_PERCENT,
            })
        }
    }

    /// Saturating constructor for slider-style input. NaN becomes zero.
    pub fn clamped(percent: f64) -> Self {
        if percent.is_nan() {
            return Self::NONE;
        }
        Self(percent.clamp(0.0, MAX_REDUCTION_PERCENT))
    }

    pub fn percent(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for RentReduction {
    type Error = ReductionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        RentReduction::new(value)
    }
}

impl From<RentReduction> for f64 {
    fn from(value: RentReduction) -> Self {
        value.0
    }
}

/// Outcome of a what-if rent reduction. `new_incidence` is a fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub reduction_percent: f64,
    pub new_fixed_costs: f64,
    pub new_incidence: Option<f64>,
    pub new_margin: f64,
    pub margin_improvement: f64,
    pub incidence_color: SemaphoreColor,
}

pub fn incidence_color(incidence: f64) -> SemaphoreColor {
    if incidence > 0.25 {
        SemaphoreColor::Red
    } else if incidence > 0.15 {
        SemaphoreColor::Yellow
    } else {
        SemaphoreColor::Green
    }
}

pub fn simulate_rent_reduction(
    fixed_costs: f64,
    revenue: f64,
    variable_costs: f64,
    reduction: RentReduction,
) -> SimulationResult {
    let new_fixed_costs = fixed_costs * (1.0 - reduction.percent() / 100.0);
    let baseline_margin = margin_contribution(fixed_costs, revenue, variable_costs);
    let new_margin = margin_contribution(new_fixed_costs, revenue, variable_costs);
    let new_incidence = rent_incidence(new_fixed_costs, revenue);

    SimulationResult {
        reduction_percent: reduction.percent(),
        new_fixed_costs,
        new_incidence,
        new_margin,
        margin_improvement: new_margin - baseline_margin,
        incidence_color: new_incidence.map_or(SemaphoreColor::Gray, incidence_color),
    }
}
