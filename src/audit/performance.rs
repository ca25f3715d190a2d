use super::interpolate::interpolate;
use super::semaphore::SemaphoreColor;
use serde::{Deserialize, Serialize};

const INCIDENCE_BAND: (f64, f64) = (0.05, 0.30);
const TICKET_PER_EVENT_BAND: (f64, f64) = (10_000_000.0, 40_000_000.0);
const TICKET_PER_GUEST_BAND: (f64, f64) = (150_000.0, 500_000.0);
const FALLBACK_WEIGHT_SUM: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightsError {
    #[error("weight '{field}' must be a finite, non-negative number (got {value})")]
    Invalid { field: &'static str, value: f64 },
}

/// Relative importance of each composite sub-score.
///
/// Weights need not sum to 100; they are normalized by their actual sum,
/// and an all-zero configuration divides by 100 instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoreWeights")]
pub struct ScoreWeights {
    margin: f64,
    incidence: f64,
    ticket_per_event: f64,
    ticket_per_guest: f64,
}

#[derive(Deserialize)]
struct RawScoreWeights {
    margin: f64,
    incidence: f64,
    ticket_per_event: f64,
    ticket_per_guest: f64,
}

impl TryFrom<RawScoreWeights> for ScoreWeights {
    type Error = WeightsError;

    fn try_from(raw: RawScoreWeights) -> Result<Self, Self::Error> {
        ScoreWeights::new(
            raw.margin,
            raw.incidence,
            raw.ticket_per_event,
            raw.ticket_per_guest,
        )
    }
}

impl ScoreWeights {
    pub fn new(
        margin: f64,
        incidence: f64,
        ticket_per_event: f64,
        ticket_per_guest: f64,
    ) -> Result<Self, WeightsError> {
        Ok(Self {
            margin: validate_weight("margin", margin)?,
            incidence: validate_weight("incidence", incidence)?,
            ticket_per_event: validate_weight("ticket_per_event", ticket_per_event)?,
            ticket_per_guest: validate_weight("ticket_per_guest", ticket_per_guest)?,
        })
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn incidence(&self) -> f64 {
        self.incidence
    }

    pub fn ticket_per_event(&self) -> f64 {
        self.ticket_per_event
    }

    pub fn ticket_per_guest(&self) -> f64 {
        self.ticket_per_guest
    }

    pub fn sum(&self) -> f64 {
        self.margin + self.incidence + self.ticket_per_event + self.ticket_per_guest
    }

    /// Weights divided by their sum, in `[margin, incidence, event, guest]` order.
    pub fn normalized(&self) -> [f64; 4] {
        let sum = self.sum();
        let divisor = if sum == 0.0 { FALLBACK_WEIGHT_SUM } else { sum };
        [
            self.margin / divisor,
            self.incidence / divisor,
            self.ticket_per_event / divisor,
            self.ticket_per_guest / divisor,
        ]
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            margin: 40.0,
            incidence: 30.0,
            ticket_per_event: 15.0,
            ticket_per_guest: 15.0,
        }
    }
}

pub(crate) fn validate_weight(field: &'static str, value: f64) -> Result<f64, WeightsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(WeightsError::Invalid { field, value })
    }
}

/// Per-venue financial inputs for the performance semaphore.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerformanceInputs {
    pub fixed_costs: f64,
    pub revenue: f64,
    pub variable_costs: f64,
    pub ticket_per_event: Option<f64>,
    pub ticket_per_guest: Option<f64>,
}

/// Portfolio-wide margin figures computed by the caller across venues.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioContext {
    pub max_margin: f64,
    pub total_margin: f64,
}

impl PortfolioContext {
    /// Aggregate over the margins of computable venues only.
    pub fn from_margins<I>(margins: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        margins
            .into_iter()
            .filter(|margin| margin.is_finite())
            .fold(None, |acc: Option<Self>, margin| {
                Some(match acc {
                    None => Self {
                        max_margin: margin,
                        total_margin: margin,
                    },
                    Some(ctx) => Self {
                        max_margin: ctx.max_margin.max(margin),
                        total_margin: ctx.total_margin + margin,
                    },
                })
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceClass {
    High,
    Medium,
    Low,
    CriticalRisk,
    NotComputable,
}

impl PerformanceClass {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "Alta",
            Self::Medium => "Media",
            Self::Low => "Baja",
            Self::CriticalRisk => "Riesgo Crítico",
            Self::NotComputable => "Sin Datos",
        }
    }

    pub const fn color(self) -> SemaphoreColor {
        match self {
            Self::High => SemaphoreColor::Green,
            Self::Medium => SemaphoreColor::Yellow,
            Self::Low => SemaphoreColor::Red,
            Self::CriticalRisk => SemaphoreColor::Critical,
            Self::NotComputable => SemaphoreColor::Gray,
        }
    }

    pub fn from_score(score: f64) -> Self {
        if score >= 60.0 {
            Self::High
        } else if score >= 40.0 {
            Self::Medium
        } else if score >= 5.0 {
            Self::Low
        } else {
            Self::CriticalRisk
        }
    }
}

/// Points (0-100) each sub-metric earned before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SubScores {
    pub margin: f64,
    pub incidence: f64,
    pub ticket_per_event: f64,
    pub ticket_per_guest: f64,
}

/// Profitability semaphore for one venue.
///
/// `rent_incidence` and `margin_share` are fractions (0.20 means 20%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResult {
    pub margin_contribution: Option<f64>,
    pub margin_share: Option<f64>,
    pub rent_incidence: Option<f64>,
    pub multiplier: Option<f64>,
    pub score: Option<f64>,
    pub sub_scores: Option<SubScores>,
    pub classification: PerformanceClass,
    pub color: SemaphoreColor,
}

impl PerformanceResult {
    pub fn not_computable() -> Self {
        Self {
            margin_contribution: None,
            margin_share: None,
            rent_incidence: None,
            multiplier: None,
            score: None,
            sub_scores: None,
            classification: PerformanceClass::NotComputable,
            color: SemaphoreColor::Gray,
        }
    }
}

pub fn margin_contribution(fixed_costs: f64, revenue: f64, variable_costs: f64) -> f64 {
    revenue - fixed_costs - variable_costs
}

/// Fixed costs as a fraction of revenue; undefined for non-positive revenue.
pub fn rent_incidence(fixed_costs: f64, revenue: f64) -> Option<f64> {
    if revenue > 0.0 {
        Some(fixed_costs / revenue).filter(|value| value.is_finite())
    } else {
        None
    }
}

/// Return on rent: `(revenue - variable) / fixed`.
pub fn multiplier(fixed_costs: f64, revenue: f64, variable_costs: f64) -> Option<f64> {
    if fixed_costs > 0.0 {
        Some((revenue - variable_costs) / fixed_costs).filter(|value| value.is_finite())
    } else {
        None
    }
}

/// Stateless scorer applying a weight configuration to venue financials.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceScorer {
    weights: ScoreWeights,
}

impl PerformanceScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn score(
        &self,
        inputs: &PerformanceInputs,
        portfolio: Option<&PortfolioContext>,
    ) -> PerformanceResult {
        let PerformanceInputs {
            fixed_costs,
            revenue,
            variable_costs,
            ticket_per_event,
            ticket_per_guest,
        } = *inputs;

        let margin = margin_contribution(fixed_costs, revenue, variable_costs);
        if !margin.is_finite() {
            return PerformanceResult::not_computable();
        }

        let margin_share = portfolio
            .filter(|ctx| ctx.total_margin > 0.0)
            .map(|ctx| margin / ctx.total_margin);
        let multiplier = multiplier(fixed_costs, revenue, variable_costs);

        let Some(incidence) = rent_incidence(fixed_costs, revenue) else {
            // Without revenue only a losing venue can be scored, and it floors at 0.
            let floor = (margin < 0.0).then_some(PerformanceClass::CriticalRisk);
            return PerformanceResult {
                margin_contribution: Some(margin),
                margin_share,
                multiplier,
                score: floor.map(|_| 0.0),
                classification: floor.unwrap_or(PerformanceClass::NotComputable),
                color: floor.map_or(SemaphoreColor::Gray, PerformanceClass::color),
                ..PerformanceResult::not_computable()
            };
        };

        let max_margin = portfolio.map_or(margin, |ctx| ctx.max_margin);
        let sub_scores = SubScores {
            margin: if max_margin > 0.0 {
                interpolate(margin, 0.0, max_margin, 0.0, 100.0)
            } else {
                0.0
            },
            incidence: interpolate(incidence, INCIDENCE_BAND.0, INCIDENCE_BAND.1, 100.0, 0.0),
            ticket_per_event: ticket_per_event.map_or(0.0, |ticket| {
                interpolate(
                    ticket,
                    TICKET_PER_EVENT_BAND.0,
                    TICKET_PER_EVENT_BAND.1,
                    0.0,
                    100.0,
                )
            }),
            ticket_per_guest: ticket_per_guest.map_or(0.0, |ticket| {
                interpolate(
                    ticket,
                    TICKET_PER_GUEST_BAND.0,
                    TICKET_PER_GUEST_BAND.1,
                    0.0,
                    100.0,
                )
            }),
        };

        let score = if margin < 0.0 {
            0.0
        } else {
            self.composite(&sub_scores)
        };
        let classification = PerformanceClass::from_score(score);

        PerformanceResult {
            margin_contribution: Some(margin),
            margin_share,
            rent_incidence: Some(incidence),
            multiplier,
            score: Some(score),
            sub_scores: Some(sub_scores),
            classification,
            color: classification.color(),
        }
    }

    fn composite(&self, sub_scores: &SubScores) -> f64 {
        let [w_margin, w_incidence, w_event, w_guest] = self.weights.normalized();
        let blended = sub_scores.margin * w_margin
            + sub_scores.incidence * w_incidence
            + sub_scores.ticket_per_event * w_event
            + sub_scores.ticket_per_guest * w_guest;
        blended.clamp(0.0, 100.0)
    }
}
