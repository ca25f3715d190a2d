use super::semaphore::SemaphoreColor;
use serde::{Deserialize, Serialize};

const GREEN_CEILING_PERCENT: f64 = 5.0;
const YELLOW_CEILING_PERCENT: f64 = 15.0;

/// Foreign-to-local conversion rate supplied by the caller (ARS per USD).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ExchangeRate(f64);

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("exchange rate must be a positive finite number, got {0}")]
pub struct InvalidExchangeRate(pub f64);

impl ExchangeRate {
    pub const DEFAULT_USD_ARS: f64 = 1470.0;

    pub fn new(rate: f64) -> Result<Self, InvalidExchangeRate> {
        if rate.is_finite() && rate > 0.0 {
            Ok(Self(rate))
        } else {
            Err(InvalidExchangeRate(rate))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn to_local(self, foreign_amount: f64) -> f64 {
        foreign_amount * self.0
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self(Self::DEFAULT_USD_ARS)
    }
}

impl TryFrom<f64> for ExchangeRate {
    type Error = InvalidExchangeRate;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        ExchangeRate::new(value)
    }
}

impl From<ExchangeRate> for f64 {
    fn from(value: ExchangeRate) -> Self {
        value.0
    }
}

/// Pacted contract versus rent actually paid, both in local currency.
///
/// `deviation_percent` is a percentage; positive values mean overpayment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractAuditResult {
    pub contract_amount_foreign: Option<f64>,
    pub contract_amount_local: Option<f64>,
    pub real_paid: Option<f64>,
    pub deviation: Option<f64>,
    pub deviation_percent: Option<f64>,
    pub color: SemaphoreColor,
}

pub fn deviation_color(deviation_percent: f64) -> SemaphoreColor {
    if deviation_percent > YELLOW_CEILING_PERCENT {
        SemaphoreColor::Red
    } else if deviation_percent > GREEN_CEILING_PERCENT {
        SemaphoreColor::Yellow
    } else {
        SemaphoreColor::Green
    }
}

pub fn audit_contract(
    contract_amount_foreign: Option<f64>,
    real_paid: Option<f64>,
    rate: Option<ExchangeRate>,
) -> ContractAuditResult {
    let contract_amount_local = match (contract_amount_foreign, rate) {
        (Some(amount), Some(rate)) if amount > 0.0 => {
            Some(rate.to_local(amount)).filter(|value| value.is_finite() && *value > 0.0)
        }
        _ => None,
    };

    let (deviation, deviation_percent) = match (contract_amount_local, real_paid) {
        (Some(contract), Some(paid)) if paid.is_finite() => {
            let deviation = paid - contract;
            (Some(deviation), Some(deviation * 100.0 / contract))
        }
        _ => (None, None),
    };

    ContractAuditResult {
        contract_amount_foreign,
        contract_amount_local,
        real_paid,
        deviation,
        deviation_percent,
        color: deviation_percent.map_or(SemaphoreColor::Gray, deviation_color),
    }
}
