use serde::{Deserialize, Serialize};

/// Operating state reported for a venue in the portfolio export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VenueState {
    Activo,
    Obra,
    Devueltos,
}

impl VenueState {
    /// Lenient parse used for spreadsheet exports: anything unrecognized is active.
    pub fn parse_lenient(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        if upper == "INACTIVO" || upper == "DEVUELTOS" || upper == "DEVUELTO" {
            Self::Devueltos
        } else if upper.contains("OBRA") {
            Self::Obra
        } else {
            Self::Activo
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Activo => "ACTIVO",
            Self::Obra => "OBRA",
            Self::Devueltos => "DEVUELTOS",
        }
    }
}

impl Default for VenueState {
    fn default() -> Self {
        Self::Activo
    }
}

/// Raw attributes of one venue. Every numeric field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueMetrics {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub state: VenueState,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub fixed_costs: Option<f64>,
    #[serde(default)]
    pub variable_costs: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub area_m2: Option<f64>,
    #[serde(default)]
    pub guest_capacity: Option<f64>,
    #[serde(default)]
    pub event_count: Option<f64>,
    #[serde(default)]
    pub total_guests: Option<f64>,
    #[serde(default)]
    pub avg_ticket_per_event: Option<f64>,
    #[serde(default)]
    pub avg_ticket_per_guest: Option<f64>,
    /// Pacted monthly rent in foreign currency (USD).
    #[serde(default)]
    pub contract_amount_foreign: Option<f64>,
    /// Rent actually paid in local currency; defaults to `fixed_costs`.
    #[serde(default)]
    pub rent_paid: Option<f64>,
}

impl VenueMetrics {
    pub fn is_active(&self) -> bool {
        self.state == VenueState::Activo
    }

    pub fn ticket_per_event(&self) -> Option<f64> {
        self.avg_ticket_per_event
            .or_else(|| ratio(self.revenue?, self.event_count?))
    }

    pub fn ticket_per_guest(&self) -> Option<f64> {
        self.avg_ticket_per_guest
            .or_else(|| ratio(self.revenue?, self.total_guests?))
    }

    pub fn real_rent_paid(&self) -> Option<f64> {
        self.rent_paid.or(self.fixed_costs)
    }

    /// `revenue - fixed - variable`, undefined when any of the three is missing.
    pub fn margin(&self) -> Option<f64> {
        Some(self.revenue? - self.fixed_costs? - self.variable_costs?)
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator).filter(|value| value.is_finite())
    } else {
        None
    }
}
