use super::VenueAudit;
use crate::audit::domain::VenueMetrics;
use crate::audit::performance::PortfolioContext;
use crate::audit::semaphore::SemaphoreColor;
use crate::audit::tier::Tier;
use serde::Serialize;
use std::cmp::Ordering;

pub const INCIDENCE_ALERT_THRESHOLD: f64 = 0.25;
const HIGHLIGHT_LIMIT: usize = 5;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorCounts {
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
    pub critical: usize,
    pub gray: usize,
}

impl ColorCounts {
    fn record(&mut self, color: SemaphoreColor) {
        match color {
            SemaphoreColor::Green => self.green += 1,
            SemaphoreColor::Yellow => self.yellow += 1,
            SemaphoreColor::Red => self.red += 1,
            SemaphoreColor::Critical => self.critical += 1,
            SemaphoreColor::Gray => self.gray += 1,
        }
    }

    pub fn get(&self, color: SemaphoreColor) -> usize {
        match color {
            SemaphoreColor::Green => self.green,
            SemaphoreColor::Yellow => self.yellow,
            SemaphoreColor::Red => self.red,
            SemaphoreColor::Critical => self.critical,
            SemaphoreColor::Gray => self.gray,
        }
    }

    pub fn computable(&self) -> usize {
        self.green + self.yellow + self.red + self.critical
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionCounts {
    pub performance: ColorCounts,
    pub benchmark: ColorCounts,
    pub efficiency: ColorCounts,
    pub contract: ColorCounts,
    pub global: ColorCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueHighlight {
    pub id: u32,
    pub name: String,
    pub tier: Tier,
    pub value: f64,
}

/// Network-level aggregates. Averages skip venues whose metric is not computable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub venue_count: usize,
    pub active_count: usize,
    pub color_counts: DimensionCounts,
    pub average_rent_incidence: Option<f64>,
    pub average_benchmark_deviation: Option<f64>,
    pub average_global_index: Option<f64>,
    pub average_contract_deviation: Option<f64>,
    pub total_revenue: f64,
    pub total_margin: f64,
    pub incidence_alerts: Vec<VenueHighlight>,
    pub top_margin: Vec<VenueHighlight>,
    pub top_incidence: Vec<VenueHighlight>,
}

impl PortfolioSummary {
    /// `total_margin` is the context total, so it sums the same venues the margin
    /// sub-score is measured against.
    pub(crate) fn build(
        venues: &[VenueMetrics],
        audits: &[VenueAudit],
        context: Option<&PortfolioContext>,
    ) -> Self {
        let mut color_counts = DimensionCounts::default();
        for audit in audits {
            color_counts.performance.record(audit.performance.color);
            color_counts.benchmark.record(audit.benchmark.color);
            color_counts.efficiency.record(audit.efficiency.color);
            color_counts.contract.record(audit.contract.color);
            color_counts.global.record(audit.global.color);
        }

        let total_revenue: f64 = venues
            .iter()
            .filter(|venue| venue.is_active())
            .filter_map(|venue| venue.revenue)
            .sum();
        let total_margin = context.map_or(0.0, |ctx| ctx.total_margin);

        let mut incidence_alerts = highlights(audits, |audit| audit.performance.rent_incidence);
        incidence_alerts.retain(|entry| entry.value > INCIDENCE_ALERT_THRESHOLD);
        sort_descending(&mut incidence_alerts);

        let mut top_margin = highlights(audits, |audit| audit.performance.margin_contribution);
        sort_descending(&mut top_margin);
        top_margin.truncate(HIGHLIGHT_LIMIT);

        let mut top_incidence = highlights(audits, |audit| audit.performance.rent_incidence);
        sort_descending(&mut top_incidence);
        top_incidence.truncate(HIGHLIGHT_LIMIT);

        Self {
            venue_count: venues.len(),
            active_count: venues.iter().filter(|venue| venue.is_active()).count(),
            color_counts,
            average_rent_incidence: mean(audits.iter().map(|a| a.performance.rent_incidence)),
            average_benchmark_deviation: mean(audits.iter().map(|a| a.benchmark.deviation)),
            average_global_index: mean(audits.iter().map(|a| a.efficiency.global_index)),
            average_contract_deviation: mean(audits.iter().map(|a| a.contract.deviation_percent)),
            total_revenue,
            total_margin,
            incidence_alerts,
            top_margin,
            top_incidence,
        }
    }
}

fn highlights<F>(audits: &[VenueAudit], metric: F) -> Vec<VenueHighlight>
where
    F: Fn(&VenueAudit) -> Option<f64>,
{
    audits
        .iter()
        .filter_map(|audit| {
            metric(audit).map(|value| VenueHighlight {
                id: audit.id,
                name: audit.name.clone(),
                tier: audit.tier,
                value,
            })
        })
        .collect()
}

fn sort_descending(entries: &mut [VenueHighlight]) {
    entries.sort_by(|a, b| match b.value.total_cmp(&a.value) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });
}

fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}
