use super::normalizer::{clean_numeric, normalize_header};
use super::VenueImportError;
use crate::audit::{VenueMetrics, VenueState};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_venues<R: Read>(reader: R) -> Result<Vec<VenueMetrics>, VenueImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: csv::StringRecord = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    csv_reader.set_headers(headers.clone());

    let mut venues = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: VenueRow = record.deserialize(Some(&headers))?;
        venues.push(row.into_metrics(line)?);
    }

    Ok(venues)
}

#[derive(Debug, Deserialize)]
struct VenueRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id_salon: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    nombre_salon: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    estado_salon: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    municipio_salon: Option<String>,
    #[serde(rename = "año", default, deserialize_with = "empty_string_as_none")]
    year: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pax_calculado: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    mt2_salon: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cantidad_eventos_salon: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    total_invitados_salon: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    costos_variables_salon: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    costos_fijos_salon: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    ventas_totales_salon: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    ticket_evento: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    ticket_persona: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    contrato_usd: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    alquiler_pagado: Option<String>,
}

impl VenueRow {
    fn into_metrics(self, line: u64) -> Result<VenueMetrics, VenueImportError> {
        let raw_id = self
            .id_salon
            .ok_or_else(|| invalid_row(line, "missing id_salon".to_string()))?;
        let id = parse_id(&raw_id)
            .ok_or_else(|| invalid_row(line, format!("invalid id_salon `{raw_id}`")))?;
        let name = self
            .nombre_salon
            .ok_or_else(|| invalid_row(line, format!("venue {id} has no nombre_salon")))?;

        Ok(VenueMetrics {
            id,
            name,
            municipality: self.municipio_salon,
            state: self
                .estado_salon
                .as_deref()
                .map(VenueState::parse_lenient)
                .unwrap_or_default(),
            year: self.year.as_deref().and_then(parse_year),
            fixed_costs: numeric(self.costos_fijos_salon),
            variable_costs: numeric(self.costos_variables_salon),
            revenue: numeric(self.ventas_totales_salon),
            area_m2: numeric(self.mt2_salon),
            guest_capacity: numeric(self.pax_calculado),
            event_count: numeric(self.cantidad_eventos_salon),
            total_guests: numeric(self.total_invitados_salon),
            avg_ticket_per_event: numeric(self.ticket_evento),
            avg_ticket_per_guest: numeric(self.ticket_persona),
            contract_amount_foreign: numeric(self.contrato_usd),
            rent_paid: numeric(self.alquiler_pagado),
        })
    }
}

fn invalid_row(line: u64, reason: String) -> VenueImportError {
    VenueImportError::InvalidRow { line, reason }
}

fn numeric(raw: Option<String>) -> Option<f64> {
    raw.as_deref().and_then(clean_numeric)
}

fn parse_id(raw: &str) -> Option<u32> {
    clean_numeric(raw)
        .filter(|value| *value >= 0.0 && value.fract() == 0.0 && *value <= f64::from(u32::MAX))
        .map(|value| value as u32)
}

fn parse_year(raw: &str) -> Option<i32> {
    clean_numeric(raw)
        .filter(|value| value.fract() == 0.0 && (1900.0..=9999.0).contains(value))
        .map(|value| value as i32)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
pub(crate) fn parse_id_for_tests(raw: &str) -> Option<u32> {
    parse_id(raw)
}
