//! Currency conversion over a fetched rate table

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::format::ensure_finite;

pub const RATE_NOT_AVAILABLE: &str = "Exchange rate not available for the selected currency.";
pub const INVALID_AMOUNT: &str = "Please enter a valid positive amount.";

/// Rates relative to `base`, which always maps to 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Build a table, injecting `base ↦ 1`
    pub fn new(base: impl Into<String>, mut rates: BTreeMap<String, f64>) -> Self {
        let base = base.into();
        rates.insert(base.clone(), 1.0);
        Self {
            base,
            date: None,
            rates,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Convert `amount` of the base currency into `to`
    pub fn convert(&self, to: &str, amount: f64) -> CalcResult<f64> {
        convert_currency(&self.rates, &self.base, to, amount)
    }
}

/// `amount * rates[to]`, where `rates` are relative to `from`
pub fn convert_currency(
    rates: &BTreeMap<String, f64>,
    from: &str,
    to: &str,
    amount: f64,
) -> CalcResult<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CalcError::domain(INVALID_AMOUNT));
    }
    if !rates.contains_key(from) {
        return Err(CalcError::domain(format!(
            "No rates loaded for base currency {}",
            from
        )));
    }
    let rate = rates
        .get(to)
        .copied()
        .ok_or_else(|| CalcError::domain(RATE_NOT_AVAILABLE))?;
    ensure_finite(amount * rate, "Converted amount")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_table() -> RateTable {
        let mut rates = BTreeMap::new();
        rates.insert("EUR".to_string(), 0.5);
        rates.insert("JPY".to_string(), 150.0);
        RateTable::new("USD", rates)
    }

    #[test]
    fn test_base_injected() {
        assert_eq!(usd_table().rate("USD"), Some(1.0));
    }

    #[test]
    fn test_convert() {
        let table = usd_table();
        assert_eq!(table.convert("EUR", 10.0).unwrap(), 5.0);
        assert_eq!(table.convert("USD", 10.0).unwrap(), 10.0);
    }

    #[test]
    fn test_missing_target() {
        assert_eq!(
            usd_table().convert("GBP", 1.0),
            Err(CalcError::Domain(RATE_NOT_AVAILABLE.to_string()))
        );
    }

    #[test]
    fn test_non_positive_amount() {
        let table = usd_table();
        assert!(table.convert("EUR", 0.0).is_err());
        assert!(table.convert("EUR", -3.0).is_err());
        assert!(table.convert("EUR", f64::NAN).is_err());
    }

    #[test]
    fn test_rates_for_other_base_rejected() {
        let table = usd_table();
        assert!(convert_currency(&table.rates, "CHF", "EUR", 1.0).is_err());
    }
}
