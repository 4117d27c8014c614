//! Currency rate source
//!
//! Rates come from a Frankfurter-compatible service:
//! `GET {base_url}/currencies` (code → display name) and
//! `GET {base_url}/latest?from=CODE` (`{ "base", "date", "rates" }`).
//! Response parsing is kept separate from transport so it can be tested
//! without a network.
//!
//! [`RateTracker`] holds the currently selected "from" currency and only
//! accepts a response whose base still matches that selection.

use std::collections::BTreeMap;
use std::process::Command;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::convert::currency::{RateTable, RATE_NOT_AVAILABLE};
use crate::error::{CalcError, CalcResult};

pub const DEFAULT_RATES_URL: &str = "https://api.frankfurter.app";

pub const RATES_NOT_FOUND: &str = "Rates not found in API response";

/// Anything that can list currencies and fetch the latest rates for a base
pub trait RateSource {
    fn currencies(&self) -> CalcResult<BTreeMap<String, String>>;

    fn latest(&self, base: &str) -> CalcResult<RateTable>;
}

/// HTTP client for the Frankfurter API
#[derive(Debug, Clone)]
pub struct FrankfurterClient {
    base_url: String,
}

impl Default for FrankfurterClient {
    fn default() -> Self {
        Self::new(DEFAULT_RATES_URL)
    }
}

impl FrankfurterClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a path with curl; `-f` turns non-2xx responses into a failed exit
    fn get(&self, path: &str) -> CalcResult<String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::info!(%url, "Fetching currency data");

        let output = Command::new("curl")
            .args(["-sf", "--max-time", "15", "-H", "Accept: application/json", url.as_str()])
            .output()
            .map_err(|e| CalcError::network(format!("Failed to run curl: {}", e)))?;

        if !output.status.success() {
            tracing::warn!(%url, status = ?output.status.code(), "Rate service request failed");
            return Err(CalcError::network(format!(
                "Request to {} failed (curl exit code {})",
                url,
                output.status.code().unwrap_or(-1)
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl RateSource for FrankfurterClient {
    fn currencies(&self) -> CalcResult<BTreeMap<String, String>> {
        parse_currencies(&self.get("/currencies")?)
    }

    fn latest(&self, base: &str) -> CalcResult<RateTable> {
        parse_latest(base, &self.get(&format!("/latest?from={}", base))?)
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    rates: Option<BTreeMap<String, f64>>,
}

/// Parse a `/currencies` body
pub fn parse_currencies(body: &str) -> CalcResult<BTreeMap<String, String>> {
    serde_json::from_str(body)
        .map_err(|e| CalcError::network(format!("Malformed currencies response: {}", e)))
}

/// Parse a `/latest` body into a table for `base` (with `base ↦ 1` injected)
pub fn parse_latest(base: &str, body: &str) -> CalcResult<RateTable> {
    let response: LatestResponse = serde_json::from_str(body)
        .map_err(|e| CalcError::network(format!("Malformed rates response: {}", e)))?;

    let rates = response
        .rates
        .ok_or_else(|| CalcError::network(RATES_NOT_FOUND))?;

    let table = RateTable::new(base, rates);
    Ok(match response.date {
        Some(date) => table.with_date(date),
        None => table,
    })
}

/// A rate fetch issued for a particular base currency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRequest {
    pub id: u64,
    pub base: String,
}

/// Tracks the selected base currency and the rates accepted for it
#[derive(Debug, Default)]
pub struct RateTracker {
    selected: Option<String>,
    issued: u64,
    table: Option<RateTable>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn table(&self) -> Option<&RateTable> {
        self.table.as_ref()
    }

    /// Select a new "from" currency.
    ///
    /// Rates for a different base are dropped immediately; any response still
    /// in flight for the old base will be discarded on arrival.
    pub fn select(&mut self, base: impl Into<String>) -> RateRequest {
        let base = base.into();
        if self.table.as_ref().is_some_and(|t| t.base != base) {
            self.table = None;
        }
        self.selected = Some(base.clone());
        self.issued += 1;
        RateRequest {
            id: self.issued,
            base,
        }
    }

    fn is_current(&self, request: &RateRequest) -> bool {
        self.selected.as_deref() == Some(request.base.as_str())
    }

    /// Store a fetched table. Returns `false` if the response is stale.
    pub fn accept(&mut self, request: &RateRequest, table: RateTable) -> bool {
        if !self.is_current(request) || table.base != request.base {
            tracing::debug!(
                request = request.id,
                base = %request.base,
                selected = ?self.selected,
                "Discarding stale rate response"
            );
            return false;
        }
        self.table = Some(table);
        true
    }

    /// Surface a fetch failure only if its request is still relevant
    pub fn fail(&self, request: &RateRequest, error: CalcError) -> Option<CalcError> {
        if self.is_current(request) {
            Some(error)
        } else {
            tracing::debug!(request = request.id, base = %request.base, "Ignoring stale rate failure");
            None
        }
    }

    /// Select `base` and fetch its rates synchronously from `source`
    pub fn fetch(&mut self, source: &impl RateSource, base: &str) -> CalcResult<()> {
        let request = self.select(base);
        match source.latest(base) {
            Ok(table) => {
                self.accept(&request, table);
                Ok(())
            }
            Err(e) => match self.fail(&request, e) {
                Some(e) => Err(e),
                None => Ok(()),
            },
        }
    }

    /// Convert `amount` of the selected currency into `to`
    pub fn convert(&self, to: &str, amount: f64) -> CalcResult<f64> {
        match &self.table {
            Some(table) => table.convert(to, amount),
            None => Err(CalcError::domain(RATE_NOT_AVAILABLE)),
        }
    }
}
