use std::collections::BTreeMap;

use colored::Colorize;

use crate::calculator::{parse_keys, BasicCalculator, ScientificCalculator, ScientificKey};
use crate::convert::{category_of, conversion_info, convert_unit, RateTable};
use crate::error::{CalcError, CalcResult};
use crate::expr::StandardEvaluator;
use crate::format::{format_number, parse_number, ERROR_DISPLAY};
use crate::graph::{self, NO_VALID_POINTS};
use crate::loan::{calculate_loan, InterestType, LoanRequest};
use crate::rates::{FrankfurterClient, RateTracker};

fn print_display(expression: &str, display: &str) {
    if !expression.is_empty() {
        println!("   {}", expression.dimmed());
    }
    if display == ERROR_DISPLAY {
        println!("   {}", display.bold().red());
    } else {
        println!("   {}", display.bold().green());
    }
}

/// Execute the basic command
pub fn basic(keys: String) -> CalcResult<()> {
    println!("{}", "🧮 Calcdeck - Basic calculator".bold().green());
    println!("   Keys: {}", keys);
    println!();

    let calc = BasicCalculator::new().press_all(parse_keys(&keys)?);
    tracing::debug!(state = ?calc, "Basic calculator finished");

    print_display(&calc.expression, &calc.display_value);
    Ok(())
}

/// Execute the sci command
pub fn scientific(tokens: Vec<String>, radians: bool) -> CalcResult<()> {
    println!("{}", "🔬 Calcdeck - Scientific calculator".bold().green());
    let mode = if radians { "radians" } else { "degrees" };
    println!("   Mode: {}", mode.bright_yellow());
    println!();

    let keys = tokens
        .iter()
        .map(|t| t.parse::<ScientificKey>())
        .collect::<CalcResult<Vec<_>>>()?;

    let start = if radians {
        ScientificCalculator::new().press(ScientificKey::Radians, &StandardEvaluator)
    } else {
        ScientificCalculator::new()
    };
    let calc = keys
        .into_iter()
        .fold(start, |calc, key| calc.press(key, &StandardEvaluator));
    tracing::debug!(state = ?calc, "Scientific calculator finished");

    print_display(&calc.expression, &calc.display_value);
    if calc.is_inverse {
        println!("   {}", "(inverse pending)".yellow());
    }
    Ok(())
}

/// Execute the convert command; the category comes from the source unit
pub fn convert(amount: f64, from: String, to: String) -> CalcResult<()> {
    println!("{}", "📏 Calcdeck - Unit conversion".bold().green());

    let category =
        category_of(&from).ok_or_else(|| CalcError::parse(format!("Unknown unit: '{}'", from)))?;
    println!("   Category: {}", category.label().bright_blue());
    println!();

    let result = convert_unit(category, &from, &to, amount)?;

    println!("   {}", conversion_info(amount, &from, &to).dimmed());
    println!("   {}", format_number(result).bold().green());
    Ok(())
}

/// Parse `CODE=RATE` pairs
fn parse_rate_overrides(pairs: &[String]) -> CalcResult<BTreeMap<String, f64>> {
    pairs
        .iter()
        .map(|pair| {
            let (code, rate) = pair.split_once('=').ok_or_else(|| {
                CalcError::parse(format!("Expected CODE=RATE, got '{}'", pair))
            })?;
            Ok((code.trim().to_uppercase(), parse_number(rate)?))
        })
        .collect()
}

/// Execute the currency command
///
/// Rates given with `--rate` are used as-is; otherwise they are fetched for
/// the source currency.
pub fn currency(
    amount: f64,
    from: String,
    to: String,
    rates: Vec<String>,
    api_url: String,
) -> CalcResult<()> {
    let from = from.to_uppercase();
    let to = to.to_uppercase();

    println!("{}", "💱 Calcdeck - Currency conversion".bold().green());

    let result = if rates.is_empty() {
        println!("   Rates: {}", api_url.bright_blue());
        let mut tracker = RateTracker::new();
        tracker.fetch(&FrankfurterClient::new(api_url), &from)?;
        if let Some(date) = tracker.table().and_then(|t| t.date) {
            println!("   Date: {}", date);
        }
        tracker.convert(&to, amount)?
    } else {
        println!("   Rates: {}", "command line".bright_blue());
        RateTable::new(from.clone(), parse_rate_overrides(&rates)?).convert(&to, amount)?
    };
    println!();

    println!(
        "   {}",
        format!("{} {} to {}", format_number(amount), from, to).dimmed()
    );
    println!("   {}", format!("{:.2} {}", result, to).bold().green());
    Ok(())
}

/// Execute the loan command
pub fn loan(
    principal: f64,
    annual_rate_percent: f64,
    term_years: f64,
    interest_type: InterestType,
) -> CalcResult<()> {
    println!("{}", "🏦 Calcdeck - Loan calculator".bold().green());
    println!(
        "   Principal: {}  Rate: {}%  Term: {} years  ({})",
        format_number(principal),
        format_number(annual_rate_percent),
        format_number(term_years),
        interest_type.to_string().bright_yellow()
    );
    println!();

    let result = calculate_loan(&LoanRequest {
        principal,
        annual_rate_percent,
        term_years,
        interest_type,
    })?;

    println!("   Monthly payment: {}", result.monthly_display().bold().green());
    println!("   {}", result.summary(interest_type).dimmed());
    Ok(())
}

/// Execute the graph command
pub fn graph(expression: String, x_min: f64, x_max: f64, points: usize) -> CalcResult<()> {
    println!("{}", "📈 Calcdeck - Function sampler".bold().green());
    println!("   y = {}  on [{}, {}]", expression.bright_blue(), x_min, x_max);
    println!();

    let sample = graph::sample(&StandardEvaluator, &expression, x_min, x_max, points)?;

    if sample.no_valid_points() {
        println!("   {}", NO_VALID_POINTS.yellow());
        return Ok(());
    }

    for (i, run) in sample.runs().iter().enumerate() {
        if i > 0 {
            println!("   {}", "…".dimmed());
        }
        for point in run.iter() {
            println!("   {:>14}  {}", format_number(point.x), format_number(point.y));
        }
    }
    println!();

    let ticks: Vec<String> = sample
        .y_ticks(graph::DEFAULT_TICKS)?
        .into_iter()
        .map(format_number)
        .collect();
    println!(
        "   {} points, {} dropped, y ticks: {}",
        sample.points.len(),
        sample.skipped,
        ticks.join(", ")
    );
    Ok(())
}
