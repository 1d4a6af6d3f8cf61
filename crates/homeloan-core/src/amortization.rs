//! Fixed-rate amortization: annuity mortgages and zero-interest installment
//! plans.
//!
//! The monthly payment, every schedule row and the summary figures are
//! finalized in whole cents with half-up rounding. The final row repays the
//! remaining balance instead of the nominal amount, so the schedule always
//! closes at exactly 0.00 regardless of per-row rounding drift.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HomeLoanError;
use crate::numfmt::round_cents;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::HomeLoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// A year count is accepted when `years * 12` lands within this distance of
/// a whole month. 1/12 has no terminating decimal form, so a strict
/// integrality check would make a one-month term unreachable.
const MONTH_TOLERANCE: Decimal = dec!(0.000000001);

/// Rates above this trigger a reasonableness warning.
const HIGH_RATE_THRESHOLD: Decimal = dec!(30);

const MONTHS_PER_YEAR: Decimal = dec!(12);
const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Input parameters for a mortgage or installment calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    /// Property price
    pub home_price: Money,
    /// Up-front payment, reducing the financed principal
    pub down_payment: Money,
    /// Loan term in years; must resolve to a whole number of months
    pub term_years: Years,
    /// Annual rate in percent; 0 selects the no-interest installment path
    pub annual_rate_percent: Rate,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Payment summary for the whole loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageSummary {
    /// Regular monthly payment
    pub monthly_payment: Money,
    /// Nominal payment times the month count
    pub total_paid: Money,
    /// Total paid minus principal
    pub overpayment: Money,
    /// Overpayment as a percentage of principal
    pub overpayment_percent: Decimal,
}

/// One month of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Month number (1-indexed)
    pub month: u32,
    /// Amount due this month
    pub payment: Money,
    /// Interest portion
    pub interest: Money,
    /// Principal portion
    pub principal: Money,
    /// Remaining principal after this payment
    pub balance: Money,
}

/// Complete output: derived figures, summary and the full schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageOutput {
    /// Financed principal (price minus down payment)
    pub principal: Money,
    /// Number of monthly payments
    pub months: u32,
    /// Loan-level figures
    pub summary: MortgageSummary,
    /// Month-by-month breakdown
    pub schedule: Vec<ScheduleEntry>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Compute the payment summary and month-by-month schedule for a fixed-rate
/// loan.
///
/// A zero rate divides the principal evenly across the term; any positive
/// rate uses the annuity formula `PMT = P * r(1+r)^n / ((1+r)^n - 1)` with
/// `r` the monthly rate, computed at full precision and rounded once.
///
/// The summary's `total_paid` is the nominal payment times the month count.
/// The schedule's final row repays the remaining balance instead, so its
/// payment sum can differ from `total_paid` by a few cents; when it does, a
/// warning states both figures.
pub fn calculate_mortgage(
    input: &MortgageInput,
) -> HomeLoanResult<ComputationOutput<MortgageOutput>> {
    let started = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;
    let months = resolve_months(input.term_years)?;
    let months_dec = Decimal::from(months);

    let principal = input.home_price - input.down_payment;

    let monthly_rate = if input.annual_rate_percent.is_zero() {
        None
    } else {
        Some(input.annual_rate_percent / HUNDRED / MONTHS_PER_YEAR)
    };

    let monthly_payment = match monthly_rate {
        None => round_cents(principal / months_dec),
        Some(r) => {
            let growth = (Decimal::ONE + r).powu(u64::from(months));
            round_cents(principal * (r * growth) / (growth - Decimal::ONE))
        }
    };

    let total_paid = round_cents(monthly_payment * months_dec);
    let overpayment = round_cents(total_paid - principal);
    let overpayment_percent = round_cents(overpayment / principal * HUNDRED);

    let schedule = build_schedule(principal, monthly_payment, monthly_rate, months);

    let schedule_total: Decimal = schedule.iter().map(|row| row.payment).sum();
    if schedule_total != total_paid {
        warnings.push(format!(
            "Schedule payments sum to {schedule_total} while the nominal total is {total_paid}; \
             the final installment absorbs the cent rounding"
        ));
    }
    if input.annual_rate_percent > HIGH_RATE_THRESHOLD {
        warnings.push(format!(
            "Annual rate of {}% is unusually high; verify the input",
            input.annual_rate_percent
        ));
    }

    let methodology = match monthly_rate {
        Some(_) => "Annuity amortization, half-up cent rounding",
        None => "Zero-rate equal installments, half-up cent rounding",
    };

    let output = MortgageOutput {
        principal,
        months,
        summary: MortgageSummary {
            monthly_payment,
            total_paid,
            overpayment,
            overpayment_percent,
        },
        schedule,
    };

    Ok(with_metadata(methodology, input, warnings, started, output))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &MortgageInput) -> HomeLoanResult<()> {
    if input.home_price <= Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "home_price".into(),
            reason: "Property price must be greater than 0".into(),
        });
    }
    if input.down_payment < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot be negative".into(),
        });
    }
    if input.down_payment >= input.home_price {
        return Err(HomeLoanError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment must be less than the property price".into(),
        });
    }
    if input.term_years <= Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "term_years".into(),
            reason: "Loan term must be greater than 0".into(),
        });
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Rate cannot be negative".into(),
        });
    }
    Ok(())
}

/// Resolve a year count into a whole number of months.
fn resolve_months(term_years: Years) -> HomeLoanResult<u32> {
    let months = term_years * MONTHS_PER_YEAR;
    let nearest = months.round();

    if (months - nearest).abs() > MONTH_TOLERANCE {
        return Err(HomeLoanError::InvalidInput {
            field: "term_years".into(),
            reason: format!(
                "A term of {term_years} years is {months} months; \
                 the term must cover a whole number of months"
            ),
        });
    }

    let months = nearest.to_u32().ok_or_else(|| HomeLoanError::InvalidInput {
        field: "term_years".into(),
        reason: "Term is too long to schedule".into(),
    })?;

    if months == 0 {
        return Err(HomeLoanError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must cover at least one month".into(),
        });
    }

    Ok(months)
}

/// Walk the balance month by month. Interest accrues on the running balance;
/// the final row repays whatever balance remains.
fn build_schedule(
    principal: Money,
    monthly_payment: Money,
    monthly_rate: Option<Rate>,
    months: u32,
) -> Vec<ScheduleEntry> {
    let mut schedule = Vec::with_capacity(months as usize);
    let mut balance = principal;

    for month in 1..=months {
        let interest = match monthly_rate {
            Some(r) => round_cents(balance * r),
            None => Decimal::ZERO,
        };

        let last = month == months;
        let principal_part = if last {
            balance
        } else {
            round_cents(monthly_payment - interest)
        };
        let payment = if last {
            round_cents(interest + principal_part)
        } else {
            monthly_payment
        };

        balance = round_cents(balance - principal_part);
        if balance < Decimal::ZERO {
            balance = Decimal::ZERO;
        }

        schedule.push(ScheduleEntry {
            month,
            payment,
            interest,
            principal: principal_part,
            balance,
        });
    }

    schedule
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// A small loan that divides evenly: 1200 over 12 months at zero rate.
    fn even_installment() -> MortgageInput {
        MortgageInput {
            home_price: dec!(1500),
            down_payment: dec!(300),
            term_years: dec!(1),
            annual_rate_percent: dec!(0),
        }
    }

    #[test]
    fn test_even_installment_has_no_drift() {
        let result = calculate_mortgage(&even_installment()).unwrap();
        let out = &result.result;

        assert_eq!(out.summary.monthly_payment, dec!(100));
        assert_eq!(out.summary.total_paid, dec!(1200));
        assert_eq!(out.summary.overpayment, dec!(0.00));
        assert!(out.schedule.iter().all(|row| row.payment == dec!(100)));

        // nothing to absorb, so no reconciliation warning
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_annuity_payment_matches_closed_form() {
        let input = MortgageInput {
            home_price: dec!(300_000),
            down_payment: dec!(60_000),
            term_years: dec!(5),
            annual_rate_percent: dec!(9),
        };
        let result = calculate_mortgage(&input).unwrap();

        let r = dec!(9) / dec!(100) / dec!(12);
        let growth = (Decimal::ONE + r).powu(60);
        let expected = round_cents(dec!(240_000) * (r * growth) / (growth - Decimal::ONE));

        assert_eq!(result.result.summary.monthly_payment, expected);
    }

    #[test]
    fn test_last_row_reconciles_balance_to_zero() {
        let input = MortgageInput {
            home_price: dec!(300_000),
            down_payment: dec!(60_000),
            term_years: dec!(5),
            annual_rate_percent: dec!(9),
        };
        let result = calculate_mortgage(&input).unwrap();
        let last = result.result.schedule.last().unwrap();

        assert_eq!(last.balance, dec!(0.00));
        assert_eq!(last.payment, round_cents(last.interest + last.principal));
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut input = even_installment();
        input.home_price = Decimal::ZERO;
        assert!(calculate_mortgage(&input).is_err());
    }

    #[test]
    fn test_down_payment_at_price_rejected() {
        let mut input = even_installment();
        input.down_payment = input.home_price;
        let result = calculate_mortgage(&input);
        match result {
            Err(HomeLoanError::InvalidInput { field, .. }) => assert_eq!(field, "down_payment"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut input = even_installment();
        input.annual_rate_percent = dec!(-1);
        assert!(calculate_mortgage(&input).is_err());
    }

    #[test]
    fn test_fractional_month_count_rejected() {
        let mut input = even_installment();
        input.term_years = dec!(2.3);
        match calculate_mortgage(&input) {
            Err(HomeLoanError::InvalidInput { field, .. }) => assert_eq!(field, "term_years"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_half_year_term_is_whole_months() {
        let mut input = even_installment();
        input.term_years = dec!(2.5);
        let result = calculate_mortgage(&input).unwrap();
        assert_eq!(result.result.months, 30);
    }

    #[test]
    fn test_high_rate_warning() {
        let mut input = even_installment();
        input.annual_rate_percent = dec!(35);
        let result = calculate_mortgage(&input).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("unusually high")));
    }

    #[test]
    fn test_methodology_string_tracks_rate_path() {
        let installment = calculate_mortgage(&even_installment()).unwrap();
        assert_eq!(
            installment.methodology,
            "Zero-rate equal installments, half-up cent rounding"
        );

        let mut input = even_installment();
        input.annual_rate_percent = dec!(7);
        let credit = calculate_mortgage(&input).unwrap();
        assert_eq!(
            credit.methodology,
            "Annuity amortization, half-up cent rounding"
        );
    }
}
