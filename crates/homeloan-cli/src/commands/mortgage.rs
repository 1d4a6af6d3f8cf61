use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use homeloan_core::amortization::{self, MortgageInput};
use homeloan_core::numfmt;

use crate::input;

/// Operating mode: a credit carries a rate, an installment plan never does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanMode {
    #[default]
    Credit,
    Installment,
}

/// Arguments for the amortization calculation
#[derive(Args)]
pub struct CalculateArgs {
    /// Property price; locale-formatted values accepted ("5 000 000", "5000000,50")
    #[arg(long)]
    pub home_price: Option<String>,

    /// Up-front down payment
    #[arg(long)]
    pub down_payment: Option<String>,

    /// Term in years; must resolve to a whole number of months
    #[arg(long)]
    pub term_years: Option<String>,

    /// Annual rate in percent; required in credit mode, ignored for installments
    #[arg(long, alias = "rate", allow_hyphen_values = true)]
    pub annual_rate: Option<String>,

    /// Operating mode
    #[arg(long, value_enum, default_value = "credit")]
    pub mode: LoanMode,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// JSON request shape for --input files and piped stdin.
#[derive(Debug, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub home_price: Decimal,
    pub down_payment: Decimal,
    pub term_years: Decimal,
    #[serde(default)]
    pub annual_rate_percent: Option<Decimal>,
    #[serde(default)]
    pub mode: Option<LoanMode>,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (mortgage_input, _) = resolve_input(
        &args.home_price,
        &args.down_payment,
        &args.term_years,
        &args.annual_rate,
        args.mode,
        &args.input,
    )?;

    let result = amortization::calculate_mortgage(&mortgage_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Gather the four engine inputs from a JSON file, piped stdin, or flags, in
/// that order of precedence, and apply the operating mode: installments run
/// at a forced zero rate, credits must name one.
pub(crate) fn resolve_input(
    home_price: &Option<String>,
    down_payment: &Option<String>,
    term_years: &Option<String>,
    annual_rate: &Option<String>,
    flag_mode: LoanMode,
    input_path: &Option<String>,
) -> Result<(MortgageInput, LoanMode), Box<dyn std::error::Error>> {
    let request: CalculateRequest = if let Some(path) = input_path {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        CalculateRequest {
            home_price: parse_flag("home_price", home_price, "--home-price")?,
            down_payment: parse_flag("down_payment", down_payment, "--down-payment")?,
            term_years: parse_flag("term_years", term_years, "--term-years")?,
            annual_rate_percent: annual_rate
                .as_deref()
                .map(|raw| numfmt::parse_decimal("annual_rate_percent", raw))
                .transpose()?,
            mode: None,
        }
    };

    let mode = request.mode.unwrap_or(flag_mode);
    let annual_rate_percent = match mode {
        LoanMode::Installment => Decimal::ZERO,
        LoanMode::Credit => request
            .annual_rate_percent
            .ok_or("--annual-rate is required in credit mode (or provide --input)")?,
    };

    Ok((
        MortgageInput {
            home_price: request.home_price,
            down_payment: request.down_payment,
            term_years: request.term_years,
            annual_rate_percent,
        },
        mode,
    ))
}

fn parse_flag(
    field: &str,
    value: &Option<String>,
    flag: &str,
) -> Result<Decimal, Box<dyn std::error::Error>> {
    let raw = value
        .as_deref()
        .ok_or_else(|| format!("{flag} is required (or provide --input)"))?;
    Ok(numfmt::parse_decimal(field, raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flags() -> (Option<String>, Option<String>, Option<String>, Option<String>) {
        (
            Some("1 200 000".into()),
            Some("200 000".into()),
            Some("10".into()),
            Some("12,5".into()),
        )
    }

    #[test]
    fn test_flags_parse_locale_formats() {
        let (price, down, years, rate) = flags();
        let (input, mode) =
            resolve_input(&price, &down, &years, &rate, LoanMode::Credit, &None).unwrap();

        assert_eq!(mode, LoanMode::Credit);
        assert_eq!(input.home_price, dec!(1_200_000));
        assert_eq!(input.down_payment, dec!(200_000));
        assert_eq!(input.term_years, dec!(10));
        assert_eq!(input.annual_rate_percent, dec!(12.5));
    }

    #[test]
    fn test_installment_mode_forces_zero_rate() {
        let (price, down, years, rate) = flags();
        let (input, mode) =
            resolve_input(&price, &down, &years, &rate, LoanMode::Installment, &None).unwrap();

        assert_eq!(mode, LoanMode::Installment);
        assert_eq!(input.annual_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn test_credit_mode_requires_rate() {
        let (price, down, years, _) = flags();
        let result = resolve_input(&price, &down, &years, &None, LoanMode::Credit, &None);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_flag_names_the_flag() {
        let (_, down, years, rate) = flags();
        let err = resolve_input(&None, &down, &years, &rate, LoanMode::Credit, &None)
            .unwrap_err()
            .to_string();
        assert!(err.contains("--home-price"));
    }
}
