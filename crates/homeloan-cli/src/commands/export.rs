use clap::Args;
use serde_json::Value;

use homeloan_core::amortization;
use homeloan_core::numfmt;

use crate::commands::mortgage::{resolve_input, LoanMode};

/// Arguments for the schedule workbook export
#[derive(Args)]
pub struct ExportArgs {
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

    /// Destination file
    #[arg(long, default_value = "mortgage_schedule.csv")]
    pub out: String,
}

/// Write the schedule workbook: a title, the eight summary fields, a header
/// row, then every schedule row with plain two-decimal cells.
pub fn run_export(args: ExportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (mortgage_input, mode) = resolve_input(
        &args.home_price,
        &args.down_payment,
        &args.term_years,
        &args.annual_rate,
        args.mode,
        &args.input,
    )?;

    let result = amortization::calculate_mortgage(&mortgage_input)?;
    let output = &result.result;
    let summary = &output.summary;

    let title = match mode {
        LoanMode::Credit => "Mortgage: payment schedule",
        LoanMode::Installment => "Installment plan: payment schedule",
    };

    let mut wtr = csv::Writer::from_path(&args.out)
        .map_err(|e| format!("Failed to create '{}': {}", args.out, e))?;

    wtr.write_record([title, "", "", "", ""])?;
    wtr.write_record(["", "", "", "", ""])?;

    let meta: [(&str, String); 8] = [
        ("Home price", numfmt::format_cents(mortgage_input.home_price)),
        ("Down payment", numfmt::format_cents(mortgage_input.down_payment)),
        ("Term, years", mortgage_input.term_years.to_string()),
        ("Rate, % p.a.", mortgage_input.annual_rate_percent.to_string()),
        ("Monthly payment", numfmt::format_cents(summary.monthly_payment)),
        ("Total paid", numfmt::format_cents(summary.total_paid)),
        ("Overpayment", numfmt::format_cents(summary.overpayment)),
        ("Overpayment, %", numfmt::format_cents(summary.overpayment_percent)),
    ];
    for (label, value) in &meta {
        wtr.write_record([*label, value.as_str(), "", "", ""])?;
    }

    wtr.write_record(["", "", "", "", ""])?;
    wtr.write_record(["Month", "Payment", "Interest", "Principal", "Balance"])?;
    for row in &output.schedule {
        wtr.write_record([
            row.month.to_string(),
            numfmt::format_cents(row.payment),
            numfmt::format_cents(row.interest),
            numfmt::format_cents(row.principal),
            numfmt::format_cents(row.balance),
        ])?;
    }
    wtr.flush()?;

    Ok(serde_json::json!({
        "written": args.out,
        "schedule_rows": output.schedule.len(),
    }))
}
