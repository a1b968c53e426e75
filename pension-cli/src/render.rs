//! Plain-text output for the terminal.

use std::fmt;

use pension_core::{AgeFactorTable, AgeFactors, PayoutKind};

use crate::app::EstimateReport;
use crate::utils::format_amount;

const CURRENCY: &str = "KRW";

struct ReportView<'a>(&'a EstimateReport);

impl fmt::Display for ReportView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let report = self.0;

        writeln!(f, "Owner age:            {}", report.owner_age)?;
        if let Some(spouse_age) = report.spouse_age {
            writeln!(f, "Spouse age:           {spouse_age}")?;
        }
        writeln!(
            f,
            "Adjusted land value:  {} {CURRENCY} ({})",
            format_amount(report.result.adjusted_land_value),
            report.valuation_method.label()
        )?;
        let survivor = if report.has_survivor_election {
            "elected"
        } else {
            "not elected"
        };
        writeln!(f, "Survivor option:      {survivor}")?;
        writeln!(f)?;
        writeln!(f, "Estimated monthly payout")?;
        for (kind, amount) in report.result.amounts() {
            writeln!(
                f,
                "  {:<14}{:>12} {CURRENCY}",
                kind.label(),
                format_amount(amount)
            )?;
        }
        Ok(())
    }
}

struct TableView<'a>(&'a AgeFactorTable);

fn table_row(
    f: &mut fmt::Formatter<'_>,
    age: &str,
    factors: &AgeFactors,
) -> fmt::Result {
    write!(f, "{age:>5}")?;
    for kind in PayoutKind::ALL {
        write!(f, "{:>12}", format_amount(factors.get(kind)))?;
    }
    writeln!(f)
}

impl fmt::Display for TableView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:>5}", "age")?;
        for kind in PayoutKind::ALL {
            write!(f, "{:>12}", kind.as_str())?;
        }
        writeln!(f)?;

        for (age, factors) in self.0.iter() {
            table_row(f, &age.to_string(), factors)?;
        }
        table_row(f, "max", self.0.overflow())
    }
}

/// Renders one estimate as labelled lines.
pub fn render_report(report: &EstimateReport) -> String {
    ReportView(report).to_string()
}

/// Renders the factor table, overflow row last.
pub fn render_table(table: &AgeFactorTable) -> String {
    TableView(table).to_string()
}
