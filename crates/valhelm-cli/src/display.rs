//! Display formatting for CLI output

use console::style;
use std::collections::BTreeMap;

use valhelm_core::ValidationReport;

/// Print a validation report grouped by deployment
pub fn print_validation_report(report: &ValidationReport) {
    if report.is_valid() {
        println!("{} Configuration is valid", style("✓").green().bold());
        return;
    }

    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for finding in report.findings() {
        let group = finding
            .deployment
            .clone()
            .unwrap_or_else(|| "(store)".to_string());
        let line = match &finding.path {
            Some(path) => format!("{path}: {}", finding.message),
            None => finding.message.clone(),
        };
        grouped.entry(group).or_default().push(line);
    }

    println!("{} Validation failed:", style("✗").red().bold());
    for (group, lines) in &grouped {
        println!("  {}", style(group).cyan());
        for line in lines {
            println!("    {} {line}", style("✗").red());
        }
    }
    println!();
    println!(
        "{} {} finding(s)",
        style("✗").red().bold(),
        report.len()
    );
}
