use colored::Colorize;

use crate::summary::{GroupReport, RunSummary};

pub fn print(summary: &RunSummary, verbose: bool) {
    println!("\n{}", "── Resource Policy Reports ──".bold());
    println!("  {}", summary.export.display().to_string().dimmed());

    for report in &summary.reports {
        if !verbose && report.present && !report.has_dependencies() {
            continue;
        }
        print_report(report);
    }

    println!();
    println!(
        "Summary: {} report(s) written, {} data row(s), {} group(s) absent from the export",
        summary.reports.len(),
        summary.total_rows(),
        summary.missing_subtrees(),
    );
}

fn print_report(report: &GroupReport) {
    let code = format!("[{}]", report.group).dimmed();

    if !report.present {
        println!(
            "  {} {} policy subtree not in the export, header-only report",
            "WARN".yellow().bold(),
            code,
        );
        return;
    }

    if report.has_dependencies() {
        println!(
            "  {} {} {} policies scanned, {} rows -> {}",
            "OK".green().bold(),
            code,
            report.policies,
            report.rows_written,
            report.output.display().to_string().dimmed(),
        );
    } else {
        println!(
            "  {} {} no idle-role dependencies ({} policies scanned)",
            "OK".green().bold(),
            code,
            report.policies,
        );
    }
}
