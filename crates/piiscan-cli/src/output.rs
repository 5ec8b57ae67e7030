//! Plain-text rendering of reports.

use piiscan_rules::Rule;
use piiscan_scanner::ScanReport;
use std::io::{self, Write};

/// Per file, each rule's status and any matches, then the mean latencies.
pub fn write_report(out: &mut impl Write, report: &ScanReport) -> io::Result<()> {
    for file in &report.files {
        writeln!(out, "{}", file.path.display())?;

        if let Some(message) = &file.error_message {
            writeln!(out, "  error: {message}")?;
            continue;
        }

        for (rule, hit) in &file.hits {
            let status = if *hit { "PRESENT" } else { "NOT FOUND" };
            writeln!(out, "  {rule:<16} {status}")?;

            for literal in file.matches.get(rule).into_iter().flatten() {
                writeln!(out, "      {literal}")?;
            }
        }
    }

    if !report.metric.detection_latencies.is_empty() {
        writeln!(out)?;
        writeln!(out, "mean latency (ms)")?;
        for (rule, detect) in &report.metric.detection_latencies {
            match report.metric.match_latencies.get(rule) {
                Some(matched) => {
                    writeln!(out, "  {rule:<16} detect {detect:.3}  match {matched:.3}")?;
                }
                None => writeln!(out, "  {rule:<16} detect {detect:.3}")?,
            }
        }
    }

    Ok(())
}

/// One line per rule: name, severity and description.
pub fn write_rules<'a>(
    out: &mut impl Write,
    rules: impl IntoIterator<Item = &'a Rule>,
) -> io::Result<()> {
    for rule in rules {
        writeln!(
            out,
            "{:<16} {} ({})  {}",
            rule.name(),
            rule.severity().level(),
            rule.severity(),
            rule.description()
        )?;
    }
    Ok(())
}
