//! Text rendering of a restart test report.

use std::fmt::Write;

use restartcheck_core::{Estimate, Orientation, RestartReport, Stage};

fn orientation_tag(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Rows => "Rows",
        Orientation::Columns => "Cols",
    }
}

/// Render everything printed after the initial `H_I` line.
///
/// Stage banners appear in invocation order; with `verbose` each applicable
/// estimate gets its own line. Not-applicable estimates are never shown.
pub fn render(report: &RestartReport, verbose: bool) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, report, verbose);
    out
}

fn write_report(out: &mut String, report: &RestartReport, verbose: bool) -> std::fmt::Result {
    let word_size = report.config.word_size;

    if verbose {
        writeln!(out, "\nRestart Sanity Check Passed...")?;
    }
    if report.config.data_class.is_iid() {
        writeln!(out, "\nRunning IID tests...\n")?;
    } else {
        writeln!(out, "\nRunning non-IID tests...\n")?;
    }

    let mut stage: Option<Stage> = None;
    for record in &report.estimates {
        let current = record.estimator.stage();
        if stage != Some(current) {
            if stage.is_some() {
                writeln!(out)?;
            }
            writeln!(out, "{}", current.banner())?;
            stage = Some(current);
        }
        if let (true, Estimate::Applicable(h)) = (verbose, record.estimate) {
            writeln!(
                out,
                "\t{} ({}) = {h:.6} / {word_size} bit(s)",
                record.estimator.name(),
                orientation_tag(record.orientation)
            )?;
        }
    }

    let v = &report.validation;
    writeln!(out, "\nH_r: {:.6}", v.h_row)?;
    writeln!(out, "H_c: {:.6}", v.h_column)?;
    writeln!(out, "H_I: {:.6}\n", v.h_initial)?;

    match v.certified_bound {
        Some(bound) => {
            writeln!(out, "Validation Test Passed...\n")?;
            writeln!(out, "min(H_r, H_c, H_I): {bound:.6}\n")?;
        }
        None => writeln!(out, "*** min(H_r, H_c) < H_I/2, Validation Testing Failed ***")?,
    }
    Ok(())
}

/// Verbose preamble describing the loaded samples.
pub fn render_samples(symbol_count: usize, alphabet_size: usize, remapped: bool) -> String {
    let mut out = format!("Number of Symbols: {symbol_count}\n");
    if remapped {
        out.push_str(&format!(
            "\nSymbols have been mapped down to an alphabet size of {alphabet_size} unique symbols\n"
        ));
    } else {
        out.push_str(&format!(
            "\nSymbol alphabet consists of {alphabet_size} unique symbols\n"
        ));
    }
    out
}
