use std::io::IsTerminal;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{terminal_size, Width};

use crate::report::Ranked;
use crate::scoring::{Diagnostic, DiagnosticKind, ScoreTable};

/// Width of a score cell ("1.00")
const SCORE_WIDTH: usize = 4;
const SEPARATOR: &str = "  ";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score in `[0, 1]` with two decimals
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

fn paint_score(score: f64, width: usize, use_colors: bool) -> String {
    let padded = format!("{:>width$}", format_score(score), width = width);
    if !use_colors {
        return padded;
    }
    if score >= 0.7 {
        padded.green().to_string()
    } else if score >= 0.4 {
        padded.yellow().to_string()
    } else if score > 0.0 {
        padded.red().to_string()
    } else {
        padded.dimmed().to_string()
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Format a score table with a header row and one line per model.
///
/// `models` fixes the row order; models missing from the table are skipped.
/// Column headers are shortened when the terminal is too narrow.
pub fn format_score_table(table: &ScoreTable, models: &[String], use_colors: bool) -> String {
    let rows: Vec<&String> = models.iter().filter(|m| table.row(m).is_some()).collect();
    if rows.is_empty() || table.columns().is_empty() {
        return "No scores to show.".to_string();
    }

    let model_width = rows.iter().map(|m| char_len(m)).max().unwrap_or(0).max(5);
    let columns = table.columns();

    // Split what is left of the terminal between the score columns
    let column_width = match get_terminal_width() {
        Some(width) => {
            let fixed = model_width + SEPARATOR.len() * columns.len();
            let per_column = width.saturating_sub(fixed) / columns.len();
            per_column.max(SCORE_WIDTH)
        }
        None => columns.iter().map(|c| char_len(c)).max().unwrap_or(0),
    };
    let widths: Vec<usize> = columns
        .iter()
        .map(|c| char_len(c).min(column_width).max(SCORE_WIDTH))
        .collect();

    let mut header = format!("{:<width$}", "Model", width = model_width);
    for (column, width) in columns.iter().zip(&widths) {
        header.push_str(SEPARATOR);
        header.push_str(&format!("{:>width$}", truncate(column, *width), width = *width));
    }
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };

    let mut lines = vec![header];
    for model in rows {
        let mut line = format!("{:<width$}", model, width = model_width);
        for (score, width) in table.values(model).into_iter().zip(&widths) {
            line.push_str(SEPARATOR);
            line.push_str(&paint_score(score, *width, use_colors));
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Format a ranking as numbered lines: index, rating, model
pub fn format_ranking(ranking: &[Ranked], use_colors: bool) -> String {
    if ranking.is_empty() {
        return "No models to rank.".to_string();
    }

    ranking
        .iter()
        .enumerate()
        .map(|(idx, ranked)| {
            // 1-based index, right-aligned with trailing dot
            let index_str = format!("{:>3}.", idx + 1);
            let rating = paint_score(ranked.rating, SCORE_WIDTH, use_colors);
            if use_colors {
                format!(
                    "{} {}{}{}",
                    index_str.dimmed(),
                    rating,
                    SEPARATOR,
                    ranked.model.bold()
                )
            } else {
                format!("{} {}{}{}", index_str, rating, SEPARATOR, ranked.model)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a score table as tab-separated values for scripting.
/// First line is the header; scores keep full precision.
pub fn format_tsv(table: &ScoreTable, models: &[String]) -> String {
    let mut lines = vec![std::iter::once("model".to_string())
        .chain(table.columns().iter().cloned())
        .collect::<Vec<_>>()
        .join("\t")];
    for model in models.iter().filter(|m| table.row(m).is_some()) {
        let values = table.values(model);
        lines.push(
            std::iter::once(model.clone())
                .chain(values.iter().map(|v| v.to_string()))
                .collect::<Vec<_>>()
                .join("\t"),
        );
    }
    lines.join("\n")
}

/// Format a ranking as tab-separated values: rating, model (no header)
pub fn format_ranking_tsv(ranking: &[Ranked]) -> String {
    ranking
        .iter()
        .map(|r| format!("{}\t{}", r.rating, r.model))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format `(label, count)` pairs as a bar list out of `of` models
pub fn format_totals(totals: &[(String, usize)], of: usize, use_colors: bool) -> String {
    if totals.is_empty() {
        return "No columns selected.".to_string();
    }
    let label_width = totals.iter().map(|(l, _)| char_len(l)).max().unwrap_or(0);
    let count_width = of.to_string().len();

    totals
        .iter()
        .map(|(label, count)| {
            let bar = "#".repeat(*count);
            if use_colors {
                format!(
                    "{:<lw$}{}{:>cw$}/{}{}{}",
                    label,
                    SEPARATOR,
                    count.bold(),
                    of,
                    SEPARATOR,
                    bar.cyan(),
                    lw = label_width,
                    cw = count_width
                )
            } else {
                format!(
                    "{:<lw$}{}{:>cw$}/{}{}{}",
                    label,
                    SEPARATOR,
                    count,
                    of,
                    SEPARATOR,
                    bar,
                    lw = label_width,
                    cw = count_width
                )
                .trim_end()
                .to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one diagnostic as a warning line
pub fn format_diagnostic(diagnostic: &Diagnostic, use_colors: bool) -> String {
    if !use_colors {
        return format!("warning: {}", diagnostic);
    }
    let tag = match diagnostic.kind {
        DiagnosticKind::UnspecifiedAnswer => "warning:".yellow().to_string(),
        DiagnosticKind::SuspiciousAnswer => "check:".magenta().to_string(),
    };
    format!("{} {}", tag, diagnostic)
}

/// Pretty-printed JSON for `--json`
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}
