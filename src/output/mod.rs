pub mod formatter;

pub use formatter::{
    format_diagnostic, format_json, format_ranking, format_ranking_tsv, format_score,
    format_score_table, format_totals, format_tsv, should_use_colors,
};
