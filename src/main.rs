use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;

use flexrate::report::{self, Ranked};
use flexrate::scoring::{self, Rubric, ScoreTable};
use flexrate::survey::{self, Matcher, SurveyTable};
use flexrate::{buffered_eprintln, output, stderr_buffer};

const EXIT_SUCCESS: i32 = 0;
const EXIT_SURVEY: i32 = 2;
const EXIT_SCORING: i32 = 3;
const EXIT_CONFIG: i32 = 4;

const OVERALL_RATING: &str = "Overall Rating";

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rate models per domain and overall (default if no subcommand)
    Rate {
        /// Show one domain with its group scores
        #[arg(short, long)]
        domain: Option<String>,

        /// Also show the detailed breakdown of the domain
        #[arg(long, requires = "domain")]
        details: bool,

        /// List models rated above the rubric threshold in each domain
        #[arg(long, conflicts_with = "domain")]
        high: bool,
    },
    /// Share of listed technologies each model can represent
    Coverage {
        /// Show the predefined share instead of the possible share
        #[arg(long)]
        predefined: bool,
    },
    /// Count the models that set each column
    Totals {
        /// Columns to count
        columns: Vec<String>,

        /// First column of a range, in file order
        #[arg(long, requires = "to", conflicts_with = "columns")]
        from: Option<String>,

        /// Last column of a range, inclusive
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// List models whose answer in a column matches
    Find {
        /// Survey column to look at
        column: String,

        /// Match free text containing this (case-insensitive) instead of a set flag
        #[arg(long)]
        contains: Option<String>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "flexrate")]
#[command(about = "Rate flexibility representation in energy models from survey answers", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/flexrate/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Semicolon-separated survey table (overrides `survey:` in the config)
    #[arg(short, long, global = true)]
    survey: Option<String>,

    /// Comma-separated models to rate (defaults to every surveyed model)
    #[arg(short, long, global = true, value_delimiter = ',')]
    models: Option<Vec<String>>,

    /// Tab-separated output for scripting
    #[arg(long, global = true, conflicts_with = "json")]
    tsv: bool,

    /// JSON output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Format {
    Text,
    Tsv,
    Json,
}

struct RunContext<'a> {
    rubric: &'a Rubric,
    table: &'a SurveyTable,
    models: &'a [String],
    format: Format,
    use_colors: bool,
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Rate {
        domain: None,
        details: false,
        high: false,
    });
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match flexrate::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate rubric at startup
    let rubric = config.effective_rubric();
    if let Err(errors) = scoring::validate_rubric(&rubric) {
        eprintln!("Rubric errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if cli.verbose {
        eprintln!(
            "Rubric: {} domains, {} technology groups, {} catalog overrides",
            rubric.domains.len(),
            rubric.technologies.len(),
            rubric.catalog.len()
        );
    }

    let Some(survey_path) = cli.survey.map(PathBuf::from).or(config.survey) else {
        eprintln!("No survey table given.");
        eprintln!("Pass --survey <file> or add it to ~/.config/flexrate/config.yaml:");
        eprintln!("  survey: data/Evaluation_Table.csv");
        std::process::exit(EXIT_CONFIG);
    };

    let table = match survey::load_survey(&survey_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Survey error: {}", e);
            std::process::exit(EXIT_SURVEY);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} models x {} columns from {} in {:?}",
            table.len(),
            table.columns().len(),
            survey_path.display(),
            start_time.elapsed()
        );
    }

    let models = cli
        .models
        .or(config.models)
        .unwrap_or_else(|| table.models().to_vec());

    let format = if cli.json {
        Format::Json
    } else if cli.tsv {
        Format::Tsv
    } else {
        Format::Text
    };

    let ctx = RunContext {
        rubric: &rubric,
        table: &table,
        models: &models,
        format,
        use_colors: format == Format::Text && output::should_use_colors(),
        verbose: cli.verbose,
    };

    // Hold diagnostics back until the table is printed
    stderr_buffer::activate();

    let result = match command {
        Commands::Rate {
            domain,
            details,
            high,
        } => run_rate(&ctx, domain.as_deref(), details, high),
        Commands::Coverage { predefined } => run_coverage(&ctx, predefined),
        Commands::Totals { columns, from, to } => run_totals(&ctx, columns, from, to),
        Commands::Find { column, contains } => run_find(&ctx, &column, contains),
    };

    stderr_buffer::flush();

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(EXIT_SCORING);
    }

    if cli.verbose {
        eprintln!();
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Copy of `table` with the ratings as first column, rows limited to `ranking`.
fn with_rating(table: &ScoreTable, ranking: &[Ranked]) -> ScoreTable {
    let mut columns = vec![OVERALL_RATING.to_string()];
    columns.extend(table.columns().iter().cloned());
    let mut out = ScoreTable::new(columns);
    for ranked in ranking {
        out.insert(&ranked.model, OVERALL_RATING, ranked.rating);
        for column in table.columns() {
            if let Some(value) = table.get(&ranked.model, column) {
                out.insert(&ranked.model, column, value);
            }
        }
    }
    out
}

fn order_of(ranking: &[Ranked]) -> Vec<String> {
    ranking.iter().map(|r| r.model.clone()).collect()
}

fn print_table(ctx: &RunContext<'_>, table: &ScoreTable, order: &[String]) {
    match ctx.format {
        Format::Tsv => println!("{}", output::format_tsv(table, order)),
        _ => println!("{}", output::format_score_table(table, order, ctx.use_colors)),
    }
}

fn run_rate(ctx: &RunContext<'_>, domain: Option<&str>, details: bool, high: bool) -> Result<()> {
    let start = Instant::now();
    let catalog = ctx.rubric.catalog();
    let report = report::build_report(ctx.rubric, &catalog, ctx.table, ctx.models)
        .context("Scoring failed")?;

    if ctx.verbose {
        eprintln!(
            "Scored {} models in {} domains in {:?}",
            ctx.models.len(),
            report.domains.len(),
            start.elapsed()
        );
    }
    for diagnostic in &report.diagnostics {
        buffered_eprintln!("{}", output::format_diagnostic(diagnostic, ctx.use_colors));
    }

    if let Some(name) = domain {
        let Some(domain) = report.domain(name) else {
            let known: Vec<&str> = report.domains.iter().map(|d| d.name.as_str()).collect();
            bail!("Unknown domain '{}'. Available: {}", name, known.join(", "));
        };
        let ranking = domain.ranking();
        if ctx.format == Format::Json {
            let value = if details {
                json!({ "domain": domain, "ranking": ranking })
            } else {
                json!({ "name": domain.name, "overview": domain.overview, "ranking": ranking })
            };
            println!("{}", output::format_json(&value)?);
            return Ok(());
        }

        let order = order_of(&ranking);
        print_table(ctx, &with_rating(&domain.overview, &ranking), &order);
        if details && !domain.details.is_empty() {
            println!();
            print_table(ctx, &domain.details, &order);
        }
        return Ok(());
    }

    let ranking = report.holistic_ranking();
    let threshold = ctx.rubric.threshold();
    let high_representation = report.high_representation(threshold);

    if ctx.format == Format::Json {
        let mut value = json!({
            "ratings": report.holistic(),
            "ranking": ranking,
        });
        if high {
            value["threshold"] = json!(threshold);
            value["high_representation"] = json!(high_representation);
        }
        println!("{}", output::format_json(&value)?);
        return Ok(());
    }

    print_table(ctx, &with_rating(&report.holistic(), &ranking), &order_of(&ranking));

    if high {
        for (name, models) in &high_representation {
            println!();
            match ctx.format {
                Format::Tsv => println!("{}", output::format_ranking_tsv(models)),
                _ => {
                    println!("{} above {}:", name, output::format_score(threshold));
                    println!("{}", output::format_ranking(models, ctx.use_colors));
                }
            }
        }
    }
    Ok(())
}

fn run_coverage(ctx: &RunContext<'_>, predefined: bool) -> Result<()> {
    let coverage = scoring::coverage(ctx.table, &ctx.rubric.technologies)
        .context("Coverage check failed")?;

    if ctx.format == Format::Json {
        println!("{}", output::format_json(&coverage)?);
        return Ok(());
    }

    let table = if predefined {
        &coverage.predefined
    } else {
        &coverage.possible
    };
    let ranking = report::rank(
        ctx.models
            .iter()
            .filter_map(|m| table.mean(m).map(|r| (m.clone(), r))),
    );
    if ctx.format == Format::Text {
        let label = if predefined { "predefined" } else { "possible" };
        println!("Technology representation ({})", label);
    }
    print_table(ctx, &with_rating(table, &ranking), &order_of(&ranking));
    Ok(())
}

fn run_totals(
    ctx: &RunContext<'_>,
    columns: Vec<String>,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    let columns = match (from, to) {
        (Some(first), Some(last)) => survey::column_span(ctx.table, &first, &last)
            .with_context(|| format!("No column range from '{}' to '{}'", first, last))?,
        _ => columns,
    };
    if columns.is_empty() {
        bail!("No columns given. List columns or use --from/--to");
    }
    if let Some(missing) = columns.iter().find(|c| !ctx.table.has_column(c)) {
        bail!("Column '{}' is not in the survey table", missing);
    }

    let totals = survey::column_totals(ctx.table, &columns);
    match ctx.format {
        Format::Json => {
            let value: Vec<_> = totals
                .iter()
                .map(|(column, count)| json!({ "column": column, "models": count }))
                .collect();
            println!("{}", output::format_json(&value)?);
        }
        Format::Tsv => {
            for (column, count) in &totals {
                println!("{}\t{}", column, count);
            }
        }
        Format::Text => {
            println!(
                "{}",
                output::format_totals(&totals, ctx.table.len(), ctx.use_colors)
            );
        }
    }
    Ok(())
}

fn run_find(ctx: &RunContext<'_>, column: &str, contains: Option<String>) -> Result<()> {
    if !ctx.table.has_column(column) {
        bail!("Column '{}' is not in the survey table", column);
    }
    let matcher = contains.map(Matcher::Contains).unwrap_or(Matcher::Set);
    let found: Vec<String> = survey::find_models(ctx.table, column, &matcher)
        .into_iter()
        .filter(|m| ctx.models.contains(m))
        .collect();

    match ctx.format {
        Format::Json => println!("{}", output::format_json(&found)?),
        _ if found.is_empty() && ctx.format == Format::Text => println!("No models match."),
        _ => {
            for model in &found {
                println!("{}", model);
            }
        }
    }
    Ok(())
}
