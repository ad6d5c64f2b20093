//! Folio CLI — portfolio analysis from the terminal, no TUI required.
//!
//! Commands:
//! - `analyze` — holdings vs current prices plus the rebalance plan
//! - `scorecard` — qualitative factor ratings per stock
//! - `news` — broker notes, optionally grouped into per-stock consensus
//! - `register` — create a backend account

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use folio_client::snapshot::{fetch_snapshot, news_with_fallback, scorecard_with_fallback};
use folio_client::{CachedClient, ClientConfig, Registration};
use folio_core::columns::{comparison_columns, format_inr, rebalance_columns};
use folio_core::news::{consensus, filter_news, Recommendation};
use folio_core::table::{render_table, RenderedTable};

#[derive(Parser)]
#[command(name = "folio", about = "Folio CLI — portfolio tracker client")]
struct Cli {
    /// Path to a config TOML (base_url, timeout_secs, cache_capacity).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the config file.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Account username.
    #[arg(long, global = true)]
    username: Option<String>,

    /// Account password.
    #[arg(long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a portfolio formed on one date against prices on another.
    Analyze {
        /// Portfolio formation date (YYYY-MM-DD).
        #[arg(long)]
        from: String,

        /// Valuation date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        to: Option<String>,

        /// Number of stocks in the portfolio.
        #[arg(long, default_value_t = 15)]
        num_stocks: u32,

        /// Capital to invest.
        #[arg(long, default_value_t = 500_000.0)]
        investment: f64,

        /// Also write the comparison table to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show the factor scorecard for a date.
    Scorecard {
        /// Date (YYYY-MM-DD). Defaults to today, falling back one day if unpublished.
        #[arg(long)]
        date: Option<String>,
    },
    /// Show broker news notes for a date.
    News {
        /// Date (YYYY-MM-DD). Defaults to today, falling back one day if unpublished.
        #[arg(long)]
        date: Option<String>,

        /// Group notes into a per-stock consensus table.
        #[arg(long, default_value_t = false)]
        consensus: bool,

        /// Filter notes by stock name (3+ characters).
        #[arg(long)]
        filter: Option<String>,
    },
    /// Create a new account.
    Register {
        /// Email address.
        #[arg(long)]
        email: String,

        /// Full display name.
        #[arg(long)]
        full_name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Analyze {
            from,
            to,
            num_stocks,
            investment,
            csv,
        } => {
            let from = parse_date(from)?;
            let to = parse_date_opt(to.as_deref())?;
            let client = signed_in_client(&cli)?;
            run_analyze(&client, from, to, *num_stocks, *investment, csv.as_deref())
        }
        Commands::Scorecard { date } => {
            let date = parse_date_opt(date.as_deref())?;
            let client = signed_in_client(&cli)?;
            run_scorecard(&client, date)
        }
        Commands::News {
            date,
            consensus,
            filter,
        } => {
            let date = parse_date_opt(date.as_deref())?;
            let client = signed_in_client(&cli)?;
            run_news(&client, date, *consensus, filter.as_deref())
        }
        Commands::Register { email, full_name } => run_register(&cli, email, full_name),
    }
}

fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = &cli.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    Ok(config)
}

/// Build a client and sign in with the provided credentials.
fn signed_in_client(cli: &Cli) -> Result<CachedClient> {
    let (Some(username), Some(password)) = (&cli.username, &cli.password) else {
        bail!("--username and --password are required for this command");
    };
    let config = build_config(cli)?;
    let mut client = CachedClient::new(&config);
    let profile = client
        .login(username, password)
        .context("sign-in failed")?;
    eprintln!("Signed in as {}", profile.username);
    Ok(client)
}

fn run_analyze(
    client: &CachedClient,
    from: NaiveDate,
    to: NaiveDate,
    num_stocks: u32,
    investment: f64,
    csv_path: Option<&std::path::Path>,
) -> Result<()> {
    let snapshot = fetch_snapshot(client, from, to, num_stocks, investment)?;
    let s = &snapshot.summary;

    println!();
    println!("=== Portfolio {from} -> {to} ===");
    println!("Invested:  {}", format_inr(s.initial_investment));
    println!("Now:       {}", format_inr(s.current_value));
    let pct = s
        .gains_pct
        .map(|p| format!(" ({:+.2}%)", p * 100.0))
        .unwrap_or_default();
    println!("Gains:     {}{pct}", format_inr(s.gains));
    println!(
        "Actions:   {} buy, {} sell, {} hold",
        s.buy_count, s.sell_count, s.hold_count
    );
    println!();

    let comparison = render_table(&comparison_columns(), &snapshot.comparison);
    print_table(&comparison);

    println!();
    println!(
        "Rebalance (capital incurred: {}):",
        format_inr(snapshot.plan.capital_incurred)
    );
    let plan = render_table(&rebalance_columns(), &snapshot.plan.stocks);
    print_table(&plan);

    if let Some(path) = csv_path {
        write_csv(path, &comparison)?;
        println!();
        println!("Comparison written to {}", path.display());
    }

    Ok(())
}

fn run_scorecard(client: &CachedClient, date: NaiveDate) -> Result<()> {
    let (served, entries) = scorecard_with_fallback(client, date)?;
    if served != date {
        eprintln!("Scorecard for {date} not published yet; showing {served}");
    }

    if entries.is_empty() {
        println!("No scorecard for {served}.");
        return Ok(());
    }

    let name_width = entries
        .iter()
        .map(|e| e.stock.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    println!();
    println!("=== Scorecard {served} ===");
    println!("{:>3}  {:<name_width$}  {:>6}  Factors", "#", "Stock", "Score");
    for (i, entry) in entries.iter().enumerate() {
        let factors: Vec<String> = entry
            .score_card
            .iter()
            .map(|(name, rating)| format!("{name}:{rating}"))
            .collect();
        println!(
            "{:>3}  {:<name_width$}  {:>6.1}  {}",
            i + 1,
            entry.stock,
            entry.composite_score,
            factors.join("  ")
        );
    }
    Ok(())
}

fn run_news(
    client: &CachedClient,
    date: NaiveDate,
    grouped: bool,
    filter: Option<&str>,
) -> Result<()> {
    let (served, notes) = news_with_fallback(client, date)?;
    if served != date {
        eprintln!("News for {date} not published yet; showing {served}");
    }

    if grouped {
        println!();
        println!("=== Broker consensus {served} ===");
        println!(
            "{:<24}  {:>5}  {:<12}  {:>10}  {:<10}",
            "Stock", "Notes", "Consensus", "Avg Target", "Latest"
        );
        for row in consensus(&notes) {
            let target = row
                .avg_target
                .map(|t| format!("{t:.2}"))
                .unwrap_or_else(|| "-".to_string());
            let latest = row
                .latest
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<24}  {:>5}  {:<12}  {target:>10}  {latest}",
                row.stock,
                row.note_count,
                row.consensus.label(),
            );
        }
        return Ok(());
    }

    let visible = filter_news(&notes, filter.unwrap_or(""));
    println!();
    println!("=== Broker news {served} ({} notes) ===", visible.len());
    for note in visible {
        let rec = Recommendation::parse(&note.recommendation);
        let target = note
            .target_price
            .map(|t| format!("  target {t:.2}"))
            .unwrap_or_default();
        println!(
            "{:<10}  {:<24}  {:<12}  {}{target}",
            note.published_date.get(..10).unwrap_or(&note.published_date),
            note.stock,
            rec.label(),
            note.broker,
        );
    }
    Ok(())
}

fn run_register(cli: &Cli, email: &str, full_name: &str) -> Result<()> {
    let (Some(username), Some(password)) = (&cli.username, &cli.password) else {
        bail!("--username and --password are required to register");
    };
    let config = build_config(cli)?;
    let client = CachedClient::new(&config);
    client.register(&Registration {
        username: username.clone(),
        email: email.to_string(),
        full_name: full_name.to_string(),
        password: password.clone(),
    })?;
    println!("Account '{username}' created. Sign in with --username/--password.");
    Ok(())
}

/// Print a rendered table with padded columns: serial and symbol columns
/// left-aligned, numeric columns right-aligned.
fn print_table(table: &RenderedTable) {
    let mut widths: Vec<usize> = table.header.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (c, cell) in row.iter().enumerate() {
            if c < widths.len() {
                widths[c] = widths[c].max(cell.text.chars().count());
            }
        }
    }

    let line = |texts: Vec<&str>| {
        let cols: Vec<String> = texts
            .iter()
            .enumerate()
            .map(|(c, text)| {
                let gap = " ".repeat(widths[c].saturating_sub(text.chars().count()));
                if c < 2 {
                    format!("{text}{gap}")
                } else {
                    format!("{gap}{text}")
                }
            })
            .collect();
        cols.join("  ")
    };

    println!("{}", line(table.header.iter().map(|h| h.as_str()).collect()));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in &table.rows {
        println!("{}", line(row.iter().map(|cell| cell.text.as_str()).collect()));
    }
}

fn write_csv(path: &std::path::Path, table: &RenderedTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("cannot write {}", path.display()))?;
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.text.as_str()))?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{text}', expected YYYY-MM-DD"))
}

fn parse_date_opt(text: Option<&str>) -> Result<NaiveDate> {
    match text {
        Some(t) => parse_date(t),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_parse_and_reject_garbage() {
        assert_eq!(
            parse_date("2024-03-08").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
        );
        assert!(parse_date("03/08/2024").is_err());
        assert!(parse_date_opt(None).is_ok());
    }

    #[test]
    fn cli_parses_analyze_flags() {
        let cli = Cli::parse_from([
            "folio",
            "--username",
            "alice",
            "--password",
            "secret",
            "analyze",
            "--from",
            "2024-01-01",
            "--to",
            "2024-03-08",
            "--num-stocks",
            "20",
        ]);
        match cli.command {
            Commands::Analyze {
                num_stocks, investment, ..
            } => {
                assert_eq!(num_stocks, 20);
                assert_eq!(investment, 500_000.0);
            }
            _ => panic!("expected analyze"),
        }
        assert_eq!(cli.username.as_deref(), Some("alice"));
    }

    #[test]
    fn cli_parses_news_consensus() {
        let cli = Cli::parse_from(["folio", "news", "--consensus", "--filter", "oil"]);
        match cli.command {
            Commands::News {
                consensus, filter, ..
            } => {
                assert!(consensus);
                assert_eq!(filter.as_deref(), Some("oil"));
            }
            _ => panic!("expected news"),
        }
    }
}
