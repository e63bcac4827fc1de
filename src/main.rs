use clap::{Parser, Subcommand};
use deck_analyzer::analysis::probability::{prob_at_least, prob_exactly, prob_none};
use deck_analyzer::analysis::scoring::rating;
use deck_analyzer::analysis::{Analysis, Analyzer, Report, Severity};
use deck_analyzer::card::CardDatabase;
use deck_analyzer::config::AnalyzerConfig;
use deck_analyzer::deck::{load_deck, Deck};
use deck_analyzer::rng::TriviaRng;
use deck_analyzer::trivia::fun_fact;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "deck-analyzer")]
#[command(about = "Trading card game deck evaluator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one deck and print its report as JSON
    Analyze {
        /// Deck file (.json, or a text list with --cards)
        #[arg(short, long)]
        deck: String,

        /// Card database used to resolve text deck lists
        #[arg(short, long)]
        cards: Option<String>,

        /// JSON file overriding analyzer thresholds
        #[arg(long)]
        config: Option<String>,

        /// Pretty-print the JSON report
        #[arg(short, long)]
        pretty: bool,

        /// Print a fun fact about the deck to stderr
        #[arg(long)]
        fun_fact: bool,

        /// Seed for the fun fact (for reproducibility)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Analyze many decks in parallel and print a summary table
    Batch {
        /// Deck files
        #[arg(required = true)]
        decks: Vec<String>,

        #[arg(short, long)]
        cards: Option<String>,

        #[arg(long)]
        config: Option<String>,

        /// Write a JSON summary to this file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Compare two decks side by side
    Compare {
        /// First deck file
        deck1: String,

        /// Second deck file
        deck2: String,

        #[arg(short, long)]
        cards: Option<String>,

        #[arg(long)]
        config: Option<String>,
    },

    /// Hypergeometric draw odds
    Odds {
        #[arg(long, default_value = "60")]
        deck_size: u32,

        /// Copies of the card(s) you want to draw
        #[arg(long)]
        successes: u32,

        /// Cards drawn
        #[arg(long, default_value = "7")]
        draws: u32,

        /// Minimum copies wanted
        #[arg(long, default_value = "1")]
        at_least: u32,
    },
}

/// One row of the batch summary file
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchEntry {
    file: String,
    deck_name: String,
    score: u8,
    rating: &'static str,
    warnings: usize,
    critical: usize,
    mulligan_rate: f64,
    aggregate_impact: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchSummary {
    generated_at: String,
    decks: Vec<BatchEntry>,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays machine-readable.
    // RUST_LOG overrides --verbose.
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Commands::Analyze {
            deck,
            cards,
            config,
            pretty,
            fun_fact,
            seed,
        } => {
            analyze_deck(&deck, cards.as_deref(), config.as_deref(), pretty, fun_fact, seed);
        }
        Commands::Batch {
            decks,
            cards,
            config,
            output,
        } => {
            run_batch(&decks, cards.as_deref(), config.as_deref(), output.as_deref());
        }
        Commands::Compare {
            deck1,
            deck2,
            cards,
            config,
        } => {
            compare_decks(&deck1, &deck2, cards.as_deref(), config.as_deref());
        }
        Commands::Odds {
            deck_size,
            successes,
            draws,
            at_least,
        } => {
            print_odds(deck_size, successes, draws, at_least);
        }
    }
}

fn load_database(path: Option<&str>) -> Option<CardDatabase> {
    let path = path?;
    match CardDatabase::from_file(path) {
        Ok(db) => {
            eprintln!("✓ Loaded {} cards from {}", db.card_count(), path);
            Some(db)
        }
        Err(e) => {
            eprintln!("✗ Failed to load cards: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(path: Option<&str>) -> AnalyzerConfig {
    let Some(path) = path else {
        return AnalyzerConfig::default();
    };
    match AnalyzerConfig::from_file(path) {
        Ok(config) => {
            debug!(path, "loaded analyzer config");
            config
        }
        Err(e) => {
            eprintln!("✗ Failed to load config '{}': {}", path, e);
            std::process::exit(1);
        }
    }
}

fn load_deck_or_exit(path: &str, db: Option<&CardDatabase>) -> Deck {
    match load_deck(path, db) {
        Ok(deck) => deck,
        Err(e) => {
            eprintln!("✗ Failed to parse deck file '{}': {}", path, e);
            std::process::exit(1);
        }
    }
}

fn report_diagnostics(analysis: &Analysis) {
    for diagnostic in &analysis.diagnostics {
        eprintln!("! check '{}' skipped: {}", diagnostic.check, diagnostic.message);
    }
}

fn analyze_deck(
    deck_file: &str,
    cards: Option<&str>,
    config: Option<&str>,
    pretty: bool,
    with_fact: bool,
    seed: Option<u64>,
) {
    let db = load_database(cards);
    let analyzer = Analyzer::new(load_config(config));
    let deck = load_deck_or_exit(deck_file, db.as_ref());

    let analysis = analyzer.analyze(&deck);
    report_diagnostics(&analysis);

    let json = if pretty {
        serde_json::to_string_pretty(&analysis.report)
    } else {
        serde_json::to_string(&analysis.report)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("✗ Failed to serialize report: {}", e);
            std::process::exit(1);
        }
    }

    eprintln!(
        "✓ {}: {}/100 ({})",
        analysis.report.deck_name,
        analysis.report.score,
        rating(analysis.report.score)
    );

    if with_fact {
        let mut rng = TriviaRng::new(seed);
        eprintln!("💡 {}", fun_fact(&deck, &analysis.report, &mut rng));
        if seed.is_none() {
            eprintln!("   (seed {})", rng.seed());
        }
    }
}

fn run_batch(files: &[String], cards: Option<&str>, config: Option<&str>, output: Option<&str>) {
    let db = load_database(cards);
    let analyzer = Analyzer::new(load_config(config));

    let mut loaded: Vec<(String, Deck)> = Vec::new();
    for file in files {
        match load_deck(file, db.as_ref()) {
            Ok(deck) => loaded.push((file.clone(), deck)),
            Err(e) => eprintln!("✗ Failed to parse deck file '{}': {}", file, e),
        }
    }
    if loaded.is_empty() {
        eprintln!("✗ No decks could be loaded");
        std::process::exit(1);
    }

    println!("\n=== Deck Analysis ===\n");
    println!("Decks: {}", loaded.len());

    let progress = ProgressBar::new(loaded.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let start = std::time::Instant::now();
    let reports: Vec<(String, Report)> = loaded
        .par_iter()
        .map(|(file, deck)| {
            let analysis = analyzer.analyze(deck);
            report_diagnostics(&analysis);
            progress.inc(1);
            (file.clone(), analysis.report)
        })
        .collect();
    progress.finish_and_clear();
    let elapsed = start.elapsed();

    println!(
        "\n{:30} {:>6} {:>4} {:>4} {:>4} {:>4} {:>10}",
        "Deck", "Score", "T1", "T2", "T3", "T4", "Mulligan"
    );
    println!("{:-<72}", "");
    for (_, report) in &reports {
        println!(
            "{:30} {:>6} {:>4} {:>4} {:>4} {:>4} {:>9.1}%",
            report.deck_name,
            report.score,
            report.tiers.tier1,
            report.tiers.tier2,
            report.tiers.tier3,
            report.tiers.tier4,
            report.probabilities.mulligan_rate * 100.0
        );
    }

    let average = reports.iter().map(|(_, r)| r.score as f64).sum::<f64>() / reports.len() as f64;
    println!("\nAverage score: {:.1}", average);
    println!("Completed in {:.2?}", elapsed);

    if let Some(path) = output {
        let summary = BatchSummary {
            generated_at: chrono::Utc::now().to_rfc3339(),
            decks: reports
                .iter()
                .map(|(file, report)| BatchEntry {
                    file: file.clone(),
                    deck_name: report.deck_name.clone(),
                    score: report.score,
                    rating: rating(report.score),
                    warnings: report.warnings.len(),
                    critical: report
                        .warnings
                        .iter()
                        .filter(|w| w.severity == Severity::Critical)
                        .count(),
                    mulligan_rate: report.probabilities.mulligan_rate,
                    aggregate_impact: report.aggregate_impact,
                })
                .collect(),
        };
        let written = serde_json::to_string_pretty(&summary)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("✓ Wrote summary to {}", path),
            Err(e) => {
                eprintln!("✗ Failed to write summary: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn compare_decks(deck1_file: &str, deck2_file: &str, cards: Option<&str>, config: Option<&str>) {
    let db = load_database(cards);
    let analyzer = Analyzer::new(load_config(config));
    let deck1 = load_deck_or_exit(deck1_file, db.as_ref());
    let deck2 = load_deck_or_exit(deck2_file, db.as_ref());

    let (a, b) = rayon::join(|| analyzer.analyze(&deck1), || analyzer.analyze(&deck2));
    let (r1, r2) = (&a.report, &b.report);

    let setup = |r: &Report| r.probabilities.setup_on(2).unwrap_or(0.0) * 100.0;

    println!("\n=== Results ===\n");
    println!("{:20} {:>14} {:>14}", "Metric", r1.deck_name, r2.deck_name);
    println!("{:-<50}", "");
    println!("{:20} {:>14} {:>14}", "Score", r1.score, r2.score);
    println!(
        "{:20} {:>13.1}% {:>13.1}%",
        "Mulligan rate",
        r1.probabilities.mulligan_rate * 100.0,
        r2.probabilities.mulligan_rate * 100.0
    );
    println!(
        "{:20} {:>13.1}% {:>13.1}%",
        "Dead draw rate",
        r1.probabilities.dead_draw_rate * 100.0,
        r2.probabilities.dead_draw_rate * 100.0
    );
    println!("{:20} {:>13.1}% {:>13.1}%", "Setup by turn 2", setup(r1), setup(r2));
    println!(
        "{:20} {:>14} {:>14}",
        "Warnings",
        r1.warnings.len(),
        r2.warnings.len()
    );
    println!(
        "{:20} {:>14.1} {:>14.1}",
        "Win-rate impact", r1.aggregate_impact, r2.aggregate_impact
    );
    println!(
        "{:20} {:>14} {:>14}",
        "Evolution lines",
        r1.evolution_lines.len(),
        r2.evolution_lines.len()
    );

    println!();
    if r1.score > r2.score {
        println!("✓ {} scores {} points higher", r1.deck_name, r1.score - r2.score);
    } else if r2.score > r1.score {
        println!("✓ {} scores {} points higher", r2.deck_name, r2.score - r1.score);
    } else {
        println!("Both decks have the same score");
    }
}

fn print_odds(deck_size: u32, successes: u32, draws: u32, at_least: u32) {
    println!("\n=== Draw Odds ===\n");
    println!("Deck: {} cards, {} copies, {} drawn", deck_size, successes, draws);
    println!("{:-<40}", "");
    println!("{:20} {:>9.2}%", "None", prob_none(deck_size, successes, draws) * 100.0);
    for k in 1..=draws.min(successes).min(4) {
        println!(
            "{:20} {:>9.2}%",
            format!("Exactly {}", k),
            prob_exactly(deck_size, successes, draws, k) * 100.0
        );
    }
    println!(
        "{:20} {:>9.2}%",
        format!("At least {}", at_least),
        prob_at_least(deck_size, successes, draws, at_least) * 100.0
    );
}
