use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use pipeline::{
    ActorsWithMultipleCharactersReport, CharactersWithMultipleActorsReport, MoviesPerActorReport,
};
use serde::Serialize;
use server::{PipelineArgs, ReportOrchestrator};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Cast Reports - actor and character analytics over a movie catalogue
#[derive(Parser)]
#[command(name = "cast-reports")]
#[command(about = "Cast reports over a movie catalogue, backed by TMDB", long_about = None)]
struct Cli {
    #[command(flatten)]
    pipeline: PipelineArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Movies each tracked actor appears in
    MoviesPerActor {
        /// Print a coloured summary instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Actors who play more than one distinct character
    ActorsWithMultipleCharacters {
        /// Print a coloured summary instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Characters played by more than one distinct actor
    CharactersWithMultipleActors {
        /// Print a coloured summary instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Run a report repeatedly to compare cold and cached latency
    Benchmark {
        /// Report to run
        #[arg(long, value_enum, default_value_t = ReportKind::MoviesPerActor)]
        report: ReportKind,

        /// Number of runs (the first one is cold)
        #[arg(long, default_value = "5")]
        runs: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportKind {
    MoviesPerActor,
    ActorsWithMultipleCharacters,
    CharactersWithMultipleActors,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let orchestrator = cli
        .pipeline
        .build_orchestrator()
        .context("Failed to initialize report pipeline")?;
    let (movies, actors) = orchestrator.catalog().counts();
    eprintln!(
        "{} Loaded catalogue: {} movies, {} tracked actors",
        "✓".green(),
        movies,
        actors
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::MoviesPerActor { summary } => {
            let report = orchestrator
                .movies_per_actor()
                .await
                .context("moviesPerActor report failed")?;
            if summary {
                print_movies_per_actor(&report);
            } else {
                print_json(&report)?;
            }
        }
        Commands::ActorsWithMultipleCharacters { summary } => {
            let report = orchestrator
                .actors_with_multiple_characters()
                .await
                .context("actorsWithMultipleCharacters report failed")?;
            if summary {
                print_actors_with_multiple_characters(&report);
            } else {
                print_json(&report)?;
            }
        }
        Commands::CharactersWithMultipleActors { summary } => {
            let report = orchestrator
                .characters_with_multiple_actors()
                .await
                .context("charactersWithMultipleActors report failed")?;
            if summary {
                print_characters_with_multiple_actors(&report);
            } else {
                print_json(&report)?;
            }
        }
        Commands::Benchmark { report, runs } => {
            handle_benchmark(&orchestrator, report, runs).await?
        }
    }

    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: &ReportOrchestrator,
    report: ReportKind,
    runs: usize,
) -> Result<()> {
    let runs = runs.max(1);
    let mut timings: Vec<Duration> = Vec::with_capacity(runs);

    for _ in 0..runs {
        let start = Instant::now();
        match report {
            ReportKind::MoviesPerActor => {
                orchestrator.movies_per_actor().await?;
            }
            ReportKind::ActorsWithMultipleCharacters => {
                orchestrator.actors_with_multiple_characters().await?;
            }
            ReportKind::CharactersWithMultipleActors => {
                orchestrator.characters_with_multiple_actors().await?;
            }
        }
        timings.push(start.elapsed());
    }

    let cold = timings[0];
    let warm = &timings[1..];
    println!("{}", format!("Benchmark: {:?} x {}", report, runs).bold().blue());
    println!("Cold run: {:?}", cold);
    if !warm.is_empty() {
        let total: Duration = warm.iter().sum();
        let avg = total / warm.len() as u32;
        let best = warm.iter().min().copied().unwrap_or_default();
        println!("Cached runs: avg {:?}, best {:?}", avg, best);
    }
    println!("Cached entries: {}", orchestrator.cache().len());

    Ok(())
}

fn print_json<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

/// Count of distinct strings among `values`
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.collect::<HashSet<_>>().len()
}

fn print_movies_per_actor(report: &MoviesPerActorReport) {
    print!("{}", "Movies per actor:\n".bold().blue());
    for (actor, movies) in report {
        let count = format!("{} movies", movies.len());
        let count = if movies.is_empty() { count.red() } else { count.green() };
        println!("{} {} ({})", "•".cyan(), actor.bold(), count);
        for movie in movies {
            println!("    - {}", movie);
        }
    }
}

fn print_actors_with_multiple_characters(report: &ActorsWithMultipleCharactersReport) {
    print!("{}", "Actors with multiple characters:\n".bold().blue());
    if report.is_empty() {
        println!("  (none)");
    }
    for (actor, roles) in report {
        let characters = distinct(roles.iter().map(|r| r.character.as_str()));
        println!(
            "{} {} ({} characters)",
            "•".cyan(),
            actor.bold(),
            characters.to_string().green()
        );
        for role in roles {
            println!("    - {} as {}", role.movie, role.character.yellow());
        }
    }
}

fn print_characters_with_multiple_actors(report: &CharactersWithMultipleActorsReport) {
    print!("{}", "Characters with multiple actors:\n".bold().blue());
    if report.is_empty() {
        println!("  (none)");
    }
    for (character, credits) in report {
        let actors = distinct(credits.iter().map(|c| c.actor.as_str()));
        println!(
            "{} {} ({} actors)",
            "•".cyan(),
            character.bold(),
            actors.to_string().green()
        );
        for credit in credits {
            println!("    - {} by {}", credit.movie, credit.actor.yellow());
        }
    }
}
