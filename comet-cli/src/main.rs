use anyhow::{Context, Result};
use clap::Parser;
use comet_core::{
    CanonicalHasher, DifficultyTier, EventBuilder, Miner, MinerOutcome, SubjectRef, Thread,
    declared_target, format_difficulty, leading_zero_bits, mine, miner::DEFAULT_BATCH,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::info;

mod input;
mod render;

use input::EventReader;

#[derive(Parser, Debug)]
#[command(name = "comet")]
#[command(about = "Inspect Nostr comment threads and mine proof-of-work notes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show detailed progress information
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Mine a note until its id shows the target difficulty
    Mine {
        /// Note content
        #[arg(value_name = "CONTENT")]
        content: String,

        /// Author public key (64 hex characters)
        #[arg(short, long)]
        pubkey: String,

        /// Target difficulty in leading zero bits
        #[arg(short, long, default_value = "8")]
        difficulty: u32,

        /// Event kind for the mined note
        #[arg(short, long, default_value = "1")]
        kind: u32,

        /// Disable progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Resolve and print the comment thread for a root
    Thread {
        /// Input file path (.jsonl or .jsonl.gz) with the root and its comments
        #[arg(value_name = "INPUT")]
        input: String,

        /// Root to resolve: an event id from the dump, or an external URL
        #[arg(short, long)]
        root: String,
    },

    /// Score the proof of work of every event in a dump
    Inspect {
        /// Input file path (.jsonl or .jsonl.gz)
        #[arg(value_name = "INPUT")]
        input: String,

        /// Only show events at or above this difficulty
        #[arg(short, long, default_value = "0")]
        min_difficulty: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Mine {
            content,
            pubkey,
            difficulty,
            kind,
            no_progress,
        } => mine_note(&content, &pubkey, difficulty, kind, !no_progress).await,
        Commands::Thread { input, root } => print_thread(&input, &root),
        Commands::Inspect {
            input,
            min_difficulty,
        } => inspect_events(&input, min_difficulty),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::filter::LevelFilter;

    let filter = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn mine_note(
    content: &str,
    pubkey: &str,
    difficulty: u32,
    kind: u32,
    show_progress: bool,
) -> Result<()> {
    if pubkey.len() != 64 || !pubkey.chars().all(|c| c.is_ascii_hexdigit()) {
        anyhow::bail!("Pubkey must be 64 hex characters");
    }

    info!("Mining at {}", format_difficulty(difficulty));

    let draft = EventBuilder::new()
        .pubkey(pubkey)
        .created_at(chrono::Utc::now().timestamp())
        .kind(kind)
        .content(content)
        .build_unsigned();

    let progress = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Invalid progress template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let mut miner = Miner::new(draft, difficulty, CanonicalHasher);
    let search = mine(&mut miner, DEFAULT_BATCH, |snapshot| {
        if let Some(pb) = &progress {
            pb.set_message(format!(
                "{} attempts, best {}",
                snapshot.attempts,
                format_difficulty(snapshot.best_difficulty)
            ));
        }
    });

    // Ctrl-C abandons the search at a batch boundary
    let outcome = tokio::select! {
        outcome = search => outcome?,
        _ = tokio::signal::ctrl_c() => MinerOutcome::Aborted,
    };

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    match outcome {
        MinerOutcome::Found(solution) => {
            println!("\n⛏️  Mined in {} attempts:", solution.nonce + 1);
            println!("  Event id:   {}", solution.id);
            println!("  Difficulty: {}", format_difficulty(solution.difficulty));
            println!("  Nonce:      {}", solution.nonce);
            println!(
                "\n{}",
                serde_json::to_string_pretty(&solution.event)
                    .context("Failed to serialize mined event")?
            );
            Ok(())
        }
        MinerOutcome::Exhausted => {
            anyhow::bail!(
                "Attempt ceiling reached without a solution. Try a lower difficulty."
            )
        }
        MinerOutcome::Aborted => {
            anyhow::bail!("Mining aborted")
        }
    }
}

fn print_thread(input: &str, root_arg: &str) -> Result<()> {
    let mut reader = EventReader::open(input)?;
    let events = reader.read_all()?;
    info!("Loaded {} events from {}", events.len(), input);

    let root = if root_arg.contains("://") {
        SubjectRef::external(root_arg).context("Invalid root URL")?
    } else {
        let root_event = events
            .iter()
            .find(|event| event.id == root_arg)
            .with_context(|| format!("Root event {} not found in {}", root_arg, input))?;
        SubjectRef::from_event(root_event)
    };

    let thread = Thread::resolve(&root, &events);
    let rendered = render::render_thread(&thread);
    if !rendered.is_empty() {
        print!("{}", rendered);
    }

    println!("\n📊 Thread summary:");
    println!("  Comments:          {}", thread.comments().len());
    println!("  Top-level:         {}", thread.top_level().len());
    if reader.skipped_count() > 0 {
        println!("  ⏭️  Skipped lines:   {}", reader.skipped_count());
    }

    Ok(())
}

fn inspect_events(input: &str, min_difficulty: u32) -> Result<()> {
    let mut reader = EventReader::open(input)?;
    let events = reader.read_all()?;

    let mut scored: Vec<(u32, &comet_core::Event)> = events
        .iter()
        .map(|event| (leading_zero_bits(&event.id), event))
        .filter(|(difficulty, _)| *difficulty >= min_difficulty)
        .collect();
    scored.sort_by_key(|(difficulty, _)| std::cmp::Reverse(*difficulty));

    let mut with_pow = 0u64;
    for (difficulty, event) in &scored {
        let target = match declared_target(&event.tags) {
            Some(target) => format!(" (target {})", target),
            None => String::new(),
        };
        if *difficulty > 0 {
            with_pow += 1;
        }
        println!(
            "{}  {:<28} {}{}",
            render::short_hex(&event.id),
            format_difficulty(*difficulty),
            render::format_timestamp(event.created_at),
            target,
        );
    }

    let extreme = scored
        .iter()
        .filter(|(difficulty, _)| DifficultyTier::of(*difficulty) == DifficultyTier::Extreme)
        .count();

    println!("\n📊 PoW summary:");
    println!("  Events scored:     {}", scored.len());
    println!("  With any PoW:      {}", with_pow);
    println!("  Extreme (25+):     {}", extreme);
    if reader.skipped_count() > 0 {
        println!("  ⏭️  Skipped lines:   {}", reader.skipped_count());
    }

    Ok(())
}
