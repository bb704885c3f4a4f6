use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use exam_parser::{
    default_output_path, extract_exam, load_folder, read_exam, summary_text, write_exam,
    ExtractConfig, SanitizeMode,
};

#[derive(Parser)]
#[command(name = "exam_parser", about = "Extract exam questions from saved discussion HTML pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a folder of .html/.htm pages into an exam JSON file
    Parse {
        /// Folder containing the saved pages and their images
        input: PathBuf,
        /// Output file (default: exams/<folder name>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Exam title
        #[arg(short, long)]
        title: Option<String>,
        /// JSON config with selectors and options
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Keep image paths instead of embedding base64 payloads
        #[arg(long)]
        no_embed: bool,
        /// Keep non-ASCII characters in extracted text
        #[arg(long)]
        keep_unicode: bool,
    },
    /// Print a summary of an exam JSON file
    Inspect {
        /// Exam JSON file
        path: PathBuf,
        /// Max questions to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            output,
            title,
            config,
            no_embed,
            keep_unicode,
        } => {
            let mut cfg = match config {
                Some(path) => ExtractConfig::from_json_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => ExtractConfig::default(),
            };
            if let Some(title) = title {
                cfg.title = title;
            }
            if no_embed {
                cfg.embed_images = false;
            }
            if keep_unicode {
                cfg.sanitize_mode = SanitizeMode::Unicode;
            }

            let sources = load_folder(&input)
                .with_context(|| format!("reading pages from {}", input.display()))?;
            if sources.is_empty() {
                println!("No .html or .htm files in {}.", input.display());
                return Ok(());
            }

            println!("Parsing {} pages...", sources.len());
            let exam = extract_exam(&sources, &cfg)?;

            let output = output.unwrap_or_else(|| default_output_path(&input));
            write_exam(&output, &exam)
                .with_context(|| format!("writing exam to {}", output.display()))?;

            let unscored = exam.cards.iter().filter(|c| !c.is_scoreable()).count();
            println!(
                "Saved {} questions to {} ({} without a detectable answer) in {:.1}s",
                exam.cards.len(),
                output.display(),
                unscored,
                t0.elapsed().as_secs_f64()
            );
            Ok(())
        }
        Commands::Inspect { path, limit } => {
            let exam = read_exam(&path).with_context(|| format!("reading {}", path.display()))?;
            println!("{} ({} questions)", exam.title, exam.cards.len());

            for card in exam.cards.iter().take(limit) {
                println!("\n#{} {}", card.question_number, truncate(&summary_text(&card.question_parts), 100));
                for (letter, answer) in card.lettered_answers() {
                    let mark = if card.correct_answers.contains(&letter) { "*" } else { " " };
                    println!("  {mark} {letter}. {}", truncate(&summary_text(&answer.fragments), 80));
                }
            }

            if exam.cards.len() > limit {
                println!("\n... {} more", exam.cards.len() - limit);
            }
            Ok(())
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
