//! sentdb CLI - Sentence Database Builder
//!
//! Creates a sentence database for classifying licenses from a list of
//! training documents and a sentence boundary model.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use sentdb::{
    read_file_list, BoundaryClassifier, Config, DatabasePipeline, MaxentModel,
    PunctuationClassifier, Result, SentenceDbError,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sentdb")]
#[command(version)]
#[command(about = "Creates a sentence model for classifying licenses", long_about = None)]
struct Cli {
    /// Read the paths of the training files from a file (one per line)
    #[arg(short = 'f', long = "files")]
    files: PathBuf,

    /// Path to the MaxEnt sentence ending model
    #[arg(short = 'm', long = "model", required_unless_present = "rules")]
    model: Option<PathBuf>,

    /// Save the sentence database at the specified path
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Use punctuation rules instead of a model to find sentence ends
    #[arg(long, conflicts_with = "model")]
    rules: bool,

    /// Tokens of left context given to the boundary model
    #[arg(long, default_value = "3")]
    left_window: usize,

    /// Tokens of right context given to the boundary model
    #[arg(long, default_value = "3")]
    right_window: usize,

    /// Worker threads (1 = sequential, 0 = all cores)
    #[arg(short = 'j', long, default_value = "1")]
    jobs: usize,

    /// Disable suffix stripping of tokens
    #[arg(long)]
    no_stem: bool,

    /// Build the database without writing it
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    // Configuration errors are reported with usage, before any document is read
    let setup = match prepare(&cli) {
        Ok(setup) => setup,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    if let Err(e) = run(&cli, setup) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Everything a build needs, checked up front.
struct Setup {
    config: Config,
    paths: Vec<PathBuf>,
    classifier: Box<dyn BoundaryClassifier + Send + Sync>,
}

fn prepare(cli: &Cli) -> Result<Setup> {
    let mut config = Config::default();
    config.classifier.left_window = cli.left_window;
    config.classifier.right_window = cli.right_window;
    config.storage.jobs = cli.jobs;
    config.text.stem = !cli.no_stem;
    config.validate()?;

    let paths = read_file_list(&cli.files)?;
    let classifier = load_classifier(cli)?;

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(SentenceDbError::Config(format!(
                "output directory {} does not exist",
                parent.display()
            )));
        }
    }

    Ok(Setup {
        config,
        paths,
        classifier,
    })
}

fn run(cli: &Cli, setup: Setup) -> Result<()> {
    let Setup {
        config,
        paths,
        classifier,
    } = setup;

    println!("sentdb Sentence Database Builder");
    println!("   Training files: {} ({} documents)", cli.files.display(), format_number(paths.len()));
    println!();

    let bar_style = ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
        .map_err(|e| SentenceDbError::Config(e.to_string()))?
        .progress_chars("█▓▒░  ");

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(bar_style);
    pb.set_message("Segmenting documents...");

    let pipeline = DatabasePipeline::new(config, classifier);
    let (database, report) = pipeline.build_with_progress(&paths, |_| pb.inc(1))?;

    pb.finish_and_clear();
    println!(
        "✓ Segmented {} documents into {} sentences",
        format_number(report.documents),
        format_number(report.sentences)
    );

    if !report.skipped.is_empty() {
        println!("✗ Skipped {} documents:", format_number(report.skipped.len()));
        for skipped in &report.skipped {
            println!("   {}: {}", skipped.path.display(), skipped.reason);
        }
    }

    if cli.dry_run {
        println!("✓ Dry run, nothing written");
    } else {
        database.save(&cli.output)?;
        println!("✓ Saved sentence database to {}", cli.output.display());
    }

    println!();
    println!("Build complete in {}", HumanDuration(report.elapsed));

    Ok(())
}

fn load_classifier(cli: &Cli) -> Result<Box<dyn BoundaryClassifier + Send + Sync>> {
    if cli.rules {
        return Ok(Box::new(PunctuationClassifier::new()));
    }

    let path = cli.model.as_ref().ok_or_else(|| {
        SentenceDbError::Config("a boundary model (-m) or --rules is required".to_string())
    })?;
    let model = MaxentModel::load(path)?;
    Ok(Box::new(model))
}

/// Format large numbers with commas for readability
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
