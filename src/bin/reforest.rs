// src/bin/reforest.rs

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use reforest::manifest::Manifest;
use reforest::profile::get_profile;
use reforest::words::load_word_list;
use reforest::{Settings, render_program, synthesize_program};

#[derive(Parser)]
#[command(name = "reforest")]
#[command(about = "Generate random, well-typed Java programs")]
struct Cli {
    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Generation profile name, or path to a TOML profile
    #[arg(long, default_value = "default")]
    profile: String,

    /// Word list file, one word per line
    #[arg(long)]
    words: Option<PathBuf>,

    /// Write the program to this file instead of stdout (must not exist)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write a JSON manifest of the run to this file
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Probability that a class member is a field
    #[arg(long)]
    field_to_method_ratio: Option<f64>,

    /// Probability that a declared type is an array
    #[arg(long)]
    array_type_percentage: Option<f64>,

    /// Upper bound of generated identifier lengths
    #[arg(long)]
    approx_name_length: Option<usize>,

    /// Maximum number of classes
    #[arg(long)]
    max_types: Option<usize>,

    /// Maximum number of members per class
    #[arg(long)]
    max_type_members: Option<usize>,

    /// Maximum number of parameters per method
    #[arg(long)]
    max_parameters: Option<usize>,

    /// Maximum number of statements per block
    #[arg(long)]
    max_statements: Option<usize>,

    /// Do not add a `main` method
    #[arg(long)]
    no_entry_point: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the profile.
    fn apply(&self, settings: &mut Settings) {
        if let Some(v) = self.field_to_method_ratio {
            settings.field_to_method_ratio = v;
        }
        if let Some(v) = self.array_type_percentage {
            settings.array_type_percentage = v;
        }
        if let Some(v) = self.approx_name_length {
            settings.approximate_name_length = v;
        }
        if let Some(v) = self.max_types {
            settings.max_types = v;
        }
        if let Some(v) = self.max_type_members {
            settings.max_type_members = v;
        }
        if let Some(v) = self.max_parameters {
            settings.max_parameters = v;
        }
        if let Some(v) = self.max_statements {
            settings.max_statements_per_block = v;
        }
        if self.no_entry_point {
            settings.entry_point = false;
        }
    }
}

/// Install a stderr subscriber when `REFOREST_LOG` holds a filter.
///
/// Lines carry no timestamps. `REFOREST_LOG_STYLE=full` adds span open and
/// close events, which report span timings.
fn init_tracing() {
    let Ok(filter) = EnvFilter::try_from_env("REFOREST_LOG") else {
        return;
    };
    let span_events = match std::env::var("REFOREST_LOG_STYLE").as_deref() {
        Ok("full") => FmtSpan::NEW | FmtSpan::CLOSE,
        _ => FmtSpan::NONE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .without_time()
        .with_span_events(span_events)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("tracing initialized");
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    // Determine seed - use provided or generate from current time
    let seed = cli.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    if let Some(output) = &cli.output {
        if output.exists() {
            eprintln!("error: output file already exists: {}", output.display());
            return ExitCode::FAILURE;
        }
    }

    let mut settings = match get_profile(&cli.profile) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    cli.apply(&mut settings);

    if let Some(path) = &cli.words {
        match load_word_list(path) {
            Ok(words) => settings.words = words,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let program = match synthesize_program(&settings, &mut rng) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("error: invalid settings: {e}");
            return ExitCode::FAILURE;
        }
    };
    let source = render_program(&program);

    let written = match &cli.output {
        Some(path) => fs::write(path, &source),
        None => io::stdout().lock().write_all(source.as_bytes()),
    };
    if let Err(e) = written {
        eprintln!("error: failed to write program: {e}");
        return ExitCode::FAILURE;
    }

    if let Some(path) = &cli.manifest {
        let manifest = Manifest::new(seed, cli.profile.clone(), settings, &program);
        if let Err(e) = manifest.write_to(path) {
            eprintln!("error: failed to write manifest: {e}");
            return ExitCode::FAILURE;
        }
    }

    eprintln!(
        "reforest: seed {seed}, profile {}, {} classes, {} methods",
        cli.profile,
        program.class_count(),
        program.method_count()
    );

    ExitCode::SUCCESS
}
