use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use models::{PayloadFleetInputs, Settings, SingleClassInputs};
use param_sync::{Location, ParamSync, seed_defaults};
use savings_engine::{ResultsDocument, SavingsModel, render_table, write_results_json};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "savings-calc", about = "Project robot fleet energy and cost savings.")]
struct Args {
    /// Path to settings.json; defaults to ./settings.json when present
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fleet counted by payload class (sr, mr, lr, xr, ec, h, lt)
    Payload(RunArgs),
    /// Fleet of identical robots (ec, avg, r, h, oz)
    Single(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Page URL whose query seeds the form, e.g. "https://host/calc?sr=40&ec=0,2"
    #[arg(short, long, default_value = "http://localhost/")]
    url: String,

    /// Field edit applied after loading the URL, e.g. --set h=6000 (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    edits: Vec<String>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Also write inputs and results to this JSON file
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("missing key in '{}'", raw);
    }
    Ok((key, value))
}

fn run<F: SavingsModel + Serialize>(settings: &Settings, args: RunArgs) -> Result<()> {
    let (defaults, unknown) = seed_defaults::<F>(settings.defaults.for_model(F::MODEL));
    let model = F::MODEL;
    for key in unknown {
        tracing::warn!(%model, %key, "ignoring default override for unknown field");
    }

    let location =
        Location::parse(&args.url).with_context(|| format!("invalid --url '{}'", args.url))?;
    let mut sync = ParamSync::mount(defaults, location);

    for raw in &args.edits {
        let (key, value) = parse_assignment(raw)?;
        if !sync.edit(key, value) {
            bail!(
                "unknown field '{}' for {} (expected one of: {})",
                key,
                model,
                F::KEYS.join(", ")
            );
        }
    }

    let results = sync.form().calculate();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", render_table(&results, &settings.format));
    }

    if let Some(out) = &args.out {
        let document = ResultsDocument::new(sync.form(), &results, settings.settings_version);
        write_results_json(&document, out).context("write results json")?;
        eprintln!("Wrote {}", out.display());
    }

    if sync.sync() {
        eprintln!("URL: {}", sync.location());
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();
    let settings = match &args.settings {
        Some(path) => settings_loader::load_settings(path)?,
        None => settings_loader::load_settings_or_default(None),
    };

    match args.command {
        Command::Payload(run_args) => run::<PayloadFleetInputs>(&settings, run_args),
        Command::Single(run_args) => run::<SingleClassInputs>(&settings, run_args),
    }
}
