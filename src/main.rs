//! Mixmax - Command Line Interface
//!
//! This is the main entry point for the reverse recipe search.
//! Run with `--help` to see all available options.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use tracing::Level;

use mixmax::{
    data::{embedded_ruleset, load_all_data},
    display::{display_effects, display_results},
    models::{step_bound, Objective, SearchRequest},
    optimizer::search,
};

/// Command-line arguments for Mixmax.
#[derive(Parser, Debug)]
#[command(name = "mixmax")]
#[command(author, version, about = "Find Schedule I mixing recipes for a set of effects", long_about = None)]
struct Args {
    /// Effects the mix must have (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    effects: Vec<String>,

    /// What to optimize for (cost or profit)
    #[arg(short, long, default_value = "cost")]
    objective: Objective,

    /// Maximum number of ingredients to mix
    #[arg(short, long, default_value = "4", allow_negative_numbers = true)]
    max_steps: i64,

    /// Minimum number of ingredients to mix
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    min_steps: i64,

    /// Base product to mix into (e.g. "OG Kush")
    #[arg(short, long)]
    product: Option<String>,

    /// Only use these ingredients (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    ingredients: Option<Vec<String>>,

    /// Show the closest recipes when none has every effect
    #[arg(long, default_value = "false")]
    allow_partial: bool,

    /// Number of ranked recipes to show
    #[arg(short, long, default_value = "5")]
    top: usize,

    /// Directory with rule data (uses the built-in 0.3.4f4 tables if unset)
    #[arg(long, env = "MIXMAX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// List all effects and exit
    #[arg(long, default_value = "false")]
    list_effects: bool,

    /// Log search progress
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.quiet {
        Level::ERROR
    } else if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ruleset = match args.data_dir {
        Some(ref dir) => {
            if !dir.exists() {
                eprintln!("Error: data directory '{}' not found.", dir.display());
                std::process::exit(1);
            }
            load_all_data(dir)?
        }
        None => embedded_ruleset()?,
    };

    if args.list_effects {
        display_effects(&ruleset);
        return Ok(());
    }

    let effects: Vec<String> = args
        .effects
        .iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect();

    let mut request = SearchRequest::new(effects, args.objective, step_bound(args.max_steps)?)
        .with_min_steps(step_bound(args.min_steps)?)
        .with_partial_matches(args.allow_partial);
    if let Some(product) = args.product.clone() {
        request = request.with_product(product);
    }
    if let Some(allowed) = args.ingredients.clone() {
        request = request.with_allowed_ingredients(allowed);
    }

    println!("Mixmax - Schedule I Reverse Recipe Search");
    println!("================================================================");
    println!();
    println!("Configuration:");
    println!("  Ruleset:         {}", ruleset.version());
    println!("  Target Effects:  {}", request.target);
    println!("  Objective:       {}", request.objective);
    println!("  Steps:           {} to {}", request.min_steps, request.max_steps);
    println!(
        "  Base Product:    {}",
        request.product.as_deref().unwrap_or("(best for each recipe)")
    );
    if let Some(ref allowed) = request.allowed_ingredients {
        println!("  Ingredients:     {}", allowed.join(", "));
    }

    let ranking = search(&ruleset, &request)?;
    display_results(&ranking, &ruleset, &request, args.top);

    Ok(())
}
