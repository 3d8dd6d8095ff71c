use clap::Parser;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use smartpantry_api::gifts::{BudgetConstraint, Bundle, BundleGenerator};

#[derive(Parser)]
#[command(name = "giftgen")]
#[command(about = "Suggest gift bundles for a prompt without running the server")]
#[command(version)]
struct Cli {
    /// Free-text description, e.g. "birthday gift for my sister"
    prompt: String,

    #[arg(
        long,
        conflicts_with_all = ["min", "max"],
        help = "Single upper bound; bundles are trimmed to fit"
    )]
    budget: Option<String>,

    #[arg(long, requires = "max", help = "Lower bound of a budget range")]
    min: Option<String>,

    #[arg(long, requires = "min", help = "Upper bound of a budget range")]
    max: Option<String>,

    #[arg(long, help = "Seed the random sampler for repeatable output")]
    seed: Option<u64>,

    #[arg(long, help = "Output in human-readable text format")]
    text: bool,
}

impl Cli {
    fn budget(&self) -> Option<BudgetConstraint> {
        let raw = match (&self.budget, &self.min, &self.max) {
            (Some(budget), _, _) => Value::String(budget.clone()),
            (None, Some(min), Some(max)) => json!({ "min": min, "max": max }),
            _ => return None,
        };
        let budget = BudgetConstraint::from_json(&raw);
        if budget.is_none() {
            tracing::warn!("Ignoring unusable budget {}", raw);
        }
        budget
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let prompt = cli.prompt.trim();
    if prompt.is_empty() {
        anyhow::bail!("Prompt is required");
    }

    let generator = match cli.seed {
        Some(seed) => BundleGenerator::seeded(seed),
        None => BundleGenerator::with_thread_rng(),
    };
    let bundles = generator.generate(prompt, cli.budget().as_ref());

    if cli.text {
        print_text(&bundles);
    } else {
        println!("{}", serde_json::to_string_pretty(&json!({ "bundles": bundles }))?);
    }
    Ok(())
}

fn print_text(bundles: &[Bundle]) {
    for bundle in bundles {
        println!("{} (${})", bundle.title(), bundle.total_price());
        for item in bundle.items() {
            println!("  - {} ${}", item.name, item.price);
        }
    }
}
