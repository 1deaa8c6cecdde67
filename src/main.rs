use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use verifier_lib::analysis::service::{rank_runs, NewsAnalysisService};
use verifier_lib::extraction::ner_client::{EntityExtractor, NerClient, NerClientConfig};
use verifier_lib::extraction::rule_based::RuleBasedExtractor;
use verifier_lib::models::core::EntityGroups;
use verifier_lib::utils::config::AnalysisConfig;
use verifier_lib::utils::env::load_env;

#[derive(Parser)]
#[command(
    name = "verify",
    about = "Cross-check a news claim against candidate documents by comparing named entities"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare one claim against one candidate document
    Analyze {
        /// Path to the claim text ("-" reads stdin)
        #[arg(long)]
        input: PathBuf,
        /// Path to the comparison document
        #[arg(long)]
        comparison: PathBuf,
        /// Use the offline rule-based extractor instead of the NER service
        #[arg(long)]
        rule_based: bool,
        /// Skip reference-driven entity type normalization
        #[arg(long)]
        no_normalize: bool,
    },
    /// Compare one claim against many candidate documents
    Batch {
        /// Path to the claim text ("-" reads stdin)
        #[arg(long)]
        input: PathBuf,
        /// Candidate document paths
        #[arg(long, required = true, num_args = 1..)]
        candidates: Vec<PathBuf>,
        /// Use the offline rule-based extractor instead of the NER service
        #[arg(long)]
        rule_based: bool,
    },
    /// Extract entities from a text and print them grouped by type
    Extract {
        /// Path to the text ("-" reads stdin)
        #[arg(long)]
        input: PathBuf,
        /// Use the offline rule-based extractor instead of the NER service
        #[arg(long)]
        rule_based: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging and environment
    env_logger::init();
    load_env();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            input,
            comparison,
            rule_based,
            no_normalize,
        } => {
            let input_text = read_text(&input)?;
            let comparison_text = read_text(&comparison)?;

            let mut options = AnalysisConfig::from_env().options();
            if no_normalize {
                options.normalize_types = false;
            }
            let service = NewsAnalysisService::new(build_extractor(rule_based)?, options);

            let run = service.analyze_news(&input_text, &comparison_text).await?;
            println!("{}", serde_json::to_string_pretty(&run)?);
        }
        Commands::Batch {
            input,
            candidates,
            rule_based,
        } => {
            let input_text = read_text(&input)?;
            let candidate_texts: Vec<String> = candidates
                .iter()
                .map(|path| read_text(path))
                .collect::<Result<_>>()?;

            let options = AnalysisConfig::from_env().options();
            let service = NewsAnalysisService::new(build_extractor(rule_based)?, options);

            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap(),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb.set_message(format!(
                "Analyzing {} candidate documents...",
                candidate_texts.len()
            ));

            let runs = service
                .analyze_against_candidates(&input_text, &candidate_texts)
                .await?;
            pb.finish_with_message(format!("Analyzed {} candidate documents", runs.len()));

            let ranked = rank_runs(runs);
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        Commands::Extract { input, rule_based } => {
            let input_text = read_text(&input)?;
            let extractor = build_extractor(rule_based)?;

            let documents = extractor.extract(&[input_text]).await;
            let entities = documents
                .into_iter()
                .next()
                .map(|document| document.entities)
                .unwrap_or_default();
            info!("Extracted {} entities", entities.len());

            let groups = EntityGroups::from_entities(&entities);
            for entity_type in groups.types() {
                println!("{}: {}", entity_type, groups.forms_of(entity_type).join(", "));
            }
        }
    }

    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn build_extractor(rule_based: bool) -> Result<Arc<dyn EntityExtractor>> {
    if rule_based {
        info!("Using offline rule-based entity extraction");
        Ok(Arc::new(RuleBasedExtractor::from_env()))
    } else {
        let config = NerClientConfig::from_env();
        info!("Using NER service at {}", config.api_url);
        Ok(Arc::new(NerClient::new(config)?))
    }
}
