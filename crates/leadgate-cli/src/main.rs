//! Leadgate - lead qualification CLI
//!
//! The `leadgate` command runs the qualification pipeline over a file of
//! leads using fixture-backed collaborators.
//!
//! ## Commands
//!
//! - `qualify`: Run the full pipeline for every lead in a file
//! - `score`: Offline scoring smoke check against neutral snapshots

mod fixtures;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};

use fixtures::{EnrichmentFixtures, FixtureGateway};
use leadgate_core::{
    init_tracing, score, ClassifierRuleSet, EnrichmentSnapshot, Lead, PipelineConfig,
    QualificationPipeline, RetryPolicy, RuleSet, RunRecord, StaticRegistry,
};

#[derive(Parser)]
#[command(name = "leadgate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lead qualification decision engine", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RuleSetArg {
    /// Free-signal pre-qualification
    Pre,
    /// Full paid-enrichment qualification
    Full,
    /// Full set blended with AI-derived tech signals
    Blended,
}

impl RuleSetArg {
    fn to_rule_set(self) -> RuleSet {
        match self {
            Self::Pre => RuleSet::pre_qualification(),
            Self::Full => RuleSet::full_qualification(),
            Self::Blended => RuleSet::blended(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Qualify a batch of leads end to end
    Qualify {
        /// Path to a JSON array of leads
        #[arg(short, long)]
        leads: PathBuf,

        /// Which scoring rule set to apply
        #[arg(long, value_enum, default_value = "full")]
        rule_set: RuleSetArg,

        /// Maximum concurrent pipeline runs
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Enrichment fixture file (provider payloads + registry records)
        #[arg(long)]
        enrichment: Option<PathBuf>,

        /// Write run records here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score leads offline against neutral snapshots
    Score {
        /// Path to a JSON array of leads
        #[arg(short, long)]
        leads: PathBuf,

        /// Which scoring rule set to apply
        #[arg(long, value_enum, default_value = "pre")]
        rule_set: RuleSetArg,
    },
}

fn load_leads(path: &PathBuf) -> Result<Vec<Lead>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading leads file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing leads file {}", path.display()))
}

fn write_records(records: &[RunRecord], output: Option<&PathBuf>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(records)?;
    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing records to {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Qualify {
            leads,
            rule_set,
            concurrency,
            enrichment,
            output,
        } => {
            let leads = load_leads(&leads)?;
            let fixtures = match &enrichment {
                Some(path) => EnrichmentFixtures::load(path)
                    .with_context(|| format!("loading fixtures from {}", path.display()))?,
                None => EnrichmentFixtures::default(),
            };

            let pipeline = Arc::new(QualificationPipeline::new(
                Arc::new(FixtureGateway::new(&fixtures)),
                Arc::new(StaticRegistry::new(fixtures.licenses.clone())),
                rule_set.to_rule_set(),
                ClassifierRuleSet::standard(),
                PipelineConfig {
                    provider_timeout: Duration::from_secs(10),
                    retry: RetryPolicy::default(),
                    max_concurrency: concurrency.max(1),
                },
            ));

            info!(count = leads.len(), "qualifying leads");
            let runs = pipeline.process_batch(leads).await;
            let records: Vec<RunRecord> = runs.iter().map(|r| r.to_record()).collect();
            write_records(&records, output.as_ref())?;
        }
        Commands::Score { leads, rule_set } => {
            let leads = load_leads(&leads)?;
            let rule_set = rule_set.to_rule_set();
            let snapshot = EnrichmentSnapshot::default();

            let summary: Vec<serde_json::Value> = leads
                .iter()
                .map(|lead| {
                    let result = score(lead, &snapshot, &rule_set);
                    serde_json::json!({
                        "lead_id": lead.id,
                        "business_name": lead.business_name,
                        "score": result.score,
                        "verdict": result.verdict,
                        "fit_score": result.fit_score,
                        "signals": result.signal_names(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use uuid::Uuid;

    #[test]
    fn test_load_leads_roundtrip() {
        let leads = vec![Lead {
            id: Uuid::new_v4(),
            business_name: "Testable Tiling".to_string(),
            city: "Reno".to_string(),
            state: "NV".to_string(),
            phone: None,
            website: None,
            rating: Some(4.0),
            review_count: Some(5),
        }];
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&leads).unwrap()).unwrap();

        let loaded = load_leads(&file.path().to_path_buf()).unwrap();
        assert_eq!(loaded, leads);
    }

    #[test]
    fn test_load_leads_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(load_leads(&file.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_rule_set_arg_mapping() {
        assert_eq!(RuleSetArg::Pre.to_rule_set().name, "pre_qualification");
        assert_eq!(RuleSetArg::Full.to_rule_set().name, "full_qualification");
        assert_eq!(RuleSetArg::Blended.to_rule_set().name, "blended");
    }
}
