use anyhow::Context;
use api_shared::AnalyzeSymptomsReq;
use clap::{Args, Parser, Subcommand};
use gemini_client::{GeminiClient, GeminiConfig};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use symptom_core::{build_prompt, normalize_response, validate_request, SymptomAnalysisService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;

#[derive(Parser)]
#[command(name = "symptom")]
#[command(about = "Healthcare symptom checker CLI (educational use only)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the prompt that would be sent to the model
    Prompt {
        #[command(flatten)]
        patient: PatientArgs,
    },
    /// Normalize a saved model reply and print the record with its tier
    Normalize {
        /// File holding the raw reply, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,
    },
    /// Analyze symptoms with Gemini and print the result
    Analyze {
        #[command(flatten)]
        patient: PatientArgs,
        /// Print a readable report instead of JSON
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args, Debug, Clone)]
struct PatientArgs {
    /// Patient name (optional)
    #[arg(long)]
    name: Option<String>,
    /// Age in years (1-120)
    #[arg(long)]
    age: i64,
    /// male, female or other
    #[arg(long)]
    gender: String,
    /// Description of the symptoms
    #[arg(long)]
    symptoms: String,
    /// How long the symptoms have lasted
    #[arg(long)]
    duration: String,
    /// mild, moderate or severe
    #[arg(long)]
    severity: String,
    /// Medical history item; repeat or comma-separate
    #[arg(long = "history", value_delimiter = ',')]
    medical_history: Vec<String>,
}

impl PatientArgs {
    fn to_request(&self) -> AnalyzeSymptomsReq {
        AnalyzeSymptomsReq {
            name: self.name.clone(),
            age: Some(self.age.into()),
            gender: Some(self.gender.clone()),
            symptoms: Some(self.symptoms.clone()),
            duration: Some(self.duration.clone()),
            severity: Some(self.severity.clone()),
            medical_history: Some(self.medical_history.clone()),
        }
    }
}

/// Read a reply from `source`, where `-` means stdin.
fn read_input(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("failed to read {source}"))
    }
}

fn normalized_output(raw: &str) -> serde_json::Value {
    let normalized = normalize_response(raw);
    tracing::info!(tier = %normalized.tier, chars = raw.len(), "reply normalized");
    serde_json::json!({
        "tier": normalized.tier.as_str(),
        "analysis": normalized.record.into_value(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("symptom_core=warn".parse()?)
                .add_directive("symptom_cli=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Prompt { patient } => {
            let input = validate_request(&patient.to_request())?;
            let prompt = build_prompt(&input);
            tracing::debug!(chars = prompt.len(), "prompt built");
            print!("{prompt}");
        }
        Commands::Normalize { input } => {
            let raw = read_input(&input)?;
            println!("{}", serde_json::to_string_pretty(&normalized_output(&raw))?);
        }
        Commands::Analyze { patient, pretty } => {
            let input = validate_request(&patient.to_request())?;
            let client = GeminiClient::new(GeminiConfig::from_env()?)?;
            let service = SymptomAnalysisService::new(Arc::new(client));
            let envelope = service.analyze(input).await?;
            tracing::info!(tier = %envelope.tier, "analysis finished");

            if pretty {
                print!("{}", report::render(&envelope));
            } else {
                println!("{}", serde_json::to_string_pretty(&envelope.to_wire())?);
            }
        }
    }

    Ok(())
}
