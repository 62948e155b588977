//! One-shot prompt against the Anthropic API using the relay's configuration.

use clap::Parser;
use relay_service::config::AnthropicConfig;
use relay_service::services::providers::anthropic::AnthropicProvider;
use relay_service::services::{complete, CompletionProvider};
use service_core::config::process_env;
use service_core::prompt::Prompt;

const DEFAULT_PROMPT: &str = "Explain what an API is in simple terms.";

#[derive(Parser, Debug)]
#[command(name = "relay-ask", version, about = "Send one prompt to Claude and print the reply")]
struct Args {
    /// Prompt text; words are joined with spaces.
    #[arg(trailing_var_arg = true)]
    prompt: Vec<String>,
}

async fn ask(prompt: &str) -> anyhow::Result<String> {
    let config = AnthropicConfig::from_lookup(&process_env)?;
    let provider = AnthropicProvider::new(&config)?;
    let prompt = Prompt::parse(prompt)?;
    Ok(complete(&provider as &dyn CompletionProvider, &prompt).await?)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let prompt = if args.prompt.is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        args.prompt.join(" ")
    };

    match ask(&prompt).await {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}
