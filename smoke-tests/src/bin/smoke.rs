use clap::Parser;
use smoke_tests::{SmokeConfig, SmokeRunner};

#[derive(Parser, Debug)]
#[command(name = "smoke", version, about = "Smoke-test a deployed web gateway")]
struct Args {
    /// Web gateway base URL.
    #[arg(env = "WEB_SERVICE_URL")]
    url: String,
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect::<String>().replace('\n', " ")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = SmokeConfig::new(&args.url);
    if config.base_url.is_empty() {
        eprintln!("Usage: WEB_SERVICE_URL=https://<url> smoke");
        std::process::exit(1);
    }

    println!("\nSmoke test: {}\n", config.base_url);

    let result = match SmokeRunner::new(config) {
        Ok(runner) => runner.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            println!("Reply: \"{}\"", preview(&report.reply));
            println!("\nAll {} smoke tests passed.\n", report.passed);
        }
        Err(e) => {
            eprintln!("\nSmoke test FAILED: {}\n", e);
            std::process::exit(1);
        }
    }
}
