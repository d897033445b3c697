use clap::Parser;
use face_probe::utils::logger;
use face_probe::{CliConfig, HttpTransport, OutputFormat, Verifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // Logging goes to stderr so the report owns stdout.
    if cli.format == Some(OutputFormat::Json) {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting face-probe");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match cli.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(2);
        }
    };

    let format = settings.format;
    let transport = HttpTransport::new()?;
    let verifier = Verifier::new(transport, settings);
    let report = verifier.run_verification().await;

    match format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    // Expected failures still pass; only hard failures flip the exit code.
    if !report.passed() {
        std::process::exit(1);
    }

    Ok(())
}
