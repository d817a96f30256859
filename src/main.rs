use clap::Parser;
use trip_etl::utils::error::ErrorSeverity;
use trip_etl::utils::{logger, validation::Validate};
use trip_etl::{CliArgs, CsvRowSource, EtlError, FieldMapping, HttpUploader, RunSummary, TripLoader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting trip-etl");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    match run(&args).await {
        Ok(summary) => {
            report(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Run aborted: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn run(args: &CliArgs) -> Result<RunSummary, EtlError> {
    let mut mapping = FieldMapping::from_file(&args.config)?;

    if let Some(input) = &args.input {
        tracing::info!("🔧 Input overridden to: {}", input);
        mapping.input_path = input.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        tracing::info!("🔧 Endpoint overridden to: {}", endpoint);
        mapping.endpoint = endpoint.clone();
    }

    mapping.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");
    tracing::debug!("Field mapping: {:?}", mapping);

    let rows = CsvRowSource::open(&mapping.input_path, mapping.delimiter_byte()?)?;
    tracing::debug!("Discarded header: {:?}", rows.header());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be sent to {}", mapping.endpoint);
    }
    if args.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let uploader = HttpUploader::new(mapping.endpoint.clone());
    let loader = TripLoader::new(&mapping, uploader)
        .with_dry_run(args.dry_run)
        .with_monitoring(args.monitor);

    loader.run(rows).await
}

fn report(summary: &RunSummary) {
    tracing::info!(
        "✅ Done: {} rows in {} batches, {} documents encoded",
        summary.rows_read,
        summary.batches,
        summary.documents_encoded
    );
    if summary.failed_rows + summary.encode_failures > 0 {
        tracing::warn!(
            "⚠️ {} rows failed translation, {} records failed encoding",
            summary.failed_rows,
            summary.encode_failures
        );
    }
    if summary.batches_rejected + summary.batches_failed > 0 {
        tracing::warn!(
            "⚠️ {} batches rejected by the endpoint, {} batches not delivered",
            summary.batches_rejected,
            summary.batches_failed
        );
    }
    println!(
        "✅ {} rows read, {} documents encoded, {} batches uploaded",
        summary.rows_read, summary.documents_encoded, summary.batches_uploaded
    );
}
