use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "trip-etl")]
#[command(about = "Loads delimited trip records into a bulk indexing endpoint")]
pub struct CliArgs {
    /// Path to the field-mapping configuration (JSON, or TOML by extension)
    #[arg(short, long, visible_alias = "config-address", default_value = "./config.json")]
    pub config: String,

    /// Override the configured input file
    #[arg(long)]
    pub input: Option<String>,

    /// Override the configured bulk endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Translate and encode every batch without sending anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Log process CPU and memory after every batch
    #[arg(long)]
    pub monitor: bool,
}
