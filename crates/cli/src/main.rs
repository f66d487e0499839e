mod chat;
mod serve;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use concierge_engine::{
    handle_event, Clock, CompletionQueue, DialogEngine, Field, FixedClock, Policy, SystemClock,
    ValidationOutcome,
};
use concierge_queue::{DiscardQueue, JsonLinesQueue};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the JSON-lines completion queue file.
const QUEUE_PATH_ENV: &str = "CONCIERGE_QUEUE_PATH";

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Restaurant suggestion dialog engine.
#[derive(Parser)]
#[command(
    name = "concierge",
    version,
    about = "Restaurant suggestion dialog engine"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Policy TOML file (built-in defaults when omitted)
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// JSON-lines file completion records are appended to
    /// (falls back to $CONCIERGE_QUEUE_PATH; records are dropped when neither is set)
    #[arg(long, global = true)]
    queue: Option<PathBuf>,

    /// Pin the clock to an RFC 3339 instant, e.g. 2026-03-01T17:00:00Z
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one code-hook event and print the response JSON
    Turn {
        /// Path to the event JSON file ("-" reads stdin)
        event: PathBuf,
    },

    /// Run a single field's validator
    Check {
        /// Field name: location, cuisine, date, time, people, email
        field: String,
        /// Value to validate
        value: String,
        /// Confirmed dining date (YYYY-MM-DD) for the same-day time check
        #[arg(long)]
        date: Option<String>,
    },

    /// Start an interactive conversation
    Chat,

    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
        /// Path to TLS certificate PEM file (requires --tls-key)
        #[arg(long)]
        tls_cert: Option<PathBuf>,
        /// Path to TLS private key PEM file (requires --tls-cert)
        #[arg(long)]
        tls_key: Option<PathBuf>,
    },

    /// Print the effective policy as TOML
    Policy,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let engine = match build_engine(&cli) {
        Ok(engine) => engine,
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Turn { event } => {
            cmd_turn(&engine, &event, cli.output, cli.quiet);
        }
        Commands::Check { field, value, date } => {
            cmd_check(&engine, &field, &value, date.as_deref(), cli.output, cli.quiet);
        }
        Commands::Chat => {
            chat::run_chat(&engine, cli.output);
        }
        Commands::Serve {
            port,
            tls_cert,
            tls_key,
        } => {
            // Validate TLS flags: both must be provided or neither
            if tls_cert.is_some() != tls_key.is_some() {
                eprintln!("error: --tls-cert and --tls-key must both be provided");
                process::exit(1);
            }
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("error: failed to create tokio runtime: {}", e);
                    process::exit(1);
                }
            };
            let engine = Arc::new(engine);
            if let Err(e) = rt.block_on(serve::start_server(engine, port, tls_cert, tls_key)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
        Commands::Policy => {
            cmd_policy(&engine, cli.output, cli.quiet);
        }
    }
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` overrides
/// the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_engine(cli: &Cli) -> Result<DialogEngine, String> {
    let policy = match &cli.policy {
        Some(path) => Policy::load(path).map_err(|e| format!("error: {}", e))?,
        None => Policy::default(),
    };

    let clock: Arc<dyn Clock> = match &cli.now {
        Some(now) => Arc::new(
            FixedClock::parse_rfc3339(now)
                .map_err(|e| format!("error: invalid --now '{}': {}", now, e))?,
        ),
        None => Arc::new(SystemClock),
    };

    let queue_path = cli.queue.clone().or_else(|| {
        std::env::var_os(QUEUE_PATH_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    });
    let queue: Arc<dyn CompletionQueue> = match queue_path {
        Some(path) => Arc::new(JsonLinesQueue::new(path)),
        None => Arc::new(DiscardQueue),
    };

    DialogEngine::new(policy, clock, queue).map_err(|e| format!("error: {}", e))
}

fn cmd_turn(engine: &DialogEngine, event_path: &Path, output: OutputFormat, quiet: bool) {
    let event_str = if event_path == Path::new("-") {
        let mut buf = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
            report_error(&format!("error reading stdin: {}", e), output, quiet);
            process::exit(1);
        }
        buf
    } else {
        match std::fs::read_to_string(event_path) {
            Ok(s) => s,
            Err(e) => {
                let msg = format!("error reading file '{}': {}", event_path.display(), e);
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        }
    };

    let event: serde_json::Value = match serde_json::from_str(&event_str) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error: invalid JSON in {}: {}", event_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let response = handle_event(engine, &event);
    let pretty = serde_json::to_string_pretty(&response)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}

fn cmd_check(
    engine: &DialogEngine,
    field: &str,
    value: &str,
    date: Option<&str>,
    output: OutputFormat,
    quiet: bool,
) {
    let field: Field = match field.parse() {
        Ok(f) => f,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    let outcome = engine.validate_field(field, value, date);
    match output {
        OutputFormat::Json => {
            let mut json = serde_json::to_value(&outcome).unwrap_or_default();
            if let Some(obj) = json.as_object_mut() {
                obj.insert("field".to_string(), serde_json::json!(field.slot_name()));
            }
            let pretty = serde_json::to_string_pretty(&json)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            if !quiet {
                match &outcome {
                    ValidationOutcome::Valid {
                        value,
                        display: Some(display),
                    } if display != value => println!("{} ({})", value, display),
                    _ => println!("{}", outcome.message()),
                }
            }
        }
    }

    if !outcome.is_valid() {
        process::exit(1);
    }
}

fn cmd_policy(engine: &DialogEngine, output: OutputFormat, quiet: bool) {
    let rendered = match output {
        OutputFormat::Json => serde_json::to_string_pretty(engine.policy()).map_err(|e| e.to_string()),
        OutputFormat::Text => engine.policy().to_toml_string().map_err(|e| e.to_string()),
    };
    match rendered {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => {
            report_error(&format!("error: could not render policy: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
