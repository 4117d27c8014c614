//! Calcdeck API Server binary
//!
//! HTTP JSON API for the calculator, conversion, loan and graphing engines.

use calcdeck::api::{run_api_server, ApiConfig};
use calcdeck::rates::DEFAULT_RATES_URL;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "calcdeck-server")]
#[command(version)]
#[command(about = "Calcdeck API Server - calculator engines over HTTP")]
#[command(long_about = r#"
Calcdeck API Server

Provides JSON endpoints for every engine:
  - POST /api/v1/basic                - Basic calculator keystrokes
  - POST /api/v1/scientific           - Scientific calculator keys
  - POST /api/v1/convert/unit         - Unit conversion
  - POST /api/v1/convert/temperature  - Temperature conversion
  - POST /api/v1/convert/currency     - Currency conversion
  - POST /api/v1/loan                 - Loan repayments
  - POST /api/v1/graph                - Function sampling for plots

Additional endpoints:
  - GET  /health                      - Health check
  - GET  /version                     - Server version info
  - GET  /                            - API documentation

Example usage:
  calcdeck-server                           # Start on localhost:8080
  calcdeck-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/basic \
    -H "Content-Type: application/json" \
    -d '{"keys": "2+3*4="}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "CALCDECK_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "CALCDECK_PORT")]
    port: u16,

    /// Base URL of the currency rate service
    #[arg(long, default_value = DEFAULT_RATES_URL, env = "CALCDECK_RATES_URL")]
    api_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calcdeck_server=info,calcdeck=info,tower_http=info".into()),
        )
        .init();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        rates_url: args.api_url,
    };

    run_api_server(config).await
}
