use clap::Parser;
use exchange_load_bot::config::{Credentials, FloodConfig, PricePolicy, TlsPaths};
use exchange_load_bot::exchange::OrderGateway;
use exchange_load_bot::{run_flood, RestClient};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "loadgen")]
struct Args {
    /// Exchange base URL.
    #[arg(long, env = "EXCHANGE_URL", default_value = "https://127.0.0.1:5000")]
    base_url: Url,

    /// Client certificate PEM presented to the exchange.
    #[arg(long, env = "TLS_CERT_PATH")]
    cert: PathBuf,

    /// Client private key PEM.
    #[arg(long, env = "TLS_KEY_PATH")]
    key: PathBuf,

    /// Trust-anchor bundle the server certificate is validated against.
    #[arg(long, env = "TLS_CA_PATH")]
    ca: PathBuf,

    #[arg(long, env = "EXCHANGE_USERNAME", default_value = "foo")]
    username: String,

    #[arg(long, env = "EXCHANGE_PASSWORD", default_value = "bar")]
    password: String,

    /// Total number of order submissions.
    #[arg(long, env = "LOADGEN_REQUESTS", default_value_t = 10_000)]
    requests: usize,

    /// Maximum submissions in flight at once.
    #[arg(long, env = "LOADGEN_CONCURRENCY", default_value_t = 100)]
    concurrency: usize,

    /// Per-request deadline in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Pin every order to this price instead of drawing uniform prices.
    #[arg(long)]
    fixed_price: Option<u64>,

    /// Seconds between progress log lines (0 disables the reporter).
    #[arg(long, default_value_t = 5)]
    progress_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let tls = TlsPaths {
        cert: args.cert,
        key: args.key,
        trust_anchor: args.ca,
    };
    let credentials = Credentials {
        username: args.username,
        password: args.password,
    };
    let cfg = FloodConfig {
        requests: args.requests,
        concurrency: args.concurrency,
        request_timeout: Duration::from_secs(args.timeout_secs),
        price_policy: match args.fixed_price {
            Some(price) => PricePolicy::Fixed(price),
            None => PricePolicy::Uniform,
        },
        progress_interval: (args.progress_secs > 0).then(|| Duration::from_secs(args.progress_secs)),
    };

    let client = RestClient::connect(args.base_url, &tls)?;
    // No session, no flood: a login failure aborts before anything is spawned.
    let session = client.login(&credentials).await?;
    tracing::info!(
        requests = cfg.requests,
        concurrency = cfg.concurrency,
        "session established, starting flood"
    );

    let gateway: Arc<dyn OrderGateway> = Arc::new(client);
    let report = run_flood(&cfg, gateway, session).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
