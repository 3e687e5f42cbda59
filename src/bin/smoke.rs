//! Sequential correctness pass against a live exchange: submit one buy
//! order, find it in the listing, watch it pend, delete it, watch it stop
//! pending. Any failed step aborts with a non-zero exit.

use anyhow::{ensure, Context};
use clap::Parser;
use exchange_load_bot::config::{Credentials, TlsPaths};
use exchange_load_bot::types::{ExchangeMarket, OrderRequest, OrderSide};
use exchange_load_bot::RestClient;
use rand::Rng;
use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "smoke")]
struct Args {
    #[arg(long, env = "EXCHANGE_URL", default_value = "https://127.0.0.1:5000")]
    base_url: Url,

    #[arg(long, env = "TLS_CERT_PATH")]
    cert: PathBuf,

    #[arg(long, env = "TLS_KEY_PATH")]
    key: PathBuf,

    #[arg(long, env = "TLS_CA_PATH")]
    ca: PathBuf,

    #[arg(long, env = "EXCHANGE_USERNAME", default_value = "foo")]
    username: String,

    #[arg(long, env = "EXCHANGE_PASSWORD", default_value = "bar")]
    password: String,
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

    let client = RestClient::connect(args.base_url, &tls)?;
    let session = client.login(&credentials).await.context("login")?;

    let order = OrderRequest {
        price: 1,
        quantity: rand::thread_rng().gen::<f64>() * 1_000_000.0,
        exchange: ExchangeMarket::BtcUsd,
        order_type: OrderSide::Buy,
    };
    let order_id = client
        .submit_order(&session, &order)
        .await
        .context("submit buy order")?;
    tracing::info!(order_id = %order_id.0, "order accepted");

    let listing = client.list_orders(&session).await.context("list orders")?;
    ensure!(
        listing.contains_order(&order_id),
        "listing does not mention the new order"
    );
    ensure!(
        listing.contains_market(order.exchange),
        "listing does not mention {}",
        order.exchange.as_str()
    );

    let status = client
        .order_status(&session, order.exchange, &order_id)
        .await
        .context("query order state")?;
    ensure!(status.is_pending, "freshly placed order is not pending");

    let deleted = client
        .delete_order(&session, order.exchange, &order_id)
        .await
        .context("delete order")?;
    ensure!(deleted, "exchange refused to delete the order");

    let status = client
        .order_status(&session, order.exchange, &order_id)
        .await
        .context("re-query order state")?;
    ensure!(!status.is_pending, "order still pending after deletion");

    tracing::info!("smoke pass complete");
    Ok(())
}
