use async_trait::async_trait;
use reqwest::{Certificate, Client, Identity};
use serde_json::json;
use std::fs;
use std::path::Path;
use url::Url;

use crate::config::{Credentials, TlsPaths};
use crate::error::{ApiError, AuthError, ConfigError};
use crate::exchange::OrderGateway;
use crate::types::{AuthSession, ExchangeMarket, OrderId, OrderRequest, OrderStatus, OrdersListing};

/// REST client for the exchange API, speaking mutual TLS.
///
/// One instance is shared by every dispatch task so the underlying connection
/// pool amortizes TLS handshakes across the whole flood.
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_url: Url,
}

impl RestClient {
    /// Builds the client from the configured TLS material: client certificate
    /// and key presented as the identity, server validated against the
    /// supplied trust anchor.
    pub fn connect(base_url: Url, tls: &TlsPaths) -> Result<Self, ConfigError> {
        let mut identity_pem = read_pem("client certificate", &tls.cert)?;
        // The key block must start on its own line.
        identity_pem.push(b'\n');
        identity_pem.extend(read_pem("client key", &tls.key)?);
        let identity = Identity::from_pem(&identity_pem).map_err(ConfigError::Tls)?;

        let trust_anchor = Certificate::from_pem(&read_pem("trust anchor", &tls.trust_anchor)?)
            .map_err(ConfigError::Tls)?;

        let http = Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .add_root_certificate(trust_anchor)
            .build()
            .map_err(ConfigError::Client)?;

        Ok(Self { http, base_url })
    }

    /// One login exchange; the returned session is the only credential any
    /// later request carries. A non-success status is fatal, not retried.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
        let response = self
            .http
            .post(self.endpoint("public/auth/login"))
            .json(&json!({
                "username": credentials.username,
                "pass": credentials.password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Denied {
                status: response.status(),
            });
        }
        Ok(AuthSession(response.text().await?))
    }

    pub async fn submit_order(
        &self,
        session: &AuthSession,
        order: &OrderRequest,
    ) -> Result<OrderId, ApiError> {
        let response = self
            .http
            .post(self.endpoint("orders"))
            .bearer_auth(&session.0)
            .json(order)
            .send()
            .await?;
        let response = expect_success(response)?;
        Ok(OrderId(response.text().await?))
    }

    pub async fn list_orders(&self, session: &AuthSession) -> Result<OrdersListing, ApiError> {
        let response = self
            .http
            .get(self.endpoint("orders"))
            .bearer_auth(&session.0)
            .send()
            .await?;
        let response = expect_success(response)?;
        Ok(OrdersListing(response.text().await?))
    }

    pub async fn order_status(
        &self,
        session: &AuthSession,
        market: ExchangeMarket,
        order_id: &OrderId,
    ) -> Result<OrderStatus, ApiError> {
        let response = self
            .http
            .get(self.order_endpoint(market, order_id))
            .bearer_auth(&session.0)
            .send()
            .await?;
        let response = expect_success(response)?;
        let status: (bool, f64) = response.json().await?;
        Ok(status.into())
    }

    /// Returns whether the exchange actually deleted the order.
    pub async fn delete_order(
        &self,
        session: &AuthSession,
        market: ExchangeMarket,
        order_id: &OrderId,
    ) -> Result<bool, ApiError> {
        let response = self
            .http
            .delete(self.order_endpoint(market, order_id))
            .bearer_auth(&session.0)
            .send()
            .await?;
        let response = expect_success(response)?;
        Ok(response.json().await?)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    fn order_endpoint(&self, market: ExchangeMarket, order_id: &OrderId) -> String {
        self.endpoint(&format!("{}/{}", market.as_str(), order_id.0))
    }
}

#[async_trait]
impl OrderGateway for RestClient {
    async fn submit_order(
        &self,
        session: &AuthSession,
        order: &OrderRequest,
    ) -> Result<OrderId, ApiError> {
        RestClient::submit_order(self, session, order).await
    }
}

fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ApiError::UnexpectedStatus {
            status: response.status(),
        })
    }
}

fn read_pem(role: &'static str, path: &Path) -> Result<Vec<u8>, ConfigError> {
    fs::read(path).map_err(|source| ConfigError::Pem {
        role,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_tolerate_trailing_slash() {
        let client = RestClient {
            http: Client::new(),
            base_url: Url::parse("https://127.0.0.1:5000/").unwrap(),
        };
        assert_eq!(
            client.endpoint("orders"),
            "https://127.0.0.1:5000/v1/orders"
        );
        assert_eq!(
            client.order_endpoint(ExchangeMarket::BtcGbp, &OrderId("ord-3".into())),
            "https://127.0.0.1:5000/v1/BTC_GBP/ord-3"
        );
    }

    #[test]
    fn missing_pem_is_a_config_error() {
        let tls = TlsPaths {
            cert: "/nonexistent/client.pem".into(),
            key: "/nonexistent/client.key".into(),
            trust_anchor: "/nonexistent/ca.pem".into(),
        };
        let err = RestClient::connect(Url::parse("https://127.0.0.1:5000").unwrap(), &tls)
            .err()
            .expect("connect must fail without TLS material");
        assert!(matches!(err, ConfigError::Pem { role, .. } if role == "client certificate"));
    }
}
