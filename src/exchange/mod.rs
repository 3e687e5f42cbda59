use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{AuthSession, OrderId, OrderRequest};

pub mod rest;

/// Order-submission seam between the flood harness and the wire.
///
/// `RestClient` is the production implementation; tests drive the harness
/// with scripted gateways instead of a live exchange.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn submit_order(
        &self,
        session: &AuthSession,
        order: &OrderRequest,
    ) -> Result<OrderId, ApiError>;
}
