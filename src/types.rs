use serde::{Deserialize, Serialize};

/// Opaque bearer credential issued by the exchange at login.
///
/// Created once per run and shared read-only by every dispatch task; the
/// harness cannot send a single order without one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession(pub String);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

/// Currency pairs the exchange quotes. Wire names use the underscore form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExchangeMarket {
    #[serde(rename = "BTC_USD")]
    BtcUsd,
    #[serde(rename = "BTC_EUR")]
    BtcEur,
    #[serde(rename = "BTC_GBP")]
    BtcGbp,
}

impl ExchangeMarket {
    /// Wire form, also used as the path segment in per-order endpoints.
    pub fn as_str(self) -> &'static str {
        match self {
            ExchangeMarket::BtcUsd => "BTC_USD",
            ExchangeMarket::BtcEur => "BTC_EUR",
            ExchangeMarket::BtcGbp => "BTC_GBP",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// One order submission as the exchange expects it on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub price: u64,
    pub quantity: f64,
    pub exchange: ExchangeMarket,
    #[serde(rename = "orderType")]
    pub order_type: OrderSide,
}

/// Pending-state probe result for a single order.
///
/// The exchange answers with a bare `(is_pending, remaining)` tuple; the
/// client maps it into named fields before anything else sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrderStatus {
    pub is_pending: bool,
    pub remaining: f64,
}

impl From<(bool, f64)> for OrderStatus {
    fn from((is_pending, remaining): (bool, f64)) -> Self {
        Self {
            is_pending,
            remaining,
        }
    }
}

/// Raw order listing returned by `GET /v1/orders`.
///
/// The body format is owned by the exchange; callers only probe it for
/// membership.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrdersListing(pub String);

impl OrdersListing {
    pub fn contains_order(&self, id: &OrderId) -> bool {
        self.0.contains(&id.0)
    }

    pub fn contains_market(&self, market: ExchangeMarket) -> bool {
        self.0.contains(market.as_str())
    }
}
