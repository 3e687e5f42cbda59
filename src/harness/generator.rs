use rand::Rng;

use crate::config::PricePolicy;
use crate::types::{ExchangeMarket, OrderRequest, OrderSide};

/// Draws the randomized order domain of the flood: uniform quantity, fixed or
/// uniform price, equiprobable market, fair-coin side.
#[derive(Clone, Copy, Debug)]
pub struct OrderFactory {
    price_policy: PricePolicy,
}

impl OrderFactory {
    pub fn new(price_policy: PricePolicy) -> Self {
        Self { price_policy }
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> OrderRequest {
        let quantity = rng.gen::<f64>() * 1_000_000.0;
        let price = match self.price_policy {
            PricePolicy::Fixed(price) => price,
            PricePolicy::Uniform => rng.gen_range(0..1_000_000),
        };
        // One draw, partitioned once: re-testing a fresh sample per branch
        // would skew the market shares away from equal thirds.
        let exchange = market_from_unit(rng.gen::<f64>());
        let order_type = if rng.gen_bool(0.5) {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        };

        OrderRequest {
            price,
            quantity,
            exchange,
            order_type,
        }
    }
}

fn market_from_unit(roll: f64) -> ExchangeMarket {
    if roll < 1.0 / 3.0 {
        ExchangeMarket::BtcUsd
    } else if roll < 2.0 / 3.0 {
        ExchangeMarket::BtcEur
    } else {
        ExchangeMarket::BtcGbp
    }
}
