//! Deterministic random-walk candles for offline runs and tests.
//!
//! The walk is seeded from the symbol name, so the same request always yields
//! the same series. Results are tagged `DataSource::Synthetic`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, DataSource, FetchResult, KlineRequest, MarketDataProvider};
use crate::domain::{Candle, CandleSeries};

/// Open time of the first synthetic candle (2024-01-01T00:00:00Z).
const EPOCH_MS: i64 = 1_704_067_200_000;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    start_price: f64,
    max_step: f64,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            max_step: 0.03,
        }
    }
}

impl SyntheticProvider {
    pub fn new(start_price: f64, max_step: f64) -> Self {
        Self {
            start_price,
            max_step,
        }
    }

    pub fn generate(&self, request: &KlineRequest) -> Result<CandleSeries, DataError> {
        if !(self.start_price.is_finite() && self.start_price > 0.0) {
            return Err(DataError::InvalidRequest(format!(
                "start price must be positive, got {}",
                self.start_price
            )));
        }
        if !(self.max_step.is_finite() && self.max_step > 0.0 && self.max_step < 1.0) {
            return Err(DataError::InvalidRequest(format!(
                "step must be within (0, 1), got {}",
                self.max_step
            )));
        }

        let mut rng = StdRng::seed_from_u64(symbol_seed(&request.symbol));
        let step_ms = request.interval.millis();
        let mut price = self.start_price;

        let candles = (0..request.limit)
            .map(|i| {
                let ret: f64 = rng.gen_range(-self.max_step..self.max_step);
                let open = price;
                let close = price * (1.0 + ret);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
                let volume = rng.gen_range(100.0..10_000.0);
                price = close;
                Candle {
                    timestamp: EPOCH_MS + i as i64 * step_ms,
                    open,
                    high,
                    low,
                    close,
                    volume,
                }
            })
            .collect();

        Ok(CandleSeries::new(candles)?)
    }
}

/// FNV-1a over the symbol bytes.
fn symbol_seed(symbol: &str) -> u64 {
    symbol.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

impl MarketDataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, request: &KlineRequest) -> Result<FetchResult, DataError> {
        Ok(FetchResult {
            request: request.clone(),
            series: self.generate(request)?,
            source: DataSource::Synthetic,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}
