//! Binance public REST klines provider.
//!
//! GET `{base_url}/api/v3/klines?symbol=..&interval=..&limit=..`. No API key is
//! needed. Retries transient failures with exponential backoff and consults
//! the shared circuit breaker before every attempt. Retrying lives here, in
//! the collaborator; the analysis core never retries.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::circuit_breaker::CircuitBreaker;
use super::klines::parse_klines;
use super::provider::{DataError, DataSource, FetchResult, KlineRequest, MarketDataProvider};

/// Binance error code for an unknown symbol.
const INVALID_SYMBOL_CODE: i64 = -1121;

/// Used in `RateLimited` when a 429 carries no usable Retry-After.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Longest single wait between attempts, whatever the server asks for.
pub const MAX_RETRY_WAIT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinanceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 10,
            max_retries: 3,
            base_delay_ms: 500,
        }
    }
}

/// Error payload returned with 4xx responses.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    msg: String,
}

pub struct BinanceProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    config: BinanceConfig,
}

impl BinanceProvider {
    pub fn new(config: BinanceConfig, circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("wavetrader/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::UpstreamUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, config, circuit_breaker))
    }

    /// Use a preconfigured HTTP client (proxy settings, custom TLS, tests).
    pub fn with_client(
        client: reqwest::blocking::Client,
        config: BinanceConfig,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Self {
        Self {
            client,
            circuit_breaker,
            config,
        }
    }

    fn klines_url(&self) -> String {
        format!("{}/api/v3/klines", self.config.base_url.trim_end_matches('/'))
    }

    fn fetch_with_retry(&self, request: &KlineRequest) -> Result<String, DataError> {
        let url = self.klines_url();
        let limit = request.limit.to_string();
        let mut last_error = None;
        let mut retry_after = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = retry_delay(self.config.base_delay_ms, attempt, retry_after.take());
                debug!(attempt, ?delay, symbol = %request.symbol, "retrying klines request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let response = self
                .client
                .get(&url)
                .query(&[
                    ("symbol", request.symbol.as_str()),
                    ("interval", request.interval.as_str()),
                    ("limit", limit.as_str()),
                ])
                .send();

            let resp = match response {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    self.circuit_breaker.record_failure();
                    warn!(error = %e, symbol = %request.symbol, "klines request failed");
                    last_error = Some(DataError::UpstreamUnavailable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::UpstreamUnavailable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::IM_A_TEAPOT || status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                warn!(%status, "provider banned this client, tripping circuit breaker");
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let asked = resp
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok());
                warn!(symbol = %request.symbol, retry_after_secs = ?asked, "rate limited");
                retry_after = asked.map(Duration::from_secs);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: asked.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
                });
                continue;
            }

            if status.is_client_error() {
                let body = resp.text().unwrap_or_default();
                return Err(classify_client_error(&request.symbol, status.as_u16(), &body));
            }

            if !status.is_success() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::UpstreamUnavailable(format!(
                    "HTTP {status} for {}",
                    request.symbol
                )));
                continue;
            }

            let body = resp
                .text()
                .map_err(|e| DataError::ResponseFormatChanged(format!("unreadable body: {e}")))?;
            self.circuit_breaker.record_success();
            return Ok(body);
        }

        Err(last_error.unwrap_or_else(|| DataError::UpstreamUnavailable("max retries exceeded".into())))
    }
}

/// Wait before retry number `attempt` (1-based).
///
/// Exponential backoff from `base_delay_ms`, stretched to the server's
/// Retry-After when that is longer, and never above [`MAX_RETRY_WAIT`].
pub fn retry_delay(base_delay_ms: u64, attempt: u32, retry_after: Option<Duration>) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    let backoff = Duration::from_millis(base_delay_ms.saturating_mul(factor));
    backoff
        .max(retry_after.unwrap_or(Duration::ZERO))
        .min(MAX_RETRY_WAIT)
}

fn classify_client_error(symbol: &str, status: u16, body: &str) -> DataError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api) if api.code == INVALID_SYMBOL_CODE => DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        },
        Ok(api) => DataError::InvalidRequest(format!("{} ({})", api.msg, api.code)),
        Err(_) => DataError::InvalidRequest(format!("HTTP {status}: {body}")),
    }
}

impl MarketDataProvider for BinanceProvider {
    fn name(&self) -> &str {
        "binance"
    }

    fn fetch(&self, request: &KlineRequest) -> Result<FetchResult, DataError> {
        let body = self.fetch_with_retry(request)?;
        let series = parse_klines(&body)?;
        info!(
            symbol = %request.symbol,
            interval = %request.interval,
            candles = series.len(),
            "fetched klines"
        );
        Ok(FetchResult {
            request: request.clone(),
            series,
            source: DataSource::Binance,
        })
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Serve each canned response to one connection, in order.
    fn serve(responses: Vec<String>) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                    line.clear();
                }
                stream.write_all(response.as_bytes()).unwrap();
            }
        });
        (base_url, handle)
    }

    fn http(status: &str, headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\n{headers}Content-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn local_provider(base_url: String, max_retries: u32) -> BinanceProvider {
        let config = BinanceConfig {
            base_url,
            timeout_secs: 5,
            max_retries,
            base_delay_ms: 1,
        };
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        BinanceProvider::with_client(client, config, Arc::new(CircuitBreaker::default_provider()))
    }

    const TWO_KLINES: &str = r#"[[1700000000000,"1.0","2.0","0.5","1.5","10.0",1700000059999],[1700000060000,"1.5","2.5","1.0","2.0","12.0",1700000119999]]"#;

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(retry_delay(500, 1, None), Duration::from_millis(500));
        assert_eq!(retry_delay(500, 2, None), Duration::from_millis(1_000));
        assert_eq!(retry_delay(500, 3, None), Duration::from_millis(2_000));
    }

    #[test]
    fn longer_retry_after_wins_over_backoff() {
        let wait = retry_delay(500, 1, Some(Duration::from_secs(7)));
        assert_eq!(wait, Duration::from_secs(7));
        // A shorter server hint does not cut the backoff.
        let wait = retry_delay(4_000, 2, Some(Duration::from_secs(1)));
        assert_eq!(wait, Duration::from_secs(8));
    }

    #[test]
    fn waits_are_capped() {
        assert_eq!(retry_delay(500, 1, Some(Duration::from_secs(3_600))), MAX_RETRY_WAIT);
        assert_eq!(retry_delay(500, 40, None), MAX_RETRY_WAIT);
        assert_eq!(retry_delay(u64::MAX, u32::MAX, None), MAX_RETRY_WAIT);
    }

    #[test]
    fn rate_limited_request_is_retried_then_decoded() {
        let (base_url, server) = serve(vec![
            http("429 Too Many Requests", "Retry-After: 0\r\n", "{}"),
            http("200 OK", "", TWO_KLINES),
        ]);
        let provider = local_provider(base_url, 2);
        let request = KlineRequest::new("BTCUSDT", crate::data::Interval::OneMinute, 2).unwrap();

        let fetched = provider.fetch(&request).unwrap();
        server.join().unwrap();
        assert_eq!(fetched.series.len(), 2);
        assert_eq!(fetched.source, DataSource::Binance);
        assert!(provider.is_available());
    }

    #[test]
    fn persistent_rate_limit_reports_server_hint() {
        let (base_url, server) = serve(vec![
            http("429 Too Many Requests", "Retry-After: 0\r\n", "{}"),
            http("429 Too Many Requests", "Retry-After: 0\r\n", "{}"),
        ]);
        let provider = local_provider(base_url, 1);
        let request = KlineRequest::new("BTCUSDT", crate::data::Interval::OneMinute, 2).unwrap();

        let err = provider.fetch(&request).unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, DataError::RateLimited { retry_after_secs: 0 }));
    }

    #[test]
    fn invalid_symbol_maps_to_symbol_not_found() {
        let err = classify_client_error(
            "NOPEUSDT",
            400,
            r#"{"code":-1121,"msg":"Invalid symbol."}"#,
        );
        assert!(matches!(err, DataError::SymbolNotFound { symbol } if symbol == "NOPEUSDT"));
    }

    #[test]
    fn other_api_errors_are_invalid_requests() {
        let err = classify_client_error(
            "BTCUSDT",
            400,
            r#"{"code":-1120,"msg":"Invalid interval."}"#,
        );
        assert_eq!(err.to_string(), "invalid request: Invalid interval. (-1120)");
    }

    #[test]
    fn unparseable_error_body_keeps_status() {
        let err = classify_client_error("BTCUSDT", 404, "<html>");
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn url_tolerates_trailing_slash() {
        let config = BinanceConfig {
            base_url: "http://localhost:9000/".into(),
            ..BinanceConfig::default()
        };
        let provider =
            BinanceProvider::new(config, Arc::new(CircuitBreaker::default_provider())).unwrap();
        assert_eq!(provider.klines_url(), "http://localhost:9000/api/v3/klines");
        assert_eq!(provider.name(), "binance");
    }

    #[test]
    fn tripped_breaker_refuses_without_network() {
        let breaker = Arc::new(CircuitBreaker::default_provider());
        breaker.trip();
        let provider = BinanceProvider::new(BinanceConfig::default(), breaker).unwrap();
        assert!(!provider.is_available());
        let request = KlineRequest::new("BTCUSDT", crate::data::Interval::OneHour, 10).unwrap();
        assert!(matches!(
            provider.fetch(&request),
            Err(DataError::CircuitBreakerTripped)
        ));
    }
}
