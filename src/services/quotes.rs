use reqwest::Client;
use serde::Deserialize;

/// Best-effort price lookup: Finnhub first, Yahoo Finance as fallback.
///
/// One attempt per provider, no retries. Provider failures are logged and
/// swallowed; callers only see `Some(price)` or `None`.
#[derive(Clone)]
pub struct QuoteClient {
    http: Client,
    finnhub_api_key: String,
}

impl QuoteClient {
    pub fn new(finnhub_api_key: String) -> Self {
        Self {
            http: Client::new(),
            finnhub_api_key,
        }
    }

    fn has_finnhub_key(&self) -> bool {
        !self.finnhub_api_key.trim().is_empty()
    }

    /// Best-available current trade price for `symbol`, or `None` when both
    /// providers fail or return an unusable value.
    pub async fn current_price(&self, symbol: &str) -> Option<f64> {
        match self.finnhub_quote(symbol).await {
            Ok(p) if usable(p) => return Some(p),
            Ok(p) => tracing::warn!(symbol, price = p, "finnhub returned unusable price"),
            Err(e) => tracing::warn!(symbol, error = %e, "finnhub quote failed"),
        }

        match self.yahoo_quote(symbol).await {
            Ok(p) if usable(p) => Some(p),
            Ok(p) => {
                tracing::warn!(symbol, price = p, "yahoo returned unusable price");
                None
            }
            Err(e) => {
                tracing::warn!(symbol, error = %e, "yahoo quote failed");
                None
            }
        }
    }

    async fn finnhub_quote(&self, symbol: &str) -> Result<f64, String> {
        if !self.has_finnhub_key() {
            return Err("FINNHUB_API_KEY is missing in .env".to_string());
        }

        let url = "https://finnhub.io/api/v1/quote";
        let res = self
            .http
            .get(url)
            .query(&[("symbol", symbol), ("token", &self.finnhub_api_key)])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("finnhub quote failed: {status} {body}"));
        }

        let quote = res
            .json::<FinnhubQuote>()
            .await
            .map_err(|e| e.to_string())?;

        Ok(quote.c)
    }

    async fn yahoo_quote(&self, symbol: &str) -> Result<f64, String> {
        let url = format!("https://query1.finance.yahoo.com/v8/finance/chart/{symbol}");
        let res = self
            .http
            .get(&url)
            .query(&[("interval", "1d"), ("range", "1d")])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("yahoo chart failed: {status} {body}"));
        }

        let chart = res
            .json::<YahooChartResponse>()
            .await
            .map_err(|e| e.to_string())?;

        chart
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .and_then(|r| r.meta.regular_market_price)
            .ok_or_else(|| format!("yahoo chart had no price for {symbol}"))
    }
}

fn usable(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

#[derive(Debug, Deserialize)]
struct FinnhubQuote {
    // current
    c: f64,
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    meta: YahooChartMeta,
}

#[derive(Debug, Deserialize)]
struct YahooChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}
