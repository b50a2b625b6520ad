//! # Remote Catalog Fetcher
//!
//! Retrieves the whole menu with one HTTP GET and normalizes it into
//! [`MenuItem`]s. Never touches the store.
//!
//! ## Wire Format
//! ```text
//! {
//!   "menu": [
//!     { "name": "Greek Salad", "price": "12.99", "description": "...",
//!       "image": "greekSalad.jpg", "category": "starters" },
//!     ...
//!   ]
//! }
//!      │
//!      │  position in "menu" (1-based) becomes the id
//!      ▼
//! MenuItem { id: 1, name: "Greek Salad", price_cents: 1299, ... }
//! ```
//!
//! `price` may be a JSON number or a numeric string. Anything that doesn't
//! fit (missing field, unknown category, negative price, no `menu` array)
//! rejects the whole response with [`FetchError::Format`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::CatalogConfig;
use crate::error::{FetchError, SyncResult};
use lemon_core::validation::validate_item_name;
use lemon_core::{Category, MenuItem, Money};

// =============================================================================
// Catalog Source
// =============================================================================

/// Anything that can produce the full catalog.
///
/// The orchestrator only sees this trait, so tests can swap the network for
/// an in-memory double.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns the complete catalog with ids assigned from 1.
    async fn fetch(&self) -> Result<Vec<MenuItem>, FetchError>;
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    menu: Vec<WireItem>,
}

#[derive(Debug, Deserialize)]
struct WireItem {
    name: String,
    price: WirePrice,
    description: String,
    image: String,
    category: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WirePrice {
    Number(serde_json::Number),
    Text(String),
}

impl WirePrice {
    fn to_money(&self) -> Result<Money, String> {
        let text = match self {
            WirePrice::Number(n) => n.to_string(),
            WirePrice::Text(s) => s.clone(),
        };
        Money::parse_decimal(&text).map_err(|e| e.to_string())
    }
}

/// Parses a catalog response body.
///
/// Deterministic: the same body always yields the same items and ids.
pub fn parse_catalog(body: &str) -> Result<Vec<MenuItem>, FetchError> {
    let response: CatalogResponse = serde_json::from_str(body)?;

    response
        .menu
        .into_iter()
        .enumerate()
        .map(|(index, wire)| -> Result<MenuItem, FetchError> {
            let position = index + 1;
            let bad =
                |reason: String| FetchError::Format(format!("menu item {position}: {reason}"));

            validate_item_name(&wire.name).map_err(|e| bad(e.to_string()))?;
            let price = wire.price.to_money().map_err(bad)?;
            let category = wire
                .category
                .parse::<Category>()
                .map_err(|e| bad(e.to_string()))?;

            Ok(MenuItem {
                id: position as i64,
                name: wire.name,
                price_cents: price.cents(),
                description: wire.description,
                image: wire.image,
                category,
            })
        })
        .collect()
}

// =============================================================================
// HTTP Fetcher
// =============================================================================

/// Fetches the catalog over HTTP.
///
/// Clone is cheap; `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct RemoteCatalogFetcher {
    client: Client,
    url: Url,
}

impl RemoteCatalogFetcher {
    /// Creates a fetcher for `url` with a whole-request timeout.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(RemoteCatalogFetcher { client, url })
    }

    /// Creates a fetcher from the `[catalog]` section.
    pub fn from_config(config: &CatalogConfig) -> SyncResult<Self> {
        Ok(Self::new(config.catalog_url()?, config.request_timeout())?)
    }

    /// The endpoint this fetcher reads.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for RemoteCatalogFetcher {
    async fn fetch(&self) -> Result<Vec<MenuItem>, FetchError> {
        debug!(url = %self.url, "Fetching remote catalog");

        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, status = %status, "Catalog request failed");
            return Err(FetchError::Network(format!(
                "HTTP {} from {}",
                status, self.url
            )));
        }

        let body = response.text().await?;
        let items = parse_catalog(&body)?;

        info!(count = items.len(), "Remote catalog fetched");
        Ok(items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SAMPLE: &str = r#"{
        "menu": [
            {
                "name": "Greek Salad",
                "price": "12.99",
                "description": "The famous greek salad of crispy lettuce, peppers, olives.",
                "image": "greekSalad.jpg",
                "category": "starters"
            },
            {
                "name": "Lemon Dessert",
                "price": 5.5,
                "description": "Traditional homemade Italian Lemon Ricotta Cake.",
                "image": "lemonDessert.jpg",
                "category": "desserts"
            },
            {
                "name": "Grilled Fish",
                "price": 20,
                "description": "Barbequed catch of the day.",
                "image": "grilledFish.jpg",
                "category": "mains",
                "unused": true
            }
        ]
    }"#;

    fn with_item(item: &str) -> String {
        format!(r#"{{ "menu": [ {item} ] }}"#)
    }

    #[test]
    fn test_parse_assigns_positional_ids() {
        let items = parse_catalog(SAMPLE).unwrap();

        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        assert_eq!(items[0].name, "Greek Salad");
        assert_eq!(items[0].price_cents, 1299);
        assert_eq!(items[0].category, Category::Starters);
        assert_eq!(items[1].price_cents, 550);
        assert_eq!(items[2].price_cents, 2000);
        assert_eq!(items[2].image, "grilledFish.jpg");
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse_catalog(SAMPLE).unwrap(), parse_catalog(SAMPLE).unwrap());
    }

    #[test]
    fn test_empty_menu_is_valid() {
        assert!(parse_catalog(r#"{ "menu": [] }"#).unwrap().is_empty());
    }

    #[test]
    fn test_schema_violations_are_format_errors() {
        let cases = [
            r#"{}"#.to_string(),
            r#"{ "menu": {} }"#.to_string(),
            r#"[]"#.to_string(),
            "not json".to_string(),
            with_item(r#"{ "name": "Pasta", "price": "9", "description": "", "image": "p.jpg" }"#),
            with_item(
                r#"{ "name": "Pasta", "price": "-9", "description": "", "image": "p.jpg", "category": "mains" }"#,
            ),
            with_item(
                r#"{ "name": "Pasta", "price": "nine", "description": "", "image": "p.jpg", "category": "mains" }"#,
            ),
            with_item(
                r#"{ "name": "Pasta", "price": true, "description": "", "image": "p.jpg", "category": "mains" }"#,
            ),
            with_item(
                r#"{ "name": "Lemonade", "price": "3", "description": "", "image": "l.jpg", "category": "drinks" }"#,
            ),
            with_item(
                r#"{ "name": "", "price": "3", "description": "", "image": "l.jpg", "category": "mains" }"#,
            ),
        ];

        for body in &cases {
            match parse_catalog(body) {
                Err(FetchError::Format(_)) => {}
                other => panic!("expected Format error for {body}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_one_bad_item_rejects_whole_catalog() {
        let body = r#"{ "menu": [
            { "name": "Pasta", "price": "9", "description": "", "image": "p.jpg", "category": "mains" },
            { "name": "Cola", "price": "2", "description": "", "image": "c.jpg", "category": "drinks" }
        ] }"#;

        let err = parse_catalog(body).unwrap_err();
        assert!(err.to_string().contains("menu item 2"));
    }

    #[test]
    fn test_sub_cent_prices_are_rejected_in_every_form() {
        for price in ["0.000001", r#""1.2345e1""#, r#""12.345""#] {
            let body = with_item(&format!(
                r#"{{ "name": "Pasta", "price": {price}, "description": "", "image": "p.jpg", "category": "mains" }}"#
            ));

            match parse_catalog(&body) {
                Err(FetchError::Format(msg)) => {
                    assert!(msg.contains("more than two decimal places"), "{price}: {msg}")
                }
                other => panic!("expected Format error for {price}, got {other:?}"),
            }
        }
    }

    /// Serves one canned HTTP response on a local port.
    async fn serve_once(status: &str, body: &str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await.unwrap();
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        Url::parse(&format!("http://{addr}/capstone.json")).unwrap()
    }

    fn fetcher(url: Url) -> RemoteCatalogFetcher {
        RemoteCatalogFetcher::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_parses_success_response() {
        let url = serve_once("200 OK", SAMPLE).await;

        let items = fetcher(url).fetch().await.unwrap();

        assert_eq!(items, parse_catalog(SAMPLE).unwrap());
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_network_error() {
        let url = serve_once("503 Service Unavailable", "{}").await;

        match fetcher(url).fetch().await {
            Err(FetchError::Network(msg)) => assert!(msg.contains("503"), "{msg}"),
            other => panic!("expected Network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_format_error() {
        let url = serve_once("200 OK", r#"{ "dishes": [] }"#).await;

        assert!(matches!(
            fetcher(url).fetch().await,
            Err(FetchError::Format(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/capstone.json")).unwrap();
        assert!(matches!(
            fetcher(url).fetch().await,
            Err(FetchError::Network(_))
        ));
    }

    #[test]
    fn test_fetcher_from_default_config() {
        let fetcher = RemoteCatalogFetcher::from_config(&CatalogConfig::default()).unwrap();
        assert!(fetcher.url().as_str().ends_with("capstone.json"));
    }
}
