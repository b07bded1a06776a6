use crate::error::{FetchError, Result};
use crate::model::{EntityKind, Film, Person, PersonSummary, Starship, Vehicle};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://sw-api.starnavi.io";
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Read-only operations the explorer needs from the catalog.
///
/// Every call is idempotent. Implementations must return `Send` futures so
/// builds can be spawned onto the runtime.
pub trait CatalogService: Send + Sync {
    fn list_people(
        &self,
        page: u32,
        page_size: usize,
    ) -> impl Future<Output = Result<Vec<PersonSummary>>> + Send;

    fn get_person(&self, id: u32) -> impl Future<Output = Result<Person>> + Send;

    fn get_film(&self, id: u32) -> impl Future<Output = Result<Film>> + Send;

    fn get_starship(&self, id: u32) -> impl Future<Output = Result<Starship>> + Send;

    fn get_vehicle(&self, id: u32) -> impl Future<Output = Result<Vehicle>> + Send;
}

/// Connection settings for [`SwapiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// HTTP implementation of [`CatalogService`]
#[derive(Debug, Clone)]
pub struct SwapiClient {
    client: Client,
    base_url: Url,
}

impl SwapiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("Holomap/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn fetch_record<T: DeserializeOwned>(&self, kind: EntityKind, id: u32) -> Result<T> {
        // The people resource is only served with a trailing slash
        let path = match kind {
            EntityKind::Person => format!("{}/{}/", kind.collection(), id),
            _ => format!("{}/{}", kind.collection(), id),
        };
        let url = self.endpoint(&path)?;
        debug!("Fetching {} {} from {}", kind, id, url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound { kind, id });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl CatalogService for SwapiClient {
    async fn list_people(&self, page: u32, page_size: usize) -> Result<Vec<PersonSummary>> {
        let mut url = self.endpoint("people/")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("page_size", &page_size.to_string());
        debug!("Listing people page {} ({} per page)", page, page_size);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        parse_people_page(&body)
    }

    async fn get_person(&self, id: u32) -> Result<Person> {
        self.fetch_record(EntityKind::Person, id).await
    }

    async fn get_film(&self, id: u32) -> Result<Film> {
        self.fetch_record(EntityKind::Film, id).await
    }

    async fn get_starship(&self, id: u32) -> Result<Starship> {
        self.fetch_record(EntityKind::Starship, id).await
    }

    async fn get_vehicle(&self, id: u32) -> Result<Vehicle> {
        self.fetch_record(EntityKind::Vehicle, id).await
    }
}

/// Extract the `results` rows of a people page.
///
/// A missing or null `results` is an empty page; anything other than an
/// array is a malformed response.
pub fn parse_people_page(body: &str) -> Result<Vec<PersonSummary>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    match value.get("results") {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(serde_json::Value::Array(rows)) => rows
            .iter()
            .cloned()
            .map(|row| serde_json::from_value(row).map_err(FetchError::from))
            .collect(),
        Some(other) => Err(FetchError::MalformedResponse(format!(
            "expected results to be an array, got {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
