use crate::models::{AthleteProfile, BrandProfile, Campaign, PlatformMetrics};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PocketBase
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store unreachable: {0}")]
    Unavailable(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: invalid admin token")]
    Unauthorized,

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// Collection names in PocketBase
#[derive(Debug, Clone)]
pub struct StoreCollections {
    pub athletes: String,
    pub brands: String,
    pub athlete_metrics: String,
    pub campaigns: String,
    pub matches: String,
    pub notifications: String,
    pub trending: String,
}

/// One page of records from a list query
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPage<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default, rename = "perPage")]
    pub per_page: u32,
    #[serde(default, rename = "totalItems")]
    pub total_items: u64,
    #[serde(default, rename = "totalPages")]
    pub total_pages: u64,
    pub items: Vec<T>,
}

/// List query parameters
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub expand: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl ListQuery {
    pub fn filtered(filter: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

/// Whether an upsert created a new record or updated an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// PocketBase API client
///
/// Handles all communication with the document store: listing records by
/// filter/sort/page/expand, fetching single records, and writes. Upserts are
/// query-then-branch and therefore not atomic; last write wins.
pub struct PocketBaseClient {
    base_url: String,
    admin_token: String,
    client: Client,
    collections: StoreCollections,
}

impl PocketBaseClient {
    pub fn new(base_url: String, admin_token: String, collections: StoreCollections) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            admin_token,
            client,
            collections,
        }
    }

    pub fn collections(&self) -> &StoreCollections {
        &self.collections
    }

    fn records_url(&self, collection: &str) -> String {
        format!(
            "{}/api/collections/{}/records",
            self.base_url.trim_end_matches('/'),
            collection
        )
    }

    fn check_status(status: StatusCode, context: &str) -> Result<(), StoreError> {
        if status.is_success() {
            return Ok(());
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Unauthorized),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(context.to_string())),
            _ => Err(StoreError::ApiError(format!("{}: {}", context, status))),
        }
    }

    /// List records from a collection, tolerating individual rows that fail
    /// to parse into `T`
    pub async fn list_records<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<RecordPage<T>, StoreError> {
        let mut url = format!(
            "{}?page={}&perPage={}",
            self.records_url(collection),
            query.page.max(1),
            if query.per_page == 0 { 100 } else { query.per_page },
        );
        if let Some(filter) = &query.filter {
            url.push_str(&format!("&filter={}", urlencoding::encode(filter)));
        }
        if let Some(sort) = &query.sort {
            url.push_str(&format!("&sort={}", urlencoding::encode(sort)));
        }
        if let Some(expand) = &query.expand {
            url.push_str(&format!("&expand={}", urlencoding::encode(expand)));
        }

        tracing::debug!("Listing records from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.admin_token)
            .send()
            .await?;

        Self::check_status(response.status(), collection)?;

        let page: RecordPage<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        let items: Vec<T> = page
            .items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::debug!("Dropping malformed record from {}: {}", collection, e);
                    None
                }
            })
            .collect();

        Ok(RecordPage {
            page: page.page,
            per_page: page.per_page,
            total_items: page.total_items,
            total_pages: page.total_pages,
            items,
        })
    }

    /// Fetch a single record by id
    pub async fn get_record<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<T, StoreError> {
        let url = format!("{}/{}", self.records_url(collection), id);

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.admin_token)
            .send()
            .await?;

        Self::check_status(response.status(), &format!("{}/{}", collection, id))?;

        let value: Value = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        serde_json::from_value(value).map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    /// Create a record
    pub async fn create_record(
        &self,
        collection: &str,
        data: &Value,
    ) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(self.records_url(collection))
            .header("Authorization", &self.admin_token)
            .json(data)
            .send()
            .await?;

        Self::check_status(response.status(), collection)?;

        response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    /// Update a record by id
    pub async fn update_record(
        &self,
        collection: &str,
        id: &str,
        data: &Value,
    ) -> Result<Value, StoreError> {
        let url = format!("{}/{}", self.records_url(collection), id);

        let response = self
            .client
            .patch(&url)
            .header("Authorization", &self.admin_token)
            .json(data)
            .send()
            .await?;

        Self::check_status(response.status(), &format!("{}/{}", collection, id))?;

        response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    /// Update the record matching `filter` if one exists, otherwise create.
    /// Query-then-branch, not atomic.
    pub async fn upsert_by_filter(
        &self,
        collection: &str,
        filter: &str,
        data: &Value,
    ) -> Result<UpsertOutcome, StoreError> {
        let existing: RecordPage<Value> = self
            .list_records(
                collection,
                &ListQuery {
                    filter: Some(filter.to_string()),
                    per_page: 1,
                    ..ListQuery::default()
                },
            )
            .await?;

        if let Some(record) = existing.items.first() {
            let id = record
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or_else(|| StoreError::InvalidResponse("record without id".to_string()))?;
            self.update_record(collection, id, data).await?;
            Ok(UpsertOutcome::Updated)
        } else {
            self.create_record(collection, data).await?;
            Ok(UpsertOutcome::Created)
        }
    }

    /// Health check against the PocketBase health endpoint
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/health", self.base_url.trim_end_matches('/'));
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    // Typed convenience accessors

    pub async fn get_athlete(&self, id: &str) -> Result<AthleteProfile, StoreError> {
        self.get_record(&self.collections.athletes, id).await
    }

    pub async fn get_brand(&self, id: &str) -> Result<BrandProfile, StoreError> {
        self.get_record(&self.collections.brands, id).await
    }

    pub async fn get_campaign(&self, id: &str) -> Result<Campaign, StoreError> {
        self.get_record(&self.collections.campaigns, id).await
    }

    /// All platform metrics for one athlete
    pub async fn athlete_metrics(
        &self,
        athlete_id: &str,
    ) -> Result<Vec<PlatformMetrics>, StoreError> {
        let page = self
            .list_records(
                &self.collections.athlete_metrics,
                &ListQuery::filtered(format!("athlete = '{}'", athlete_id)),
            )
            .await?;
        Ok(page.items)
    }

    pub async fn list_athletes(
        &self,
        query: &ListQuery,
    ) -> Result<RecordPage<AthleteProfile>, StoreError> {
        self.list_records(&self.collections.athletes, query).await
    }

    pub async fn list_brands(
        &self,
        query: &ListQuery,
    ) -> Result<RecordPage<BrandProfile>, StoreError> {
        self.list_records(&self.collections.brands, query).await
    }

    pub async fn list_campaigns(
        &self,
        query: &ListQuery,
    ) -> Result<RecordPage<Campaign>, StoreError> {
        self.list_records(&self.collections.campaigns, query).await
    }
}
