use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{Appointment, ProviderSchedule, SlotTime, UserRecord};

use crate::store::{BookingScope, BookingStore, StoreError};

/// Client for the document-store gateway. The gateway exposes the user and
/// schedule collections plus multi-document transactions with snapshot
/// isolation; conditional writes report how many documents they modified.
pub struct RestDocumentStore {
    gateway: GatewayClient,
}

impl RestDocumentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            gateway: GatewayClient {
                client: Client::new(),
                base_url: config.store_url.clone(),
                api_key: config.store_api_key.clone(),
            },
        }
    }
}

#[derive(Clone)]
struct GatewayClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TransactionHandle {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ModifiedCount {
    modified: u64,
}

impl GatewayClient {
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("x-api-key", key);
        }
        headers
    }

    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        txn: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Store gateway request: {} {}", method, url);

        let mut req = self.client.request(method, &url).headers(self.headers());
        if let Some(txn_id) = txn {
            req = req.query(&[("txn", txn_id)]);
        }
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Store gateway error ({}): {}", status, message);
            return Err(match status {
                StatusCode::CONFLICT => StoreError::Conflict(message),
                _ => StoreError::Gateway {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Like `request`, but a 404 from the gateway means "no such document"
    /// rather than an error.
    async fn request_optional<T>(
        &self,
        method: Method,
        path: &str,
        txn: Option<&str>,
    ) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        match self.request(method, path, txn, None).await {
            Ok(value) => Ok(Some(value)),
            Err(StoreError::Gateway { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl BookingStore for RestDocumentStore {
    async fn begin(&self) -> Result<Box<dyn BookingScope>, StoreError> {
        let handle: TransactionHandle = self
            .gateway
            .request(Method::POST, "/v1/transactions", None, None)
            .await?;
        debug!("Opened store transaction {}", handle.id);
        Ok(Box::new(RestScope {
            gateway: self.gateway.clone(),
            txn: handle.id,
        }))
    }

    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        self.gateway
            .request_optional(Method::GET, &format!("/v1/users/{}", user_id), None)
            .await
    }

    async fn insert_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let _: Value = self
            .gateway
            .request(
                Method::POST,
                "/v1/users",
                None,
                Some(serde_json::to_value(user).map_err(|e| {
                    StoreError::Serialization(e.to_string())
                })?),
            )
            .await?;
        Ok(())
    }

    async fn fetch_schedule(
        &self,
        provider_id: &str,
    ) -> Result<Option<ProviderSchedule>, StoreError> {
        self.gateway
            .request_optional(Method::GET, &format!("/v1/schedules/{}", provider_id), None)
            .await
    }
}

struct RestScope {
    gateway: GatewayClient,
    txn: String,
}

#[async_trait]
impl BookingScope for RestScope {
    async fn find_user(&mut self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        self.gateway
            .request_optional(
                Method::GET,
                &format!("/v1/users/{}", user_id),
                Some(&self.txn),
            )
            .await
    }

    async fn find_schedule(
        &mut self,
        provider_id: &str,
    ) -> Result<Option<ProviderSchedule>, StoreError> {
        self.gateway
            .request_optional(
                Method::GET,
                &format!("/v1/schedules/{}", provider_id),
                Some(&self.txn),
            )
            .await
    }

    async fn mark_slot(
        &mut self,
        provider_id: &str,
        start: &SlotTime,
        booked: bool,
    ) -> Result<u64, StoreError> {
        // Targeted conditional update: the gateway matches the slot on the
        // canonical start time and the expected prior flag, and reports zero
        // modified when another transaction got there first.
        let result: ModifiedCount = self
            .gateway
            .request(
                Method::PATCH,
                &format!("/v1/schedules/{}/slots", provider_id),
                Some(&self.txn),
                Some(json!({
                    "start_datetime": start.to_string(),
                    "is_booked": booked,
                    "expect_booked": !booked,
                })),
            )
            .await?;
        Ok(result.modified)
    }

    async fn push_appointment(
        &mut self,
        user_id: &str,
        appointment: &Appointment,
    ) -> Result<u64, StoreError> {
        let result: ModifiedCount = self
            .gateway
            .request(
                Method::POST,
                &format!("/v1/users/{}/appointments", user_id),
                Some(&self.txn),
                Some(serde_json::to_value(appointment).map_err(|e| {
                    StoreError::Serialization(e.to_string())
                })?),
            )
            .await?;
        Ok(result.modified)
    }

    async fn pull_appointment(
        &mut self,
        user_id: &str,
        appointment_id: Uuid,
    ) -> Result<u64, StoreError> {
        let result: ModifiedCount = self
            .gateway
            .request(
                Method::DELETE,
                &format!("/v1/users/{}/appointments/{}", user_id, appointment_id),
                Some(&self.txn),
                None,
            )
            .await?;
        Ok(result.modified)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let committed: Result<Value, StoreError> = self
            .gateway
            .request(
                Method::POST,
                &format!("/v1/transactions/{}/commit", self.txn),
                None,
                None,
            )
            .await;

        match committed {
            Ok(_) => {
                debug!("Committed store transaction {}", self.txn);
                Ok(())
            }
            Err(err) => {
                // A failed commit must not leave the transaction open on the
                // gateway; roll it back before surfacing the commit error.
                let rollback: Result<Value, StoreError> = self
                    .gateway
                    .request(
                        Method::POST,
                        &format!("/v1/transactions/{}/abort", self.txn),
                        None,
                        None,
                    )
                    .await;
                if let Err(abort_err) = rollback {
                    warn!(
                        "Failed to abort transaction {} after commit failure: {}",
                        self.txn, abort_err
                    );
                }
                Err(err)
            }
        }
    }

    async fn abort(self: Box<Self>) -> Result<(), StoreError> {
        let _: Value = self
            .gateway
            .request(
                Method::POST,
                &format!("/v1/transactions/{}/abort", self.txn),
                None,
                None,
            )
            .await?;
        debug!("Aborted store transaction {}", self.txn);
        Ok(())
    }
}
