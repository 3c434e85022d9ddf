//! Growatt OSS API callers.
//!
//! Every caller follows the same shape: validate inputs, fetch a token,
//! send one request, report failures to the [`ErrorLog`] and hand back the
//! vendor JSON untouched. Empty-but-successful answers are logged as
//! warnings and returned as-is.

use std::sync::Arc;

use http::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::api::endpoints::{is_blank, send_json, ACTIVE_EQUIPMENT, DEVICES_BY_PLANT, SEARCH_INVERTER};
use crate::api::plant_request::{PlantEntry, PlantInfo, PlantRequest};
use crate::auth::authenticator::Authenticator;
use crate::auth::token_accessor::TokenAccessor;
use crate::cache::token_cache::{TokenCache, TokenStore};
use crate::config::settings::CredentialsConfig;
use crate::error::OssError;
use crate::observability::error_log::{
    ErrorLog, ACTIVE_EQUIPMENT_ERROR_TITLE, DEVICES_ERROR_TITLE, PLANT_LOOKUP_ERROR_TITLE,
    SN_DATA_ERROR_TITLE,
};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
/// Fixed search scope sent with every serial-number lookup.
const SEARCH_SERVER_ID: &str = "1";
const SEARCH_TYPE: &str = "0";
const FIRST_PAGE: &str = "1";

pub struct OssClient<S = TokenCache> {
    http: Client,
    credentials: Arc<CredentialsConfig>,
    tokens: TokenAccessor<S>,
    error_log: Arc<dyn ErrorLog>,
}

impl<S: TokenStore> OssClient<S> {
    pub fn new(
        http: Client,
        credentials: CredentialsConfig,
        store: Arc<S>,
        error_log: Arc<dyn ErrorLog>,
    ) -> Self {
        let credentials = Arc::new(credentials);
        let authenticator = Authenticator::new(
            http.clone(),
            credentials.clone(),
            store.clone(),
            error_log.clone(),
        );
        Self {
            http,
            credentials,
            tokens: TokenAccessor::new(store, authenticator),
            error_log,
        }
    }

    pub fn tokens(&self) -> &TokenAccessor<S> {
        &self.tokens
    }

    /// `GET /oss/getActiveEquipaments?accountName=..&plantId=..`
    pub async fn active_equipment(&self, plant_id: &str, account_name: &str) -> Result<Value, OssError> {
        let result = self.fetch_active_equipment(plant_id, account_name).await;
        let body = self.report(ACTIVE_EQUIPMENT_ERROR_TITLE, result)?;
        if is_blank(body.get("data")) {
            self.error_log
                .log_warning(ACTIVE_EQUIPMENT_ERROR_TITLE, "No active equipments found");
        }
        Ok(body)
    }

    pub async fn active_equipment_for(&self, plant: &PlantRequest) -> Result<Value, OssError> {
        self.active_equipment(&plant.plant_id, &plant.username).await
    }

    /// `POST /oss/searchInverter` with form `serverID=1&type=0&deviceSN=..`
    pub async fn search_serial_number(&self, serial_number: &str) -> Result<Value, OssError> {
        let result = self.fetch_search(serial_number).await;
        let body = self.report(SN_DATA_ERROR_TITLE, result)?;
        if is_blank(Some(&body)) || is_blank(body.get("obj")) {
            self.error_log
                .log_warning(SN_DATA_ERROR_TITLE, "No data found for the given serial number");
        }
        Ok(body)
    }

    /// `GET /oss/getDevicesByPlantList?serverId=..&plantId=..&username=..&currPage=1`
    /// Devices by plant from raw inbound parameters. A blank or non-numeric
    /// `serverId` is logged and rejected before any request is made.
    pub async fn devices_by_plant_query(
        &self,
        plant_id: &str,
        account_name: &str,
        server_id: &str,
    ) -> Result<Value, OssError> {
        let plant = self.report(DEVICES_ERROR_TITLE, plant_request(plant_id, account_name, server_id))?;
        self.devices_by_plant(&plant).await
    }

    pub async fn devices_by_plant(&self, plant: &PlantRequest) -> Result<Value, OssError> {
        let result = self.fetch_devices(plant).await;
        let body = self.report(DEVICES_ERROR_TITLE, result)?;
        if is_blank(body.get("obj").and_then(|obj| obj.get("datas"))) {
            self.error_log
                .log_warning(DEVICES_ERROR_TITLE, "No devices found for the given plant");
        }
        Ok(body)
    }

    /// Serial-number search, then the active equipment of the plant it belongs to.
    pub async fn first_active_equipment(&self, serial_number: &str) -> Result<Vec<Value>, OssError> {
        let entry = self.resolve_plant(serial_number).await?;
        let body = self.active_equipment_for(&entry.request).await?;
        Ok(data_items(&body))
    }

    /// Serial-number search, then the plant identity plus its active equipment.
    pub async fn plant_info(&self, serial_number: &str) -> Result<PlantInfo, OssError> {
        let entry = self.resolve_plant(serial_number).await?;
        let body = self.active_equipment_for(&entry.request).await?;
        Ok(PlantInfo::new(entry, data_items(&body)))
    }

    /// Resolve the plant a serial number belongs to.
    pub async fn resolve_plant(&self, serial_number: &str) -> Result<PlantEntry, OssError> {
        let body = self.search_serial_number(serial_number).await?;
        let entry = self.report(PLANT_LOOKUP_ERROR_TITLE, PlantEntry::from_search_response(&body))?;
        info!(
            "serial number {} belongs to plant {} (account {}, server {})",
            serial_number, entry.request.plant_id, entry.request.username, entry.request.server_id
        );
        Ok(entry)
    }

    async fn fetch_active_equipment(&self, plant_id: &str, account_name: &str) -> Result<Value, OssError> {
        let plant_id = required("plantId", plant_id)?;
        let account_name = required("accountName", account_name)?;
        let token = self.tokens.token().await?;
        let request = self
            .http
            .get(ACTIVE_EQUIPMENT.url(&self.credentials.base_url))
            .bearer_auth(token)
            .header(CONTENT_TYPE, FORM_URLENCODED)
            .query(&[("accountName", account_name), ("plantId", plant_id)]);
        send_json(&ACTIVE_EQUIPMENT, request).await
    }

    async fn fetch_search(&self, serial_number: &str) -> Result<Value, OssError> {
        let serial_number = required("serialNumber", serial_number)?;
        let token = self.tokens.token().await?;
        let request = self
            .http
            .post(SEARCH_INVERTER.url(&self.credentials.base_url))
            .bearer_auth(token)
            .form(&[
                ("serverID", SEARCH_SERVER_ID),
                ("type", SEARCH_TYPE),
                ("deviceSN", serial_number),
            ]);
        send_json(&SEARCH_INVERTER, request).await
    }

    async fn fetch_devices(&self, plant: &PlantRequest) -> Result<Value, OssError> {
        let plant_id = required("plantId", &plant.plant_id)?;
        let username = required("username", &plant.username)?;
        let token = self.tokens.token().await?;
        let server_id = plant.server_id.to_string();
        let request = self
            .http
            .get(DEVICES_BY_PLANT.url(&self.credentials.base_url))
            .bearer_auth(token)
            .header(CONTENT_TYPE, FORM_URLENCODED)
            .query(&[
                ("serverId", server_id.as_str()),
                ("plantId", plant_id),
                ("username", username),
                ("currPage", FIRST_PAGE),
            ]);
        send_json(&DEVICES_BY_PLANT, request).await
    }

    fn report<T>(&self, title: &str, result: Result<T, OssError>) -> Result<T, OssError> {
        result.inspect_err(|err| self.error_log.log_error(title, &err.to_string()))
    }
}

fn plant_request(plant_id: &str, account_name: &str, server_id: &str) -> Result<PlantRequest, OssError> {
    let raw = required("serverId", server_id)?;
    let server_id = raw.parse::<u64>().map_err(|_| OssError::InvalidParameter {
        name: "serverId",
        value: raw.to_string(),
    })?;
    Ok(PlantRequest::new(account_name.trim(), plant_id.trim(), server_id))
}

fn required<'a>(name: &'static str, value: &'a str) -> Result<&'a str, OssError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(OssError::MissingParameter(name));
    }
    Ok(value)
}

fn data_items(body: &Value) -> Vec<Value> {
    body.get("data")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
