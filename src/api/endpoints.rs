//! Vendor endpoint table and the single request path every call goes through.

use http::Method;
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::debug;

use crate::error::OssError;
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;

#[derive(Debug, Clone)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
}

pub const LOGIN: Endpoint = Endpoint {
    name: "login",
    method: Method::POST,
    path: "/oss/login",
};

pub const ACTIVE_EQUIPMENT: Endpoint = Endpoint {
    name: "getActiveEquipaments",
    method: Method::GET,
    path: "/oss/getActiveEquipaments",
};

pub const SEARCH_INVERTER: Endpoint = Endpoint {
    name: "searchInverter",
    method: Method::POST,
    path: "/oss/searchInverter",
};

pub const DEVICES_BY_PLANT: Endpoint = Endpoint {
    name: "getDevicesByPlantList",
    method: Method::GET,
    path: "/oss/getDevicesByPlantList",
};

impl Endpoint {
    /// Joins the configured host and the endpoint path with exactly one slash.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }
}

/// Send one request and parse the JSON body.
///
/// Transport errors and non-2xx statuses become [`OssError::Http`] with the
/// underlying message; an unreadable body becomes [`OssError::Decode`].
pub async fn send_json(endpoint: &Endpoint, request: RequestBuilder) -> Result<Value, OssError> {
    let metrics = get_metrics().await;
    let start = get_instant();
    metrics
        .oss_requests
        .with_label_values(&[endpoint.name, endpoint.method.as_str()])
        .inc();

    let result = execute(endpoint, request).await;

    metrics
        .oss_request_duration
        .with_label_values(&[endpoint.name])
        .observe(start.elapsed().as_secs_f64());
    if let Err(err) = &result {
        metrics
            .oss_request_failures
            .with_label_values(&[endpoint.name, err.reason()])
            .inc();
    }
    result
}

async fn execute(endpoint: &Endpoint, request: RequestBuilder) -> Result<Value, OssError> {
    let response = request
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| OssError::http(endpoint.name, err))?;
    debug!("{} responded {}", endpoint.name, response.status());
    response
        .json::<Value>()
        .await
        .map_err(|err| OssError::decode(endpoint.name, err))
}

/// True when a response field is absent or carries nothing.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
