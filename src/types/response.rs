use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CommonResponse {
    pub code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct ResourceResponse<T: Serialize + DeserializeOwned> {
    pub code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub data: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthzResponse {
    pub version: String,
    pub client_ip: Option<String>,
    pub namespace_configured: bool,
}
