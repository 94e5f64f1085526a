use crate::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub host: String,
    pub port: u16,
    pub version: String,
    pub git_version: String,
    #[serde(flatten)]
    pub extra: Document,
}

impl ServerInfo {
    /// `host:port` of the server that produced the report.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Major version number, e.g. `8` for `8.2.1`.
    pub fn major_version(&self) -> Option<u32> {
        self.version.split('.').next()?.parse().ok()
    }
}

/// Open set of query knobs reported under `serverParameters`.
///
/// Every key is kept, including ones this crate has never heard of.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerParameters {
    inner: Document,
}

/// Key naming the active query execution framework.
pub const FRAMEWORK_CONTROL: &str = "internalQueryFrameworkControl";

impl ServerParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: Value) {
        self.inner.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.inner.get(key).and_then(Value::as_u64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.inner.get(key).and_then(Value::as_str)
    }

    pub fn framework_control(&self) -> Option<&str> {
        self.get_str(FRAMEWORK_CONTROL)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.inner.keys()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
