use crate::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The originating request echoed back under `command`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<Vec<Value>>,
    #[serde(rename = "$db", default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    #[serde(flatten)]
    pub extra: Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandKind {
    Find,
    Aggregate,
    Other,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        if self.find.is_some() {
            CommandKind::Find
        } else if self.aggregate.is_some() {
            CommandKind::Aggregate
        } else {
            CommandKind::Other
        }
    }

    /// Collection the command targets, if it names one.
    pub fn collection(&self) -> Option<&str> {
        self.find
            .as_deref()
            .or_else(|| self.aggregate.as_ref().and_then(Value::as_str))
    }
}
