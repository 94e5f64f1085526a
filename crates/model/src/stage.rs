use crate::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Reason attached to an EOF stage when the queried collection does not exist.
pub const EOF_NONEXISTENT_NAMESPACE: &str = "nonExistentNamespace";

macro_rules! stage_names {
    ($($(#[$meta:meta])* $variant:ident => $name:literal),+ $(,)?) => {
        /// Tag of a plan stage, taken from the `stage` key.
        ///
        /// Names the server emits that are not listed here are kept verbatim in
        /// [`StageName::Other`].
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum StageName {
            $($(#[$meta])* $variant,)+
            Other(String),
        }

        impl StageName {
            pub fn as_str(&self) -> &str {
                match self {
                    $(StageName::$variant => $name,)+
                    StageName::Other(name) => name,
                }
            }
        }

        impl From<String> for StageName {
            fn from(name: String) -> Self {
                match name.as_str() {
                    $($name => StageName::$variant,)+
                    _ => StageName::Other(name),
                }
            }
        }
    };
}

stage_names! {
    /// Terminal stage producing no documents.
    Eof => "EOF",
    CollScan => "COLLSCAN",
    IxScan => "IXSCAN",
    Fetch => "FETCH",
    /// Blocking in-memory sort.
    Sort => "SORT",
    SortKeyGenerator => "SORT_KEY_GENERATOR",
    Limit => "LIMIT",
    Skip => "SKIP",
    ProjectionSimple => "PROJECTION_SIMPLE",
    ProjectionDefault => "PROJECTION_DEFAULT",
    ProjectionCovered => "PROJECTION_COVERED",
    Or => "OR",
    AndHash => "AND_HASH",
    AndSorted => "AND_SORTED",
    SortMerge => "SORT_MERGE",
    Count => "COUNT",
    CountScan => "COUNT_SCAN",
    DistinctScan => "DISTINCT_SCAN",
    ShardingFilter => "SHARDING_FILTER",
    Subplan => "SUBPLAN",
    CachedPlan => "CACHED_PLAN",
    IdHack => "IDHACK",
    ExpressIxScan => "EXPRESS_IXSCAN",
    ExpressClusteredIxScan => "EXPRESS_CLUSTERED_IXSCAN",
    Group => "GROUP",
    TextMatch => "TEXT_MATCH",
}

impl StageName {
    /// Stages that read through an index.
    pub fn is_index_access(&self) -> bool {
        matches!(
            self,
            StageName::IxScan
                | StageName::CountScan
                | StageName::DistinctScan
                | StageName::ExpressIxScan
                | StageName::ExpressClusteredIxScan
                | StageName::IdHack
        )
    }
}

impl From<StageName> for String {
    fn from(name: StageName) -> Self {
        match name {
            StageName::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl From<&str> for StageName {
    fn from(name: &str) -> Self {
        StageName::from(name.to_string())
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of an index key pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    #[serde(rename = "simple index")]
    Simple,
    #[serde(rename = "hashed index")]
    Hashed,
    #[serde(rename = "compound index")]
    Compound,
}

impl IndexKind {
    /// Classifies a key pattern such as `{"trip_time": 1}` or `{"a": "hashed"}`.
    /// Returns `None` for an empty pattern.
    pub fn classify(pattern: &Document) -> Option<IndexKind> {
        let mut keys = pattern.values();
        let first = keys.next()?;
        if keys.next().is_some() {
            return Some(IndexKind::Compound);
        }
        match first.as_str() {
            Some("hashed") => Some(IndexKind::Hashed),
            _ => Some(IndexKind::Simple),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Simple => "simple index",
            IndexKind::Hashed => "hashed index",
            IndexKind::Compound => "compound index",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a plan tree, as found under `winningPlan`, `rejectedPlans` and
/// `executionStages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStage {
    pub stage: StageName,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_cached: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_returned: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_millis_estimate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub works: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_yield: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_state: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_state: Option<u64>,
    #[serde(rename = "isEOF", default, skip_serializing_if = "Option::is_none")]
    pub eof: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_examined: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys_examined: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_pattern: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_bounds: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_multi_key: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_pattern: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_memory_usage_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_data_size_sorted: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_disk: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_stage: Option<Box<PlanStage>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_stages: Vec<PlanStage>,

    /// Stage-specific keys without a dedicated field.
    #[serde(flatten)]
    pub extra: Document,
}

impl PlanStage {
    /// Bare stage with no counters or children.
    pub fn new(stage: impl Into<StageName>) -> Self {
        PlanStage {
            stage: stage.into(),
            kind: None,
            is_cached: None,
            n_returned: None,
            execution_time_millis_estimate: None,
            works: None,
            advanced: None,
            need_time: None,
            need_yield: None,
            save_state: None,
            restore_state: None,
            eof: None,
            docs_examined: None,
            keys_examined: None,
            index_name: None,
            key_pattern: None,
            index_bounds: None,
            direction: None,
            is_multi_key: None,
            sort_pattern: None,
            mem_limit: None,
            max_memory_usage_bytes: None,
            total_data_size_sorted: None,
            used_disk: None,
            filter: None,
            input_stage: None,
            input_stages: Vec::new(),
            extra: Document::new(),
        }
    }

    pub fn with_input(mut self, child: PlanStage) -> Self {
        self.input_stage = Some(Box::new(child));
        self
    }

    pub fn is_eof(&self) -> bool {
        self.eof == Some(1)
    }

    /// True for an EOF stage produced because the namespace does not exist.
    pub fn is_nonexistent_namespace(&self) -> bool {
        self.stage == StageName::Eof && self.kind.as_deref() == Some(EOF_NONEXISTENT_NAMESPACE)
    }

    pub fn index_kind(&self) -> Option<IndexKind> {
        self.key_pattern.as_ref().and_then(IndexKind::classify)
    }

    /// Direct children, `inputStage` first.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &PlanStage> {
        self.input_stage.as_deref().into_iter().chain(self.input_stages.iter())
    }

    /// Pre-order, depth-first walk over this stage and all of its descendants.
    pub fn iter(&self) -> StageIter<'_> {
        StageIter { stack: vec![self] }
    }

    pub fn find(&self, name: &StageName) -> Option<&PlanStage> {
        self.iter().find(|stage| &stage.stage == name)
    }

    pub fn contains(&self, name: &StageName) -> bool {
        self.find(name).is_some()
    }

    /// Number of stages on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        1 + self.children().map(PlanStage::depth).max().unwrap_or(0)
    }
}

pub struct StageIter<'a> {
    stack: Vec<&'a PlanStage>,
}

impl<'a> Iterator for StageIter<'a> {
    type Item = &'a PlanStage;

    fn next(&mut self) -> Option<Self::Item> {
        let stage = self.stack.pop()?;
        self.stack.extend(stage.children().rev());
        Some(stage)
    }
}
