use crate::{Document, stage::PlanStage};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

/// The `queryPlanner` section: how the query was planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPlanner {
    pub namespace: String,
    pub parsed_query: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_filter_set: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_time_millis: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_indexed_or_solutions_reached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_indexed_and_solutions_reached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_scans_to_explode_reached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pruned_similar_indexes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_cache_shape_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_cache_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_hash: Option<String>,
    pub winning_plan: CandidatePlan,
    /// Plans the planner considered and discarded, in the same shape as the winner.
    #[serde(default)]
    pub rejected_plans: Vec<CandidatePlan>,
    #[serde(flatten)]
    pub extra: Document,
}

/// Planner booleans with absent flags read as `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerFlags {
    pub index_filter_set: bool,
    pub max_indexed_or_solutions_reached: bool,
    pub max_indexed_and_solutions_reached: bool,
    pub max_scans_to_explode_reached: bool,
    pub pruned_similar_indexes: bool,
}

impl QueryPlanner {
    /// Database part of `namespace` (`db.collection`).
    pub fn database(&self) -> &str {
        self.namespace
            .split_once('.')
            .map_or(self.namespace.as_str(), |(db, _)| db)
    }

    /// Collection part of `namespace`. Collection names may themselves contain dots.
    pub fn collection(&self) -> Option<&str> {
        self.namespace.split_once('.').map(|(_, coll)| coll)
    }

    pub fn flags(&self) -> PlannerFlags {
        PlannerFlags {
            index_filter_set: self.index_filter_set.unwrap_or(false),
            max_indexed_or_solutions_reached: self
                .max_indexed_or_solutions_reached
                .unwrap_or(false),
            max_indexed_and_solutions_reached: self
                .max_indexed_and_solutions_reached
                .unwrap_or(false),
            max_scans_to_explode_reached: self.max_scans_to_explode_reached.unwrap_or(false),
            pruned_similar_indexes: self.pruned_similar_indexes.unwrap_or(false),
        }
    }

    /// True when the planner stopped enumerating solutions because a limit was hit.
    pub fn hit_plan_limits(&self) -> bool {
        let flags = self.flags();
        flags.max_indexed_or_solutions_reached
            || flags.max_indexed_and_solutions_reached
            || flags.max_scans_to_explode_reached
    }
}

/// A winning or rejected plan, either in the classic shape (a bare stage tree)
/// or the slot-based shape (`queryPlan` + `slotBasedPlan`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CandidatePlan {
    SlotBased(SlotBasedPlan),
    Classic(PlanStage),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotBasedPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_cached: Option<bool>,
    pub query_plan: PlanStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_based_plan: Option<Value>,
    #[serde(flatten)]
    pub extra: Document,
}

impl CandidatePlan {
    /// Root of the classic stage tree, whichever shape the server emitted.
    pub fn stage(&self) -> &PlanStage {
        match self {
            CandidatePlan::SlotBased(plan) => &plan.query_plan,
            CandidatePlan::Classic(stage) => stage,
        }
    }

    pub fn is_cached(&self) -> bool {
        match self {
            CandidatePlan::SlotBased(plan) => plan.is_cached.unwrap_or(false),
            CandidatePlan::Classic(stage) => stage.is_cached.unwrap_or(false),
        }
    }

    pub fn is_slot_based(&self) -> bool {
        matches!(self, CandidatePlan::SlotBased(_))
    }
}

impl<'de> Deserialize<'de> for CandidatePlan {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The shape is decided by the presence of `queryPlan`; an untagged
        // enum would hide the real field error behind "no variant matched".
        let value = Value::deserialize(deserializer)?;
        if value.get("queryPlan").is_some() {
            SlotBasedPlan::deserialize(value)
                .map(CandidatePlan::SlotBased)
                .map_err(D::Error::custom)
        } else {
            PlanStage::deserialize(value)
                .map(CandidatePlan::Classic)
                .map_err(D::Error::custom)
        }
    }
}
