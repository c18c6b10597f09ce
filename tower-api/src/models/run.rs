use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{model, Pagination};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub app_name: String,
    pub number: i64,
    pub status: String,
    pub scheduled_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunAppParams {
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

fn default_environment() -> String {
    "default".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunAppResponse {
    pub run: Run,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRunsResponse {
    pub runs: Vec<Run>,
    pub pages: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescribeRunResponse {
    pub run: Run,
}

model!(
    Run,
    RunAppParams,
    RunAppResponse,
    ListRunsResponse,
    DescribeRunResponse,
);
