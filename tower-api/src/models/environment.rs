use serde::{Deserialize, Serialize};

use super::model;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvironmentsResponse {
    pub environments: Vec<Environment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEnvironmentParams {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEnvironmentResponse {
    pub environment: Environment,
}

model!(
    Environment,
    ListEnvironmentsResponse,
    CreateEnvironmentParams,
    CreateEnvironmentResponse,
);
