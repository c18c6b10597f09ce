use serde::{Deserialize, Serialize};

use super::{model, Pagination};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,
    pub environment: String,
    /// Masked form of the value, safe to display
    pub preview: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSecretsResponse {
    pub secrets: Vec<Secret>,
    pub pages: Pagination,
}

/// `encrypted_value` is produced client-side against the key from
/// `describe_secrets_key`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSecretParams {
    pub name: String,
    pub environment: String,
    pub encrypted_value: String,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSecretResponse {
    pub secret: Secret,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescribeSecretsKeyResponse {
    /// PEM-encoded RSA public key
    pub public_key: String,
}

model!(
    Secret,
    ListSecretsResponse,
    CreateSecretParams,
    CreateSecretResponse,
    DescribeSecretsKeyResponse,
);
