//! Request and response bodies

mod app;
mod environment;
mod run;
mod secret;

pub use app::{App, CreateAppParams, CreateAppResponse, DescribeAppResponse, ListAppsResponse};
pub use environment::{
    CreateEnvironmentParams, CreateEnvironmentResponse, Environment, ListEnvironmentsResponse,
};
pub use run::{DescribeRunResponse, ListRunsResponse, Run, RunAppParams, RunAppResponse};
pub use secret::{
    CreateSecretParams, CreateSecretResponse, DescribeSecretsKeyResponse, ListSecretsResponse,
    Secret,
};

use serde::{Deserialize, Serialize};

/// Implement [`Model`](crate::Model) using the type's own name
macro_rules! model {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $crate::types::Model for $ty {
                const NAME: &'static str = stringify!($ty);
            }
        )+
    };
}
pub(crate) use model;

/// Paging information returned by list endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub num_pages: i64,
    pub total: i64,
}

model!(Pagination);
