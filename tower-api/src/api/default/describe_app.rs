use futures::future::BoxFuture;
use reqwest::Method;

use crate::client::{AuthenticatedClient, Query};
use crate::models::DescribeAppResponse;
use crate::types::{Kwargs, Module, Output, Param, TypeHint};
use crate::ApiResult;

pub fn module() -> Module {
    Module::new(
        "describe_app",
        sync,
        vec![
            Param::client(),
            Param::new("name", TypeHint::Str),
            Param::new("runs", TypeHint::unset_or(TypeHint::Int)),
        ],
    )
}

/// Fetch one app with its most recent `runs` runs
pub async fn call(
    client: &AuthenticatedClient,
    name: &str,
    runs: Option<i64>,
) -> ApiResult<Option<DescribeAppResponse>> {
    let path = format!("/apps/{}", urlencoding::encode(name));
    let params = Query::new().push_opt("runs", runs);
    client.request(Method::GET, &path, &params, None).await
}

fn sync(client: &AuthenticatedClient, mut kwargs: Kwargs) -> BoxFuture<'_, ApiResult<Output>> {
    Box::pin(async move {
        let name: String = kwargs.required("name")?;
        let runs = kwargs.optional("runs")?;
        kwargs.finish()?;
        Ok(Output::from_model(call(client, &name, runs).await?))
    })
}
