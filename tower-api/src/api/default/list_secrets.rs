use futures::future::BoxFuture;
use reqwest::Method;

use crate::client::{AuthenticatedClient, Query};
use crate::models::ListSecretsResponse;
use crate::types::{Kwargs, Module, Output, Param, TypeHint};
use crate::ApiResult;

pub fn module() -> Module {
    Module::new(
        "list_secrets",
        sync,
        vec![
            Param::client(),
            Param::new("environment", TypeHint::unset_or(TypeHint::Str)),
            Param::new("all_", TypeHint::unset_or(TypeHint::Bool)),
            Param::new("page", TypeHint::unset_or(TypeHint::Int)),
            Param::new("page_size", TypeHint::unset_or(TypeHint::Int)),
        ],
    )
}

/// List secrets; `all` spans every environment
pub async fn call(
    client: &AuthenticatedClient,
    environment: Option<String>,
    all: Option<bool>,
    page: Option<i64>,
    page_size: Option<i64>,
) -> ApiResult<Option<ListSecretsResponse>> {
    let params = Query::new()
        .push_opt("environment", environment)
        .push_opt("all", all)
        .push_opt("page", page)
        .push_opt("page_size", page_size);
    client.request(Method::GET, "/secrets", &params, None).await
}

fn sync(client: &AuthenticatedClient, mut kwargs: Kwargs) -> BoxFuture<'_, ApiResult<Output>> {
    Box::pin(async move {
        let environment = kwargs.optional("environment")?;
        let all = kwargs.optional("all_")?;
        let page = kwargs.optional("page")?;
        let page_size = kwargs.optional("page_size")?;
        kwargs.finish()?;
        Ok(Output::from_model(
            call(client, environment, all, page, page_size).await?,
        ))
    })
}
