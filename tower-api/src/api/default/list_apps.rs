use futures::future::BoxFuture;
use reqwest::Method;

use crate::client::{AuthenticatedClient, Query};
use crate::models::ListAppsResponse;
use crate::types::{Kwargs, Module, Output, Param, TypeHint};
use crate::ApiResult;

pub fn module() -> Module {
    Module::new(
        "list_apps",
        sync,
        vec![
            Param::client(),
            Param::new("page", TypeHint::unset_or(TypeHint::Int)),
            Param::new("page_size", TypeHint::unset_or(TypeHint::Int)),
            Param::new("query", TypeHint::unset_or(TypeHint::Str)),
            Param::new("filter_", TypeHint::unset_or(TypeHint::Str)),
        ],
    )
}

/// List the apps visible to the caller
pub async fn call(
    client: &AuthenticatedClient,
    page: Option<i64>,
    page_size: Option<i64>,
    query: Option<String>,
    filter: Option<String>,
) -> ApiResult<Option<ListAppsResponse>> {
    let params = Query::new()
        .push_opt("page", page)
        .push_opt("page_size", page_size)
        .push_opt("query", query)
        .push_opt("filter", filter);
    client.request(Method::GET, "/apps", &params, None).await
}

fn sync(client: &AuthenticatedClient, mut kwargs: Kwargs) -> BoxFuture<'_, ApiResult<Output>> {
    Box::pin(async move {
        let page = kwargs.optional("page")?;
        let page_size = kwargs.optional("page_size")?;
        let query = kwargs.optional("query")?;
        let filter = kwargs.optional("filter_")?;
        kwargs.finish()?;
        Ok(Output::from_model(
            call(client, page, page_size, query, filter).await?,
        ))
    })
}
