use futures::future::BoxFuture;
use reqwest::Method;

use crate::client::{AuthenticatedClient, Query};
use crate::models::ListRunsResponse;
use crate::types::{Kwargs, Module, Output, Param, TypeHint};
use crate::ApiResult;

pub fn module() -> Module {
    Module::new(
        "list_runs",
        sync,
        vec![
            Param::client(),
            Param::new("name", TypeHint::Str),
            Param::new("page", TypeHint::unset_or(TypeHint::Int)),
            Param::new("page_size", TypeHint::unset_or(TypeHint::Int)),
        ],
    )
}

pub async fn call(
    client: &AuthenticatedClient,
    name: &str,
    page: Option<i64>,
    page_size: Option<i64>,
) -> ApiResult<Option<ListRunsResponse>> {
    let path = format!("/apps/{}/runs", urlencoding::encode(name));
    let params = Query::new()
        .push_opt("page", page)
        .push_opt("page_size", page_size);
    client.request(Method::GET, &path, &params, None).await
}

fn sync(client: &AuthenticatedClient, mut kwargs: Kwargs) -> BoxFuture<'_, ApiResult<Output>> {
    Box::pin(async move {
        let name: String = kwargs.required("name")?;
        let page = kwargs.optional("page")?;
        let page_size = kwargs.optional("page_size")?;
        kwargs.finish()?;
        Ok(Output::from_model(
            call(client, &name, page, page_size).await?,
        ))
    })
}
