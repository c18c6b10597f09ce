use futures::future::BoxFuture;
use reqwest::Method;

use crate::client::{AuthenticatedClient, Query};
use crate::models::ListEnvironmentsResponse;
use crate::types::{Kwargs, Module, Output, Param};
use crate::ApiResult;

pub fn module() -> Module {
    Module::new("list_environments", sync, vec![Param::client()])
}

pub async fn call(client: &AuthenticatedClient) -> ApiResult<Option<ListEnvironmentsResponse>> {
    client
        .request(Method::GET, "/environments", &Query::new(), None)
        .await
}

fn sync(client: &AuthenticatedClient, kwargs: Kwargs) -> BoxFuture<'_, ApiResult<Output>> {
    Box::pin(async move {
        kwargs.finish()?;
        Ok(Output::from_model(call(client).await?))
    })
}
