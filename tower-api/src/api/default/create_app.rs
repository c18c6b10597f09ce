use futures::future::BoxFuture;
use reqwest::Method;

use crate::client::{AuthenticatedClient, Query};
use crate::models::{CreateAppParams, CreateAppResponse};
use crate::types::{DataModel, Kwargs, Module, Output, Param, TypeHint};
use crate::ApiResult;

pub fn module() -> Module {
    Module::new(
        "create_app",
        sync,
        vec![
            Param::client(),
            Param::new("body", TypeHint::model::<CreateAppParams>()),
        ],
    )
}

pub async fn call(
    client: &AuthenticatedClient,
    body: &CreateAppParams,
) -> ApiResult<Option<CreateAppResponse>> {
    let body = body.to_generic()?;
    client
        .request(Method::POST, "/apps", &Query::new(), Some(body.into()))
        .await
}

fn sync(client: &AuthenticatedClient, mut kwargs: Kwargs) -> BoxFuture<'_, ApiResult<Output>> {
    Box::pin(async move {
        let body: CreateAppParams = kwargs.model("body")?;
        kwargs.finish()?;
        Ok(Output::from_model(call(client, &body).await?))
    })
}
