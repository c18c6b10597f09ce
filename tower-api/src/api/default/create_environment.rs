use futures::future::BoxFuture;
use reqwest::Method;

use crate::client::{AuthenticatedClient, Query};
use crate::models::{CreateEnvironmentParams, CreateEnvironmentResponse};
use crate::types::{DataModel, Kwargs, Module, Output, Param, TypeHint};
use crate::ApiResult;

pub fn module() -> Module {
    Module::new(
        "create_environment",
        sync,
        vec![
            Param::client(),
            Param::new("body", TypeHint::model::<CreateEnvironmentParams>()),
        ],
    )
}

pub async fn call(
    client: &AuthenticatedClient,
    body: &CreateEnvironmentParams,
) -> ApiResult<Option<CreateEnvironmentResponse>> {
    let body = body.to_generic()?;
    client
        .request(Method::POST, "/environments", &Query::new(), Some(body.into()))
        .await
}

fn sync(client: &AuthenticatedClient, mut kwargs: Kwargs) -> BoxFuture<'_, ApiResult<Output>> {
    Box::pin(async move {
        let body: CreateEnvironmentParams = kwargs.model("body")?;
        kwargs.finish()?;
        Ok(Output::from_model(call(client, &body).await?))
    })
}
