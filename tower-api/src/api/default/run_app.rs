use futures::future::BoxFuture;
use reqwest::Method;

use crate::client::{AuthenticatedClient, Query};
use crate::models::{RunAppParams, RunAppResponse};
use crate::types::{DataModel, Kwargs, Module, Output, Param, TypeHint};
use crate::ApiResult;

pub fn module() -> Module {
    Module::new(
        "run_app",
        sync,
        vec![
            Param::client(),
            Param::new("name", TypeHint::Str),
            Param::new("body", TypeHint::unset_or(TypeHint::model::<RunAppParams>())),
        ],
    )
}

/// Schedule a run; without a body the app runs in its default environment
pub async fn call(
    client: &AuthenticatedClient,
    name: &str,
    body: Option<&RunAppParams>,
) -> ApiResult<Option<RunAppResponse>> {
    let path = format!("/apps/{}/runs", urlencoding::encode(name));
    let body = match body {
        Some(body) => body.to_generic()?,
        None => RunAppParams::default().to_generic()?,
    };
    client
        .request(Method::POST, &path, &Query::new(), Some(body.into()))
        .await
}

fn sync(client: &AuthenticatedClient, mut kwargs: Kwargs) -> BoxFuture<'_, ApiResult<Output>> {
    Box::pin(async move {
        let name: String = kwargs.required("name")?;
        let body: Option<RunAppParams> = kwargs.optional_model("body")?;
        kwargs.finish()?;
        Ok(Output::from_model(call(client, &name, body.as_ref()).await?))
    })
}
