use futures::future::BoxFuture;
use reqwest::Method;

use crate::client::{AuthenticatedClient, Query};
use crate::models::DescribeRunResponse;
use crate::types::{Kwargs, Module, Output, Param, TypeHint};
use crate::ApiResult;

pub fn module() -> Module {
    Module::new(
        "describe_run",
        sync,
        vec![
            Param::client(),
            Param::new("name", TypeHint::Str),
            Param::new("seq", TypeHint::Int),
        ],
    )
}

pub async fn call(
    client: &AuthenticatedClient,
    name: &str,
    seq: i64,
) -> ApiResult<Option<DescribeRunResponse>> {
    let path = format!("/apps/{}/runs/{}", urlencoding::encode(name), seq);
    client.request(Method::GET, &path, &Query::new(), None).await
}

fn sync(client: &AuthenticatedClient, mut kwargs: Kwargs) -> BoxFuture<'_, ApiResult<Output>> {
    Box::pin(async move {
        let name: String = kwargs.required("name")?;
        let seq = kwargs.required("seq")?;
        kwargs.finish()?;
        Ok(Output::from_model(call(client, &name, seq).await?))
    })
}
