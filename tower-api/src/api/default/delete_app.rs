use futures::future::BoxFuture;
use reqwest::Method;

use crate::client::{AuthenticatedClient, Query};
use crate::types::{Kwargs, Module, Output, Param, TypeHint};
use crate::ApiResult;

pub fn module() -> Module {
    Module::new(
        "delete_app",
        sync,
        vec![Param::client(), Param::new("name", TypeHint::Str)],
    )
}

pub async fn call(client: &AuthenticatedClient, name: &str) -> ApiResult<()> {
    let path = format!("/apps/{}", urlencoding::encode(name));
    client.send(Method::DELETE, &path, &Query::new(), None).await
}

fn sync(client: &AuthenticatedClient, mut kwargs: Kwargs) -> BoxFuture<'_, ApiResult<Output>> {
    Box::pin(async move {
        let name: String = kwargs.required("name")?;
        kwargs.finish()?;
        call(client, &name).await?;
        Ok(Output::None)
    })
}
