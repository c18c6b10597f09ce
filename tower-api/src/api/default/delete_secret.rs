use futures::future::BoxFuture;
use reqwest::Method;

use crate::client::{AuthenticatedClient, Query};
use crate::types::{Kwargs, Module, Output, Param, TypeHint};
use crate::ApiResult;

pub fn module() -> Module {
    Module::new(
        "delete_secret",
        sync,
        vec![
            Param::client(),
            Param::new("name", TypeHint::Str),
            Param::new("environment", TypeHint::unset_or(TypeHint::Str)),
        ],
    )
}

pub async fn call(
    client: &AuthenticatedClient,
    name: &str,
    environment: Option<String>,
) -> ApiResult<()> {
    let path = format!("/secrets/{}", urlencoding::encode(name));
    let params = Query::new().push_opt("environment", environment);
    client.send(Method::DELETE, &path, &params, None).await
}

fn sync(client: &AuthenticatedClient, mut kwargs: Kwargs) -> BoxFuture<'_, ApiResult<Output>> {
    Box::pin(async move {
        let name: String = kwargs.required("name")?;
        let environment = kwargs.optional("environment")?;
        kwargs.finish()?;
        call(client, &name, environment).await?;
        Ok(Output::None)
    })
}
