use futures::future::BoxFuture;
use reqwest::Method;

use crate::client::{AuthenticatedClient, Query};
use crate::models::DescribeSecretsKeyResponse;
use crate::types::{Kwargs, Module, Output, Param, TypeHint};
use crate::ApiResult;

pub fn module() -> Module {
    Module::new(
        "describe_secrets_key",
        sync,
        vec![
            Param::client(),
            Param::new("format_", TypeHint::unset_or(TypeHint::Str)),
        ],
    )
}

/// Fetch the public key secrets must be encrypted against
pub async fn call(
    client: &AuthenticatedClient,
    format: Option<String>,
) -> ApiResult<Option<DescribeSecretsKeyResponse>> {
    let params = Query::new().push_opt("format", format);
    client
        .request(Method::GET, "/secrets/key", &params, None)
        .await
}

fn sync(client: &AuthenticatedClient, mut kwargs: Kwargs) -> BoxFuture<'_, ApiResult<Output>> {
    Box::pin(async move {
        let format = kwargs.optional("format_")?;
        kwargs.finish()?;
        Ok(Output::from_model(call(client, format).await?))
    })
}
