use std::time::Duration;

use anyhow::Result;
use tessera_auth::{OatPrefix, SecurityConfig, TokenService};

use crate::cli::{OatArgs, OatCommands};
use crate::output::print_value;

pub async fn run(service: &TokenService, security: &SecurityConfig, args: &OatArgs) -> Result<()> {
    match &args.command {
        OatCommands::Issue(a) => {
            let ttl = a.ttl.unwrap_or(security.oat_ttl);
            let token = issue(service, &OatPrefix::new(a.prefix.as_str()), &a.payload, ttl).await?;
            print_value(&token);
        }
        OatCommands::Verify(a) => {
            let payload = verify(service, &OatPrefix::new(a.prefix.as_str()), &a.token).await?;
            print_value(&payload);
        }
    }
    Ok(())
}

pub async fn issue(
    service: &TokenService,
    prefix: &OatPrefix,
    payload: &str,
    ttl: Duration,
) -> Result<String> {
    let token = service.generate_oat(prefix, payload, ttl).await?;
    tracing::info!(prefix = %prefix, ttl = ?ttl, "issued opaque access token");
    Ok(token)
}

pub async fn verify(service: &TokenService, prefix: &OatPrefix, token: &str) -> Result<String> {
    Ok(service.verify_oat(prefix, token).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tessera_auth::{TokenError, TokenSecrets};
    use tessera_cache::LocalCache;

    fn service() -> TokenService {
        TokenService::new(TokenSecrets::new("oat", "spt"), Arc::new(LocalCache::new()))
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let service = service();
        let prefix = OatPrefix::new("session");

        let token = issue(&service, &prefix, "sid-1", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(verify(&service, &prefix, &token).await.unwrap(), "sid-1");
    }

    #[tokio::test]
    async fn test_verify_unknown_token_keeps_token_error() {
        let err = verify(&service(), &OatPrefix::ACCESS_TOKEN, "bm9wZQ")
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<TokenError>().unwrap().is_invalid_token());
    }
}
