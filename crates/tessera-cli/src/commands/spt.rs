use std::time::Duration;

use anyhow::Result;
use tessera_auth::{SecurityConfig, SptPrefix, TokenService};

use crate::cli::{SptArgs, SptCommands};
use crate::output::{print_success, print_value};

pub async fn run(service: &TokenService, security: &SecurityConfig, args: &SptArgs) -> Result<()> {
    match &args.command {
        SptCommands::Issue(a) => {
            let ttl = a.ttl.unwrap_or(security.spt_ttl);
            let token = issue(service, &SptPrefix::new(a.prefix.as_str()), &a.payload, ttl).await?;
            print_value(&token);
        }
        SptCommands::Verify(a) => {
            let payload = verify(service, &SptPrefix::new(a.prefix.as_str()), &a.token).await?;
            print_value(&payload);
        }
        SptCommands::Revoke(a) => {
            revoke(service, &SptPrefix::new(a.prefix.as_str()), &a.payload).await?;
            print_success(&format!("Revoked {} tokens for {}", a.prefix, a.payload));
        }
    }
    Ok(())
}

pub async fn issue(
    service: &TokenService,
    prefix: &SptPrefix,
    payload: &str,
    ttl: Duration,
) -> Result<String> {
    let token = service.generate_spt(prefix, payload, ttl).await?;
    tracing::info!(prefix = %prefix, ttl = ?ttl, "issued single-purpose token");
    Ok(token)
}

pub async fn verify(service: &TokenService, prefix: &SptPrefix, token: &str) -> Result<String> {
    Ok(service.verify_spt(prefix, token).await?)
}

pub async fn revoke(service: &TokenService, prefix: &SptPrefix, payload: &str) -> Result<()> {
    service.revoke_spt(prefix, payload).await?;
    Ok(())
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
    async fn test_issue_verify_revoke() {
        let service = service();
        let prefix = SptPrefix::new("pwd-reset");

        let token = issue(&service, &prefix, "user-42", Duration::from_secs(900))
            .await
            .unwrap();
        assert_eq!(verify(&service, &prefix, &token).await.unwrap(), "user-42");

        revoke(&service, &prefix, "user-42").await.unwrap();
        let err = verify(&service, &prefix, &token).await.unwrap_err();
        assert!(err.downcast_ref::<TokenError>().unwrap().is_invalid_token());
    }

    #[tokio::test]
    async fn test_issue_rejects_dotted_payload() {
        let err = issue(
            &service(),
            &SptPrefix::EMAIL_VERIFICATION,
            "jane.doe@example.com",
            Duration::from_secs(60),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TokenError>(),
            Some(TokenError::InvalidInput { .. })
        ));
    }
}
