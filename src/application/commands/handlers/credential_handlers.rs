//! Credential Command Handlers - 认证与 key 管理

use std::sync::Arc;

use crate::application::commands::{Authenticate, ForgetCredential};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ImageGeneratorPort, Provider, RemoteContentPort, SecretStorePort,
};

// ============================================================================
// Authenticate
// ============================================================================

/// 认证响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticateResponse {
    pub provider: Provider,
    /// 本次是否把 key 写入了密钥存储
    pub remembered: bool,
}

/// Authenticate Handler
///
/// 显式 key 优先，否则读取密钥存储中的 key
pub struct AuthenticateHandler {
    remote: Arc<dyn RemoteContentPort>,
    generator: Arc<dyn ImageGeneratorPort>,
    secrets: Arc<dyn SecretStorePort>,
}

impl AuthenticateHandler {
    pub fn new(
        remote: Arc<dyn RemoteContentPort>,
        generator: Arc<dyn ImageGeneratorPort>,
        secrets: Arc<dyn SecretStorePort>,
    ) -> Self {
        Self {
            remote,
            generator,
            secrets,
        }
    }

    pub async fn handle(&self, command: Authenticate) -> Result<AuthenticateResponse, ApplicationError> {
        let provider = command.provider;
        let explicit = command
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let (api_key, from_store) = match explicit {
            Some(key) => (key, false),
            None => {
                let stored = self.secrets.get(provider).await?.ok_or_else(|| {
                    ApplicationError::validation(format!("No API key available for {}", provider))
                })?;
                (stored, true)
            }
        };

        match provider {
            Provider::Content => self.remote.authenticate(&api_key).await?,
            Provider::Generation => self.generator.authenticate(&api_key).await?,
        }

        let remembered = command.remember && !from_store;
        if remembered {
            self.secrets.put(provider, &api_key).await?;
        }

        tracing::info!(
            provider = %provider,
            from_store = from_store,
            remembered = remembered,
            "Authenticated"
        );

        Ok(AuthenticateResponse {
            provider,
            remembered,
        })
    }
}

// ============================================================================
// ForgetCredential
// ============================================================================

/// ForgetCredential Handler
pub struct ForgetCredentialHandler {
    secrets: Arc<dyn SecretStorePort>,
}

impl ForgetCredentialHandler {
    pub fn new(secrets: Arc<dyn SecretStorePort>) -> Self {
        Self { secrets }
    }

    pub async fn handle(&self, command: ForgetCredential) -> Result<(), ApplicationError> {
        self.secrets.delete(command.provider).await?;
        tracing::info!(provider = %command.provider, "Credential forgotten");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{
        FakeImageClient, InMemorySecretStore, RecordingContentClient,
    };

    struct Fixture {
        remote: Arc<RecordingContentClient>,
        generator: Arc<FakeImageClient>,
        secrets: Arc<InMemorySecretStore>,
        handler: AuthenticateHandler,
    }

    fn fixture() -> Fixture {
        let remote = Arc::new(RecordingContentClient::unauthenticated());
        let generator = Arc::new(FakeImageClient::unauthenticated());
        let secrets = Arc::new(InMemorySecretStore::new());
        let handler = AuthenticateHandler::new(remote.clone(), generator.clone(), secrets.clone());
        Fixture {
            remote,
            generator,
            secrets,
            handler,
        }
    }

    #[tokio::test]
    async fn test_explicit_key_is_remembered() {
        let f = fixture();
        let response = f
            .handler
            .handle(Authenticate {
                provider: Provider::Content,
                api_key: Some(" key-1 ".to_string()),
                remember: true,
            })
            .await
            .unwrap();

        assert!(response.remembered);
        assert!(f.remote.is_authenticated());
        assert!(!f.generator.is_authenticated());
        assert_eq!(
            f.secrets.get(Provider::Content).await.unwrap().as_deref(),
            Some("key-1")
        );
    }

    #[tokio::test]
    async fn test_stored_key_used_when_none_given() {
        let f = fixture();
        f.secrets.put(Provider::Generation, "stored").await.unwrap();

        let response = f
            .handler
            .handle(Authenticate {
                provider: Provider::Generation,
                api_key: None,
                remember: true,
            })
            .await
            .unwrap();

        assert!(!response.remembered);
        assert!(f.generator.is_authenticated());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_remote_call() {
        let f = fixture();
        let err = f
            .handler
            .handle(Authenticate {
                provider: Provider::Content,
                api_key: Some("   ".to_string()),
                remember: false,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert!(f.remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_forget_is_idempotent() {
        let f = fixture();
        f.secrets.put(Provider::Content, "k").await.unwrap();
        let handler = ForgetCredentialHandler::new(f.secrets.clone());

        for _ in 0..2 {
            handler
                .handle(ForgetCredential {
                    provider: Provider::Content,
                })
                .await
                .unwrap();
        }
        assert!(!f.secrets.has(Provider::Content).await.unwrap());
    }
}
