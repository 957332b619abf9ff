//! In-Memory Secret Store

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::{Provider, SecretStoreError, SecretStorePort};

/// 内存密钥存储（进程退出即丢失）
pub struct InMemorySecretStore {
    /// resource name -> key
    secrets: DashMap<&'static str, String>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self {
            secrets: DashMap::new(),
        }
    }
}

impl Default for InMemorySecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStorePort for InMemorySecretStore {
    async fn put(&self, provider: Provider, secret: &str) -> Result<(), SecretStoreError> {
        self.secrets
            .insert(provider.resource_name(), secret.to_string());
        Ok(())
    }

    async fn get(&self, provider: Provider) -> Result<Option<String>, SecretStoreError> {
        Ok(self
            .secrets
            .get(provider.resource_name())
            .map(|entry| entry.value().clone()))
    }

    async fn delete(&self, provider: Provider) -> Result<(), SecretStoreError> {
        self.secrets.remove(provider.resource_name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_providers_are_isolated() {
        let store = InMemorySecretStore::new();
        store.put(Provider::Content, "c").await.unwrap();

        assert!(store.has(Provider::Content).await.unwrap());
        assert!(!store.has(Provider::Generation).await.unwrap());

        store.delete(Provider::Content).await.unwrap();
        assert_eq!(store.get(Provider::Content).await.unwrap(), None);
    }
}
