//! File Secret Store - 以 JSON 文件保存 API key
//!
//! 文件内容为 { 资源名: key } 映射，unix 下权限为 0600

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::application::ports::{Provider, SecretStoreError, SecretStorePort};

/// 文件密钥存储
pub struct FileSecretStore {
    path: PathBuf,
    /// 串行化读-改-写
    lock: Mutex<()>,
}

impl FileSecretStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, SecretStoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| SecretStoreError::Corrupted(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(SecretStoreError::IoError(e.to_string())),
        }
    }

    async fn save(&self, secrets: &BTreeMap<String, String>) -> Result<(), SecretStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SecretStoreError::IoError(e.to_string()))?;
            }
        }

        let data = serde_json::to_vec_pretty(secrets)
            .map_err(|e| SecretStoreError::IoError(e.to_string()))?;

        fs::write(&self.path, data)
            .await
            .map_err(|e| SecretStoreError::IoError(e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| SecretStoreError::IoError(e.to_string()))?;
        }

        Ok(())
    }
}

#[async_trait]
impl SecretStorePort for FileSecretStore {
    async fn put(&self, provider: Provider, secret: &str) -> Result<(), SecretStoreError> {
        let _guard = self.lock.lock().await;
        let mut secrets = self.load().await?;
        secrets.insert(provider.resource_name().to_string(), secret.to_string());
        self.save(&secrets).await?;

        tracing::debug!(provider = %provider, path = %self.path.display(), "Secret stored");
        Ok(())
    }

    async fn get(&self, provider: Provider) -> Result<Option<String>, SecretStoreError> {
        let _guard = self.lock.lock().await;
        let mut secrets = self.load().await?;
        Ok(secrets.remove(provider.resource_name()))
    }

    async fn delete(&self, provider: Provider) -> Result<(), SecretStoreError> {
        let _guard = self.lock.lock().await;
        let mut secrets = self.load().await?;
        if secrets.remove(provider.resource_name()).is_some() {
            self.save(&secrets).await?;
            tracing::debug!(provider = %provider, "Secret deleted");
        }
        Ok(())
    }
}
