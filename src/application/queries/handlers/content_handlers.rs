//! Content Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{RemoteContent, RemoteContentPort, RemoteError};
use crate::application::queries::GetContent;

/// GetContent Handler
pub struct GetContentHandler {
    remote: Arc<dyn RemoteContentPort>,
}

impl GetContentHandler {
    pub fn new(remote: Arc<dyn RemoteContentPort>) -> Self {
        Self { remote }
    }

    pub async fn handle(&self, query: GetContent) -> Result<RemoteContent, ApplicationError> {
        if !self.remote.is_authenticated() {
            return Err(ApplicationError::NotAuthenticated("content"));
        }

        match self.remote.get_container(&query.container_id).await {
            Ok(content) => Ok(content),
            Err(RemoteError::ServiceError { status: 404, .. }) => Err(ApplicationError::not_found(
                "Content",
                query.container_id.as_str(),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ContainerMeta;
    use crate::domain::content::ContainerId;
    use crate::infrastructure::adapters::RecordingContentClient;

    #[tokio::test]
    async fn test_get_existing_and_missing_content() {
        let remote = Arc::new(RecordingContentClient::new());
        let id = remote
            .create_container(&ContainerMeta {
                title: "标题".to_string(),
                description: Some("描述".to_string()),
                language: "en".to_string(),
            })
            .await
            .unwrap();
        let handler = GetContentHandler::new(remote);

        let content = handler
            .handle(GetContent {
                container_id: id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(content.id, id);
        assert_eq!(content.description.as_deref(), Some("描述"));

        let err = handler
            .handle(GetContent {
                container_id: ContainerId::new("missing"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}
