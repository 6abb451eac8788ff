// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential gate in front of every mutating catalog operation.

use std::sync::Arc;

use async_trait::async_trait;
use journal_core::{
    AdapterType, AuthAdapter, Entry, EntryDraft, EntryPatch, HealthStatus, JournalError,
    PluginAdapter,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::bulk::{BulkOperation, BulkOutcome};
use crate::repository::{ChatRepository, MigrationReport};
use crate::search::{SearchFilters, TagMatch};

/// Compares credentials against one server-held password.
///
/// With no password configured every credential is refused.
pub struct SharedSecretAuth {
    secret: Option<SecretString>,
}

impl SharedSecretAuth {
    pub fn new(secret: Option<SecretString>) -> Self {
        Self { secret }
    }

    /// Build from the `[security]` config section.
    pub fn from_password(password: Option<&str>) -> Self {
        Self::new(password.map(|p| SecretString::from(p.to_string())))
    }
}

impl std::fmt::Debug for SharedSecretAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretAuth")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[async_trait]
impl PluginAdapter for SharedSecretAuth {
    fn name(&self) -> &str {
        "shared-secret"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, JournalError> {
        Ok(match self.secret {
            Some(_) => HealthStatus::Healthy,
            None => HealthStatus::Degraded("no admin password configured".to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), JournalError> {
        Ok(())
    }
}

#[async_trait]
impl AuthAdapter for SharedSecretAuth {
    async fn verify(&self, credential: &str) -> Result<(), JournalError> {
        match &self.secret {
            Some(secret) if secret.expose_secret() == credential => Ok(()),
            Some(_) => {
                warn!("rejected admin credential");
                Err(JournalError::Unauthorized)
            }
            None => {
                warn!("admin operation refused: no password configured");
                Err(JournalError::Unauthorized)
            }
        }
    }
}

/// Admin surface: each call verifies the credential before touching the
/// repository.
pub struct AdminCatalog {
    repo: Arc<ChatRepository>,
    auth: Arc<dyn AuthAdapter>,
}

impl AdminCatalog {
    pub fn new(repo: Arc<ChatRepository>, auth: Arc<dyn AuthAdapter>) -> Self {
        Self { repo, auth }
    }

    /// Every entry, drafts and unpublished included.
    pub async fn list_all(&self, credential: &str) -> Result<Vec<Entry>, JournalError> {
        self.auth.verify(credential).await?;
        self.repo.list_all().await
    }

    /// Admin search: published entries, unlisted included, carrying every
    /// requested tag.
    pub async fn search(
        &self,
        credential: &str,
        query: &str,
        tags: Vec<String>,
    ) -> Result<Vec<Entry>, JournalError> {
        self.auth.verify(credential).await?;
        let filters = SearchFilters {
            tags,
            ..SearchFilters::new(TagMatch::All)
                .with_query(query)
                .with_unlisted(true)
        };
        self.repo.search(&filters).await
    }

    pub async fn create(&self, credential: &str, draft: EntryDraft) -> Result<Entry, JournalError> {
        self.auth.verify(credential).await?;
        self.repo.create(draft).await
    }

    pub async fn update(
        &self,
        credential: &str,
        id: &str,
        patch: EntryPatch,
    ) -> Result<Entry, JournalError> {
        self.auth.verify(credential).await?;
        self.repo.update(id, patch).await
    }

    pub async fn delete(&self, credential: &str, id: &str) -> Result<bool, JournalError> {
        self.auth.verify(credential).await?;
        self.repo.delete(id).await
    }

    pub async fn apply_bulk(
        &self,
        credential: &str,
        operation: &BulkOperation,
    ) -> Result<BulkOutcome, JournalError> {
        self.auth.verify(credential).await?;
        self.repo.apply_bulk(operation).await
    }

    pub async fn migrate(
        &self,
        credential: &str,
        incoming: Vec<Entry>,
    ) -> Result<MigrationReport, JournalError> {
        self.auth.verify(credential).await?;
        self.repo.migrate(incoming).await
    }

    pub async fn import_json(
        &self,
        credential: &str,
        json: &str,
    ) -> Result<MigrationReport, JournalError> {
        self.auth.verify(credential).await?;
        self.repo.import_json(json).await
    }

    pub async fn export_all(&self, credential: &str) -> Result<String, JournalError> {
        self.auth.verify(credential).await?;
        self.repo.export_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryOptions;
    use journal_core::ErrorKind;
    use journal_storage::InMemoryKvStore;

    fn admin(password: Option<&str>) -> (AdminCatalog, Arc<ChatRepository>) {
        let repo = Arc::new(ChatRepository::new(
            Arc::new(InMemoryKvStore::new()),
            RepositoryOptions::default(),
        ));
        let auth = Arc::new(SharedSecretAuth::from_password(password));
        (AdminCatalog::new(Arc::clone(&repo), auth), repo)
    }

    fn draft(title: &str) -> EntryDraft {
        EntryDraft {
            title: title.to_string(),
            content: "### User\n\nq".to_string(),
            ..EntryDraft::default()
        }
    }

    #[tokio::test]
    async fn correct_password_passes() {
        let (admin, repo) = admin(Some("hunter2"));
        let entry = admin.create("hunter2", draft("Allowed")).await.unwrap();
        assert_eq!(repo.list_all().await.unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn wrong_password_runs_no_repository_logic() {
        let (admin, repo) = admin(Some("hunter2"));
        let err = admin.create("guess", draft("Denied")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(repo.list_all().await.unwrap().is_empty());

        let err = admin
            .update("guess", "missing", EntryPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized, "auth is checked before lookup");
    }

    #[tokio::test]
    async fn unconfigured_secret_refuses_everything() {
        let (admin, _) = admin(None);
        let err = admin.list_all("").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let auth = SharedSecretAuth::from_password(None);
        assert!(matches!(
            auth.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
    }

    #[tokio::test]
    async fn admin_search_requires_every_tag() {
        let (admin, _) = admin(Some("pw"));
        let mut both = draft("Both");
        both.tags = vec!["a".into(), "b".into()];
        both.is_published = true;
        both.is_unlisted = true;
        let mut one = draft("One");
        one.tags = vec!["a".into()];
        one.is_published = true;
        admin.create("pw", both).await.unwrap();
        admin.create("pw", one).await.unwrap();

        let found = admin
            .search("pw", "", vec!["a".into(), "b".into()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Both");
    }

    #[test]
    fn debug_output_hides_secret() {
        let auth = SharedSecretAuth::from_password(Some("topsecret"));
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("topsecret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
