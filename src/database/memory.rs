use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewSecret, Secret, SecretPatch};
use crate::database::repository::{SecretPage, SecretRepository};
use crate::query::ListQuery;

/// In-memory secret storage. Backs tests and the `memory` storage mode;
/// filter and sort semantics are delegated to `ListQuery` so they cannot
/// drift from the SQL path.
#[derive(Default)]
pub struct MemorySecretRepository {
    secrets: RwLock<HashMap<Uuid, Secret>>,
}

impl MemorySecretRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretRepository for MemorySecretRepository {
    async fn list(&self, query: &ListQuery) -> Result<SecretPage, DatabaseError> {
        let guard = self.secrets.read().await;
        let mut matches: Vec<Secret> = guard
            .values()
            .filter(|s| query.matches(s))
            .cloned()
            .collect();
        matches.sort_by(|a, b| query.compare(a, b));

        let total = matches.len() as i64;
        let rows = matches
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.per_page() as usize)
            .collect();

        Ok(SecretPage { rows, total })
    }

    async fn insert(&self, user_id: Uuid, new: NewSecret) -> Result<Secret, DatabaseError> {
        let now = Utc::now();
        let secret = Secret {
            id: Uuid::new_v4(),
            title: new.title,
            secret: new.secret,
            secret_type: new.secret_type,
            favorite: new.favorite,
            user_id,
            created_at: now,
            updated_at: now,
        };

        let mut guard = self.secrets.write().await;
        guard.insert(secret.id, secret.clone());
        Ok(secret)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: SecretPatch,
    ) -> Result<Secret, DatabaseError> {
        let mut guard = self.secrets.write().await;
        match guard.get_mut(&id) {
            Some(stored) if stored.user_id == user_id => {
                if let Some(title) = patch.title {
                    stored.title = title;
                }
                if let Some(secret) = patch.secret {
                    stored.secret = secret;
                }
                if let Some(secret_type) = patch.secret_type {
                    stored.secret_type = secret_type;
                }
                if let Some(favorite) = patch.favorite {
                    stored.favorite = favorite;
                }
                stored.updated_at = Utc::now();
                Ok(stored.clone())
            }
            _ => Err(DatabaseError::NotFound),
        }
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), DatabaseError> {
        let mut guard = self.secrets.write().await;
        match guard.get(&id) {
            Some(stored) if stored.user_id == user_id => {
                guard.remove(&id);
                Ok(())
            }
            _ => Err(DatabaseError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ListParams, SecretType};

    fn new_secret(title: &str, secret_type: SecretType, favorite: bool) -> NewSecret {
        NewSecret {
            title: title.to_string(),
            secret: format!("{title} body"),
            secret_type,
            favorite,
        }
    }

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut p = ListParams::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "search" => p.search = v,
                "type" => p.secret_type = v,
                "favorite" => p.favorite = v,
                "orderBy" => p.order_by = v,
                "order" => p.order = v,
                "page" => p.page = v,
                "perPage" => p.per_page = v,
                other => panic!("unknown param {other}"),
            }
        }
        p
    }

    fn query(user_id: Uuid, pairs: &[(&str, &str)]) -> ListQuery {
        ListQuery::parse(user_id, &params(pairs), 6, 100).unwrap()
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_owner() {
        let repo = MemorySecretRepository::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        repo.insert(alice, new_secret("alpha", SecretType::Normal, false))
            .await
            .unwrap();
        repo.insert(bob, new_secret("beta", SecretType::Normal, false))
            .await
            .unwrap();

        let page = repo.list(&query(alice, &[])).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].title, "alpha");
    }

    #[tokio::test]
    async fn update_refuses_other_users_rows() {
        let repo = MemorySecretRepository::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let secret = repo
            .insert(alice, new_secret("alpha", SecretType::Normal, false))
            .await
            .unwrap();

        let patch = SecretPatch {
            favorite: Some(true),
            ..Default::default()
        };
        assert!(matches!(
            repo.update(bob, secret.id, patch).await,
            Err(DatabaseError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_applies_only_present_fields_and_bumps_updated_at() {
        let repo = MemorySecretRepository::new();
        let alice = Uuid::new_v4();
        let secret = repo
            .insert(alice, new_secret("alpha", SecretType::Normal, false))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let updated = repo
            .update(
                alice,
                secret.id,
                SecretPatch {
                    favorite: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "alpha");
        assert!(updated.favorite);
        assert!(updated.updated_at > secret.updated_at);
    }

    #[tokio::test]
    async fn empty_patch_still_bumps_updated_at() {
        let repo = MemorySecretRepository::new();
        let alice = Uuid::new_v4();
        let secret = repo
            .insert(alice, new_secret("alpha", SecretType::Normal, false))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let updated = repo
            .update(alice, secret.id, SecretPatch::default())
            .await
            .unwrap();
        assert!(updated.updated_at > secret.updated_at);
        assert_eq!(updated.title, secret.title);
    }

    #[tokio::test]
    async fn delete_is_scoped_and_final() {
        let repo = MemorySecretRepository::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let secret = repo
            .insert(alice, new_secret("alpha", SecretType::Normal, false))
            .await
            .unwrap();

        assert!(matches!(
            repo.delete(bob, secret.id).await,
            Err(DatabaseError::NotFound)
        ));
        repo.delete(alice, secret.id).await.unwrap();
        assert!(matches!(
            repo.delete(alice, secret.id).await,
            Err(DatabaseError::NotFound)
        ));
    }

    #[tokio::test]
    async fn pages_partition_the_filtered_set() {
        let repo = MemorySecretRepository::new();
        let alice = Uuid::new_v4();
        for i in 0..7 {
            repo.insert(
                alice,
                new_secret(&format!("secret {i}"), SecretType::Normal, false),
            )
            .await
            .unwrap();
        }

        let page1 = repo
            .list(&query(alice, &[("page", "1"), ("perPage", "6")]))
            .await
            .unwrap();
        let page2 = repo
            .list(&query(alice, &[("page", "2"), ("perPage", "6")]))
            .await
            .unwrap();

        assert_eq!(page1.total, 7);
        assert_eq!(page2.total, 7);
        assert_eq!(page1.rows.len(), 6);
        assert_eq!(page2.rows.len(), 1);

        let mut seen: Vec<Uuid> = page1.rows.iter().chain(&page2.rows).map(|s| s.id).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 7);
    }

    #[tokio::test]
    async fn filters_and_sort_apply_before_paging() {
        let repo = MemorySecretRepository::new();
        let alice = Uuid::new_v4();
        repo.insert(alice, new_secret("bank pin", SecretType::Hard, true))
            .await
            .unwrap();
        repo.insert(alice, new_secret("wifi code", SecretType::Normal, false))
            .await
            .unwrap();
        repo.insert(alice, new_secret("bank token", SecretType::Normal, true))
            .await
            .unwrap();

        let page = repo
            .list(&query(
                alice,
                &[
                    ("search", "bank"),
                    ("favorite", "true"),
                    ("orderBy", "title"),
                    ("order", "asc"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        let titles: Vec<&str> = page.rows.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["bank pin", "bank token"]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_with_true_total() {
        let repo = MemorySecretRepository::new();
        let alice = Uuid::new_v4();
        repo.insert(alice, new_secret("only one", SecretType::Normal, false))
            .await
            .unwrap();

        let page = repo
            .list(&query(alice, &[("page", "5")]))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert!(page.rows.is_empty());
    }
}
