use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::IdentityError;

/// In-process identity store keyed by username.
///
/// Check-and-insert happens under one write lock, so two concurrent `create`
/// calls for the same name cannot both succeed. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: RwLock<HashMap<String, Identity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored identities.
    pub fn len(&self) -> usize {
        self.identities.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> IdentityError {
    IdentityError::DatabaseError("Identity store lock poisoned".to_string())
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let mut identities = self.identities.write().map_err(poisoned)?;

        if identities.contains_key(identity.username.as_str()) {
            return Err(IdentityError::UsernameTaken(
                identity.username.as_str().to_string(),
            ));
        }

        identities.insert(identity.username.as_str().to_string(), identity.clone());
        tracing::debug!(identity_id = %identity.id, "Identity stored in memory");

        Ok(identity)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityError> {
        let identities = self.identities.read().map_err(poisoned)?;
        Ok(identities.get(username.as_str()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::domain::identity::models::IdentityId;

    fn identity(username: &str) -> Identity {
        Identity {
            id: IdentityId::new(),
            username: Username::new(username).unwrap(),
            password_hash: "$argon2id$v=19$m=256,t=1,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryIdentityRepository::new();
        let created = repository.create(identity("alice")).await.unwrap();

        let found = repository
            .find_by_username(&Username::new("alice").unwrap())
            .await
            .unwrap()
            .expect("Identity not found");

        assert_eq!(found.id, created.id);
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repository = InMemoryIdentityRepository::new();

        let found = repository
            .find_by_username(&Username::new("nobody").unwrap())
            .await
            .unwrap();

        assert!(found.is_none());
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_username() {
        let repository = InMemoryIdentityRepository::new();
        let first = repository.create(identity("alice")).await.unwrap();

        let result = repository.create(identity("alice")).await;
        assert!(matches!(result, Err(IdentityError::UsernameTaken(_))));

        // The original record is untouched
        let found = repository
            .find_by_username(&Username::new("alice").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_create_single_winner() {
        let repository = Arc::new(InMemoryIdentityRepository::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repository = Arc::clone(&repository);
                tokio::spawn(async move { repository.create(identity("alice")).await })
            })
            .collect();

        let mut created = 0;
        let mut taken = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(IdentityError::UsernameTaken(_)) => taken += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(taken, 15);
        assert_eq!(repository.len(), 1);
    }
}
