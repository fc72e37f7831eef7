//! User use-case service.

use std::sync::Arc;

use async_trait::async_trait;
use bookstore_db::{RowId, StoreError};
use bookstore_kernel::{Operation, ResourceError};

use super::models::{CreateUserForm, NewUser, UpdateUserForm, User, UserCredentials};
use super::password::PasswordHasher;
use super::repository::UserRepository;
use crate::utils::patch_value;

const RESOURCE: &str = "User";

fn user_not_found() -> ResourceError {
    ResourceError::not_found(RESOURCE, "The user ID is not found in the database.")
}

/// Read-only view of stored credentials, for an authentication collaborator.
#[async_trait]
pub trait CredentialsLookup: Send + Sync {
    /// `None` when no user has this username.
    async fn credentials_for(&self, username: &str) -> Option<UserCredentials>;
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    pub async fn list_all(&self) -> Vec<User> {
        tracing::debug!("fetching all users");
        self.repository.find_all().await
    }

    pub async fn get_by_id(&self, user_id: RowId) -> Result<User, ResourceError> {
        tracing::debug!(user_id, "fetching user by id");
        self.repository
            .find_by_id(user_id)
            .await
            .ok_or_else(user_not_found)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User, ResourceError> {
        tracing::debug!(username, "fetching user by username");
        self.repository
            .find_by_username(username)
            .await
            .ok_or_else(user_not_found)
    }

    /// Hashes the password and stores the user. A taken username is a conflict.
    pub async fn create(&self, form: CreateUserForm) -> Result<User, ResourceError> {
        tracing::debug!(username = %form.username, "creating user");
        let username = form.username;
        let create_error = |username: &str| {
            ResourceError::internal(
                Operation::Create,
                RESOURCE,
                format!("Error while creating the user {username}."),
            )
        };

        let password_hash = self.hasher.hash(&form.password).map_err(|err| {
            tracing::error!(error = %err, "error hashing password");
            create_error(&username)
        })?;

        let draft = NewUser {
            username: username.clone(),
            email: form.email,
            password_hash,
        };

        match self.repository.insert(draft).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "user created");
                Ok(user)
            }
            Err(err @ StoreError::UniqueViolation { .. }) => {
                tracing::warn!(error = %err, "user already exists");
                Err(ResourceError::already_exists(
                    RESOURCE,
                    format!("The user {username} already exists."),
                ))
            }
            Err(err) => {
                tracing::error!(error = %err, "error creating user");
                Err(create_error(&username))
            }
        }
    }

    /// Applies the non-empty email and password; the username never changes.
    pub async fn update_by_id(
        &self,
        user_id: RowId,
        form: UpdateUserForm,
    ) -> Result<User, ResourceError> {
        tracing::info!(user_id, "updating user");
        let mut user = self.get_by_id(user_id).await?;
        let update_error = || {
            ResourceError::internal(
                Operation::Update,
                RESOURCE,
                format!("Error while updating the user with the ID : {user_id}"),
            )
        };

        if let Some(email) = patch_value(form.email) {
            user.email = email;
        }
        if let Some(password) = patch_value(form.password) {
            user.password_hash = self.hasher.hash(&password).map_err(|err| {
                tracing::error!(user_id, error = %err, "error hashing password");
                update_error()
            })?;
        }

        match self.repository.save(user).await {
            Ok(updated) => {
                tracing::info!(user_id = updated.id, "user updated");
                Ok(updated)
            }
            Err(err) => {
                tracing::error!(user_id, error = %err, "error updating user");
                Err(update_error())
            }
        }
    }

    pub async fn delete_by_id(&self, user_id: RowId) -> Result<(), ResourceError> {
        tracing::info!(user_id, "deleting user");
        let user = self.get_by_id(user_id).await?;

        match self.repository.delete(&user).await {
            Ok(()) => {
                tracing::info!(user_id, "user deleted");
                Ok(())
            }
            // Removed by a concurrent request after the lookup above.
            Err(err @ StoreError::RowNotFound { .. }) => {
                tracing::warn!(user_id, error = %err, "user already deleted");
                Err(user_not_found())
            }
            Err(err) => {
                tracing::error!(user_id, error = %err, "error deleting user");
                Err(ResourceError::internal(
                    Operation::Delete,
                    RESOURCE,
                    format!("Error while deleting the user with the ID : {user_id}"),
                ))
            }
        }
    }
}

#[async_trait]
impl CredentialsLookup for UserService {
    async fn credentials_for(&self, username: &str) -> Option<UserCredentials> {
        self.repository
            .find_by_username(username)
            .await
            .map(UserCredentials::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::password::{Argon2Hasher, HashError};
    use crate::modules::users::repository::MemoryUserRepository;
    use bookstore_kernel::ErrorStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct ScriptedRepository {
        inner: MemoryUserRepository,
        writes: AtomicUsize,
        fail_writes_with: Option<StoreError>,
    }

    impl ScriptedRepository {
        fn failing(err: StoreError) -> Self {
            Self {
                fail_writes_with: Some(err),
                ..Self::default()
            }
        }

        fn check_write(&self) -> Result<(), StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            match &self.fail_writes_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserRepository for ScriptedRepository {
        async fn find_all(&self) -> Vec<User> {
            self.inner.find_all().await
        }

        async fn find_by_id(&self, id: RowId) -> Option<User> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_username(&self, username: &str) -> Option<User> {
            self.inner.find_by_username(username).await
        }

        async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
            self.check_write()?;
            self.inner.insert(user).await
        }

        async fn save(&self, user: User) -> Result<User, StoreError> {
            self.check_write()?;
            self.inner.save(user).await
        }

        async fn delete(&self, user: &User) -> Result<(), StoreError> {
            self.check_write()?;
            self.inner.delete(user).await
        }
    }

    /// Deterministic stand-in so assertions can compare digests.
    struct ReversingHasher;

    impl PasswordHasher for ReversingHasher {
        fn hash(&self, plaintext: &str) -> Result<String, HashError> {
            Ok(format!("hashed:{}", plaintext.chars().rev().collect::<String>()))
        }

        fn verify(&self, plaintext: &str, digest: &str) -> bool {
            self.hash(plaintext).is_ok_and(|hash| hash == digest)
        }
    }

    fn service_over(repository: Arc<ScriptedRepository>) -> UserService {
        UserService::new(repository, Arc::new(ReversingHasher))
    }

    fn service() -> (UserService, Arc<ScriptedRepository>) {
        let repository = Arc::new(ScriptedRepository::default());
        (service_over(repository.clone()), repository)
    }

    fn form(username: &str, email: &str, password: &str) -> CreateUserForm {
        CreateUserForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn seed(repository: &ScriptedRepository) -> User {
        repository
            .inner
            .insert(NewUser {
                username: "user1".to_string(),
                email: "user1@bookstore.com".to_string(),
                password_hash: "hashed:1resu".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_stores_hashed_password() {
        let repository = Arc::new(ScriptedRepository::default());
        let hasher = Arc::new(Argon2Hasher::new());
        let service = UserService::new(repository.clone(), hasher.clone());

        let created = service
            .create(form("root", "root@bookstore.com", "toor"))
            .await
            .unwrap();

        let stored = service.get_by_id(created.id).await.unwrap();
        assert_eq!(stored.username, "root");
        assert_eq!(stored.email, "root@bookstore.com");
        assert_ne!(stored.password_hash, "toor");
        assert!(hasher.verify("toor", &stored.password_hash));
        assert_eq!(service.get_by_username("root").await.unwrap(), stored);
        assert_eq!(repository.writes(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict_and_store_keeps_one() {
        let (service, _) = service();
        service
            .create(form("root", "root@bookstore.com", "toor"))
            .await
            .unwrap();

        let err = service
            .create(form("root", "other@bookstore.com", "secret"))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "UserAlreadyExists");
        assert_eq!(err.status(), ErrorStatus::Conflict);
        assert_eq!(err.message(), "The user root already exists.");
        assert_eq!(service.list_all().await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_duplicate_creates_yield_one_user() {
        let (service, _) = service();
        let service = Arc::new(service);

        let attempts: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create(form("root", "root@bookstore.com", "toor"))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) if err.is_conflict() => conflicts += 1,
                Err(err) => panic!("unexpected error: {err}"),
            }
        }

        assert_eq!((created, conflicts), (1, 3));
        assert_eq!(service.list_all().await.len(), 1);
    }

    #[tokio::test]
    async fn create_store_failure_is_internal() {
        let repository = Arc::new(ScriptedRepository::failing(StoreError::Backend(
            "disk full".to_string(),
        )));
        let service = service_over(repository);

        let err = service
            .create(form("newUser", "new@bookstore.com", "password"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "CreateUserError");
        assert_eq!(err.message(), "Error while creating the user newUser.");
        assert!(err.is_internal());
    }

    #[tokio::test]
    async fn get_missing_user_is_not_found() {
        let (service, _) = service();

        let err = service.get_by_id(42).await.unwrap_err();
        assert_eq!(err.code(), "UserNotFound");
        assert_eq!(err.message(), "The user ID is not found in the database.");
    }

    #[tokio::test]
    async fn update_patches_email_and_rehashes_password() {
        let (service, repository) = service();
        let existing = seed(&repository).await;

        let updated = service
            .update_by_id(
                existing.id,
                UpdateUserForm {
                    email: Some("new@bookstore.com".to_string()),
                    password: Some("secret".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.username, "user1");
        assert_eq!(updated.email, "new@bookstore.com");
        assert_eq!(updated.password_hash, "hashed:terces");
        assert_eq!(repository.writes(), 1);
    }

    #[tokio::test]
    async fn list_all_on_empty_store_is_empty() {
        let (service, _) = service();
        assert!(service.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn update_email_only_keeps_password_and_username() {
        let (service, repository) = service();
        let existing = seed(&repository).await;

        let updated = service
            .update_by_id(
                existing.id,
                UpdateUserForm {
                    email: Some("new@bookstore.com".to_string()),
                    password: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "new@bookstore.com");
        assert_eq!(updated.username, existing.username);
        assert_eq!(updated.password_hash, existing.password_hash);
    }

    #[tokio::test]
    async fn update_password_only_keeps_email() {
        let (service, repository) = service();
        let existing = seed(&repository).await;

        let updated = service
            .update_by_id(
                existing.id,
                UpdateUserForm {
                    email: Some(String::new()),
                    password: Some("secret".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.password_hash, "hashed:terces");
        assert_eq!(updated.email, existing.email);
        assert_eq!(updated.username, existing.username);
        assert_eq!(service.get_by_id(existing.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_with_empty_fields_keeps_record() {
        let (service, repository) = service();
        let existing = seed(&repository).await;

        let updated = service
            .update_by_id(
                existing.id,
                UpdateUserForm {
                    email: Some(String::new()),
                    password: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated, existing);
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found_without_writing() {
        let (service, repository) = service();

        let err = service
            .update_by_id(7, UpdateUserForm::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "UserNotFound");
        assert_eq!(repository.writes(), 0);
    }

    #[tokio::test]
    async fn update_store_failure_is_internal() {
        let repository = Arc::new(ScriptedRepository::failing(StoreError::Backend(
            "timeout".to_string(),
        )));
        let existing = seed(&repository).await;
        let service = service_over(repository);

        let err = service
            .update_by_id(existing.id, UpdateUserForm::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "UpdateUserError");
        assert_eq!(
            err.message(),
            format!("Error while updating the user with the ID : {}", existing.id)
        );
    }

    #[tokio::test]
    async fn delete_removes_user() {
        let (service, repository) = service();
        let existing = seed(&repository).await;

        service.delete_by_id(existing.id).await.unwrap();

        assert!(service.get_by_id(existing.id).await.unwrap_err().is_not_found());
        assert!(service.get_by_username("user1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found_without_writing() {
        let (service, repository) = service();

        let err = service.delete_by_id(3).await.unwrap_err();
        assert_eq!(err.code(), "UserNotFound");
        assert_eq!(repository.writes(), 0);
    }

    #[tokio::test]
    async fn delete_store_failure_is_internal() {
        let repository = Arc::new(ScriptedRepository::failing(StoreError::Backend(
            "read only".to_string(),
        )));
        let existing = seed(&repository).await;
        let service = service_over(repository);

        let err = service.delete_by_id(existing.id).await.unwrap_err();
        assert_eq!(err.code(), "DeleteUserError");
        assert_eq!(
            err.message(),
            format!("Error while deleting the user with the ID : {}", existing.id)
        );
    }

    #[tokio::test]
    async fn delete_racing_another_delete_is_not_found() {
        let repository = Arc::new(ScriptedRepository::failing(StoreError::RowNotFound {
            table: "user_app",
            id: 1,
        }));
        let existing = seed(&repository).await;
        let service = service_over(repository);

        let err = service.delete_by_id(existing.id).await.unwrap_err();
        assert_eq!(err.code(), "UserNotFound");
        assert_eq!(err.status(), ErrorStatus::NotFound);
    }

    #[tokio::test]
    async fn credentials_lookup_exposes_digest_by_username() {
        let (service, repository) = service();
        seed(&repository).await;

        let credentials = service.credentials_for("user1").await.unwrap();
        assert_eq!(credentials.username, "user1");
        assert_eq!(credentials.password_hash, "hashed:1resu");
        assert!(service.credentials_for("nobody").await.is_none());
    }
}
