//! User Repository
//!
//! 用户记录 + 挂在用户文档上的购物车。购物车变更使用字段级原子
//! UPDATE 语句，避免整文档读-改-写的丢失更新。

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{User, UserCreate};
use shared::models::CartData;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new user. The unique email index resolves creation races.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let created: Option<User> = self
            .base
            .db()
            .create(USER_TABLE)
            .content(data)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("user_email") {
                    RepoError::Duplicate("User already exists".to_string())
                } else {
                    RepoError::Database(msg)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("Create returned no record".to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record_id = parse_id(USER_TABLE, id)?;
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    // =========================================================================
    // Cart operations (field-scoped)
    // =========================================================================

    /// Increment an item's cart quantity by one, creating the entry at 1.
    pub async fn add_cart_item(&self, user_id: &str, item_id: &str) -> RepoResult<CartData> {
        let record_id = parse_id(USER_TABLE, user_id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $user SET cart[$item] = (cart[$item] ?? 0) + 1 RETURN AFTER")
            .bind(("user", record_id))
            .bind(("item", item_id.to_string()))
            .await?;
        let updated: Vec<User> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .map(|u| u.cart)
            .ok_or_else(|| RepoError::NotFound("User not found".to_string()))
    }

    /// Decrement an item's cart quantity. The entry is removed when it
    /// reaches zero; decrementing an absent entry is a no-op.
    pub async fn remove_cart_item(&self, user_id: &str, item_id: &str) -> RepoResult<CartData> {
        let record_id = parse_id(USER_TABLE, user_id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $user SET cart[$item] = \
                 IF (cart[$item] ?? 0) > 1 { cart[$item] - 1 } ELSE { NONE } \
                 RETURN AFTER",
            )
            .bind(("user", record_id))
            .bind(("item", item_id.to_string()))
            .await?;
        let updated: Vec<User> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .map(|u| u.cart)
            .ok_or_else(|| RepoError::NotFound("User not found".to_string()))
    }

    /// Full cart mapping for a user.
    pub async fn get_cart(&self, user_id: &str) -> RepoResult<CartData> {
        self.find_by_id(user_id)
            .await?
            .map(|u| u.cart)
            .ok_or_else(|| RepoError::NotFound("User not found".to_string()))
    }

    /// Reset the cart to empty.
    pub async fn clear_cart(&self, user_id: &str) -> RepoResult<()> {
        let record_id = parse_id(USER_TABLE, user_id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $user SET cart = {} RETURN AFTER")
            .bind(("user", record_id))
            .await?;
        let updated: Vec<User> = result.take(0)?;
        if updated.is_empty() {
            return Err(RepoError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Password reset
    // =========================================================================

    /// Store a reset token and its expiry (unix millis) on the user.
    pub async fn set_reset_token(
        &self,
        user_id: &str,
        token: &str,
        expires_at: i64,
    ) -> RepoResult<()> {
        let record_id = parse_id(USER_TABLE, user_id)?;
        let mut result = self
            .base
            .db()
            // $token is a protected SurrealDB variable, hence $reset_tok
            .query(
                "UPDATE $user SET reset_token = $reset_tok, reset_expires = $expires RETURN AFTER",
            )
            .bind(("user", record_id))
            .bind(("reset_tok", token.to_string()))
            .bind(("expires", expires_at))
            .await?;
        let updated: Vec<User> = result.take(0)?;
        if updated.is_empty() {
            return Err(RepoError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    /// Set a new password hash if `token` matches the stored reset token and
    /// it has not expired; clears the reset fields. Returns false when the
    /// token is unknown, mismatched, or stale.
    pub async fn reset_password(
        &self,
        user_id: &str,
        token: &str,
        new_hash: &str,
        now_millis: i64,
    ) -> RepoResult<bool> {
        let record_id = parse_id(USER_TABLE, user_id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $user SET hash_pass = $hash, reset_token = NONE, reset_expires = NONE \
                 WHERE reset_token = $reset_tok AND reset_expires > $now \
                 RETURN AFTER",
            )
            .bind(("user", record_id))
            .bind(("hash", new_hash.to_string()))
            .bind(("reset_tok", token.to_string()))
            .bind(("now", now_millis))
            .await?;
        let updated: Vec<User> = result.take(0)?;
        Ok(!updated.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::types::Role;

    async fn repo() -> UserRepository {
        let service = DbService::memory().await.unwrap();
        UserRepository::new(service.db)
    }

    async fn create_user(repo: &UserRepository, email: &str) -> User {
        repo.create(UserCreate {
            name: "Test User".to_string(),
            email: email.to_string(),
            hash_pass: User::hash_password("password1").unwrap(),
            role: Role::User,
            cart: CartData::new(),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn add_creates_and_increments() {
        let repo = repo().await;
        let user = create_user(&repo, "a@x.com").await;
        let id = user.id_string();

        let cart = repo.add_cart_item(&id, "food:chapati").await.unwrap();
        assert_eq!(cart.quantity("food:chapati"), 1);

        let cart = repo.add_cart_item(&id, "food:chapati").await.unwrap();
        assert_eq!(cart.quantity("food:chapati"), 2);
    }

    #[tokio::test]
    async fn remove_deletes_entry_at_zero() {
        let repo = repo().await;
        let user = create_user(&repo, "a@x.com").await;
        let id = user.id_string();

        repo.add_cart_item(&id, "food:pilau").await.unwrap();
        repo.add_cart_item(&id, "food:pilau").await.unwrap();

        let cart = repo.remove_cart_item(&id, "food:pilau").await.unwrap();
        assert_eq!(cart.quantity("food:pilau"), 1);

        let cart = repo.remove_cart_item(&id, "food:pilau").await.unwrap();
        assert_eq!(cart.quantity("food:pilau"), 0);
        assert!(cart.is_empty(), "entry must be absent at zero, not stored as 0");
    }

    #[tokio::test]
    async fn remove_absent_item_is_noop() {
        let repo = repo().await;
        let user = create_user(&repo, "a@x.com").await;
        let id = user.id_string();

        let cart = repo.remove_cart_item(&id, "food:missing").await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn quantities_never_negative() {
        let repo = repo().await;
        let user = create_user(&repo, "a@x.com").await;
        let id = user.id_string();

        // Interleaved adds/removes with extra removes sprinkled in
        repo.add_cart_item(&id, "food:ugali").await.unwrap();
        repo.remove_cart_item(&id, "food:ugali").await.unwrap();
        repo.remove_cart_item(&id, "food:ugali").await.unwrap();
        repo.remove_cart_item(&id, "food:ugali").await.unwrap();
        let cart = repo.add_cart_item(&id, "food:ugali").await.unwrap();

        assert_eq!(cart.quantity("food:ugali"), 1);
    }

    #[tokio::test]
    async fn clear_resets_cart() {
        let repo = repo().await;
        let user = create_user(&repo, "a@x.com").await;
        let id = user.id_string();

        repo.add_cart_item(&id, "food:a").await.unwrap();
        repo.add_cart_item(&id, "food:b").await.unwrap();
        repo.clear_cart(&id).await.unwrap();

        let cart = repo.get_cart(&id).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn cart_ops_fail_for_missing_user() {
        let repo = repo().await;
        let missing = "user:doesnotexist";

        assert!(matches!(
            repo.add_cart_item(missing, "food:a").await,
            Err(RepoError::NotFound(_))
        ));
        assert!(matches!(
            repo.remove_cart_item(missing, "food:a").await,
            Err(RepoError::NotFound(_))
        ));
        assert!(matches!(
            repo.get_cart(missing).await,
            Err(RepoError::NotFound(_))
        ));
        assert!(matches!(
            repo.clear_cart(missing).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let repo = repo().await;
        create_user(&repo, "dup@x.com").await;

        let err = repo
            .create(UserCreate {
                name: "Other".to_string(),
                email: "dup@x.com".to_string(),
                hash_pass: User::hash_password("password1").unwrap(),
                role: Role::User,
                cart: CartData::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn reset_password_requires_matching_unexpired_token() {
        let repo = repo().await;
        let user = create_user(&repo, "a@x.com").await;
        let id = user.id_string();
        let now = 1_000_000;

        repo.set_reset_token(&id, "tok", now + 60_000).await.unwrap();

        // Wrong token
        assert!(!repo.reset_password(&id, "other", "h2", now).await.unwrap());
        // Expired
        assert!(
            !repo
                .reset_password(&id, "tok", "h2", now + 120_000)
                .await
                .unwrap()
        );
        // Valid
        assert!(repo.reset_password(&id, "tok", "h2", now).await.unwrap());

        // Fields cleared: a second attempt with the same token fails
        assert!(!repo.reset_password(&id, "tok", "h3", now).await.unwrap());
    }
}
