//! Database Module
//!
//! 嵌入式 SurrealDB 存储。运行时使用 RocksDB 引擎，测试使用内存引擎。

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "swiftmeals";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone, Debug)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database at the given path (RocksDB engine)
    pub async fn open(path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::prepare(db).await
    }

    /// Open an in-memory database (tests)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Database ready (ns={NAMESPACE}, db={DATABASE})");
        Ok(Self { db })
    }
}

/// Startup schema pass.
///
/// `user.email` is unique: registration races resolve at the index.
/// The gateway correlation id is indexed for the callback lookup but NOT
/// unique — every cash order shares the absent value.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query("DEFINE INDEX IF NOT EXISTS user_email ON TABLE user COLUMNS email UNIQUE")
        .await
        .map_err(|e| AppError::database(format!("Failed to define user_email index: {e}")))?
        .check()
        .map_err(|e| AppError::database(format!("user_email index rejected: {e}")))?;

    db.query(
        "DEFINE INDEX IF NOT EXISTS order_checkout_request ON TABLE orders COLUMNS mpesa.CheckoutRequestID",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define order index: {e}")))?
    .check()
    .map_err(|e| AppError::database(format!("order index rejected: {e}")))?;

    Ok(())
}
