use std::time::Duration;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, TransactionTrait,
};
use tracing::{debug, info, warn};

use crate::errors::{Result, ShortenerError};
use crate::storage::backends::infer_backend_from_url;
use crate::storage::models::{BatchItem, LinkRecord};
use crate::storage::Storage;

use migration::{entities::link, Migrator, MigratorTrait};

/// Health probes answer within this bound or count as failed.
const PING_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: &'static str,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(ShortenerError::database_config(
                "database_url is not set".to_string(),
            ));
        }

        let backend_name = infer_backend_from_url(database_url)?;

        let db = if backend_name == "sqlite" {
            Self::connect_sqlite(database_url).await?
        } else {
            Self::connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage { db, backend_name };

        storage.run_migrations().await?;

        warn!("{} storage backend initialized", backend_name.to_uppercase());
        Ok(storage)
    }

    /// Connect to SQLite with auto-creation and WAL tuning.
    async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
        use sea_orm::sqlx::SqlitePool;
        use sea_orm::SqlxSqliteConnector;
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                ShortenerError::database_config(format!("Failed to parse SQLite URL: {}", e))
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
            ShortenerError::database_connection(format!("Failed to connect to SQLite: {}", e))
        })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// Connect to MySQL/PostgreSQL through the shared pool options.
    async fn connect_generic(
        database_url: &str,
        backend_name: &str,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(database_url.to_owned());
        opt.max_connections(20)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        Database::connect(opt).await.map_err(|e| {
            ShortenerError::database_connection(format!(
                "Failed to connect to {} database: {}",
                backend_name.to_uppercase(),
                e
            ))
        })
    }

    async fn run_migrations(&self) -> Result<()> {
        Migrator::up(&self.db, None)
            .await
            .map_err(|e| ShortenerError::database_operation(format!("Migration failed: {}", e)))?;

        info!("Database migrations completed");
        Ok(())
    }

    fn model_to_record(model: link::Model) -> LinkRecord {
        LinkRecord {
            code: model.short_code,
            original_url: model.original_url,
            owner_id: model.owner_id,
            is_deleted: model.is_deleted,
        }
    }

    fn active_model(code: &str, url: &str, owner_id: &str) -> link::ActiveModel {
        link::ActiveModel {
            short_code: Set(code.to_string()),
            original_url: Set(url.to_string()),
            owner_id: Set(owner_id.to_string()),
            is_deleted: Set(false),
        }
    }
}

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn get(&self, code: &str) -> Result<Option<LinkRecord>> {
        let model = link::Entity::find_by_id(code)
            .one(&self.db)
            .await
            .map_err(|e| {
                ShortenerError::database_operation(format!("Failed to query link: {}", e))
            })?;

        Ok(model.map(Self::model_to_record))
    }

    async fn put(&self, code: &str, url: &str, owner_id: &str) -> Result<()> {
        // Single upsert: insert, do nothing when original_url is already
        // present. The affected-row count distinguishes a fresh insert
        // from the no-op.
        let rows = link::Entity::insert(Self::active_model(code, url, owner_id))
            .on_conflict(
                OnConflict::column(link::Column::OriginalUrl)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                ShortenerError::database_operation(format!("Failed to insert link: {}", e))
            })?;

        if rows == 0 {
            return Err(ShortenerError::conflict(format!(
                "URL already stored: {}",
                url
            )));
        }

        debug!("Link created: {}", code);
        Ok(())
    }

    async fn put_batch(&self, items: &[BatchItem], owner_id: &str) -> Result<()> {
        // One transaction for the whole batch; any statement failure
        // rolls everything back so partial batches are never visible.
        let txn = self.db.begin().await.map_err(|e| {
            ShortenerError::database_operation(format!("Failed to begin transaction: {}", e))
        })?;

        for item in items {
            let insert = link::Entity::insert(Self::active_model(
                &item.code,
                &item.original_url,
                owner_id,
            ))
            .on_conflict(
                OnConflict::column(link::Column::OriginalUrl)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await;

            if let Err(e) = insert {
                txn.rollback().await.ok();
                return Err(ShortenerError::database_operation(format!(
                    "Batch insert failed, rolled back: {}",
                    e
                )));
            }
        }

        txn.commit().await.map_err(|e| {
            ShortenerError::database_operation(format!("Failed to commit batch: {}", e))
        })?;

        debug!("Batch of {} links committed", items.len());
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<LinkRecord>> {
        let models = link::Entity::find()
            .filter(link::Column::OwnerId.eq(owner_id))
            .filter(link::Column::IsDeleted.eq(false))
            .all(&self.db)
            .await
            .map_err(|e| {
                ShortenerError::database_operation(format!("Failed to list links: {}", e))
            })?;

        Ok(models.into_iter().map(Self::model_to_record).collect())
    }

    async fn soft_delete(&self, codes: &[String], owner_id: &str) -> Result<()> {
        if codes.is_empty() {
            return Ok(());
        }

        // One bulk update; the owner filter makes non-owned codes a
        // silent no-op rather than an error.
        let result = link::Entity::update_many()
            .col_expr(link::Column::IsDeleted, Expr::value(true))
            .filter(link::Column::OwnerId.eq(owner_id))
            .filter(link::Column::ShortCode.is_in(codes.iter().map(String::as_str)))
            .exec(&self.db)
            .await
            .map_err(|e| {
                ShortenerError::database_operation(format!("Failed to delete links: {}", e))
            })?;

        debug!("Soft-deleted {} links", result.rows_affected);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        match tokio::time::timeout(PING_TIMEOUT, self.db.ping()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ShortenerError::database_connection(format!(
                "Ping failed: {}",
                e
            ))),
            Err(_) => Err(ShortenerError::database_connection(format!(
                "Ping timed out after {:?}",
                PING_TIMEOUT
            ))),
        }
    }

    fn backend_name(&self) -> &'static str {
        self.backend_name
    }
}
