//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DocumentStore` port from the `core` crate. Every collection lives in a
//! single PostgreSQL `documents` table as JSONB, accessed through `sqlx`.

use async_trait::async_trait;
use futureme_core::document::{fields_from_storage, fields_to_storage};
use futureme_core::identity::{self, DocumentId};
use futureme_core::ports::{Collection, DocumentStore, StoreError, StoreResult};
use futureme_core::{Document, Fields, Filter, FindOptions, SortOrder};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DocumentStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// The name of the connected database, for diagnostics.
    pub async fn database_name(&self) -> StoreResult<String> {
        sqlx::query_scalar::<_, String>("SELECT current_database()")
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct DocumentRecord {
    id: Uuid,
    data: Json<serde_json::Value>,
}
impl DocumentRecord {
    fn to_domain(self) -> StoreResult<Document> {
        let fields = fields_from_storage(self.data.0)?;
        Ok(Document::new(DocumentId::from(self.id), fields))
    }
}

fn store_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(e.to_string()),
        _ => StoreError::Query(e.to_string()),
    }
}

fn find_sql(options: &FindOptions) -> String {
    // The sort field is bound as a parameter; only the direction is spliced in.
    let order_by = match &options.sort {
        Some(sort) => {
            let direction = match sort.order {
                SortOrder::Ascending => "ASC",
                SortOrder::Descending => "DESC",
            };
            format!("data -> $4 {dir}, seq {dir}", dir = direction)
        }
        None => "seq ASC".to_string(),
    };
    format!(
        "SELECT id, data FROM documents \
         WHERE collection = $1 AND data @> $2 \
         ORDER BY {} LIMIT $3",
        order_by
    )
}

//=========================================================================================
// `DocumentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentStore for DbAdapter {
    async fn insert(&self, collection: Collection, record: &Fields) -> StoreResult<DocumentId> {
        let id = DocumentId::generate();
        sqlx::query("INSERT INTO documents (id, collection, data) VALUES ($1, $2, $3)")
            .bind(id.as_uuid())
            .bind(collection.name())
            .bind(Json(fields_to_storage(record)))
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(id)
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let sql = find_sql(&options);
        let limit = options.limit.map(|n| n as i64);

        let mut query = sqlx::query_as::<_, DocumentRecord>(&sql)
            .bind(collection.name())
            .bind(Json(filter.to_storage()))
            .bind(limit);
        if let Some(sort) = &options.sort {
            query = query.bind(sort.field.clone());
        }

        let records = query.fetch_all(&self.pool).await.map_err(store_error)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        let mut docs = self
            .find(collection, filter, FindOptions::default().limit(1))
            .await?;
        Ok(docs.pop())
    }

    async fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        mut fields: Fields,
    ) -> StoreResult<Option<Document>> {
        identity::stamp_modified(&mut fields, identity::now());

        let record = sqlx::query_as::<_, DocumentRecord>(
            "UPDATE documents SET data = data || $3 \
             WHERE id = $1 AND collection = $2 \
             RETURNING id, data",
        )
        .bind(id.as_uuid())
        .bind(collection.name())
        .bind(Json(fields_to_storage(&fields)))
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        record.map(|r| r.to_domain()).transpose()
    }

    async fn delete(&self, collection: Collection, id: DocumentId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND collection = $2")
            .bind(id.as_uuid())
            .bind(collection.name())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn collection_names(&self) -> StoreResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT collection FROM documents ORDER BY collection",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
