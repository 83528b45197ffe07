use async_trait::async_trait;
use slicer::Rule;
use sqlx::SqlitePool;

use crate::store::{FeedStore, InsertOutcome};
use crate::{FeedRecord, RegistryError};

const SELECT_FEED: &str = "SELECT id, host, rule FROM feeds";

/// SQLite-backed feed store.
///
/// `INSERT .. ON CONFLICT DO NOTHING` is the atomic create-if-absent
/// primitive: under concurrent registration of the same id only the first
/// writer's row lands, and the loser reads it back.
pub struct SqliteFeedStore {
    pool: SqlitePool,
}

impl SqliteFeedStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FeedRow {
    id: String,
    host: String,
    rule: i64,
}

impl TryFrom<FeedRow> for FeedRecord {
    type Error = sqlx::Error;

    fn try_from(row: FeedRow) -> Result<Self, sqlx::Error> {
        let rule = Rule::new(row.rule).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(FeedRecord {
            id: row.id,
            host: row.host,
            rule,
        })
    }
}

#[async_trait]
impl FeedStore for SqliteFeedStore {
    async fn get(&self, id: &str) -> crate::Result<Option<FeedRecord>> {
        let query = format!("{} WHERE id = $1", SELECT_FEED);
        let row = sqlx::query_as::<_, FeedRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(FeedRecord::try_from)
            .transpose()
            .map_err(RegistryError::from)
    }

    async fn insert_if_absent(&self, record: FeedRecord) -> crate::Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO feeds (id, host, rule)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&record.id)
        .bind(&record.host)
        .bind(i64::from(record.rule))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Lost the race (or the pair was already registered earlier);
            // the stored row is ground truth.
            let existing = self
                .get(&record.id)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            return Ok(InsertOutcome::Existing(existing));
        }

        Ok(InsertOutcome::Created(record))
    }

    async fn all(&self) -> crate::Result<Vec<FeedRecord>> {
        let query = format!("{} ORDER BY created_at DESC", SELECT_FEED);
        let rows = sqlx::query_as::<_, FeedRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(FeedRecord::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RegistryError::from)
    }
}
