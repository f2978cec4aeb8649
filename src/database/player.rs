use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use crate::database::models::{PlayerRecord, PlayerRow, PlayerUpdate};
use crate::database::DatabaseError;

const SELECT_PLAYER: &str =
    "SELECT CAST(points AS SIGNED) AS points, challenges, inventory FROM `playerdata` WHERE userid = ? LIMIT 1";

const UPDATE_PLAYER: &str =
    "UPDATE `playerdata` SET points = ?, inventory = ?, challenges = ? WHERE userid = ?";

/// Read/update access to player rows.
///
/// Rows are created and deleted elsewhere; this only touches existing ones.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Fetch the record for `user_id`, or `None` when no row matches
    async fn find_player(&self, user_id: &str) -> Result<Option<PlayerRecord>, DatabaseError>;

    /// Overwrite points, inventory and challenges for `user_id`.
    ///
    /// Returns the number of rows affected; zero is not an error.
    async fn update_player(&self, user_id: &str, update: &PlayerUpdate) -> Result<u64, DatabaseError>;

    /// Round-trip to the backend without touching player data
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// `PlayerStore` over the shared MySQL/MariaDB pool
#[derive(Clone)]
pub struct MySqlPlayerStore {
    pool: MySqlPool,
}

impl MySqlPlayerStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerStore for MySqlPlayerStore {
    async fn find_player(&self, user_id: &str) -> Result<Option<PlayerRecord>, DatabaseError> {
        // Connection goes back to the pool when `conn` drops, on every path
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query_as::<_, PlayerRow>(SELECT_PLAYER)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;

        row.map(PlayerRecord::try_from).transpose()
    }

    async fn update_player(&self, user_id: &str, update: &PlayerUpdate) -> Result<u64, DatabaseError> {
        let inventory = update.inventory_text()?;
        let challenges = update.challenges_text()?;

        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(UPDATE_PLAYER)
            .bind(update.points)
            .bind(inventory)
            .bind(challenges)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        let affected = result.rows_affected();
        if affected == 0 {
            debug!("Update for player '{}' matched no rows", user_id);
        }
        Ok(affected)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}
