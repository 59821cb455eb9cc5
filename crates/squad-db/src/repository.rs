use chrono::NaiveDate;
use sqlx::{PgPool, Pool, Postgres};
use squad_core::error::AppError;
use squad_core::models::PlayerRecord;

/// PostgreSQL-backed player store, keyed by (team name, player id).
#[derive(Clone)]
pub struct PlayerRepository {
    pool: Pool<Postgres>,
}

impl PlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or refresh every player in one transaction.
    ///
    /// Returns the number of rows written. An existing (team, id) row is
    /// overwritten and its `updated_at` bumped.
    pub async fn upsert_players(&self, players: &[PlayerRecord]) -> Result<u64, AppError> {
        if players.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut written = 0;
        for player in players {
            let player_id = to_i64(player.id, "player id")?;
            let market_value = to_i64(player.market_value, "market value")?;
            let shirt_number = i32::try_from(player.shirt_number).map_err(|_| {
                AppError::DatabaseError(format!(
                    "shirt number {} out of range for player {}",
                    player.shirt_number, player.id
                ))
            })?;

            let result = sqlx::query(
                r#"
                INSERT INTO players (
                    team_name, player_id, name, shirt_number, position, date_of_birth,
                    nationality, nationality_flag_url, market_value, image_url, profile_url
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                ON CONFLICT (team_name, player_id) DO UPDATE SET
                    name = EXCLUDED.name,
                    shirt_number = EXCLUDED.shirt_number,
                    position = EXCLUDED.position,
                    date_of_birth = EXCLUDED.date_of_birth,
                    nationality = EXCLUDED.nationality,
                    nationality_flag_url = EXCLUDED.nationality_flag_url,
                    market_value = EXCLUDED.market_value,
                    image_url = EXCLUDED.image_url,
                    profile_url = EXCLUDED.profile_url,
                    updated_at = NOW()
                "#,
            )
            .bind(&player.team_name)
            .bind(player_id)
            .bind(&player.name)
            .bind(shirt_number)
            .bind(&player.position)
            .bind(player.date_of_birth)
            .bind(&player.nationality)
            .bind(&player.nationality_flag_url)
            .bind(market_value)
            .bind(&player.image_url)
            .bind(&player.profile_url)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

            written += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        tracing::debug!(
            team = %players[0].team_name,
            written,
            "Players upserted"
        );
        Ok(written)
    }

    pub async fn get_player(
        &self,
        team_name: &str,
        player_id: u64,
    ) -> Result<Option<PlayerRecord>, AppError> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r#"
            SELECT team_name, player_id, name, shirt_number, position, date_of_birth,
                   nationality, nationality_flag_url, market_value, image_url, profile_url
            FROM players
            WHERE team_name = $1 AND player_id = $2
            "#,
        )
        .bind(team_name)
        .bind(to_i64(player_id, "player id")?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    /// All stored players of a team, by shirt number.
    pub async fn list_team(&self, team_name: &str) -> Result<Vec<PlayerRecord>, AppError> {
        let rows = sqlx::query_as::<_, PlayerRow>(
            r#"
            SELECT team_name, player_id, name, shirt_number, position, date_of_birth,
                   nationality, nationality_flag_url, market_value, image_url, profile_url
            FROM players
            WHERE team_name = $1
            ORDER BY shirt_number, player_id
            "#,
        )
        .bind(team_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

fn to_i64(value: u64, what: &str) -> Result<i64, AppError> {
    i64::try_from(value)
        .map_err(|_| AppError::DatabaseError(format!("{what} {value} exceeds BIGINT range")))
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct PlayerRow {
    team_name: String,
    player_id: i64,
    name: String,
    shirt_number: i32,
    position: String,
    date_of_birth: NaiveDate,
    nationality: String,
    nationality_flag_url: String,
    market_value: i64,
    image_url: String,
    profile_url: String,
}

// The table's CHECK constraints keep ids and values non-negative.
impl From<PlayerRow> for PlayerRecord {
    fn from(row: PlayerRow) -> Self {
        PlayerRecord {
            id: row.player_id as u64,
            name: row.name,
            team_name: row.team_name,
            shirt_number: row.shirt_number as u32,
            position: row.position,
            date_of_birth: row.date_of_birth,
            nationality: row.nationality,
            nationality_flag_url: row.nationality_flag_url,
            market_value: row.market_value as u64,
            image_url: row.image_url,
            profile_url: row.profile_url,
        }
    }
}

// -- Trait implementation --

impl squad_core::traits::PlayerStore for PlayerRepository {
    async fn upsert_players(&self, players: &[PlayerRecord]) -> Result<u64, AppError> {
        PlayerRepository::upsert_players(self, players).await
    }
}
