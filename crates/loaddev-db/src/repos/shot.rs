//! Shot repository.

use loaddev_core::entities::{Group, Owned, Shot};
use loaddev_core::validation::Validate;

use crate::error::DatabaseError;
use crate::helpers::{get_quantity, quantity_column};
use crate::service::LoadDevService;

const SELECT_COLS: &str = "id, owner_id, group_id, velocity";

fn row_to_shot(row: &libsql::Row) -> Result<Shot, DatabaseError> {
    Ok(Shot {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        group_id: Some(row.get(2)?),
        velocity: get_quantity(row, 3)?,
    })
}

impl LoadDevService {
    /// Insert or update a shot. The parent group must belong to the owner.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for invalid fields and
    /// `DatabaseError::NotFound` for a missing shot or group.
    pub async fn save_shot(&self, owner: &str, shot: &Shot) -> Result<Shot, DatabaseError> {
        shot.validate()?;

        if let Some(group_id) = shot.group_id
            && self.find_group(owner, group_id).await?.is_none()
        {
            return Err(DatabaseError::not_found(Group::ENTITY, group_id));
        }

        let mut saved = shot.clone();
        saved.set_owner_id(owner);
        let velocity = quantity_column(&shot.velocity);

        match shot.id {
            None => {
                let id = self
                    .db()
                    .insert_returning_id(
                        "INSERT INTO shots (owner_id, group_id, velocity)
                         VALUES (?1, ?2, ?3)
                         RETURNING id",
                        libsql::params![owner, shot.group_id, velocity],
                    )
                    .await?;
                saved.id = Some(id);
                tracing::info!(id, owner, group_id = ?shot.group_id, "created shot");
            }
            Some(id) => {
                let changed = self
                    .db()
                    .conn()
                    .execute(
                        "UPDATE shots SET group_id = ?1, velocity = ?2
                         WHERE id = ?3 AND owner_id = ?4",
                        libsql::params![shot.group_id, velocity, id, owner],
                    )
                    .await?;
                if changed == 0 {
                    return Err(DatabaseError::not_found(Shot::ENTITY, id));
                }
                tracing::info!(id, owner, "updated shot");
            }
        }
        Ok(saved)
    }

    pub async fn find_shot(&self, owner: &str, id: i64) -> Result<Option<Shot>, DatabaseError> {
        self.db()
            .query_opt(
                &format!("SELECT {SELECT_COLS} FROM shots WHERE id = ?1 AND owner_id = ?2"),
                libsql::params![id, owner],
                row_to_shot,
            )
            .await
    }

    /// Shots of one group in firing order.
    pub async fn list_shots_by_group(
        &self,
        owner: &str,
        group_id: i64,
    ) -> Result<Vec<Shot>, DatabaseError> {
        self.db()
            .query_all(
                &format!(
                    "SELECT {SELECT_COLS} FROM shots
                     WHERE owner_id = ?1 AND group_id = ?2
                     ORDER BY id"
                ),
                libsql::params![owner, group_id],
                row_to_shot,
            )
            .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the owner has no shot with this id.
    pub async fn delete_shot(&self, owner: &str, id: i64) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "DELETE FROM shots WHERE id = ?1 AND owner_id = ?2",
                libsql::params![id, owner],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(Shot::ENTITY, id));
        }
        tracing::info!(id, owner, "deleted shot");
        Ok(())
    }
}
