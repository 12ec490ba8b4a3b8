//! Shot group repository. Groups live in the `shot_groups` table.

use loaddev_core::entities::{Group, Load, Owned};
use loaddev_core::validation::Validate;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_quantity, get_quantity, opt_quantity_column, parse_date, quantity_column};
use crate::service::LoadDevService;

const SELECT_COLS: &str =
    "id, owner_id, load_id, date, powder_charge, target_range, group_size";

fn row_to_group(row: &libsql::Row) -> Result<Group, DatabaseError> {
    let date: String = row.get(3)?;
    Ok(Group {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        load_id: Some(row.get(2)?),
        date: parse_date(&date)?,
        powder_charge: get_quantity(row, 4)?,
        target_range: get_quantity(row, 5)?,
        group_size: get_opt_quantity(row, 6)?,
    })
}

impl LoadDevService {
    /// Insert or update a group. The parent load must belong to the owner.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for invalid fields and
    /// `DatabaseError::NotFound` for a missing group or load.
    pub async fn save_group(&self, owner: &str, group: &Group) -> Result<Group, DatabaseError> {
        group.validate()?;

        if let Some(load_id) = group.load_id
            && self.find_load(owner, load_id).await?.is_none()
        {
            return Err(DatabaseError::not_found(Load::ENTITY, load_id));
        }

        let mut saved = group.clone();
        saved.set_owner_id(owner);

        let date = group.date.to_string();
        let powder_charge = quantity_column(&group.powder_charge);
        let target_range = quantity_column(&group.target_range);
        let group_size = opt_quantity_column(group.group_size.as_ref());

        match group.id {
            None => {
                let id = self
                    .db()
                    .insert_returning_id(
                        "INSERT INTO shot_groups (owner_id, load_id, date, powder_charge,
                                                  target_range, group_size)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                         RETURNING id",
                        libsql::params![
                            owner,
                            group.load_id,
                            date,
                            powder_charge,
                            target_range,
                            group_size
                        ],
                    )
                    .await?;
                saved.id = Some(id);
                tracing::info!(id, owner, load_id = ?group.load_id, "created group");
            }
            Some(id) => {
                let changed = self
                    .db()
                    .conn()
                    .execute(
                        "UPDATE shot_groups SET load_id = ?1, date = ?2, powder_charge = ?3,
                                target_range = ?4, group_size = ?5,
                                updated_at = datetime('now')
                         WHERE id = ?6 AND owner_id = ?7",
                        libsql::params![
                            group.load_id,
                            date,
                            powder_charge,
                            target_range,
                            group_size,
                            id,
                            owner
                        ],
                    )
                    .await?;
                if changed == 0 {
                    return Err(DatabaseError::not_found(Group::ENTITY, id));
                }
                tracing::info!(id, owner, "updated group");
            }
        }
        Ok(saved)
    }

    pub async fn find_group(&self, owner: &str, id: i64) -> Result<Option<Group>, DatabaseError> {
        tracing::debug!(id, owner, "find group");
        self.db()
            .query_opt(
                &format!("SELECT {SELECT_COLS} FROM shot_groups WHERE id = ?1 AND owner_id = ?2"),
                libsql::params![id, owner],
                row_to_group,
            )
            .await
    }

    /// Groups of one load, oldest first.
    pub async fn list_groups_by_load(
        &self,
        owner: &str,
        load_id: i64,
    ) -> Result<Vec<Group>, DatabaseError> {
        tracing::debug!(owner, load_id, "list groups by load");
        self.db()
            .query_all(
                &format!(
                    "SELECT {SELECT_COLS} FROM shot_groups
                     WHERE owner_id = ?1 AND load_id = ?2
                     ORDER BY date, id"
                ),
                libsql::params![owner, load_id],
                row_to_group,
            )
            .await
    }

    /// Delete a group and its shots.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the owner has no group with this id.
    pub async fn delete_group(&self, owner: &str, id: i64) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "DELETE FROM shot_groups WHERE id = ?1 AND owner_id = ?2",
                libsql::params![id, owner],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(Group::ENTITY, id));
        }
        tracing::info!(id, owner, "deleted group");
        Ok(())
    }
}
