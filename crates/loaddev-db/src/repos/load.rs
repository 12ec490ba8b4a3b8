//! Load repository: owner-scoped CRUD and lookup by name.

use loaddev_core::entities::{Load, Owned, Rifle};
use loaddev_core::validation::Validate;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_quantity, get_opt_string, get_quantity, opt_quantity_column, quantity_column};
use crate::service::LoadDevService;

const SELECT_COLS: &str = "id, owner_id, name, description, powder_manufacturer, powder_type, \
                           bullet_manufacturer, bullet_type, bullet_weight, primer_manufacturer, \
                           primer_type, distance_from_lands, case_overall_length, neck_tension, \
                           rifle_id";

fn row_to_load(row: &libsql::Row) -> Result<Load, DatabaseError> {
    Ok(Load {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        name: row.get(2)?,
        description: get_opt_string(row, 3)?,
        powder_manufacturer: row.get(4)?,
        powder_type: row.get(5)?,
        bullet_manufacturer: row.get(6)?,
        bullet_type: row.get(7)?,
        bullet_weight: get_quantity(row, 8)?,
        primer_manufacturer: row.get(9)?,
        primer_type: row.get(10)?,
        distance_from_lands: get_opt_quantity(row, 11)?,
        case_overall_length: get_opt_quantity(row, 12)?,
        neck_tension: get_opt_quantity(row, 13)?,
        rifle_id: row.get::<Option<i64>>(14)?,
    })
}

impl LoadDevService {
    /// Insert a load without an id, or update the owner's load with that id.
    ///
    /// A referenced rifle must belong to the same owner.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for invalid fields and
    /// `DatabaseError::NotFound` for a missing load or rifle.
    pub async fn save_load(&self, owner: &str, load: &Load) -> Result<Load, DatabaseError> {
        load.validate()?;

        if let Some(rifle_id) = load.rifle_id
            && self.find_rifle(owner, rifle_id).await?.is_none()
        {
            return Err(DatabaseError::not_found(Rifle::ENTITY, rifle_id));
        }

        let mut saved = load.clone();
        saved.set_owner_id(owner);

        let bullet_weight = quantity_column(&load.bullet_weight);
        let distance_from_lands = opt_quantity_column(load.distance_from_lands.as_ref());
        let case_overall_length = opt_quantity_column(load.case_overall_length.as_ref());
        let neck_tension = opt_quantity_column(load.neck_tension.as_ref());

        match load.id {
            None => {
                let id = self
                    .db()
                    .insert_returning_id(
                        "INSERT INTO loads (owner_id, name, description, powder_manufacturer,
                                            powder_type, bullet_manufacturer, bullet_type,
                                            bullet_weight, primer_manufacturer, primer_type,
                                            distance_from_lands, case_overall_length,
                                            neck_tension, rifle_id)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                         RETURNING id",
                        libsql::params![
                            owner,
                            load.name.as_str(),
                            load.description.clone(),
                            load.powder_manufacturer.as_str(),
                            load.powder_type.as_str(),
                            load.bullet_manufacturer.as_str(),
                            load.bullet_type.as_str(),
                            bullet_weight,
                            load.primer_manufacturer.as_str(),
                            load.primer_type.as_str(),
                            distance_from_lands,
                            case_overall_length,
                            neck_tension,
                            load.rifle_id
                        ],
                    )
                    .await?;
                saved.id = Some(id);
                tracing::info!(id, owner, "created load");
            }
            Some(id) => {
                let changed = self
                    .db()
                    .conn()
                    .execute(
                        "UPDATE loads SET name = ?1, description = ?2, powder_manufacturer = ?3,
                                powder_type = ?4, bullet_manufacturer = ?5, bullet_type = ?6,
                                bullet_weight = ?7, primer_manufacturer = ?8, primer_type = ?9,
                                distance_from_lands = ?10, case_overall_length = ?11,
                                neck_tension = ?12, rifle_id = ?13,
                                updated_at = datetime('now')
                         WHERE id = ?14 AND owner_id = ?15",
                        libsql::params![
                            load.name.as_str(),
                            load.description.clone(),
                            load.powder_manufacturer.as_str(),
                            load.powder_type.as_str(),
                            load.bullet_manufacturer.as_str(),
                            load.bullet_type.as_str(),
                            bullet_weight,
                            load.primer_manufacturer.as_str(),
                            load.primer_type.as_str(),
                            distance_from_lands,
                            case_overall_length,
                            neck_tension,
                            load.rifle_id,
                            id,
                            owner
                        ],
                    )
                    .await?;
                if changed == 0 {
                    return Err(DatabaseError::not_found(Load::ENTITY, id));
                }
                tracing::info!(id, owner, "updated load");
            }
        }
        Ok(saved)
    }

    pub async fn find_load(&self, owner: &str, id: i64) -> Result<Option<Load>, DatabaseError> {
        tracing::debug!(id, owner, "find load");
        self.db()
            .query_opt(
                &format!("SELECT {SELECT_COLS} FROM loads WHERE id = ?1 AND owner_id = ?2"),
                libsql::params![id, owner],
                row_to_load,
            )
            .await
    }

    pub async fn list_loads(&self, owner: &str) -> Result<Vec<Load>, DatabaseError> {
        tracing::debug!(owner, "list loads");
        self.db()
            .query_all(
                &format!("SELECT {SELECT_COLS} FROM loads WHERE owner_id = ?1 ORDER BY id"),
                [owner],
                row_to_load,
            )
            .await
    }

    /// Loads whose name matches exactly.
    pub async fn find_loads_by_name(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<Load>, DatabaseError> {
        tracing::debug!(owner, name, "find loads by name");
        self.db()
            .query_all(
                &format!(
                    "SELECT {SELECT_COLS} FROM loads WHERE owner_id = ?1 AND name = ?2 ORDER BY id"
                ),
                [owner, name],
                row_to_load,
            )
            .await
    }

    /// Delete a load together with its groups and their shots.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the owner has no load with this id.
    pub async fn delete_load(&self, owner: &str, id: i64) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "DELETE FROM loads WHERE id = ?1 AND owner_id = ?2",
                libsql::params![id, owner],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(Load::ENTITY, id));
        }
        tracing::info!(id, owner, "deleted load");
        Ok(())
    }
}
