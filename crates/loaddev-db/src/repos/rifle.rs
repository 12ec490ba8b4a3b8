//! Rifle repository: owner-scoped CRUD.

use loaddev_core::entities::{Owned, Rifle};
use loaddev_core::validation::Validate;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_json, get_opt_quantity, get_opt_string, opt_json_column, opt_quantity_column,
};
use crate::service::LoadDevService;

const SELECT_COLS: &str = "id, owner_id, name, description, caliber, barrel_length, \
                           barrel_contour, free_bore, rifling, zeroing";

fn row_to_rifle(row: &libsql::Row) -> Result<Rifle, DatabaseError> {
    Ok(Rifle {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        name: row.get(2)?,
        description: get_opt_string(row, 3)?,
        caliber: row.get(4)?,
        barrel_length: get_opt_quantity(row, 5)?,
        barrel_contour: get_opt_string(row, 6)?,
        free_bore: get_opt_quantity(row, 7)?,
        rifling: get_opt_json(row, 8)?,
        zeroing: get_opt_json(row, 9)?,
    })
}

impl LoadDevService {
    /// Insert a rifle without an id, or update the owner's rifle with that id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for invalid fields and
    /// `DatabaseError::NotFound` when updating a rifle the owner does not have.
    pub async fn save_rifle(&self, owner: &str, rifle: &Rifle) -> Result<Rifle, DatabaseError> {
        rifle.validate()?;

        let mut saved = rifle.clone();
        saved.set_owner_id(owner);

        let barrel_length = opt_quantity_column(rifle.barrel_length.as_ref());
        let free_bore = opt_quantity_column(rifle.free_bore.as_ref());
        let rifling = opt_json_column(rifle.rifling.as_ref())?;
        let zeroing = opt_json_column(rifle.zeroing.as_ref())?;

        match rifle.id {
            None => {
                let id = self
                    .db()
                    .insert_returning_id(
                        "INSERT INTO rifles (owner_id, name, description, caliber, barrel_length,
                                             barrel_contour, free_bore, rifling, zeroing)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                         RETURNING id",
                        libsql::params![
                            owner,
                            rifle.name.as_str(),
                            rifle.description.clone(),
                            rifle.caliber.as_str(),
                            barrel_length,
                            rifle.barrel_contour.clone(),
                            free_bore,
                            rifling,
                            zeroing
                        ],
                    )
                    .await?;
                saved.id = Some(id);
                tracing::info!(id, owner, "created rifle");
            }
            Some(id) => {
                let changed = self
                    .db()
                    .conn()
                    .execute(
                        "UPDATE rifles SET name = ?1, description = ?2, caliber = ?3,
                                barrel_length = ?4, barrel_contour = ?5, free_bore = ?6,
                                rifling = ?7, zeroing = ?8, updated_at = datetime('now')
                         WHERE id = ?9 AND owner_id = ?10",
                        libsql::params![
                            rifle.name.as_str(),
                            rifle.description.clone(),
                            rifle.caliber.as_str(),
                            barrel_length,
                            rifle.barrel_contour.clone(),
                            free_bore,
                            rifling,
                            zeroing,
                            id,
                            owner
                        ],
                    )
                    .await?;
                if changed == 0 {
                    return Err(DatabaseError::not_found(Rifle::ENTITY, id));
                }
                tracing::info!(id, owner, "updated rifle");
            }
        }
        Ok(saved)
    }

    pub async fn find_rifle(&self, owner: &str, id: i64) -> Result<Option<Rifle>, DatabaseError> {
        tracing::debug!(id, owner, "find rifle");
        self.db()
            .query_opt(
                &format!("SELECT {SELECT_COLS} FROM rifles WHERE id = ?1 AND owner_id = ?2"),
                libsql::params![id, owner],
                row_to_rifle,
            )
            .await
    }

    pub async fn list_rifles(&self, owner: &str) -> Result<Vec<Rifle>, DatabaseError> {
        tracing::debug!(owner, "list rifles");
        self.db()
            .query_all(
                &format!("SELECT {SELECT_COLS} FROM rifles WHERE owner_id = ?1 ORDER BY id"),
                [owner],
                row_to_rifle,
            )
            .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the owner has no rifle with this id.
    pub async fn delete_rifle(&self, owner: &str, id: i64) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "DELETE FROM rifles WHERE id = ?1 AND owner_id = ?2",
                libsql::params![id, owner],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(Rifle::ENTITY, id));
        }
        tracing::info!(id, owner, "deleted rifle");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use loaddev_core::entities::{Rifling, Zeroing};
    use loaddev_core::enums::TwistDirection;
    use loaddev_core::quantity::{Quantity, Unit};
    use pretty_assertions::assert_eq;

    use crate::test_support::{OTHER, OWNER, sample_rifle, test_service};

    use super::*;

    #[tokio::test]
    async fn create_then_find_returns_equal_entity() {
        let svc = test_service().await;
        let mut rifle = sample_rifle();
        rifle.rifling = Some(Rifling {
            twist_rate: Some(Quantity::new(8.0, Unit::Inch).unwrap()),
            twist_direction: Some(TwistDirection::Right),
            number_of_grooves: Some(5),
        });
        rifle.zeroing = Some(Zeroing {
            sight_height: Some(Quantity::new(1.9, Unit::Inch).unwrap()),
            zero_distance: Some(Quantity::new(100.0, Unit::Metre).unwrap()),
        });

        let saved = svc.save_rifle(OWNER, &rifle).await.unwrap();
        let id = saved.id.unwrap();
        assert_eq!(saved.owner_id, OWNER);

        let found = svc.find_rifle(OWNER, id).await.unwrap().unwrap();
        assert_eq!(found, saved);
    }

    #[tokio::test]
    async fn owners_are_isolated() {
        let svc = test_service().await;
        let mine = svc.save_rifle(OWNER, &sample_rifle()).await.unwrap();
        svc.save_rifle(OTHER, &sample_rifle()).await.unwrap();

        let listed = svc.list_rifles(OWNER).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed.iter().all(|r| r.owner_id == OWNER));

        assert!(svc.find_rifle(OTHER, mine.id.unwrap()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_keeps_id_and_owner() {
        let svc = test_service().await;
        let mut saved = svc.save_rifle(OWNER, &sample_rifle()).await.unwrap();
        saved.name = "Renamed".into();
        saved.barrel_length = Some(Quantity::new(26.0, Unit::Inch).unwrap());

        let updated = svc.save_rifle(OWNER, &saved).await.unwrap();
        assert_eq!(updated.id, saved.id);

        let found = svc.find_rifle(OWNER, saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(found.name, "Renamed");
        assert_eq!(found.barrel_length, saved.barrel_length);
    }

    #[tokio::test]
    async fn update_of_foreign_rifle_is_not_found() {
        let svc = test_service().await;
        let theirs = svc.save_rifle(OTHER, &sample_rifle()).await.unwrap();

        let err = svc.save_rifle(OWNER, &theirs).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { entity: "rifle", .. }));

        let untouched = svc.find_rifle(OTHER, theirs.id.unwrap()).await.unwrap();
        assert_eq!(untouched.unwrap().owner_id, OTHER);
    }

    #[tokio::test]
    async fn delete_then_find_is_absent() {
        let svc = test_service().await;
        let saved = svc.save_rifle(OWNER, &sample_rifle()).await.unwrap();
        let id = saved.id.unwrap();

        assert!(svc.delete_rifle(OTHER, id).await.is_err());
        svc.delete_rifle(OWNER, id).await.unwrap();
        assert!(svc.find_rifle(OWNER, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_rifle_is_not_written() {
        let svc = test_service().await;
        let mut rifle = sample_rifle();
        rifle.name = String::new();
        let err = svc.save_rifle(OWNER, &rifle).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
        assert!(svc.list_rifles(OWNER).await.unwrap().is_empty());
    }
}
