//! Component repositories: projectiles, propellants, primers, and cases.
//!
//! Each component table has an FTS5 shadow table (`<table>_fts`) kept in sync
//! by triggers. Search matches every whitespace-separated term as a prefix
//! across the text columns and returns hits ranked by BM25.

use loaddev_core::entities::{Case, Owned, Primer, Projectile, Propellant};
use loaddev_core::enums::PrimerSize;
use loaddev_core::validation::Validate;

use crate::error::DatabaseError;
use crate::helpers::{fts_query, get_json, get_quantity, json_column, parse_enum, quantity_column};
use crate::service::LoadDevService;

const PROJECTILE_COLS: &str = "id, owner_id, manufacturer, weight, type, cost, quantity_per_box";
const PROPELLANT_COLS: &str = "id, owner_id, manufacturer, type, cost, weight_per_container";
const PRIMER_COLS: &str = "id, owner_id, manufacturer, type, primer_size, cost, quantity_per_box";
const CASE_COLS: &str = "id, owner_id, manufacturer, caliber, primer_size, cost, quantity_per_box";

fn row_to_projectile(row: &libsql::Row) -> Result<Projectile, DatabaseError> {
    Ok(Projectile {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        manufacturer: row.get(2)?,
        weight: get_quantity(row, 3)?,
        kind: row.get(4)?,
        cost: get_json(row, 5)?,
        quantity_per_box: row.get(6)?,
    })
}

fn row_to_propellant(row: &libsql::Row) -> Result<Propellant, DatabaseError> {
    Ok(Propellant {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        manufacturer: row.get(2)?,
        kind: row.get(3)?,
        cost: get_json(row, 4)?,
        weight_per_container: get_quantity(row, 5)?,
    })
}

fn row_to_primer(row: &libsql::Row) -> Result<Primer, DatabaseError> {
    let primer_size: String = row.get(4)?;
    Ok(Primer {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        manufacturer: row.get(2)?,
        kind: row.get(3)?,
        primer_size: parse_enum::<PrimerSize>(&primer_size)?,
        cost: get_json(row, 5)?,
        quantity_per_box: row.get(6)?,
    })
}

fn row_to_case(row: &libsql::Row) -> Result<Case, DatabaseError> {
    let primer_size: String = row.get(4)?;
    Ok(Case {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        manufacturer: row.get(2)?,
        caliber: row.get(3)?,
        primer_size: parse_enum::<PrimerSize>(&primer_size)?,
        cost: get_json(row, 5)?,
        quantity_per_box: row.get(6)?,
    })
}

impl LoadDevService {
    async fn find_component<T>(
        &self,
        table: &str,
        cols: &str,
        owner: &str,
        id: i64,
        map: fn(&libsql::Row) -> Result<T, DatabaseError>,
    ) -> Result<Option<T>, DatabaseError> {
        tracing::debug!(table, id, owner, "find component");
        self.db()
            .query_opt(
                &format!("SELECT {cols} FROM {table} WHERE id = ?1 AND owner_id = ?2"),
                libsql::params![id, owner],
                map,
            )
            .await
    }

    async fn list_components<T>(
        &self,
        table: &str,
        cols: &str,
        owner: &str,
        map: fn(&libsql::Row) -> Result<T, DatabaseError>,
    ) -> Result<Vec<T>, DatabaseError> {
        tracing::debug!(table, owner, "list components");
        self.db()
            .query_all(
                &format!("SELECT {cols} FROM {table} WHERE owner_id = ?1 ORDER BY id"),
                [owner],
                map,
            )
            .await
    }

    async fn search_components<T>(
        &self,
        table: &str,
        cols: &str,
        owner: &str,
        query: &str,
        map: fn(&libsql::Row) -> Result<T, DatabaseError>,
    ) -> Result<Vec<T>, DatabaseError> {
        let Some(fts) = fts_query(query) else {
            return Ok(Vec::new());
        };
        tracing::debug!(table, owner, query = %fts, "search components");

        let qualified = cols
            .split(", ")
            .map(|c| format!("c.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        self.db()
            .query_all(
                &format!(
                    "SELECT {qualified} FROM {table}_fts
                     JOIN {table} c ON c.id = {table}_fts.rowid
                     WHERE {table}_fts MATCH ?1 AND c.owner_id = ?2
                     ORDER BY rank"
                ),
                libsql::params![fts, owner],
                map,
            )
            .await
    }

    async fn delete_component(
        &self,
        table: &str,
        entity: &'static str,
        owner: &str,
        id: i64,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                &format!("DELETE FROM {table} WHERE id = ?1 AND owner_id = ?2"),
                libsql::params![id, owner],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(entity, id));
        }
        tracing::info!(table, id, owner, "deleted component");
        Ok(())
    }

    // -- Projectiles --

    /// Insert or update a projectile.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for invalid fields and
    /// `DatabaseError::NotFound` when updating a projectile the owner does not have.
    pub async fn save_projectile(
        &self,
        owner: &str,
        projectile: &Projectile,
    ) -> Result<Projectile, DatabaseError> {
        projectile.validate()?;
        let mut saved = projectile.clone();
        saved.set_owner_id(owner);

        let weight = quantity_column(&projectile.weight);
        let cost = json_column(&projectile.cost)?;

        match projectile.id {
            None => {
                let id = self
                    .db()
                    .insert_returning_id(
                        "INSERT INTO projectiles (owner_id, manufacturer, weight, type, cost,
                                                  quantity_per_box)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                         RETURNING id",
                        libsql::params![
                            owner,
                            projectile.manufacturer.as_str(),
                            weight,
                            projectile.kind.as_str(),
                            cost,
                            projectile.quantity_per_box
                        ],
                    )
                    .await?;
                saved.id = Some(id);
                tracing::info!(id, owner, "created projectile");
            }
            Some(id) => {
                let changed = self
                    .db()
                    .conn()
                    .execute(
                        "UPDATE projectiles SET manufacturer = ?1, weight = ?2, type = ?3,
                                cost = ?4, quantity_per_box = ?5
                         WHERE id = ?6 AND owner_id = ?7",
                        libsql::params![
                            projectile.manufacturer.as_str(),
                            weight,
                            projectile.kind.as_str(),
                            cost,
                            projectile.quantity_per_box,
                            id,
                            owner
                        ],
                    )
                    .await?;
                if changed == 0 {
                    return Err(DatabaseError::not_found(Projectile::ENTITY, id));
                }
                tracing::info!(id, owner, "updated projectile");
            }
        }
        Ok(saved)
    }

    pub async fn find_projectile(
        &self,
        owner: &str,
        id: i64,
    ) -> Result<Option<Projectile>, DatabaseError> {
        self.find_component("projectiles", PROJECTILE_COLS, owner, id, row_to_projectile)
            .await
    }

    pub async fn list_projectiles(&self, owner: &str) -> Result<Vec<Projectile>, DatabaseError> {
        self.list_components("projectiles", PROJECTILE_COLS, owner, row_to_projectile)
            .await
    }

    /// Search projectiles by manufacturer and type.
    pub async fn search_projectiles(
        &self,
        owner: &str,
        query: &str,
    ) -> Result<Vec<Projectile>, DatabaseError> {
        self.search_components("projectiles", PROJECTILE_COLS, owner, query, row_to_projectile)
            .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the owner has no projectile with this id.
    pub async fn delete_projectile(&self, owner: &str, id: i64) -> Result<(), DatabaseError> {
        self.delete_component("projectiles", Projectile::ENTITY, owner, id)
            .await
    }

    // -- Propellants --

    /// Insert or update a propellant.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for invalid fields and
    /// `DatabaseError::NotFound` when updating a propellant the owner does not have.
    pub async fn save_propellant(
        &self,
        owner: &str,
        propellant: &Propellant,
    ) -> Result<Propellant, DatabaseError> {
        propellant.validate()?;
        let mut saved = propellant.clone();
        saved.set_owner_id(owner);

        let cost = json_column(&propellant.cost)?;
        let weight_per_container = quantity_column(&propellant.weight_per_container);

        match propellant.id {
            None => {
                let id = self
                    .db()
                    .insert_returning_id(
                        "INSERT INTO propellants (owner_id, manufacturer, type, cost,
                                                  weight_per_container)
                         VALUES (?1, ?2, ?3, ?4, ?5)
                         RETURNING id",
                        libsql::params![
                            owner,
                            propellant.manufacturer.as_str(),
                            propellant.kind.as_str(),
                            cost,
                            weight_per_container
                        ],
                    )
                    .await?;
                saved.id = Some(id);
                tracing::info!(id, owner, "created propellant");
            }
            Some(id) => {
                let changed = self
                    .db()
                    .conn()
                    .execute(
                        "UPDATE propellants SET manufacturer = ?1, type = ?2, cost = ?3,
                                weight_per_container = ?4
                         WHERE id = ?5 AND owner_id = ?6",
                        libsql::params![
                            propellant.manufacturer.as_str(),
                            propellant.kind.as_str(),
                            cost,
                            weight_per_container,
                            id,
                            owner
                        ],
                    )
                    .await?;
                if changed == 0 {
                    return Err(DatabaseError::not_found(Propellant::ENTITY, id));
                }
                tracing::info!(id, owner, "updated propellant");
            }
        }
        Ok(saved)
    }

    pub async fn find_propellant(
        &self,
        owner: &str,
        id: i64,
    ) -> Result<Option<Propellant>, DatabaseError> {
        self.find_component("propellants", PROPELLANT_COLS, owner, id, row_to_propellant)
            .await
    }

    pub async fn list_propellants(&self, owner: &str) -> Result<Vec<Propellant>, DatabaseError> {
        self.list_components("propellants", PROPELLANT_COLS, owner, row_to_propellant)
            .await
    }

    /// Search propellants by manufacturer and type.
    pub async fn search_propellants(
        &self,
        owner: &str,
        query: &str,
    ) -> Result<Vec<Propellant>, DatabaseError> {
        self.search_components("propellants", PROPELLANT_COLS, owner, query, row_to_propellant)
            .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the owner has no propellant with this id.
    pub async fn delete_propellant(&self, owner: &str, id: i64) -> Result<(), DatabaseError> {
        self.delete_component("propellants", Propellant::ENTITY, owner, id)
            .await
    }

    // -- Primers --

    /// Insert or update a primer.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for invalid fields and
    /// `DatabaseError::NotFound` when updating a primer the owner does not have.
    pub async fn save_primer(&self, owner: &str, primer: &Primer) -> Result<Primer, DatabaseError> {
        primer.validate()?;
        let mut saved = primer.clone();
        saved.set_owner_id(owner);

        let cost = json_column(&primer.cost)?;

        match primer.id {
            None => {
                let id = self
                    .db()
                    .insert_returning_id(
                        "INSERT INTO primers (owner_id, manufacturer, type, primer_size, cost,
                                              quantity_per_box)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                         RETURNING id",
                        libsql::params![
                            owner,
                            primer.manufacturer.as_str(),
                            primer.kind.as_str(),
                            primer.primer_size.as_str(),
                            cost,
                            primer.quantity_per_box
                        ],
                    )
                    .await?;
                saved.id = Some(id);
                tracing::info!(id, owner, "created primer");
            }
            Some(id) => {
                let changed = self
                    .db()
                    .conn()
                    .execute(
                        "UPDATE primers SET manufacturer = ?1, type = ?2, primer_size = ?3,
                                cost = ?4, quantity_per_box = ?5
                         WHERE id = ?6 AND owner_id = ?7",
                        libsql::params![
                            primer.manufacturer.as_str(),
                            primer.kind.as_str(),
                            primer.primer_size.as_str(),
                            cost,
                            primer.quantity_per_box,
                            id,
                            owner
                        ],
                    )
                    .await?;
                if changed == 0 {
                    return Err(DatabaseError::not_found(Primer::ENTITY, id));
                }
                tracing::info!(id, owner, "updated primer");
            }
        }
        Ok(saved)
    }

    pub async fn find_primer(&self, owner: &str, id: i64) -> Result<Option<Primer>, DatabaseError> {
        self.find_component("primers", PRIMER_COLS, owner, id, row_to_primer)
            .await
    }

    pub async fn list_primers(&self, owner: &str) -> Result<Vec<Primer>, DatabaseError> {
        self.list_components("primers", PRIMER_COLS, owner, row_to_primer)
            .await
    }

    /// Search primers by manufacturer, type, and size.
    pub async fn search_primers(
        &self,
        owner: &str,
        query: &str,
    ) -> Result<Vec<Primer>, DatabaseError> {
        self.search_components("primers", PRIMER_COLS, owner, query, row_to_primer)
            .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the owner has no primer with this id.
    pub async fn delete_primer(&self, owner: &str, id: i64) -> Result<(), DatabaseError> {
        self.delete_component("primers", Primer::ENTITY, owner, id)
            .await
    }

    // -- Cases --

    /// Insert or update a case.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for invalid fields and
    /// `DatabaseError::NotFound` when updating a case the owner does not have.
    pub async fn save_case(&self, owner: &str, case: &Case) -> Result<Case, DatabaseError> {
        case.validate()?;
        let mut saved = case.clone();
        saved.set_owner_id(owner);

        let cost = json_column(&case.cost)?;

        match case.id {
            None => {
                let id = self
                    .db()
                    .insert_returning_id(
                        "INSERT INTO cases (owner_id, manufacturer, caliber, primer_size, cost,
                                            quantity_per_box)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                         RETURNING id",
                        libsql::params![
                            owner,
                            case.manufacturer.as_str(),
                            case.caliber.as_str(),
                            case.primer_size.as_str(),
                            cost,
                            case.quantity_per_box
                        ],
                    )
                    .await?;
                saved.id = Some(id);
                tracing::info!(id, owner, "created case");
            }
            Some(id) => {
                let changed = self
                    .db()
                    .conn()
                    .execute(
                        "UPDATE cases SET manufacturer = ?1, caliber = ?2, primer_size = ?3,
                                cost = ?4, quantity_per_box = ?5
                         WHERE id = ?6 AND owner_id = ?7",
                        libsql::params![
                            case.manufacturer.as_str(),
                            case.caliber.as_str(),
                            case.primer_size.as_str(),
                            cost,
                            case.quantity_per_box,
                            id,
                            owner
                        ],
                    )
                    .await?;
                if changed == 0 {
                    return Err(DatabaseError::not_found(Case::ENTITY, id));
                }
                tracing::info!(id, owner, "updated case");
            }
        }
        Ok(saved)
    }

    pub async fn find_case(&self, owner: &str, id: i64) -> Result<Option<Case>, DatabaseError> {
        self.find_component("cases", CASE_COLS, owner, id, row_to_case)
            .await
    }

    pub async fn list_cases(&self, owner: &str) -> Result<Vec<Case>, DatabaseError> {
        self.list_components("cases", CASE_COLS, owner, row_to_case)
            .await
    }

    /// Search cases by manufacturer, caliber, and primer size.
    pub async fn search_cases(&self, owner: &str, query: &str) -> Result<Vec<Case>, DatabaseError> {
        self.search_components("cases", CASE_COLS, owner, query, row_to_case)
            .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the owner has no case with this id.
    pub async fn delete_case(&self, owner: &str, id: i64) -> Result<(), DatabaseError> {
        self.delete_component("cases", Case::ENTITY, owner, id)
            .await
    }
}
