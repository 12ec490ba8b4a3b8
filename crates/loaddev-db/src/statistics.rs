//! Group and load statistics assembled from stored rows.

use loaddev_core::statistics::{GroupStatistics, LoadDetails};

use crate::error::DatabaseError;
use crate::service::LoadDevService;

impl LoadDevService {
    /// Velocity statistics for one group. `None` if the owner has no such group.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn group_statistics(
        &self,
        owner: &str,
        group_id: i64,
    ) -> Result<Option<GroupStatistics>, DatabaseError> {
        let Some(group) = self.find_group(owner, group_id).await? else {
            return Ok(None);
        };
        let shots = self.list_shots_by_group(owner, group_id).await?;
        tracing::debug!(group_id, shots = shots.len(), "computed group statistics");
        Ok(Some(GroupStatistics::compute(&group, &shots)))
    }

    /// Statistics for every group of a load. `None` if the owner has no such load.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn load_statistics(
        &self,
        owner: &str,
        load_id: i64,
    ) -> Result<Option<Vec<GroupStatistics>>, DatabaseError> {
        if self.find_load(owner, load_id).await?.is_none() {
            return Ok(None);
        }
        self.groups_with_statistics(owner, load_id).await.map(Some)
    }

    /// A load with its rifle and per-group statistics.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn load_details(
        &self,
        owner: &str,
        load_id: i64,
    ) -> Result<Option<LoadDetails>, DatabaseError> {
        let Some(load) = self.find_load(owner, load_id).await? else {
            return Ok(None);
        };
        let rifle = match load.rifle_id {
            Some(rifle_id) => self.find_rifle(owner, rifle_id).await?,
            None => None,
        };
        let groups = self.groups_with_statistics(owner, load_id).await?;
        Ok(Some(LoadDetails {
            load,
            rifle,
            groups,
        }))
    }

    async fn groups_with_statistics(
        &self,
        owner: &str,
        load_id: i64,
    ) -> Result<Vec<GroupStatistics>, DatabaseError> {
        let groups = self.list_groups_by_load(owner, load_id).await?;
        let mut out = Vec::with_capacity(groups.len());
        for group in &groups {
            let Some(group_id) = group.id else { continue };
            let shots = self.list_shots_by_group(owner, group_id).await?;
            out.push(GroupStatistics::compute(group, &shots));
        }
        Ok(out)
    }
}
