use std::sync::Arc;

use auth::Principal;

use crate::adoption::errors::AdoptionError;
use crate::adoption::models::Adoption;
use crate::adoption::models::AdoptionId;
use crate::adoption::ports::AdoptionRepository;

/// Owner-or-administrator rule for a single adoption record.
pub fn permits(principal: &Principal, adoption: &Adoption) -> bool {
    principal.is_admin() || adoption.user.username.as_str() == principal.username
}

/// Evaluates the owner-or-administrator rule by adoption id, for callers
/// that have not yet loaded the record.
pub struct AdoptionAccessPolicy<AR>
where
    AR: AdoptionRepository,
{
    repository: Arc<AR>,
}

impl<AR> AdoptionAccessPolicy<AR>
where
    AR: AdoptionRepository,
{
    pub fn new(repository: Arc<AR>) -> Self {
        Self { repository }
    }

    /// True when the principal owns the adoption. A missing adoption
    /// evaluates to false; existence checks belong to the caller.
    pub async fn is_owner(
        &self,
        principal: &Principal,
        id: AdoptionId,
    ) -> Result<bool, AdoptionError> {
        let adoption = self.repository.find_by_id(id).await?;
        Ok(adoption
            .map(|a| a.user.username.as_str() == principal.username)
            .unwrap_or(false))
    }

    /// Owner-or-administrator check by id; administrators skip the lookup.
    pub async fn permits_access(
        &self,
        principal: &Principal,
        id: AdoptionId,
    ) -> Result<bool, AdoptionError> {
        if principal.is_admin() {
            return Ok(true);
        }
        self.is_owner(principal, id).await
    }
}
