use crate::model::{OwnerId, VariableId, VariableRecord};

/// A conjunction of record predicates, always scoped to one owner.
///
/// ```rust
/// # use sbox_variables::{OwnerId, VariableFilter};
/// let owner = OwnerId::try_from("proj-1").unwrap();
/// let filter = VariableFilter::owner(&owner).name("TOKEN").live();
/// assert!(filter.is_live_only());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableFilter {
    owner_id: OwnerId,
    id: Option<VariableId>,
    name: Option<String>,
    live_only: bool,
}

impl VariableFilter {
    #[must_use]
    pub fn owner(owner_id: &OwnerId) -> Self {
        Self { owner_id: owner_id.clone(), id: None, name: None, live_only: false }
    }

    #[must_use]
    pub fn id(mut self, id: &VariableId) -> Self {
        self.id = Some(id.clone());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Excludes tombstoned records.
    #[must_use]
    pub const fn live(mut self) -> Self {
        self.live_only = true;
        self
    }

    #[must_use]
    pub const fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    #[must_use]
    pub const fn is_live_only(&self) -> bool {
        self.live_only
    }

    #[must_use]
    pub fn matches(&self, record: &VariableRecord) -> bool {
        record.owner_id == self.owner_id
            && self.id.as_ref().is_none_or(|id| record.id == *id)
            && self.name.as_deref().is_none_or(|name| record.name == name)
            && (!self.live_only || record.is_live())
    }
}
