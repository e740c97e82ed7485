use gx_client::{Result, StateTransitionOption};
use gx_core::Method;
use gx_model::{ChangeInfo, Entry, HasLinks};

use super::{fs_request, missing, ChangeHistoryState};
use crate::rel;

/// Operations on the change log of a tree resource.
pub trait ChangeHistoryStateExt: Sized {
    /// Changes on this page, newest first as the server sends them.
    fn entries(&self) -> &[Entry];

    /// What `entry` changed.
    fn change_info<'a>(&self, entry: &'a Entry) -> Option<&'a ChangeInfo>;

    /// Revert the change recorded by `entry`. Only entries the server marks
    /// restorable carry a `restore` link.
    fn restore_change(&self, entry: &Entry, options: &[&dyn StateTransitionOption]) -> Result<Self>;
}

impl ChangeHistoryStateExt for ChangeHistoryState {
    fn entries(&self) -> &[Entry] {
        self.entity().map(|f| f.entries.as_slice()).unwrap_or_default()
    }

    fn change_info<'a>(&self, entry: &'a Entry) -> Option<&'a ChangeInfo> {
        entry.change_info.first()
    }

    fn restore_change(&self, entry: &Entry, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let link = entry.link(rel::RESTORE).ok_or_else(|| missing(self, rel::RESTORE))?;
        let request = fs_request(self, Method::POST, link.url()?)?;
        tracing::info!(entry = entry.id.as_deref().unwrap_or_default(), "restoring change");
        self.transition_same(request, options)
    }
}
