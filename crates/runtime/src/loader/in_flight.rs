use level_core::NodeId;

use crate::api::{ContentError, Result};

use super::{LoadedRoom, LoaderInner, Slot};

/// Ownership of a `Loading` slot.
///
/// Settling publishes the outcome and wakes joined waiters. Dropping an
/// unsettled guard (the owning future was cancelled) clears the slot so the
/// next caller can retry.
pub(super) struct InFlight<'a> {
    inner: &'a LoaderInner,
    node: NodeId,
    settled: bool,
}

impl<'a> InFlight<'a> {
    pub(super) fn new(inner: &'a LoaderInner, node: NodeId) -> Self {
        Self {
            inner,
            node,
            settled: false,
        }
    }

    pub(super) fn settle(
        mut self,
        outcome: std::result::Result<LoadedRoom, ContentError>,
    ) -> Result<LoadedRoom> {
        let previous = {
            let mut slots = self.inner.slots()?;
            self.settled = true;
            match &outcome {
                Ok(room) => slots.insert(self.node, Slot::Loaded(*room)),
                Err(_) => slots.remove(&self.node),
            }
        };

        if let Some(Slot::Loading(notify)) = previous {
            notify.notify_waiters();
        }
        outcome.map_err(Into::into)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let Ok(mut slots) = self.inner.slots.lock() else {
            return;
        };
        if let Some(Slot::Loading(notify)) = slots.remove(&self.node) {
            notify.notify_waiters();
        }
    }
}
