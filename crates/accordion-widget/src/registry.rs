//! Process-wide widget registry.
//!
//! The registry is created the first time a widget is constructed and lives
//! for the rest of the process. It is never reset: instance numbers keep
//! growing so generated ids stay unique across every widget on a page.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Identity of one accordion instance, equal to its instance number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetId(pub u64);

impl WidgetId {
    pub fn instance(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
struct WidgetRegistry {
    next_instance: u64,
    live: BTreeSet<WidgetId>,
}

static REGISTRY: OnceLock<Mutex<WidgetRegistry>> = OnceLock::new();

fn registry() -> &'static Mutex<WidgetRegistry> {
    REGISTRY.get_or_init(|| Mutex::new(WidgetRegistry::default()))
}

/// Hand out the next instance number and mark it live.
pub(crate) fn register() -> WidgetId {
    let mut registry = registry().lock();
    let id = WidgetId(registry.next_instance);
    registry.next_instance += 1;
    registry.live.insert(id);
    id
}

pub(crate) fn unregister(id: WidgetId) {
    registry().lock().live.remove(&id);
}

/// Whether `id` belongs to a widget that has not been destroyed.
pub fn is_live(id: WidgetId) -> bool {
    registry().lock().live.contains(&id)
}

/// Widgets currently initialized anywhere in the process.
pub fn live_widgets() -> Vec<WidgetId> {
    registry().lock().live.iter().copied().collect()
}
