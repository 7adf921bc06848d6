//! Group Registry
//!
//! Process-wide directory of groups by name. Groups are registered when
//! built and looked up by name afterwards; building another group with the
//! same name replaces the earlier one. Nothing is ever removed.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::warn;

use crate::group::Group;

static GROUPS: Lazy<RwLock<HashMap<String, Arc<Group>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers `group` under its name, replacing any previous registration.
pub(crate) fn register(group: Arc<Group>) {
    let name = group.name().to_string();
    if GROUPS.write().insert(name.clone(), group).is_some() {
        warn!("Group '{}' was registered again, replacing the previous one", name);
    }
}

/// Returns the group registered under `name`.
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    GROUPS.read().get(name).cloned()
}

/// Names of all registered groups.
pub fn group_names() -> Vec<String> {
    let mut names: Vec<String> = GROUPS.read().keys().cloned().collect();
    names.sort();
    names
}
