use std::collections::BTreeMap;

use crate::{coordinator::Handle, prelude::*};

/// Live coordinators keyed by the integration instance identifier.
///
/// Owned by the host and handed to the sensors at construction.
#[derive(Clone, Default)]
pub struct Registry(BTreeMap<String, Handle>);

impl Registry {
    pub fn insert(&mut self, instance_id: impl Into<String>, handle: Handle) -> Result {
        let instance_id = instance_id.into();
        ensure!(
            !self.0.contains_key(&instance_id),
            "instance `{instance_id}` is already registered",
        );
        self.0.insert(instance_id, handle);
        Ok(())
    }

    pub fn get(&self, instance_id: &str) -> Result<&Handle> {
        self.0
            .get(instance_id)
            .with_context(|| format!("instance `{instance_id}` is not registered"))
    }

    pub fn remove(&mut self, instance_id: &str) -> Option<Handle> {
        self.0.remove(instance_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Handle)> {
        self.0.iter().map(|(instance_id, handle)| (instance_id.as_str(), handle))
    }
}
