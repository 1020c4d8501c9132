/*!
 * Device Table
 * Named device handles held by the kernel
 */

use ahash::RandomState;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::info;

/// An opaque device the kernel can hold
pub trait Device: Send + Sync + Debug {
    fn name(&self) -> &str;
}

/// Devices keyed by name
#[derive(Clone, Default)]
pub struct DeviceTable {
    devices: Arc<RwLock<HashMap<String, Arc<dyn Device>, RandomState>>>,
}

impl DeviceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device under its own name, returning any device it replaced
    pub fn register(&self, device: Arc<dyn Device>) -> Option<Arc<dyn Device>> {
        let name = device.name().to_string();
        info!(device = %name, "device registered");
        self.devices.write().insert(name, device)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Device>> {
        self.devices.read().get(name).cloned()
    }

    pub fn remove(&self, name: &str) -> Option<Arc<dyn Device>> {
        self.devices.write().remove(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.devices.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }
}
