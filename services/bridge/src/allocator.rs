//! The allocator boundary and the gateway that feeds it.
//!
//! The resource-allocation algorithm itself lives outside this crate; we
//! only translate a decoded [`AddSlave`] snapshot into one call on the
//! [`Allocator`] trait. The allocator is responsible for its own internal
//! synchronization, so the gateway takes no locks around the call.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use bridge_proto::{AddSlave, FrameworkId, Resource, SlaveId, SlaveInfo};
use tracing::{debug, info};

/// An additive vector of named scalar resource quantities.
///
/// Summation is order-independent and duplicate names accumulate, so
/// `[{cpus:1},{cpus:1},{mem:512}]` sums to `{cpus:2, mem:512}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resources(BTreeMap<String, f64>);

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum a list of wire resources into one vector.
    pub fn sum<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Self {
        let mut out = Self::new();
        for resource in resources {
            out.add(resource);
        }
        out
    }

    /// Accumulate one named quantity.
    pub fn add(&mut self, resource: &Resource) {
        *self.0.entry(resource.name.clone()).or_insert(0.0) += resource.value;
    }

    /// Quantity for `name`, 0 if absent.
    pub fn get(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

/// The external allocator's mutation interface.
///
/// Implementations synchronize themselves; `add_slave` may be called from
/// any request-handling thread.
pub trait Allocator: Send + Sync {
    fn add_slave(
        &self,
        slave_id: SlaveId,
        slave_info: SlaveInfo,
        total: Resources,
        used: HashMap<FrameworkId, Resources>,
    );
}

/// Translates decoded `AddSlave` snapshots into allocator calls.
#[derive(Clone)]
pub struct AllocatorGateway {
    allocator: Arc<dyn Allocator>,
}

impl AllocatorGateway {
    pub fn new(allocator: Arc<dyn Allocator>) -> Self {
        Self { allocator }
    }

    /// Aggregate a slave snapshot and hand it to the allocator.
    ///
    /// The top-level resource list is summed into one total; each nested
    /// per-framework list is summed independently and keyed by framework
    /// id. A repeated framework id is not merged: the last entry wins.
    pub fn add_slave(&self, snapshot: AddSlave) {
        let slave_id = snapshot.slave_id.unwrap_or_default();
        let slave_info = snapshot.slave_info.unwrap_or_default();

        let total = Resources::sum(&snapshot.total);

        let mut used: HashMap<FrameworkId, Resources> = HashMap::new();
        for entry in &snapshot.framework_resources {
            let framework_id = entry.framework_id.clone().unwrap_or_default();
            used.insert(framework_id, Resources::sum(&entry.resources));
        }

        debug!(
            slave = %slave_id.value,
            hostname = %slave_info.hostname,
            frameworks = used.len(),
            "forwarding slave snapshot to allocator"
        );
        self.allocator.add_slave(slave_id, slave_info, total, used);
    }
}

/// Allocator stub used by the standalone binary: logs each call and drops it.
pub struct LogAllocator;

impl Allocator for LogAllocator {
    fn add_slave(
        &self,
        slave_id: SlaveId,
        slave_info: SlaveInfo,
        total: Resources,
        used: HashMap<FrameworkId, Resources>,
    ) {
        info!(
            slave = %slave_id.value,
            hostname = %slave_info.hostname,
            total = ?total,
            frameworks = used.len(),
            "addSlave"
        );
    }
}

/// Recording allocator for tests: captures every `add_slave` call.
#[derive(Default)]
pub struct RecordingAllocator {
    calls: Mutex<Vec<AddSlaveCall>>,
}

/// One captured `add_slave` invocation.
#[derive(Debug, Clone)]
pub struct AddSlaveCall {
    pub slave_id: SlaveId,
    pub slave_info: SlaveInfo,
    pub total: Resources,
    pub used: HashMap<FrameworkId, Resources>,
}

impl RecordingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<AddSlaveCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Allocator for RecordingAllocator {
    fn add_slave(
        &self,
        slave_id: SlaveId,
        slave_info: SlaveInfo,
        total: Resources,
        used: HashMap<FrameworkId, Resources>,
    ) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(AddSlaveCall {
                slave_id,
                slave_info,
                total,
                used,
            });
    }
}
