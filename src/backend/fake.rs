//! In-memory backend for exercising the search logic without a real device
//! tree.
//!
//! Always compiled (zero runtime cost), hidden from public docs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::backend::{Backend, Enumeration};
use crate::device::{DeviceEntry, DeviceFilter, PropertyKey};
use crate::error::{DeviceResult, Error};

/// The property set of one simulated device. Each None field reads as absent.
#[derive(Debug, Clone, Default)]
pub struct FakeDevice {
    pub description: Option<String>,
    pub hardware_id: Option<String>,
    pub manufacturer: Option<String>,
    pub driver: Option<String>,
    pub physical_name: Option<String>,
}

impl FakeDevice {
    /// A device carrying only a description, the common case in tests.
    pub fn with_description(description: &str) -> Self {
        FakeDevice {
            description: Some(description.to_string()),
            ..Default::default()
        }
    }

    fn property(&self, key: PropertyKey) -> Option<&String> {
        match key {
            PropertyKey::Description => self.description.as_ref(),
            PropertyKey::HardwareId => self.hardware_id.as_ref(),
            PropertyKey::Manufacturer => self.manufacturer.as_ref(),
            PropertyKey::Driver => self.driver.as_ref(),
            PropertyKey::PhysicalName => self.physical_name.as_ref(),
        }
    }
}

/// Backend over a fixed list of simulated devices.
///
/// The shared counters outlive the enumerations this backend opens, so a test
/// can assert on release and visit behavior after the search has finished.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub devices: Vec<FakeDevice>,

    /// If set, every open fails as if the OS had returned an invalid handle.
    pub refuse_open: bool,

    /// Simulated scratch-buffer size in UTF-16 units. Values that would not
    /// fit alongside their terminator read as absent, mirroring the bounded
    /// property buffer of a real backend. None means unbounded.
    pub buffer_capacity: Option<usize>,

    /// How many times an enumeration opened by this backend has been released.
    pub releases: Rc<Cell<usize>>,

    /// Every index handed out by `entry_at`, in the order it was requested.
    pub visits: Rc<RefCell<Vec<u32>>>,
}

impl FakeBackend {
    pub fn new(devices: Vec<FakeDevice>) -> Self {
        FakeBackend {
            devices,
            ..Default::default()
        }
    }
}

impl Backend for FakeBackend {
    fn open_enumeration(&self, _filter: DeviceFilter) -> DeviceResult<Box<dyn Enumeration>> {
        if self.refuse_open {
            return Err(Error::EnumerationUnavailable);
        }

        Ok(Box::new(FakeEnumeration {
            devices: self.devices.clone(),
            buffer_capacity: self.buffer_capacity,
            releases: Rc::clone(&self.releases),
            visits: Rc::clone(&self.visits),
        }))
    }
}

#[derive(Debug)]
struct FakeEnumeration {
    devices: Vec<FakeDevice>,
    buffer_capacity: Option<usize>,
    releases: Rc<Cell<usize>>,
    visits: Rc<RefCell<Vec<u32>>>,
}

impl Enumeration for FakeEnumeration {
    fn entry_at(&self, index: u32) -> Option<DeviceEntry> {
        if index as usize >= self.devices.len() {
            return None;
        }

        self.visits.borrow_mut().push(index);
        Some(DeviceEntry::new(index))
    }

    fn read_property(&self, entry: &DeviceEntry, key: PropertyKey) -> Option<String> {
        let value = self.devices.get(entry.index() as usize)?.property(key)?;

        // A value with no room left for its terminator reads as absent,
        // never truncated.
        if let Some(capacity) = self.buffer_capacity {
            if value.encode_utf16().count() >= capacity {
                return None;
            }
        }

        Some(value.clone())
    }
}

impl Drop for FakeEnumeration {
    fn drop(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}
