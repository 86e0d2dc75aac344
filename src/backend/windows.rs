//! Core, low-level functionality for Windows.

use super::{Backend, Enumeration};
use crate::device::{DeviceEntry, DeviceFilter, PropertyKey};
use crate::error::{DeviceResult, Error};

mod setupapi;

use setupapi::DeviceInfoSet;

/// Per-OS data for the Windows backend.
#[derive(Debug)]
pub struct WindowsBackend {}

impl WindowsBackend {
    pub fn new() -> DeviceResult<WindowsBackend> {
        Ok(WindowsBackend {})
    }
}

impl Backend for WindowsBackend {
    fn open_enumeration(&self, filter: DeviceFilter) -> DeviceResult<Box<dyn Enumeration>> {
        let set = DeviceInfoSet::open(filter).ok_or(Error::EnumerationUnavailable)?;
        Ok(Box::new(WindowsEnumeration { set }))
    }
}

/// One open SetupAPI device-information set. The set handle is destroyed when
/// this is dropped.
#[derive(Debug)]
struct WindowsEnumeration {
    set: DeviceInfoSet,
}

impl Enumeration for WindowsEnumeration {
    fn entry_at(&self, index: u32) -> Option<DeviceEntry> {
        setupapi::devinfo_data_at(&self.set, index).map(|_| DeviceEntry::new(index))
    }

    fn read_property(&self, entry: &DeviceEntry, key: PropertyKey) -> Option<String> {
        setupapi::read_registry_property(&self.set, entry.index(), key)
    }
}
