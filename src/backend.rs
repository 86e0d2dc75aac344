//! Traits and factory for our per-OS backends.
//! Backends can (and will) contain unsafe code, but they expose a safe interface here.

use std::rc::Rc;

use crate::device::{DeviceEntry, DeviceFilter, PropertyKey};
use crate::error::DeviceResult;

#[cfg(windows)]
mod windows;

#[doc(hidden)]
pub mod fake;

/// One open pass over the OS device tree.
///
/// An implementation owns whatever resource the OS allocated for the
/// enumeration and releases it exactly once when dropped, no matter how the
/// search that opened it ends.
pub trait Enumeration: std::fmt::Debug {
    /// Returns the entry at the given zero-based index, or None once the
    /// enumeration has no entry there. The underlying OS call reports
    /// exhaustion and per-index failure through the same signal, so None
    /// always means "no more entries".
    fn entry_at(&self, index: u32) -> Option<DeviceEntry>;

    /// Reads one textual property of an entry. None means the property is not
    /// retrievable for this device -- a normal outcome for many devices, not
    /// an error.
    fn read_property(&self, entry: &DeviceEntry, key: PropertyKey) -> Option<String>;
}

/// Trait that unifies all of our OS-specific backends.
pub trait Backend: std::fmt::Debug {
    /// Opens an enumeration over the devices selected by `filter`.
    /// Each call produces an independent enumeration with its own OS resources.
    fn open_enumeration(&self, filter: DeviceFilter) -> DeviceResult<Box<dyn Enumeration>>;
}

/// Walks the entries of an open enumeration: each visited exactly once, in
/// ascending index order.
///
/// The underlying enumeration is stateful and index-based, so the sequence is
/// finite and not restartable; create a fresh iterator (and enumeration) to
/// walk the tree again.
pub struct DeviceIterator<'a> {
    enumeration: &'a dyn Enumeration,
    cursor: u32,
}

impl<'a> DeviceIterator<'a> {
    pub fn new(enumeration: &'a dyn Enumeration) -> Self {
        DeviceIterator {
            enumeration,
            cursor: 0,
        }
    }
}

impl Iterator for DeviceIterator<'_> {
    type Item = DeviceEntry;

    fn next(&mut self) -> Option<DeviceEntry> {
        let entry = self.enumeration.entry_at(self.cursor)?;
        self.cursor += 1;
        Some(entry)
    }
}

/// Creates a default backend implementation for Windows machines.
#[cfg(windows)]
pub fn create_default_backend() -> DeviceResult<Rc<dyn Backend>> {
    Ok(Rc::new(windows::WindowsBackend::new()?))
}

/// Creates a placeholder backend for platforms without device-inventory
/// support; every open reports the enumeration as unavailable.
#[cfg(not(windows))]
pub fn create_default_backend() -> DeviceResult<Rc<dyn Backend>> {
    Ok(Rc::new(UnsupportedBackend {}))
}

#[cfg(not(windows))]
#[derive(Debug)]
struct UnsupportedBackend {}

#[cfg(not(windows))]
impl Backend for UnsupportedBackend {
    fn open_enumeration(&self, _filter: DeviceFilter) -> DeviceResult<Box<dyn Enumeration>> {
        Err(crate::error::Error::EnumerationUnavailable)
    }
}
