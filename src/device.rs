//! Interface for describing and reporting inventory devices.

/// Selects which slice of the OS device tree an enumeration covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFilter {
    /// If set, restricts the enumeration to devices currently present.
    pub present_only: bool,

    /// If set, covers every device class rather than a single one.
    pub all_classes: bool,
}

impl Default for DeviceFilter {
    /// Present devices of all classes.
    fn default() -> Self {
        DeviceFilter {
            present_only: true,
            all_classes: true,
        }
    }
}

/// The textual attributes a device entry can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Description,
    HardwareId,
    Manufacturer,
    Driver,
    PhysicalName,
}

/// An index-addressed token for one device inside an open enumeration.
///
/// Entries are transient view handles: one is only meaningful while the
/// enumeration that produced it is alive, and must never be cached across
/// searches. The OS-side descriptor block is re-materialized from the index
/// by the backend whenever a property is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceEntry {
    index: u32,
}

impl DeviceEntry {
    pub fn new(index: u32) -> Self {
        DeviceEntry { index }
    }

    /// The zero-based position of this entry within its enumeration.
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// Contains everything we could learn about a matched device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReport {
    /// The description string that matched the search target.
    pub description: String,

    /// The hardware identifier assigned to the device, if we were able to get one.
    pub hardware_id: Option<String>,

    /// The manufacturer string, if we were able to get one.
    pub manufacturer: Option<String>,

    /// The driver reference associated with the device, if we were able to get one.
    pub driver: Option<String>,

    /// The physical device object name, if we were able to get one.
    pub physical_name: Option<String>,
}
