//! Abstraction over the OS/host's device inventory.

use std::rc::Rc;

use crate::backend::{create_default_backend, Backend, DeviceIterator, Enumeration};
use crate::device::{DeviceEntry, DeviceFilter, DeviceReport, PropertyKey};
use crate::error::DeviceResult;

/// Representation of the device inventory: that is, the thing (e.g. the OS)
/// that knows which devices exist and what they are called. This is typically
/// an encapsulation of your OS connection.
pub struct Inventory {
    /// The backend used to provide the enumerations for this Inventory.
    backend: Rc<dyn Backend>,
}

impl Inventory {
    /// Creates a new Inventory, using the backend appropriate for the current platform.
    pub fn new() -> DeviceResult<Self> {
        let backend = create_default_backend()?;
        Ok(Self::new_from_backend(backend))
    }

    /// Creates a new Inventory from a custom backend; this allows the library
    /// to be used in contexts we don't yet support, and lets tests substitute
    /// an in-memory device tree.
    ///
    /// Most of the time, you want [Inventory::new].
    pub fn new_from_backend(backend: Rc<dyn Backend>) -> Self {
        Inventory { backend }
    }

    /// Searches the inventory for the first device whose description exactly,
    /// case-sensitively equals `target`, and gathers its report.
    ///
    /// Returns Ok(None) when no device matches -- that is a normal outcome,
    /// not an error. Per-property read failures on the matched device only
    /// omit the affected field; the search itself still succeeds. The only
    /// hard error is [crate::Error::EnumerationUnavailable], raised when the
    /// enumeration cannot be opened at all.
    ///
    /// The enumeration's OS resources are released before this returns, on
    /// every control path.
    pub fn find_by_description(
        &self,
        filter: DeviceFilter,
        target: &str,
    ) -> DeviceResult<Option<DeviceReport>> {
        let enumeration = self.backend.open_enumeration(filter)?;

        for entry in DeviceIterator::new(enumeration.as_ref()) {
            // A device whose description can't be read can never match.
            let description = match enumeration.read_property(&entry, PropertyKey::Description) {
                Some(description) => description,
                None => continue,
            };

            if description != target {
                continue;
            }

            // First match wins; the remaining properties are best-effort.
            return Ok(Some(assemble_report(
                enumeration.as_ref(),
                &entry,
                description,
            )));
        }

        Ok(None)
    }
}

/// Gathers the reportable properties of a matched entry. Fields whose reads
/// fail are simply left out.
fn assemble_report(
    enumeration: &dyn Enumeration,
    entry: &DeviceEntry,
    description: String,
) -> DeviceReport {
    DeviceReport {
        description,
        hardware_id: enumeration.read_property(entry, PropertyKey::HardwareId),
        manufacturer: enumeration.read_property(entry, PropertyKey::Manufacturer),
        driver: enumeration.read_property(entry, PropertyKey::Driver),
        physical_name: enumeration.read_property(entry, PropertyKey::PhysicalName),
    }
}

/// Searches for a device by its exact description string.
/// Convenience form that implicitly constructs (and destroys) an Inventory object.
pub fn find_by_description(
    filter: DeviceFilter,
    target: &str,
) -> DeviceResult<Option<DeviceReport>> {
    Inventory::new()?.find_by_description(filter, target)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::backend::fake::{FakeBackend, FakeDevice};
    use crate::error::Error;

    const TARGET: &str = "Logitech G HUB Virtual Bus Enumerator";

    fn sample_devices() -> Vec<FakeDevice> {
        vec![
            FakeDevice::with_description("Mouse"),
            FakeDevice {
                description: Some(TARGET.to_string()),
                hardware_id: Some(r"HID\VID_046D".to_string()),
                manufacturer: None,
                driver: Some(r"{4d36e972-e325-11ce-bfc1-08002be10318}\0007".to_string()),
                physical_name: Some(r"\Device\00000a1b".to_string()),
            },
            FakeDevice::with_description("Keyboard"),
        ]
    }

    #[test]
    fn iterator_visits_every_entry_once_in_order() {
        let backend = FakeBackend::new(sample_devices());
        let enumeration = backend
            .open_enumeration(DeviceFilter::default())
            .expect("fake backend should open");

        let indices: Vec<u32> = DeviceIterator::new(enumeration.as_ref())
            .map(|entry| entry.index())
            .collect();

        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(*backend.visits.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn exhausted_iterator_stays_exhausted() {
        let backend = FakeBackend::new(vec![FakeDevice::with_description("Mouse")]);
        let enumeration = backend
            .open_enumeration(DeviceFilter::default())
            .expect("fake backend should open");

        let mut iterator = DeviceIterator::new(enumeration.as_ref());
        assert!(iterator.next().is_some());
        assert!(iterator.next().is_none());
        assert!(iterator.next().is_none());
    }

    #[test]
    fn match_produces_report_with_soft_failures_omitted() {
        let backend = FakeBackend::new(sample_devices());
        let releases = Rc::clone(&backend.releases);
        let inventory = Inventory::new_from_backend(Rc::new(backend));

        let report = inventory
            .find_by_description(DeviceFilter::default(), TARGET)
            .expect("enumeration should open")
            .expect("target device should be found");

        assert_eq!(report.description, TARGET);
        assert_eq!(report.hardware_id.as_deref(), Some(r"HID\VID_046D"));
        assert_eq!(report.manufacturer, None);
        assert!(report.driver.is_some());
        assert!(report.physical_name.is_some());
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn search_stops_at_first_matching_entry() {
        let backend = FakeBackend::new(sample_devices());
        let visits = Rc::clone(&backend.visits);
        let inventory = Inventory::new_from_backend(Rc::new(backend));

        let found = inventory
            .find_by_description(DeviceFilter::default(), TARGET)
            .expect("enumeration should open");

        assert!(found.is_some());
        // Match at index 1: the entry after it is never requested.
        assert_eq!(*visits.borrow(), vec![0, 1]);
    }

    #[test]
    fn first_match_wins_when_descriptions_collide() {
        let devices = vec![
            FakeDevice {
                description: Some(TARGET.to_string()),
                hardware_id: Some("first".to_string()),
                ..Default::default()
            },
            FakeDevice {
                description: Some(TARGET.to_string()),
                hardware_id: Some("second".to_string()),
                ..Default::default()
            },
        ];
        let inventory = Inventory::new_from_backend(Rc::new(FakeBackend::new(devices)));

        let report = inventory
            .find_by_description(DeviceFilter::default(), TARGET)
            .expect("enumeration should open")
            .expect("a device should match");

        assert_eq!(report.hardware_id.as_deref(), Some("first"));
    }

    #[test]
    fn missing_hardware_id_still_reports_found() {
        let mut devices = sample_devices();
        devices[1].hardware_id = None;
        let inventory = Inventory::new_from_backend(Rc::new(FakeBackend::new(devices)));

        let report = inventory
            .find_by_description(DeviceFilter::default(), TARGET)
            .expect("enumeration should open")
            .expect("target device should be found");

        assert_eq!(report.hardware_id, None);
        assert_eq!(report.description, TARGET);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let backend = FakeBackend::new(sample_devices());
        let inventory = Inventory::new_from_backend(Rc::new(backend));

        let found = inventory
            .find_by_description(DeviceFilter::default(), &TARGET.to_uppercase())
            .expect("enumeration should open");

        assert_eq!(found, None);
    }

    #[test]
    fn unmatched_search_is_not_found_not_an_error() {
        let backend = FakeBackend::new(sample_devices());
        let releases = Rc::clone(&backend.releases);
        let inventory = Inventory::new_from_backend(Rc::new(backend));

        let outcome = inventory.find_by_description(DeviceFilter::default(), "Webcam");

        assert_eq!(outcome, Ok(None));
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn empty_inventory_is_not_found() {
        let backend = FakeBackend::new(vec![]);
        let releases = Rc::clone(&backend.releases);
        let inventory = Inventory::new_from_backend(Rc::new(backend));

        let outcome = inventory.find_by_description(DeviceFilter::default(), TARGET);

        assert_eq!(outcome, Ok(None));
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn refused_open_is_a_hard_error_with_nothing_to_release() {
        let mut backend = FakeBackend::new(sample_devices());
        backend.refuse_open = true;
        let releases = Rc::clone(&backend.releases);
        let visits = Rc::clone(&backend.visits);
        let inventory = Inventory::new_from_backend(Rc::new(backend));

        let outcome = inventory.find_by_description(DeviceFilter::default(), TARGET);

        assert_eq!(outcome, Err(Error::EnumerationUnavailable));
        // The open never succeeded: no iteration, and no release to perform.
        assert_eq!(releases.get(), 0);
        assert!(visits.borrow().is_empty());
    }

    #[test]
    fn unreadable_description_never_matches() {
        let devices = vec![
            FakeDevice {
                description: None,
                hardware_id: Some("ghost".to_string()),
                ..Default::default()
            },
            FakeDevice {
                description: Some(TARGET.to_string()),
                hardware_id: Some("real".to_string()),
                ..Default::default()
            },
        ];
        let inventory = Inventory::new_from_backend(Rc::new(FakeBackend::new(devices)));

        let report = inventory
            .find_by_description(DeviceFilter::default(), TARGET)
            .expect("enumeration should open")
            .expect("the readable device should match");

        assert_eq!(report.hardware_id.as_deref(), Some("real"));
    }

    #[test]
    fn oversized_property_value_reads_as_absent() {
        let mut devices = sample_devices();
        devices[1].manufacturer = Some("Logitech ".repeat(64));
        let mut backend = FakeBackend::new(devices);
        backend.buffer_capacity = Some(256);
        let inventory = Inventory::new_from_backend(Rc::new(backend));

        let report = inventory
            .find_by_description(DeviceFilter::default(), TARGET)
            .expect("enumeration should open")
            .expect("target device should be found");

        // The oversized value is omitted, never truncated; values that fit
        // are unaffected.
        assert_eq!(report.manufacturer, None);
        assert_eq!(report.hardware_id.as_deref(), Some(r"HID\VID_046D"));
    }
}
