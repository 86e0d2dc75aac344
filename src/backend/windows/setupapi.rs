//! Helpers for working with SetupAPI.

use std::mem;
use std::ptr;

use log::warn;
use windows_sys::Win32::Devices::DeviceAndDriverInstallation::{
    SetupDiDestroyDeviceInfoList, SetupDiEnumDeviceInfo, SetupDiGetClassDevsW,
    SetupDiGetDeviceRegistryPropertyW, DIGCF_ALLCLASSES, DIGCF_PRESENT, HDEVINFO,
    SPDRP_DEVICEDESC, SPDRP_DRIVER, SPDRP_HARDWAREID, SPDRP_MFG,
    SPDRP_PHYSICAL_DEVICE_OBJECT_NAME, SP_DEVINFO_DATA,
};
use windows_sys::Win32::Foundation::{GetLastError, ERROR_NO_MORE_ITEMS, INVALID_HANDLE_VALUE};

use crate::device::{DeviceFilter, PropertyKey};

/// UTF-16 units in the per-read property scratch buffer. Generous for the
/// registry attribute strings we ask for; anything larger reads as absent.
const PROPERTY_BUFFER_LEN: usize = 256;

/// Owning wrapper for an HDEVINFO device-information set that destroys it on
/// drop, so the set is released exactly once on every exit path.
#[derive(Debug)]
pub(crate) struct DeviceInfoSet {
    handle: HDEVINFO,
}

impl DeviceInfoSet {
    /// Asks SetupAPI for a device-information set covering `filter`.
    /// None means the OS refused to create one.
    pub(crate) fn open(filter: DeviceFilter) -> Option<Self> {
        let handle = unsafe {
            SetupDiGetClassDevsW(
                ptr::null(),
                ptr::null(),
                ptr::null_mut(),
                filter_flags(filter),
            )
        };
        if handle as isize == INVALID_HANDLE_VALUE as isize {
            return None;
        }

        Some(DeviceInfoSet { handle })
    }

    /// Fetches the inner handle for passing to SetupAPI functions.
    pub(crate) fn get(&self) -> HDEVINFO {
        self.handle
    }
}

impl Drop for DeviceInfoSet {
    fn drop(&mut self) {
        let rc = unsafe { SetupDiDestroyDeviceInfoList(self.handle) };
        if rc == 0 {
            warn!(
                "failed to destroy a device-information set: win32 error {}",
                unsafe { GetLastError() }
            );
        }
    }
}

/// Maps our filter configuration onto SetupAPI's DIGCF flag set.
fn filter_flags(filter: DeviceFilter) -> u32 {
    let mut flags = 0;
    if filter.present_only {
        flags |= DIGCF_PRESENT;
    }
    if filter.all_classes {
        flags |= DIGCF_ALLCLASSES;
    }
    flags
}

/// Maps our property keys onto SetupAPI's registry property codes.
fn spdrp_code(key: PropertyKey) -> u32 {
    match key {
        PropertyKey::Description => SPDRP_DEVICEDESC,
        PropertyKey::HardwareId => SPDRP_HARDWAREID,
        PropertyKey::Manufacturer => SPDRP_MFG,
        PropertyKey::Driver => SPDRP_DRIVER,
        PropertyKey::PhysicalName => SPDRP_PHYSICAL_DEVICE_OBJECT_NAME,
    }
}

/// Fetches the descriptor block for the entry at `index`, or None once the
/// set has no entry there.
///
/// SetupAPI reports exhaustion and per-index failure through the same signal;
/// we end the enumeration either way, but log when the terminating error is
/// not "no more items".
pub(crate) fn devinfo_data_at(set: &DeviceInfoSet, index: u32) -> Option<SP_DEVINFO_DATA> {
    let mut data: SP_DEVINFO_DATA = unsafe { mem::zeroed() };
    data.cbSize = mem::size_of::<SP_DEVINFO_DATA>() as u32;

    let rc = unsafe { SetupDiEnumDeviceInfo(set.get(), index, &mut data) };
    if rc == 0 {
        let last_error = unsafe { GetLastError() };
        if last_error != ERROR_NO_MORE_ITEMS {
            warn!("device enumeration ended early at index {index}: win32 error {last_error}");
        }
        return None;
    }

    Some(data)
}

/// Reads one registry property of the entry at `index` into a bounded scratch
/// buffer and decodes it.
///
/// Any failure -- the property not being set for this device, or its value
/// being too large for the buffer -- reads as None; the value is never
/// silently truncated. Multi-string values (hardware IDs) decode to their
/// first string.
pub(crate) fn read_registry_property(
    set: &DeviceInfoSet,
    index: u32,
    key: PropertyKey,
) -> Option<String> {
    let data = devinfo_data_at(set, index)?;
    let mut buffer = [0u16; PROPERTY_BUFFER_LEN];

    let rc = unsafe {
        SetupDiGetDeviceRegistryPropertyW(
            set.get(),
            &data,
            spdrp_code(key),
            ptr::null_mut(),
            buffer.as_mut_ptr() as *mut u8,
            (buffer.len() * mem::size_of::<u16>()) as u32,
            ptr::null_mut(),
        )
    };
    if rc == 0 {
        return None;
    }

    Some(decode_utf16_until_nul(&buffer))
}

/// Decodes a NUL-terminated UTF-16 buffer, dropping the terminator and any
/// trailing padding.
fn decode_utf16_until_nul(buffer: &[u16]) -> String {
    let len = buffer
        .iter()
        .position(|&unit| unit == 0)
        .unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}
