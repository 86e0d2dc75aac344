//! Looks up a single device by its description string and prints its report.

use std::io::stdin;

use devseek::{find_by_description, DeviceFilter, DeviceReport};

/// Searched for when no description is given on the command line.
const DEFAULT_TARGET: &str = "Logitech G HUB Virtual Bus Enumerator";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_TARGET.to_string());

    // Search present devices of all classes for an exact description match.
    let outcome = find_by_description(DeviceFilter::default(), &target);

    match &outcome {
        Ok(Some(report)) => print_report(&target, report),
        Ok(None) => println!("Device \"{target}\" not found."),
        Err(_) => {}
    }

    println!("Press the Enter key to exit.");
    stdin().read_line(&mut String::new())?;

    outcome?;
    Ok(())
}

fn print_report(target: &str, report: &DeviceReport) {
    println!("Device \"{target}\" found:");
    println!("  Description: {}", report.description);
    if let Some(hardware_id) = &report.hardware_id {
        println!("  Hardware ID: {hardware_id}");
    }
    if let Some(manufacturer) = &report.manufacturer {
        println!("  Manufacturer: {manufacturer}");
    }
    if let Some(driver) = &report.driver {
        println!("  Driver: {driver}");
    }
    if let Some(physical_name) = &report.physical_name {
        println!("  Physical name: {physical_name}");
    }
}
