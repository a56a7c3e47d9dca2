use anyhow::Result;
use laser_core::available_ports;

pub fn run() -> Result<()> {
    let ports = available_ports()?;
    if ports.is_empty() {
        println!("No serial ports found.");
        return Ok(());
    }

    for port in ports {
        println!("{}", port);
    }
    Ok(())
}
