//! # Serial Port Setup
//!
//! Opens a tty and puts it into raw 8N1 mode without flow control or echo,
//! which is what the modules expect.
use std::{
    fs::{File, OpenOptions},
    io,
    os::unix::fs::OpenOptionsExt,
    path::Path,
};

use nix::{
    fcntl::OFlag,
    sys::termios::{self, BaudRate, ControlFlags, SetArg},
};

/// Host baud rates the tty can be opened with
fn termios_baud_rate(baudrate: u32) -> Option<BaudRate> {
    match baudrate {
        1200 => Some(BaudRate::B1200),
        2400 => Some(BaudRate::B2400),
        4800 => Some(BaudRate::B4800),
        9600 => Some(BaudRate::B9600),
        19200 => Some(BaudRate::B19200),
        38400 => Some(BaudRate::B38400),
        57600 => Some(BaudRate::B57600),
        115200 => Some(BaudRate::B115200),
        _ => None,
    }
}

/// Opens the serial port at `path` and configures it for talking to a module.
pub fn open(path: impl AsRef<Path>, baudrate: u32) -> io::Result<File> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Serial port '{}' does not exist.", path.display()),
        ));
    }
    let speed = termios_baud_rate(baudrate).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Baud rate {} is not supported by the host", baudrate),
        )
    })?;

    log::debug!("Opening serial port {}", path.display());
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(OFlag::O_NOCTTY.bits())
        .open(path)?;

    let mut settings = termios::tcgetattr(&file)?;
    termios::cfmakeraw(&mut settings);
    settings.control_flags.remove(ControlFlags::CRTSCTS);
    settings
        .control_flags
        .insert(ControlFlags::CLOCAL | ControlFlags::CREAD);
    termios::cfsetspeed(&mut settings, speed)?;
    termios::tcsetattr(&file, SetArg::TCSANOW, &settings)?;
    log::info!(
        "Configured {} for {} baud, 8N1, raw",
        path.display(),
        baudrate
    );
    Ok(file)
}
