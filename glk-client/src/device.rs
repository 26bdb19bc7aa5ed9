use std::io::{Read, Write};

use glk_protocol::{
    Command, Dimensions, FirmwareVersion, ModelId, codec::read_reply, error::Error,
};

use crate::Glk;

/// Facts about the connected module, queried once and then memoized for the
/// lifetime of the connection.
///
/// Nothing invalidates this cache. Power-cycling or wiping the module while connected
/// leaves stale values behind; reconnect in that case.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeviceState {
    pub(crate) lcd_type: Option<ModelId>,
    pub(crate) firmware_version: Option<FirmwareVersion>,
}

impl<T: Read + Write> Glk<T> {
    /// Return the product identifier of the module (for example `GLK24064-25`).
    ///
    /// Codes the driver does not know resolve to `Unknown-<code>` rather than an error.
    pub fn lcd_type(&mut self) -> Result<ModelId, Error> {
        if let Some(lcd_type) = &self.state.lcd_type {
            return Ok(lcd_type.clone());
        }
        self.send(&Command::ReadModuleType)?;
        let [code] = read_reply::<1>(&mut self.transport, "module type")?;
        let lcd_type = ModelId::from_code(code);
        if lcd_type.is_known() {
            log::debug!("Module type 0x{:02x} is {}", code, lcd_type);
        } else {
            log::warn!("Unrecognized module type 0x{:02x}", code);
        }
        self.state.lcd_type = Some(lcd_type.clone());
        Ok(lcd_type)
    }

    /// Return the firmware version of the module, for example 5.4
    pub fn firmware_version(&mut self) -> Result<FirmwareVersion, Error> {
        if let Some(version) = self.state.firmware_version {
            return Ok(version);
        }
        self.send(&Command::ReadFirmwareVersion)?;
        let [reply] = read_reply::<1>(&mut self.transport, "firmware version")?;
        let version = FirmwareVersion::from_reply(reply);
        log::debug!("Firmware version is {}", version);
        self.state.firmware_version = Some(version);
        Ok(version)
    }

    /// Return the dimensions of the display in pixels, derived from [`Glk::lcd_type`]
    pub fn lcd_dimensions(&mut self) -> Result<Dimensions, Error> {
        self.lcd_type()?.dimensions()
    }
}
