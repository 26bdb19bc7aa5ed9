//! # GLK Client
//!
//! A Rust driver for Matrix Orbital GLK/GLC graphic LCD modules connected over a serial link.
//!
//! ## Overview
//!
//! This crate provides a high-level interface to a single module. It validates parameters,
//! translates each operation into command frames, and reads back replies where the
//! command elicits one. The module is driven strictly synchronously: every command that
//! expects a reply blocks until the reply has been read.
//!
//! The driver does not open or configure the serial port. Any duplex byte stream
//! implementing [`std::io::Read`] and [`std::io::Write`] can be used as transport.
//!
//! For detailed protocol information, see the [`glk_protocol`] crate.
//!
//! ## Basic Usage
//!
//! ### Identifying the Module
//!
//! ```ignore
//! use glk_client::Glk;
//!
//! let mut lcd = Glk::new(serial_port);
//! println!("LCD Type:       {}", lcd.lcd_type()?);
//! println!("LCD Dimensions: {}", lcd.lcd_dimensions()?);
//! println!("LCD Firmware:   {}", lcd.firmware_version()?);
//! ```
//!
//! ### Drawing
//!
//! ```ignore
//! lcd.clear_screen()?;
//! lcd.set_backlight(true)?;
//! lcd.set_brightness(128)?;
//!
//! // A triangle
//! lcd.draw_line(1, 30, 30, 1)?;
//! lcd.draw_line_continue(59, 30)?;
//! lcd.draw_line_continue(1, 30)?;
//! ```
//!
//! Coordinates are passed through unchecked; the module clips them.
//!
//! ### Reading Keys
//!
//! ```ignore
//! lcd.set_auto_transmit_keys(false)?;
//! for key in lcd.poll_keys()? {
//!     println!("Key {}", key);
//! }
//! ```
//!
//! ## Error Handling
//!
//! Parameters are validated before anything is written, so a
//! [`Error::Validation`] never leaves a partial command on the wire. Transport errors are
//! returned as-is; nothing is retried since most commands are not idempotent.
//!
//! ## Logging
//!
//! This crate uses the `log` crate for diagnostics. Every command is logged at debug level,
//! raw frame bytes at trace level.
use std::io::{Read, Write};

use glk_protocol::{
    Command, DirectoryEntry, FileKind, Frame, LedColor, baud_rate_code,
    codec::{KeyPresses, read_directory, read_reply},
    error::Error,
    led_gpo_base,
};

mod config;
mod device;
#[cfg(test)]
mod mock;

pub use config::{Builder, Config};
use device::DeviceState;

/// Milliseconds per debounce tick of the module's keypad scanner
const DEBOUNCE_TICK_MS: f64 = 6.554;

/// Driver for one GLK/GLC module.
///
/// Owns the transport. Commands and replies are paired on the wire, so a `Glk` must not be
/// used from several threads without external locking.
pub struct Glk<T> {
    transport: T,
    state: DeviceState,
    baudrate: u32,
}

impl<T> Glk<T> {
    pub fn new(transport: T) -> Glk<T> {
        Glk::with_config(transport, Config::default())
    }

    pub fn with_config(transport: T, config: Config) -> Glk<T> {
        Glk {
            transport,
            state: DeviceState {
                lcd_type: config.lcd_type,
                firmware_version: None,
            },
            baudrate: config.baudrate,
        }
    }

    /// The baud rate of the host side of the link, as configured
    pub fn baudrate(&self) -> u32 {
        self.baudrate
    }

    /// Release the transport
    pub fn into_inner(self) -> T {
        self.transport
    }
}

fn byte_param(value: i32, what: &str) -> Result<u8, Error> {
    u8::try_from(value).map_err(|_| Error::Validation(format!("{} value is out of range", what)))
}

impl<T: Read + Write> Glk<T> {
    /// Write one command to the module
    pub fn send(&mut self, command: &Command) -> Result<(), Error> {
        log::debug!("Sending {:?}", command);
        self.write_frame(&command.to_frame())
    }

    /// Send a raw command, where `params` are the bytes following the opcode.
    /// No validation takes place.
    pub fn send_command(&mut self, opcode: u8, params: &[u8]) -> Result<(), Error> {
        log::debug!("Sending raw opcode 0x{:02x}", opcode);
        self.write_frame(&Frame::encode(opcode, params))
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<(), Error> {
        log::trace!("Frame: {:02x?}", frame.as_bytes());
        frame.write_to(&mut self.transport)?;
        Ok(())
    }

    /// Print text at the current insertion point, using the current font.
    pub fn write_text(&mut self, text: &str) -> Result<(), Error> {
        log::debug!("Writing text {:?}", text);
        self.transport.write_all(text.as_bytes())?;
        self.transport.flush()?;
        Ok(())
    }

    /// Set the I2C write address of the module. The read address is one higher, so
    /// the write address should be even.
    pub fn set_i2c_address(&mut self, address: i32) -> Result<(), Error> {
        let address = byte_param(address, "I2C slave address")?;
        if address % 2 != 0 {
            log::warn!("I2C write address 0x{:02x} is odd", address);
        }
        self.send(&Command::SetI2cAddress { address })
    }

    /// Switch the module's serial port to `baudrate`. The change takes place immediately,
    /// so the host side has to follow.
    pub fn set_lcd_baudrate(&mut self, baudrate: u32) -> Result<(), Error> {
        let code = baud_rate_code(baudrate).ok_or_else(|| {
            Error::Validation(format!("Invalid/unsupported baud rate: {}", baudrate))
        })?;
        self.send(&Command::SetLcdBaudRate { code })
    }

    /// Only disabling flow control is supported
    pub fn set_flow_control(&mut self, enabled: bool) -> Result<(), Error> {
        if enabled {
            return Err(Error::Unsupported("Flow control"));
        }
        self.send(&Command::FlowControlOff)
    }

    /// Turn the backlight on permanently, or off.
    pub fn set_backlight(&mut self, on: bool) -> Result<(), Error> {
        if on {
            self.send(&Command::BacklightOn { minutes: 0 })
        } else {
            self.send(&Command::BacklightOff)
        }
    }

    /// Move the text insertion point to the top left of the display area
    pub fn cursor_home(&mut self) -> Result<(), Error> {
        self.send(&Command::CursorHome)
    }

    /// Set the text insertion point to a column and row of the current font's base size
    pub fn set_cursor_position(&mut self, col: u8, row: u8) -> Result<(), Error> {
        self.send(&Command::SetCursorPosition { col, row })
    }

    /// Set the text insertion point to a pixel
    pub fn set_cursor_coordinate(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.send(&Command::SetCursorCoordinate { x, y })
    }

    /// Set the contrast between 0 and 255. Higher values make 'on' pixels appear darker.
    pub fn set_contrast(&mut self, value: i32) -> Result<(), Error> {
        let value = byte_param(value, "Contrast")?;
        self.send(&Command::SetContrast { value })
    }

    /// Like [`Glk::set_contrast`], but the value survives a power cycle
    pub fn save_contrast(&mut self, value: i32) -> Result<(), Error> {
        let value = byte_param(value, "Contrast")?;
        self.send(&Command::SaveContrast { value })
    }

    /// Set the backlight brightness between 0 and 255
    pub fn set_brightness(&mut self, value: i32) -> Result<(), Error> {
        let value = byte_param(value, "Brightness")?;
        self.send(&Command::SetBrightness { value })
    }

    /// Like [`Glk::set_brightness`], but the value survives a power cycle
    pub fn save_brightness(&mut self, value: i32) -> Result<(), Error> {
        let value = byte_param(value, "Brightness")?;
        self.send(&Command::SaveBrightness { value })
    }

    /// When enabled, text reaching the bottom right scrolls the display up by a line
    pub fn set_autoscroll(&mut self, enabled: bool) -> Result<(), Error> {
        if enabled {
            self.send(&Command::AutoscrollOn)
        } else {
            self.send(&Command::AutoscrollOff)
        }
    }

    /// Set the color of subsequent drawing commands; `true` is black, `false` white.
    pub fn set_drawing_color(&mut self, black: bool) -> Result<(), Error> {
        self.send(&Command::DrawingColor { black })
    }

    /// Clear the display and move the insertion point home
    pub fn clear_screen(&mut self) -> Result<(), Error> {
        self.send(&Command::ClearScreen)
    }

    /// Draw a bitmap from the module's memory with its top left corner at `x`, `y`
    pub fn draw_bitmap(&mut self, refid: u8, x: u8, y: u8) -> Result<(), Error> {
        self.send(&Command::DrawBitmap { refid, x, y })
    }

    pub fn draw_pixel(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.send(&Command::DrawPixel { x, y })
    }

    /// Draw a line in the current drawing color.
    ///
    /// Lines may interpolate differently depending on direction, so a white line drawn right
    /// to left may not fully erase a black line drawn left to right.
    pub fn draw_line(&mut self, x1: u8, y1: u8, x2: u8, y2: u8) -> Result<(), Error> {
        self.send(&Command::DrawLine { x1, y1, x2, y2 })
    }

    /// Continue the last line from its end to `x`, `y`
    pub fn draw_line_continue(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.send(&Command::DrawLineContinue { x, y })
    }

    /// Draw a rectangle outline from the top left `x1`, `y1` to the bottom right `x2`, `y2`
    pub fn draw_rect(&mut self, color: u8, x1: u8, y1: u8, x2: u8, y2: u8) -> Result<(), Error> {
        self.send(&Command::DrawRect {
            color,
            x1,
            y1,
            x2,
            y2,
        })
    }

    /// Draw a filled rectangle
    pub fn draw_solid_rect(
        &mut self,
        color: u8,
        x1: u8,
        y1: u8,
        x2: u8,
        y2: u8,
    ) -> Result<(), Error> {
        self.send(&Command::DrawSolidRect {
            color,
            x1,
            y1,
            x2,
            y2,
        })
    }

    /// Select the font for text output
    pub fn set_font(&mut self, refid: u8) -> Result<(), Error> {
        self.send(&Command::SetFont { refid })
    }

    pub fn delete_bitmap(&mut self, refid: u8) -> Result<(), Error> {
        self.send(&Command::DeleteFile {
            kind: FileKind::Bitmap,
            refid,
        })
    }

    pub fn delete_font(&mut self, refid: u8) -> Result<(), Error> {
        self.send(&Command::DeleteFile {
            kind: FileKind::Font,
            refid,
        })
    }

    /// Erase the module's non-volatile memory: fonts, bitmaps and all settings.
    pub fn wipe_filesystem(&mut self) -> Result<(), Error> {
        log::warn!("Wiping the module filesystem");
        self.send(&Command::WipeFilesystem)
    }

    /// Number of bytes left in the module's memory
    pub fn filesystem_space(&mut self) -> Result<u32, Error> {
        self.send(&Command::FilesystemSpace)?;
        let reply = read_reply::<4>(&mut self.transport, "filesystem space")?;
        Ok(u32::from_le_bytes(reply))
    }

    /// Fonts and bitmaps stored on the module
    pub fn filesystem_directory(&mut self) -> Result<Vec<DirectoryEntry>, Error> {
        self.send(&Command::FilesystemDirectory)?;
        let entries = read_directory(&mut self.transport)?;
        log::debug!("Filesystem holds {} files", entries.len());
        Ok(entries)
    }

    pub fn gpo_on(&mut self, gpo: u8) -> Result<(), Error> {
        self.send(&Command::GpoOn { gpo })
    }

    pub fn gpo_off(&mut self, gpo: u8) -> Result<(), Error> {
        self.send(&Command::GpoOff { gpo })
    }

    /// Set on-board LED `index` (0 to 2) to a color.
    ///
    /// Only modules with on-board LEDs (such as the GLK19264-7T-1U) support this.
    pub fn set_led(&mut self, index: u8, color: LedColor) -> Result<(), Error> {
        let base = led_gpo_base(index)
            .ok_or_else(|| Error::Validation(format!("Invalid LED number {}", index)))?;
        let (first, second) = color.gpo_states();
        for (gpo, on) in [(base, first), (base + 1, second)] {
            if on {
                self.gpo_on(gpo)?;
            } else {
                self.gpo_off(gpo)?;
            }
        }
        Ok(())
    }

    pub fn led_off(&mut self, index: u8) -> Result<(), Error> {
        self.set_led(index, LedColor::Off)
    }

    pub fn led_red(&mut self, index: u8) -> Result<(), Error> {
        self.set_led(index, LedColor::Red)
    }

    pub fn led_green(&mut self, index: u8) -> Result<(), Error> {
        self.set_led(index, LedColor::Green)
    }

    pub fn led_yellow(&mut self, index: u8) -> Result<(), Error> {
        self.set_led(index, LedColor::Yellow)
    }

    /// When enabled, the module sends key presses as they happen. Disable it to poll instead.
    pub fn set_auto_transmit_keys(&mut self, enabled: bool) -> Result<(), Error> {
        if enabled {
            self.send(&Command::AutoTransmitKeysOn)
        } else {
            self.send(&Command::AutoTransmitKeysOff)
        }
    }

    /// Discard key presses buffered on the module
    pub fn clear_key_buffer(&mut self) -> Result<(), Error> {
        self.send(&Command::ClearKeyBuffer)
    }

    /// Set the keypad debounce time. The module counts in ticks of 6.554 ms, so at most
    /// about 1.67 s can be set.
    pub fn set_debounce_time(&mut self, ms: u32) -> Result<(), Error> {
        let ticks = (f64::from(ms) / DEBOUNCE_TICK_MS).round();
        if ticks > f64::from(u8::MAX) {
            return Err(Error::Validation(format!(
                "Debounce time of {} ms is out of range",
                ms
            )));
        }
        self.send(&Command::SetDebounceTime { ticks: ticks as u8 })
    }

    /// Poll the keys buffered on the module. The returned iterator reads the reply lazily
    /// and must be drained before the next command is sent.
    pub fn key_presses(&mut self) -> Result<KeyPresses<'_, T>, Error> {
        self.send(&Command::PollKeys)?;
        Ok(KeyPresses::new(&mut self.transport))
    }

    /// Poll the keys buffered on the module, in the order they were pressed
    pub fn poll_keys(&mut self) -> Result<Vec<u8>, Error> {
        let keys = self.key_presses()?.collect::<Result<Vec<_>, _>>()?;
        log::debug!("Polled keys: {:?}", keys);
        Ok(keys)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mock::MockTransport;

    fn written(f: impl FnOnce(&mut Glk<MockTransport>) -> Result<(), Error>) -> Vec<u8> {
        let mut lcd = Glk::new(MockTransport::default());
        f(&mut lcd).unwrap();
        lcd.into_inner().written
    }

    fn assert_validation_error(f: impl FnOnce(&mut Glk<MockTransport>) -> Result<(), Error>) {
        let mut lcd = Glk::new(MockTransport::default());
        match f(&mut lcd) {
            Err(Error::Validation(_)) => {}
            other => panic!("expected Validation error, got {:?}", other),
        }
        assert!(lcd.into_inner().written.is_empty());
    }

    #[test]
    fn byte_ranges() {
        assert_validation_error(|lcd| lcd.set_contrast(256));
        assert_validation_error(|lcd| lcd.set_contrast(-1));
        assert_validation_error(|lcd| lcd.save_contrast(300));
        assert_validation_error(|lcd| lcd.set_brightness(-5));
        assert_validation_error(|lcd| lcd.save_brightness(1000));
        assert_validation_error(|lcd| lcd.set_i2c_address(256));
        assert_validation_error(|lcd| lcd.set_debounce_time(1700));

        assert_eq!(written(|lcd| lcd.set_contrast(0)), vec![0xFE, 0x50, 0]);
        assert_eq!(written(|lcd| lcd.save_contrast(255)), vec![0xFE, 0x91, 255]);
        assert_eq!(written(|lcd| lcd.set_brightness(128)), vec![0xFE, 0x99, 128]);
        assert_eq!(written(|lcd| lcd.save_brightness(7)), vec![0xFE, 0x98, 7]);
        assert_eq!(written(|lcd| lcd.set_i2c_address(0x50)), vec![0xFE, 0x33, 0x50]);
    }

    #[test]
    fn debounce_ticks() {
        assert_eq!(written(|lcd| lcd.set_debounce_time(0)), vec![0xFE, 0x55, 0]);
        assert_eq!(written(|lcd| lcd.set_debounce_time(52)), vec![0xFE, 0x55, 8]);
        // 1671 ms rounds to 255 ticks, 1675 ms to 256
        assert_eq!(written(|lcd| lcd.set_debounce_time(1671)), vec![0xFE, 0x55, 255]);
        assert_validation_error(|lcd| lcd.set_debounce_time(1675));
    }

    #[test]
    fn baud_rates() {
        let table: [(u32, u8); 8] = [
            (9600, 0xCF),
            (14400, 0x8A),
            (19200, 0x67),
            (28800, 0x44),
            (38400, 0x33),
            (57600, 0x22),
            (76800, 0x19),
            (115200, 0x10),
        ];
        for (rate, code) in table {
            assert_eq!(
                written(|lcd| lcd.set_lcd_baudrate(rate)),
                vec![0xFE, 0x39, code]
            );
        }
        assert_validation_error(|lcd| lcd.set_lcd_baudrate(4800));
        assert_validation_error(|lcd| lcd.set_lcd_baudrate(19201));
    }

    #[test]
    fn flow_control() {
        let mut lcd = Glk::new(MockTransport::default());
        match lcd.set_flow_control(true) {
            Err(Error::Unsupported(_)) => {}
            other => panic!("expected Unsupported, got {:?}", other),
        }
        assert!(lcd.into_inner().written.is_empty());
        assert_eq!(written(|lcd| lcd.set_flow_control(false)), vec![0xFE, 0x3B]);
    }

    #[test]
    fn display_settings() {
        assert_eq!(written(|lcd| lcd.set_backlight(true)), vec![0xFE, 0x42, 0]);
        assert_eq!(written(|lcd| lcd.set_backlight(false)), vec![0xFE, 0x46]);
        assert_eq!(written(|lcd| lcd.set_autoscroll(true)), vec![0xFE, 0x51]);
        assert_eq!(written(|lcd| lcd.set_autoscroll(false)), vec![0xFE, 0x52]);
        assert_eq!(written(|lcd| lcd.set_drawing_color(true)), vec![0xFE, 0x63, 1]);
        assert_eq!(written(|lcd| lcd.set_drawing_color(false)), vec![0xFE, 0x63, 0]);
        assert_eq!(written(|lcd| lcd.clear_screen()), vec![0xFE, 0x58]);
        assert_eq!(written(|lcd| lcd.cursor_home()), vec![0xFE, 0x48]);
        assert_eq!(
            written(|lcd| lcd.set_cursor_position(10, 4)),
            vec![0xFE, 0x47, 10, 4]
        );
        assert_eq!(
            written(|lcd| lcd.set_cursor_coordinate(100, 40)),
            vec![0xFE, 0x79, 100, 40]
        );
        assert_eq!(written(|lcd| lcd.set_font(2)), vec![0xFE, 0x31, 2]);
    }

    #[test]
    fn drawing_passes_coordinates_through() {
        assert_eq!(
            written(|lcd| lcd.draw_line(1, 30, 30, 1)),
            vec![0xFE, 0x6C, 1, 30, 30, 1]
        );
        assert_eq!(
            written(|lcd| lcd.draw_line_continue(59, 30)),
            vec![0xFE, 0x65, 59, 30]
        );
        assert_eq!(
            written(|lcd| lcd.draw_pixel(255, 255)),
            vec![0xFE, 0x70, 255, 255]
        );
        assert_eq!(
            written(|lcd| lcd.draw_rect(1, 120, 0, 140, 20)),
            vec![0xFE, 0x72, 1, 120, 0, 140, 20]
        );
        assert_eq!(
            written(|lcd| lcd.draw_solid_rect(1, 10, 40, 30, 60)),
            vec![0xFE, 0x78, 1, 10, 40, 30, 60]
        );
        assert_eq!(
            written(|lcd| lcd.draw_bitmap(3, 0, 8)),
            vec![0xFE, 0x62, 3, 0, 8]
        );
    }

    #[test]
    fn filesystem_commands() {
        assert_eq!(written(|lcd| lcd.delete_bitmap(4)), vec![0xFE, 0xAD, 1, 4]);
        assert_eq!(written(|lcd| lcd.delete_font(4)), vec![0xFE, 0xAD, 0, 4]);
        assert_eq!(
            written(|lcd| lcd.wipe_filesystem()),
            vec![0xFE, 0x21, 0x59, 0x21]
        );

        let mut lcd = Glk::new(MockTransport::with_replies(&[0x00, 0x40, 0x00, 0x00]));
        assert_eq!(lcd.filesystem_space().unwrap(), 0x4000);
        assert_eq!(lcd.into_inner().written, vec![0xFE, 0xAF]);

        let mut lcd = Glk::new(MockTransport::with_replies(&[1, 1, 0x81, 0x00, 0x02]));
        let entries = lcd.filesystem_directory().unwrap();
        assert_eq!(
            entries,
            vec![DirectoryEntry {
                kind: FileKind::Bitmap,
                refid: 1,
                size: 0x200
            }]
        );
    }

    // Characterization of the LED wiring: "off" drives both outputs on, "yellow" both off.
    // Pending verification on hardware.
    #[test]
    fn led_polarity() {
        assert_eq!(
            written(|lcd| lcd.led_red(1)),
            vec![0xFE, 0x56, 3, 0xFE, 0x57, 4]
        );
        assert_eq!(
            written(|lcd| lcd.led_green(0)),
            vec![0xFE, 0x57, 1, 0xFE, 0x56, 2]
        );
        assert_eq!(
            written(|lcd| lcd.led_yellow(2)),
            vec![0xFE, 0x56, 5, 0xFE, 0x56, 6]
        );
        assert_eq!(
            written(|lcd| lcd.led_off(2)),
            vec![0xFE, 0x57, 5, 0xFE, 0x57, 6]
        );
        assert_validation_error(|lcd| lcd.led_red(3));
    }

    #[test]
    fn poll_keys() {
        let mut lcd = Glk::new(MockTransport::with_replies(&[0x85, 0x03, 0x01]));
        assert_eq!(lcd.poll_keys().unwrap(), vec![5, 3]);
        let transport = lcd.into_inner();
        assert_eq!(transport.written, vec![0xFE, 0x26]);
        assert_eq!(transport.bytes_read(), 2);
    }

    #[test]
    fn poll_keys_truncated() {
        let mut lcd = Glk::new(MockTransport::with_replies(&[0x85]));
        match lcd.poll_keys() {
            Err(Error::Protocol(_)) => {}
            other => panic!("expected Protocol error, got {:?}", other),
        }
    }

    #[test]
    fn key_settings() {
        assert_eq!(written(|lcd| lcd.set_auto_transmit_keys(true)), vec![0xFE, 0x41]);
        assert_eq!(written(|lcd| lcd.set_auto_transmit_keys(false)), vec![0xFE, 0x4F]);
        assert_eq!(written(|lcd| lcd.clear_key_buffer()), vec![0xFE, 0x45]);
    }

    #[test]
    fn text() {
        assert_eq!(written(|lcd| lcd.write_text("Hi")), b"Hi".to_vec());
        assert_eq!(
            written(|lcd| lcd.send_command(0x3A, &[1, 2])),
            vec![0xFE, 0x3A, 1, 2]
        );
    }

    #[test]
    fn baudrate_is_informational() {
        let lcd = Builder::new().baudrate(57600).build(MockTransport::default());
        assert_eq!(lcd.baudrate(), 57600);
        assert_eq!(Glk::new(MockTransport::default()).baudrate(), 19200);
    }
}
