use std::fmt::Display;

use crate::error::Error;

/// Every command frame starts with this byte.
pub const ESCAPE: u8 = 0xFE;

/// Firmware version reported by the module.
/// The device packs it into a single byte, major version in the high nibble.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FirmwareVersion {
    major: u8,
    minor: u8,
}

impl FirmwareVersion {
    pub fn new(major: u8, minor: u8) -> FirmwareVersion {
        FirmwareVersion { major, minor }
    }

    /// Splits a version reply byte into its nibbles, e.g. `0x54` is version 5.4
    pub fn from_reply(byte: u8) -> FirmwareVersion {
        FirmwareVersion {
            major: byte >> 4,
            minor: byte & 0x0F,
        }
    }

    /// The major part of the version
    pub fn major(&self) -> u8 {
        self.major
    }

    /// The minor part of the version
    pub fn minor(&self) -> u8 {
        self.minor
    }
}

impl From<FirmwareVersion> for (u8, u8) {
    fn from(value: FirmwareVersion) -> Self {
        (value.major, value.minor)
    }
}

impl Display for FirmwareVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[test]
fn firmware_version_from_reply() {
    let version = FirmwareVersion::from_reply(0x54);
    assert_eq!(<(u8, u8)>::from(version), (5, 4));
    assert_eq!(version.to_string(), "5.4");
}

/// Model codes returned by the module type query.
const MODEL_CODES: [(u8, &str); 10] = [
    (0x10, "GLC12232"),
    (0x11, "GLC12864"),
    (0x12, "GLC128128"),
    (0x13, "GLC24064"),
    (0x14, "GLK12864-25"),
    (0x15, "GLK24064-25"),
    (0x21, "GLK128128-25"),
    (0x22, "GLK12232-25"),
    (0x23, "GLK12232-25-SM"),
    (0x24, "GLK19264-7T-1U"),
];

/// Product identifier of an LCD module, for example `GLK24064-25`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(name: impl Into<String>) -> ModelId {
        ModelId(name.into())
    }

    /// Resolves the one-byte code of the type query.
    /// Codes missing from the table become `Unknown-<code>`.
    pub fn from_code(code: u8) -> ModelId {
        match MODEL_CODES.iter().find(|(c, _)| *c == code) {
            Some((_, name)) => ModelId::new(*name),
            None => ModelId(format!("Unknown-{}", code)),
        }
    }

    /// Whether the code resolved to a known module
    pub fn is_known(&self) -> bool {
        MODEL_CODES.iter().any(|(_, name)| *name == self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Pixel dimensions encoded in the identifier.
    ///
    /// The identifier must have the layout `(GLC|GLK)<width: 3 digits><height: 2 digits>`
    /// followed by either `-` or the end of the string.
    pub fn dimensions(&self) -> Result<Dimensions, Error> {
        let unknown = || {
            Error::UnknownDevice(format!(
                "Can't get screen dimensions: unknown LCD module {}",
                self.0
            ))
        };
        let bytes = self.0.as_bytes();
        if !(bytes.starts_with(b"GLC") || bytes.starts_with(b"GLK")) {
            return Err(unknown());
        }
        let digits = bytes.get(3..8).ok_or_else(unknown)?;
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(unknown());
        }
        match bytes.get(8) {
            None | Some(b'-') => {}
            Some(_) => return Err(unknown()),
        }
        let number = |d: &[u8]| d.iter().fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
        Ok(Dimensions {
            width: number(&digits[..3]),
            height: number(&digits[3..]),
        })
    }
}

impl Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Size of the display area in pixels
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Baud rates the module's serial port can be switched to, with the configuration
/// byte that selects them.
const BAUD_RATES: [(u32, u8); 8] = [
    (9600, 0xCF),
    (14400, 0x8A),
    (19200, 0x67),
    (28800, 0x44),
    (38400, 0x33),
    (57600, 0x22),
    (76800, 0x19),
    (115200, 0x10),
];

/// Returns the configuration byte of a supported baud rate
pub fn baud_rate_code(baudrate: u32) -> Option<u8> {
    BAUD_RATES
        .iter()
        .find(|(rate, _)| *rate == baudrate)
        .map(|(_, code)| *code)
}

/// All baud rates accepted by [`baud_rate_code`]
pub fn supported_baud_rates() -> impl Iterator<Item = u32> {
    BAUD_RATES.iter().map(|(rate, _)| *rate)
}

/// Each on-board LED is a bi-color LED wired to two adjacent general purpose outputs.
const LED_GPO_BASE: [u8; 3] = [1, 3, 5];

/// Returns the first of the two GPOs that drive LED `index`
pub fn led_gpo_base(index: u8) -> Option<u8> {
    LED_GPO_BASE.get(index as usize).copied()
}

/// States of a bi-color LED
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LedColor {
    Off,
    Red,
    Green,
    Yellow,
}

impl LedColor {
    /// Whether the base and the following GPO are switched on for this color.
    ///
    /// Note the polarity: `Off` switches both outputs on and `Yellow` switches both off.
    /// This has not been verified against hardware yet.
    pub fn gpo_states(&self) -> (bool, bool) {
        match self {
            LedColor::Off => (true, true),
            LedColor::Red => (false, true),
            LedColor::Green => (true, false),
            LedColor::Yellow => (false, false),
        }
    }
}

/// Kind of file stored in the module's filesystem
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FileKind {
    Font,
    Bitmap,
}

impl FileKind {
    fn selector(&self) -> u8 {
        match self {
            FileKind::Font => 0x00,
            FileKind::Bitmap => 0x01,
        }
    }
}

/// One used slot of the filesystem directory
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DirectoryEntry {
    pub kind: FileKind,
    pub refid: u8,
    pub size: u16,
}

impl DirectoryEntry {
    /// Parses one four byte directory record: `[flag, kind|refid, size_lsb, size_msb]`.
    /// Returns `None` for unused slots.
    pub fn from_record(record: [u8; 4]) -> Option<DirectoryEntry> {
        let [flag, type_and_id, lsb, msb] = record;
        if flag == 0 {
            return None;
        }
        let kind = if type_and_id & 0x80 == 0 {
            FileKind::Font
        } else {
            FileKind::Bitmap
        };
        Some(DirectoryEntry {
            kind,
            refid: type_and_id & 0x7F,
            size: u16::from_le_bytes([lsb, msb]),
        })
    }
}

/// A command sent from the host to the module.
///
/// Commands are fire-and-forget unless noted otherwise; the ones that elicit a reply
/// say so and the caller must read the reply before sending the next command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Erases all fonts, bitmaps and settings
    WipeFilesystem,
    /// Selects the font used for text output
    SetFont { refid: u8 },
    /// Sets the I2C write address; the read address is one higher.
    SetI2cAddress { address: u8 },
    /// Replies with one byte: firmware version, major in the high nibble
    ReadFirmwareVersion,
    /// Replies with one byte: the model code
    ReadModuleType,
    /// Switches the module's serial port to the baud rate identified by `code`
    SetLcdBaudRate { code: u8 },
    FlowControlOff,
    /// Turns the backlight on for `minutes`, zero meaning permanently
    BacklightOn { minutes: u8 },
    BacklightOff,
    AutoTransmitKeysOn,
    AutoTransmitKeysOff,
    ClearKeyBuffer,
    /// Replies with a bit-flagged key sequence
    PollKeys,
    SetDebounceTime { ticks: u8 },
    SetCursorPosition { col: u8, row: u8 },
    CursorHome,
    SetContrast { value: u8 },
    SaveContrast { value: u8 },
    SetBrightness { value: u8 },
    SaveBrightness { value: u8 },
    AutoscrollOn,
    AutoscrollOff,
    GpoOff { gpo: u8 },
    GpoOn { gpo: u8 },
    ClearScreen,
    DrawBitmap { refid: u8, x: u8, y: u8 },
    /// Sets the color of subsequent drawing commands, `true` being black
    DrawingColor { black: bool },
    DrawLineContinue { x: u8, y: u8 },
    DrawLine { x1: u8, y1: u8, x2: u8, y2: u8 },
    DrawPixel { x: u8, y: u8 },
    DrawRect { color: u8, x1: u8, y1: u8, x2: u8, y2: u8 },
    DrawSolidRect { color: u8, x1: u8, y1: u8, x2: u8, y2: u8 },
    SetCursorCoordinate { x: u8, y: u8 },
    DeleteFile { kind: FileKind, refid: u8 },
    /// Replies with four bytes, little endian: free bytes in the filesystem
    FilesystemSpace,
    /// Replies with the filesystem directory
    FilesystemDirectory,
    /// Any other opcode with its parameters
    Raw { opcode: u8, params: Vec<u8> },
}

impl Command {
    pub const WIPE_FILESYSTEM: u8 = 0x21;
    pub const POLL_KEYS: u8 = 0x26;
    pub const SET_FONT: u8 = 0x31;
    pub const SET_I2C_ADDRESS: u8 = 0x33;
    pub const READ_FIRMWARE_VERSION: u8 = 0x36;
    pub const READ_MODULE_TYPE: u8 = 0x37;
    pub const SET_LCD_BAUD_RATE: u8 = 0x39;
    pub const FLOW_CONTROL_OFF: u8 = 0x3B;
    pub const AUTO_TRANSMIT_KEYS_ON: u8 = 0x41;
    pub const BACKLIGHT_ON: u8 = 0x42;
    pub const CLEAR_KEY_BUFFER: u8 = 0x45;
    pub const BACKLIGHT_OFF: u8 = 0x46;
    pub const SET_CURSOR_POSITION: u8 = 0x47;
    pub const CURSOR_HOME: u8 = 0x48;
    pub const AUTO_TRANSMIT_KEYS_OFF: u8 = 0x4F;
    pub const SET_CONTRAST: u8 = 0x50;
    pub const AUTOSCROLL_ON: u8 = 0x51;
    pub const AUTOSCROLL_OFF: u8 = 0x52;
    pub const SET_DEBOUNCE_TIME: u8 = 0x55;
    pub const GPO_OFF: u8 = 0x56;
    pub const GPO_ON: u8 = 0x57;
    pub const CLEAR_SCREEN: u8 = 0x58;
    pub const DRAW_BITMAP: u8 = 0x62;
    pub const DRAWING_COLOR: u8 = 0x63;
    pub const DRAW_LINE_CONTINUE: u8 = 0x65;
    pub const DRAW_LINE: u8 = 0x6C;
    pub const DRAW_PIXEL: u8 = 0x70;
    pub const DRAW_RECT: u8 = 0x72;
    pub const DRAW_SOLID_RECT: u8 = 0x78;
    pub const SET_CURSOR_COORDINATE: u8 = 0x79;
    pub const SAVE_CONTRAST: u8 = 0x91;
    pub const SAVE_BRIGHTNESS: u8 = 0x98;
    pub const SET_BRIGHTNESS: u8 = 0x99;
    pub const DELETE_FILE: u8 = 0xAD;
    pub const FILESYSTEM_SPACE: u8 = 0xAF;
    pub const FILESYSTEM_DIRECTORY: u8 = 0xB3;

    /// The byte following the escape byte
    pub fn opcode(&self) -> u8 {
        match self {
            Command::WipeFilesystem => Self::WIPE_FILESYSTEM,
            Command::SetFont { .. } => Self::SET_FONT,
            Command::SetI2cAddress { .. } => Self::SET_I2C_ADDRESS,
            Command::ReadFirmwareVersion => Self::READ_FIRMWARE_VERSION,
            Command::ReadModuleType => Self::READ_MODULE_TYPE,
            Command::SetLcdBaudRate { .. } => Self::SET_LCD_BAUD_RATE,
            Command::FlowControlOff => Self::FLOW_CONTROL_OFF,
            Command::BacklightOn { .. } => Self::BACKLIGHT_ON,
            Command::BacklightOff => Self::BACKLIGHT_OFF,
            Command::AutoTransmitKeysOn => Self::AUTO_TRANSMIT_KEYS_ON,
            Command::AutoTransmitKeysOff => Self::AUTO_TRANSMIT_KEYS_OFF,
            Command::ClearKeyBuffer => Self::CLEAR_KEY_BUFFER,
            Command::PollKeys => Self::POLL_KEYS,
            Command::SetDebounceTime { .. } => Self::SET_DEBOUNCE_TIME,
            Command::SetCursorPosition { .. } => Self::SET_CURSOR_POSITION,
            Command::CursorHome => Self::CURSOR_HOME,
            Command::SetContrast { .. } => Self::SET_CONTRAST,
            Command::SaveContrast { .. } => Self::SAVE_CONTRAST,
            Command::SetBrightness { .. } => Self::SET_BRIGHTNESS,
            Command::SaveBrightness { .. } => Self::SAVE_BRIGHTNESS,
            Command::AutoscrollOn => Self::AUTOSCROLL_ON,
            Command::AutoscrollOff => Self::AUTOSCROLL_OFF,
            Command::GpoOff { .. } => Self::GPO_OFF,
            Command::GpoOn { .. } => Self::GPO_ON,
            Command::ClearScreen => Self::CLEAR_SCREEN,
            Command::DrawBitmap { .. } => Self::DRAW_BITMAP,
            Command::DrawingColor { .. } => Self::DRAWING_COLOR,
            Command::DrawLineContinue { .. } => Self::DRAW_LINE_CONTINUE,
            Command::DrawLine { .. } => Self::DRAW_LINE,
            Command::DrawPixel { .. } => Self::DRAW_PIXEL,
            Command::DrawRect { .. } => Self::DRAW_RECT,
            Command::DrawSolidRect { .. } => Self::DRAW_SOLID_RECT,
            Command::SetCursorCoordinate { .. } => Self::SET_CURSOR_COORDINATE,
            Command::DeleteFile { .. } => Self::DELETE_FILE,
            Command::FilesystemSpace => Self::FILESYSTEM_SPACE,
            Command::FilesystemDirectory => Self::FILESYSTEM_DIRECTORY,
            Command::Raw { opcode, .. } => *opcode,
        }
    }

    /// The parameter bytes following the opcode
    pub fn params(&self) -> Vec<u8> {
        match self {
            // The wipe command is guarded by a fixed key sequence
            Command::WipeFilesystem => vec![0x59, 0x21],
            Command::SetFont { refid } => vec![*refid],
            Command::SetI2cAddress { address } => vec![*address],
            Command::SetLcdBaudRate { code } => vec![*code],
            Command::BacklightOn { minutes } => vec![*minutes],
            Command::SetDebounceTime { ticks } => vec![*ticks],
            Command::SetCursorPosition { col, row } => vec![*col, *row],
            Command::SetContrast { value }
            | Command::SaveContrast { value }
            | Command::SetBrightness { value }
            | Command::SaveBrightness { value } => vec![*value],
            Command::GpoOff { gpo } | Command::GpoOn { gpo } => vec![*gpo],
            Command::DrawBitmap { refid, x, y } => vec![*refid, *x, *y],
            Command::DrawingColor { black } => vec![u8::from(*black)],
            Command::DrawLineContinue { x, y }
            | Command::DrawPixel { x, y }
            | Command::SetCursorCoordinate { x, y } => vec![*x, *y],
            Command::DrawLine { x1, y1, x2, y2 } => vec![*x1, *y1, *x2, *y2],
            Command::DrawRect {
                color,
                x1,
                y1,
                x2,
                y2,
            }
            | Command::DrawSolidRect {
                color,
                x1,
                y1,
                x2,
                y2,
            } => vec![*color, *x1, *y1, *x2, *y2],
            Command::DeleteFile { kind, refid } => vec![kind.selector(), *refid],
            Command::Raw { params, .. } => params.clone(),
            Command::ReadFirmwareVersion
            | Command::ReadModuleType
            | Command::FlowControlOff
            | Command::BacklightOff
            | Command::AutoTransmitKeysOn
            | Command::AutoTransmitKeysOff
            | Command::ClearKeyBuffer
            | Command::PollKeys
            | Command::CursorHome
            | Command::AutoscrollOn
            | Command::AutoscrollOff
            | Command::ClearScreen
            | Command::FilesystemSpace
            | Command::FilesystemDirectory => Vec::new(),
        }
    }

    /// Builds the complete frame of this command
    pub fn to_frame(&self) -> Frame {
        Frame::encode(self.opcode(), &self.params())
    }
}

/// The bytes of one command as they go over the wire: `0xFE <opcode> [params...]`.
/// Frames carry no length prefix or checksum.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Frame {
    bytes: Box<[u8]>,
}

impl Frame {
    pub fn encode(opcode: u8, params: &[u8]) -> Frame {
        let mut bytes = Vec::with_capacity(2 + params.len());
        bytes.push(ESCAPE);
        bytes.push(opcode);
        bytes.extend_from_slice(params);
        Frame {
            bytes: bytes.into_boxed_slice(),
        }
    }

    pub fn opcode(&self) -> u8 {
        self.bytes[1]
    }

    pub fn params(&self) -> &[u8] {
        &self.bytes[2..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Frames always hold at least the escape byte and the opcode
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl From<&Command> for Frame {
    fn from(value: &Command) -> Self {
        value.to_frame()
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
