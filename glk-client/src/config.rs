use glk_protocol::ModelId;

/// Connection settings of a [`Glk`](crate::Glk) instance
#[derive(Debug, Clone)]
pub struct Config {
    /// Product identifier to use instead of querying the module
    pub lcd_type: Option<ModelId>,
    /// Baud rate of the host side of the serial link. Informational only.
    pub baudrate: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lcd_type: None,
            baudrate: 19200,
        }
    }
}

/// Builder to create a [`Glk`](crate::Glk) instance and modify configuration options
///
/// # Example
///
/// ```ignore
/// use glk_client::Builder;
/// use glk_protocol::ModelId;
///
/// let lcd = Builder::new()
///     .baudrate(57600)
///     .lcd_type(ModelId::new("GLK19264-7T-1U"))
///     .build(serial_port);
/// ```
#[derive(Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Skip the module type query and assume this module instead
    pub fn lcd_type(mut self, lcd_type: ModelId) -> Self {
        self.config.lcd_type = Some(lcd_type);
        self
    }

    /// Record the baud rate the transport was opened with
    pub fn baudrate(mut self, baudrate: u32) -> Self {
        self.config.baudrate = baudrate;
        self
    }

    /// Build and return the driver
    pub fn build<T>(self, transport: T) -> crate::Glk<T> {
        crate::Glk::with_config(transport, self.config)
    }
}
