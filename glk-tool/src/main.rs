//! # GLK Tool
//!
//! Command line front end for Matrix Orbital GLK/GLC graphic LCD modules.
//!
//! ## Overview
//!
//! This binary opens and configures the serial port, then drives the module through
//! [`glk_client`](https://docs.rs/glk-client/). It can identify the module, print text,
//! draw a demo scene, switch LEDs, poll keys and send raw commands.
pub mod serial;
pub mod shapes;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_num::maybe_hex;
use env_logger::Env;
use glk_client::{Builder, Glk};
use glk_protocol::{LedColor, ModelId};

#[derive(ValueEnum, Eq, PartialEq, Clone, Copy, Debug)]
enum Color {
    Off,
    Red,
    Green,
    Yellow,
}

impl From<Color> for LedColor {
    fn from(value: Color) -> Self {
        match value {
            Color::Off => LedColor::Off,
            Color::Red => LedColor::Red,
            Color::Green => LedColor::Green,
            Color::Yellow => LedColor::Yellow,
        }
    }
}

#[derive(ValueEnum, Eq, PartialEq, Clone, Copy, Debug)]
enum Switch {
    On,
    Off,
}

#[derive(Subcommand, Eq, PartialEq, Clone, Debug)]
enum Action {
    /// Print the port settings, module type, dimensions and firmware version
    Identify,
    /// Clear the screen and print a line of text
    Print { text: String },
    /// Draw a triangle, a circle and a few rectangles
    Shapes,
    /// Set one of the on-board LEDs
    Led {
        #[arg(help = "LED number, 0 to 2")]
        index: u8,
        color: Color,
    },
    /// Poll the keypad once and print the buffered key codes
    Keys,
    Contrast {
        #[arg(allow_negative_numbers = true)]
        value: i32,
        #[arg(short, long, help = "Keep the value after power down")]
        save: bool,
    },
    Brightness {
        #[arg(allow_negative_numbers = true)]
        value: i32,
        #[arg(short, long, help = "Keep the value after power down")]
        save: bool,
    },
    Backlight { state: Switch },
    /// Send a raw command, opcode and parameters in decimal or 0x-prefixed hex
    Raw {
        #[arg(value_parser = maybe_hex::<u8>)]
        opcode: u8,
        #[arg(value_parser = maybe_hex::<u8>)]
        params: Vec<u8>,
    },
}

#[derive(Parser)]
#[command(about = "Control Matrix Orbital GLK/GLC graphic LCD modules", long_about=None)]
struct Args {
    #[arg(short, long, default_value = "/dev/ttyUSB0")]
    port: PathBuf,

    #[arg(short, long, default_value = "19200")]
    baudrate: u32,

    #[arg(short, long, help = "Module type to assume instead of querying it, e.g. GLK24064-25")]
    lcd_type: Option<String>,

    #[clap(subcommand)]
    action: Action,
}

fn identify(args: &Args, lcd: &mut Glk<File>) -> Result<(), Box<dyn Error>> {
    println!("Serial Port:    {}", args.port.display());
    println!("Baud Rate:      {}", lcd.baudrate());
    println!("LCD Type:       {}", lcd.lcd_type()?);
    match lcd.lcd_dimensions() {
        Ok(dimensions) => println!("LCD Dimensions: {}", dimensions),
        Err(e) => println!("LCD Dimensions: {}", e),
    }
    println!("LCD Firmware:   {}", lcd.firmware_version()?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::debug!(
        "Parsed arguments: port={}, baudrate={}",
        args.port.display(),
        args.baudrate
    );

    let port = serial::open(&args.port, args.baudrate)?;
    let mut builder = Builder::new().baudrate(args.baudrate);
    if let Some(lcd_type) = &args.lcd_type {
        log::info!("Assuming module type {}", lcd_type);
        builder = builder.lcd_type(ModelId::new(lcd_type.as_str()));
    }
    let mut lcd = builder.build(port);

    match &args.action {
        Action::Identify => identify(&args, &mut lcd)?,
        Action::Print { text } => {
            lcd.clear_screen()?;
            lcd.set_backlight(true)?;
            lcd.set_brightness(128)?;
            lcd.write_text(text)?;
        }
        Action::Shapes => shapes::demo(&mut lcd)?,
        Action::Led { index, color } => lcd.set_led(*index, (*color).into())?,
        Action::Keys => {
            lcd.set_auto_transmit_keys(false)?;
            let keys = lcd.poll_keys()?;
            if keys.is_empty() {
                println!("No keys pressed");
            }
            for key in keys {
                println!("Key 0x{:02x}", key);
            }
        }
        Action::Contrast { value, save } => {
            if *save {
                lcd.save_contrast(*value)?
            } else {
                lcd.set_contrast(*value)?
            }
        }
        Action::Brightness { value, save } => {
            if *save {
                lcd.save_brightness(*value)?
            } else {
                lcd.set_brightness(*value)?
            }
        }
        Action::Backlight { state } => lcd.set_backlight(*state == Switch::On)?,
        Action::Raw { opcode, params } => lcd.send_command(*opcode, params)?,
    }
    Ok(())
}
