//! # Shapes
//!
//! Drawing helpers built from the module's primitives.
use std::{
    f64::consts::PI,
    io::{Read, Write},
};

use glk_client::Glk;
use glk_protocol::error::Error;

const CIRCLE_STEP: f64 = 0.025;

/// Draws a closed triangle with one line and two continuations
pub fn triangle<T: Read + Write>(lcd: &mut Glk<T>, points: [(u8, u8); 3]) -> Result<(), Error> {
    let [(x1, y1), (x2, y2), (x3, y3)] = points;
    lcd.draw_line(x1, y1, x2, y2)?;
    lcd.draw_line_continue(x3, y3)?;
    lcd.draw_line_continue(x1, y1)
}

/// Draws a circle outline pixel by pixel
pub fn circle<T: Read + Write>(lcd: &mut Glk<T>, center: (u8, u8), radius: u8) -> Result<(), Error> {
    let (cx, cy) = (f64::from(center.0), f64::from(center.1));
    let radius = f64::from(radius);
    let mut theta = 0.0_f64;
    while theta < 2.0 * PI {
        let x = cx + radius * theta.sin();
        let y = cy + radius * theta.cos();
        // Saturates at the byte range; the module clips anything off screen
        lcd.draw_pixel(x as u8, y as u8)?;
        theta += CIRCLE_STEP;
    }
    Ok(())
}

/// Draws the demo scene: a triangle, a circle, a row of rectangles and a filled rectangle
pub fn demo<T: Read + Write>(lcd: &mut Glk<T>) -> Result<(), Error> {
    lcd.clear_screen()?;
    lcd.set_backlight(true)?;
    lcd.set_brightness(128)?;

    triangle(lcd, [(1, 30), (30, 1), (59, 30)])?;
    circle(lcd, (90, 30), 20)?;

    for i in 0..5u8 {
        let pos = i * 10;
        lcd.draw_rect(1, pos + 120, pos, pos + 140, pos + 20)?;
    }

    lcd.draw_solid_rect(1, 10, 40, 30, 60)?;

    lcd.set_drawing_color(false)?;
    lcd.draw_pixel(15, 45)
}
