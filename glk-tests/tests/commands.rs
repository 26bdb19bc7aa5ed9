use glk_client::Glk;
use glk_protocol::{LedColor, error::Error};
use glk_tests::{BrokenTransport, MockTransport, SilentTransport};

fn lcd() -> Glk<MockTransport> {
    Glk::new(MockTransport::new())
}

#[test]
fn validation_writes_nothing() {
    let mut lcd = lcd();
    for value in [-1, 256, i32::MIN, i32::MAX] {
        assert!(matches!(lcd.set_contrast(value), Err(Error::Validation(_))));
        assert!(matches!(lcd.save_contrast(value), Err(Error::Validation(_))));
        assert!(matches!(lcd.set_brightness(value), Err(Error::Validation(_))));
        assert!(matches!(lcd.save_brightness(value), Err(Error::Validation(_))));
        assert!(matches!(lcd.set_i2c_address(value), Err(Error::Validation(_))));
    }
    assert!(matches!(lcd.set_debounce_time(u32::MAX), Err(Error::Validation(_))));
    assert!(matches!(lcd.set_lcd_baudrate(0), Err(Error::Validation(_))));
    assert!(matches!(lcd.set_led(3, LedColor::Red), Err(Error::Validation(_))));
    assert!(matches!(lcd.set_flow_control(true), Err(Error::Unsupported(_))));
    assert!(lcd.into_inner().frames().is_empty());
}

#[test]
fn each_command_is_one_write() {
    let mut lcd = lcd();
    lcd.clear_screen().unwrap();
    lcd.draw_line(1, 30, 30, 1).unwrap();
    lcd.draw_line_continue(59, 30).unwrap();
    lcd.draw_line_continue(1, 30).unwrap();
    assert_eq!(
        lcd.into_inner().frames(),
        &[
            vec![0xFEu8, 0x58],
            vec![0xFE, 0x6C, 1, 30, 30, 1],
            vec![0xFE, 0x65, 59, 30],
            vec![0xFE, 0x65, 1, 30],
        ]
    );
}

// Characterization of the LED wiring, pending verification on hardware:
// "off" switches both GPOs on, "yellow" switches both off.
#[test]
fn led_frames() {
    let cases = [
        (LedColor::Red, [[0xFEu8, 0x56, 3], [0xFE, 0x57, 4]]),
        (LedColor::Green, [[0xFE, 0x57, 3], [0xFE, 0x56, 4]]),
        (LedColor::Yellow, [[0xFE, 0x56, 3], [0xFE, 0x56, 4]]),
        (LedColor::Off, [[0xFE, 0x57, 3], [0xFE, 0x57, 4]]),
    ];
    for (color, expected) in cases {
        let mut lcd = lcd();
        lcd.set_led(1, color).unwrap();
        let transport = lcd.into_inner();
        assert_eq!(transport.frames(), &expected.map(|f| f.to_vec())[..], "{:?}", color);
    }
}

#[test]
fn key_poll_consumes_one_reply() {
    let mut lcd = Glk::new(MockTransport::with_replies(&[0x85, 0x03, 0x82, 0x00]));
    assert_eq!(lcd.poll_keys().unwrap(), vec![5, 3]);
    assert_eq!(lcd.poll_keys().unwrap(), vec![2]);
    let transport = lcd.into_inner();
    assert_eq!(transport.frames(), &[vec![0xFEu8, 0x26], vec![0xFE, 0x26]]);
    assert_eq!(transport.unread(), 0);
}

#[test]
fn lazy_key_presses() {
    let mut lcd = Glk::new(MockTransport::with_replies(&[0x81, 0x82, 0x03]));
    let mut keys = lcd.key_presses().unwrap();
    assert_eq!(keys.next().unwrap().unwrap(), 1);
    drop(keys);
    assert_eq!(lcd.into_inner().unread(), 2);
}

#[test]
fn filesystem_queries() {
    let mut lcd = Glk::new(MockTransport::with_replies(&[
        0x78, 0x56, 0x34, 0x12, // space
        2, 1, 0x01, 0x40, 0x00, 1, 0x85, 0x00, 0x04, // directory
    ]));
    assert_eq!(lcd.filesystem_space().unwrap(), 0x1234_5678);
    let entries = lcd.filesystem_directory().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].refid, 5);
    assert_eq!(entries[1].size, 0x400);
}

#[test]
fn transport_errors_surface() {
    let mut lcd = Glk::new(BrokenTransport);
    match lcd.clear_screen() {
        Err(Error::Transport(err)) => assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe),
        other => panic!("expected Transport error, got {:?}", other),
    }
    assert!(matches!(lcd.lcd_type(), Err(Error::Transport(_))));
}

#[test]
fn read_failures_while_awaiting_reply() {
    let mut lcd = Glk::new(SilentTransport::default());
    match lcd.firmware_version() {
        Err(Error::Transport(err)) => assert_eq!(err.kind(), std::io::ErrorKind::TimedOut),
        other => panic!("expected Transport error, got {:?}", other),
    }
    assert!(matches!(lcd.lcd_type(), Err(Error::Transport(_))));
    assert!(matches!(lcd.poll_keys(), Err(Error::Transport(_))));
    assert_eq!(
        lcd.into_inner().written,
        vec![0xFE, 0x36, 0xFE, 0x37, 0xFE, 0x26]
    );
}
