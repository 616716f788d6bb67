//! Integration tests for the serial and touch scheduling loops

mod common;
use common::*;

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};
use pixel_sequencer::{
    ColorStep, OverlayConfig, OverlayPhase, SerialConfig, SerialController, Srgb,
    TouchController, USAGE,
};

type Serial = SerialController<MockSerial, MockStrip, RecordingDelay>;

fn serial(echo: bool) -> Serial {
    let config = SerialConfig {
        echo,
        ..SerialConfig::default()
    };
    SerialController::new(MockSerial::new(), MockStrip::new(8), RecordingDelay::new(), config)
}

fn send(controller: &mut Serial, bytes: &[u8]) {
    controller.port_mut().feed(bytes);
    controller.run_once();
}

#[test]
fn pattern_line_replaces_sequence_and_renders() {
    let mut controller = serial(false);
    let shows = controller.sequencer().strip().show_count();

    send(&mut controller, b"#ff010222\n");

    let sequencer = controller.sequencer();
    assert_eq!(sequencer.sequence().step_count(), 1);
    assert_eq!(sequencer.strip().show_count(), shows + 1);
    assert_eq!(sequencer.strip().shown(), vec![Srgb::new(1, 2, 0x22); 8]);
}

#[test]
fn partial_line_waits_for_terminator() {
    let mut controller = serial(false);

    send(&mut controller, b"#ff3030");
    assert_eq!(*controller.sequencer().current_step(), {
        let mut step = ColorStep::DEFAULT;
        step.elapsed_ms = 50;
        step
    });

    send(&mut controller, b"30\n");
    assert_eq!(controller.sequencer().current_step().color, Srgb::new(0x30, 0x30, 0x30));
}

#[test]
fn each_iteration_sleeps_and_ticks() {
    let mut controller = serial(false);
    send(&mut controller, b"#ff100000-100#ff001000-100\n");

    // the load iteration already credited one tick
    controller.run_once();
    assert_eq!(controller.sequencer().cursor(), 0);
    controller.run_once();
    assert_eq!(controller.sequencer().cursor(), 1);
}

#[test]
fn help_prints_usage_and_echoes() {
    let mut controller = serial(true);
    send(&mut controller, b"?\n");

    assert_eq!(controller.port().output_str(), format!("?\n{USAGE}"));
}

#[test]
fn status_reports_current_step() {
    let mut controller = serial(false);
    send(&mut controller, b"#03000010-200\n");
    controller.port_mut().clear_output();

    send(&mut controller, b"G\n");

    // two iterations at 50 ms each
    assert_eq!(controller.port().output_str(), "(3,(0, 0, 16),200,50)\r\n");
}

#[test]
fn blank_command_returns_to_default() {
    let mut controller = serial(false);
    send(&mut controller, b"#ff404040-10#01404040-10\n");
    send(&mut controller, b"B\n");

    let sequencer = controller.sequencer();
    assert_eq!(sequencer.sequence().step_count(), 1);
    assert_eq!(sequencer.cursor(), 0);
    assert_eq!(sequencer.strip().shown(), vec![OFF; 8]);
}

#[test]
fn unrecognized_and_overlong_lines_change_nothing() {
    let mut controller = serial(false);
    send(&mut controller, b"#ff404040-5000\n");
    let shows = controller.sequencer().strip().show_count();

    send(&mut controller, b"hello\n");
    let mut overlong = vec![b'#'; 300];
    overlong.push(b'\n');
    send(&mut controller, &overlong);

    assert_eq!(controller.sequencer().strip().show_count(), shows);
    assert_eq!(controller.sequencer().current_step().color, Srgb::new(0x40, 0x40, 0x40));
    assert!(controller.port().output().is_empty());
}

#[test]
fn touch_loop_handles_both_pads_in_order() {
    let mut controller = TouchController::new(
        ScriptedTouch::press(2),
        ScriptedTouch::idle(),
        MockStrip::new(4),
        MockKeyboard::new(),
        NoopDelay::new(),
        OverlayConfig::tethered(),
    );

    assert_eq!(controller.run_once(), OverlayPhase::LightEven);
    assert_eq!(controller.session().current_color, LOCK_POST);
    assert_eq!(controller.session().tick_counter, 1);

    let (_, pad_b) = controller.sensors_mut();
    pad_b.queue_press(0);
    controller.run_once();

    let sent = controller.overlay().keyboard().sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].len(), 3);
    assert_eq!(controller.session().current_color, ATTENTION_POST);
    assert_eq!(controller.session().tick_counter, 1);
}

#[test]
fn touch_loop_sleeps_only_when_configured() {
    let mut standalone = TouchController::new(
        ScriptedTouch::idle(),
        ScriptedTouch::idle(),
        MockStrip::new(4),
        MockKeyboard::new(),
        RecordingDelay::new(),
        OverlayConfig::standalone(),
    );
    let mut tethered = TouchController::new(
        ScriptedTouch::idle(),
        ScriptedTouch::idle(),
        MockStrip::new(4),
        MockKeyboard::new(),
        RecordingDelay::new(),
        OverlayConfig::tethered(),
    );

    for _ in 0..3 {
        standalone.run_once();
        tethered.run_once();
    }

    assert_eq!(standalone.delay().calls_ms, [2, 2, 2]);
    assert!(tethered.delay().calls_ms.is_empty());
    assert_eq!(standalone.session().tick_counter, 3);
    assert_eq!(standalone.session().current_color, DIM_WHITE);
}

/// Port whose every operation fails
struct BrokenPort;

impl ErrorType for BrokenPort {
    type Error = ErrorKind;
}

impl Read for BrokenPort {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Err(ErrorKind::BrokenPipe)
    }
}

impl ReadReady for BrokenPort {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::BrokenPipe)
    }
}

impl Write for BrokenPort {
    fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> {
        Err(ErrorKind::BrokenPipe)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::BrokenPipe)
    }
}

#[test]
fn port_failure_keeps_the_loop_running() {
    let mut controller: SerialController<BrokenPort, MockStrip, RecordingDelay> =
        SerialController::new(BrokenPort, MockStrip::new(8), RecordingDelay::new(), SerialConfig::default());

    for _ in 0..3 {
        controller.run_once();
    }

    // every iteration still slept and credited its tick
    assert_eq!(controller.sequencer().current_step().elapsed_ms, 150);
    assert_eq!(controller.sequencer().strip().show_count(), 1);
}

#[test]
fn longest_cycle_runs_without_overflow() {
    let config = OverlayConfig::tethered().with_cycle(u32::MAX, 3).unwrap();
    let mut controller = TouchController::new(
        ScriptedTouch::idle(),
        ScriptedTouch::idle(),
        MockStrip::new(4),
        MockKeyboard::new(),
        NoopDelay::new(),
        config,
    );

    assert_eq!(controller.run_once(), OverlayPhase::LightEven);
    assert_eq!(controller.run_once(), OverlayPhase::Hold);
    assert_eq!(controller.session().tick_counter, 2);
}
