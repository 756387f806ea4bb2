//! End-to-end tests: scripted shuttle events through the dispatcher into a
//! player controller backed by the in-memory recording server.

use shuttle_core::domain::event::{BTN_4, BTN_5, BTN_6, BTN_7, BTN_8, EV_SYN, REL_DIAL};
use shuttle_core::{DeviceEvent, EventMap};
use shuttle_lms::application::dispatch::{DispatchError, EventDispatcher};
use shuttle_lms::application::player_control::{ControllerError, PlayerController};
use shuttle_lms::infrastructure::input_device::mock::{MockDeviceEnumerator, MockInputDevice};
use shuttle_lms::infrastructure::input_device::DeviceError;
use shuttle_lms::infrastructure::media_server::mock::{PlayerCommand, RecordingMediaServer};

fn syn() -> DeviceEvent {
    DeviceEvent::new(EV_SYN, 0, 0)
}

fn press_and_release(code: u16) -> Vec<DeviceEvent> {
    vec![
        DeviceEvent::key(code, 1),
        syn(),
        DeviceEvent::key(code, 0),
        syn(),
    ]
}

#[test]
fn test_full_session_sends_expected_commands_in_order() {
    // Arrange
    let server = RecordingMediaServer::new(["kitchen", "cube"]);
    let control = server.control();
    let mut controller = PlayerController::new(server, "cube").expect("cube is listed");

    let device = MockInputDevice::new("Contour Design ShuttlePRO v2")
        .with_batch(press_and_release(BTN_6))
        .with_batch(vec![DeviceEvent::relative(REL_DIAL, 1), syn()])
        .with_batch(vec![DeviceEvent::relative(REL_DIAL, 2), syn()])
        .with_batch(vec![DeviceEvent::relative(REL_DIAL, 1), syn()])
        .with_batch(press_and_release(BTN_7))
        .with_batch(press_and_release(BTN_5))
        .with_batch(press_and_release(BTN_4))
        .with_batch(press_and_release(BTN_8));
    let enumerator = MockDeviceEnumerator::new(vec![MockInputDevice::new("Keyboard"), device]);
    let mut dispatcher = EventDispatcher::discover(&enumerator, EventMap::shuttle(), "Shuttle")
        .expect("shuttle is present");

    // Act
    let result = dispatcher.run(&mut controller);

    // Assert
    assert!(matches!(
        result,
        Err(DispatchError::Device(DeviceError::Disconnected(_)))
    ));
    assert_eq!(
        control.log().commands(),
        vec![
            PlayerCommand::Toggle,
            PlayerCommand::VolumeUp(5),
            PlayerCommand::GetVolume,
            PlayerCommand::VolumeUp(5),
            PlayerCommand::GetVolume,
            PlayerCommand::VolumeDown(5),
            PlayerCommand::GetVolume,
            PlayerCommand::Next,
            PlayerCommand::SeekTo(0),
        ]
    );
    assert_eq!(controller.last_volume(), 1);
    assert_eq!(control.connect_count(), 1);
}

#[test]
fn test_unmapped_codes_change_nothing() {
    // Arrange: BTN_0..BTN_3 and a jog wheel tick are not bound
    let server = RecordingMediaServer::new(["cube"]);
    let control = server.control();
    let mut controller = PlayerController::new(server, "cube").unwrap();
    let device = MockInputDevice::new("Shuttle").with_events([
        DeviceEvent::key(0x100, 1),
        DeviceEvent::key(0x103, 1),
        DeviceEvent::relative(0x06, 3),
        syn(),
    ]);
    let mut dispatcher = EventDispatcher::new(device, EventMap::shuttle());

    // Act
    let _ = dispatcher.run(&mut controller);

    // Assert
    assert!(control.log().commands().is_empty());
    assert_eq!(controller.last_volume(), 0);
}

#[test]
fn test_server_down_at_startup_recovers_on_later_press() {
    // Arrange
    let server = RecordingMediaServer::new(["cube"]);
    let control = server.control();
    control.set_reachable(false);
    let mut controller = PlayerController::new(server, "cube").expect("unreachable is not fatal");
    assert!(!controller.has_player());

    let mut dispatcher = EventDispatcher::new(
        MockInputDevice::new("Shuttle").with_batch(press_and_release(BTN_6)),
        EventMap::shuttle(),
    );
    control.set_reachable(true);

    // Act
    let _ = dispatcher.run(&mut controller);

    // Assert
    assert_eq!(controller.player_name(), Some("cube"));
    assert_eq!(control.log().commands(), vec![PlayerCommand::Toggle]);
}

#[test]
fn test_server_outage_mid_session_is_survived() {
    // Arrange
    let server = RecordingMediaServer::new(["cube"]);
    let control = server.control();
    let mut controller = PlayerController::new(server, "cube").unwrap();
    let dispatcher = EventDispatcher::new(MockInputDevice::new("Shuttle"), EventMap::shuttle());

    // Act: one press while the server is down, one after it returns
    control.set_reachable(false);
    dispatcher.dispatch(&DeviceEvent::key(BTN_7, 1), &mut controller);
    control.set_reachable(true);
    dispatcher.dispatch(&DeviceEvent::key(BTN_7, 1), &mut controller);

    // Assert
    assert_eq!(control.log().commands(), vec![PlayerCommand::Next]);
    assert_eq!(control.connect_count(), 2);
}

#[test]
fn test_missing_player_at_startup_is_fatal() {
    let server = RecordingMediaServer::new(["kitchen", "office"]);

    let result = PlayerController::new(server, "cube");

    assert!(matches!(result, Err(ControllerError::PlayerNotFound { .. })));
}

#[test]
fn test_missing_device_is_fatal() {
    let enumerator = MockDeviceEnumerator::with_names(["AT Translated Set 2 keyboard", "Power Button"]);

    let result = EventDispatcher::discover(&enumerator, EventMap::shuttle(), "Shuttle");

    assert!(matches!(result, Err(DispatchError::DeviceNotFound { .. })));
}
