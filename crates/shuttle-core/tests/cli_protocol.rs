//! Integration tests for the shuttle-core CLI codec and bindings.
//!
//! These tests drive the public API the way the LMS adapter does: build a
//! request line, feed a captured server reply back through the decoder, and
//! interpret the result.

use shuttle_core::{
    domain::event::{BTN_6, REL_DIAL},
    protocol::cli::{decode_response, encode_command, parse_integer, parse_players, query_result},
    ControlAction, DeviceEvent, EventMap,
};

/// A `players 0 100` reply captured from a Lyrion Music Server 8.x instance.
const PLAYERS_REPLY: &str = "players 0 100 count%3A3 \
    playerindex%3A0 playerid%3Ab8%3A27%3Aeb%3A11%3A22%3A33 uuid%3A ip%3A192.168.0.21%3A41234 \
    name%3Akitchen seq_no%3A0 model%3Asqueezelite modelname%3ASqueezeLite isplayer%3A1 \
    displaytype%3Anone canpoweroff%3A1 connected%3A1 \
    playerindex%3A1 playerid%3Ab8%3A27%3Aeb%3A44%3A55%3A66 uuid%3A ip%3A192.168.0.22%3A41234 \
    name%3Acube seq_no%3A0 model%3Asqueezelite modelname%3ASqueezeLite isplayer%3A1 \
    displaytype%3Anone canpoweroff%3A1 connected%3A1 \
    playerindex%3A2 playerid%3Ab8%3A27%3Aeb%3A77%3A88%3A99 uuid%3A ip%3A192.168.0.23%3A41234 \
    name%3Aoffice seq_no%3A0 model%3Asqueezelite modelname%3ASqueezeLite isplayer%3A1 \
    displaytype%3Anone canpoweroff%3A1 connected%3A1\n";

#[test]
fn test_players_reply_yields_three_named_players() {
    // Act
    let players = parse_players(&decode_response(PLAYERS_REPLY)).expect("listing must parse");

    // Assert
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["kitchen", "cube", "office"]);
    assert_eq!(players[1].id, "b8:27:eb:44:55:66");
}

#[test]
fn test_volume_query_round_through_wire_format() {
    // Arrange: the request as it would be written to the socket
    let request = ["b8:27:eb:44:55:66", "mixer", "volume", "?"];
    let wire = encode_command(&request);
    assert_eq!(wire, "b8%3A27%3Aeb%3A44%3A55%3A66 mixer volume ?\n");

    // Act: the server echoes with the placeholder filled in
    let reply = decode_response("b8%3A27%3Aeb%3A44%3A55%3A66 mixer volume 55\n");
    let value = query_result(&request, &reply).expect("echo must match");

    // Assert
    assert_eq!(parse_integer(&value), Ok(55));
}

#[test]
fn test_shuttle_bindings_route_dial_and_play_button() {
    let map = EventMap::shuttle();
    let dial = DeviceEvent::relative(REL_DIAL, 3);
    let play = DeviceEvent::key(BTN_6, 1);

    assert_eq!(map.get(dial.code), Some(ControlAction::Volume));
    assert_eq!(map.get(play.code), Some(ControlAction::PlayPause));
}
