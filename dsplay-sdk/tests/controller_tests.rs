//! End-to-end controller tests against a mock DiskStation
//!
//! Each test stands up a mockito server that answers the Web API calls
//! the controller makes, then drives the controller through its public
//! traits only.

use dsplay_api::{ApiPathTable, DsClient};
use dsplay_sdk::{CommandCapable, Credentials, DiskstationController, Mode, ResolveCapable, SdkError};
use mockito::{Matcher, Mock, Server, ServerGuard};
use rstest::rstest;

// ============================================================================
// Test Helpers
// ============================================================================

fn controller(server: &ServerGuard, mode: Mode) -> DiskstationController {
    let client = DsClient::new(format!("{}/webapi", server.url()), ApiPathTable::builtin());
    DiskstationController::new(client, Credentials::new("admin", "secret"), mode)
}

fn query(pairs: &[(&str, &str)]) -> Matcher {
    Matcher::AllOf(
        pairs
            .iter()
            .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string()))
            .collect(),
    )
}

fn login_mock(server: &mut ServerGuard, session: &str, sid: &str, hits: usize) -> Mock {
    server
        .mock("GET", "/webapi/auth.cgi")
        .match_query(query(&[("method", "login"), ("session", session)]))
        .with_status(200)
        .with_body(format!(r#"{{"success": true, "data": {{"sid": "{}"}}}}"#, sid))
        .expect(hits)
        .create()
}

fn video_devices_mock(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/webapi/entry.cgi")
        .match_query(query(&[("api", "SYNO.VideoStation2.Controller.Device"), ("method", "list")]))
        .with_status(200)
        .with_body(
            r#"{"success": true, "data": {"device": [
                {"id": "chromecast-1", "title": "Living Room", "type": "chromecast"},
                {"id": "dlna-2", "title": "Bedroom", "type": "dlna"}
            ]}}"#,
        )
        .create()
}

fn audio_players_mock(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/webapi/AudioStation/remote_player.cgi")
        .match_query(query(&[("method", "list")]))
        .with_status(200)
        .with_body(r#"{"success": true, "data": {"players": [{"id": "uuid:kitchen", "name": "Kitchen", "type": "upnp"}]}}"#)
        .create()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_command_reaches_preferred_room() {
    let mut server = Server::new();
    let login = login_mock(&mut server, "VideoStation", "video-sid", 1);
    let _devices = video_devices_mock(&mut server);
    let stop = server
        .mock("GET", "/webapi/entry.cgi")
        .match_query(query(&[
            ("api", "SYNO.VideoStation2.Controller.Playback"),
            ("method", "stop"),
            ("device_id", "dlna-2"),
            ("_sid", "video-sid"),
        ]))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create();

    let mut controller = controller(&server, Mode::Video).with_preferred_room(Mode::Video, "Bedroom");
    controller.refresh_devices(Mode::Video).unwrap();
    assert!(controller.switch_room("Bedroom", None).unwrap());

    assert_eq!(controller.handle_command("cmd:stop").unwrap(), None);

    stop.assert();
    login.assert();
}

#[test]
fn test_session_error_forces_single_relogin() {
    let mut server = Server::new();
    let login = login_mock(&mut server, "VideoStation", "video-sid", 2);
    let _devices = video_devices_mock(&mut server);
    let _stop = server
        .mock("GET", "/webapi/entry.cgi")
        .match_query(query(&[("method", "stop")]))
        .with_status(200)
        .with_body(r#"{"success": false, "error": {"code": 106}}"#)
        .create();
    let pause = server
        .mock("GET", "/webapi/entry.cgi")
        .match_query(query(&[("method", "pause")]))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .expect(2)
        .create();

    let mut controller = controller(&server, Mode::Video);
    controller.switch_room("Living Room", None).unwrap();

    let err = controller.handle_command("stop").unwrap_err();
    assert!(err.is_session_error());
    assert_eq!(err.to_string(), "API error 106: Session timeout");

    controller.handle_command("pause").unwrap();
    controller.handle_command("pause").unwrap();

    login.assert();
    pause.assert();
}

#[test]
fn test_audio_clear_truncates_queue() {
    let mut server = Server::new();
    let _login = login_mock(&mut server, "AudioStation", "audio-sid", 1);
    let _players = audio_players_mock(&mut server);
    let _playlist = server
        .mock("GET", "/webapi/AudioStation/remote_player.cgi")
        .match_query(query(&[("method", "getplaylist")]))
        .with_status(200)
        .with_body(r#"{"success": true, "data": {"songs": [], "total": 12}}"#)
        .create();
    let update = server
        .mock("GET", "/webapi/AudioStation/remote_player.cgi")
        .match_query(query(&[
            ("method", "updateplaylist"),
            ("id", "uuid:kitchen"),
            ("offset", "0"),
            ("limit", "12"),
            ("songs", ""),
            ("_sid", "audio-sid"),
        ]))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create();

    let mut controller = controller(&server, Mode::Video);
    assert!(controller.switch_room("Kitchen", Some(Mode::Audio)).unwrap());

    assert_eq!(controller.handle_command("cmd:clear").unwrap(), None);
    update.assert();
}

#[test]
fn test_resolve_movie_and_play() {
    let mut server = Server::new();
    let _login = login_mock(&mut server, "VideoStation", "video-sid", 1);
    let _devices = video_devices_mock(&mut server);
    let _movie = server
        .mock("GET", "/webapi/entry.cgi")
        .match_query(query(&[("api", "SYNO.VideoStation2.Movie"), ("id", "[7]")]))
        .with_status(200)
        .with_body(
            r#"{"success": true, "data": {"movie": [
                {"id": 7, "title": "Alien - Director's Cut", "additional": {"file": [{"id": 55}]}}
            ]}}"#,
        )
        .create();
    let play = server
        .mock("GET", "/webapi/entry.cgi")
        .match_query(query(&[
            ("method", "play"),
            ("device_id", "chromecast-1"),
            ("file_id", "55"),
            ("playback_target", "file_id"),
        ]))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create();

    let mut controller = controller(&server, Mode::Audio).with_preferred_room(Mode::Video, "Living Room");
    let descriptor = controller.resolve_track("dsvideo:movie_id=7").unwrap();

    assert_eq!(descriptor.title, "Alien");
    assert_eq!(descriptor.album.as_deref(), Some("Director's Cut"));
    assert!(descriptor.artwork_url.starts_with(&server.url()));
    assert!(descriptor.artwork_url.contains("_sid=video-sid"));

    controller.switch_room("Living Room", None).unwrap();
    controller.play(&descriptor.play_token).unwrap();
    play.assert();
}

#[rstest]
#[case(r#"{"success": false, "error": {"code": 105}}"#, 105, "No permission")]
#[case(r#"{"success": false, "error": {"code": 999}}"#, 999, "unknown")]
fn test_vendor_errors_surface(#[case] body: &str, #[case] code: i64, #[case] message: &str) {
    let mut server = Server::new();
    let _login = login_mock(&mut server, "VideoStation", "video-sid", 1);
    let _devices = server
        .mock("GET", "/webapi/entry.cgi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body)
        .create();

    let mut controller = controller(&server, Mode::Video);
    let err = controller.refresh_devices(Mode::Video).unwrap_err();

    match err {
        SdkError::Vendor { code: c, message: m } => {
            assert_eq!(c, code);
            assert_eq!(m, message);
        }
        other => panic!("expected vendor error, got {:?}", other),
    }
}

#[test]
fn test_http_failure_is_transport_error() {
    let mut server = Server::new();
    let _login = server
        .mock("GET", "/webapi/auth.cgi")
        .with_status(500)
        .create();

    let mut controller = controller(&server, Mode::Video);
    let err = controller.refresh_devices(Mode::Video).unwrap_err();
    assert!(matches!(err, SdkError::Transport(_)));
}

#[test]
fn test_rejected_login_is_auth_error() {
    let mut server = Server::new();
    let _login = server
        .mock("GET", "/webapi/auth.cgi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"success": false, "error": {"code": 400}}"#)
        .create();

    let mut controller = controller(&server, Mode::Audio);
    let err = controller.refresh_devices(Mode::Audio).unwrap_err();
    assert!(matches!(err, SdkError::Auth(_)));
}
