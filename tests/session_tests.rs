//! Session Tests
//!
//! Drives the state machine over a scripted mock transport: every row of
//! the state table, menu parsing, and the failure paths.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use parlor::protocol::{encode_packet, Packet};
use parlor::session::{parse_menu_choice, ConnectionState, MenuChoice, Session};
use parlor::transport::Transport;
use parlor::{Config, ParlorError, Result};

// =============================================================================
// Mock Transport
// =============================================================================

enum ScriptedRead {
    Data(Vec<u8>),
    TimedOut,
}

#[derive(Default)]
struct MockState {
    sent: Vec<Vec<u8>>,
    script: VecDeque<ScriptedRead>,
    deadlines: Vec<Option<Duration>>,
    closed: bool,
}

/// Scripted transport: records sends, replays queued reads.
///
/// Cloning shares the underlying state so a test can keep a handle after
/// the session takes ownership.
#[derive(Clone, Default)]
struct MockTransport {
    state: Rc<RefCell<MockState>>,
}

impl MockTransport {
    fn new() -> Self {
        Self::default()
    }

    fn push_reply(&self, status: u8, message: &str) {
        let mut bytes = vec![status, message.len() as u8];
        bytes.extend_from_slice(message.as_bytes());
        self.push_raw(bytes);
    }

    fn push_raw(&self, bytes: Vec<u8>) {
        self.state
            .borrow_mut()
            .script
            .push_back(ScriptedRead::Data(bytes));
    }

    fn push_timeout(&self) {
        self.state
            .borrow_mut()
            .script
            .push_back(ScriptedRead::TimedOut);
    }

    fn sent(&self) -> Vec<Vec<u8>> {
        self.state.borrow().sent.clone()
    }

    fn sent_count(&self) -> usize {
        self.state.borrow().sent.len()
    }

    fn last_sent(&self) -> Vec<u8> {
        self.state.borrow().sent.last().cloned().unwrap()
    }

    fn deadlines(&self) -> Vec<Option<Duration>> {
        self.state.borrow().deadlines.clone()
    }

    fn closed(&self) -> bool {
        self.state.borrow().closed
    }
}

impl Transport for MockTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.state.borrow_mut().sent.push(bytes.to_vec());
        Ok(())
    }

    fn receive(&mut self, _max_bytes: usize) -> Result<Vec<u8>> {
        match self.state.borrow_mut().script.pop_front() {
            Some(ScriptedRead::Data(bytes)) => Ok(bytes),
            Some(ScriptedRead::TimedOut) => Err(ParlorError::Io(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "timed out",
            ))),
            None => Err(ParlorError::PeerClosed),
        }
    }

    fn set_receive_deadline(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.state.borrow_mut().deadlines.push(timeout);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.state.borrow_mut().closed = true;
        Ok(())
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn test_config() -> Config {
    Config::builder().game_settle_delay_ms(0).build()
}

fn new_session(config: Config) -> (Session<MockTransport>, MockTransport) {
    let mock = MockTransport::new();
    (Session::new(mock.clone(), config), mock)
}

/// A session already advanced to Connected
fn connected_session(config: Config) -> (Session<MockTransport>, MockTransport) {
    let (mut session, mock) = new_session(config);
    mock.push_reply(0, "welcome");
    assert!(session.submit_credentials("alice", "secret").unwrap());
    (session, mock)
}

/// A session already waiting in the Lobby
fn lobby_session(config: Config) -> (Session<MockTransport>, MockTransport) {
    let (mut session, mock) = connected_session(config);
    mock.push_reply(0, "game created");
    assert!(session.submit_menu_choice("-1").unwrap());
    (session, mock)
}

// =============================================================================
// Initial State
// =============================================================================

#[test]
fn test_connect_success_advances() {
    let (mut session, mock) = new_session(test_config());
    mock.push_reply(0, "welcome");

    assert!(session.submit_credentials("alice", "secret").unwrap());
    assert_eq!(session.state(), ConnectionState::Connected);
    assert_eq!(session.last_message(), "welcome");
}

#[test]
fn test_connect_refused_stays_initial() {
    let (mut session, mock) = new_session(test_config());
    mock.push_reply(1, "Connection failed");

    assert!(!session.submit_credentials("alice", "wrong").unwrap());
    assert_eq!(session.state(), ConnectionState::Initial);
    assert_eq!(session.last_message(), "Connection failed");
}

#[test]
fn test_connect_sends_encoded_packet() {
    let (mut session, mock) = new_session(test_config());
    mock.push_reply(0, "ok");

    session.submit_credentials("alice", "secret").unwrap();

    let expected = encode_packet(&Packet::Connect {
        username: "alice".to_string(),
        password: "secret".to_string(),
    });
    assert_eq!(mock.sent(), vec![expected.to_vec()]);
}

// =============================================================================
// Connected State
// =============================================================================

#[test]
fn test_list_games_returns_message() {
    let (mut session, mock) = connected_session(test_config());
    mock.push_reply(0, "1 game available");

    let games = session.list_games().unwrap().to_string();
    assert_eq!(games, "1 game available");
    assert_eq!(session.state(), ConnectionState::Connected);
    assert_eq!(mock.last_sent(), vec![0x15]);
}

#[test]
fn test_menu_create_advances_to_lobby() {
    let (mut session, mock) = connected_session(test_config());
    mock.push_reply(0, "game created");

    assert!(session.submit_menu_choice("-1").unwrap());
    assert_eq!(session.state(), ConnectionState::Lobby);
    assert_eq!(mock.last_sent(), vec![0x17]);
}

#[test]
fn test_menu_join_advances_to_active_game() {
    let (mut session, mock) = connected_session(test_config());
    mock.push_reply(0, "joined");

    assert!(session.submit_menu_choice("7").unwrap());
    assert_eq!(session.state(), ConnectionState::ActiveGame);
    assert_eq!(mock.last_sent(), vec![0x2A, 0x00, 0x00, 0x00, 0x07]);
}

#[test]
fn test_menu_invalid_input_sends_nothing() {
    let (mut session, mock) = connected_session(test_config());
    let sends_before = mock.sent_count();

    let result = session.submit_menu_choice("abc");
    assert!(matches!(result, Err(ParlorError::InvalidUserInput(_))));
    assert_eq!(mock.sent_count(), sends_before);
    assert_eq!(session.state(), ConnectionState::Connected);
}

#[test]
fn test_menu_refused_stays_connected() {
    let (mut session, mock) = connected_session(test_config());
    mock.push_reply(2, "no such game");

    assert!(!session.submit_menu_choice("9").unwrap());
    assert_eq!(session.state(), ConnectionState::Connected);
    assert_eq!(session.last_message(), "no such game");
}

#[test]
fn test_log_out_returns_to_initial() {
    let (mut session, mock) = connected_session(test_config());
    mock.push_reply(0, "goodbye");

    assert!(session.log_out().unwrap());
    assert_eq!(session.state(), ConnectionState::Initial);
    assert_eq!(mock.last_sent(), vec![0x16]);
}

#[test]
fn test_parse_menu_choice() {
    assert_eq!(parse_menu_choice("-1").unwrap(), MenuChoice::Create);
    assert_eq!(parse_menu_choice(" -1 ").unwrap(), MenuChoice::Create);
    assert_eq!(parse_menu_choice("7").unwrap(), MenuChoice::Join(7));
    assert_eq!(parse_menu_choice("0").unwrap(), MenuChoice::Join(0));

    for bad in ["abc", "-2", "", "1.5", "99999999999999999999"] {
        let result = parse_menu_choice(bad);
        assert!(
            matches!(result, Err(ParlorError::InvalidUserInput(_))),
            "expected InvalidUserInput for {bad:?}"
        );
    }
}

// =============================================================================
// Lobby State
// =============================================================================

#[test]
fn test_lobby_opponent_joined_advances() {
    let (mut session, mock) = lobby_session(test_config());
    mock.push_reply(3, "opponent joined");

    assert!(session.await_opponent().unwrap());
    assert_eq!(session.state(), ConnectionState::ActiveGame);
    assert_eq!(session.last_message(), "opponent joined");
}

#[test]
fn test_lobby_unhandled_status_stays() {
    let (mut session, mock) = lobby_session(test_config());
    mock.push_reply(5, "server notice");

    assert!(!session.await_opponent().unwrap());
    assert_eq!(session.state(), ConnectionState::Lobby);
}

#[test]
fn test_lobby_wait_sends_nothing() {
    let (mut session, mock) = lobby_session(test_config());
    let sends_before = mock.sent_count();
    mock.push_reply(3, "opponent joined");

    session.await_opponent().unwrap();
    assert_eq!(mock.sent_count(), sends_before);
}

#[test]
fn test_lobby_widens_then_restores_deadline() {
    // Default config: unbounded lobby wait, 5s exchange deadline
    let (mut session, mock) = lobby_session(test_config());
    mock.push_reply(3, "opponent joined");

    session.await_opponent().unwrap();
    assert_eq!(
        mock.deadlines(),
        vec![None, Some(Duration::from_millis(5000))]
    );
}

#[test]
fn test_lobby_timeout_when_configured() {
    let config = Config::builder()
        .game_settle_delay_ms(0)
        .lobby_wait_timeout_ms(10)
        .build();
    let (mut session, mock) = lobby_session(config);
    mock.push_timeout();

    let err = session.await_opponent().unwrap_err();
    assert!(matches!(err, ParlorError::LobbyTimeout));
    assert!(!err.is_fatal());
    assert_eq!(session.state(), ConnectionState::Lobby);
}

// =============================================================================
// ActiveGame State
// =============================================================================

#[test]
fn test_conclude_game_returns_to_connected() {
    let (mut session, mock) = lobby_session(test_config());
    mock.push_reply(3, "opponent joined");
    session.await_opponent().unwrap();

    mock.push_reply(0, "you won");
    assert!(session.conclude_game().unwrap());
    assert_eq!(session.state(), ConnectionState::Connected);
    assert_eq!(session.last_message(), "you won");
    assert_eq!(mock.last_sent(), vec![0x29]);
}

#[test]
fn test_conclude_game_unexpected_status_stays() {
    let (mut session, mock) = lobby_session(test_config());
    mock.push_reply(3, "opponent joined");
    session.await_opponent().unwrap();

    mock.push_reply(4, "not yet");
    assert!(!session.conclude_game().unwrap());
    assert_eq!(session.state(), ConnectionState::ActiveGame);
}

#[test]
fn test_abandon_game_returns_to_connected() {
    let (mut session, mock) = connected_session(test_config());
    mock.push_reply(0, "joined");
    session.submit_menu_choice("2").unwrap();

    mock.push_reply(0, "abandoned");
    assert!(session.abandon_game().unwrap());
    assert_eq!(session.state(), ConnectionState::Connected);
    assert_eq!(mock.last_sent(), vec![0x28]);
}

// =============================================================================
// Failure Paths
// =============================================================================

#[test]
fn test_malformed_response_keeps_state() {
    let (mut session, mock) = new_session(test_config());
    mock.push_raw(vec![0x00]); // one byte: no message length

    let result = session.submit_credentials("alice", "secret");
    assert!(matches!(result, Err(ParlorError::MalformedResponse(_))));
    assert_eq!(session.state(), ConnectionState::Initial);
    assert_eq!(session.last_message(), "");
}

#[test]
fn test_malformed_length_mismatch_keeps_state() {
    let (mut session, mock) = connected_session(test_config());
    // Declares a 10-byte message but carries only 3
    mock.push_raw(vec![0x00, 0x0A, b'a', b'b', b'c']);

    let result = session.submit_menu_choice("-1");
    assert!(matches!(result, Err(ParlorError::MalformedResponse(_))));
    assert_eq!(session.state(), ConnectionState::Connected);
}

#[test]
fn test_peer_closed_is_fatal() {
    let (mut session, _mock) = new_session(test_config());
    // No scripted reply: the mock reports a closed peer

    let err = session.submit_credentials("alice", "secret").unwrap_err();
    assert!(matches!(err, ParlorError::PeerClosed));
    assert!(err.is_fatal());
}

#[test]
fn test_operations_guarded_by_state() {
    let (mut session, _mock) = new_session(test_config());

    assert!(matches!(
        session.list_games(),
        Err(ParlorError::BadState { .. })
    ));
    assert!(matches!(
        session.await_opponent(),
        Err(ParlorError::BadState { .. })
    ));
    assert!(matches!(
        session.conclude_game(),
        Err(ParlorError::BadState { .. })
    ));
    assert_eq!(session.state(), ConnectionState::Initial);
}

#[test]
fn test_quit_sends_packet_and_closes() {
    let (session, mock) = connected_session(test_config());

    session.quit().unwrap();
    assert_eq!(mock.last_sent(), vec![0x1F]);
    assert!(mock.closed());
}

// =============================================================================
// End-to-End Scenario
// =============================================================================

#[test]
fn test_full_session_scenario() {
    let (mut session, mock) = new_session(test_config());

    mock.push_reply(0, "welcome");
    assert!(session.submit_credentials("alice", "secret").unwrap());
    assert_eq!(session.state(), ConnectionState::Connected);

    mock.push_reply(0, "1 game available");
    assert_eq!(session.list_games().unwrap(), "1 game available");

    mock.push_reply(0, "game created");
    assert!(session.submit_menu_choice("-1").unwrap());
    assert_eq!(session.state(), ConnectionState::Lobby);

    mock.push_reply(3, "opponent joined");
    assert!(session.await_opponent().unwrap());
    assert_eq!(session.state(), ConnectionState::ActiveGame);

    mock.push_reply(0, "you won");
    assert!(session.conclude_game().unwrap());
    assert_eq!(session.state(), ConnectionState::Connected);
    assert_eq!(session.last_message(), "you won");

    // The loop continues: the session is back at the game list
    mock.push_reply(0, "no games available");
    assert_eq!(session.list_games().unwrap(), "no games available");
}
