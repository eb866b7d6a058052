//! Tests for command discovery and coverage
//!
//! These tests verify:
//! - The help listing is requested and parsed
//! - GET/SET entries are classified and rewritten
//! - Discovery failures surface as errors
//! - Coverage reconciliation against exercised and whitelisted commands

#[path = "../common/mod.rs"]
mod common;

use common::{MockDevice, Step};
use dmcc::driver::{discover_commands, parse_help_listing, Coverage, DISCOVERY_COMMAND};
use dmcc::DmccError;

// =============================================================================
// Helper Functions
// =============================================================================

const HELP_REPLY: &[u8] = b"[0]\n\
== Diags 2 ==\n\
Add command names to HELP for details\n\
AIMER - switch the aimer\n\
ECHO - echo arguments\n\
GET/SET BUZZER.FREQ - sets/gets buzzer frequency\n\
HALT - halt the device\n\
GET/SET AUTOLOAD.DELAY - autoload delay\n\
TRUE - always succeeds\n";

// =============================================================================
// Discovery Tests
// =============================================================================

#[test]
fn test_discover_sends_help_and_classifies() {
    let device = MockDevice::start(vec![Step::reply(HELP_REPLY)]);
    let mut conn = device.connect();

    let listing = discover_commands(&mut conn).unwrap();

    assert_eq!(listing.regular, vec!["AIMER", "ECHO", "HALT", "TRUE"]);
    assert_eq!(listing.get_set, vec!["GET BUZZER.FREQ", "GET AUTOLOAD.DELAY"]);

    conn.close().unwrap();
    assert_eq!(device.finish(), vec![format!("||;1>{}", DISCOVERY_COMMAND)]);
}

#[test]
fn test_get_set_entry_not_regular() {
    let listing =
        parse_help_listing(b"h1\nh2\nGET/SET BUZZER.FREQ - sets/gets buzzer frequency\n").unwrap();
    assert_eq!(listing.get_set, vec!["GET BUZZER.FREQ"]);
    assert!(listing.regular.is_empty());
}

#[test]
fn test_listing_with_crlf_and_padding() {
    let listing = parse_help_listing(b"h1\r\nh2\r\n  ECHO   - echo\r\n\r\nTRUE - ok\r\n").unwrap();
    assert_eq!(listing.regular, vec!["ECHO", "TRUE"]);
}

#[test]
fn test_discover_nonzero_result() {
    let device = MockDevice::start(vec![Step::reply(b"[3]\nunknown command\n")]);
    let mut conn = device.connect();

    let err = discover_commands(&mut conn).unwrap_err();
    assert!(matches!(err, DmccError::DeviceFailure { ref result, .. } if result == "3"));

    conn.close().unwrap();
    device.finish();
}

#[test]
fn test_discover_timeout() {
    let device = MockDevice::start(vec![Step::Silence]);
    let mut conn = device.connect();
    conn.set_timeout(std::time::Duration::from_millis(200));

    let err = discover_commands(&mut conn).unwrap_err();
    assert!(matches!(err, DmccError::FramingTimeout { .. }));

    conn.close().unwrap();
    device.finish();
}

#[test]
fn test_discover_malformed_listing() {
    let device = MockDevice::start(vec![Step::reply(b"[0]\nh1\nh2\nnot a command line\n")]);
    let mut conn = device.connect();

    assert!(matches!(
        discover_commands(&mut conn),
        Err(DmccError::Discovery(_))
    ));

    conn.close().unwrap();
    device.finish();
}

// =============================================================================
// Coverage Tests
// =============================================================================

#[test]
fn test_coverage_reports_untested() {
    let listing = parse_help_listing(&HELP_REPLY[4..]).unwrap();

    let coverage = Coverage::reconcile(
        listing,
        ["ECHO", "GET BUZZER.FREQ", "ECHO"],
        ["HALT", "GET AUTOLOAD.DELAY", "REBOOT"],
    );

    assert_eq!(coverage.untested_regular, vec!["AIMER", "TRUE"]);
    assert!(coverage.untested_get_set.is_empty());
    assert!(!coverage.is_complete());
}

#[test]
fn test_full_coverage() {
    let listing = parse_help_listing(&HELP_REPLY[4..]).unwrap();

    let coverage = Coverage::reconcile(
        listing,
        ["AIMER", "ECHO", "TRUE", "GET BUZZER.FREQ"],
        ["HALT", "GET AUTOLOAD.DELAY"],
    );

    assert!(coverage.is_complete());
}
