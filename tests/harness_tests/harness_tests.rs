//! Tests for the test harness
//!
//! These tests verify:
//! - Unique test case names
//! - LAVA signal formatting
//! - A full run: discovery, pass/fail per command, coverage

#[path = "../common/mod.rs"]
mod common;

use common::{MockDevice, Step};
use dmcc::catalogue::TestPlan;
use dmcc::driver::CommandSpec;
use dmcc::harness::{ConsoleReporter, LavaReporter, Reporter, Runner, TestNameRegistry};
use dmcc::DmccError;

// =============================================================================
// Helper Functions
// =============================================================================

const HELP_REPLY: &[u8] = b"[0]\n\
== Diags 2 ==\n\
Commands:\n\
AIMER - switch the aimer\n\
ECHO - echo arguments\n\
GET/SET BUZZER.FREQ - sets/gets buzzer frequency\n\
HALT - halt the device\n\
TRUE - always succeeds\n";

fn lava_output(reporter: LavaReporter<Vec<u8>>) -> String {
    String::from_utf8(reporter.into_inner()).unwrap()
}

// =============================================================================
// Name Registry Tests
// =============================================================================

#[test]
fn test_names_replace_spaces() {
    let mut names = TestNameRegistry::new();
    assert_eq!(
        names.register(&CommandSpec::new("GPIO.WRITE").args("SD2_DATA0 1")),
        "test_GPIO.WRITE_SD2_DATA0_1"
    );
    assert_eq!(names.register(&CommandSpec::new("TRUE")), "test_TRUE");
}

#[test]
fn test_repeated_names_get_again_suffix() {
    let mut names = TestNameRegistry::new();
    let spec = CommandSpec::new("IMAGE.ACQUIRE");
    assert_eq!(names.register(&spec), "test_IMAGE.ACQUIRE");
    assert_eq!(names.register(&spec), "test_IMAGE.ACQUIRE_again");
    assert_eq!(names.register(&spec), "test_IMAGE.ACQUIRE_again_again");
    assert_eq!(names.len(), 3);
}

#[test]
fn test_registries_are_independent() {
    let spec = CommandSpec::new("TRUE");
    let mut first = TestNameRegistry::new();
    let mut second = TestNameRegistry::new();
    assert_eq!(first.register(&spec), second.register(&spec));
}

// =============================================================================
// Reporter Tests
// =============================================================================

#[test]
fn test_lava_signals() {
    let mut reporter = LavaReporter::new(Vec::new());
    reporter.start("test_TRUE").unwrap();
    reporter.stop("test_TRUE").unwrap();
    reporter.result("test_TRUE", true, None).unwrap();
    reporter.result("test_ECHO", false, Some(12.5)).unwrap();

    let out = lava_output(reporter);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "<LAVA_SIGNAL_STARTTC test_TRUE>");
    assert_eq!(lines[1], "<LAVA_SIGNAL_ENDTC test_TRUE>");
    assert_eq!(lines[2], "<LAVA_SIGNAL_TESTCASE TEST_CASE_ID=test_TRUE RESULT=pass >");
    assert_eq!(
        lines[3],
        "<LAVA_SIGNAL_TESTCASE TEST_CASE_ID=test_ECHO RESULT=fail MEASUREMENT=12.500>"
    );
}

#[test]
fn test_console_reporter_never_fails() {
    let mut reporter = ConsoleReporter;
    assert!(reporter.start("test_TRUE").is_ok());
    assert!(reporter.stop("test_TRUE").is_ok());
    assert!(reporter.result("test_TRUE", false, Some(1.0)).is_ok());
}

// =============================================================================
// Runner Tests
// =============================================================================

#[test]
fn test_run_reports_each_command_and_coverage() {
    let device = MockDevice::start(vec![
        Step::reply(HELP_REPLY),
        Step::reply(b"[0]\nsomedata\n"),
        Step::reply(b"[1]\nnope\n"),
        Step::reply(b"[0]\nsomedata\n"),
    ]);
    let mut conn = device.connect();

    let plan = TestPlan {
        commands: vec![
            CommandSpec::new("ECHO").args("somedata").regex("somedata"),
            CommandSpec::new("TRUE"),
            CommandSpec::new("ECHO").args("somedata").regex("somedata"),
        ],
        whitelist: vec!["HALT".to_string()],
    };

    let mut runner = Runner::new(&mut conn, LavaReporter::new(Vec::new()));
    let summary = runner.run(&plan).unwrap();
    let out = lava_output(runner.into_reporter());

    assert_eq!(summary.outcomes.len(), 3);
    assert_eq!(summary.passed(), 2);
    assert_eq!(summary.failed(), 1);
    assert!(!summary.all_passed());

    let failed = &summary.outcomes[1];
    assert_eq!(failed.name, "test_TRUE");
    assert!(failed.error.as_deref().unwrap().contains("returned 1"));

    assert_eq!(summary.outcomes[2].name, "test_ECHO_somedata_again");

    assert_eq!(summary.coverage.untested_regular, vec!["AIMER"]);
    assert_eq!(summary.coverage.untested_get_set, vec!["GET BUZZER.FREQ"]);

    assert_eq!(summary.stats.success_count, 3);
    assert_eq!(summary.stats.failure_count, 1);

    assert!(out.contains("<LAVA_SIGNAL_STARTTC test_ECHO_somedata>"));
    assert!(out.contains("<LAVA_SIGNAL_TESTCASE TEST_CASE_ID=test_TRUE RESULT=fail MEASUREMENT="));
    assert!(out.contains("<LAVA_SIGNAL_ENDTC test_ECHO_somedata_again>"));

    conn.close().unwrap();
    let received = device.finish();
    assert_eq!(
        received,
        vec!["||;1>help", "||;1>ECHO somedata", "||;1>TRUE", "||;1>ECHO somedata"]
    );
}

#[test]
fn test_run_aborts_when_discovery_fails() {
    let device = MockDevice::start(vec![Step::reply(b"[2]\n")]);
    let mut conn = device.connect();

    let plan = TestPlan {
        commands: vec![CommandSpec::new("TRUE")],
        whitelist: vec![],
    };

    let err = Runner::new(&mut conn, ConsoleReporter).run(&plan).unwrap_err();
    assert!(matches!(err, DmccError::DeviceFailure { .. }));

    conn.close().unwrap();
    assert_eq!(device.finish(), vec!["||;1>help"]);
}

#[test]
fn test_run_one_without_discovery() {
    let device = MockDevice::start(vec![Step::reply(b"[0]\nv1.4.2\n")]);
    let mut conn = device.connect();

    let mut runner = Runner::new(&mut conn, ConsoleReporter);
    let outcome = runner
        .run_one(&CommandSpec::new("DIAGS.VERSION").regex(r"v1\."))
        .unwrap();

    assert!(outcome.passed);
    assert_eq!(outcome.name, "test_DIAGS.VERSION");
    assert!(outcome.duration_ms >= 100.0);

    drop(runner);
    conn.close().unwrap();
    device.finish();
}
