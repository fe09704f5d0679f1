//! End-to-end association flow with the simulated WiFi adapter.
//!
//! Boot, lose the access point, back off, re-associate and resume polling,
//! all driven through the service's own tick loop.

use super::mock_ports::{MockDisplay, MockSource, RecordingSink};

use coopdash::adapters::wifi::{CONNECT_TIMEOUT_MS, ConnectivityPort, WifiAdapter, WifiState};
use coopdash::app::events::AppEvent;
use coopdash::app::service::DashboardService;
use coopdash::config::DashboardConfig;
use coopdash::fsm::StateId;

struct Harness {
    app: DashboardService,
    wifi: WifiAdapter,
    source: MockSource,
    display: MockDisplay,
    sink: RecordingSink,
    now: u64,
}

impl Harness {
    fn new() -> Self {
        let mut wifi = WifiAdapter::new();
        wifi.set_credentials("CoopNet", "hens-rule-ok").unwrap();
        let mut h = Self {
            app: DashboardService::new(DashboardConfig::default()),
            wifi,
            source: MockSource::new(),
            display: MockDisplay::new(),
            sink: RecordingSink::new(),
            now: 0,
        };
        h.app.start(&mut h.display, &mut h.sink);
        h
    }

    fn run_until(&mut self, ms: u64) {
        while self.now <= ms {
            self.app.tick(
                self.now,
                &mut self.wifi,
                &mut self.source,
                &mut self.display,
                &mut self.sink,
            );
            self.now += 200;
        }
    }
}

#[test]
fn boot_associates_and_polls() {
    let mut h = Harness::new();
    h.run_until(400);
    assert!(h.wifi.is_connected());
    assert_eq!(h.app.state(), StateId::Running);
    assert_eq!(h.app.stats().cycles_run, 1);
}

#[test]
fn failed_boot_attempts_keep_spinner_running() {
    let mut h = Harness::new();
    h.wifi.sim_fail_next(3);
    h.run_until(400);
    assert_eq!(h.app.state(), StateId::Connecting);
    assert_eq!(h.display.spinner_frames(), 3);

    h.run_until(1_000);
    assert_eq!(h.app.state(), StateId::Running);
}

#[test]
fn link_dropped_right_after_boot_connect_still_reaches_running() {
    let mut h = Harness::new();
    h.run_until(0);
    assert!(h.wifi.is_connected());
    h.wifi.sim_drop_link();

    h.run_until(1_000);
    assert!(h.wifi.is_connected());
    assert_eq!(h.app.state(), StateId::Running);
    assert_eq!(h.app.stats().cycles_run, 1);
    assert_eq!(h.wifi.sim_attempts(), 2);
}

#[test]
fn boot_attempt_that_never_completes_is_reissued() {
    let mut h = Harness::new();
    h.wifi.sim_ap_absent(true);
    h.run_until(30_000);
    assert_eq!(h.app.state(), StateId::Connecting);
    assert_eq!(h.wifi.sim_attempts(), 4, "one attempt per timeout, not per tick");
    assert_eq!(h.display.spinner_frames(), 151);

    h.wifi.sim_ap_absent(false);
    h.run_until(30_000 + CONNECT_TIMEOUT_MS + 400);
    assert!(h.wifi.is_connected());
    assert_eq!(h.app.state(), StateId::Running);
}

#[test]
fn dropped_access_point_is_recovered_with_backoff() {
    let mut h = Harness::new();
    h.run_until(400);

    h.wifi.sim_drop_link();
    h.run_until(10_400);
    assert_eq!(h.app.state(), StateId::Reconnecting);
    assert_eq!(h.wifi.state(), WifiState::Reconnecting { attempt: 0 });
    assert_eq!(h.app.stats().cycles_skipped, 1);

    // First retry lands 2 s after the loss was noticed.
    h.run_until(12_200);
    assert_eq!(h.app.state(), StateId::Reconnecting);
    h.run_until(12_600);
    assert!(h.wifi.is_connected());
    assert_eq!(h.app.state(), StateId::Running);
    assert_eq!(
        h.sink.count(|e| matches!(e, AppEvent::AssociationRestored)),
        1
    );

    h.run_until(20_400);
    assert_eq!(h.app.stats().cycles_run, 2);
}

#[test]
fn repeated_reconnect_failures_keep_skipping() {
    let mut h = Harness::new();
    h.run_until(400);

    h.wifi.sim_drop_link();
    h.wifi.sim_fail_next(u32::MAX);
    h.run_until(60_400);

    assert_eq!(h.app.state(), StateId::Reconnecting);
    assert_eq!(h.app.stats().cycles_run, 1);
    assert_eq!(h.app.stats().cycles_skipped, 6);
    assert!(matches!(h.wifi.state(), WifiState::Reconnecting { attempt } if attempt >= 3));
}
