//! Coop dashboard — main entry point.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                     │
//! │                                                               │
//! │  WifiAdapter / HostLink   HttpSource        Tm1637 / Console  │
//! │  (ConnectivityPort)       (TelemetrySource) (DisplayPort)     │
//! │  LogEventSink (EventSink) BuildConfig / FileConfig (Config)   │
//! │                                                               │
//! │  ──────────────── Port Trait Boundary ───────────────────     │
//! │                                                               │
//! │  ┌─────────────────────────────────────────────────────┐      │
//! │  │          DashboardService (pure logic)              │      │
//! │  │  Scheduler FSM · Aggregator · Encoder · Spinner     │      │
//! │  └─────────────────────────────────────────────────────┘      │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The same loop runs on the ESP32 and on a host; only the adapters differ.

use core::time::Duration;

use anyhow::Result;
use log::{info, warn};

use coopdash::adapters::http_source::HttpSource;
use coopdash::adapters::log_sink::LogEventSink;
use coopdash::adapters::time::MonotonicClock;
use coopdash::adapters::wifi::ConnectivityPort;
use coopdash::app::ports::{ConfigPort, DisplayPort, TelemetrySource};
use coopdash::app::service::DashboardService;
use coopdash::config::DashboardConfig;
use coopdash::pins;

// ── Shared ────────────────────────────────────────────────────

fn load_config(port: &impl ConfigPort) -> DashboardConfig {
    match port.load() {
        Ok(cfg) => {
            info!("Config loaded");
            cfg
        }
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            DashboardConfig::default()
        }
    }
}

#[cfg(target_os = "espidf")]
fn sleep_ms(ms: u32) {
    esp_idf_hal::delay::FreeRtos::delay_ms(ms);
}

#[cfg(not(target_os = "espidf"))]
fn sleep_ms(ms: u32) {
    std::thread::sleep(Duration::from_millis(u64::from(ms)));
}

/// The poll loop.  Never returns; the process is stopped externally.
fn run(
    config: DashboardConfig,
    link: &mut impl ConnectivityPort,
    source: &mut impl TelemetrySource,
    display: &mut impl DisplayPort,
) -> ! {
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    let tick_ms = config.tick_interval_ms;

    info!(
        "Detection: {} | Environment: {} | poll every {} ms",
        config.detection_url, config.environment_url, config.poll_interval_ms
    );

    let mut app = DashboardService::new(config);
    app.start(display, &mut sink);

    info!("System ready. Entering poll loop.");
    loop {
        app.tick(clock.now_ms(), link, source, display, &mut sink);
        sleep_ms(tick_ms);
    }
}

// ── ESP32 ─────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn main() -> Result<()> {
    use coopdash::adapters::config_store::BuildConfig;
    use coopdash::adapters::wifi::WifiAdapter;
    use coopdash::drivers::tm1637::Tm1637;
    use esp_idf_hal::delay::Ets;
    use esp_idf_hal::gpio::{PinDriver, Pull};
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::EspWifi;

    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Coop dashboard v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    let config = load_config(&BuildConfig);

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let clk = PinDriver::output(peripherals.pins.gpio4)?;
    // The TM1637 pulls DIO low to acknowledge each byte, so DIO is open-drain.
    let mut dio = PinDriver::input_output_od(peripherals.pins.gpio5)?;
    dio.set_pull(Pull::Up)?;
    info!(
        "Panel: TM1637 on CLK=GPIO{} DIO=GPIO{}",
        pins::DISPLAY_CLK_GPIO,
        pins::DISPLAY_DIO_GPIO
    );
    let mut display = Tm1637::new(clk, dio, Ets);

    // ── 4. Association ────────────────────────────────────────
    let esp_wifi = EspWifi::new(peripherals.modem, sysloop, Some(nvs))?;
    let mut link = WifiAdapter::with_driver(esp_wifi);
    if let Err(e) = link.set_credentials(config.wifi_ssid.as_str(), config.wifi_password.as_str()) {
        warn!("WiFi credentials rejected ({}), association will not start", e);
    }

    // ── 5. Telemetry source ───────────────────────────────────
    let mut source = HttpSource::new(Duration::from_millis(u64::from(config.http_timeout_ms)))?;

    run(config, &mut link, &mut source, &mut display)
}

// ── Host simulator ────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<()> {
    use coopdash::adapters::config_store::FileConfig;
    use coopdash::adapters::display::ConsoleDisplay;
    use coopdash::adapters::wifi::HostLink;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Coop dashboard v{} (host simulator)", env!("CARGO_PKG_VERSION"));
    info!(
        "Panel: console stand-in for TM1637 (CLK=GPIO{} DIO=GPIO{} on hardware)",
        pins::DISPLAY_CLK_GPIO,
        pins::DISPLAY_DIO_GPIO
    );

    let config = load_config(&FileConfig::from_env());
    let mut source = HttpSource::new(Duration::from_millis(u64::from(config.http_timeout_ms)))?;
    let mut display = ConsoleDisplay::new();
    let mut link = HostLink;

    run(config, &mut link, &mut source, &mut display)
}
