//! Clock Ring - Binary Entry Point
//!
//! Opens the clock data directory (`CLOCK_DATA_DIR`, default `data/`),
//! prints every collection and shows wrap-around navigation on each.
//! Pass `--demo` to seed an in-memory app instead of touching disk, or
//! `--config <file>` to read the layout from a JSON config.
//!
//! Set `RUST_LOG=debug` to see store reads and writes.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clock_ring::types::seconds::to_seconds;
use clock_ring::{
    AlarmDraft, ClockApp, ClockConfig, ClockResult, Direction, Stores, TimeOfDay, TimezoneCatalog, Weekday,
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut demo = false;
    let mut config_file = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => demo = true,
            "--config" => config_file = args.next().map(PathBuf::from),
            other => log::warn!("ignoring unknown argument '{other}'"),
        }
    }

    match run(demo, config_file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(demo: bool, config_file: Option<PathBuf>) -> ClockResult<()> {
    println!("===========================================");
    println!("  Clock Ring");
    println!("===========================================");
    println!();

    let app = if demo {
        let mut app = ClockApp::with_stores(Stores::memory(), TimezoneCatalog::fallback(), 16)?;
        seed(&mut app)?;
        app
    } else {
        let config = match config_file {
            Some(path) => ClockConfig::from_file(path)?,
            None => ClockConfig::from_env(),
        };
        ClockApp::open(&config)?
    };

    let now = TimeOfDay::from_hm(8, 0).unwrap_or(TimeOfDay::MIDNIGHT);

    println!("Alarms ({}, {} active):", app.alarms().len(), app.alarms().count_active());
    for alarm in app.alarms().iter() {
        let state = if alarm.enabled { "on " } else { "off" };
        println!("  [{state}] {} {:<20} {}", alarm.time, alarm.label, alarm.days_label());
    }
    if let Some(next) = app.next_alarm(now) {
        println!("  next after {now}: {} ({} min)", next.label, now.minutes_until(next.time));
        let after = app.alarms().navigate(next.id, Direction::Next)?;
        println!("  after that: {}", after.label);
    }
    println!();

    let stats = app.laps().statistics();
    println!("Laps ({}):", stats.total_laps);
    for lap in app.laps().iter() {
        println!("  #{:<3} {}  total {}  {:?}", lap.lap_number, lap.format_lap_time(), lap.format_total_time(), lap.pace());
    }
    if let (Some(fastest), Some(slowest)) = (&stats.fastest_lap, &stats.slowest_lap) {
        println!("  fastest #{}  slowest #{}", fastest.lap_number, slowest.lap_number);
        println!("  average {}  elapsed {}", stats.format_average_time(), stats.format_total_time());
    }
    println!();

    println!("Favorite zones ({}):", app.favorites().len());
    for zone in app.favorites().iter() {
        println!("  {}. {:<28} {:<10} {}", zone.order + 1, format!("{}, {}", zone.city, zone.country), zone.offset, zone.local_time(now));
    }
    if let Some(first) = app.favorites().first() {
        let before = app.favorites().navigate(&first.id, Direction::Previous)?;
        println!("  before {} wraps to {}", first.city, before.city);
    }
    println!();

    app.close()
}

fn seed(app: &mut ClockApp) -> ClockResult<()> {
    let at = |h, m| TimeOfDay::from_hm(h, m).unwrap_or(TimeOfDay::MIDNIGHT);

    app.create_alarm(AlarmDraft::new(at(7, 30)).with_label("Coffee").with_days(Weekday::WORKDAYS))?;
    app.create_alarm(AlarmDraft::new(at(6, 0)).with_label("Run"))?;
    app.create_alarm(AlarmDraft::new(at(9, 15)).with_label("Standup").with_days(Weekday::WORKDAYS))?;
    app.create_alarm(AlarmDraft::new(at(10, 0)).with_label("Brunch").with_days([Weekday::Sat, Weekday::Sun]).disabled())?;

    let mut total = rust_decimal::Decimal::ZERO;
    for lap in ["12.45", "15.23", "18.67", "14.79"] {
        let lap = to_seconds(lap).unwrap_or_default();
        total += lap;
        app.add_lap(lap, total)?;
    }

    for zone in ["colombia-bogota", "japan-tokyo", "united-kingdom-london"] {
        app.add_favorite(zone)?;
    }
    app.reorder_favorite("united-kingdom-london", 0)?;
    Ok(())
}
