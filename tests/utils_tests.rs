use chrono::{FixedOffset, NaiveDate};
use rpunchclock::config::Config;
use rpunchclock::utils::date::resolve_period;
use rpunchclock::utils::time::parse_instant;
use rpunchclock::utils::{hours2readable, secs2clock};

mod common;
use common::utc;

fn brt() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_parse_instant_forms() {
    let now = utc("2025-03-10T15:00:00Z");

    assert_eq!(
        parse_instant("2025-03-10T08:00:00-03:00", brt(), now).unwrap(),
        utc("2025-03-10T11:00:00Z")
    );
    assert_eq!(
        parse_instant("2025-03-10 08:00", brt(), now).unwrap(),
        utc("2025-03-10T11:00:00Z")
    );
    // HH:MM lands on the local day of `now`
    assert_eq!(
        parse_instant("23:30", brt(), utc("2025-03-11T01:00:00Z")).unwrap(),
        utc("2025-03-11T02:30:00Z")
    );
    assert!(parse_instant("yesterday", brt(), now).is_err());
}

#[test]
fn test_resolve_period_expressions() {
    assert_eq!(resolve_period("2025-03-10").unwrap(), (date(2025, 3, 10), date(2025, 3, 10)));
    assert_eq!(resolve_period("2025-02").unwrap(), (date(2025, 2, 1), date(2025, 2, 28)));
    assert_eq!(resolve_period("2024").unwrap(), (date(2024, 1, 1), date(2024, 12, 31)));
    assert_eq!(
        resolve_period("2025-01:2025-03").unwrap(),
        (date(2025, 1, 1), date(2025, 3, 31))
    );
    assert!(resolve_period("2025-03:2025-01").is_err());
    assert!(resolve_period("march").is_err());
}

#[test]
fn test_readable_durations() {
    assert_eq!(hours2readable(8.0 + 40.0 / 60.0), "8h 40min");
    assert_eq!(hours2readable(0.0), "0h 00min");
    assert_eq!(secs2clock(3725), "01:02:05");
}

#[test]
fn test_config_defaults_and_policy() {
    let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").unwrap();

    assert_eq!(cfg.utc_offset_minutes, -180);
    assert_eq!(cfg.lunch_cap_minutes, 60);
    assert_eq!(cfg.default_hourly_rate, None);
    assert_eq!(cfg.tick_interval_ms, 1000);

    let policy = cfg.policy().unwrap();
    assert_eq!(policy.offset, brt());
}

#[test]
fn test_config_rejects_bad_offset_and_rate() {
    let cfg: Config = serde_yaml::from_str("utc_offset_minutes: 2000\n").unwrap();
    assert!(cfg.policy().is_err());

    let cfg: Config = serde_yaml::from_str("default_hourly_rate: -3.0\n").unwrap();
    assert!(cfg.policy().is_err());
}
