use chrono::{Duration, TimeZone, Utc};
use oraculo::moon::{moon_phase_at, phase_ratio, reference_new_moon, MoonPhase, SYNODIC_MONTH_DAYS};

#[test]
fn test_reference_epoch_is_utc() {
    let epoch = Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0).unwrap();
    assert_eq!(reference_new_moon(), epoch);
    assert_eq!(phase_ratio(epoch), 0.0);
    assert_eq!(moon_phase_at(epoch), MoonPhase::NewMoon);
}

#[test]
fn test_known_lunations() {
    // 2024-04-08 total solar eclipse
    let eclipse = Utc.with_ymd_and_hms(2024, 4, 8, 18, 0, 0).unwrap();
    assert_eq!(moon_phase_at(eclipse), MoonPhase::NewMoon);

    let full = Utc.with_ymd_and_hms(2024, 4, 23, 23, 49, 0).unwrap();
    assert_eq!(moon_phase_at(full), MoonPhase::FullMoon);
    assert_eq!(moon_phase_at(full).label(), "Lua Cheia");

    let new_year = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(moon_phase_at(new_year), MoonPhase::WaxingCrescent);
}

#[test]
fn test_instants_before_epoch() {
    let before = Utc.with_ymd_and_hms(1999, 12, 22, 17, 31, 0).unwrap();
    let ratio = phase_ratio(before);
    assert!((0.0..1.0).contains(&ratio));
    assert_eq!(moon_phase_at(before), MoonPhase::FullMoon);
}

#[test]
fn test_same_instant_is_idempotent() {
    let now = Utc.with_ymd_and_hms(2026, 3, 3, 9, 30, 0).unwrap();
    assert_eq!(moon_phase_at(now), moon_phase_at(now));
    assert_eq!(phase_ratio(now), phase_ratio(now));
}

#[test]
fn test_small_steps_never_skip_a_phase() {
    let start = reference_new_moon();
    let steps = (SYNODIC_MONTH_DAYS * 24.0 * 2.0) as i64; // 30-minute steps over one lunation
    let mut previous = moon_phase_at(start);
    let mut seen = vec![previous];
    for step in 1..=steps {
        let phase = moon_phase_at(start + Duration::minutes(30 * step));
        if phase != previous {
            let expected = MoonPhase::ALL[(previous.index() + 1) % 8];
            assert_eq!(phase, expected, "jumped from {previous:?} to {phase:?}");
            seen.push(phase);
            previous = phase;
        }
    }
    // all eight phases plus the return to the new moon
    assert_eq!(seen.len(), 9);
}

#[test]
fn test_one_synodic_month_later_same_phase() {
    let at = Utc.with_ymd_and_hms(2010, 5, 5, 5, 5, 0).unwrap();
    let later = at + Duration::milliseconds((SYNODIC_MONTH_DAYS * 86_400_000.0) as i64);
    assert_eq!(moon_phase_at(at), moon_phase_at(later));
}
