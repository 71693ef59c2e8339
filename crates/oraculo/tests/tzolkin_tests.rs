use oraculo::calendar::{CalendarDate, CalendarError};
use oraculo::tzolkin::{calculate_tzolkin_kin, TzolkinKin, SEALS, TONES};

#[test]
fn test_anchor_calibration() {
    let kin = calculate_tzolkin_kin("2024-01-01").unwrap().unwrap();
    assert_eq!(kin.kin_number, 73);
    assert_eq!(kin.seal, SEALS[73 % 20]);
    assert_eq!(kin.seal, "Caminhante do Céu");
    assert_eq!(kin.tone, TONES[73 % 13]);
    assert_eq!(kin.tone, "Galáctico");
    assert_eq!(kin.color, "Vermelho");
    assert_eq!(kin.full_name, "Caminhante do Céu Galáctico Vermelho");
}

#[test]
fn test_more_than_a_cycle_before_anchor() {
    let kin = calculate_tzolkin_kin("2023-01-01").unwrap().unwrap();
    assert_eq!(kin.kin_number, 228);
    assert_eq!(kin.seal, "Estrela");
    assert_eq!(kin.tone, "Ressonante");
    assert_eq!(kin.color, "Amarelo");
}

#[test]
fn test_more_than_a_cycle_after_anchor() {
    let kin = calculate_tzolkin_kin("2025-06-01").unwrap().unwrap();
    assert_eq!(kin.kin_number, 70);
    assert_eq!(kin.seal, "Cachorro");
    assert_eq!(kin.tone, "Harmônico");
    assert_eq!(kin.color, "Branco");
}

#[test]
fn test_distant_dates_stay_in_range() {
    assert_eq!(calculate_tzolkin_kin("1900-01-01").unwrap().unwrap().kin_number, 23);
    assert_eq!(calculate_tzolkin_kin("2100-12-31").unwrap().unwrap().kin_number, 116);
}

#[test]
fn test_cycle_repeats_every_260_days() {
    let start = CalendarDate::parse("1970-01-01").unwrap();
    for offset in (0..2000).step_by(37) {
        let day = start.add_days(offset).unwrap();
        let later = day.add_days(260).unwrap();
        let kin = TzolkinKin::for_date(day);
        assert!((1..=260).contains(&kin.kin_number));
        assert_eq!(kin.kin_number, TzolkinKin::for_date(later).kin_number);
    }
}

#[test]
fn test_consecutive_days_advance_by_one() {
    let a = calculate_tzolkin_kin("2024-09-16").unwrap().unwrap();
    let b = calculate_tzolkin_kin("2024-09-17").unwrap().unwrap();
    assert_eq!(a.kin_number, 72);
    assert_eq!(b.kin_number, 73);
}

#[test]
fn test_empty_and_malformed() {
    assert_eq!(calculate_tzolkin_kin("").unwrap(), None);
    assert!(matches!(
        calculate_tzolkin_kin("2024-02-30"),
        Err(CalendarError::InvalidDateFormat { .. })
    ));
}

#[test]
fn test_serializes_in_camel_case() {
    let kin = calculate_tzolkin_kin("2024-01-01").unwrap().unwrap();
    let json = serde_json::to_value(&kin).unwrap();
    assert_eq!(json["kinNumber"], 73);
    assert_eq!(json["fullName"], "Caminhante do Céu Galáctico Vermelho");
}
