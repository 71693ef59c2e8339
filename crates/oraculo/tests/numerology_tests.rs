use oraculo::calendar::{label_or_unknown, CalendarError};
use oraculo::numerology::life_path_number;

#[test]
fn test_reference_birth_date() {
    // 1+9+8+7+0+3+2+1 = 31 -> 3+1 = 4
    let number = life_path_number("1987-03-21").unwrap().unwrap();
    assert_eq!(number.value(), 4);
    assert_eq!(number.to_string(), "4");
}

#[test]
fn test_empty_input_is_unknown() {
    let number = life_path_number("").unwrap();
    assert!(number.is_none());
    assert_eq!(label_or_unknown(number), "Desconhecido");
}

#[test]
fn test_malformed_input_fails_fast() {
    assert!(matches!(
        life_path_number("1987-03-xx"),
        Err(CalendarError::InvalidDateFormat { .. })
    ));
}

#[test]
fn test_result_is_always_single_digit() {
    for year in 1900..2030 {
        for (month, day) in [(1, 1), (6, 15), (9, 29), (12, 31)] {
            let date = format!("{year:04}-{month:02}-{day:02}");
            let value = life_path_number(&date).unwrap().unwrap().value();
            assert!((1..=9).contains(&value), "{date} -> {value}");
        }
    }
}

#[test]
fn test_deterministic() {
    assert_eq!(
        life_path_number("1999-09-09").unwrap(),
        life_path_number("1999-09-09").unwrap()
    );
}
