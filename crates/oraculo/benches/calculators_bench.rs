use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use oraculo::{calculate_tzolkin_kin, life_path_number, moon_phase_at, resolve_zodiac_sign};

fn bench_date_calculators(c: &mut Criterion) {
    c.bench_function("resolve_zodiac_sign", |b| {
        b.iter(|| resolve_zodiac_sign(black_box("1987-03-21")))
    });

    c.bench_function("life_path_number", |b| {
        b.iter(|| life_path_number(black_box("1987-03-21")))
    });

    c.bench_function("calculate_tzolkin_kin", |b| {
        b.iter(|| calculate_tzolkin_kin(black_box("1987-03-21")))
    });
}

fn bench_moon_phase(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    c.bench_function("moon_phase_at", |b| b.iter(|| moon_phase_at(black_box(now))));
}

criterion_group!(benches, bench_date_calculators, bench_moon_phase);
criterion_main!(benches);
