//! Parsed expressions against the same expressions composed in Rust.

use arfunctors::{functor, ArfunctorExt, IntoDynamic, Registry};
use arfunctors_parser::parse;

#[derive(Debug, Clone, Copy)]
struct Track {
    x: f64,
    y: f64,
    n: i32,
    hits: u32,
    good: bool,
}

const TRACKS: [Track; 6] = [
    Track {
        x: 0.0,
        y: 0.0,
        n: 0,
        hits: 0,
        good: false,
    },
    Track {
        x: 0.6,
        y: -0.7,
        n: 9,
        hits: 5,
        good: true,
    },
    Track {
        x: -3.5,
        y: 2.25,
        n: -4,
        hits: 12,
        good: true,
    },
    Track {
        x: 1e3,
        y: -1e-3,
        n: 1000,
        hits: 1,
        good: false,
    },
    Track {
        x: 0.5,
        y: 0.5,
        n: i32::MAX,
        hits: u32::MAX,
        good: true,
    },
    Track {
        x: -0.5,
        y: 4.0,
        n: 40,
        hits: 3,
        good: false,
    },
];

fn registry() -> Registry<Track> {
    let mut registry = Registry::new();
    registry
        .register_functor("x", |t: &Track| t.x)
        .unwrap()
        .register_functor("y", |t: &Track| t.y)
        .unwrap()
        .register_functor("n", |t: &Track| t.n)
        .unwrap()
        .register_functor("hits", |t: &Track| t.hits)
        .unwrap()
        .register_functor("good", |t: &Track| t.good)
        .unwrap();
    registry
}

fn cross_check(text: &str, compiled: impl IntoDynamic<Track>) {
    let compiled = compiled.into_dynamic();
    let parsed = parse(&registry(), text).unwrap_or_else(|e| panic!("parse({text:?}) failed: {e}"));
    assert_eq!(parsed.to_string(), compiled.to_string());
    assert_eq!(parsed.output_type(), compiled.output_type(), "text: {text}");
    for track in &TRACKS {
        assert_eq!(
            parsed.evaluate(track),
            compiled.evaluate(track),
            "text: {text}, track: {track:?}"
        );
    }
}

#[test]
fn test_static_and_parsed_agree() {
    let x = functor("x", |t: &Track| t.x);
    let y = functor("y", |t: &Track| t.y);
    let n = functor("n", |t: &Track| t.n);
    let hits = functor("hits", |t: &Track| t.hits);
    let good = functor("good", |t: &Track| t.good);

    cross_check("x * x + y * y <= 1.0", (x * x + y * y).le(1.0));
    cross_check("n % 3 == 0 || good", (n % 3i32).equals(0i32).or(good));
    cross_check("-(x - y) / 2.0", -(x - y) / 2.0);
    cross_check("hits << 2 | 1u", (hits << 2i32) | 1u32);
    cross_check("y > 0.5 && !good", y.gt(0.5).and(!good));
    cross_check("hits * 2u + 1u", hits * 2u32 + 1u32);
    cross_check("x * 0.5 - y / 4.0", x * 0.5 - y / 4.0);
    cross_check("(n + 1) * (n - 1) >= 8", ((n + 1i32) * (n - 1i32)).ge(8i32));
}

#[test]
fn test_integer_overflow_agrees() {
    let n = functor("n", |t: &Track| t.n);
    let hits = functor("hits", |t: &Track| t.hits);

    cross_check("n * 2", n * 2i32);
    cross_check("1 << n", 1i32 << n);
    cross_check("-n - 1", -n - 1i32);
    cross_check("hits + 1u >> n", (hits + 1u32) >> n);
}
