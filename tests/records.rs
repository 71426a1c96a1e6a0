#![cfg(feature = "serde")]

use resection::{prelude::*, record::LandmarkRecord};
use std::{fs::File, io::BufReader, path::PathBuf};
use uom::si::length::meter;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_landmarks(name: &str) -> Landmarks {
    let file = File::open(fixture_path(name)).unwrap();
    let records: Vec<LandmarkRecord> = serde_json::from_reader(BufReader::new(file)).unwrap();
    Landmarks::new(
        records
            .into_iter()
            .map(Landmark::try_from)
            .collect::<Result<_, _>>()
            .unwrap(),
    )
    .unwrap()
}

#[test]
fn resect_from_file() {
    let landmarks = read_landmarks("krakow.json");
    assert_eq!(landmarks.len(), 5);

    let result = resect(
        &landmarks,
        Point::from_meters(565300., 243900.),
        &ResectionOptions::default(),
    )
    .unwrap();

    assert!(result.converged);
    assert_eq!(result.circles, 10);
    assert!(result.residual.get::<meter>() < 0.03);
    insta::assert_snapshot!(result.to_string(), @"(565171.63, 243982.39) ± 0.03 m");
}

#[test]
fn options_from_json() {
    let options: ResectionOptions = serde_json::from_str(
        r#"{ "arc_selection": "ordered", "simplex": { "max_iterations": 200 } }"#,
    )
    .unwrap();

    assert_eq!(options.arc_selection, ArcSelection::Ordered);
    assert_eq!(options.simplex.max_iterations, 200);
    assert_eq!(options.simplex.tolerance, SimplexOptions::default().tolerance);
    assert_eq!(options.degenerate_pairs, DegeneratePolicy::Abort);
}
