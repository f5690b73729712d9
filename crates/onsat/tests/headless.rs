//! Headless simulation over the public API.

#![cfg(not(target_arch = "wasm32"))]

use onsat::{Simulation, StatsManifest, StatsSection};
use proptest::prelude::*;

#[test]
fn test_manifest_file_simulates_to_targets() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../onsat-yaml/manifests/global_impact.yaml");
    let manifest = StatsManifest::from_path(path).expect("shipped manifest");
    let mut section = StatsSection::from_manifest(&manifest);

    let report = Simulation::default().run(&mut section);
    assert_eq!(report.final_values(), ["1M+", "50+", "99.9%", "30%"]);
}

#[test]
fn test_uptime_jumps_from_integer_to_exact_value() {
    let mut section = StatsSection::global_impact();
    let report = Simulation::default().run(&mut section);

    let uptime: Vec<&str> = report
        .samples
        .iter()
        .map(|s| s.values[2].as_str())
        .collect();
    let last = uptime.iter().rposition(|v| *v != "99.9%").expect("ramp frames");
    let before = uptime[last].trim_end_matches('%');
    assert!(!before.contains('.'), "frame before completion shows {before}");
    assert_eq!(uptime[last + 1], "99.9%");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_settles_one_duration_after_scroll(
        fps in 24u32..144,
        visible_at in 0.0f64..4000.0,
    ) {
        let mut section = StatsSection::global_impact();
        let sim = Simulation {
            fps,
            visible_at_ms: Some(visible_at),
            until_ms: visible_at + 2300.0,
            ..Simulation::default()
        };
        let report = sim.run(&mut section);

        let settled = report.settled_at_ms.expect("settled");
        prop_assert!(settled >= visible_at + 2000.0);
        prop_assert_eq!(report.final_values(), ["1M+", "50+", "99.9%", "30%"]);
    }
}
