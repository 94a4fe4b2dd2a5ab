// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::classify::Classification;
use crate::issue::Status;

fn matrix(classes: &[(Priority, Status)]) -> PriorityStatusMatrix {
    classes.iter().map(|&(p, s)| Classification::new(p, s)).collect()
}

#[test]
fn slices_cover_only_present_priorities() {
    let m = matrix(&[
        (Priority::Critical, Status::Open),
        (Priority::Critical, Status::Closed),
        (Priority::Major, Status::Open),
        (Priority::Unknown, Status::Open),
    ]);

    let slices = slices(&m);
    let priorities: Vec<Priority> = slices.iter().map(|s| s.priority).collect();
    assert_eq!(priorities, vec![Priority::Critical, Priority::Major, Priority::Unknown]);
    assert_eq!(slices[0].count, 2);
    assert!((slices[0].fraction - 0.5).abs() < 1e-9);
    let sum: f64 = slices.iter().map(|s| s.fraction).sum();
    assert!((sum - 1.0).abs() < 1e-9);
}

#[test]
fn svg_has_one_wedge_and_legend_entry_per_slice() {
    let m = matrix(&[
        (Priority::Blocker, Status::Open),
        (Priority::Minor, Status::Open),
        (Priority::Minor, Status::Resolved),
    ]);
    let svg = to_svg(&m);

    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<path ").count(), 2);
    assert!(svg.contains("Blocker (1)"));
    assert!(svg.contains("Minor (2)"));
    assert!(svg.contains("33.3%"));
    assert!(svg.contains("66.7%"));
    assert!(!svg.contains("Critical"));
    assert!(!svg.contains("No issues"));
}

#[test]
fn single_priority_is_a_full_circle() {
    let m = matrix(&[(Priority::Major, Status::Open), (Priority::Major, Status::Closed)]);
    let svg = to_svg(&m);

    assert_eq!(svg.matches("<path ").count(), 0);
    assert!(svg.contains(r##"fill="#f4d03f""##));
    assert!(svg.contains("100.0%"));
}

#[test]
fn unknown_priority_gets_a_wedge() {
    let m = matrix(&[(Priority::Unknown, Status::Unknown), (Priority::Trivial, Status::Open)]);
    let svg = to_svg(&m);
    assert!(svg.contains("Unknown (1)"));
    assert!(svg.contains(r##"fill="#7f7f7f""##));
}

#[test]
fn empty_matrix_renders_placeholder() {
    let svg = to_svg(&PriorityStatusMatrix::new());
    assert!(svg.contains("No issues"));
    assert_eq!(svg.matches("<path ").count(), 0);
    assert!(!svg.contains("%</text>"));
}

#[test]
fn large_slice_uses_large_arc_flag() {
    let mut classes = vec![(Priority::Critical, Status::Open)];
    classes.extend(std::iter::repeat((Priority::Minor, Status::Open)).take(3));
    let svg = to_svg(&matrix(&classes));
    assert!(svg.contains(" 0 1 1 "), "75% wedge should set large-arc-flag");
    assert!(svg.contains(" 0 0 1 "), "25% wedge should not");
}
