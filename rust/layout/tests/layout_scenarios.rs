// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end layout scenarios on rectangular host walls.

use std::sync::Mutex;

use approx::assert_relative_eq;
use fenestra_core::diagnostics::{self, Severity};
use fenestra_core::opening::{OpeningKind, OpeningSpec, SurfaceKind};
use fenestra_geometry::{fits, overlaps, Point3};
use fenestra_layout::{LayoutSolver, ResolutionState, Surface};

// The diagnostics sink is process-wide and every solver call records
// into it, so all tests in this binary serialize on one guard.
static SINK_GUARD: Mutex<()> = Mutex::new(());

fn wall(width: f64, height: f64) -> Surface {
    Surface::new(
        "wall",
        SurfaceKind::Wall,
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(width, 0.0, 0.0),
            Point3::new(width, 0.0, height),
            Point3::new(0.0, 0.0, height),
        ],
    )
}

#[test]
fn single_ratio_window() {
    let _guard = SINK_GUARD.lock().unwrap();
    diagnostics::reset();

    let mut host = wall(4.0, 3.0);
    let spec = OpeningSpec::new("w1", OpeningKind::Window).with_ratio(0.30);
    let result = LayoutSolver::default().place(&mut host, &[spec]);

    assert_eq!(result.committed_count(), 1);
    let resolved = &result.resolved[0];
    assert_eq!(resolved.state, ResolutionState::Committed);

    // default head/sill band
    assert_relative_eq!(resolved.spec.head.unwrap(), 2.032, epsilon = 1e-9);
    assert_relative_eq!(resolved.spec.sill.unwrap(), 0.762, epsilon = 1e-9);
    assert_relative_eq!(resolved.spec.height.unwrap(), 1.27, epsilon = 1e-9);

    // 30% of the 12 m2 gross area
    let element = &resolved.elements[0];
    assert_relative_eq!(element.area(), 3.6, epsilon = 1e-6);
    assert!(fits(&element.polygon(), host.vertices(), true));
    assert_eq!(diagnostics::worst(), None);
}

#[test]
fn two_element_array_exceeding_host_width_is_rejected() {
    let _guard = SINK_GUARD.lock().unwrap();
    diagnostics::reset();

    let mut host = wall(2.0, 3.0);
    let spec = OpeningSpec::new("band", OpeningKind::Window)
        .with_width(1.2)
        .with_count(2)
        .with_offset(1.0)
        .with_sill(1.0)
        .with_height(1.0);
    let result = LayoutSolver::default().place(&mut host, &[spec]);

    assert_eq!(result.committed_count(), 0);
    assert_eq!(result.rejected_count(), 1);
    let resolved = &result.resolved[0];
    assert_eq!(resolved.state, ResolutionState::Rejected);
    assert!(resolved.spec.is_zeroed());
    assert_eq!(resolved.spec.count, 0);
    assert!(host.placed().is_empty());

    assert_eq!(diagnostics::worst(), Some(Severity::Error));
    assert_eq!(diagnostics::count(Severity::Error), 1);
}

#[test]
fn colliding_second_window_is_dropped() {
    let _guard = SINK_GUARD.lock().unwrap();
    diagnostics::reset();

    let mut host = wall(6.0, 3.0);
    // centrelines chosen so the two 2m-wide rectangles overlap by 1m
    let first = OpeningSpec::new("a", OpeningKind::Window)
        .with_width(2.0)
        .with_height(1.0)
        .with_head(2.0)
        .with_centreline(-0.5);
    let second = OpeningSpec::new("b", OpeningKind::Window)
        .with_width(2.0)
        .with_height(1.0)
        .with_head(2.0)
        .with_centreline(0.5);
    let result = LayoutSolver::default().place(&mut host, &[first, second]);

    assert_eq!(result.committed_count(), 1);
    assert_eq!(result.resolved[0].state, ResolutionState::Committed);
    assert_eq!(result.resolved[1].state, ResolutionState::Rejected);
    assert!(result.resolved[1].spec.is_zeroed());
    assert_eq!(host.placed().len(), 1);

    let collisions = diagnostics::entries()
        .iter()
        .filter(|d| d.severity == Severity::Error && d.message.contains("collides"))
        .count();
    assert_eq!(collisions, 1);
}

#[test]
fn committed_elements_never_overlap() {
    let _guard = SINK_GUARD.lock().unwrap();
    let mut host = wall(6.0, 3.0);
    let specs = vec![
        OpeningSpec::new("left", OpeningKind::Window)
            .with_width(2.0)
            .with_height(1.0)
            .with_head(2.0)
            .with_left_buffer(0.3),
        OpeningSpec::new("right", OpeningKind::Window)
            .with_width(2.0)
            .with_height(1.0)
            .with_head(2.0)
            .with_right_buffer(0.3),
        OpeningSpec::new("door", OpeningKind::Door)
            .with_width(0.9)
            .with_height(2.0)
            .with_centreline(0.0),
    ];
    let result = LayoutSolver::default().place(&mut host, &specs);
    assert!(result.committed_count() >= 2);

    let placed = host.placed();
    for i in 0..placed.len() {
        for j in (i + 1)..placed.len() {
            assert!(
                !overlaps(&placed[i].buffered(), &placed[j].buffered(), true),
                "{} overlaps {}",
                placed[i].spec_name,
                placed[j].spec_name
            );
        }
    }
}

#[test]
fn evenly_distributed_array_fits() {
    let _guard = SINK_GUARD.lock().unwrap();
    let mut host = wall(6.0, 3.0);
    let spec = OpeningSpec::new("ribbon", OpeningKind::Window)
        .with_width(1.0)
        .with_count(3)
        .with_sill(1.0)
        .with_height(1.2);
    let result = LayoutSolver::default().place(&mut host, &[spec]);

    assert_eq!(result.committed_count(), 3);
    let resolved = &result.resolved[0];
    // derived gap: (avail - 3w) / 4 with avail = 6 - 2 * 0.0254
    let gap = resolved.spec.offset.unwrap();
    assert!(gap > 0.7 && gap < 0.75, "gap = {gap}");
    for element in &resolved.elements {
        assert!(fits(&element.polygon(), host.vertices(), true));
    }
}

#[test]
fn door_defaults_to_floor_sill() {
    let _guard = SINK_GUARD.lock().unwrap();
    let mut host = wall(4.0, 3.0);
    let spec = OpeningSpec::new("entry", OpeningKind::Door).with_width(0.9);
    let result = LayoutSolver::default().place(&mut host, &[spec]);

    assert_eq!(result.committed_count(), 1);
    let resolved = &result.resolved[0];
    // sill sits on the lowest allowed position, head at the standard
    // door height
    assert_relative_eq!(resolved.spec.sill.unwrap(), 0.0254, epsilon = 1e-9);
    assert_relative_eq!(resolved.spec.head.unwrap(), 2.032, epsilon = 1e-9);
}

#[test]
fn framed_windows_respect_frame_clearance() {
    let _guard = SINK_GUARD.lock().unwrap();
    let mut host = wall(6.0, 3.0);
    // second window's glass is 0.05m from the first; frames are 0.05m
    // each, so the buffered rectangles collide
    let specs = vec![
        OpeningSpec::new("a", OpeningKind::Window)
            .with_width(1.0)
            .with_height(1.0)
            .with_sill(1.0)
            .with_frame_width(0.05)
            .with_left_buffer(1.0),
        OpeningSpec::new("b", OpeningKind::Window)
            .with_width(1.0)
            .with_height(1.0)
            .with_sill(1.0)
            .with_frame_width(0.05)
            .with_left_buffer(2.05),
    ];
    let result = LayoutSolver::default().place(&mut host, &specs);
    assert_eq!(result.committed_count(), 1);
    assert_eq!(result.resolved[1].state, ResolutionState::Rejected);
}

#[test]
fn clear_and_regenerate() {
    let _guard = SINK_GUARD.lock().unwrap();
    let mut host = wall(4.0, 3.0);
    let spec = OpeningSpec::new("w1", OpeningKind::Window).with_ratio(0.25);
    let solver = LayoutSolver::default();

    let first = solver.place(&mut host, std::slice::from_ref(&spec));
    assert_eq!(first.committed_count(), 1);

    // placing again without clearing collides with the committed copy
    let again = solver.place(&mut host, std::slice::from_ref(&spec));
    assert_eq!(again.committed_count(), 0);

    host.clear_placed();
    let regenerated = solver.place(&mut host, &[spec]);
    assert_eq!(regenerated.committed_count(), 1);
    assert_eq!(host.placed().len(), 1);
}

#[test]
fn ratio_wider_than_band_raises_head() {
    let _guard = SINK_GUARD.lock().unwrap();
    let mut host = wall(3.0, 3.0);
    // 60% of 9 m2 = 5.4 m2; the default 1.27m band over the usable
    // width cannot reach that, so the solver widens to the jamb bounds
    // and raises the head
    let spec = OpeningSpec::new("big", OpeningKind::Window).with_ratio(0.60);
    let result = LayoutSolver::default().place(&mut host, &[spec]);

    assert_eq!(result.committed_count(), 1);
    let resolved = &result.resolved[0];
    assert!(resolved.spec.height.unwrap() > 1.27);
    let element = &resolved.elements[0];
    assert!(fits(&element.polygon(), host.vertices(), true));
    assert_relative_eq!(element.area(), 5.4, epsilon = 1e-6);
}

#[test]
fn degenerate_host_rejects_all_specs() {
    let _guard = SINK_GUARD.lock().unwrap();
    diagnostics::reset();

    let mut host = Surface::new(
        "sliver",
        SurfaceKind::Wall,
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ],
    );
    let spec = OpeningSpec::new("w1", OpeningKind::Window).with_ratio(0.3);
    let result = LayoutSolver::default().place(&mut host, &[spec]);

    assert_eq!(result.committed_count(), 0);
    assert_eq!(result.rejected_count(), 1);
    assert_eq!(diagnostics::worst(), Some(Severity::Error));
}

#[test]
fn skylight_ratio_on_roof() {
    let _guard = SINK_GUARD.lock().unwrap();
    let mut host = Surface::new(
        "roof",
        SurfaceKind::RoofCeiling,
        vec![
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(5.0, 0.0, 3.0),
            Point3::new(5.0, 4.0, 3.0),
            Point3::new(0.0, 4.0, 3.0),
        ],
    );
    let spec = OpeningSpec::new("sky", OpeningKind::Skylight).with_ratio(0.10);
    let result = LayoutSolver::default().place(&mut host, &[spec]);

    assert_eq!(result.committed_count(), 1);
    let element = &result.resolved[0].elements[0];
    assert_relative_eq!(element.area(), 2.0, epsilon = 1e-6);
    assert!(fits(&element.polygon(), host.vertices(), true));
    // stays on the roof plane
    for p in element.vertices() {
        assert_relative_eq!(p.z, 3.0, epsilon = 1e-9);
    }
}

#[test]
fn specs_parsed_from_records_place_end_to_end() {
    let _guard = SINK_GUARD.lock().unwrap();
    let json = r#"[
        {"name": "w1", "kind": "window", "ratio": 0.2},
        {"name": "d1", "kind": "door", "width": 0.9, "height": 2.1, "left_buffer": 0.2}
    ]"#;
    let specs = fenestra_layout::specs_from_json(json).unwrap();
    let mut host = wall(5.0, 3.0);
    let result = LayoutSolver::default().place(&mut host, &specs);
    assert_eq!(result.committed_count(), 2);
}
