use super::*;
use approx::assert_relative_eq;

#[test]
fn test_circle_area_and_bounds() {
    let c = Profile::circle(Point2::new(1.0, -2.0), 3.0);
    assert!(c.is_closed());
    assert!(c.is_circle());
    assert_relative_eq!(c.signed_area(), PI * 9.0, epsilon = 1e-9);

    let (min, max) = c.bounds().unwrap();
    assert_relative_eq!(min.x, -2.0, epsilon = 1e-9);
    assert_relative_eq!(min.y, -5.0, epsilon = 1e-9);
    assert_relative_eq!(max.x, 4.0, epsilon = 1e-9);
    assert_relative_eq!(max.y, 1.0, epsilon = 1e-9);
}

#[test]
fn test_circle_containment() {
    let c = Profile::circle(Point2::origin(), 10.0);
    assert!(c.contains(&Point2::new(0.0, 0.0)));
    assert!(c.contains(&Point2::new(9.9, 0.0)));
    assert!(c.contains(&Point2::new(0.0, 9.9)));
    assert!(c.contains(&Point2::new(-7.0, -7.0)));
    assert!(!c.contains(&Point2::new(10.1, 0.0)));
    assert!(!c.contains(&Point2::new(-7.1, -7.1)));
    // ray passes exactly through the top of the circle
    assert!(!c.contains(&Point2::new(-20.0, 10.0)));

    assert_relative_eq!(c.signed_distance(&Point2::new(0.0, 4.0)), -6.0, epsilon = 1e-9);
    assert_relative_eq!(c.signed_distance(&Point2::new(13.0, 0.0)), 3.0, epsilon = 1e-9);
}

#[test]
fn test_rectangle_is_ccw_and_centred() {
    let r = Profile::rectangle(Point2::new(5.0, 5.0), 4.0, 2.0);
    assert!(r.is_closed());
    assert!(r.is_ccw());
    assert_relative_eq!(r.area(), 8.0, epsilon = 1e-12);
    assert!(r.contains(&Point2::new(6.9, 5.9)));
    assert!(!r.contains(&Point2::new(7.1, 5.0)));
}

#[test]
fn test_rounded_rectangle_area() {
    let (w, h, r) = (41.5, 41.5, 4.0);
    let rr = Profile::rounded_rectangle(Point2::origin(), w, h, r);
    assert!(rr.is_closed());
    assert_eq!(rr.segments.len(), 8);
    let expected = w * h - (4.0 - PI) * r * r;
    assert_relative_eq!(rr.signed_area(), expected, epsilon = 1e-9);

    // corner is cut away
    assert!(!rr.contains(&Point2::new(w / 2.0 - 0.2, h / 2.0 - 0.2)));
    assert!(rr.contains(&Point2::new(w / 2.0 - 0.2, 0.0)));
    // distance from the corner centre outwards along the diagonal
    let corner = Point2::new(w / 2.0 - r, h / 2.0 - r);
    assert_relative_eq!(rr.distance_to_boundary(&corner), r, epsilon = 1e-9);
}

#[test]
fn test_fully_rounded_rectangle_drops_zero_length_sides() {
    // width equals the diameter, so the top and bottom runs vanish
    let slot = Profile::rounded_rectangle(Point2::origin(), 2.0, 6.0, 1.0);
    assert!(slot.is_closed());
    assert_eq!(slot.segments.len(), 6);
    assert_relative_eq!(slot.area(), 2.0 * 4.0 + PI, epsilon = 1e-9);
}

#[test]
fn test_reversed_profile_keeps_region() {
    let rr = Profile::rounded_rectangle(Point2::origin(), 10.0, 6.0, 2.0);
    let rev = rr.reversed();
    assert!(rev.is_closed());
    assert!(!rev.is_ccw());
    assert_relative_eq!(rev.signed_area(), -rr.signed_area(), epsilon = 1e-9);
    assert!(rev.contains(&Point2::new(0.0, 0.0)));
    assert!(rev.clone().ensure_ccw().is_ccw());
}

#[test]
fn test_pen_tangent_arcs_round_corners() {
    // 10 x 10 square with the top-right corner rounded by r = 2
    let p = Pen::start_at(Point2::new(0.0, 0.0))
        .line_to(Point2::new(10.0, 0.0))
        .line_to(Point2::new(10.0, 8.0))
        .tangent_arc_to(Point2::new(8.0, 10.0))
        .line_to(Point2::new(0.0, 10.0))
        .close();

    assert!(p.is_closed());
    assert_eq!(p.segments.len(), 5);
    match p.segments[2] {
        Segment::Arc { center, radius, sweep, .. } => {
            assert_relative_eq!(center.x, 8.0, epsilon = 1e-9);
            assert_relative_eq!(center.y, 8.0, epsilon = 1e-9);
            assert_relative_eq!(radius, 2.0, epsilon = 1e-9);
            assert_relative_eq!(sweep, FRAC_PI_2, epsilon = 1e-9);
        }
        other => panic!("expected arc, got {:?}", other),
    }
    assert_relative_eq!(p.area(), 100.0 - (4.0 - PI), epsilon = 1e-9);
}

#[test]
fn test_pen_three_point_arc_makes_half_disc() {
    let p = Pen::start_at(Point2::new(-5.0, 0.0))
        .three_point_arc_to(Point2::new(0.0, -5.0), Point2::new(5.0, 0.0))
        .close();
    assert!(p.is_closed());
    assert!(p.is_ccw());
    assert_relative_eq!(p.area(), PI * 25.0 / 2.0, epsilon = 1e-9);
    assert!(p.contains(&Point2::new(0.0, -4.0)));
    assert!(!p.contains(&Point2::new(0.0, 1.0)));
}

#[test]
fn test_collinear_three_point_arc_is_a_line() {
    let pen = Pen::start_at(Point2::new(0.0, 0.0))
        .three_point_arc_to(Point2::new(1.0, 0.0), Point2::new(2.0, 0.0));
    assert_relative_eq!(pen.cursor().x, 2.0);
    let p = pen.line_to(Point2::new(2.0, 1.0)).close();
    assert!(p.segments.iter().all(|s| matches!(s, Segment::Line { .. })));
}

#[test]
fn test_flatten_stays_on_arc() {
    let c = Profile::circle(Point2::origin(), 5.0);
    let pts = c.flatten(0.01);
    assert!(pts.len() >= 8);
    for p in &pts {
        assert_relative_eq!(p.coords.norm(), 5.0, epsilon = 1e-9);
    }
}

#[test]
fn test_translated_profile() {
    let c = Profile::circle(Point2::origin(), 1.0).translated(Vector2::new(3.0, 4.0));
    assert!(c.contains(&Point2::new(3.0, 4.0)));
    assert!(!c.contains(&Point2::new(0.0, 0.0)));
}

#[test]
fn test_offset_rounded_rectangle() {
    let profile = Profile::rounded_rectangle(Point2::origin(), 20.0, 10.0, 2.0);

    let inset = profile.offset(-1.0).unwrap();
    assert!(inset.is_closed());
    let expected = Profile::rounded_rectangle(Point2::origin(), 18.0, 8.0, 1.0).area();
    assert_relative_eq!(inset.area(), expected, epsilon = 1e-9);

    let grown = profile.offset(1.0).unwrap();
    let expected = Profile::rounded_rectangle(Point2::origin(), 22.0, 12.0, 3.0).area();
    assert_relative_eq!(grown.area(), expected, epsilon = 1e-9);

    // the corner arcs collapse
    assert!(profile.offset(-2.5).is_none());
}

#[test]
fn test_offset_mitres_sharp_corners() {
    let rect = Profile::rectangle(Point2::origin(), 10.0, 6.0);
    let grown = rect.offset(1.0).unwrap();
    assert_eq!(grown.segments.len(), 4);
    assert!(grown.is_closed());
    assert_relative_eq!(grown.area(), 12.0 * 8.0, epsilon = 1e-9);

    // the short sides would turn over
    assert!(rect.offset(-4.0).is_none());
}

#[test]
fn test_split_arcs_keeps_the_loop() {
    let circle = Profile::circle(Point2::origin(), 5.0);
    let split = circle.split_arcs(std::f64::consts::FRAC_PI_2);
    assert_eq!(split.segments.len(), 4);
    assert!(split.is_closed());
    assert!(!split.is_circle());
    assert_relative_eq!(split.area(), circle.area(), epsilon = 1e-9);

    let rect = Profile::rounded_rectangle(Point2::origin(), 20.0, 10.0, 2.0);
    assert_eq!(rect.split_arcs(std::f64::consts::FRAC_PI_2).segments.len(), rect.segments.len());
}
