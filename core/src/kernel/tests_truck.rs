// Truck adapter checks. Booleans are only exercised with cutters that pass
// clean through the target, since truck-shapeops rejects coplanar faces.

use super::*;
use crate::geometry::{Point2, Point3};
use crate::selection::{AxisPlane, EdgeFilter, FaceFilter};
use crate::sketch::Segment;
use approx::assert_relative_eq;

fn slab(kernel: &TruckKernel, w: f64, h: f64, t: f64) -> <TruckKernel as Kernel>::Solid {
    kernel
        .extrude(&Profile::rectangle(Point2::origin(), w, h), &Plane::xy(), t)
        .expect("slab")
}

#[test]
fn test_truck_extrude_rectangle_bounds() {
    let kernel = TruckKernel::new();
    let solid = slab(&kernel, 10.0, 6.0, 2.0);
    let bb = kernel.bounding_box(&solid).unwrap();
    assert!(bb.approx_eq_within(
        &Aabb::new(Point3::new(-5.0, -3.0, 0.0), Point3::new(5.0, 3.0, 2.0)),
        1e-6
    ));
}

#[test]
fn test_truck_extrude_circle_on_side_plane() {
    let kernel = TruckKernel::new();
    let plane = Plane::yz().offset(-4.0);
    let solid = kernel.extrude(&Profile::circle(Point2::new(1.0, 2.0), 3.0), &plane, 8.0).unwrap();
    let bb = kernel.bounding_box(&solid).unwrap();

    assert_relative_eq!(bb.min.x, -4.0, epsilon = 1e-6);
    assert_relative_eq!(bb.max.x, 4.0, epsilon = 1e-6);
    // the tessellated circle may sit just inside the true one
    assert!((bb.size().y - 6.0).abs() < 0.02, "y extent {}", bb.size().y);
    assert!((bb.center().z - 2.0).abs() < 0.02, "z centre {}", bb.center().z);
}

#[test]
fn test_truck_rounded_rectangle_extrudes() {
    let kernel = TruckKernel::new();
    let profile = Profile::rounded_rectangle(Point2::origin(), 20.0, 10.0, 2.0);
    let solid = kernel.extrude(&profile, &Plane::xy(), 3.0).unwrap();
    let mesh = kernel.mesh(&solid, &MeshOptions::EXPORT).unwrap();
    let expected = profile.area() * 3.0;
    assert_relative_eq!(mesh.volume().abs(), expected, max_relative = 0.01);
}

#[test]
fn test_truck_extrude_rejects_open_profile() {
    let kernel = TruckKernel::new();
    let open = Profile::new(vec![Segment::line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0))]);
    assert!(matches!(
        kernel.extrude(&open, &Plane::xy(), 1.0),
        Err(KernelOpError::InvalidGeometry(_))
    ));
    let square = Profile::rectangle(Point2::origin(), 1.0, 1.0);
    assert!(kernel.extrude(&square, &Plane::xy(), 0.0).is_err());
}

#[test]
fn test_truck_drill_through_cylinder() {
    let kernel = TruckKernel::new();
    let outer = kernel.extrude(&Profile::circle(Point2::origin(), 10.0), &Plane::xy(), 10.0).unwrap();
    let drill = kernel
        .extrude(&Profile::circle(Point2::origin(), 3.0), &Plane::xy().offset(-2.0), 14.0)
        .unwrap();
    let ring = kernel.cut(&outer, &drill).unwrap();

    let mesh = kernel.mesh(&ring, &MeshOptions::EXPORT).unwrap();
    let expected = std::f64::consts::PI * (100.0 - 9.0) * 10.0;
    assert_relative_eq!(mesh.volume().abs(), expected, max_relative = 0.02);
}

#[test]
fn test_truck_cut_box_from_box() {
    let kernel = TruckKernel::new();
    let block = slab(&kernel, 10.0, 10.0, 10.0);
    let tool = kernel
        .extrude(&Profile::rectangle(Point2::new(5.0, 0.0), 6.0, 4.0), &Plane::xy().offset(-1.0), 12.0)
        .unwrap();
    let notched = kernel.cut(&block, &tool).unwrap();
    let mesh = kernel.mesh(&notched, &MeshOptions::VIEW).unwrap();
    assert_relative_eq!(mesh.volume().abs(), 1000.0 - 3.0 * 4.0 * 10.0, max_relative = 0.01);
}

#[test]
fn test_truck_fuse_overlapping_boxes() {
    let kernel = TruckKernel::new();
    let a = slab(&kernel, 10.0, 10.0, 10.0);
    let b = kernel.translate(&slab(&kernel, 10.0, 10.0, 10.0), Vector3::new(5.0, 5.0, 5.0)).unwrap();
    let fused = kernel.fuse(&a, &b, FuseOptions::common_face()).unwrap();
    let bb = kernel.bounding_box(&fused).unwrap();
    assert!(bb.approx_eq_within(
        &Aabb::new(Point3::new(-5.0, -5.0, 0.0), Point3::new(10.0, 10.0, 15.0)),
        1e-6
    ));
}

#[test]
fn test_truck_translate_moves_bounds() {
    let kernel = TruckKernel::new();
    let moved = kernel.translate(&slab(&kernel, 2.0, 2.0, 2.0), Vector3::new(10.0, -3.0, 1.0)).unwrap();
    let bb = kernel.bounding_box(&moved).unwrap();
    assert_relative_eq!(bb.center().x, 10.0, epsilon = 1e-6);
    assert_relative_eq!(bb.center().y, -3.0, epsilon = 1e-6);
    assert_relative_eq!(bb.min.z, 1.0, epsilon = 1e-6);
}

#[test]
fn test_truck_box_topology() {
    let kernel = TruckKernel::new();
    let solid = slab(&kernel, 10.0, 6.0, 4.0);

    let edges = kernel.edges(&solid).unwrap();
    assert_eq!(edges.len(), 12);
    assert!(edges.iter().all(|e| e.kind == CurveKind::Line));
    assert_eq!(EdgeFilter::new().in_plane(AxisPlane::xy(4.0)).select(&edges).len(), 4);

    let faces = kernel.faces(&solid).unwrap();
    assert_eq!(faces.len(), 6);
    let top = FaceFilter::new().in_plane(AxisPlane::xy(4.0)).select(&faces);
    assert_eq!(top.len(), 1);
    match faces[top[0].0].kind {
        SurfaceKind::Plane { normal } => assert_relative_eq!(normal.z, 1.0, epsilon = 1e-9),
        other => panic!("top face is {:?}", other),
    }
    let bb = faces[top[0].0].bounds;
    assert!(bb.approx_eq_within(&Aabb::new(Point3::new(-5.0, -3.0, 4.0), Point3::new(5.0, 3.0, 4.0)), 1e-9));
}

#[test]
fn test_truck_cylinder_topology() {
    let kernel = TruckKernel::new();
    let solid = kernel.extrude(&Profile::circle(Point2::origin(), 3.0), &Plane::xy(), 5.0).unwrap();

    let faces = kernel.faces(&solid).unwrap();
    let planar = faces.iter().filter(|f| matches!(f.kind, SurfaceKind::Plane { .. })).count();
    assert_eq!(planar, 2);
    assert!(faces.iter().any(|f| f.kind == SurfaceKind::Cylinder));

    let edges = kernel.edges(&solid).unwrap();
    let rims = EdgeFilter::new().of_kind(CurveKind::Circle).in_plane(AxisPlane::xy(5.0)).select(&edges);
    assert!(!rims.is_empty());
}

#[test]
fn test_truck_sweep_ring() {
    let kernel = TruckKernel::new();
    let path = Profile::circle(Point2::origin(), 10.0);
    let ring = kernel.sweep(&path, &Section::rect(-1.0, 0.0, 0.0, 2.0)).unwrap();

    let bb = kernel.bounding_box(&ring).unwrap();
    assert_relative_eq!(bb.max.x, 10.0, epsilon = 0.01);
    assert_relative_eq!(bb.min.z, 0.0, epsilon = 1e-9);
    assert_relative_eq!(bb.max.z, 2.0, epsilon = 1e-9);

    let mesh = kernel.mesh(&ring, &MeshOptions::EXPORT).unwrap();
    let expected = std::f64::consts::PI * (100.0 - 81.0) * 2.0;
    assert_relative_eq!(mesh.volume(), expected, max_relative = 0.01);
}

#[test]
fn test_truck_sweep_around_rounded_rectangle() {
    let kernel = TruckKernel::new();
    let path = Profile::rounded_rectangle(Point2::origin(), 40.0, 20.0, 4.0);
    let section = Section::polygon(&[(-2.0, 0.0), (0.0, 0.0), (0.0, 3.0)]);
    let swept = kernel.sweep(&path, &section).unwrap();

    let bb = kernel.bounding_box(&swept).unwrap();
    assert!(bb.approx_eq_within(&Aabb::new(Point3::new(-20.0, -10.0, 0.0), Point3::new(20.0, 10.0, 3.0)), 1e-6));
    assert!(kernel.mesh(&swept, &MeshOptions::EXPORT).unwrap().volume() > 0.0);
}

#[test]
fn test_truck_sweep_capped_taper() {
    let kernel = TruckKernel::new();
    let path = Profile::rounded_rectangle(Point2::origin(), 30.0, 30.0, 5.0);
    let taper = Taper::new(vec![Point2::new(0.0, 0.0), Point2::new(-1.0, -1.0), Point2::new(-1.0, -3.0)]);
    let foot = kernel.sweep_capped(&path, &taper).unwrap();

    let bb = kernel.bounding_box(&foot).unwrap();
    assert!(bb.approx_eq_within(&Aabb::new(Point3::new(-15.0, -15.0, -3.0), Point3::new(15.0, 15.0, 0.0)), 1e-6));

    let volume = kernel.mesh(&foot, &MeshOptions::EXPORT).unwrap().volume();
    let inner = path.offset(-1.0).unwrap().area();
    assert!(volume > inner * 3.0 && volume < path.area() * 3.0, "volume {}", volume);
}

#[test]
fn test_truck_sweep_capped_rejects_folded_taper() {
    let kernel = TruckKernel::new();
    let path = Profile::rectangle(Point2::origin(), 10.0, 10.0);
    let folded = Taper::new(vec![Point2::new(0.0, 0.0), Point2::new(-1.0, -1.0), Point2::new(-1.0, 0.5)]);
    assert!(matches!(kernel.sweep_capped(&path, &folded), Err(KernelOpError::InvalidGeometry(_))));
}

#[test]
fn test_truck_shell_open_top() {
    let kernel = TruckKernel::new();
    let solid = slab(&kernel, 10.0, 6.0, 4.0);
    let top = FaceFilter::new().in_plane(AxisPlane::xy(4.0)).select(&kernel.faces(&solid).unwrap());
    let cup = kernel.shell(&solid, 1.0, &top).unwrap();

    let mesh = kernel.mesh(&cup, &MeshOptions::EXPORT).unwrap();
    assert_relative_eq!(mesh.volume(), 240.0 - 8.0 * 4.0 * 3.0, max_relative = 0.01);
    let bb = kernel.bounding_box(&cup).unwrap();
    assert_relative_eq!(bb.max.z, 4.0, epsilon = 1e-9);
}

#[test]
fn test_truck_shell_limits() {
    let kernel = TruckKernel::new();
    let solid = slab(&kernel, 10.0, 6.0, 4.0);
    let faces = kernel.faces(&solid).unwrap();

    let side = FaceFilter::new().in_plane(AxisPlane::yz(5.0)).select(&faces);
    assert_eq!(side.len(), 1);
    assert!(matches!(kernel.shell(&solid, 1.0, &side), Err(KernelOpError::Unsupported { .. })));

    let top = FaceFilter::new().in_plane(AxisPlane::xy(4.0)).select(&faces);
    assert!(matches!(kernel.shell(&solid, 3.5, &top), Err(KernelOpError::InvalidGeometry(_))));

    let moved = kernel.translate(&solid, Vector3::new(1.0, 0.0, 0.0)).unwrap();
    assert!(matches!(kernel.shell(&moved, 1.0, &top), Err(KernelOpError::Unsupported { .. })));
}

#[test]
fn test_truck_fillet_rounds_swept_corners() {
    let kernel = TruckKernel::new();
    let path = Profile::circle(Point2::origin(), 10.0);
    let ring = kernel.sweep(&path, &Section::rect(-2.0, 0.0, 0.0, 2.0)).unwrap();
    let edges = kernel.edges(&ring).unwrap();

    // both top corners, all the way round
    let top = EdgeFilter::new().in_plane(AxisPlane::xy(2.0)).of_kind(CurveKind::Circle).select(&edges);
    let rounded = kernel.fillet(&ring, &top, 0.5).unwrap();

    let sharp = kernel.mesh(&ring, &MeshOptions::EXPORT).unwrap().volume();
    let volume = kernel.mesh(&rounded, &MeshOptions::EXPORT).unwrap().volume();
    assert!(volume > 0.0 && volume < sharp, "{} vs {}", volume, sharp);
    let bb = kernel.bounding_box(&rounded).unwrap();
    assert_relative_eq!(bb.max.z, 2.0, epsilon = 1e-9);

    // one quarter of a loop is not enough
    assert!(matches!(kernel.fillet(&ring, &top[..1], 0.5), Err(KernelOpError::Unsupported { .. })));
    assert!(matches!(kernel.fillet(&ring, &top, 5.0), Err(KernelOpError::InvalidGeometry(_))));
    assert!(matches!(kernel.fillet(&ring, &[], 0.5), Err(KernelOpError::EmptySelection(_))));
}

#[test]
fn test_truck_fillet_needs_a_sweep() {
    let kernel = TruckKernel::new();
    let solid = slab(&kernel, 2.0, 2.0, 2.0);
    let unsupported = kernel.fillet(&solid, &[EdgeId(0)], 0.5);
    assert!(matches!(unsupported, Err(KernelOpError::Unsupported { kernel: "truck", .. })));
}

#[test]
fn test_truck_fuse_and_cut_separate_bodies() {
    let kernel = TruckKernel::new();
    let left = slab(&kernel, 4.0, 4.0, 4.0);
    let right = kernel.translate(&left, Vector3::new(10.0, 0.0, 0.0)).unwrap();
    let pair = kernel.fuse(&left, &right, FuseOptions::default()).unwrap();
    assert_eq!(pair.solid().boundaries().len(), 2);

    // drill only the right-hand block
    let drill = kernel
        .extrude(&Profile::circle(Point2::new(10.0, 0.0), 1.0), &Plane::xy().offset(-1.0), 6.0)
        .unwrap();
    let drilled = kernel.cut(&pair, &drill).unwrap();
    let mesh = kernel.mesh(&drilled, &MeshOptions::EXPORT).unwrap();
    let expected = 2.0 * 64.0 - std::f64::consts::PI * 4.0;
    assert_relative_eq!(mesh.volume(), expected, max_relative = 0.01);
}

#[test]
fn test_truck_intersect_overlapping_boxes() {
    let kernel = TruckKernel::new();
    let a = slab(&kernel, 10.0, 10.0, 10.0);
    let b = kernel.translate(&a, Vector3::new(5.0, 5.0, 5.0)).unwrap();
    let common = kernel.intersect(&a, &b).unwrap();
    let bb = kernel.bounding_box(&common).unwrap();
    assert!(bb.approx_eq_within(&Aabb::new(Point3::new(0.0, 0.0, 5.0), Point3::new(5.0, 5.0, 10.0)), 1e-6));
}

#[test]
fn test_truck_mesh_rejects_bad_tolerance() {
    let kernel = TruckKernel::new();
    let solid = slab(&kernel, 2.0, 2.0, 2.0);
    assert!(matches!(
        kernel.mesh(&solid, &MeshOptions::VIEW.with_tolerance(0.0)),
        Err(KernelOpError::TessellationFailed(_))
    ));
}
