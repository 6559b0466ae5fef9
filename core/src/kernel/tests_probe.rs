use super::*;
use crate::geometry::{Point2, Point3};
use approx::assert_relative_eq;

fn block(kernel: &ProbeKernel) -> ProbeSolid {
    kernel
        .extrude(&Profile::rectangle(Point2::origin(), 10.0, 6.0), &Plane::xy(), 4.0)
        .unwrap()
}

#[test]
fn test_extrusion_membership_and_bounds() {
    let kernel = ProbeKernel::new();
    let solid = block(&kernel);
    assert!(solid.contains(&Point3::new(4.9, 2.9, 3.9)));
    assert!(!solid.contains(&Point3::new(5.1, 0.0, 1.0)));
    assert!(!solid.contains(&Point3::new(0.0, 0.0, 4.1)));

    let bb = kernel.bounding_box(&solid).unwrap();
    assert!(bb.approx_eq_within(&Aabb::new(Point3::new(-5.0, -3.0, 0.0), Point3::new(5.0, 3.0, 4.0)), 1e-12));
}

#[test]
fn test_extrusion_on_front_plane_runs_towards_minus_y() {
    let kernel = ProbeKernel::new();
    let plane = Plane::xz().with_origin(Point3::new(0.0, 2.0, 0.0));
    let rod = kernel.extrude(&Profile::circle(Point2::new(0.0, 5.0), 1.0), &plane, 4.0).unwrap();

    assert!(rod.contains(&Point3::new(0.0, 0.0, 5.0)));
    assert!(rod.contains(&Point3::new(0.5, -1.9, 5.5)));
    assert!(!rod.contains(&Point3::new(0.0, 2.5, 5.0)));
    assert!(!rod.contains(&Point3::new(0.0, 0.0, 6.5)));

    let bb = rod.bounds().unwrap();
    assert_relative_eq!(bb.min.y, -2.0, epsilon = 1e-12);
    assert_relative_eq!(bb.max.y, 2.0, epsilon = 1e-12);
    assert_relative_eq!(bb.max.z, 6.0, epsilon = 1e-12);
}

#[test]
fn test_booleans() {
    let kernel = ProbeKernel::new();
    let a = block(&kernel);
    let b = kernel.translate(&a, Vector3::new(5.0, 0.0, 0.0)).unwrap();

    let union = kernel.fuse(&a, &b, FuseOptions::default()).unwrap();
    let diff = kernel.cut(&a, &b).unwrap();
    let common = kernel.intersect(&a, &b).unwrap();

    let p = Point3::new(-2.0, 0.0, 1.0);
    let q = Point3::new(2.0, 0.0, 1.0);
    let r = Point3::new(8.0, 0.0, 1.0);
    assert!(union.contains(&p) && union.contains(&q) && union.contains(&r));
    assert!(diff.contains(&p) && !diff.contains(&q) && !diff.contains(&r));
    assert!(!common.contains(&p) && common.contains(&q) && !common.contains(&r));

    assert_relative_eq!(union.bounds().unwrap().max.x, 10.0);
    assert_relative_eq!(common.bounds().unwrap().min.x, 0.0);
}

#[test]
fn test_section_area_and_volume() {
    let kernel = ProbeKernel::new();
    let solid = block(&kernel);
    assert_relative_eq!(solid.section_area(2.0, 0.5), 60.0, epsilon = 1e-9);
    assert_relative_eq!(solid.sample_volume(0.5), 240.0, epsilon = 1e-9);
}

#[test]
fn test_sweep_membership() {
    let kernel = ProbeKernel::new();
    let path = Profile::rectangle(Point2::origin(), 20.0, 20.0);
    // a 2 × 3 band just inside the path
    let rim = kernel.sweep(&path, &Section::rect(-2.0, 0.0, 0.0, 3.0)).unwrap();

    assert!(rim.contains(&Point3::new(9.0, 0.0, 1.0)));
    assert!(rim.contains(&Point3::new(-9.0, 9.0, 2.9)));
    assert!(!rim.contains(&Point3::new(7.0, 0.0, 1.0)));
    assert!(!rim.contains(&Point3::new(10.5, 0.0, 1.0)));
    assert!(!rim.contains(&Point3::new(9.0, 0.0, 3.5)));

    let bb = rim.bounds().unwrap();
    assert_relative_eq!(bb.max.x, 10.0);
    assert_relative_eq!(bb.max.z, 3.0);
}

#[test]
fn test_sweep_rejects_open_path_and_empty_section() {
    let kernel = ProbeKernel::new();
    let path = Profile::rectangle(Point2::origin(), 20.0, 20.0);
    let empty = Section::rect(-2.0, 0.0, 0.0, 3.0).intersect_rect(5.0, 5.0, 6.0, 6.0);
    assert!(kernel.sweep(&path, &empty).is_err());

    let open = Profile::new(path.segments[..2].to_vec());
    assert!(kernel.sweep(&open, &Section::rect(-1.0, 0.0, 0.0, 1.0)).is_err());
}

#[test]
fn test_capped_sweep_follows_taper() {
    let kernel = ProbeKernel::new();
    let path = Profile::rectangle(Point2::origin(), 20.0, 20.0);
    let taper = Taper::new(vec![Point2::new(0.0, 0.0), Point2::new(-2.0, -2.0)]);
    let foot = kernel.sweep_capped(&path, &taper).unwrap();

    assert!(foot.contains(&Point3::new(9.9, 0.0, -0.05)));
    assert!(!foot.contains(&Point3::new(9.9, 0.0, -1.5)));
    assert!(foot.contains(&Point3::new(8.4, 0.0, -1.5)));
    assert!(foot.contains(&Point3::new(0.0, 0.0, -1.0)));
    assert!(!foot.contains(&Point3::new(0.0, 0.0, -2.5)));
    assert!(!foot.contains(&Point3::new(0.0, 0.0, 0.5)));

    let bb = foot.bounds().unwrap();
    assert_relative_eq!(bb.min.z, -2.0);
    assert_relative_eq!(bb.max.z, 0.0);

    let zigzag = Taper::new(vec![Point2::new(0.0, 0.0), Point2::new(-1.0, -1.0), Point2::new(-1.0, 0.5)]);
    assert!(kernel.sweep_capped(&path, &zigzag).is_err());
}

#[test]
fn test_extrusion_topology() {
    let kernel = ProbeKernel::new();
    let solid = block(&kernel);

    let edges = kernel.edges(&solid).unwrap();
    assert_eq!(edges.len(), 12);
    assert!(edges.iter().enumerate().all(|(i, e)| e.id == EdgeId(i)));

    let faces = kernel.faces(&solid).unwrap();
    assert_eq!(faces.len(), 6);
    assert_eq!(faces[0].kind, SurfaceKind::Plane { normal: -Vector3::z() });
    assert_eq!(faces[1].kind, SurfaceKind::Plane { normal: Vector3::z() });
    assert_relative_eq!(faces[1].bounds.min.z, 4.0);
}

#[test]
fn test_cylinder_topology_has_circle_edges() {
    let kernel = ProbeKernel::new();
    let rod = kernel.extrude(&Profile::circle(Point2::origin(), 2.0), &Plane::xy(), 5.0).unwrap();
    let edges = kernel.edges(&rod).unwrap();
    assert_eq!(edges.iter().filter(|e| e.kind == CurveKind::Circle).count(), 2);

    let faces = kernel.faces(&rod).unwrap();
    assert_eq!(faces[2].kind, SurfaceKind::Cylinder);
}

#[test]
fn test_cut_topology_comes_from_the_minuend() {
    let kernel = ProbeKernel::new();
    let solid = block(&kernel);
    let drill = kernel
        .extrude(&Profile::circle(Point2::origin(), 1.0), &Plane::xy().offset(-1.0), 6.0)
        .unwrap();
    let drilled = kernel.cut(&solid, &drill).unwrap();

    let edges = kernel.edges(&drilled).unwrap();
    assert_eq!(edges.len(), 12);
    assert!(edges.iter().all(|e| e.kind == CurveKind::Line));
    assert_eq!(kernel.faces(&drilled).unwrap().len(), 6);
    // the drill's end caps lie outside the part and must not be selectable
    assert!(kernel.faces(&drilled).unwrap().iter().all(|f| f.bounds.min.z > -0.5));
}

#[test]
fn test_intersection_topology_stays_inside_the_overlap() {
    let kernel = ProbeKernel::new();
    let solid = block(&kernel);
    let envelope = kernel
        .extrude(&Profile::rectangle(Point2::origin(), 20.0, 20.0), &Plane::xy().offset(-5.0), 20.0)
        .unwrap();
    let same = kernel.intersect(&solid, &envelope).unwrap();
    assert_eq!(kernel.edges(&same).unwrap().len(), 12);
    assert_eq!(kernel.faces(&same).unwrap().len(), 6);

    let far = kernel.translate(&solid, Vector3::new(50.0, 0.0, 0.0)).unwrap();
    let empty = kernel.intersect(&solid, &far).unwrap();
    assert!(kernel.edges(&empty).unwrap().is_empty());
}

#[test]
fn test_shell_leaves_walls_and_floor() {
    let kernel = ProbeKernel::new();
    let solid = block(&kernel);
    let cup = kernel.shell(&solid, 1.0, &[FaceId(1)]).unwrap();

    assert!(!cup.contains(&Point3::new(0.0, 0.0, 2.0)));
    assert!(!cup.contains(&Point3::new(0.0, 0.0, 3.99)));
    assert!(cup.contains(&Point3::new(0.0, 0.0, 0.5)));
    assert!(cup.contains(&Point3::new(4.5, 0.0, 3.0)));
    assert!(cup.contains(&Point3::new(0.0, -2.5, 3.0)));

    // the open face is gone from the face list
    let faces = kernel.faces(&cup).unwrap();
    assert_eq!(faces.len(), 5);
    assert_eq!(faces[0].kind, SurfaceKind::Plane { normal: -Vector3::z() });
}

#[test]
fn test_closed_shell_keeps_both_caps() {
    let kernel = ProbeKernel::new();
    let solid = block(&kernel);
    let hollow = kernel.shell(&solid, 1.0, &[]).unwrap();
    assert!(hollow.contains(&Point3::new(0.0, 0.0, 3.5)));
    assert!(!hollow.contains(&Point3::new(0.0, 0.0, 2.0)));
}

#[test]
fn test_shell_rejections() {
    let kernel = ProbeKernel::new();
    let solid = block(&kernel);

    assert!(matches!(kernel.shell(&solid, 2.0, &[]), Err(KernelOpError::InvalidGeometry(_))));
    assert!(matches!(kernel.shell(&solid, 0.0, &[FaceId(1)]), Err(KernelOpError::InvalidGeometry(_))));
    assert!(matches!(kernel.shell(&solid, 1.0, &[FaceId(3)]), Err(KernelOpError::Unsupported { .. })));

    let moved = kernel.translate(&solid, Vector3::new(1.0, 0.0, 0.0)).unwrap();
    assert!(matches!(kernel.shell(&moved, 1.0, &[FaceId(1)]), Err(KernelOpError::Unsupported { .. })));
}

#[test]
fn test_fillet_validation() {
    let kernel = ProbeKernel::new();
    let solid = block(&kernel);

    assert_eq!(kernel.fillet(&solid, &[], 0.5).unwrap_err(), KernelOpError::EmptySelection("edges"));
    assert!(matches!(kernel.fillet(&solid, &[EdgeId(12)], 0.5), Err(KernelOpError::InvalidGeometry(_))));
    assert!(matches!(kernel.fillet(&solid, &[EdgeId(0)], -1.0), Err(KernelOpError::InvalidGeometry(_))));

    let rounded = kernel.fillet(&solid, &[EdgeId(0), EdgeId(1)], 0.5).unwrap();
    assert!(rounded.contains(&Point3::new(0.0, 0.0, 2.0)));
    assert_eq!(kernel.edges(&rounded).unwrap().len(), 12);
}

#[test]
fn test_shape_chain_with_filters() {
    use crate::selection::{AxisPlane, EdgeFilter, FaceFilter};

    let kernel = ProbeKernel::new();
    let cup = Shape::extrude(&kernel, &Profile::rectangle(Point2::origin(), 10.0, 6.0), &Plane::xy(), 4.0)
        .unwrap()
        .shell(1.0, &FaceFilter::new().in_plane(AxisPlane::xy(4.0)))
        .unwrap()
        .fillet(&EdgeFilter::new().in_plane(AxisPlane::xy(4.0)), 0.2)
        .unwrap();
    assert!(!cup.solid().contains(&Point3::new(0.0, 0.0, 2.0)));

    let nothing = Shape::new(&kernel, block(&kernel)).fillet(&EdgeFilter::new().in_plane(AxisPlane::xy(9.0)), 0.2);
    assert_eq!(nothing.err(), Some(KernelOpError::EmptySelection("edges")));
}

#[test]
fn test_probe_cannot_mesh() {
    let kernel = ProbeKernel::new();
    let solid = block(&kernel);
    assert!(matches!(
        kernel.mesh(&solid, &MeshOptions::VIEW),
        Err(KernelOpError::Unsupported { kernel: "probe", .. })
    ));
}
