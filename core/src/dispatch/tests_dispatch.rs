use super::*;
use crate::kernel::{ProbeKernel, TruckKernel};
use approx::assert_relative_eq;

fn registry() -> Arc<Registry> {
    Arc::new(Registry::builtin().unwrap())
}

#[test]
fn test_build_unknown_model() {
    let dispatcher = Dispatcher::new(registry(), ProbeKernel::new());
    assert!(matches!(dispatcher.build("missing"), Err(BuildError::UnknownModelId(id)) if id == "missing"));
}

#[test]
fn test_every_builtin_model_builds_on_probe() {
    let dispatcher = Dispatcher::new(registry(), ProbeKernel::new());
    let ids: Vec<String> = dispatcher.registry().ids().map(str::to_string).collect();
    for id in ids {
        let solid = dispatcher.build(&id).unwrap_or_else(|e| panic!("{} failed: {}", id, e));
        assert!(solid.bounds().is_some(), "{} has no extent", id);
    }
}

#[test]
fn test_probe_mesh_is_adapter_failure() {
    let dispatcher = Dispatcher::new(registry(), ProbeKernel::new());
    match dispatcher.mesh("vent-ring", &MeshOptions::VIEW) {
        Err(BuildError::AdapterFailure { tolerance, source }) => {
            assert_relative_eq!(tolerance, 0.1);
            assert!(matches!(source, KernelOpError::Unsupported { .. }));
        }
        other => panic!("unexpected result {:?}", other.map(|m| m.triangle_count())),
    }
}

#[test]
fn test_truck_meshes_shaver_box() {
    let dispatcher = Dispatcher::new(registry(), TruckKernel::new());
    let options = MeshOptions::VIEW;
    let mesh = dispatcher.mesh("gridfinity-shaver-box", &options).unwrap();
    assert!(mesh.volume() > 0.0);

    let bb = mesh.bounding_box().unwrap();
    assert!((bb.size().x - 83.5).abs() <= options.tolerance, "x extent {}", bb.size().x);
    assert!((bb.size().y - 125.5).abs() <= options.tolerance, "y extent {}", bb.size().y);
    assert_relative_eq!(bb.min.z, -5.0, epsilon = 1e-6);
    assert_relative_eq!(bb.max.z, 42.0 + 3.544_145_797_918_816, epsilon = 1e-6);
}

#[test]
fn test_truck_vent_ring_mesh_matches_bounds() {
    let dispatcher = Dispatcher::new(registry(), TruckKernel::new());
    let options = MeshOptions::VIEW;
    let mesh = dispatcher.mesh("vent-ring", &options).unwrap();
    assert!(mesh.triangle_count() > 0);

    let bb = mesh.bounding_box().unwrap();
    let size = bb.size();
    assert!((size.x - 48.2).abs() <= options.tolerance, "x extent {}", size.x);
    assert!((size.y - 48.2).abs() <= options.tolerance, "y extent {}", size.y);
    assert_relative_eq!(size.z, 5.0, epsilon = 1e-6);

    let annulus = std::f64::consts::PI * (24.1f64.powi(2) - 23.2f64.powi(2)) * 5.0;
    assert_relative_eq!(mesh.volume().abs(), annulus, max_relative = 0.05);
}

#[test]
fn test_truck_stl_export() {
    let dispatcher = Dispatcher::new(registry(), TruckKernel::new());
    let options = StlOptions::default().with_mesh(MeshOptions::VIEW);
    let mesh = dispatcher.mesh("hexagon", &options.mesh).unwrap();

    let binary = dispatcher.export_stl("hexagon", &options).unwrap();
    assert_eq!(binary.len(), 84 + 50 * mesh.triangle_count());
    let count = u32::from_le_bytes([binary[80], binary[81], binary[82], binary[83]]);
    assert_eq!(count as usize, mesh.triangle_count());

    let ascii = dispatcher.export_stl("hexagon", &options.ascii()).unwrap();
    let text = String::from_utf8(ascii).unwrap();
    assert!(text.starts_with("solid hexagon\n"));
    assert!(text.trim_end().ends_with("endsolid hexagon"));
    assert_eq!(text.matches("facet normal").count(), mesh.triangle_count());
}

#[test]
fn test_repeated_builds_are_identical() {
    let dispatcher = Dispatcher::new(registry(), TruckKernel::new());
    let a = dispatcher.mesh("christmas-ornament", &MeshOptions::VIEW).unwrap();
    let b = dispatcher.mesh("christmas-ornament", &MeshOptions::VIEW).unwrap();
    assert_eq!(a.triangle_count(), b.triangle_count());
    assert!(a.bounding_box().unwrap().approx_eq_within(&b.bounding_box().unwrap(), 1e-9));
    assert_relative_eq!(a.volume(), b.volume(), epsilon = 1e-6);
}
