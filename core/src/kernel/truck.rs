//! Truck-based implementation of the geometry kernel.
//!
//! This module provides a CAD kernel implementation using the Truck library,
//! which is licensed under Apache-2.0 (MIT-compatible).
//!
//! Sweeps are lofted: every section vertex becomes a copy of the path offset
//! by its `u` and lifted to its `v`, and consecutive copies are joined with
//! `try_wire_homotopy` bands. Truck has no native fillet or shell, so a
//! [`TruckSolid`] remembers the extrusion or sweep it came from and those two
//! operations rebuild it: shell cuts an inset extrusion out of the original,
//! fillet re-sweeps a section with the selected corners rounded.

use super::types::*;
use super::{Kernel, KernelOpError, KernelResult};
use crate::geometry::{Aabb, MeshBuffer, Point2, Point3 as GeoPoint3, Vector3 as GeoVector3, EPSILON};
use crate::sketch::{Profile, Section, Segment, Taper};
use std::collections::HashSet;
use std::f64::consts::FRAC_PI_2;
use std::ops::Bound;
use tracing::debug;

// Use truck's pre-exported types which come from cgmath64
use truck_meshalgo::tessellation::MeshableShape;
use truck_modeling::{builder, Edge, Face, Point3, Rad, Shell, Solid, Surface, Vector3, Vertex, Wire};
use truck_modeling::{BoundedCurve, ParametricCurve, ParametricSurface, ParametricSurface3D};

/// Points sampled along each edge for classification and bounds.
const EDGE_SAMPLES: usize = 8;

/// Deviation allowed when deciding that sampled geometry is a line, circle
/// or plane.
const KIND_TOLERANCE: f64 = 1e-5;

/// Truck-based CAD kernel implementation.
#[derive(Debug, Clone)]
pub struct TruckKernel {
    /// Tolerance handed to truck-shapeops for boolean operations.
    pub boolean_tolerance: f64,
    /// Tessellation tolerance used for bounding boxes.
    pub measure_tolerance: f64,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            boolean_tolerance: 0.05,
            measure_tolerance: 0.01, // 0.01mm precision
        }
    }

    pub fn with_tolerance(boolean_tolerance: f64) -> Self {
        Self { boolean_tolerance, ..Self::new() }
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

/// Solid handle of the truck kernel.
///
/// Alongside the B-rep it keeps the recipe of a plain extrusion or sweep.
/// Translation and booleans produce solids without one.
#[derive(Debug, Clone)]
pub struct TruckSolid {
    solid: Solid,
    origin: Option<Origin>,
}

#[derive(Debug, Clone)]
enum Origin {
    /// Counter-clockwise `profile` on `plane`, pushed `distance` along its normal.
    Extrusion { profile: Profile, plane: Plane, distance: f64 },
    /// `section` swept around a counter-clockwise `path` whose arcs are split
    /// into quarter turns or less.
    Sweep { path: Profile, section: Section },
}

impl TruckSolid {
    fn plain(solid: Solid) -> Self {
        Self { solid, origin: None }
    }

    pub fn solid(&self) -> &Solid {
        &self.solid
    }
}

fn to_truck_point(p: &GeoPoint3) -> Point3 {
    Point3::new(p.x, p.y, p.z)
}

fn to_truck_vector(v: &GeoVector3) -> Vector3 {
    Vector3::new(v.x, v.y, v.z)
}

fn from_truck_point(p: &Point3) -> GeoPoint3 {
    GeoPoint3::new(p.x, p.y, p.z)
}

fn from_truck_vector(v: &Vector3) -> GeoVector3 {
    GeoVector3::new(v.x, v.y, v.z)
}

/// Counter-clockwise path with short enough arcs for lofting between offset
/// copies.
fn sweep_path(path: &Profile) -> Profile {
    path.clone().ensure_ccw().split_arcs(FRAC_PI_2)
}

/// Edges of a solid, each once, in a stable order.
fn unique_edges(solid: &Solid) -> Vec<Edge> {
    let mut seen = HashSet::new();
    solid.edge_iter().filter(|edge| seen.insert(edge.id())).collect()
}

/// Evenly spaced points along an edge, both ends included.
fn edge_samples(edge: &Edge) -> Vec<GeoPoint3> {
    let curve = edge.oriented_curve();
    let (t0, t1) = curve.range_tuple();
    (0..=EDGE_SAMPLES)
        .map(|i| from_truck_point(&curve.subs(t0 + (t1 - t0) * i as f64 / EDGE_SAMPLES as f64)))
        .collect()
}

fn face_samples(face: &Face) -> Vec<GeoPoint3> {
    face.boundaries()
        .iter()
        .flat_map(|wire| wire.edge_iter().flat_map(edge_samples).collect::<Vec<_>>())
        .collect()
}

fn solid_bounds(solid: &Solid) -> Option<Aabb> {
    Aabb::from_points(unique_edges(solid).iter().flat_map(edge_samples))
}

/// Center, radius and normal of the circle through three points.
fn circle_through(a: &GeoPoint3, b: &GeoPoint3, c: &GeoPoint3) -> Option<(GeoPoint3, f64, GeoVector3)> {
    let (ab, ac) = (b - a, c - a);
    let n = ab.cross(&ac);
    let n2 = n.norm_squared();
    if n2 < EPSILON * EPSILON {
        return None;
    }
    let center = a + (n.cross(&ab) * ac.norm_squared() + ac.cross(&n) * ab.norm_squared()) / (2.0 * n2);
    Some((center, (a - center).norm(), n / n2.sqrt()))
}

fn curve_kind(points: &[GeoPoint3]) -> CurveKind {
    let (first, last) = (points[0], points[points.len() - 1]);
    if let Some(dir) = (last - first).try_normalize(EPSILON) {
        if points.iter().all(|p| (p - first).cross(&dir).norm() < KIND_TOLERANCE) {
            return CurveKind::Line;
        }
    }
    // thirds rather than the ends, so closed edges still give three points
    let n = points.len() - 1;
    match circle_through(&points[0], &points[n / 3], &points[2 * n / 3]) {
        Some((center, radius, normal))
            if points.iter().all(|p| {
                ((p - center).norm() - radius).abs() < KIND_TOLERANCE && (p - center).dot(&normal).abs() < KIND_TOLERANCE
            }) =>
        {
            CurveKind::Circle
        }
        _ => CurveKind::Other,
    }
}

/// Unit normals on a 3x3 grid inside the surface's parameter range.
fn sample_normals(surface: &Surface) -> Option<Vec<GeoVector3>> {
    let bounded = |(lo, hi): (Bound<f64>, Bound<f64>)| match (lo, hi) {
        (Bound::Included(a) | Bound::Excluded(a), Bound::Included(b) | Bound::Excluded(b)) => Some((a, b)),
        _ => None,
    };
    let (urange, vrange) = surface.parameter_range();
    let ((u0, u1), (v0, v1)) = (bounded(urange)?, bounded(vrange)?);
    let at = |a: f64, b: f64, k: usize| a + (b - a) * (0.1 + 0.4 * k as f64);
    let mut normals = Vec::with_capacity(9);
    for i in 0..3 {
        for j in 0..3 {
            normals.push(from_truck_vector(&surface.normal(at(u0, u1, i), at(v0, v1, j))));
        }
    }
    Some(normals)
}

fn surface_kind(face: &Face) -> SurfaceKind {
    let surface = face.oriented_surface();
    if let Surface::Plane(plane) = &surface {
        return SurfaceKind::Plane { normal: from_truck_vector(&plane.normal()) };
    }
    let Some(normals) = sample_normals(&surface) else {
        return SurfaceKind::Other;
    };
    let first = normals[0];
    if normals.iter().all(|n| (n - first).norm() < KIND_TOLERANCE) {
        return SurfaceKind::Plane { normal: first };
    }
    // a cylinder's normals all lie across its axis
    let axis = normals.iter().find_map(|n| first.cross(n).try_normalize(1e-3));
    match axis {
        Some(axis) if normals.iter().all(|n| n.dot(&axis).abs() < KIND_TOLERANCE) => SurfaceKind::Cylinder,
        _ => SurfaceKind::Other,
    }
}

fn cap(wire: &Wire) -> KernelResult<Face> {
    builder::try_attach_plane(&[wire.clone()])
        .map_err(|e| KernelOpError::OperationFailed(format!("Failed to cap sweep: {:?}", e)))
}

/// Faces joining each wire to the next, and the last back to the first when
/// `closed`.
fn loft(wires: &[Wire], closed: bool) -> KernelResult<Vec<Face>> {
    let bands = if closed { wires.len() } else { wires.len() - 1 };
    let mut faces = Vec::new();
    for i in 0..bands {
        let band = builder::try_wire_homotopy(&wires[i], &wires[(i + 1) % wires.len()])
            .map_err(|e| KernelOpError::OperationFailed(format!("Failed to loft sweep band: {:?}", e)))?;
        faces.extend(band.face_iter().cloned());
    }
    Ok(faces)
}

fn closed_solid(shells: Vec<Shell>) -> KernelResult<Solid> {
    Solid::try_new(shells).map_err(|e| KernelOpError::OperationFailed(format!("Result is not a closed solid: {:?}", e)))
}

impl TruckKernel {
    /// Build a closed wire from a profile on `plane`.
    ///
    /// Segment endpoints share vertices so the wire is topologically closed.
    /// A lone full-circle arc becomes a rotational sweep of one vertex.
    fn build_wire(&self, profile: &Profile, plane: &Plane) -> KernelResult<Wire> {
        if profile.is_circle() {
            if let Segment::Arc { center, radius, .. } = profile.segments[0] {
                return Ok(self.build_circle_wire(plane, &center, radius));
            }
        }

        let n = profile.segments.len();
        if n < 2 {
            return Err(KernelOpError::InvalidGeometry(
                "Profile needs at least two segments or one full circle".into(),
            ));
        }

        let vertices: Vec<Vertex> = profile
            .segments
            .iter()
            .map(|s| builder::vertex(to_truck_point(&plane.to_world(&s.start()))))
            .collect();

        let mut edges: Vec<Edge> = Vec::with_capacity(n);
        for (i, segment) in profile.segments.iter().enumerate() {
            let (v0, v1) = (&vertices[i], &vertices[(i + 1) % n]);
            let edge = match segment {
                Segment::Line { .. } => builder::line(v0, v1),
                Segment::Arc { .. } => {
                    let transit = plane.to_world(&segment.point_at(0.5));
                    builder::circle_arc(v0, v1, to_truck_point(&transit))
                }
            };
            edges.push(edge);
        }

        Ok(Wire::from_iter(edges))
    }

    /// Build a circular wire using rsweep (rotational sweep of a vertex).
    /// This creates a true circle edge, preserving cylindrical topology on extrusion.
    fn build_circle_wire(&self, plane: &Plane, center: &Point2, radius: f64) -> Wire {
        let start = plane.to_world(&Point2::new(center.x + radius, center.y));
        let axis_point = plane.to_world(center);
        let v: Vertex = builder::vertex(to_truck_point(&start));
        // Truck requires angle > 2π for closed shapes (2π ≈ 6.28, so use 7.0)
        builder::rsweep(&v, to_truck_point(&axis_point), to_truck_vector(&plane.normal), Rad(7.0))
    }

    /// `path` offset by `u` and lifted to height `v`.
    fn offset_wire(&self, path: &Profile, u: f64, v: f64) -> KernelResult<Wire> {
        let offset = path
            .offset(u)
            .ok_or_else(|| KernelOpError::InvalidGeometry(format!("Sweep path cannot be offset by {}", u)))?;
        self.build_wire(&offset, &Plane::xy().offset(v))
    }

    /// Turn a solid whose faces point inwards the right way out.
    fn outward(&self, mut solid: Solid) -> KernelResult<Solid> {
        if self.triangulate(&solid, self.measure_tolerance * 10.0)?.volume() < 0.0 {
            solid.not();
        }
        Ok(solid)
    }

    /// Run a truck-shapeops boolean shell by shell on `a`. Shells whose
    /// bounds miss `b` are kept as they are when `keep_outside` is set and
    /// dropped otherwise.
    fn per_shell<F>(&self, a: &Solid, b: &Solid, keep_outside: bool, op: F) -> KernelResult<Vec<Shell>>
    where
        F: Fn(&Solid, &Solid) -> Option<Solid>,
    {
        let reach = solid_bounds(b).map(|bb| bb.expanded(self.boolean_tolerance));
        let mut shells = Vec::new();
        for shell in a.boundaries() {
            let piece = Solid::new_unchecked(vec![shell.clone()]);
            let touches = match (solid_bounds(&piece), reach) {
                (Some(p), Some(r)) => p.intersection(&r).is_some(),
                _ => false,
            };
            if !touches {
                if keep_outside {
                    shells.push(shell.clone());
                }
                continue;
            }
            let result = op(&piece, b).ok_or_else(|| KernelOpError::OperationFailed("Boolean operation failed".into()))?;
            shells.extend(result.into_boundaries());
        }
        Ok(shells)
    }

    /// Which caps of an extrusion the listed faces are: `(bottom, top)`.
    fn open_caps(&self, solid: &Solid, plane: &Plane, distance: f64, open_faces: &[FaceId]) -> KernelResult<(bool, bool)> {
        let faces: Vec<&Face> = solid.face_iter().collect();
        let (mut bottom, mut top) = (false, false);
        for id in open_faces {
            let face = faces
                .get(id.0)
                .ok_or_else(|| KernelOpError::InvalidGeometry(format!("Unknown face {:?}", id)))?;
            let heights: Vec<f64> = face_samples(face).iter().map(|p| (p - plane.origin).dot(&plane.normal)).collect();
            let at = |h: f64| heights.iter().all(|z| (z - h).abs() < KIND_TOLERANCE);
            if at(0.0) {
                bottom = true;
            } else if at(distance) {
                top = true;
            } else {
                return Err(KernelOpError::Unsupported { kernel: self.name(), operation: "shell with open side faces" });
            }
        }
        Ok((bottom, top))
    }

    /// The section vertex an edge was swept from, if it runs along the path.
    fn section_vertex(path: &Profile, rings: &[Vec<Point2>], edge: &Edge) -> Option<Point2> {
        let samples = edge_samples(edge);
        let v = samples[0].z;
        let u = path.signed_distance(&Point2::new(samples[0].x, samples[0].y));
        let along = samples.iter().all(|p| {
            (p.z - v).abs() < KIND_TOLERANCE && (path.signed_distance(&Point2::new(p.x, p.y)) - u).abs() < KIND_TOLERANCE
        });
        if !along {
            return None;
        }
        rings
            .iter()
            .flatten()
            .find(|q| (q.x - u).abs() < KIND_TOLERANCE && (q.y - v).abs() < KIND_TOLERANCE)
            .copied()
    }

    fn triangulate(&self, solid: &Solid, tolerance: f64) -> KernelResult<MeshBuffer> {
        // truck refines by chord deviation only; the angular bound is not used
        let meshed_solid = solid.triangulation(tolerance);

        let mut mesh = MeshBuffer::new();
        for shell in meshed_solid.boundaries() {
            for face in shell.face_iter() {
                if let Some(polygon_mesh) = face.surface() {
                    let positions: Vec<GeoPoint3> = polygon_mesh.positions().iter().map(from_truck_point).collect();
                    let triangles: Vec<[u32; 3]> = polygon_mesh
                        .tri_faces()
                        .iter()
                        .map(|tri| [tri[0].pos as u32, tri[1].pos as u32, tri[2].pos as u32])
                        .collect();
                    mesh.append(&positions, None, &triangles);
                }
            }
        }

        if mesh.is_empty() {
            return Err(KernelOpError::TessellationFailed(format!(
                "No triangles produced at tolerance {}",
                tolerance
            )));
        }
        Ok(mesh)
    }
}

impl Kernel for TruckKernel {
    type Solid = TruckSolid;

    fn name(&self) -> &'static str {
        "truck"
    }

    fn extrude(&self, profile: &Profile, plane: &Plane, distance: f64) -> KernelResult<Self::Solid> {
        if !profile.is_closed() {
            return Err(KernelOpError::InvalidGeometry("Profile is not closed".into()));
        }
        if !(distance > 0.0) {
            return Err(KernelOpError::InvalidGeometry(format!(
                "Extrusion distance must be positive, got {}",
                distance
            )));
        }

        // Counter-clockwise in plane coordinates so the face normal follows the plane normal
        let profile = profile.clone().ensure_ccw();
        let wire = self.build_wire(&profile, plane)?;
        let face = builder::try_attach_plane(&[wire])
            .map_err(|e| KernelOpError::OperationFailed(format!("Failed to create face: {:?}", e)))?;

        let solid = builder::tsweep(&face, to_truck_vector(&(plane.normal * distance)));
        Ok(TruckSolid { solid, origin: Some(Origin::Extrusion { profile, plane: *plane, distance }) })
    }

    fn sweep(&self, path: &Profile, section: &Section) -> KernelResult<Self::Solid> {
        if !path.is_closed() {
            return Err(KernelOpError::InvalidGeometry("Sweep path is not closed".into()));
        }
        if section.is_empty() {
            return Err(KernelOpError::InvalidGeometry("Sweep section is empty".into()));
        }

        let path = sweep_path(path);
        let rings = section.rings();
        let mut shells = Vec::with_capacity(rings.len());
        for ring in &rings {
            let wires = ring
                .iter()
                .map(|q| self.offset_wire(&path, q.x, q.y))
                .collect::<KernelResult<Vec<_>>>()?;
            shells.push(loft(&wires, true)?.into_iter().collect::<Shell>());
        }
        let solid = self.outward(closed_solid(shells)?)?;

        debug!(rings = rings.len(), segments = path.segments.len(), "swept section");
        Ok(TruckSolid { solid, origin: Some(Origin::Sweep { path, section: section.clone() }) })
    }

    fn sweep_capped(&self, path: &Profile, taper: &Taper) -> KernelResult<Self::Solid> {
        if !path.is_closed() {
            return Err(KernelOpError::InvalidGeometry("Sweep path is not closed".into()));
        }
        if taper.points().len() < 2 || !taper.is_monotone() {
            return Err(KernelOpError::InvalidGeometry("Taper must be monotone in v".into()));
        }

        let path = sweep_path(path);
        let mut points = taper.points().to_vec();
        if points[0].y > points[points.len() - 1].y {
            points.reverse();
        }
        let wires = points
            .iter()
            .map(|q| self.offset_wire(&path, q.x, q.y))
            .collect::<KernelResult<Vec<_>>>()?;

        let mut faces = loft(&wires, false)?;
        faces.push(cap(&wires[0].inverse())?);
        faces.push(cap(&wires[wires.len() - 1])?);
        let solid = self.outward(closed_solid(vec![faces.into_iter().collect()])?)?;

        debug!(levels = wires.len(), "swept capped taper");
        Ok(TruckSolid::plain(solid))
    }

    fn translate(&self, solid: &Self::Solid, offset: GeoVector3) -> KernelResult<Self::Solid> {
        Ok(TruckSolid::plain(builder::translated(&solid.solid, to_truck_vector(&offset))))
    }

    // === Boolean Operations ===

    fn fuse(&self, a: &Self::Solid, b: &Self::Solid, options: FuseOptions) -> KernelResult<Self::Solid> {
        if options.common_face {
            debug!("truck has no common-face fuse, running a full union");
        }
        let apart = match (solid_bounds(&a.solid), solid_bounds(&b.solid)) {
            (Some(p), Some(q)) => p.expanded(self.boolean_tolerance).intersection(&q).is_none(),
            _ => false,
        };
        if apart {
            // nothing to merge, the shells simply sit side by side
            let shells = a.solid.boundaries().iter().chain(b.solid.boundaries()).cloned().collect();
            return closed_solid(shells).map(TruckSolid::plain);
        }
        truck_shapeops::or(&a.solid, &b.solid, self.boolean_tolerance)
            .map(TruckSolid::plain)
            .ok_or_else(|| KernelOpError::OperationFailed("Boolean union failed".into()))
    }

    fn cut(&self, a: &Self::Solid, b: &Self::Solid) -> KernelResult<Self::Solid> {
        // Subtraction is: A - B = A AND (NOT B)
        // Solid::not() mutates in place, so we clone first
        let mut complement_b = b.solid.clone();
        complement_b.not();
        // and() intersects across all of its first operand's shells, so each one goes alone
        let shells = self.per_shell(&a.solid, &b.solid, true, |piece, _| {
            truck_shapeops::and(piece, &complement_b, self.boolean_tolerance)
        })?;
        if shells.is_empty() {
            return Err(KernelOpError::OperationFailed("Boolean subtraction left nothing".into()));
        }
        closed_solid(shells).map(TruckSolid::plain)
    }

    fn intersect(&self, a: &Self::Solid, b: &Self::Solid) -> KernelResult<Self::Solid> {
        let shells = self.per_shell(&a.solid, &b.solid, false, |piece, tool| {
            truck_shapeops::and(piece, tool, self.boolean_tolerance)
        })?;
        if shells.is_empty() {
            return Err(KernelOpError::OperationFailed("Boolean intersection is empty".into()));
        }
        closed_solid(shells).map(TruckSolid::plain)
    }

    // === Topology ===

    fn edges(&self, solid: &Self::Solid) -> KernelResult<Vec<EdgeInfo>> {
        let edges = unique_edges(&solid.solid);
        let mut infos = Vec::with_capacity(edges.len());
        for (i, edge) in edges.iter().enumerate() {
            let samples = edge_samples(edge);
            let bounds = Aabb::from_points(samples.iter().copied())
                .ok_or_else(|| KernelOpError::InvalidGeometry(format!("Edge {} has no points", i)))?;
            infos.push(EdgeInfo { id: EdgeId(i), kind: curve_kind(&samples), bounds });
        }
        Ok(infos)
    }

    fn faces(&self, solid: &Self::Solid) -> KernelResult<Vec<FaceInfo>> {
        solid
            .solid
            .face_iter()
            .enumerate()
            .map(|(i, face)| {
                let bounds = Aabb::from_points(face_samples(face))
                    .ok_or_else(|| KernelOpError::InvalidGeometry(format!("Face {} has no boundary", i)))?;
                Ok(FaceInfo { id: FaceId(i), kind: surface_kind(face), bounds })
            })
            .collect()
    }

    fn fillet(&self, solid: &Self::Solid, edges: &[EdgeId], radius: f64) -> KernelResult<Self::Solid> {
        if edges.is_empty() {
            return Err(KernelOpError::EmptySelection("edges"));
        }
        if !(radius > 0.0) {
            return Err(KernelOpError::InvalidGeometry(format!("Fillet radius must be positive, got {}", radius)));
        }
        let Some(Origin::Sweep { path, section }) = &solid.origin else {
            return Err(KernelOpError::Unsupported { kernel: self.name(), operation: "fillet of anything but a sweep" });
        };

        let mut selected = edges.to_vec();
        selected.sort_by_key(|id| id.0);
        selected.dedup();

        let all = unique_edges(&solid.solid);
        let rings = section.rings();
        let mut corners: Vec<(Point2, usize)> = Vec::new();
        for id in &selected {
            let edge = all
                .get(id.0)
                .ok_or_else(|| KernelOpError::InvalidGeometry(format!("Unknown edge {:?}", id)))?;
            let corner = Self::section_vertex(path, &rings, edge).ok_or(KernelOpError::Unsupported {
                kernel: self.name(),
                operation: "fillet of an edge across the sweep",
            })?;
            match corners.iter_mut().find(|(c, _)| (c - corner).norm() < EPSILON) {
                Some((_, count)) => *count += 1,
                None => corners.push((corner, 1)),
            }
        }
        // a corner is only rounded all the way round the path
        if corners.iter().any(|(_, count)| *count != path.segments.len()) {
            return Err(KernelOpError::Unsupported { kernel: self.name(), operation: "fillet of part of an edge loop" });
        }

        let points: Vec<Point2> = corners.iter().map(|(c, _)| *c).collect();
        let rounded = section
            .rounded(&points, radius, MeshOptions::EXPORT.tolerance)
            .ok_or_else(|| KernelOpError::InvalidGeometry(format!("Fillet radius {} does not fit", radius)))?;
        debug!(corners = points.len(), radius, "rounding swept corners");
        self.sweep(path, &rounded)
    }

    fn shell(&self, solid: &Self::Solid, thickness: f64, open_faces: &[FaceId]) -> KernelResult<Self::Solid> {
        if !(thickness > 0.0) {
            return Err(KernelOpError::InvalidGeometry(format!(
                "Shell thickness must be positive, got {}",
                thickness
            )));
        }
        let Some(Origin::Extrusion { profile, plane, distance }) = &solid.origin else {
            return Err(KernelOpError::Unsupported { kernel: self.name(), operation: "shell of anything but an extrusion" });
        };

        let (open_bottom, open_top) = self.open_caps(&solid.solid, plane, *distance, open_faces)?;
        let closed = [open_bottom, open_top].iter().filter(|open| !**open).count();
        if thickness * closed as f64 >= *distance {
            return Err(KernelOpError::InvalidGeometry(format!(
                "Shell thickness {} leaves no cavity in height {}",
                thickness, distance
            )));
        }
        let inner = profile.offset(-thickness).ok_or_else(|| {
            KernelOpError::InvalidGeometry(format!("Shell thickness {} does not fit inside the profile", thickness))
        })?;

        // open caps are cut through with a margin of one wall
        let h0 = if open_bottom { -thickness } else { thickness };
        let h1 = if open_top { distance + thickness } else { distance - thickness };
        let cavity = self.extrude(&inner, &plane.offset(h0), h1 - h0)?;
        debug!(thickness, open_bottom, open_top, "shelling extrusion");
        self.cut(&TruckSolid::plain(solid.solid.clone()), &cavity)
    }

    // === Measurement and output ===

    fn bounding_box(&self, solid: &Self::Solid) -> KernelResult<Aabb> {
        let mesh = self.mesh(solid, &MeshOptions::EXPORT.with_tolerance(self.measure_tolerance))?;
        mesh.bounding_box()
            .ok_or_else(|| KernelOpError::InvalidGeometry("Solid has no surface".into()))
    }

    fn mesh(&self, solid: &Self::Solid, options: &MeshOptions) -> KernelResult<MeshBuffer> {
        if !(options.tolerance > 0.0) {
            return Err(KernelOpError::TessellationFailed(format!(
                "Tolerance must be positive, got {}",
                options.tolerance
            )));
        }
        let mesh = self.triangulate(&solid.solid, options.tolerance)?;
        debug!(triangles = mesh.triangle_count(), tolerance = options.tolerance, "tessellated solid");
        Ok(mesh)
    }
}
