//! Reference kernel that keeps the CSG tree instead of a boundary representation.
//!
//! Solids answer point-membership queries exactly for extrusions, sweeps and
//! their booleans, which is enough to check recipe geometry without a B-rep
//! library. Filleting whole edge loops of a sweep rounds its section; any
//! other fillet is recorded but does not change membership. There is no
//! tessellator, so `mesh` is unsupported.

use super::types::*;
use super::{Kernel, KernelOpError, KernelResult};
use crate::geometry::{Aabb, MeshBuffer, Point2, Point3, Vector2, Vector3, EPSILON};
use crate::sketch::{Profile, Section, Segment, Taper};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeKernel;

impl ProbeKernel {
    pub fn new() -> Self {
        Self
    }
}

/// Shared, immutable CSG node.
#[derive(Debug, Clone)]
pub struct ProbeSolid(Arc<Node>);

#[derive(Debug)]
pub enum Node {
    Extrusion { profile: Profile, plane: Plane, distance: f64 },
    Sweep { path: Profile, section: Section },
    CappedSweep { path: Profile, taper: Taper },
    Translated { base: ProbeSolid, offset: Vector3 },
    Union(ProbeSolid, ProbeSolid),
    Difference(ProbeSolid, ProbeSolid),
    Intersection(ProbeSolid, ProbeSolid),
    Shell { base: ProbeSolid, thickness: f64, open_bottom: bool, open_top: bool },
    Filleted { base: ProbeSolid, edges: Vec<EdgeId>, radius: f64 },
}

type RawEdge = (CurveKind, Aabb);
type RawFace = (SurfaceKind, Aabb);

fn curve_kind(segment: &Segment) -> CurveKind {
    match segment {
        Segment::Line { .. } => CurveKind::Line,
        Segment::Arc { .. } => CurveKind::Circle,
    }
}

/// Box around a 2D extent placed on `plane` between heights `h0` and `h1`.
fn placed_bounds(plane: &Plane, min: &Point2, max: &Point2, h0: f64, h1: f64) -> Aabb {
    let corners = [
        Point2::new(min.x, min.y),
        Point2::new(max.x, min.y),
        Point2::new(max.x, max.y),
        Point2::new(min.x, max.y),
    ];
    let points = corners.iter().flat_map(|c| {
        let base = plane.to_world(c);
        [base + plane.normal * h0, base + plane.normal * h1]
    });
    // eight corners, never empty
    Aabb::from_points(points).unwrap_or_else(|| Aabb::new(plane.origin, plane.origin))
}

fn flat_bounds(segment: &Segment, z: f64) -> Aabb {
    let (min, max) = segment.bounds();
    Aabb::new(Point3::new(min.x, min.y, z), Point3::new(max.x, max.y, z))
}

/// Entities of both operands of an intersection that lie inside its box.
fn overlapping<K>(a: Vec<(K, Aabb)>, b: Vec<(K, Aabb)>, within: Option<Aabb>) -> Vec<(K, Aabb)> {
    let Some(within) = within.map(|w| w.expanded(EPSILON)) else { return Vec::new() };
    a.into_iter().chain(b).filter(|(_, bounds)| within.contains_aabb(bounds)).collect()
}

/// Edges swept by every section vertex along every path segment, each
/// tagged with the vertex that produced it.
fn sweep_edges(path: &Profile, section: &Section) -> Vec<(Point2, RawEdge)> {
    section
        .rings()
        .into_iter()
        .flatten()
        .flat_map(|q| {
            path.segments.iter().filter_map(move |s| {
                s.offset(q.x).map(|o| (q, (curve_kind(s), flat_bounds(&o, q.y))))
            })
        })
        .collect()
}

/// Section vertices whose swept edges are all in `selected`, or `None` when
/// the selection covers only part of some vertex's edges.
fn whole_rings(edges: &[(Point2, RawEdge)], selected: &[EdgeId]) -> Option<Vec<Point2>> {
    let mut corners: Vec<Point2> = Vec::new();
    for id in selected {
        let q = edges.get(id.0)?.0;
        if !corners.contains(&q) {
            corners.push(q);
        }
    }
    let complete = edges
        .iter()
        .enumerate()
        .all(|(i, (q, _))| !corners.contains(q) || selected.contains(&EdgeId(i)));
    complete.then_some(corners)
}

impl ProbeSolid {
    fn new(node: Node) -> Self {
        Self(Arc::new(node))
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    /// Point membership. Points on a boundary may fall either way.
    pub fn contains(&self, p: &Point3) -> bool {
        match self.node() {
            Node::Extrusion { profile, plane, distance } => {
                let (uv, h) = plane.to_local(p);
                h >= 0.0 && h <= *distance && profile.contains(&uv)
            }
            Node::Sweep { path, section } => {
                let u = path.signed_distance(&Point2::new(p.x, p.y));
                section.contains(u, p.z)
            }
            Node::CappedSweep { path, taper } => match taper.u_at(p.z) {
                Some(limit) => path.signed_distance(&Point2::new(p.x, p.y)) <= limit,
                None => false,
            },
            Node::Translated { base, offset } => base.contains(&(*p - *offset)),
            Node::Union(a, b) => a.contains(p) || b.contains(p),
            Node::Difference(a, b) => a.contains(p) && !b.contains(p),
            Node::Intersection(a, b) => a.contains(p) && b.contains(p),
            Node::Shell { base, thickness, open_bottom, open_top } => {
                if !base.contains(p) {
                    return false;
                }
                let Node::Extrusion { profile, plane, distance } = base.node() else {
                    return true;
                };
                let (uv, h) = plane.to_local(p);
                let floor = if *open_bottom { f64::NEG_INFINITY } else { *thickness };
                let ceiling = if *open_top { f64::INFINITY } else { distance - thickness };
                let in_cavity =
                    profile.signed_distance(&uv) < -thickness && h > floor && h < ceiling;
                !in_cavity
            }
            Node::Filleted { base, .. } => base.contains(p),
        }
    }

    /// Analytic box; differences keep the minuend's box, so it may be loose.
    pub fn bounds(&self) -> Option<Aabb> {
        match self.node() {
            Node::Extrusion { profile, plane, distance } => {
                let (min, max) = profile.bounds()?;
                Some(placed_bounds(plane, &min, &max, 0.0, *distance))
            }
            Node::Sweep { path, section } => {
                let (smin, smax) = section.bounds()?;
                let (min, max) = path.bounds()?;
                Some(Aabb::new(
                    Point3::new(min.x - smax.x, min.y - smax.x, smin.y),
                    Point3::new(max.x + smax.x, max.y + smax.x, smax.y),
                ))
            }
            Node::CappedSweep { path, taper } => {
                let (v0, v1) = taper.v_range()?;
                let grow = taper.max_u()?;
                let (min, max) = path.bounds()?;
                Some(Aabb::new(
                    Point3::new(min.x - grow, min.y - grow, v0),
                    Point3::new(max.x + grow, max.y + grow, v1),
                ))
            }
            Node::Translated { base, offset } => base.bounds().map(|b| b.translated(offset)),
            Node::Union(a, b) => match (a.bounds(), b.bounds()) {
                (Some(x), Some(y)) => Some(x.union(&y)),
                (x, y) => x.or(y),
            },
            Node::Difference(a, _) => a.bounds(),
            Node::Intersection(a, b) => a.bounds()?.intersection(&b.bounds()?),
            Node::Shell { base, .. } | Node::Filleted { base, .. } => base.bounds(),
        }
    }

    fn raw_edges(&self) -> Vec<RawEdge> {
        match self.node() {
            Node::Extrusion { profile, plane, distance } => {
                let mut edges = Vec::with_capacity(profile.segments.len() * 3);
                for segment in &profile.segments {
                    let (min, max) = segment.bounds();
                    let kind = curve_kind(segment);
                    edges.push((kind, placed_bounds(plane, &min, &max, 0.0, 0.0)));
                    edges.push((kind, placed_bounds(plane, &min, &max, *distance, *distance)));
                    let s = segment.start();
                    edges.push((CurveKind::Line, placed_bounds(plane, &s, &s, 0.0, *distance)));
                }
                edges
            }
            Node::Sweep { path, section } => sweep_edges(path, section).into_iter().map(|(_, e)| e).collect(),
            Node::CappedSweep { path, taper } => taper
                .points()
                .iter()
                .flat_map(|q| {
                    path.segments.iter().filter_map(move |s| {
                        s.offset(q.x).map(|o| (curve_kind(s), flat_bounds(&o, q.y)))
                    })
                })
                .collect(),
            Node::Translated { base, offset } => base
                .raw_edges()
                .into_iter()
                .map(|(k, b)| (k, b.translated(offset)))
                .collect(),
            Node::Union(a, b) => {
                let mut edges = a.raw_edges();
                edges.extend(b.raw_edges());
                edges
            }
            // only the minuend is enumerated; faces the tool opens are not reported
            Node::Difference(a, _) => a.raw_edges(),
            Node::Intersection(a, b) => overlapping(a.raw_edges(), b.raw_edges(), self.bounds()),
            Node::Shell { base, thickness, open_bottom, open_top } => {
                let mut edges = base.raw_edges();
                if let Node::Extrusion { profile, plane, distance } = base.node() {
                    let h0 = if *open_bottom { 0.0 } else { *thickness };
                    let h1 = if *open_top { *distance } else { distance - thickness };
                    for segment in profile.segments.iter().filter_map(|s| s.offset(-thickness)) {
                        let (min, max) = segment.bounds();
                        let kind = curve_kind(&segment);
                        edges.push((kind, placed_bounds(plane, &min, &max, h0, h0)));
                        edges.push((kind, placed_bounds(plane, &min, &max, h1, h1)));
                    }
                }
                edges
            }
            Node::Filleted { base, .. } => base.raw_edges(),
        }
    }

    fn raw_faces(&self) -> Vec<RawFace> {
        match self.node() {
            Node::Extrusion { profile, plane, distance } => {
                let mut faces = Vec::with_capacity(profile.segments.len() + 2);
                if let Some((min, max)) = profile.bounds() {
                    faces.push((
                        SurfaceKind::Plane { normal: -plane.normal },
                        placed_bounds(plane, &min, &max, 0.0, 0.0),
                    ));
                    faces.push((
                        SurfaceKind::Plane { normal: plane.normal },
                        placed_bounds(plane, &min, &max, *distance, *distance),
                    ));
                }
                for segment in &profile.segments {
                    let (min, max) = segment.bounds();
                    let kind = match segment {
                        Segment::Line { start, end } => {
                            let d = (end - start).try_normalize(EPSILON).unwrap_or_else(Vector2::x);
                            SurfaceKind::Plane { normal: plane.x_dir * d.y - plane.y_dir * d.x }
                        }
                        Segment::Arc { .. } => SurfaceKind::Cylinder,
                    };
                    faces.push((kind, placed_bounds(plane, &min, &max, 0.0, *distance)));
                }
                faces
            }
            Node::Sweep { path, section } => {
                let mut faces = Vec::new();
                for ring in section.rings() {
                    let n = ring.len();
                    for i in 0..n {
                        let (a, b) = (ring[i], ring[(i + 1) % n]);
                        faces.extend(swept_faces(path, &a, &b, |u, v| section.contains(u, v)));
                    }
                }
                faces
            }
            Node::CappedSweep { path, taper } => {
                let mut faces = Vec::new();
                let pts = taper.points();
                if let (Some(first), Some(last)) = (pts.first(), pts.last()) {
                    for (q, up) in [(first, first.y > last.y), (last, last.y > first.y)] {
                        let cap = path
                            .segments
                            .iter()
                            .filter_map(|s| s.offset(q.x))
                            .map(|o| flat_bounds(&o, q.y))
                            .reduce(|x, y| x.union(&y));
                        if let Some(bounds) = cap {
                            let normal = if up { Vector3::z() } else { -Vector3::z() };
                            faces.push((SurfaceKind::Plane { normal }, bounds));
                        }
                    }
                }
                for w in pts.windows(2) {
                    faces.extend(swept_faces(path, &w[0], &w[1], |u, v| {
                        taper.u_at(v).map_or(false, |limit| u < limit)
                    }));
                }
                faces
            }
            Node::Translated { base, offset } => base
                .raw_faces()
                .into_iter()
                .map(|(k, b)| (k, b.translated(offset)))
                .collect(),
            Node::Union(a, b) => {
                let mut faces = a.raw_faces();
                faces.extend(b.raw_faces());
                faces
            }
            Node::Difference(a, _) => a.raw_faces(),
            Node::Intersection(a, b) => overlapping(a.raw_faces(), b.raw_faces(), self.bounds()),
            Node::Shell { base, open_bottom, open_top, .. } => base
                .raw_faces()
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !((*i == 0 && *open_bottom) || (*i == 1 && *open_top)))
                .map(|(_, f)| f)
                .collect(),
            Node::Filleted { base, .. } => base.raw_faces(),
        }
    }

    /// Area of the horizontal slice at height `z`, sampled on a grid of
    /// spacing `step`.
    pub fn section_area(&self, z: f64, step: f64) -> f64 {
        let Some(bb) = self.bounds() else { return 0.0 };
        let nx = (bb.size().x / step).ceil() as usize;
        let ny = (bb.size().y / step).ceil() as usize;
        let mut hits = 0usize;
        for i in 0..nx {
            for j in 0..ny {
                let p = Point3::new(
                    bb.min.x + (i as f64 + 0.5) * step,
                    bb.min.y + (j as f64 + 0.5) * step,
                    z,
                );
                if self.contains(&p) {
                    hits += 1;
                }
            }
        }
        hits as f64 * step * step
    }

    /// Volume sampled on a 3D grid of spacing `step`.
    pub fn sample_volume(&self, step: f64) -> f64 {
        let Some(bb) = self.bounds() else { return 0.0 };
        let nz = (bb.size().z / step).ceil() as usize;
        (0..nz)
            .map(|k| self.section_area(bb.min.z + (k as f64 + 0.5) * step, step) * step)
            .sum()
    }
}

/// Faces swept by the section edge `a → b` along every path segment.
fn swept_faces(
    path: &Profile,
    a: &Point2,
    b: &Point2,
    inside: impl Fn(f64, f64) -> bool,
) -> Vec<RawFace> {
    let (du, dv) = (b.x - a.x, b.y - a.y);
    path.segments
        .iter()
        .filter_map(|s| {
            let oa = s.offset(a.x)?;
            let ob = s.offset(b.x)?;
            let bounds = flat_bounds(&oa, a.y).union(&flat_bounds(&ob, b.y));
            let kind = if dv.abs() < EPSILON {
                // material below the edge means the face looks up
                let mid_u = (a.x + b.x) * 0.5;
                let up = inside(mid_u, a.y - 1e-3);
                SurfaceKind::Plane { normal: if up { Vector3::z() } else { -Vector3::z() } }
            } else if du.abs() < EPSILON {
                match s {
                    Segment::Line { start, end } => {
                        let d = (end - start).try_normalize(EPSILON).unwrap_or_else(Vector2::x);
                        let outward = Vector3::new(d.y, -d.x, 0.0);
                        let out = inside(a.x - 1e-3, (a.y + b.y) * 0.5);
                        SurfaceKind::Plane { normal: if out { outward } else { -outward } }
                    }
                    Segment::Arc { .. } => SurfaceKind::Cylinder,
                }
            } else {
                SurfaceKind::Other
            };
            Some((kind, bounds))
        })
        .collect()
}

impl Kernel for ProbeKernel {
    type Solid = ProbeSolid;

    fn name(&self) -> &'static str {
        "probe"
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
        Ok(ProbeSolid::new(Node::Extrusion {
            profile: profile.clone().ensure_ccw(),
            plane: *plane,
            distance,
        }))
    }

    fn sweep(&self, path: &Profile, section: &Section) -> KernelResult<Self::Solid> {
        if !path.is_closed() {
            return Err(KernelOpError::InvalidGeometry("Sweep path is not closed".into()));
        }
        if section.is_empty() {
            return Err(KernelOpError::InvalidGeometry("Sweep section is empty".into()));
        }
        Ok(ProbeSolid::new(Node::Sweep { path: path.clone().ensure_ccw(), section: section.clone() }))
    }

    fn sweep_capped(&self, path: &Profile, taper: &Taper) -> KernelResult<Self::Solid> {
        if !path.is_closed() {
            return Err(KernelOpError::InvalidGeometry("Sweep path is not closed".into()));
        }
        if !taper.is_monotone() {
            return Err(KernelOpError::InvalidGeometry("Taper must be strictly monotone in height".into()));
        }
        Ok(ProbeSolid::new(Node::CappedSweep { path: path.clone().ensure_ccw(), taper: taper.clone() }))
    }

    fn translate(&self, solid: &Self::Solid, offset: Vector3) -> KernelResult<Self::Solid> {
        Ok(ProbeSolid::new(Node::Translated { base: solid.clone(), offset }))
    }

    fn fuse(&self, a: &Self::Solid, b: &Self::Solid, _options: FuseOptions) -> KernelResult<Self::Solid> {
        Ok(ProbeSolid::new(Node::Union(a.clone(), b.clone())))
    }

    fn cut(&self, a: &Self::Solid, b: &Self::Solid) -> KernelResult<Self::Solid> {
        Ok(ProbeSolid::new(Node::Difference(a.clone(), b.clone())))
    }

    fn intersect(&self, a: &Self::Solid, b: &Self::Solid) -> KernelResult<Self::Solid> {
        Ok(ProbeSolid::new(Node::Intersection(a.clone(), b.clone())))
    }

    fn edges(&self, solid: &Self::Solid) -> KernelResult<Vec<EdgeInfo>> {
        Ok(solid
            .raw_edges()
            .into_iter()
            .enumerate()
            .map(|(i, (kind, bounds))| EdgeInfo { id: EdgeId(i), kind, bounds })
            .collect())
    }

    fn faces(&self, solid: &Self::Solid) -> KernelResult<Vec<FaceInfo>> {
        Ok(solid
            .raw_faces()
            .into_iter()
            .enumerate()
            .map(|(i, (kind, bounds))| FaceInfo { id: FaceId(i), kind, bounds })
            .collect())
    }

    fn fillet(&self, solid: &Self::Solid, edges: &[EdgeId], radius: f64) -> KernelResult<Self::Solid> {
        if edges.is_empty() {
            return Err(KernelOpError::EmptySelection("edges"));
        }
        if !(radius > 0.0) {
            return Err(KernelOpError::InvalidGeometry(format!("Fillet radius must be positive, got {}", radius)));
        }
        let count = solid.raw_edges().len();
        if let Some(bad) = edges.iter().find(|e| e.0 >= count) {
            return Err(KernelOpError::InvalidGeometry(format!("Unknown edge {:?}", bad)));
        }
        if let Node::Sweep { path, section } = solid.node() {
            if let Some(corners) = whole_rings(&sweep_edges(path, section), edges) {
                let rounded = section
                    .rounded(&corners, radius, MeshOptions::EXPORT.tolerance)
                    .ok_or_else(|| KernelOpError::InvalidGeometry(format!("Fillet radius {} does not fit", radius)))?;
                return Ok(ProbeSolid::new(Node::Sweep { path: path.clone(), section: rounded }));
            }
        }
        Ok(ProbeSolid::new(Node::Filleted { base: solid.clone(), edges: edges.to_vec(), radius }))
    }

    fn shell(&self, solid: &Self::Solid, thickness: f64, open_faces: &[FaceId]) -> KernelResult<Self::Solid> {
        if !(thickness > 0.0) {
            return Err(KernelOpError::InvalidGeometry(format!("Shell thickness must be positive, got {}", thickness)));
        }
        let Node::Extrusion { distance, .. } = solid.node() else {
            return Err(KernelOpError::Unsupported { kernel: self.name(), operation: "shell of a non-extruded solid" });
        };
        if open_faces.iter().any(|f| f.0 > 1) {
            return Err(KernelOpError::Unsupported { kernel: self.name(), operation: "shell with open side faces" });
        }
        let open_bottom = open_faces.contains(&FaceId(0));
        let open_top = open_faces.contains(&FaceId(1));
        let closed_caps = 2 - open_bottom as usize - open_top as usize;
        if thickness * closed_caps as f64 >= *distance {
            return Err(KernelOpError::InvalidGeometry(format!(
                "Shell thickness {} leaves no cavity in height {}",
                thickness, distance
            )));
        }
        Ok(ProbeSolid::new(Node::Shell { base: solid.clone(), thickness, open_bottom, open_top }))
    }

    fn bounding_box(&self, solid: &Self::Solid) -> KernelResult<Aabb> {
        solid.bounds().ok_or_else(|| KernelOpError::InvalidGeometry("Solid is empty".into()))
    }

    fn mesh(&self, _solid: &Self::Solid, _options: &MeshOptions) -> KernelResult<MeshBuffer> {
        Err(KernelOpError::Unsupported { kernel: self.name(), operation: "tessellation" })
    }
}
