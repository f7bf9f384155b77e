// SVG outlines mapped onto the em square as quadratic glyph paths

use anyhow::{Context, Result};
use kurbo::{BezPath, CubicBez, PathEl, Point};
use std::fs;
use std::path::Path;
use usvg::tiny_skia_path::{
    self as skia, LineCap, LineJoin, PathSegment, PathStroker, Stroke, StrokeDash,
};

/// Maximum distance, in font units, between a cubic and its quadratic stand-in.
const CUBIC_ACCURACY: f64 = 0.5;

/// Maps SVG user space onto font units: the SVG height spans the em,
/// y grows upward and the baseline sits `descent` units above the bottom.
#[derive(Clone, Copy, Debug)]
pub struct EmMapping {
    scale: f64,
    ascent: f64,
}

impl EmMapping {
    pub fn new(svg_height: f32, units_per_em: u16, ascent: i16) -> Self {
        let scale = if svg_height > 0.0 {
            units_per_em as f64 / svg_height as f64
        } else {
            1.0
        };
        Self {
            scale,
            ascent: ascent as f64,
        }
    }

    fn map(&self, p: skia::Point) -> Point {
        Point::new(p.x as f64 * self.scale, self.ascent - p.y as f64 * self.scale)
    }
}

pub fn import_outlines(svg_path: &Path, units_per_em: u16, ascent: i16) -> Result<BezPath> {
    let data = fs::read(svg_path)
        .with_context(|| format!("Failed to read {}", svg_path.display()))?;
    let tree = usvg::Tree::from_data(&data, &usvg::Options::default())
        .with_context(|| format!("Failed to parse SVG {}", svg_path.display()))?;

    let mapping = EmMapping::new(tree.size().height(), units_per_em, ascent);
    Ok(tree_outline(&tree, &mapping))
}

pub fn tree_outline(tree: &usvg::Tree, mapping: &EmMapping) -> BezPath {
    let mut outline = BezPath::new();
    collect_group(tree.root(), mapping, &mut outline);
    outline
}

fn collect_group(group: &usvg::Group, mapping: &EmMapping, out: &mut BezPath) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => collect_group(g, mapping, out),
            usvg::Node::Path(p) => collect_path(p, mapping, out),
            // raster images and text have no outlines to import
            _ => {}
        }
    }
}

fn collect_path(path: &usvg::Path, mapping: &EmMapping, out: &mut BezPath) {
    if !path.is_visible() {
        return;
    }
    let ts = path.abs_transform();

    if path.fill().is_some() {
        if let Some(filled) = path.data().clone().transform(ts) {
            append_path(&filled, mapping, out);
        }
    }

    if let Some(stroke) = path.stroke() {
        let res_scale = PathStroker::compute_resolution_scale(&ts);
        let stroke = skia_stroke(stroke);
        // the stroker ignores `Stroke::dash`
        let source = match &stroke.dash {
            Some(dash) => path.data().dash(dash, res_scale),
            None => Some(path.data().clone()),
        };
        let stroked = source
            .and_then(|p| p.stroke(&stroke, res_scale))
            .and_then(|p| p.transform(ts));
        if let Some(stroked) = stroked {
            append_path(&stroked, mapping, out);
        }
    }
}

fn skia_stroke(stroke: &usvg::Stroke) -> Stroke {
    let line_cap = match stroke.linecap() {
        usvg::LineCap::Butt => LineCap::Butt,
        usvg::LineCap::Round => LineCap::Round,
        usvg::LineCap::Square => LineCap::Square,
    };
    let line_join = match stroke.linejoin() {
        usvg::LineJoin::Miter => LineJoin::Miter,
        usvg::LineJoin::MiterClip => LineJoin::MiterClip,
        usvg::LineJoin::Round => LineJoin::Round,
        usvg::LineJoin::Bevel => LineJoin::Bevel,
    };
    let dash = stroke
        .dasharray()
        .and_then(|arr| StrokeDash::new(arr.to_vec(), stroke.dashoffset()));

    Stroke {
        width: stroke.width().get(),
        miter_limit: stroke.miterlimit().get(),
        line_cap,
        line_join,
        dash,
    }
}

/// Appends `path` in font units as closed subpaths built from lines and quadratics.
pub fn append_path(path: &skia::Path, mapping: &EmMapping, out: &mut BezPath) {
    let mut contour = ContourBuilder::default();

    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                contour.finish(out);
                contour.start(mapping.map(p));
            }
            PathSegment::LineTo(p) => contour.line_to(mapping.map(p)),
            PathSegment::QuadTo(c, p) => contour.quad_to(mapping.map(c), mapping.map(p)),
            PathSegment::CubicTo(c1, c2, p) => {
                let cubic = CubicBez::new(
                    contour.last,
                    mapping.map(c1),
                    mapping.map(c2),
                    mapping.map(p),
                );
                for (_, _, quad) in cubic.to_quads(CUBIC_ACCURACY) {
                    contour.quad_to(quad.p1, quad.p2);
                }
            }
            PathSegment::Close => contour.finish(out),
        }
    }
    contour.finish(out);
}

#[derive(Default)]
struct ContourBuilder {
    start: Point,
    last: Point,
    elements: Vec<PathEl>,
    segments: usize,
}

impl ContourBuilder {
    fn start(&mut self, p: Point) {
        self.start = p;
        self.last = p;
        self.elements.push(PathEl::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        if p == self.last {
            return;
        }
        self.last = p;
        self.segments += 1;
        self.elements.push(PathEl::LineTo(p));
    }

    fn quad_to(&mut self, c: Point, p: Point) {
        self.last = p;
        self.segments += 1;
        self.elements.push(PathEl::QuadTo(c, p));
    }

    /// Closes the current subpath, dropping it when it cannot enclose any area.
    fn finish(&mut self, out: &mut BezPath) {
        let mut elements = std::mem::take(&mut self.elements);
        let segments = std::mem::take(&mut self.segments);

        // the closing line of an explicitly closed path repeats the start
        if elements.len() > 2 && elements.last() == Some(&PathEl::LineTo(self.start)) {
            elements.pop();
        }
        let has_curve = elements.iter().any(|el| matches!(el, PathEl::QuadTo(..)));
        if segments >= 2 && (elements.len() >= 3 || has_curve) {
            for el in elements {
                out.push(el);
            }
            out.close_path();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline_of(svg: &str) -> BezPath {
        let tree = usvg::Tree::from_str(svg, &usvg::Options::default()).unwrap();
        let mapping = EmMapping::new(tree.size().height(), 1000, 800);
        tree_outline(&tree, &mapping)
    }

    fn contour_count(path: &BezPath) -> usize {
        path.elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count()
    }

    /// On-curve points rounded to font units.
    fn end_points(path: &BezPath) -> Vec<(i32, i32)> {
        path.elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) | PathEl::QuadTo(_, p) => Some(*p),
                PathEl::CurveTo(_, _, p) => Some(*p),
                PathEl::ClosePath => None,
            })
            .map(|p| (p.x.round() as i32, p.y.round() as i32))
            .collect()
    }

    #[test]
    fn test_rect_maps_onto_em_square() {
        let outline = outline_of(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
                 <path d="M0 0 H24 V24 H0 Z" fill="black"/>
               </svg>"#,
        );
        assert_eq!(contour_count(&outline), 1);
        assert_eq!(
            end_points(&outline),
            vec![(0, 800), (1000, 800), (1000, -200), (0, -200)]
        );
        assert_eq!(outline.elements().last(), Some(&PathEl::ClosePath));
    }

    #[test]
    fn test_group_transform_is_applied() {
        let outline = outline_of(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                 <g transform="translate(50 0)">
                   <path d="M0 0 H10 V10 H0 Z" fill="black"/>
                 </g>
               </svg>"#,
        );
        let points = end_points(&outline);
        assert_eq!(contour_count(&outline), 1);
        assert_eq!(points[0], (500, 800));
        assert_eq!(points[2], (600, 700));
    }

    #[test]
    fn test_stroke_only_path_is_expanded() {
        let outline = outline_of(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
                 <path d="M4 12 H20" fill="none" stroke="black" stroke-width="2"/>
               </svg>"#,
        );
        assert!(contour_count(&outline) > 0);
        let ys: Vec<i32> = end_points(&outline).iter().map(|p| p.1).collect();
        // a 2px wide line at y=12 spans y=11..13 in SVG space
        assert!(ys.contains(&(800 - 458)));
        assert!(ys.contains(&(800 - 542)));
    }

    #[test]
    fn test_dashed_stroke_is_split_into_dashes() {
        let solid = outline_of(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
                 <path d="M2 12 H22" fill="none" stroke="black" stroke-width="2"/>
               </svg>"#,
        );
        let dashed = outline_of(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
                 <path d="M2 12 H22" fill="none" stroke="black" stroke-width="2" stroke-dasharray="2 2"/>
               </svg>"#,
        );
        assert_eq!(contour_count(&solid), 1);
        assert!(
            contour_count(&dashed) > contour_count(&solid),
            "dashed line produced {} contours",
            contour_count(&dashed)
        );
    }

    #[test]
    fn test_unpainted_path_is_ignored() {
        let outline = outline_of(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
                 <path d="M0 0 H24 V24 H0 Z" fill="none"/>
               </svg>"#,
        );
        assert!(outline.elements().is_empty());
    }

    #[test]
    fn test_curves_become_quadratic() {
        let outline = outline_of(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
                 <circle cx="12" cy="12" r="10" fill="black"/>
               </svg>"#,
        );
        assert_eq!(contour_count(&outline), 1);
        let elements = outline.elements();
        assert!(elements.iter().any(|el| matches!(el, PathEl::QuadTo(..))));
        assert!(!elements.iter().any(|el| matches!(el, PathEl::CurveTo(..))));
        for (x, y) in end_points(&outline) {
            // radius 10 of 24 is about 417 units around the centre (500, 300)
            assert!((x - 500).abs() <= 420, "({x}, {y})");
            assert!((y - 300).abs() <= 420, "({x}, {y})");
        }
    }

    #[test]
    fn test_degenerate_subpaths_are_dropped() {
        let mut path = skia::PathBuilder::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.close();
        let path = path.finish().unwrap();

        let mut out = BezPath::new();
        append_path(&path, &EmMapping::new(24.0, 1000, 800), &mut out);
        assert!(out.elements().is_empty());
    }
}
