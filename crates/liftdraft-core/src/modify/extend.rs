//! 延伸到交点

use super::Outcome;
use crate::element::DrawingElement;
use crate::geometry::{Geometry, Line};
use crate::math::{line_intersection_with, point_to_segment_distance, INTERSECTION_EPSILON};

/// 把线段的第二个端点移到它与目标线段的交点
///
/// 只处理两条线段；平行、或交点离目标线段超过 `tolerance` 时原样返回。
pub fn extend_line_to_intersection(
    line: &DrawingElement,
    target: &DrawingElement,
    tolerance: f64,
) -> Outcome<DrawingElement> {
    extend_line_to_intersection_with(line, target, tolerance, INTERSECTION_EPSILON)
}

/// 同 [`extend_line_to_intersection`]，求交分母容差由调用方给出
pub fn extend_line_to_intersection_with(
    line: &DrawingElement,
    target: &DrawingElement,
    tolerance: f64,
    intersection_epsilon: f64,
) -> Outcome<DrawingElement> {
    let (Some(source), Some(boundary)) = (line.as_line(), target.as_line()) else {
        return Outcome::Unchanged(line.clone());
    };

    let Some(hit) = line_intersection_with(
        &source.start,
        &source.end,
        &boundary.start,
        &boundary.end,
        intersection_epsilon,
    ) else {
        return Outcome::Unchanged(line.clone());
    };

    if point_to_segment_distance(&hit, &boundary.start, &boundary.end) > tolerance {
        return Outcome::Unchanged(line.clone());
    }

    Outcome::Applied(line.with_geometry(Geometry::Line(Line::new(source.start, hit))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Circle;
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;

    fn line(id: &str, a: (f64, f64), b: (f64, f64)) -> DrawingElement {
        DrawingElement::new(
            id,
            Geometry::Line(Line::new(Point2::new(a.0, a.1), Point2::new(b.0, b.1))),
        )
    }

    #[test]
    fn test_extend_to_boundary() {
        let source = line("a", (0.0, 0.0), (5.0, 0.0));
        let boundary = line("b", (10.0, -5.0), (10.0, 5.0));

        let outcome = extend_line_to_intersection(&source, &boundary, 0.5);
        assert!(outcome.is_applied());
        let extended = outcome.into_inner();
        assert_eq!(extended.id.as_str(), "a");
        let l = extended.as_line().unwrap();
        assert_eq!(l.start, Point2::new(0.0, 0.0));
        assert_abs_diff_eq!(l.end, Point2::new(10.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_parallel_is_noop() {
        let source = line("a", (0.0, 0.0), (5.0, 0.0));
        let boundary = line("b", (0.0, 3.0), (5.0, 3.0));
        let outcome = extend_line_to_intersection(&source, &boundary, 0.5);
        assert_eq!(outcome, Outcome::Unchanged(source));
    }

    #[test]
    fn test_intersection_off_boundary_is_noop() {
        let source = line("a", (0.0, 0.0), (5.0, 0.0));
        let boundary = line("b", (10.0, 2.0), (10.0, 5.0));
        let outcome = extend_line_to_intersection(&source, &boundary, 0.5);
        assert!(!outcome.is_applied());

        // 放宽容差后生效
        assert!(extend_line_to_intersection(&source, &boundary, 2.5).is_applied());
    }

    #[test]
    fn test_non_line_is_noop() {
        let source = line("a", (0.0, 0.0), (5.0, 0.0));
        let circle = DrawingElement::new(
            "c",
            Geometry::Circle(Circle::from_radius(Point2::new(10.0, 0.0), 2.0)),
        );
        assert!(!extend_line_to_intersection(&source, &circle, 10.0).is_applied());
        assert!(!extend_line_to_intersection(&circle, &source, 10.0).is_applied());
    }
}
