//! 偏移

use super::Outcome;
use crate::element::DrawingElement;
use crate::geometry::{Arc, Circle, Geometry, Line, Polyline};
use crate::math::{distance, line_intersection, perpendicular, Point2, EPSILON};

/// 生成偏移副本，ID 为 `{id}-o`
///
/// 正距离：线段和多段线偏向行进方向左侧，圆和圆弧向外。
/// 多段线拐角按斜接处理，相邻段平行时退回各自的法向偏移。
/// 零长度线段、偏移后半径不为正、或不支持的类型原样返回。
pub fn offset_element(element: &DrawingElement, distance: f64) -> Outcome<DrawingElement> {
    let geometry = match &element.geometry {
        Geometry::Line(line) => offset_line(line, distance).map(Geometry::Line),
        Geometry::Polyline(polyline) => offset_polyline(polyline, distance).map(Geometry::Polyline),
        Geometry::Circle(circle) => {
            scaled_radius(circle.center, circle.rim, distance)
                .map(|rim| Geometry::Circle(Circle::new(circle.center, rim)))
        }
        Geometry::Arc(arc) => {
            let start = scaled_radius(arc.center, arc.start, distance);
            let end = scaled_radius(arc.center, arc.end, distance);
            start
                .zip(end)
                .map(|(start, end)| Geometry::Arc(Arc::new(arc.center, start, end)))
        }
        _ => None,
    };

    match geometry {
        Some(geometry) => Outcome::Applied(element.copy_as(element.id.derived("o"), geometry)),
        None => Outcome::Unchanged(element.clone()),
    }
}

fn offset_line(line: &Line, offset: f64) -> Option<Line> {
    let length = line.length();
    if length < EPSILON {
        return None;
    }
    let normal = perpendicular(&((line.end - line.start) / length)) * offset;
    Some(Line::new(line.start + normal, line.end + normal))
}

fn offset_polyline(polyline: &Polyline, offset: f64) -> Option<Polyline> {
    if polyline.points.len() < 2 {
        return None;
    }
    let segments = polyline
        .segments()
        .iter()
        .map(|segment| offset_line(segment, offset))
        .collect::<Option<Vec<_>>>()?;

    let n = polyline.points.len();
    let join = |before: &Line, after: &Line| {
        line_intersection(&before.start, &before.end, &after.start, &after.end)
            .unwrap_or(after.start)
    };

    let points = if polyline.closed {
        (0..n)
            .map(|i| join(&segments[(i + n - 1) % n], &segments[i]))
            .collect()
    } else {
        let mut points = Vec::with_capacity(n);
        points.push(segments[0].start);
        points.extend(segments.windows(2).map(|pair| join(&pair[0], &pair[1])));
        points.push(segments[segments.len() - 1].end);
        points
    };
    Some(Polyline::new(points, polyline.closed))
}

/// 把 `point` 沿圆心方向移动，使半径增加 `offset`
fn scaled_radius(center: Point2, point: Point2, offset: f64) -> Option<Point2> {
    let radius = distance(&center, &point);
    let new_radius = radius + offset;
    if radius < EPSILON || new_radius <= EPSILON {
        return None;
    }
    Some(center + (point - center) * (new_radius / radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Text;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_offset_line_to_the_left() {
        let element = DrawingElement::new(
            "l",
            Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))),
        );
        let result = offset_element(&element, 2.0);
        assert!(result.is_applied());

        let copy = result.into_inner();
        assert_eq!(copy.id.as_str(), "l-o");
        let line = copy.as_line().unwrap();
        assert_abs_diff_eq!(line.start, Point2::new(0.0, 2.0), epsilon = 1e-12);
        assert_abs_diff_eq!(line.end, Point2::new(10.0, 2.0), epsilon = 1e-12);

        let right = offset_element(&element, -2.0).into_inner();
        assert_abs_diff_eq!(right.as_line().unwrap().start, Point2::new(0.0, -2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_offset_polyline_miter() {
        let element = DrawingElement::new(
            "p",
            Geometry::Polyline(Polyline::new(
                vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(10.0, 0.0),
                    Point2::new(10.0, 10.0),
                ],
                false,
            )),
        );
        let copy = offset_element(&element, 1.0).into_inner();
        let Geometry::Polyline(polyline) = &copy.geometry else {
            panic!("expected polyline");
        };
        assert_eq!(polyline.points.len(), 3);
        assert_abs_diff_eq!(polyline.points[0], Point2::new(0.0, 1.0), epsilon = 1e-9);
        assert_abs_diff_eq!(polyline.points[1], Point2::new(9.0, 1.0), epsilon = 1e-9);
        assert_abs_diff_eq!(polyline.points[2], Point2::new(9.0, 10.0), epsilon = 1e-9);
    }

    #[test]
    fn test_offset_closed_square_shrinks() {
        let element = DrawingElement::new(
            "sq",
            Geometry::Polyline(Polyline::new(
                vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(10.0, 0.0),
                    Point2::new(10.0, 10.0),
                    Point2::new(0.0, 10.0),
                ],
                true,
            )),
        );
        // 逆时针方形的左侧是内侧
        let copy = offset_element(&element, 1.0).into_inner();
        assert_abs_diff_eq!(copy.bounding_box().min, Point2::new(1.0, 1.0), epsilon = 1e-9);
        assert_abs_diff_eq!(copy.bounding_box().max, Point2::new(9.0, 9.0), epsilon = 1e-9);
    }

    #[test]
    fn test_offset_circle_and_arc() {
        let circle = DrawingElement::new(
            "c",
            Geometry::Circle(Circle::from_radius(Point2::new(1.0, 1.0), 5.0)),
        );
        let grown = offset_element(&circle, 2.0).into_inner();
        let Geometry::Circle(c) = grown.geometry else {
            panic!("expected circle");
        };
        assert_abs_diff_eq!(c.radius(), 7.0, epsilon = 1e-12);

        assert!(!offset_element(&circle, -5.0).is_applied());

        let arc = DrawingElement::new(
            "a",
            Geometry::Arc(Arc::new(
                Point2::origin(),
                Point2::new(4.0, 0.0),
                Point2::new(0.0, 4.0),
            )),
        );
        let Geometry::Arc(a) = offset_element(&arc, -1.0).into_inner().geometry else {
            panic!("expected arc");
        };
        assert_abs_diff_eq!(a.radius(), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.end, Point2::new(0.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn test_offset_declines() {
        let zero = DrawingElement::new(
            "z",
            Geometry::Line(Line::new(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0))),
        );
        assert_eq!(offset_element(&zero, 1.0), Outcome::Unchanged(zero));

        let text = DrawingElement::new("t", Geometry::Text(Text::new(Point2::origin(), "A")));
        assert!(!offset_element(&text, 1.0).is_applied());
    }
}
