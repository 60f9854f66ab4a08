//! 倒角

use super::{Corner, Outcome};
use crate::element::DrawingElement;
use crate::geometry::{Geometry, Line};
use crate::math::EPSILON;

/// 倒角结果：修剪后的两条线段与斜切线
#[derive(Debug, Clone, PartialEq)]
pub struct Chamfer {
    pub first: DrawingElement,
    pub second: DrawingElement,
    /// 两个距离都为零时没有斜切线
    pub line: Option<DrawingElement>,
}

/// 在两条线段的交角处倒角
///
/// 从交点沿第一条线量取 `first_distance`，沿第二条线量取 `second_distance`，
/// 两点之间连一条斜切线，ID 为 `{first}-chamfer`。
/// 拒绝条件与 [`fillet`](super::fillet) 相同。
pub fn chamfer(
    first: &DrawingElement,
    second: &DrawingElement,
    first_distance: f64,
    second_distance: f64,
) -> Outcome<Chamfer> {
    let unchanged = || {
        Outcome::Unchanged(Chamfer {
            first: first.clone(),
            second: second.clone(),
            line: None,
        })
    };

    let (Some(a), Some(b)) = (first.as_line(), second.as_line()) else {
        return unchanged();
    };
    if first_distance < 0.0 || second_distance < 0.0 {
        return unchanged();
    }
    let Some(corner) = Corner::between(a, b) else {
        return unchanged();
    };
    let [leg1, leg2] = corner.legs;
    if first_distance > leg1.reach + EPSILON || second_distance > leg2.reach + EPSILON {
        return unchanged();
    }

    let cut1 = leg1.point_at(corner.vertex, first_distance);
    let cut2 = leg2.point_at(corner.vertex, second_distance);
    let line = (first_distance > EPSILON || second_distance > EPSILON).then(|| {
        first.copy_as(
            first.id.derived("chamfer"),
            Geometry::Line(Line::new(cut1, cut2)),
        )
    });

    Outcome::Applied(Chamfer {
        first: first.with_geometry(Geometry::Line(leg1.trimmed_to(cut1))),
        second: second.with_geometry(Geometry::Line(leg2.trimmed_to(cut2))),
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::properties::{Color, Style};
    use approx::assert_abs_diff_eq;

    fn line(id: &str, a: (f64, f64), b: (f64, f64)) -> DrawingElement {
        DrawingElement::new(
            id,
            Geometry::Line(Line::new(Point2::new(a.0, a.1), Point2::new(b.0, b.1))),
        )
    }

    #[test]
    fn test_chamfer_unequal_distances() {
        let first = line("a", (0.0, 0.0), (10.0, 0.0)).with_style(Style::with_color(Color::BLUE));
        let second = line("b", (10.0, 0.0), (10.0, 10.0));

        let outcome = chamfer(&first, &second, 2.0, 3.0);
        assert!(outcome.is_applied());
        let result = outcome.into_inner();

        assert_abs_diff_eq!(result.first.as_line().unwrap().end, Point2::new(8.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(result.second.as_line().unwrap().start, Point2::new(10.0, 3.0), epsilon = 1e-9);

        let cut = result.line.unwrap();
        assert_eq!(cut.id.as_str(), "a-chamfer");
        assert_eq!(cut.style.stroke_color, Color::BLUE);
        let cut_line = cut.as_line().unwrap();
        assert_abs_diff_eq!(cut_line.start, Point2::new(8.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(cut_line.end, Point2::new(10.0, 3.0), epsilon = 1e-9);
    }

    #[test]
    fn test_chamfer_declines() {
        let first = line("a", (0.0, 0.0), (10.0, 0.0));
        let collinear = line("b", (12.0, 0.0), (20.0, 0.0));
        assert!(!chamfer(&first, &collinear, 1.0, 1.0).is_applied());

        let second = line("b", (10.0, 0.0), (10.0, 10.0));
        assert!(!chamfer(&first, &second, 11.0, 1.0).is_applied());
        assert!(!chamfer(&first, &second, 1.0, -1.0).is_applied());
        assert_eq!(chamfer(&first, &second, 11.0, 1.0).into_inner().first, first);
    }

    #[test]
    fn test_zero_chamfer_trims_to_corner() {
        let first = line("a", (0.0, 0.0), (8.0, 0.0));
        let second = line("b", (10.0, 10.0), (10.0, 1.0));
        let result = chamfer(&first, &second, 0.0, 0.0).into_inner();
        assert!(result.line.is_none());
        assert_abs_diff_eq!(result.first.as_line().unwrap().end, Point2::new(10.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(result.second.as_line().unwrap().end, Point2::new(10.0, 0.0), epsilon = 1e-9);
    }
}
