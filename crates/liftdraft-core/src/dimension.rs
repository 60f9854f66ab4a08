//! 标注引擎
//!
//! 由原始几何构造线性、角度和半径标注图元。测量值与文字不存储，
//! 标注点被修改后由 [`crate::geometry`] 中的方法重新计算。

use crate::element::{DrawingElement, ElementId};
use crate::geometry::{AngularDimension, Geometry, LinearDimension, RadialDimension};
use crate::math::{Point2, Vector2};
use crate::properties::Style;
use std::f64::consts::FRAC_PI_2;

/// 创建线性标注
///
/// 尺寸线由 `p1 -> p2` 方向逆时针旋转 90° 的法向偏移 `offset` 得到，
/// `offset` 为负时尺寸线位于另一侧。`p1 == p2` 得到长度为零的标注
/// （法向按 x 轴方向计算）。
pub fn create_linear_dimension(
    id: impl Into<ElementId>,
    p1: Point2,
    p2: Point2,
    offset: f64,
    style: Style,
) -> DrawingElement {
    let angle = (p2.y - p1.y).atan2(p2.x - p1.x);
    let normal_angle = angle + FRAC_PI_2;
    let shift = Vector2::new(normal_angle.cos(), normal_angle.sin()) * offset;

    let dimension = LinearDimension {
        p1,
        p2,
        witness1: p1 + shift,
        witness2: p2 + shift,
    };
    DrawingElement::new(id, Geometry::LinearDimension(dimension)).with_style(style)
}

/// 创建角度标注
///
/// 测量 `vertex -> p1` 与 `vertex -> p2` 之间的非优角，`radius` 为标注弧半径。
pub fn create_angular_dimension(
    id: impl Into<ElementId>,
    vertex: Point2,
    p1: Point2,
    p2: Point2,
    radius: f64,
    style: Style,
) -> DrawingElement {
    let dimension = AngularDimension {
        vertex,
        first: p1,
        second: p2,
        radius,
    };
    DrawingElement::new(id, Geometry::AngularDimension(dimension)).with_style(style)
}

/// 创建半径标注
pub fn create_radial_dimension(
    id: impl Into<ElementId>,
    center: Point2,
    point: Point2,
    style: Style,
) -> DrawingElement {
    DrawingElement::new(
        id,
        Geometry::RadialDimension(RadialDimension { center, point }),
    )
    .with_style(style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{distance, point_to_segment_distance};
    use approx::assert_abs_diff_eq;

    fn linear(element: &DrawingElement) -> LinearDimension {
        match &element.geometry {
            Geometry::LinearDimension(d) => *d,
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_linear_dimension_matches_distance() {
        let cases = [
            (Point2::new(0.0, 0.0), Point2::new(3.0, 4.0)),
            (Point2::new(-12.5, 7.0), Point2::new(40.0, -3.25)),
            (Point2::new(100.0, 100.0), Point2::new(100.0, 250.0)),
        ];
        for (p1, p2) in cases {
            let element = create_linear_dimension("d", p1, p2, 10.0, Style::default());
            assert_eq!(element.points().len(), 4);
            assert_eq!(
                element.geometry.label().unwrap(),
                format!("{:.2}", distance(&p1, &p2))
            );
        }
    }

    #[test]
    fn test_witness_points_are_offset_perpendicular() {
        let element = create_linear_dimension(
            "d",
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            5.0,
            Style::default(),
        );
        let dim = linear(&element);
        assert_abs_diff_eq!(dim.witness1, Point2::new(0.0, 5.0), epsilon = 1e-12);
        assert_abs_diff_eq!(dim.witness2, Point2::new(10.0, 5.0), epsilon = 1e-12);
        assert_eq!(element.geometry.label().as_deref(), Some("10.00"));

        // 负偏移位于另一侧
        let flipped = linear(&create_linear_dimension(
            "d",
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            -5.0,
            Style::default(),
        ));
        assert_abs_diff_eq!(flipped.witness1, Point2::new(0.0, -5.0), epsilon = 1e-12);
        assert!(point_to_segment_distance(&flipped.text_position(), &flipped.witness1, &flipped.witness2) < 1e-12);
    }

    #[test]
    fn test_zero_length_linear_dimension() {
        let p = Point2::new(3.0, 3.0);
        let element = create_linear_dimension("d", p, p, 4.0, Style::default());
        assert_eq!(element.points().len(), 4);
        assert_eq!(element.geometry.label().as_deref(), Some("0.00"));
        let dim = linear(&element);
        assert!(dim.witness1.x.is_finite() && dim.witness1.y.is_finite());
    }

    #[test]
    fn test_angular_dimension() {
        let element = create_angular_dimension(
            "a",
            Point2::origin(),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
            5.0,
            Style::default(),
        );
        assert_eq!(element.geometry.measurement(), Some(90.0));
        assert_eq!(element.geometry.label().as_deref(), Some("90.00°"));

        // 顺序无关
        let swapped = create_angular_dimension(
            "a",
            Point2::origin(),
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 0.0),
            5.0,
            Style::default(),
        );
        assert_eq!(swapped.geometry.measurement(), Some(90.0));
    }

    #[test]
    fn test_radial_dimension() {
        let element = create_radial_dimension(
            "r",
            Point2::new(1.0, 1.0),
            Point2::new(4.0, 5.0),
            Style::default(),
        );
        assert_eq!(element.geometry.label().as_deref(), Some("R5.00"));
    }

    #[test]
    fn test_label_follows_points() {
        let element = create_radial_dimension(
            "r",
            Point2::origin(),
            Point2::new(2.0, 0.0),
            Style::default(),
        );
        let moved = element.map_points(|p| if p.x > 0.0 { Point2::new(7.5, 0.0) } else { p });
        assert_eq!(moved.geometry.label().as_deref(), Some("R7.50"));
    }
}
