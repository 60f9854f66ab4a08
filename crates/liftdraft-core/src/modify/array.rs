//! 阵列与平移

use super::Outcome;
use crate::element::DrawingElement;
use crate::math::{Point2, Vector2};
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// 整体平移
pub fn translate_elements(elements: &[DrawingElement], delta: Vector2) -> Vec<DrawingElement> {
    elements
        .iter()
        .map(|element| element.map_points(|p| p + delta))
        .collect()
}

/// 矩形阵列参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangularArray {
    pub rows: usize,
    pub columns: usize,
    /// 行间距（y 方向）
    pub row_spacing: f64,
    /// 列间距（x 方向）
    pub column_spacing: f64,
}

/// 环形阵列参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolarArray {
    pub center: Point2,
    /// 总个数，含原图元
    pub count: usize,
    /// 填充角度（弧度），2π 为整圆
    pub fill_angle: f64,
    /// 副本是否随角度旋转
    pub rotate_items: bool,
}

impl PolarArray {
    /// 相邻两项之间的角度
    ///
    /// 整圆时 `count` 项均分，首尾不重合；否则最后一项落在终止角上。
    pub fn step_angle(&self) -> f64 {
        if (self.fill_angle.abs() - TAU).abs() < 1e-9 {
            self.fill_angle / self.count as f64
        } else {
            self.fill_angle / (self.count - 1) as f64
        }
    }
}

/// 矩形阵列
///
/// 返回原图元及按行优先排列的副本，副本 ID 为 `{id}-r{行}c{列}`。
/// 总数为 0、1 或行列乘积溢出时不做阵列。
pub fn rectangular_array(
    elements: &[DrawingElement],
    params: RectangularArray,
) -> Outcome<Vec<DrawingElement>> {
    match params.rows.checked_mul(params.columns) {
        Some(0 | 1) | None => return Outcome::Unchanged(elements.to_vec()),
        Some(_) => {}
    }

    let mut result = elements.to_vec();
    for row in 0..params.rows {
        for col in 0..params.columns {
            if row == 0 && col == 0 {
                continue;
            }
            let delta = Vector2::new(
                col as f64 * params.column_spacing,
                row as f64 * params.row_spacing,
            );
            result.extend(elements.iter().map(|element| {
                let moved = element.map_points(|p| p + delta);
                element.copy_as(element.id.derived(format!("r{row}c{col}")), moved.geometry)
            }));
        }
    }
    Outcome::Applied(result)
}

/// 环形阵列
///
/// 返回原图元及依次旋转的副本，副本 ID 为 `{id}-p{序号}`。
/// 不旋转副本时，每个图元按其包围盒中心绕圆心移动，自身朝向不变。
pub fn polar_array(elements: &[DrawingElement], params: PolarArray) -> Outcome<Vec<DrawingElement>> {
    if params.count < 2 {
        return Outcome::Unchanged(elements.to_vec());
    }

    let step = params.step_angle();
    let mut result = elements.to_vec();
    for i in 1..params.count {
        let rotation = Transform2D::rotation_around(params.center, step * i as f64);
        result.extend(elements.iter().map(|element| {
            let geometry = if params.rotate_items {
                element.geometry.transformed(&rotation)
            } else {
                let reference = element.bounding_box().center();
                let delta = rotation.transform_point(&reference) - reference;
                element.geometry.map_points(|p| p + delta)
            };
            element.copy_as(element.id.derived(format!("p{i}")), geometry)
        }));
    }
    Outcome::Applied(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Line, Rectangle};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_4, PI};

    fn line() -> DrawingElement {
        DrawingElement::new(
            "l",
            Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0))),
        )
        .with_layer("steel")
    }

    #[test]
    fn test_translate() {
        let moved = translate_elements(&[line()], Vector2::new(2.0, 3.0));
        assert_eq!(moved[0].id.as_str(), "l");
        assert_eq!(moved[0].as_line().unwrap().start, Point2::new(2.0, 3.0));
    }

    #[test]
    fn test_rectangular_array() {
        let params = RectangularArray {
            rows: 2,
            columns: 3,
            row_spacing: 10.0,
            column_spacing: 5.0,
        };
        let result = rectangular_array(&[line()], params);
        assert!(result.is_applied());

        let result = result.into_inner();
        assert_eq!(result.len(), 6);
        let ids: Vec<&str> = result.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["l", "l-r0c1", "l-r0c2", "l-r1c0", "l-r1c1", "l-r1c2"]);

        let last = result[5].as_line().unwrap();
        assert_eq!(last.start, Point2::new(10.0, 10.0));
        assert_eq!(result[5].layer.as_deref(), Some("steel"));
    }

    #[test]
    fn test_rectangular_array_degenerate() {
        let single = RectangularArray {
            rows: 1,
            columns: 1,
            row_spacing: 1.0,
            column_spacing: 1.0,
        };
        assert!(!rectangular_array(&[line()], single).is_applied());

        let empty = RectangularArray { rows: 0, ..single };
        assert_eq!(rectangular_array(&[line()], empty).into_inner().len(), 1);
    }

    #[test]
    fn test_rectangular_array_overflowing_count_is_noop() {
        let huge = RectangularArray {
            rows: usize::MAX,
            columns: 2,
            row_spacing: 1.0,
            column_spacing: 1.0,
        };
        let outcome = rectangular_array(&[line()], huge);
        assert!(!outcome.is_applied());
        assert_eq!(outcome.into_inner(), vec![line()]);
    }

    #[test]
    fn test_polar_array_full_circle() {
        let params = PolarArray {
            center: Point2::origin(),
            count: 4,
            fill_angle: TAU,
            rotate_items: true,
        };
        let result = polar_array(&[line()], params).into_inner();
        assert_eq!(result.len(), 4);
        assert_eq!(result[2].id.as_str(), "l-p2");

        let quarter = result[1].as_line().unwrap();
        assert_abs_diff_eq!(quarter.end, Point2::new(0.0, 1.0), epsilon = 1e-12);
        let half = result[2].as_line().unwrap();
        assert_abs_diff_eq!(half.end, Point2::new(-1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_polar_array_partial_fill_ends_on_fill_angle() {
        let params = PolarArray {
            center: Point2::origin(),
            count: 3,
            fill_angle: PI,
            rotate_items: true,
        };
        assert_abs_diff_eq!(params.step_angle(), PI / 2.0);
        let result = polar_array(&[line()], params).into_inner();
        let last = result[2].as_line().unwrap();
        assert_abs_diff_eq!(last.end, Point2::new(-1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_polar_array_without_rotation_keeps_orientation() {
        let element = DrawingElement::new(
            "l",
            Geometry::Line(Line::new(Point2::new(9.0, 0.0), Point2::new(11.0, 0.0))),
        );
        let params = PolarArray {
            center: Point2::origin(),
            count: 2,
            fill_angle: PI,
            rotate_items: false,
        };
        let result = polar_array(&[element], params).into_inner();
        let copy = result[1].as_line().unwrap();
        assert_abs_diff_eq!(copy.start, Point2::new(-11.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(copy.end, Point2::new(-9.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_polar_array_single_is_noop() {
        let params = PolarArray {
            center: Point2::origin(),
            count: 1,
            fill_angle: TAU,
            rotate_items: true,
        };
        assert!(!polar_array(&[line()], params).is_applied());
    }

    #[test]
    fn test_polar_array_rotated_rectangle_keeps_size() {
        let plate = DrawingElement::new(
            "plate",
            Geometry::Rectangle(Rectangle::new(Point2::new(20.0, 0.0), Point2::new(30.0, 2.0))),
        );
        let params = PolarArray {
            center: Point2::origin(),
            count: 8,
            fill_angle: TAU,
            rotate_items: true,
        };
        assert_abs_diff_eq!(params.step_angle(), FRAC_PI_4, epsilon = 1e-12);

        let result = polar_array(&[plate], params).into_inner();
        let Geometry::Polyline(outline) = &result[1].geometry else {
            panic!("unexpected geometry {:?}", result[1].geometry);
        };
        assert!(outline.closed);
        let sides: Vec<f64> = outline.segments().iter().map(Line::length).collect();
        for (side, expected) in sides.iter().zip([10.0, 2.0, 10.0, 2.0]) {
            assert_abs_diff_eq!(*side, expected, epsilon = 1e-9);
        }

        // 90° 的副本仍是矩形
        assert!(matches!(result[2].geometry, Geometry::Rectangle(_)));
    }
}
