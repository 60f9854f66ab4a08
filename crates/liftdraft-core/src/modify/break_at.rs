//! 在点处打断线段

use super::Outcome;
use crate::element::DrawingElement;
use crate::geometry::{Geometry, Line};
use crate::math::{closest_point_on_segment, distance, Point2, EPSILON};

/// 在 `break_point` 处把线段打断为两段
///
/// 打断点到线段的距离不超过 `tolerance` 时，返回共享打断点的两条新线段，
/// ID 分别为 `{id}-1` 与 `{id}-2`，样式和图层继承原线段；
/// 打断点先投影到线段上，使两段保持共线。
///
/// 以下情况返回只含原图元的列表，调用方可以通过结果长度判断是否打断：
/// - 图元不是线段
/// - 打断点到线段的距离超出容差
/// - 投影点与某个端点重合（包括容差内但位于线段延长方向的点），
///   此时打断会产生零长度线段，即使打断点本身在容差内也不打断
pub fn break_element_at_point(
    element: &DrawingElement,
    break_point: Point2,
    tolerance: f64,
) -> Outcome<Vec<DrawingElement>> {
    let unchanged = || Outcome::Unchanged(vec![element.clone()]);
    let Some(line) = element.as_line() else {
        return unchanged();
    };

    let split = closest_point_on_segment(&break_point, &line.start, &line.end);
    if distance(&split, &break_point) > tolerance {
        return unchanged();
    }
    if distance(&split, &line.start) < EPSILON || distance(&split, &line.end) < EPSILON {
        return unchanged();
    }

    Outcome::Applied(vec![
        element.copy_as(element.id.derived(1), Geometry::Line(Line::new(line.start, split))),
        element.copy_as(element.id.derived(2), Geometry::Line(Line::new(split, line.end))),
    ])
}
