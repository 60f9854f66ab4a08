//! 拉伸

use super::Outcome;
use crate::element::DrawingElement;
use crate::math::{BoundingBox2, Point2};

/// 拉伸：只平移落在选择框内的点
///
/// 与整体移动不同，框外的点保持不动，所以被框住一端的线段会被拉长或缩短。
/// 标注的测量值随点重新计算。没有任何点落在框内时返回原列表。
pub fn stretch_elements(
    elements: &[DrawingElement],
    from: Point2,
    to: Point2,
    selection_box: BoundingBox2,
) -> Outcome<Vec<DrawingElement>> {
    let selection = BoundingBox2::from_corners(selection_box.min, selection_box.max);
    let delta = to - from;

    let touched = elements
        .iter()
        .any(|e| e.points().iter().any(|p| selection.contains(p)));
    if !touched {
        return Outcome::Unchanged(elements.to_vec());
    }

    Outcome::Applied(
        elements
            .iter()
            .map(|element| {
                element.map_points(|p| if selection.contains(&p) { p + delta } else { p })
            })
            .collect(),
    )
}
