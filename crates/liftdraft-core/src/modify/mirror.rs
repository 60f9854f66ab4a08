//! 镜像

use super::Outcome;
use crate::element::DrawingElement;
use crate::math::{distance, Point2, EPSILON};
use crate::transform::Transform2D;

/// 以 `axis_start -> axis_end` 为轴镜像
///
/// `keep_original` 为真时返回原图元加上 ID 为 `{id}-m` 的镜像副本，
/// 否则镜像结果沿用原 ID。轴退化为一点时原样返回。
pub fn mirror_elements(
    elements: &[DrawingElement],
    axis_start: Point2,
    axis_end: Point2,
    keep_original: bool,
) -> Outcome<Vec<DrawingElement>> {
    if distance(&axis_start, &axis_end) < EPSILON {
        return Outcome::Unchanged(elements.to_vec());
    }

    let mirror = Transform2D::mirror_line(axis_start, axis_end);
    let reflected = elements.iter().map(|element| {
        let geometry = element.geometry.transformed(&mirror);
        if keep_original {
            element.copy_as(element.id.derived("m"), geometry)
        } else {
            element.with_geometry(geometry)
        }
    });

    let result = if keep_original {
        elements.iter().cloned().chain(reflected).collect()
    } else {
        reflected.collect()
    };
    Outcome::Applied(result)
}
