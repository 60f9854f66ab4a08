//! 圆角

use super::{Corner, Outcome};
use crate::element::DrawingElement;
use crate::geometry::{Arc, Geometry};
use crate::math::{cross, EPSILON};

/// 圆角结果：修剪后的两条线段与连接它们的圆弧
#[derive(Debug, Clone, PartialEq)]
pub struct Fillet {
    pub first: DrawingElement,
    pub second: DrawingElement,
    /// 半径为零时没有圆弧，两条线只修剪到交点
    pub arc: Option<DrawingElement>,
}

/// 在两条线段的交角处倒圆角
///
/// 两条线段的延长线相交形成一个角，保留各自离交点较远的端点，
/// 较近的端点移到切点。圆弧 ID 为 `{first}-fillet`，样式与图层取自第一条线。
/// 非线段、平行或共线、半径为负、或切点超出线段范围时原样返回。
pub fn fillet(first: &DrawingElement, second: &DrawingElement, radius: f64) -> Outcome<Fillet> {
    let unchanged = || {
        Outcome::Unchanged(Fillet {
            first: first.clone(),
            second: second.clone(),
            arc: None,
        })
    };

    let (Some(a), Some(b)) = (first.as_line(), second.as_line()) else {
        return unchanged();
    };
    if radius < 0.0 {
        return unchanged();
    }
    let Some(corner) = Corner::between(a, b) else {
        return unchanged();
    };
    let [leg1, leg2] = corner.legs;

    let half = corner.angle / 2.0;
    let t = radius / half.tan();
    if t > leg1.reach + EPSILON || t > leg2.reach + EPSILON {
        return unchanged();
    }

    let tangent1 = leg1.point_at(corner.vertex, t);
    let tangent2 = leg2.point_at(corner.vertex, t);
    let trimmed_first = first.with_geometry(Geometry::Line(leg1.trimmed_to(tangent1)));
    let trimmed_second = second.with_geometry(Geometry::Line(leg2.trimmed_to(tangent2)));

    let arc = (radius > EPSILON).then(|| {
        let bisector = (leg1.direction + leg2.direction).normalize();
        let center = corner.vertex + bisector * (radius / half.sin());
        let (start, end) = if cross(&(tangent1 - center), &(tangent2 - center)) >= 0.0 {
            (tangent1, tangent2)
        } else {
            (tangent2, tangent1)
        };
        first.copy_as(
            first.id.derived("fillet"),
            Geometry::Arc(Arc::new(center, start, end)),
        )
    });

    Outcome::Applied(Fillet {
        first: trimmed_first,
        second: trimmed_second,
        arc,
    })
}
