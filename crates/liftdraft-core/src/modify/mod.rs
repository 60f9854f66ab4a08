//! 修改操作
//!
//! 全部为纯函数：借用输入图元，返回新图元，不持有任何状态。
//! 遇到退化输入（平行线、零长度线段、类型不符）时不报错，
//! 而是返回 [`Outcome::Unchanged`] 包裹的原始输入。

mod align;
mod array;
mod break_at;
mod chamfer;
mod extend;
mod fillet;
mod mirror;
mod offset;
mod stretch;

pub use align::{align_elements, Alignment};
pub use array::{polar_array, rectangular_array, translate_elements, PolarArray, RectangularArray};
pub use break_at::break_element_at_point;
pub use chamfer::{chamfer, Chamfer};
pub use extend::{extend_line_to_intersection, extend_line_to_intersection_with};
pub use fillet::{fillet, Fillet};
pub use mirror::mirror_elements;
pub use offset::offset_element;
pub use stretch::stretch_elements;

use crate::geometry::Line;
use crate::math::{distance, line_intersection, Point2, Vector2, EPSILON};

/// 修改操作的结果
///
/// 两个分支都携带可用的值：`Unchanged` 中是原样返回的输入。
/// 只关心结果的调用方用 [`Outcome::into_inner`]。
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// 操作已生效
    Applied(T),
    /// 输入不满足条件，原样返回
    Unchanged(T),
}

impl<T> Outcome<T> {
    /// 操作是否生效
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    /// 取出结果，不区分是否生效
    pub fn into_inner(self) -> T {
        match self {
            Outcome::Applied(value) | Outcome::Unchanged(value) => value,
        }
    }

    /// 借用结果
    pub fn value(&self) -> &T {
        match self {
            Outcome::Applied(value) | Outcome::Unchanged(value) => value,
        }
    }

    /// 转换内部值，保留分支
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Applied(value) => Outcome::Applied(f(value)),
            Outcome::Unchanged(value) => Outcome::Unchanged(f(value)),
        }
    }
}

/// 两条线段延长相交形成的角
///
/// 每条线保留离交点较远的端点，`near_index` 记录被替换的端点位置，
/// 以便修剪后保持原线段的点顺序。
#[derive(Debug, Clone, Copy)]
pub(crate) struct Corner {
    pub vertex: Point2,
    pub legs: [Leg; 2],
    /// 两条腿之间的夹角（弧度），范围 (0, π)
    pub angle: f64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Leg {
    pub line: Line,
    /// 从交点指向保留端点的单位向量
    pub direction: Vector2,
    /// 交点到保留端点的距离
    pub reach: f64,
    /// 需要被替换的端点：0 为 start，1 为 end
    pub near_index: usize,
}

impl Leg {
    fn new(line: Line, vertex: Point2) -> Option<Self> {
        let (far, near_index) = if distance(&line.start, &vertex) >= distance(&line.end, &vertex) {
            (line.start, 1)
        } else {
            (line.end, 0)
        };
        let reach = distance(&far, &vertex);
        if reach < EPSILON {
            return None;
        }
        Some(Self {
            line,
            direction: (far - vertex) / reach,
            reach,
            near_index,
        })
    }

    /// 把靠近交点的端点替换为 `point`
    pub fn trimmed_to(&self, point: Point2) -> Line {
        if self.near_index == 0 {
            Line::new(point, self.line.end)
        } else {
            Line::new(self.line.start, point)
        }
    }

    /// 从交点沿本腿方向前进 `t`
    pub fn point_at(&self, vertex: Point2, t: f64) -> Point2 {
        vertex + self.direction * t
    }
}

impl Corner {
    /// 平行、共线或退化线段返回 `None`
    pub fn between(first: &Line, second: &Line) -> Option<Self> {
        if first.is_degenerate(EPSILON) || second.is_degenerate(EPSILON) {
            return None;
        }
        let vertex = line_intersection(&first.start, &first.end, &second.start, &second.end)?;
        let legs = [Leg::new(*first, vertex)?, Leg::new(*second, vertex)?];
        let angle = legs[0].direction.dot(&legs[1].direction).clamp(-1.0, 1.0).acos();
        if angle < EPSILON || (std::f64::consts::PI - angle) < EPSILON {
            return None;
        }
        Some(Self { vertex, legs, angle })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_into_inner() {
        let applied: Outcome<i32> = Outcome::Applied(1);
        let unchanged: Outcome<i32> = Outcome::Unchanged(2);
        assert!(applied.is_applied());
        assert!(!unchanged.is_applied());
        assert_eq!(applied.map(|v| v * 10).into_inner(), 10);
        assert_eq!(*unchanged.value(), 2);
    }

    #[test]
    fn test_corner_keeps_far_endpoints() {
        let first = Line::new(Point2::new(0.0, 0.0), Point2::new(9.0, 0.0));
        let second = Line::new(Point2::new(10.0, 10.0), Point2::new(10.0, 1.0));
        let corner = Corner::between(&first, &second).unwrap();

        assert!(distance(&corner.vertex, &Point2::new(10.0, 0.0)) < 1e-9);
        assert_eq!(corner.legs[0].near_index, 1);
        assert_eq!(corner.legs[1].near_index, 1);
        assert!((corner.angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_corner_rejects_parallel() {
        let first = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let second = Line::new(Point2::new(0.0, 5.0), Point2::new(10.0, 5.0));
        assert!(Corner::between(&first, &second).is_none());
    }
}
