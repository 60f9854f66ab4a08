//! 数学基础类型与几何原语
//!
//! 基于 nalgebra 提供的向量和点类型的别名，以及距离、直线求交、
//! 点到线段距离等纯函数。

use nalgebra as na;
use serde::{Deserialize, Serialize};

/// 2D点类型
pub type Point2 = na::Point2<f64>;

/// 2D向量类型
pub type Vector2 = na::Vector2<f64>;

/// 数值容差，用于几何比较
pub const EPSILON: f64 = 1e-9;

/// 直线求交时分母的默认容差（毫米文档）
pub const INTERSECTION_EPSILON: f64 = 1e-4;

/// 判断两个浮点数是否近似相等
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 判断两个2D点是否近似相等
#[inline]
pub fn points_approx_eq(a: &Point2, b: &Point2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// 两点间欧氏距离
#[inline]
pub fn distance(p1: &Point2, p2: &Point2) -> f64 {
    (p2 - p1).norm()
}

/// 两条直线（由 `p1-p2` 与 `p3-p4` 确定）的交点
///
/// 分母绝对值小于 [`INTERSECTION_EPSILON`] 时视为平行或重合，返回 `None`。
pub fn line_intersection(p1: &Point2, p2: &Point2, p3: &Point2, p4: &Point2) -> Option<Point2> {
    line_intersection_with(p1, p2, p3, p4, INTERSECTION_EPSILON)
}

/// 同 [`line_intersection`]，分母容差由调用方给出
pub fn line_intersection_with(
    p1: &Point2,
    p2: &Point2,
    p3: &Point2,
    p4: &Point2,
    epsilon: f64,
) -> Option<Point2> {
    let denom = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if denom.abs() < epsilon {
        return None;
    }

    let t = ((p1.x - p3.x) * (p3.y - p4.y) - (p1.y - p3.y) * (p3.x - p4.x)) / denom;
    Some(p1 + (p2 - p1) * t)
}

/// 点到线段的最短距离
///
/// 投影参数被钳制到 `[0, 1]`；线段退化为一点时按到起点的距离计算。
pub fn point_to_segment_distance(point: &Point2, seg_start: &Point2, seg_end: &Point2) -> f64 {
    distance(point, &closest_point_on_segment(point, seg_start, seg_end))
}

/// 线段上离给定点最近的点
pub fn closest_point_on_segment(point: &Point2, seg_start: &Point2, seg_end: &Point2) -> Point2 {
    let v = seg_end - seg_start;
    let len_sq = v.norm_squared();
    if len_sq == 0.0 {
        return *seg_start;
    }

    let t = ((point - seg_start).dot(&v) / len_sq).clamp(0.0, 1.0);
    seg_start + v * t
}

/// 把向量逆时针旋转 90°
#[inline]
pub fn perpendicular(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// 2D叉积（z 分量）
#[inline]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// 2D包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    /// 创建新的包围盒
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// 由任意两个对角点创建（自动规范化）
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        Self::from_points([a, b])
    }

    /// 创建空的包围盒（无效状态）
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::MAX, f64::MAX),
            max: Point2::new(f64::MIN, f64::MIN),
        }
    }

    /// 是否为空（未包含任何点）
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// 从点集创建包围盒
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(&p);
        }
        bbox
    }

    /// 扩展包围盒以包含指定点
    pub fn expand_to_include(&mut self, point: &Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// 合并两个包围盒
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// 检查是否包含指定点（边界算在内）
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// 获取中心点
    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// 获取宽度
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// 获取高度
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}
