//! 平面仿射变换
//!
//! 以 2x2 线性部分加平移量表示，镜像、环形阵列和块展开共用。

use crate::math::{Point2, Vector2, EPSILON};
use nalgebra::{Matrix2, Rotation2};
use serde::{Deserialize, Serialize};

/// 仿射变换 `p -> linear * p + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    linear: Matrix2<f64>,
    offset: Vector2,
}

impl Transform2D {
    fn from_parts(linear: Matrix2<f64>, offset: Vector2) -> Self {
        Self { linear, offset }
    }

    /// 以 `fixed` 为不动点的线性变换
    fn fixing(linear: Matrix2<f64>, fixed: Point2) -> Self {
        Self::from_parts(linear, fixed.coords - linear * fixed.coords)
    }

    pub fn identity() -> Self {
        Self::from_parts(Matrix2::identity(), Vector2::zeros())
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::translation_by(Vector2::new(dx, dy))
    }

    pub fn translation_by(delta: Vector2) -> Self {
        Self::from_parts(Matrix2::identity(), delta)
    }

    /// 绕原点旋转，逆时针为正
    pub fn rotation(angle: f64) -> Self {
        Self::from_parts(Rotation2::new(angle).into_inner(), Vector2::zeros())
    }

    pub fn rotation_around(center: Point2, angle: f64) -> Self {
        Self::fixing(Rotation2::new(angle).into_inner(), center)
    }

    /// 绕原点按轴缩放
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::from_parts(Matrix2::from_diagonal(&Vector2::new(sx, sy)), Vector2::zeros())
    }

    pub fn mirror_x() -> Self {
        Self::scale(1.0, -1.0)
    }

    /// 关于过 `p1`、`p2` 的直线镜像
    ///
    /// 直线与 X 轴夹角为 θ 时，反射矩阵为 `[[cos 2θ, sin 2θ], [sin 2θ, -cos 2θ]]`。
    pub fn mirror_line(p1: Point2, p2: Point2) -> Self {
        let axis = p2 - p1;
        let (sin, cos) = (2.0 * axis.y.atan2(axis.x)).sin_cos();
        Self::fixing(Matrix2::new(cos, sin, sin, -cos), p1)
    }

    /// 组合：先施加 `other`，再施加 `self`
    pub fn then(&self, other: &Transform2D) -> Self {
        Self::from_parts(
            self.linear * other.linear,
            self.linear * other.offset + self.offset,
        )
    }

    pub fn transform_point(&self, point: &Point2) -> Point2 {
        Point2::from(self.linear * point.coords + self.offset)
    }

    /// 变换向量，不含平移
    pub fn transform_vector(&self, vector: &Vector2) -> Vector2 {
        self.linear * vector
    }

    /// 线性部分
    pub fn linear(&self) -> &Matrix2<f64> {
        &self.linear
    }

    /// X 轴单位向量变换后的方向角
    pub fn rotation_angle(&self) -> f64 {
        self.linear[(1, 0)].atan2(self.linear[(0, 0)])
    }

    /// 两个坐标轴单位向量变换后的长度
    pub fn scale_component(&self) -> (f64, f64) {
        (self.linear.column(0).norm(), self.linear.column(1).norm())
    }

    pub fn is_reflection(&self) -> bool {
        self.linear.determinant() < 0.0
    }

    /// 坐标轴是否仍映射到坐标轴（可能互换）
    ///
    /// 只有这类变换能让按两个对角点保存的矩形保持为轴对齐矩形。
    pub fn is_axis_preserving(&self) -> bool {
        let m = &self.linear;
        let diagonal = m[(0, 1)].abs() < EPSILON && m[(1, 0)].abs() < EPSILON;
        let swapped = m[(0, 0)].abs() < EPSILON && m[(1, 1)].abs() < EPSILON;
        diagonal || swapped
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Transform2D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.then(&rhs)
    }
}
