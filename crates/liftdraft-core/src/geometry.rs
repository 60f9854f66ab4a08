//! 几何图元定义
//!
//! 支持的图元：
//! - 线段 (Line)
//! - 矩形 (Rectangle)
//! - 圆 (Circle)
//! - 圆弧 (Arc)
//! - 多段线 (Polyline)
//! - 文本 (Text)
//! - 线性/角度/半径标注
//! - 块 (Block)
//!
//! 每种图元只保存点；半径、长度、角度和标注文字都在需要时由点计算，
//! 修改点之后不存在需要同步的缓存值。

use crate::element::DrawingElement;
use crate::math::{cross, distance, BoundingBox2, Point2, EPSILON};
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// 几何类型枚举
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Geometry {
    Line(Line),
    Rectangle(Rectangle),
    Circle(Circle),
    Arc(Arc),
    Polyline(Polyline),
    Text(Text),
    LinearDimension(LinearDimension),
    AngularDimension(AngularDimension),
    RadialDimension(RadialDimension),
    Block(Block),
}

impl Geometry {
    /// 获取几何的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Line(_) => "line",
            Geometry::Rectangle(_) => "rectangle",
            Geometry::Circle(_) => "circle",
            Geometry::Arc(_) => "arc",
            Geometry::Polyline(_) => "polyline",
            Geometry::Text(_) => "text",
            Geometry::LinearDimension(_) => "linearDimension",
            Geometry::AngularDimension(_) => "angularDimension",
            Geometry::RadialDimension(_) => "radialDimension",
            Geometry::Block(_) => "block",
        }
    }

    /// 是否为标注
    pub fn is_dimension(&self) -> bool {
        matches!(
            self,
            Geometry::LinearDimension(_)
                | Geometry::AngularDimension(_)
                | Geometry::RadialDimension(_)
        )
    }

    /// 按顺序返回定义点
    ///
    /// 块只返回插入点，块内图元在块自己的坐标系中。
    pub fn points(&self) -> Vec<Point2> {
        match self {
            Geometry::Line(l) => vec![l.start, l.end],
            Geometry::Rectangle(r) => vec![r.corner1, r.corner2],
            Geometry::Circle(c) => vec![c.center, c.rim],
            Geometry::Arc(a) => vec![a.center, a.start, a.end],
            Geometry::Polyline(pl) => pl.points.clone(),
            Geometry::Text(t) => vec![t.position],
            Geometry::LinearDimension(d) => d.points().to_vec(),
            Geometry::AngularDimension(d) => vec![d.vertex, d.first, d.second],
            Geometry::RadialDimension(d) => vec![d.center, d.point],
            Geometry::Block(b) => vec![b.insertion],
        }
    }

    /// 对每个定义点应用 `f`，返回同类型的新几何
    pub fn map_points(&self, f: impl Fn(Point2) -> Point2) -> Geometry {
        match self {
            Geometry::Line(l) => Geometry::Line(Line::new(f(l.start), f(l.end))),
            Geometry::Rectangle(r) => Geometry::Rectangle(Rectangle::new(f(r.corner1), f(r.corner2))),
            Geometry::Circle(c) => Geometry::Circle(Circle::new(f(c.center), f(c.rim))),
            Geometry::Arc(a) => Geometry::Arc(Arc::new(f(a.center), f(a.start), f(a.end))),
            Geometry::Polyline(pl) => Geometry::Polyline(Polyline::new(
                pl.points.iter().map(|p| f(*p)).collect(),
                pl.closed,
            )),
            Geometry::Text(t) => Geometry::Text(Text::new(f(t.position), t.content.clone())),
            Geometry::LinearDimension(d) => Geometry::LinearDimension(LinearDimension {
                p1: f(d.p1),
                p2: f(d.p2),
                witness1: f(d.witness1),
                witness2: f(d.witness2),
            }),
            Geometry::AngularDimension(d) => Geometry::AngularDimension(AngularDimension {
                vertex: f(d.vertex),
                first: f(d.first),
                second: f(d.second),
                radius: d.radius,
            }),
            Geometry::RadialDimension(d) => Geometry::RadialDimension(RadialDimension {
                center: f(d.center),
                point: f(d.point),
            }),
            Geometry::Block(b) => Geometry::Block(Block {
                insertion: f(b.insertion),
                ..b.clone()
            }),
        }
    }

    /// 施加仿射变换（假定变换为相似变换）
    ///
    /// 与 [`Geometry::map_points`] 的区别：
    /// - 变换使矩形不再轴对齐时，结果为四个角点组成的闭合多段线
    /// - 镜像下圆弧以原终点的像为起点，保持逆时针方向和半径
    /// - 块的旋转和缩放随变换更新
    pub fn transformed(&self, transform: &Transform2D) -> Geometry {
        let t = |p: Point2| transform.transform_point(&p);
        let reflect = transform.is_reflection();
        match self {
            Geometry::Rectangle(r) if !transform.is_axis_preserving() => Geometry::Polyline(
                Polyline::new(r.edges().iter().map(|edge| t(edge.start)).collect(), true),
            ),
            Geometry::Arc(a) if reflect => {
                Geometry::Arc(Arc::new(t(a.center), t(a.end_point()), t(a.start)))
            }
            Geometry::Block(b) => {
                let angle = transform.rotation_angle();
                let (k, _) = transform.scale_component();
                let mut b = b.clone();
                b.insertion = t(b.insertion);
                b.scale_x *= k;
                if reflect {
                    b.rotation = angle - b.rotation;
                    b.scale_y *= -k;
                } else {
                    b.rotation += angle;
                    b.scale_y *= k;
                }
                Geometry::Block(b)
            }
            other => other.map_points(t),
        }
    }

    /// 获取几何的包围盒（由定义点计算）
    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points(self.points())
    }

    /// 绘制范围：圆和圆弧按实际曲线，块按展开后的子图元
    pub fn extents(&self) -> BoundingBox2 {
        match self {
            Geometry::Circle(c) => c.bounding_box(),
            Geometry::Arc(a) => a.bounding_box(),
            Geometry::AngularDimension(d) => self.bounding_box().union(&d.arc().bounding_box()),
            Geometry::Block(b) => {
                let transform = b.transform();
                b.elements
                    .iter()
                    .map(|child| child.geometry.transformed(&transform).extents())
                    .fold(BoundingBox2::empty(), |acc, bbox| acc.union(&bbox))
            }
            _ => self.bounding_box(),
        }
    }

    /// 标注的测量值：线性为长度，角度为度数，半径为半径
    pub fn measurement(&self) -> Option<f64> {
        match self {
            Geometry::LinearDimension(d) => Some(d.measurement()),
            Geometry::AngularDimension(d) => Some(d.measurement()),
            Geometry::RadialDimension(d) => Some(d.measurement()),
            _ => None,
        }
    }

    /// 需要显示的文字：文本内容或标注文字
    pub fn label(&self) -> Option<String> {
        match self {
            Geometry::Text(t) => Some(t.content.clone()),
            Geometry::LinearDimension(d) => Some(d.display_text()),
            Geometry::AngularDimension(d) => Some(d.display_text()),
            Geometry::RadialDimension(d) => Some(d.display_text()),
            _ => None,
        }
    }
}

/// 线段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        distance(&self.start, &self.end)
    }

    /// 计算线段中点
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.start, &self.end)
    }

    /// 是否退化为一点
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        self.length() <= tolerance
    }
}

/// 矩形（两个对角点）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub corner1: Point2,
    pub corner2: Point2,
}

impl Rectangle {
    pub fn new(corner1: Point2, corner2: Point2) -> Self {
        Self { corner1, corner2 }
    }

    /// 规范化后的左上（最小）角与宽高
    pub fn normalized(&self) -> (Point2, f64, f64) {
        let bbox = BoundingBox2::from_corners(self.corner1, self.corner2);
        (bbox.min, bbox.width(), bbox.height())
    }

    /// 四条边，顺序为 corner1 出发的闭合环
    pub fn edges(&self) -> [Line; 4] {
        let a = self.corner1;
        let c = self.corner2;
        let b = Point2::new(c.x, a.y);
        let d = Point2::new(a.x, c.y);
        [Line::new(a, b), Line::new(b, c), Line::new(c, d), Line::new(d, a)]
    }
}

/// 圆（圆心 + 圆周上一点）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub rim: Point2,
}

impl Circle {
    pub fn new(center: Point2, rim: Point2) -> Self {
        Self { center, rim }
    }

    /// 由圆心和半径创建，圆周点取在圆心右侧
    pub fn from_radius(center: Point2, radius: f64) -> Self {
        Self::new(center, Point2::new(center.x + radius, center.y))
    }

    /// 半径（由点推导）
    pub fn radius(&self) -> f64 {
        distance(&self.center, &self.rim)
    }

    /// 计算面积
    pub fn area(&self) -> f64 {
        PI * self.radius().powi(2)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let r = self.radius();
        BoundingBox2::new(
            Point2::new(self.center.x - r, self.center.y - r),
            Point2::new(self.center.x + r, self.center.y + r),
        )
    }
}

/// 圆弧：从 `start` 逆时针扫到 `center -> end` 射线
///
/// 半径取 `start` 到圆心的距离，`end` 只决定终止方向。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point2,
    pub start: Point2,
    pub end: Point2,
}

impl Arc {
    pub fn new(center: Point2, start: Point2, end: Point2) -> Self {
        Self { center, start, end }
    }

    /// 半径
    pub fn radius(&self) -> f64 {
        distance(&self.center, &self.start)
    }

    /// 起始角（弧度）
    pub fn start_angle(&self) -> f64 {
        (self.start.y - self.center.y).atan2(self.start.x - self.center.x)
    }

    /// 终止角（弧度）
    pub fn end_angle(&self) -> f64 {
        (self.end.y - self.center.y).atan2(self.end.x - self.center.x)
    }

    /// 逆时针扫掠角，范围 (0, 2π]
    pub fn sweep_angle(&self) -> f64 {
        let sweep = (self.end_angle() - self.start_angle()).rem_euclid(TAU);
        if sweep < EPSILON {
            TAU
        } else {
            sweep
        }
    }

    /// 终点（落在圆上）
    pub fn end_point(&self) -> Point2 {
        let angle = self.end_angle();
        let r = self.radius();
        Point2::new(
            self.center.x + r * angle.cos(),
            self.center.y + r * angle.sin(),
        )
    }

    /// 曲线包围盒：两个端点加上扫掠范围内的坐标轴极值点
    pub fn bounding_box(&self) -> BoundingBox2 {
        let r = self.radius();
        let start = self.start_angle();
        let sweep = self.sweep_angle();
        let extremes = (0..4)
            .map(|k| k as f64 * FRAC_PI_2)
            .filter(|axis| (axis - start).rem_euclid(TAU) <= sweep + EPSILON)
            .map(|axis| {
                Point2::new(self.center.x + r * axis.cos(), self.center.y + r * axis.sin())
            });
        BoundingBox2::from_points([self.start, self.end_point()].into_iter().chain(extremes))
    }
}

/// 多段线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point2>,
    #[serde(default)]
    pub closed: bool,
}

impl Polyline {
    pub fn new(points: Vec<Point2>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// 获取段数
    pub fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// 所有线段（闭合时包含回到起点的一段）
    pub fn segments(&self) -> Vec<Line> {
        let n = self.points.len();
        (0..self.segment_count())
            .map(|i| Line::new(self.points[i], self.points[(i + 1) % n]))
            .collect()
    }
}

/// 文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub position: Point2,
    pub content: String,
}

impl Text {
    pub fn new(position: Point2, content: impl Into<String>) -> Self {
        Self {
            position,
            content: content.into(),
        }
    }
}

/// 线性标注：`[p1, p2, witness1, witness2]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearDimension {
    /// 第一个测量点
    pub p1: Point2,
    /// 第二个测量点
    pub p2: Point2,
    /// p1 沿法向偏移后的尺寸线端点
    pub witness1: Point2,
    /// p2 沿法向偏移后的尺寸线端点
    pub witness2: Point2,
}

impl LinearDimension {
    pub fn points(&self) -> [Point2; 4] {
        [self.p1, self.p2, self.witness1, self.witness2]
    }

    /// 测量长度
    pub fn measurement(&self) -> f64 {
        distance(&self.p1, &self.p2)
    }

    /// 文字位置：尺寸线中点
    pub fn text_position(&self) -> Point2 {
        nalgebra::center(&self.witness1, &self.witness2)
    }

    pub fn display_text(&self) -> String {
        format!("{:.2}", self.measurement())
    }
}

/// 角度标注
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularDimension {
    /// 角的顶点
    pub vertex: Point2,
    /// 第一条边上的点
    pub first: Point2,
    /// 第二条边上的点
    pub second: Point2,
    /// 标注弧半径
    pub radius: f64,
}

impl AngularDimension {
    /// 非优角（弧度），范围 [0, π]
    pub fn angle(&self) -> f64 {
        let a1 = (self.first.y - self.vertex.y).atan2(self.first.x - self.vertex.x);
        let a2 = (self.second.y - self.vertex.y).atan2(self.second.x - self.vertex.x);
        let diff = (a2 - a1).abs();
        if diff > PI {
            TAU - diff
        } else {
            diff
        }
    }

    /// 测量值（度，保留两位小数）
    pub fn measurement(&self) -> f64 {
        (self.angle().to_degrees() * 100.0).round() / 100.0
    }

    /// 标注弧：从较小方位角的边逆时针扫过非优角
    pub fn arc(&self) -> Arc {
        let a1 = (self.first.y - self.vertex.y).atan2(self.first.x - self.vertex.x);
        let a2 = (self.second.y - self.vertex.y).atan2(self.second.x - self.vertex.x);
        let v1 = self.first - self.vertex;
        let v2 = self.second - self.vertex;
        let (from, to) = if cross(&v1, &v2) >= 0.0 { (a1, a2) } else { (a2, a1) };
        let at = |angle: f64| {
            Point2::new(
                self.vertex.x + self.radius * angle.cos(),
                self.vertex.y + self.radius * angle.sin(),
            )
        };
        Arc::new(self.vertex, at(from), at(to))
    }

    /// 文字位置：角平分线上、标注弧外侧一点
    pub fn text_position(&self) -> Point2 {
        let arc = self.arc();
        let mid = arc.start_angle() + arc.sweep_angle() / 2.0;
        let r = self.radius * 1.2;
        Point2::new(self.vertex.x + r * mid.cos(), self.vertex.y + r * mid.sin())
    }

    pub fn display_text(&self) -> String {
        format!("{:.2}°", self.measurement())
    }
}

/// 半径标注
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialDimension {
    pub center: Point2,
    pub point: Point2,
}

impl RadialDimension {
    pub fn measurement(&self) -> f64 {
        distance(&self.center, &self.point)
    }

    pub fn text_position(&self) -> Point2 {
        nalgebra::center(&self.center, &self.point)
    }

    pub fn display_text(&self) -> String {
        format!("R{:.2}", self.measurement())
    }
}

/// 块参照：带插入点、缩放和旋转的一组图元
///
/// 内部图元位于块自己的坐标系中。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// 块名称
    pub name: String,
    /// 插入点
    pub insertion: Point2,
    /// X 方向缩放
    pub scale_x: f64,
    /// Y 方向缩放
    pub scale_y: f64,
    /// 旋转角度（弧度）
    pub rotation: f64,
    /// 块中的图元
    pub elements: Vec<DrawingElement>,
}

impl Block {
    /// 创建块参照
    pub fn new(name: impl Into<String>, insertion: Point2, elements: Vec<DrawingElement>) -> Self {
        Self {
            name: name.into(),
            insertion,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            elements,
        }
    }

    /// 设置均匀缩放
    pub fn with_uniform_scale(mut self, scale: f64) -> Self {
        self.scale_x = scale;
        self.scale_y = scale;
        self
    }

    /// 设置两个方向的缩放，负值表示镜像
    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// 设置旋转
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// 块坐标到世界坐标的变换：先缩放，再旋转，最后平移到插入点
    pub fn transform(&self) -> Transform2D {
        Transform2D::translation(self.insertion.x, self.insertion.y)
            .then(&Transform2D::rotation(self.rotation))
            .then(&Transform2D::scale(self.scale_x, self.scale_y))
    }
}
