//! 图元标识与图元
//!
//! [`DrawingElement`] 是闭合的和类型：每种几何只携带自己需要的字段。
//! 编辑器传入的是松散记录 [`RawElement`]（字符串类型名 + 点列表 + 可选字段），
//! 在边界处通过 `TryFrom` 校验转换。

use crate::geometry::{
    AngularDimension, Arc, Block, Circle, Geometry, LinearDimension, Line, Polyline,
    RadialDimension, Rectangle, Text,
};
use crate::math::{BoundingBox2, Point2};
use crate::properties::Style;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 图元唯一标识符
///
/// 创建后不再改变，唯一性限定在单个文档内。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 随机生成（uuid v4），供编辑器创建全新图元时使用
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// 派生 ID：`{id}-{suffix}`
    pub fn derived(&self, suffix: impl fmt::Display) -> Self {
        Self(format!("{}-{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// 绘图图元
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingElement {
    /// 唯一标识符
    pub id: ElementId,
    /// 几何类型和数据
    pub geometry: Geometry,
    /// 视觉属性
    #[serde(default)]
    pub style: Style,
    /// 所属图层
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

impl DrawingElement {
    /// 创建新图元
    pub fn new(id: impl Into<ElementId>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            geometry,
            style: Style::default(),
            layer: None,
        }
    }

    /// 使用指定的样式
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// 使用指定的图层
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    /// 保留 ID 以外的一切，替换几何
    pub fn with_geometry(&self, geometry: Geometry) -> Self {
        Self {
            geometry,
            ..self.clone()
        }
    }

    /// 复制为新 ID 的图元
    pub fn copy_as(&self, id: ElementId, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            style: self.style.clone(),
            layer: self.layer.clone(),
        }
    }

    /// 类型名称
    pub fn kind(&self) -> &'static str {
        self.geometry.type_name()
    }

    /// 定义点
    pub fn points(&self) -> Vec<Point2> {
        self.geometry.points()
    }

    /// 对每个定义点应用 `f`
    pub fn map_points(&self, f: impl Fn(Point2) -> Point2) -> Self {
        self.with_geometry(self.geometry.map_points(f))
    }

    /// 获取包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        self.geometry.bounding_box()
    }

    /// 若为线段，返回线段
    pub fn as_line(&self) -> Option<&Line> {
        match &self.geometry {
            Geometry::Line(line) => Some(line),
            _ => None,
        }
    }

    /// 展开块参照为世界坐标下的基本图元
    ///
    /// 嵌套块递归展开；子图元 ID 为 `{块ID}-{子ID}`，未设图层时继承块的图层。
    /// 非块图元返回自身。
    pub fn flatten(&self) -> Vec<DrawingElement> {
        let Geometry::Block(block) = &self.geometry else {
            return vec![self.clone()];
        };

        let transform = block.transform();
        block
            .elements
            .iter()
            .flat_map(DrawingElement::flatten)
            .map(|child| DrawingElement {
                id: self.id.derived(&child.id),
                geometry: child.geometry.transformed(&transform),
                style: child.style,
                layer: child.layer.or_else(|| self.layer.clone()),
            })
            .collect()
    }
}

/// 编辑器记录转换错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    #[error("unknown element type `{0}`")]
    UnknownKind(String),

    #[error("element `{id}` ({kind}) needs {expected} points, got {found}")]
    PointCount {
        id: String,
        kind: String,
        expected: &'static str,
        found: usize,
    },

    #[error("element `{id}` ({kind}) is missing `{field}`")]
    MissingField {
        id: String,
        kind: String,
        field: &'static str,
    },
}

/// 编辑器坐标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
}

impl From<RawPoint> for Point2 {
    fn from(p: RawPoint) -> Self {
        Point2::new(p.x, p.y)
    }
}

impl From<Point2> for RawPoint {
    fn from(p: Point2) -> Self {
        RawPoint { x: p.x, y: p.y }
    }
}

/// 编辑器传入的松散图元记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub points: Vec<RawPoint>,
    #[serde(default)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_elements: Option<Vec<RawElement>>,
    /// 均匀缩放
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// 非均匀缩放时的分量，优先于 `scale`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl RawElement {
    fn point_count_error(&self, expected: &'static str) -> ElementError {
        ElementError::PointCount {
            id: self.id.clone(),
            kind: self.kind.clone(),
            expected,
            found: self.points.len(),
        }
    }

    fn missing(&self, field: &'static str) -> ElementError {
        ElementError::MissingField {
            id: self.id.clone(),
            kind: self.kind.clone(),
            field,
        }
    }

    fn fixed<const N: usize>(&self, expected: &'static str) -> Result<[Point2; N], ElementError> {
        if self.points.len() != N {
            return Err(self.point_count_error(expected));
        }
        Ok(std::array::from_fn(|i| self.points[i].into()))
    }
}

impl TryFrom<&RawElement> for DrawingElement {
    type Error = ElementError;

    /// 块内无法转换的子图元被跳过，不影响块本身
    fn try_from(raw: &RawElement) -> Result<Self, Self::Error> {
        let geometry = match raw.kind.as_str() {
            "line" => {
                let [start, end] = raw.fixed::<2>("2")?;
                Geometry::Line(Line::new(start, end))
            }
            "rectangle" => {
                let [a, b] = raw.fixed::<2>("2")?;
                Geometry::Rectangle(Rectangle::new(a, b))
            }
            "circle" => {
                let [center, rim] = raw.fixed::<2>("2")?;
                Geometry::Circle(Circle::new(center, rim))
            }
            "arc" => {
                let [center, start, end] = raw.fixed::<3>("3")?;
                Geometry::Arc(Arc::new(center, start, end))
            }
            "polyline" => {
                if raw.points.len() < 2 {
                    return Err(raw.point_count_error("at least 2"));
                }
                Geometry::Polyline(Polyline::new(
                    raw.points.iter().map(|p| (*p).into()).collect(),
                    raw.closed.unwrap_or(false),
                ))
            }
            "text" => {
                let [position] = raw.fixed::<1>("1")?;
                let content = raw.text.clone().ok_or_else(|| raw.missing("text"))?;
                Geometry::Text(Text::new(position, content))
            }
            "dimension" | "linearDimension" => {
                let [p1, p2, witness1, witness2] = raw.fixed::<4>("4")?;
                Geometry::LinearDimension(LinearDimension {
                    p1,
                    p2,
                    witness1,
                    witness2,
                })
            }
            "angularDimension" => {
                let [vertex, first, second] = raw.fixed::<3>("3")?;
                let radius = raw.radius.ok_or_else(|| raw.missing("radius"))?;
                Geometry::AngularDimension(AngularDimension {
                    vertex,
                    first,
                    second,
                    radius,
                })
            }
            "radialDimension" => {
                let [center, point] = raw.fixed::<2>("2")?;
                Geometry::RadialDimension(RadialDimension { center, point })
            }
            "block" => {
                let [insertion] = raw.fixed::<1>("1")?;
                let children = raw
                    .block_elements
                    .as_ref()
                    .ok_or_else(|| raw.missing("blockElements"))?;
                let elements = children
                    .iter()
                    .filter_map(|child| DrawingElement::try_from(child).ok())
                    .collect();
                let uniform = raw.scale.unwrap_or(1.0);
                let scale_x = raw.scale_x.unwrap_or(uniform);
                let scale_y = raw.scale_y.unwrap_or(uniform);
                Geometry::Block(
                    Block::new(raw.block_name.clone().unwrap_or_default(), insertion, elements)
                        .with_scale(scale_x, scale_y)
                        .with_rotation(raw.rotation.unwrap_or(0.0)),
                )
            }
            other => return Err(ElementError::UnknownKind(other.to_string())),
        };

        Ok(DrawingElement {
            id: ElementId::new(raw.id.clone()),
            geometry,
            style: raw.style.clone(),
            layer: raw.layer.clone(),
        })
    }
}

impl From<&DrawingElement> for RawElement {
    fn from(element: &DrawingElement) -> Self {
        let mut raw = RawElement {
            id: element.id.to_string(),
            kind: element.kind().to_string(),
            points: element.points().into_iter().map(RawPoint::from).collect(),
            style: element.style.clone(),
            layer: element.layer.clone(),
            text: None,
            closed: None,
            radius: None,
            block_name: None,
            block_elements: None,
            scale: None,
            scale_x: None,
            scale_y: None,
            rotation: None,
        };

        match &element.geometry {
            Geometry::Polyline(pl) => raw.closed = Some(pl.closed),
            Geometry::AngularDimension(d) => raw.radius = Some(d.radius),
            Geometry::Block(b) => {
                raw.block_name = Some(b.name.clone());
                raw.block_elements = Some(b.elements.iter().map(RawElement::from).collect());
                if b.scale_x == b.scale_y {
                    raw.scale = Some(b.scale_x);
                } else {
                    raw.scale_x = Some(b.scale_x);
                    raw.scale_y = Some(b.scale_y);
                }
                raw.rotation = Some(b.rotation);
            }
            _ => {}
        }
        // 文本内容和标注文字都由几何给出；标注文字只作展示，回读时重新计算
        raw.text = element.geometry.label();
        raw
    }
}

/// 把编辑器记录批量转换为图元，无法转换的记录被跳过
pub fn convert_raw(records: &[RawElement]) -> (Vec<DrawingElement>, Vec<ElementError>) {
    let mut elements = Vec::with_capacity(records.len());
    let mut errors = Vec::new();
    for record in records {
        match DrawingElement::try_from(record) {
            Ok(element) => elements.push(element),
            Err(err) => errors.push(err),
        }
    }
    (elements, errors)
}
