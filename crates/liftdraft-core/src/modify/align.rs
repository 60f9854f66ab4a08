//! 对齐

use super::Outcome;
use crate::element::DrawingElement;
use crate::math::{BoundingBox2, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    /// 水平居中：对齐 x 中心
    CenterH,
    /// 垂直居中：对齐 y 中心
    CenterV,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Top => "top",
            Alignment::Bottom => "bottom",
            Alignment::CenterH => "center-h",
            Alignment::CenterV => "center-v",
        }
    }

    /// 把 `own` 对齐到 `group` 所需的平移
    ///
    /// 坐标沿用编辑器画布约定：y 向下，`top` 对齐最小 y。
    fn offset(&self, own: &BoundingBox2, group: &BoundingBox2) -> Vector2 {
        match self {
            Alignment::Left => Vector2::new(group.min.x - own.min.x, 0.0),
            Alignment::Right => Vector2::new(group.max.x - own.max.x, 0.0),
            Alignment::Top => Vector2::new(0.0, group.min.y - own.min.y),
            Alignment::Bottom => Vector2::new(0.0, group.max.y - own.max.y),
            Alignment::CenterH => Vector2::new(group.center().x - own.center().x, 0.0),
            Alignment::CenterV => Vector2::new(0.0, group.center().y - own.center().y),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Alignment::Left),
            "right" => Ok(Alignment::Right),
            "top" => Ok(Alignment::Top),
            "bottom" => Ok(Alignment::Bottom),
            "center-h" => Ok(Alignment::CenterH),
            "center-v" => Ok(Alignment::CenterV),
            other => Err(format!("unknown alignment: {other}")),
        }
    }
}

/// 把每个图元的包围盒边或中心对齐到整组的包围盒
///
/// 少于两个图元时无事可做。
pub fn align_elements(
    elements: &[DrawingElement],
    alignment: Alignment,
) -> Outcome<Vec<DrawingElement>> {
    if elements.len() < 2 {
        return Outcome::Unchanged(elements.to_vec());
    }

    let group = elements
        .iter()
        .map(DrawingElement::bounding_box)
        .fold(BoundingBox2::empty(), |acc, bbox| acc.union(&bbox));
    if group.is_empty() {
        return Outcome::Unchanged(elements.to_vec());
    }

    Outcome::Applied(
        elements
            .iter()
            .map(|element| {
                let own = element.bounding_box();
                if own.is_empty() {
                    return element.clone();
                }
                let delta = alignment.offset(&own, &group);
                element.map_points(|p| p + delta)
            })
            .collect(),
    )
}
