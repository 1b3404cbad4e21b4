use serde::{Deserialize, Serialize};

use crate::config::{MAX_PEN_SIZE, MAX_RECT_CURVE, MIN_PEN_SIZE, MIN_RECT_CURVE};
use crate::tools::style::{CapStyle, DrawType, FillMode, JoinStyle, LineStyle, ShapeType};

/// Identifies one control of the per-tool configuration dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingKey {
    PenCap,
    PenWidth,
    EraserWidth,
    LineStyle,
    LineCap,
    LineDrawType,
    LineWidth,
    ShapeLineStyle,
    ShapeType,
    ShapeFill,
    ShapeJoin,
    ShapeWidth,
    ShapeCurve,
}

/// A typed configuration change for one tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolSetting {
    PenCap(CapStyle),
    PenWidth(u32),
    EraserWidth(u32),
    LineStyle(LineStyle),
    LineCap(CapStyle),
    LineDrawType(DrawType),
    LineWidth(u32),
    ShapeLineStyle(LineStyle),
    ShapeType(ShapeType),
    ShapeFill(FillMode),
    ShapeJoin(JoinStyle),
    ShapeWidth(u32),
    ShapeCurve(u32),
}

fn width(value: i32) -> u32 {
    value.clamp(MIN_PEN_SIZE as i32, MAX_PEN_SIZE as i32) as u32
}

impl ToolSetting {
    /// Decode a dialog value. Enumerated settings with an unknown code give
    /// `None`; numeric settings are clamped into range.
    pub fn decode(key: SettingKey, value: i32) -> Option<Self> {
        let setting = match key {
            SettingKey::PenCap => Self::PenCap(CapStyle::from_code(value)?),
            SettingKey::PenWidth => Self::PenWidth(width(value)),
            SettingKey::EraserWidth => Self::EraserWidth(width(value)),
            SettingKey::LineStyle => Self::LineStyle(LineStyle::from_code(value)?),
            SettingKey::LineCap => Self::LineCap(CapStyle::from_code(value)?),
            SettingKey::LineDrawType => Self::LineDrawType(DrawType::from_code(value)?),
            SettingKey::LineWidth => Self::LineWidth(width(value)),
            SettingKey::ShapeLineStyle => Self::ShapeLineStyle(LineStyle::from_code(value)?),
            SettingKey::ShapeType => Self::ShapeType(ShapeType::from_code(value)?),
            SettingKey::ShapeFill => Self::ShapeFill(FillMode::from_code(value)?),
            SettingKey::ShapeJoin => Self::ShapeJoin(JoinStyle::from_code(value)?),
            SettingKey::ShapeWidth => Self::ShapeWidth(width(value)),
            SettingKey::ShapeCurve => {
                Self::ShapeCurve(value.clamp(MIN_RECT_CURVE as i32, MAX_RECT_CURVE as i32) as u32)
            }
        };
        Some(setting)
    }

    pub fn key(self) -> SettingKey {
        match self {
            Self::PenCap(_) => SettingKey::PenCap,
            Self::PenWidth(_) => SettingKey::PenWidth,
            Self::EraserWidth(_) => SettingKey::EraserWidth,
            Self::LineStyle(_) => SettingKey::LineStyle,
            Self::LineCap(_) => SettingKey::LineCap,
            Self::LineDrawType(_) => SettingKey::LineDrawType,
            Self::LineWidth(_) => SettingKey::LineWidth,
            Self::ShapeLineStyle(_) => SettingKey::ShapeLineStyle,
            Self::ShapeType(_) => SettingKey::ShapeType,
            Self::ShapeFill(_) => SettingKey::ShapeFill,
            Self::ShapeJoin(_) => SettingKey::ShapeJoin,
            Self::ShapeWidth(_) => SettingKey::ShapeWidth,
            Self::ShapeCurve(_) => SettingKey::ShapeCurve,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_codes_are_ignored() {
        assert_eq!(ToolSetting::decode(SettingKey::PenCap, 3), None);
        assert_eq!(ToolSetting::decode(SettingKey::ShapeFill, -1), None);
        assert_eq!(
            ToolSetting::decode(SettingKey::LineStyle, 4),
            Some(ToolSetting::LineStyle(LineStyle::DashDotDot))
        );
    }

    #[test]
    fn test_numeric_values_are_clamped() {
        assert_eq!(ToolSetting::decode(SettingKey::PenWidth, 0), Some(ToolSetting::PenWidth(1)));
        assert_eq!(ToolSetting::decode(SettingKey::EraserWidth, 99), Some(ToolSetting::EraserWidth(50)));
        assert_eq!(ToolSetting::decode(SettingKey::ShapeCurve, 150), Some(ToolSetting::ShapeCurve(100)));
        assert_eq!(ToolSetting::decode(SettingKey::ShapeCurve, 0), Some(ToolSetting::ShapeCurve(0)));
    }

    #[test]
    fn test_key_matches_decoded_setting() {
        let setting = ToolSetting::decode(SettingKey::ShapeJoin, 2).unwrap();
        assert_eq!(setting, ToolSetting::ShapeJoin(JoinStyle::Round));
        assert_eq!(setting.key(), SettingKey::ShapeJoin);
    }
}
