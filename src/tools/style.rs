//! Stroke and shape attributes shared by the tools.
//!
//! Every enum here round-trips through the integer codes the configuration
//! dialogs use; unknown codes decode to `None` and are ignored by callers.

use serde::{Deserialize, Serialize};

macro_rules! coded_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn code(self) -> i32 {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }
    };
}

coded_enum!(
    /// How the open ends of a segment are finished
    CapStyle { Flat = 0, Square = 1, Round = 2 }
);

coded_enum!(
    /// Dash pattern of a stroke
    LineStyle { Solid = 0, Dashed = 1, Dotted = 2, DashDot = 3, DashDotDot = 4 }
);

coded_enum!(
    /// How outline corners are finished
    JoinStyle { Miter = 0, Bevel = 1, Round = 2 }
);

coded_enum!(
    /// Single segment per gesture, or a chained poly-line
    DrawType { Single = 0, Poly = 1 }
);

coded_enum!(
    ShapeType { Rectangle = 0, RoundedRectangle = 1, Ellipse = 2 }
);

coded_enum!(
    /// Which palette color fills a shape
    FillMode { Foreground = 0, Background = 1, NoFill = 2 }
);

impl LineStyle {
    /// On/off lengths in units of the stroke width; empty means solid
    pub fn pattern(self) -> &'static [f32] {
        match self {
            LineStyle::Solid => &[],
            LineStyle::Dashed => &[4.0, 2.0],
            LineStyle::Dotted => &[1.0, 2.0],
            LineStyle::DashDot => &[4.0, 2.0, 1.0, 2.0],
            LineStyle::DashDotDot => &[4.0, 2.0, 1.0, 2.0, 1.0, 2.0],
        }
    }

    /// Whether the stroke is inked at `distance` pixels along its path
    pub fn is_on(self, distance: f32, width: f32) -> bool {
        let pattern = self.pattern();
        if pattern.is_empty() {
            return true;
        }
        let unit = width.max(1.0);
        let period: f32 = pattern.iter().sum::<f32>() * unit;
        let mut offset = distance.rem_euclid(period);
        for (i, len) in pattern.iter().enumerate() {
            let len = len * unit;
            if offset < len {
                return i % 2 == 0;
            }
            offset -= len;
        }
        false
    }

    pub fn label(self) -> &'static str {
        match self {
            LineStyle::Solid => "Solid",
            LineStyle::Dashed => "Dashed",
            LineStyle::Dotted => "Dotted",
            LineStyle::DashDot => "Dash-dot",
            LineStyle::DashDotDot => "Dash-dot-dot",
        }
    }
}

impl CapStyle {
    pub fn label(self) -> &'static str {
        match self {
            CapStyle::Flat => "Flat",
            CapStyle::Square => "Square",
            CapStyle::Round => "Round",
        }
    }
}

impl JoinStyle {
    pub fn label(self) -> &'static str {
        match self {
            JoinStyle::Miter => "Miter",
            JoinStyle::Bevel => "Bevel",
            JoinStyle::Round => "Round",
        }
    }
}

impl DrawType {
    pub fn label(self) -> &'static str {
        match self {
            DrawType::Single => "Single",
            DrawType::Poly => "Poly",
        }
    }
}

impl ShapeType {
    pub fn label(self) -> &'static str {
        match self {
            ShapeType::Rectangle => "Rectangle",
            ShapeType::RoundedRectangle => "Rounded rectangle",
            ShapeType::Ellipse => "Ellipse",
        }
    }
}

impl FillMode {
    pub fn label(self) -> &'static str {
        match self {
            FillMode::Foreground => "Foreground",
            FillMode::Background => "Background",
            FillMode::NoFill => "No fill",
        }
    }
}

/// Pen attributes of a tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub width: u32,
    pub cap: CapStyle,
    pub join: JoinStyle,
    pub line: LineStyle,
}

impl StrokeStyle {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            cap: CapStyle::Round,
            join: JoinStyle::Bevel,
            line: LineStyle::Solid,
        }
    }

    /// Distance from the stroke's center line that still gets ink
    pub fn half_width(&self) -> f32 {
        (self.width as f32 / 2.0).max(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_and_reject_unknown() {
        for cap in CapStyle::ALL {
            assert_eq!(CapStyle::from_code(cap.code()), Some(*cap));
        }
        assert_eq!(FillMode::from_code(2), Some(FillMode::NoFill));
        assert_eq!(ShapeType::from_code(7), None);
        assert_eq!(LineStyle::from_code(-1), None);
    }

    #[test]
    fn test_dash_pattern_scales_with_width() {
        // dashed, width 1: on for [0,4), off for [4,6)
        assert!(LineStyle::Dashed.is_on(0.0, 1.0));
        assert!(LineStyle::Dashed.is_on(3.5, 1.0));
        assert!(!LineStyle::Dashed.is_on(4.5, 1.0));
        assert!(LineStyle::Dashed.is_on(6.0, 1.0));

        // width 2 doubles every run
        assert!(LineStyle::Dashed.is_on(7.0, 2.0));
        assert!(!LineStyle::Dashed.is_on(9.0, 2.0));
    }

    #[test]
    fn test_solid_always_on() {
        assert!(LineStyle::Solid.is_on(123.4, 3.0));
    }
}
