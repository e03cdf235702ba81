//! Food catalogue
//!
//! Each kind maps to a physics shape and material plus the glyph used for
//! its DOM sprite. Shapes are in pixels, centred on the body origin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Food kinds offered by the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Apple,
    Cookie,
    Cheese,
    Toast,
    Candy,
}

/// Collision shape primitive
#[derive(Debug, Clone, PartialEq)]
pub enum FoodShape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
    /// Convex polygon around the origin
    Polygon { points: Vec<Vec2> },
}

impl FoodShape {
    /// Axis-aligned size of the sprite box that covers the shape
    pub fn extent(&self) -> Vec2 {
        match self {
            FoodShape::Circle { radius } => Vec2::splat(radius * 2.0),
            FoodShape::Rect { width, height } => Vec2::new(*width, *height),
            FoodShape::Polygon { points } => {
                let max = points
                    .iter()
                    .fold(Vec2::ZERO, |acc, p| acc.max(p.abs()));
                max * 2.0
            }
        }
    }
}

/// Everything needed to spawn one food body
#[derive(Debug, Clone, PartialEq)]
pub struct FoodTemplate {
    pub kind: FoodKind,
    pub shape: FoodShape,
    pub restitution: f32,
    pub friction: f32,
    /// Sprite text
    pub glyph: &'static str,
}

impl FoodKind {
    pub const ALL: [FoodKind; 5] = [
        FoodKind::Apple,
        FoodKind::Cookie,
        FoodKind::Cheese,
        FoodKind::Toast,
        FoodKind::Candy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodKind::Apple => "apple",
            FoodKind::Cookie => "cookie",
            FoodKind::Cheese => "cheese",
            FoodKind::Toast => "toast",
            FoodKind::Candy => "candy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "apple" => Some(FoodKind::Apple),
            "cookie" => Some(FoodKind::Cookie),
            "cheese" => Some(FoodKind::Cheese),
            "toast" => Some(FoodKind::Toast),
            "candy" => Some(FoodKind::Candy),
            _ => None,
        }
    }

    pub fn template(&self) -> FoodTemplate {
        match self {
            FoodKind::Apple => FoodTemplate {
                kind: *self,
                shape: FoodShape::Circle { radius: 18.0 },
                restitution: 0.5,
                friction: 0.4,
                glyph: "🍎",
            },
            FoodKind::Cookie => FoodTemplate {
                kind: *self,
                shape: FoodShape::Circle { radius: 22.0 },
                restitution: 0.2,
                friction: 0.8,
                glyph: "🍪",
            },
            FoodKind::Cheese => FoodTemplate {
                kind: *self,
                shape: FoodShape::Polygon {
                    points: vec![
                        Vec2::new(-22.0, 12.0),
                        Vec2::new(22.0, 12.0),
                        Vec2::new(0.0, -24.0),
                    ],
                },
                restitution: 0.1,
                friction: 0.9,
                glyph: "🧀",
            },
            FoodKind::Toast => FoodTemplate {
                kind: *self,
                shape: FoodShape::Rect {
                    width: 44.0,
                    height: 36.0,
                },
                restitution: 0.15,
                friction: 0.7,
                glyph: "🍞",
            },
            FoodKind::Candy => FoodTemplate {
                kind: *self,
                shape: FoodShape::Polygon {
                    points: hexagon(16.0),
                },
                restitution: 0.8,
                friction: 0.2,
                glyph: "🍬",
            },
        }
    }
}

fn hexagon(radius: f32) -> Vec<Vec2> {
    (0..6)
        .map(|i| {
            let theta = i as f32 * std::f32::consts::TAU / 6.0;
            Vec2::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in FoodKind::ALL {
            assert_eq!(FoodKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(FoodKind::from_str("APPLE"), Some(FoodKind::Apple));
        assert_eq!(FoodKind::from_str("broccoli"), None);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&FoodKind::Cheese).unwrap();
        assert_eq!(json, "\"cheese\"");
    }

    #[test]
    fn test_templates_are_sane() {
        for kind in FoodKind::ALL {
            let t = kind.template();
            assert_eq!(t.kind, kind);
            assert!((0.0..=1.0).contains(&t.restitution));
            assert!(t.friction >= 0.0);
            let extent = t.shape.extent();
            assert!(extent.x > 0.0 && extent.y > 0.0, "{kind:?} has empty extent");
        }
    }

    #[test]
    fn test_polygons_centred_on_body_origin() {
        for kind in FoodKind::ALL {
            if let FoodShape::Polygon { points } = kind.template().shape {
                let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
                assert!(centroid.length() < 1e-3, "{kind:?} centroid at {centroid:?}");
            }
        }
    }

    #[test]
    fn test_shape_extent() {
        assert_eq!(FoodShape::Circle { radius: 5.0 }.extent(), Vec2::new(10.0, 10.0));
        let hex = FoodShape::Polygon { points: hexagon(16.0) };
        let extent = hex.extent();
        assert!((extent.x - 32.0).abs() < 1e-3);
        assert!(extent.y < 32.0);
    }
}
