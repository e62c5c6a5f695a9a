//! Debug overlay composition
//!
//! The overlay is described as plain data so any host can draw it; nothing
//! here touches a graphics API.

use winit::keyboard::KeyCode;

use super::debug::DebugInfo;
use crate::entity::EntityManager;
use crate::input::Input;
use crate::math::{Vector2D, rotate_about};

/// Marker radius in pixels
const MARKER_RADIUS: f32 = 2.0;

/// Colors the overlay draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayColor {
    Black,
    Red,
    Green,
    Blue,
    Yellow,
    White,
}

/// A single primitive in the overlay
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayShape {
    /// Filled dot
    Marker {
        center: Vector2D,
        radius: f32,
        color: OverlayColor,
    },
    /// Straight segment
    Line {
        from: Vector2D,
        to: Vector2D,
        color: OverlayColor,
    },
    /// Closed polygon outline
    Outline {
        points: Vec<Vector2D>,
        color: OverlayColor,
    },
}

impl OverlayShape {
    #[must_use]
    pub fn color(&self) -> OverlayColor {
        match self {
            Self::Marker { color, .. } | Self::Line { color, .. } | Self::Outline { color, .. } => {
                *color
            }
        }
    }
}

/// Everything the overlay wants drawn this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayFrame {
    /// Text lines, top to bottom
    pub lines: Vec<String>,
    /// Shapes in draw order
    pub shapes: Vec<OverlayShape>,
}

impl OverlayFrame {
    /// Shapes drawn in `color`
    pub fn shapes_colored(&self, color: OverlayColor) -> impl Iterator<Item = &OverlayShape> {
        self.shapes.iter().filter(move |shape| shape.color() == color)
    }
}

/// Builds an [`OverlayFrame`] from borrowed engine state.
///
/// Holding `B` adds per-entity geometry and collision areas. Holding `O`
/// outlines the viewport.
pub struct DebugOverlay<'a> {
    entities: &'a EntityManager,
    input: &'a Input,
    debug: &'a DebugInfo,
    viewport: Vector2D,
    boxes_key: KeyCode,
    viewport_key: KeyCode,
}

impl<'a> DebugOverlay<'a> {
    #[must_use]
    pub fn new(
        entities: &'a EntityManager,
        input: &'a Input,
        debug: &'a DebugInfo,
        viewport: Vector2D,
    ) -> Self {
        Self {
            entities,
            input,
            debug,
            viewport,
            boxes_key: KeyCode::KeyB,
            viewport_key: KeyCode::KeyO,
        }
    }

    /// Use different keys for the box and viewport layers
    #[must_use]
    pub fn with_keys(mut self, boxes: KeyCode, viewport: KeyCode) -> Self {
        self.boxes_key = boxes;
        self.viewport_key = viewport;
        self
    }

    /// Compose the frame
    #[must_use]
    pub fn compose(&self) -> OverlayFrame {
        let mut frame = OverlayFrame {
            lines: self.text_lines(),
            shapes: Vec::new(),
        };

        if self.input.is_key_down(self.boxes_key) {
            self.entity_shapes(&mut frame.shapes);
            self.collision_shapes(&mut frame.shapes);
        }

        if self.input.is_key_down(self.viewport_key) {
            frame.shapes.push(OverlayShape::Outline {
                points: vec![
                    Vector2D::ZERO,
                    Vector2D::new(self.viewport.x, 0.0),
                    self.viewport,
                    Vector2D::new(0.0, self.viewport.y),
                ],
                color: OverlayColor::White,
            });
        }

        frame
    }

    fn text_lines(&self) -> Vec<String> {
        let relative = self.input.mouse_relative();
        let absolute = self.input.mouse_absolute();
        let keys: Vec<String> = self
            .input
            .keys_down()
            .iter()
            .map(|key| format!("{key:?}"))
            .collect();

        let mut lines = vec![
            format!("FPS: {:.0}", self.debug.frame_stats.rate()),
            format!("TPS: {:.0}", self.debug.tick_stats.rate()),
            format!("Mouse (relative): {:.0}, {:.0}", relative.x, relative.y),
            format!("Mouse (absolute): {:.0}, {:.0}", absolute.x, absolute.y),
            format!("Keys pressed: {}", keys.join(", ")),
        ];
        lines.extend(self.debug.custom_lines().iter().cloned());
        lines
    }

    fn entity_shapes(&self, shapes: &mut Vec<OverlayShape>) {
        let pointer = self.input.mouse_relative();

        for handle in self.entities.entities() {
            let object = handle.borrow();
            let entity = object.entity();
            let bbox = entity.bounding_box();
            let pivot = entity.world_center_of_mass();

            shapes.push(OverlayShape::Marker {
                center: bbox.center(),
                radius: MARKER_RADIUS,
                color: OverlayColor::Yellow,
            });
            shapes.push(OverlayShape::Marker {
                center: pivot,
                radius: MARKER_RADIUS,
                color: OverlayColor::Blue,
            });
            shapes.push(OverlayShape::Line {
                from: rotate_about(entity.location(), pivot, entity.rotation()),
                to: pivot,
                color: OverlayColor::Red,
            });

            let color = if bbox.is_inside(pointer) {
                OverlayColor::Green
            } else {
                OverlayColor::Black
            };
            shapes.push(OverlayShape::Outline {
                points: bbox.corners().to_vec(),
                color,
            });
        }
    }

    fn collision_shapes(&self, shapes: &mut Vec<OverlayShape>) {
        for collision in self.entities.collisions() {
            let points = collision.area().points();
            let shape = match points {
                [] => continue,
                [point] => OverlayShape::Marker {
                    center: *point,
                    radius: MARKER_RADIUS,
                    color: OverlayColor::Red,
                },
                _ => OverlayShape::Outline {
                    points: points.to_vec(),
                    color: OverlayColor::Red,
                },
            };
            shapes.push(shape);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityBuilder, shared};
    use winit::event::ElementState;

    fn manager_with_overlap() -> EntityManager {
        let mut manager = EntityManager::new();
        for (x, y) in [(0.0, 0.0), (5.0, 5.0)] {
            let entity = EntityBuilder::new().at(x, y).with_size(10.0, 10.0).build().unwrap();
            manager.register(shared(entity));
        }
        manager.update(0.0);
        manager
    }

    #[test]
    fn test_text_only_without_keys() {
        let manager = manager_with_overlap();
        let input = Input::new();
        let mut debug = DebugInfo::new();
        debug.add_line("score: 3");

        let frame = DebugOverlay::new(&manager, &input, &debug, Vector2D::new(800.0, 600.0)).compose();
        assert!(frame.shapes.is_empty());
        assert!(frame.lines[0].starts_with("FPS"));
        assert!(frame.lines[1].starts_with("TPS"));
        assert_eq!(frame.lines.last().map(String::as_str), Some("score: 3"));
    }

    #[test]
    fn test_box_layer() {
        let manager = manager_with_overlap();
        let mut input = Input::new();
        input.process_keyboard(KeyCode::KeyB, ElementState::Pressed);
        input.process_mouse_motion(Vector2D::new(2.0, 2.0));
        let debug = DebugInfo::new();

        let frame = DebugOverlay::new(&manager, &input, &debug, Vector2D::new(800.0, 600.0)).compose();

        assert_eq!(frame.shapes_colored(OverlayColor::Yellow).count(), 2);
        assert_eq!(frame.shapes_colored(OverlayColor::Blue).count(), 2);
        // Pointer is inside only the first box
        assert_eq!(frame.shapes_colored(OverlayColor::Green).count(), 1);
        assert_eq!(frame.shapes_colored(OverlayColor::Black).count(), 1);
        // Two pivot lines plus one collision polygon
        assert_eq!(frame.shapes_colored(OverlayColor::Red).count(), 3);
        assert!(frame.lines.iter().any(|line| line.contains("KeyB")));
    }

    #[test]
    fn test_viewport_layer_with_custom_key() {
        let manager = EntityManager::new();
        let mut input = Input::new();
        input.process_keyboard(KeyCode::KeyV, ElementState::Pressed);
        let debug = DebugInfo::new();

        let frame = DebugOverlay::new(&manager, &input, &debug, Vector2D::new(320.0, 240.0))
            .with_keys(KeyCode::KeyX, KeyCode::KeyV)
            .compose();

        assert_eq!(
            frame.shapes,
            vec![OverlayShape::Outline {
                points: vec![
                    Vector2D::ZERO,
                    Vector2D::new(320.0, 0.0),
                    Vector2D::new(320.0, 240.0),
                    Vector2D::new(0.0, 240.0),
                ],
                color: OverlayColor::White,
            }]
        );
    }
}
