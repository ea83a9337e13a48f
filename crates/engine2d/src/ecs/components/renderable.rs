//! Renderer component and the drawable variants it holds
//!
//! A `Renderer` owns any number of named renderables. Each one is drawn at the
//! owning transform plus its own offset, ordered by layer and then priority.

use super::{Sprite, Transform};
use crate::ecs::component::Requirements;
use crate::ecs::Component;
use crate::foundation::math::{constants::UNIT_SIZE, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Offset subtracted from shape positions so a 64-unit tile is centred on its anchor
pub const SHAPE_ORIGIN_CORRECTION: f32 = UNIT_SIZE / 2.0;

/// Draw layers, painted from first to last
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum RenderLayer {
    /// Scenery behind everything else
    Background,
    /// Gameplay objects
    #[default]
    Foreground,
    /// Heads-up display
    Hud,
    /// Interface on top of everything
    Gui,
}

/// RGBA colour with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Fully transparent
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque colour
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour with alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Text label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Displayed string
    pub content: String,
    /// Font asset path; empty selects the default font
    pub font: String,
    /// Character size in pixels
    pub size: u32,
    /// Text colour
    pub color: Color,
}

impl Text {
    /// Create a label in the default font
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font: String::new(),
            size: 16,
            color: Color::WHITE,
        }
    }
}

/// Filled rectangle with an optional outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleShape {
    /// Full width
    pub width: f32,
    /// Full height
    pub height: f32,
    /// Fill colour
    pub fill: Color,
    /// Outline colour
    pub outline: Color,
    /// Outline thickness in pixels
    pub outline_thickness: f32,
}

impl RectangleShape {
    /// Solid rectangle without outline
    pub fn new(width: f32, height: f32, fill: Color) -> Self {
        Self {
            width,
            height,
            fill,
            outline: Color::TRANSPARENT,
            outline_thickness: 0.0,
        }
    }
}

/// Filled circle with an optional outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    /// Circle radius
    pub radius: f32,
    /// Fill colour
    pub fill: Color,
    /// Outline colour
    pub outline: Color,
    /// Outline thickness in pixels
    pub outline_thickness: f32,
}

impl CircleShape {
    /// Solid circle without outline
    pub fn new(radius: f32, fill: Color) -> Self {
        Self {
            radius,
            fill,
            outline: Color::TRANSPARENT,
            outline_thickness: 0.0,
        }
    }
}

/// What a renderable draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderableKind {
    /// Text label
    Text(Text),
    /// Rectangle shape
    Rectangle(RectangleShape),
    /// Circle shape
    Circle(CircleShape),
    /// Textured sprite
    Sprite(Sprite),
}

/// One drawable owned by a [`Renderer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    /// Layer the renderable is painted on
    pub layer: RenderLayer,

    /// Order inside the layer; lower values are painted first
    pub priority: i32,

    /// Pixel offset from the owning transform
    pub offset: Vec2,

    /// The drawable itself
    pub kind: RenderableKind,
}

impl Renderable {
    /// Create a renderable on the foreground layer at priority zero
    pub fn new(kind: RenderableKind) -> Self {
        Self {
            layer: RenderLayer::default(),
            priority: 0,
            offset: Vec2::zeros(),
            kind,
        }
    }

    /// Builder pattern: set layer
    pub fn on_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Builder pattern: set priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builder pattern: set offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Ordering key used by the render queue
    pub fn sort_key(&self) -> (RenderLayer, i32) {
        (self.layer, self.priority)
    }

    /// Amount subtracted from both axes of the draw position
    pub fn origin_correction(&self) -> f32 {
        match &self.kind {
            RenderableKind::Sprite(sprite) => sprite.origin_correction(),
            RenderableKind::Rectangle(_) | RenderableKind::Circle(_) => SHAPE_ORIGIN_CORRECTION,
            RenderableKind::Text(_) => 0.0,
        }
    }

    /// Final draw position for an owner at `transform`
    pub fn draw_position(&self, transform: &Transform) -> Vec2 {
        let correction = self.origin_correction();
        transform.position + self.offset - Vec2::new(correction, correction)
    }
}

/// Component holding every drawable of an entity, keyed by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Renderer {
    /// Named drawables
    pub assets: BTreeMap<String, Renderable>,

    /// Hidden renderers are skipped by the aggregator
    pub visible: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            assets: BTreeMap::new(),
            visible: true,
        }
    }
}

impl Component for Renderer {
    const NAME: &'static str = "Renderer";

    fn requirements(requirements: &mut Requirements) {
        requirements.require::<Transform>();
    }
}

impl Renderer {
    /// Builder pattern: add a named renderable
    pub fn with(mut self, name: impl Into<String>, renderable: Renderable) -> Self {
        self.assets.insert(name.into(), renderable);
        self
    }

    /// Add or replace a named renderable, returning the previous one
    pub fn insert(&mut self, name: impl Into<String>, renderable: Renderable) -> Option<Renderable> {
        self.assets.insert(name.into(), renderable)
    }

    /// Remove a named renderable
    pub fn remove(&mut self, name: &str) -> Option<Renderable> {
        self.assets.remove(name)
    }

    /// Look up a renderable by name
    pub fn get(&self, name: &str) -> Option<&Renderable> {
        self.assets.get(name)
    }

    /// Look up a renderable by name for mutation
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Renderable> {
        self.assets.get_mut(name)
    }

    /// Iterate over every sprite for animation
    pub fn sprites_mut(&mut self) -> impl Iterator<Item = (&str, &mut Sprite)> {
        self.assets.iter_mut().filter_map(|(name, renderable)| match &mut renderable.kind {
            RenderableKind::Sprite(sprite) => Some((name.as_str(), sprite)),
            _ => None,
        })
    }

    /// Number of renderables
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the renderer holds nothing
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
