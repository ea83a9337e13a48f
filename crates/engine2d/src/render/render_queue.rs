//! # Render Queue
//!
//! Min-first priority queue of draw commands. Commands come out in ascending
//! `(layer, priority)` order; commands with equal keys have no guaranteed
//! relative order.

use super::{Canvas, RenderError, RenderResult};
use crate::ecs::components::{RenderLayer, RenderableKind};
use crate::ecs::Entity;
use crate::foundation::math::Vec2;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Everything a canvas needs to draw one renderable
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Entity owning the renderer
    pub entity: Entity,
    /// Name of the renderable inside its renderer
    pub name: String,
    /// Paint layer
    pub layer: RenderLayer,
    /// Order inside the layer
    pub priority: i32,
    /// Final draw position, origin correction applied
    pub position: Vec2,
    /// Owner rotation in degrees
    pub rotation: f32,
    /// What to draw
    pub kind: RenderableKind,
}

impl DrawCommand {
    /// Ordering key
    pub fn sort_key(&self) -> (RenderLayer, i32) {
        (self.layer, self.priority)
    }
}

#[derive(Debug)]
struct QueuedCommand {
    key: (RenderLayer, i32),
    sequence: u64,
    command: DrawCommand,
}

impl PartialEq for QueuedCommand {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedCommand {}

impl PartialOrd for QueuedCommand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedCommand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Collection of draw commands ordered for painting
#[derive(Debug, Default)]
pub struct RenderQueue {
    heap: BinaryHeap<Reverse<QueuedCommand>>,
    next_sequence: u64,
}

impl RenderQueue {
    /// Create a new empty render queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a render queue with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Add a draw command
    pub fn push(&mut self, command: DrawCommand) {
        let queued = QueuedCommand {
            key: command.sort_key(),
            sequence: self.next_sequence,
            command,
        };
        self.next_sequence += 1;
        self.heap.push(Reverse(queued));
    }

    /// Remove and return the command that paints first
    pub fn pop(&mut self) -> Option<DrawCommand> {
        self.heap.pop().map(|Reverse(queued)| queued.command)
    }

    /// Command that paints first, without removing it
    pub fn peek(&self) -> Option<&DrawCommand> {
        self.heap.peek().map(|Reverse(queued)| &queued.command)
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every queued command
    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_sequence = 0;
    }

    /// Pop every command in paint order into a vector
    pub fn drain_sorted(&mut self) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(self.len());
        while let Some(command) = self.pop() {
            commands.push(command);
        }
        self.next_sequence = 0;
        commands
    }

    /// Pop and draw every command until the queue is empty.
    ///
    /// Returns the number of commands drawn. Without a canvas nothing is
    /// drawn, the queue is left untouched and [`RenderError::NoCanvas`] is
    /// returned.
    pub fn draw_all(&mut self, canvas: Option<&mut dyn Canvas>) -> RenderResult<usize> {
        let canvas = canvas.ok_or(RenderError::NoCanvas)?;

        canvas.begin_frame();
        let mut drawn = 0;
        while let Some(command) = self.pop() {
            canvas.draw(&command);
            drawn += 1;
        }
        canvas.end_frame();
        self.next_sequence = 0;
        Ok(drawn)
    }
}
