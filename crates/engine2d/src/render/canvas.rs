//! Draw targets

use super::DrawCommand;

/// Anything that can consume draw commands in paint order
pub trait Canvas {
    /// Called once before the first command of a frame
    fn begin_frame(&mut self) {}

    /// Draw one command
    fn draw(&mut self, command: &DrawCommand);

    /// Called once after the last command of a frame
    fn end_frame(&mut self) {}
}

/// Canvas that records every command it receives
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl CommandList {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last clear, in paint order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Names of the recorded commands, in paint order
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|command| command.name.as_str()).collect()
    }

    /// Number of frames that have been started
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Forget recorded commands
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for CommandList {
    fn begin_frame(&mut self) {
        self.frames += 1;
        self.commands.clear();
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.commands.push(command.clone());
    }
}
