//! Cross-module tests of the frame pipeline
