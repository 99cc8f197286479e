//! Fixed-layout status frame composition for a 7-color e-paper panel.
//!
//! The crate is draw-target agnostic: anything implementing
//! `embedded_graphics::DrawTarget` over a [`color::Palette`] color can
//! receive a frame, from the in-memory [`frame::Frame`] to a simulator
//! window.

pub mod color;
pub mod frame;
pub mod icons;
pub mod mapper;
pub mod model;
pub mod renderer;

pub use color::{Palette, PanelColor};
pub use frame::Frame;
pub use model::RenderModel;
pub use renderer::Renderer;
