//! A joystick simulated with on-screen controls.
//!
//! Buttons, sliders and hats drawn on a canvas turn pointer input into
//! joystick events, which a consumer polls from the device like it would
//! from a real one.

pub mod canvas;
pub mod config;
pub mod controls;
pub mod device;
pub mod geometry;
pub mod stick_view;
pub mod ui;
