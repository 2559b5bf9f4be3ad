pub mod app;
pub mod joystick_overlay;
