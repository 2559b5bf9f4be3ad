pub mod joystick;
pub mod relocator;
pub mod tracker;
pub mod translator;

pub use joystick::JoystickController;
pub use relocator::HoldTicket;
