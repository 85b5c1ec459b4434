pub mod clock;
pub mod controller;
pub mod input_adapter;
pub mod sweep;
pub mod trigger;

pub use clock::{Clock, FpsCounter, FrameInfo};
pub use controller::{Button, Channel, Controller, Velocities};
pub use input_adapter::WinitController;
pub use trigger::{Trigger, TriggerSet, TriggerZone, TRIGGER_ZONES};
