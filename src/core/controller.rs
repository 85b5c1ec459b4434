/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyQ,
    KeyE,
    Escape,
}

/// Camera motion channel a button drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Dolly,
    Truck,
    Pan,
}

impl Button {
    /// Channel and sign this button sets while held, if any
    pub fn binding(self) -> Option<(Channel, f32)> {
        match self {
            Button::Up | Button::KeyW => Some((Channel::Dolly, 1.0)),
            Button::Down | Button::KeyS => Some((Channel::Dolly, -1.0)),
            Button::Left | Button::KeyA => Some((Channel::Pan, -1.0)),
            Button::Right | Button::KeyD => Some((Channel::Pan, 1.0)),
            Button::KeyQ => Some((Channel::Truck, -1.0)),
            Button::KeyE => Some((Channel::Truck, 1.0)),
            Button::Escape => None,
        }
    }
}

/// Signed per-channel camera velocities
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocities {
    pub dolly: f32,
    pub truck: f32,
    pub pan: f32,
}

impl Velocities {
    pub fn new(dolly: f32, truck: f32, pan: f32) -> Self {
        Self { dolly, truck, pan }
    }

    pub fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Dolly => self.dolly,
            Channel::Truck => self.truck,
            Channel::Pan => self.pan,
        }
    }

    pub fn set(&mut self, channel: Channel, value: f32) {
        match channel {
            Channel::Dolly => self.dolly = value,
            Channel::Truck => self.truck = value,
            Channel::Pan => self.pan = value,
        }
    }
}

/// Controller - exposes the current camera velocities
pub trait Controller {
    fn velocities(&self) -> Velocities;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_and_letter_aliases_share_bindings() {
        assert_eq!(Button::Up.binding(), Button::KeyW.binding());
        assert_eq!(Button::Down.binding(), Button::KeyS.binding());
        assert_eq!(Button::Left.binding(), Button::KeyA.binding());
        assert_eq!(Button::Right.binding(), Button::KeyD.binding());
    }

    #[test]
    fn test_truck_has_dedicated_keys() {
        assert_eq!(Button::KeyQ.binding(), Some((Channel::Truck, -1.0)));
        assert_eq!(Button::KeyE.binding(), Some((Channel::Truck, 1.0)));
    }

    #[test]
    fn test_escape_drives_no_channel() {
        assert_eq!(Button::Escape.binding(), None);
    }

    #[test]
    fn test_velocity_channels_are_independent() {
        let mut v = Velocities::default();
        v.set(Channel::Pan, -1.0);
        assert_eq!(v, Velocities::new(0.0, 0.0, -1.0));
        assert_eq!(v.get(Channel::Pan), -1.0);
        assert_eq!(v.get(Channel::Dolly), 0.0);
    }

    // Test mock controller implementation
    struct MockController {
        velocities: Velocities,
    }

    impl Controller for MockController {
        fn velocities(&self) -> Velocities {
            self.velocities
        }
    }

    #[test]
    fn test_controller_trait_object() {
        let controller = MockController {
            velocities: Velocities::new(1.0, 0.0, -1.0),
        };
        let dynamic: &dyn Controller = &controller;
        assert_eq!(dynamic.velocities().dolly, 1.0);
        assert_eq!(dynamic.velocities().pan, -1.0);
    }
}
