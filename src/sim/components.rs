use bitflags::bitflags;

bitflags! {
    /// Logical actions held during one tic.  Key bindings live with the
    /// host; the simulation only sees these.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Buttons: u16 {
        const FORWARD      = 0x0001;
        const BACK         = 0x0002;
        const STRAFE_LEFT  = 0x0004;
        const STRAFE_RIGHT = 0x0008;
        const TURN_LEFT    = 0x0010;
        const TURN_RIGHT   = 0x0020;

        // modifiers
        /// Use the fast speed table.
        const RUN          = 0x0100;
        /// Turn keys strafe instead of rotating.
        const STRAFE       = 0x0200;
    }
}

/// One input sample, consumed by exactly one tic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputCmd {
    pub buttons: Buttons,
}

impl InputCmd {
    pub const IDLE: InputCmd = InputCmd {
        buttons: Buttons::empty(),
    };

    pub const fn new(buttons: Buttons) -> Self {
        Self { buttons }
    }

    #[inline]
    pub fn held(&self, b: Buttons) -> bool {
        self.buttons.contains(b)
    }
}

impl From<Buttons> for InputCmd {
    fn from(buttons: Buttons) -> Self {
        Self { buttons }
    }
}
