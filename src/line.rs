//! Clock and data line abstraction.
//!
//! A line is either released (input, held high by the external pull-up
//! unless some device pulls it low) or driven (output) at a given level.

use embedded_hal::digital::v2::{InputPin, OutputPin, PinState};

/// Electrical direction of a line
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Released, high impedance
    Input,
    /// Driven, starting at the given level
    Output(PinState),
}

/// One bus line that can switch between input and output
pub trait Line {
    type Error;

    /// Switch direction. Switching to output drives the given level at once.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// Drive a level. Has no effect while the line is an input.
    fn set_level(&mut self, level: PinState) -> Result<(), Self::Error>;

    /// Sample the level currently on the wire.
    fn get_level(&self) -> Result<PinState, Self::Error>;
}

/// [`Line`] over a GPIO configured as an open-drain output.
///
/// Open-drain pins can only pull low, so releasing the line and driving it
/// high are the same thing electrically. The adapter tracks the requested
/// direction so that `set_level` is ignored while released.
pub struct OpenDrain<P> {
    pin: P,
    direction: Direction,
}

impl<P, E> OpenDrain<P>
where
    P: OutputPin<Error = E> + InputPin<Error = E>,
{
    /// Wrap a pin. The line starts released.
    pub fn new(mut pin: P) -> Result<Self, E> {
        pin.set_high()?;
        Ok(OpenDrain {
            pin,
            direction: Direction::Input,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Give back the pin
    pub fn free(self) -> P {
        self.pin
    }
}

impl<P, E> Line for OpenDrain<P>
where
    P: OutputPin<Error = E> + InputPin<Error = E>,
{
    type Error = E;

    fn set_direction(&mut self, direction: Direction) -> Result<(), E> {
        match direction {
            Direction::Input => self.pin.set_high()?,
            Direction::Output(level) => self.pin.set_state(level)?,
        }
        self.direction = direction;
        Ok(())
    }

    fn set_level(&mut self, level: PinState) -> Result<(), E> {
        if let Direction::Output(_) = self.direction {
            self.pin.set_state(level)?;
            self.direction = Direction::Output(level);
        }
        Ok(())
    }

    fn get_level(&self) -> Result<PinState, E> {
        self.pin.is_high().map(PinState::from)
    }
}
