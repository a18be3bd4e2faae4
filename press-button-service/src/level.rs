//! Electrical level to logical press level

use embedded_hal::digital::InputPin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Enum representing if the button is active low or active high.
pub enum ActiveState {
    /// Button is active low: pulled up, pressed pulls the line to ground.
    #[default]
    ActiveLow,
    /// Button is active high.
    ActiveHigh,
}

impl ActiveState {
    /// Reads the pin and returns `true` if the button is pressed.
    pub fn is_pressed<I: InputPin>(self, gpio: &mut I) -> Result<bool, I::Error> {
        match self {
            ActiveState::ActiveLow => gpio.is_low(),
            ActiveState::ActiveHigh => gpio.is_high(),
        }
    }
}
