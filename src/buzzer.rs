//! Blocking alarm signal.

use crate::config::BuzzerPattern;
use crate::display::FrontPanel;
use embedded_hal::delay::DelayNs;

/// Sounds the alarm pattern, blocking for its whole duration.
///
/// Blanks the display, toggles the buzzer `pattern.toggles` times with
/// `pattern.interval_us` between toggles, then forces the buzzer off. Nothing
/// else is serviced while this runs.
pub fn sound<P: FrontPanel, D: DelayNs>(panel: &mut P, delay: &mut D, pattern: BuzzerPattern) {
    panel.blank_digits();

    let mut level = false;
    for _ in 0..pattern.toggles {
        level = !level;
        panel.set_buzzer(level);
        delay.delay_us(pattern.interval_us);
    }

    panel.set_buzzer(false);
}
