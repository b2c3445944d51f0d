//!
//! C ABI for the tick clock
//!
//! ```c
//! osd_ticks_t start = osd_ticks();
//! osd_sleep(osd_ticks_per_second() / 60);
//! ```
//!

use osd_core::Ticks;

use crate::TickClock;

#[unsafe(no_mangle)]
pub extern "C" fn osd_ticks() -> Ticks {
    TickClock::now()
}

#[unsafe(no_mangle)]
pub extern "C" fn osd_ticks_per_second() -> Ticks {
    TickClock::ticks_per_second()
}

#[unsafe(no_mangle)]
pub extern "C" fn osd_sleep(duration: Ticks) {
    TickClock::sleep(duration);
}
