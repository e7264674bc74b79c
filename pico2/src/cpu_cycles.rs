//! Cortex-M33 DWT cycle counter.
//!
//! The 32-bit CYCCNT wraps every 2^32 cycles (about 28.6 s at 150 MHz, 15.3 s at
//! 280 MHz). Row renders take well under a millisecond, so `wrapping_sub` is
//! enough; anything above [`MAX_SANE_CYCLES`] is treated as a bad sample.

use crate::config::CPU_FREQ_HZ;

/// Half a second at the fastest profile. Longer intervals are rejected.
pub const MAX_SANE_CYCLES: u32 = 140_000_000;

/// Enable the cycle counter. Idempotent, call after `embassy_rp::init`.
pub fn init() {
    // DEMCR.TRCENA (bit 24) first, then DWT.CTRL.CYCCNTENA (bit 0)
    #[cfg(target_arch = "arm")]
    unsafe {
        use core::ptr::{read_volatile, write_volatile};

        const DEMCR: *mut u32 = 0xE000_EDFC as *mut u32;
        const DWT_CTRL: *mut u32 = 0xE000_1000 as *mut u32;
        write_volatile(DEMCR, read_volatile(DEMCR) | (1 << 24));
        write_volatile(DWT_CTRL, read_volatile(DWT_CTRL) | 1);
    }
}

/// Current CYCCNT value. Always 0 off-target.
#[inline]
pub fn read() -> u32 {
    #[cfg(target_arch = "arm")]
    unsafe {
        const DWT_CYCCNT: *const u32 = 0xE000_1004 as *const u32;
        core::ptr::read_volatile(DWT_CYCCNT)
    }
    #[cfg(not(target_arch = "arm"))]
    {
        0
    }
}

/// Cycles between two reads, `None` if the interval is implausibly long.
#[inline]
pub const fn elapsed(
    start: u32,
    end: u32,
) -> Option<u32> {
    let cycles = end.wrapping_sub(start);
    if cycles > MAX_SANE_CYCLES { None } else { Some(cycles) }
}

/// Convert cycles to microseconds at [`CPU_FREQ_HZ`].
#[inline]
pub const fn to_us(cycles: u32) -> u32 { (cycles as u64 * 1_000_000 / CPU_FREQ_HZ as u64) as u32 }

/// Share of `period_us` spent in `cycles`, in percent, clamped to 100.
pub const fn util_percent(
    cycles: u32,
    period_us: u32,
) -> u32 {
    if period_us == 0 {
        return 0;
    }
    let budget = CPU_FREQ_HZ as u64 * period_us as u64 / 1_000_000;
    if budget == 0 {
        return 0;
    }
    let util = cycles as u64 * 100 / budget;
    if util > 100 { 100 } else { util as u32 }
}
