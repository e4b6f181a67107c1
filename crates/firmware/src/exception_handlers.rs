//! Cortex-M exception handlers for the Discovery signals firmware.
//!
//! - **HardFault**: raised on bus faults, illegal instructions, and
//!   unaligned or out-of-range accesses. The STM32F407 has no MPU setup here,
//!   so a task stack overflowing the 128 KB SRAM ends up in this handler too.
//!
//! The `#[cortex_m_rt::exception]` attribute requires ARM target intrinsics,
//! so this module is only built with the `hardware` feature.

#![allow(clippy::doc_markdown)]

/// HardFault exception handler (hardware target only).
///
/// Reports the stacked exception frame address over RTT, then halts.
///
/// # Safety
///
/// Must never return; returning from a HardFault handler is undefined
/// behavior on Cortex-M.
#[cortex_m_rt::exception]
#[allow(unsafe_code)]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    defmt::error!(
        "HardFault: frame at 0x{:08X}, pc 0x{:08X}, lr 0x{:08X}",
        ef as *const _ as u32,
        ef.pc(),
        ef.lr()
    );
    crate::boot::halt()
}
