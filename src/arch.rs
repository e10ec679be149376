//! Architecture-specific helpers for spin-wait loops.

/// Executes a CPU-specific pause instruction inside a spin-wait loop.
///
/// Used between CAS retries and while waiting on a slot's ready marker.
/// Reduces power consumption and yields pipeline priority to a sibling
/// hyper-thread where the architecture supports it.
#[inline(always)]
pub fn spin_loop_pause() {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    unsafe {
        #[cfg(target_arch = "x86")]
        std::arch::x86::_mm_pause();
        #[cfg(target_arch = "x86_64")]
        std::arch::x86_64::_mm_pause();
    }

    #[cfg(any(target_arch = "arm", target_arch = "aarch64"))]
    unsafe {
        #[cfg(target_feature = "v6")]
        std::arch::asm!("yield");
        #[cfg(not(target_feature = "v6"))]
        std::arch::asm!("nop");
    }

    #[cfg(any(target_arch = "powerpc", target_arch = "powerpc64"))]
    unsafe {
        // Lower priority of current thread
        std::arch::asm!("or 31,31,31");
    }

    #[cfg(not(any(
        target_arch = "x86",
        target_arch = "x86_64",
        target_arch = "arm",
        target_arch = "aarch64",
        target_arch = "powerpc",
        target_arch = "powerpc64",
    )))]
    {
        std::hint::spin_loop();
    }
}
