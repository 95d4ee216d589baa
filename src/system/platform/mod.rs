/// Physical memory as reported by the OS, already scaled to bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryReading {
    pub total_bytes: u64,
    pub free_bytes: u64,
}

pub trait PlatformExtensions {
    fn memory_reading() -> Option<MemoryReading>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod portable;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(not(target_os = "linux"))]
use portable as platform_impl;

pub fn memory_reading() -> Option<MemoryReading> {
    platform_impl::Platform::memory_reading()
}
