use super::{MemoryReading, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn memory_reading() -> Option<MemoryReading> {
        let mut info = std::mem::MaybeUninit::<libc::sysinfo>::zeroed();
        // SAFETY: sysinfo only writes into the struct we hand it.
        let rc = unsafe { libc::sysinfo(info.as_mut_ptr()) };
        if rc != 0 {
            tracing::debug!(
                error = %std::io::Error::last_os_error(),
                "sysinfo(2) failed"
            );
            return None;
        }
        // SAFETY: rc == 0 means the kernel filled the struct.
        let info = unsafe { info.assume_init() };

        // mem_unit is 0 on very old kernels, where the counts are bytes.
        let unit = u64::from(info.mem_unit).max(1);
        let total_bytes = (info.totalram as u64).checked_mul(unit)?;
        let free_bytes = (info.freeram as u64).checked_mul(unit)?;
        Some(MemoryReading {
            total_bytes,
            free_bytes,
        })
    }
}
