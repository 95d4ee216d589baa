use sysinfo::{MemoryRefreshKind, RefreshKind, System};

use super::{MemoryReading, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn memory_reading() -> Option<MemoryReading> {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );
        let total_bytes = sys.total_memory();
        if total_bytes == 0 {
            return None;
        }
        Some(MemoryReading {
            total_bytes,
            free_bytes: sys.free_memory().min(total_bytes),
        })
    }
}
