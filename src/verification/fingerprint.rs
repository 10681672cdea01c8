/// MAC address of the local machine, for building activation requests on the
/// machine being licensed
#[cfg(target_os = "linux")]
use std::fs;

/// MAC address of the first non-loopback interface
///
/// Returns `None` when no interface exposes one (or on platforms without
/// `/sys/class/net`).
pub fn local_mac_address() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let mut names: Vec<String> = fs::read_dir("/sys/class/net")
            .ok()?
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name != "lo")
            .collect();
        // read_dir order is unspecified
        names.sort();

        for name in names {
            let addr_path = format!("/sys/class/net/{}/address", name);
            if let Ok(addr) = fs::read_to_string(&addr_path) {
                let addr = addr.trim().to_uppercase();
                if is_usable_mac(&addr) {
                    return Some(addr);
                }
            }
        }
    }

    None
}

fn is_usable_mac(addr: &str) -> bool {
    !addr.is_empty() && addr != "00:00:00:00:00:00"
}
