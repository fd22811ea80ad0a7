// Sat Oct 17 2026 - Alex

pub struct ProcessUtils;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
}

impl ProcessUtils {
    /// Executable name the emulator runs under on this platform.
    pub fn default_emulator_name() -> &'static str {
        if cfg!(windows) {
            "dolphin"
        } else {
            "dolphin-emu"
        }
    }

    #[cfg(target_os = "linux")]
    pub fn list_processes() -> Vec<ProcessInfo> {
        let entries = match std::fs::read_dir("/proc") {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Failed to list /proc: {}", e);
                return Vec::new();
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
            .filter_map(|pid| {
                let comm = std::fs::read_to_string(format!("/proc/{}/comm", pid)).ok()?;
                Some(ProcessInfo {
                    pid,
                    name: comm.trim_end().to_string(),
                })
            })
            .collect()
    }

    #[cfg(windows)]
    pub fn list_processes() -> Vec<ProcessInfo> {
        use windows::Win32::Foundation::CloseHandle;
        use windows::Win32::System::Diagnostics::ToolHelp::{
            CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
            TH32CS_SNAPPROCESS,
        };

        let snapshot = match unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) } {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Failed to snapshot processes: {}", e);
                return Vec::new();
            }
        };

        let mut processes = Vec::new();
        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };
        let mut more = unsafe { Process32FirstW(snapshot, &mut entry) }.is_ok();
        while more {
            let len = entry.szExeFile.iter().position(|&c| c == 0).unwrap_or(entry.szExeFile.len());
            processes.push(ProcessInfo {
                pid: entry.th32ProcessID,
                name: String::from_utf16_lossy(&entry.szExeFile[..len]),
            });
            more = unsafe { Process32NextW(snapshot, &mut entry) }.is_ok();
        }

        if let Err(e) = unsafe { CloseHandle(snapshot) } {
            log::warn!("Failed to close process snapshot: {}", e);
        }
        processes
    }

    #[cfg(not(any(target_os = "linux", windows)))]
    pub fn list_processes() -> Vec<ProcessInfo> {
        Vec::new()
    }

    pub fn find_processes_by_name(name: &str) -> Vec<ProcessInfo> {
        Self::list_processes()
            .into_iter()
            .filter(|p| matches_name(&p.name, name))
            .collect()
    }
}

/// Case-insensitive executable name comparison, ignoring a `.exe` suffix.
pub fn matches_name(process_name: &str, wanted: &str) -> bool {
    let strip = |s: &str| {
        let lower = s.to_lowercase();
        match lower.strip_suffix(".exe") {
            Some(stem) => stem.to_string(),
            None => lower,
        }
    };
    strip(process_name) == strip(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_name() {
        assert!(matches_name("Dolphin.exe", "dolphin"));
        assert!(matches_name("dolphin-emu", "dolphin-emu"));
        assert!(!matches_name("dolphin-emu-nogui", "dolphin-emu"));
        assert!(!matches_name("dolphin", "dolphin-emu"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_lists_current_process() {
        let me = std::process::id();
        assert!(ProcessUtils::list_processes().iter().any(|p| p.pid == me));
    }
}
