// Sat Oct 17 2026 - Alex

use crate::memory::maps::MapsEnumerator;
use crate::memory::{
    Address, MemoryError, MemoryRegion, ModuleInfo, ProcessAccess, RegionEnumerator,
};
use libc::{c_void, iovec, pid_t};
use std::fs;
use std::io;

pub struct LinuxProcess {
    pid: pid_t,
    exe_path: String,
    module: ModuleInfo,
}

impl LinuxProcess {
    pub fn attach(pid: u32) -> Result<Self, MemoryError> {
        let pid = pid as pid_t;
        if !is_pid_alive(pid) {
            return Err(MemoryError::ProcessNotFound(format!("pid {} is not running", pid)));
        }

        let exe_path = fs::read_link(format!("/proc/{}/exe", pid))
            .map_err(|e| match e.kind() {
                io::ErrorKind::PermissionDenied => MemoryError::PermissionDenied(format!(
                    "cannot inspect pid {}, ptrace access is required",
                    pid
                )),
                _ => MemoryError::Io(e),
            })?
            .to_string_lossy()
            .into_owned();

        let image: Vec<MemoryRegion> = MapsEnumerator::open(pid as u32)?
            .filter(|r| r.path() == Some(exe_path.as_str()))
            .collect();

        let base = image.iter().map(|r| r.base()).min();
        let end = image.iter().map(|r| r.end()).max();
        let module = match (base, end) {
            (Some(base), Some(end)) => ModuleInfo { base, size: end - base },
            _ => return Err(MemoryError::ModuleNotFound(exe_path)),
        };

        log::debug!("Main module {} at {} ({:#x} bytes)", exe_path, module.base, module.size);

        Ok(Self { pid, exe_path, module })
    }

    fn map_errno(&self, fallback: MemoryError) -> MemoryError {
        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::ESRCH) => MemoryError::ProcessClosed,
            Some(libc::EPERM) => MemoryError::PermissionDenied(format!("pid {}", self.pid)),
            _ => fallback,
        }
    }
}

fn is_pid_alive(pid: pid_t) -> bool {
    let result = unsafe { libc::kill(pid, 0) };
    result == 0 || io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

impl ProcessAccess for LinuxProcess {
    fn pid(&self) -> u32 {
        self.pid as u32
    }

    fn is_alive(&self) -> bool {
        is_pid_alive(self.pid)
    }

    fn main_module(&self) -> ModuleInfo {
        self.module
    }

    fn read_bytes(&self, addr: Address, buffer: &mut [u8]) -> Result<(), MemoryError> {
        if buffer.is_empty() {
            return Ok(());
        }
        let local = iovec {
            iov_base: buffer.as_mut_ptr() as *mut c_void,
            iov_len: buffer.len(),
        };
        let remote = iovec {
            iov_base: addr.as_usize() as *mut c_void,
            iov_len: buffer.len(),
        };
        let read = unsafe { libc::process_vm_readv(self.pid, &local, 1, &remote, 1, 0) };
        if read < 0 {
            return Err(self.map_errno(MemoryError::ReadFailed(addr.as_u64())));
        }
        if read as usize != buffer.len() {
            return Err(MemoryError::ReadFailed(addr.as_u64()));
        }
        Ok(())
    }

    fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        if data.is_empty() {
            return Ok(());
        }
        let local = iovec {
            iov_base: data.as_ptr() as *mut c_void,
            iov_len: data.len(),
        };
        let remote = iovec {
            iov_base: addr.as_usize() as *mut c_void,
            iov_len: data.len(),
        };
        let written = unsafe { libc::process_vm_writev(self.pid, &local, 1, &remote, 1, 0) };
        if written < 0 {
            return Err(self.map_errno(MemoryError::WriteFailed(addr.as_u64())));
        }
        if written as usize != data.len() {
            return Err(MemoryError::WriteFailed(addr.as_u64()));
        }
        Ok(())
    }

    fn regions(&self) -> Box<dyn RegionEnumerator + '_> {
        match MapsEnumerator::open(self.pid as u32) {
            Ok(maps) => Box::new(maps),
            Err(e) => {
                log::debug!("Mapping listing for pid {} unavailable: {}", self.pid, e);
                Box::new(MapsEnumerator::from_listing(""))
            }
        }
    }

    fn is_resident(&self, _addr: Address) -> Option<bool> {
        None
    }

    /// Reads each file-backed mapping of the executable separately; gaps
    /// between them stay zeroed.
    fn read_image(&self) -> Result<Vec<u8>, MemoryError> {
        let mut image = vec![0u8; self.module.size as usize];
        let mappings = MapsEnumerator::open(self.pid as u32)?
            .filter(|r| r.path() == Some(self.exe_path.as_str()) && r.protection().can_read());

        for mapping in mappings {
            let offset = (mapping.base() - self.module.base) as usize;
            let end = (offset + mapping.size() as usize).min(image.len());
            if let Err(e) = self.read_bytes(mapping.base(), &mut image[offset..end]) {
                if matches!(e, MemoryError::ProcessClosed) {
                    return Err(e);
                }
                log::debug!("Skipping unreadable image mapping at {}: {}", mapping.base(), e);
            }
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_to_own_process() {
        let process = LinuxProcess::attach(std::process::id()).unwrap();
        assert!(process.is_alive());

        let module = process.main_module();
        assert!(!module.base.is_null());
        assert!(module.size > 0);

        let image = process.read_image().unwrap();
        assert_eq!(image.len() as u64, module.size);
        assert_eq!(&image[..4], b"\x7fELF");
    }

    #[test]
    fn test_own_maps_list_executable() {
        let process = LinuxProcess::attach(std::process::id()).unwrap();
        let exe = process.exe_path.clone();
        assert!(process.regions().any(|r| r.path() == Some(exe.as_str())));
    }
}
