// Sat Oct 17 2026 - Alex

use crate::memory::{
    Address, MemoryError, MemoryRegion, ModuleInfo, PageState, PageType, ProcessAccess,
    Protection, RegionEnumerator,
};
use std::ffi::c_void;
use std::mem::size_of;
use windows::Win32::{
    Foundation::{CloseHandle, FALSE, HANDLE, HMODULE},
    System::{
        Diagnostics::Debug::{ReadProcessMemory, WriteProcessMemory},
        Memory::{
            VirtualQueryEx, MEMORY_BASIC_INFORMATION, MEM_COMMIT, MEM_FREE, MEM_IMAGE,
            MEM_MAPPED, MEM_PRIVATE, MEM_RESERVE,
        },
        ProcessStatus::{
            EnumProcessModules, GetModuleInformation, QueryWorkingSetEx, MODULEINFO,
            PSAPI_WORKING_SET_EX_INFORMATION,
        },
        SystemInformation::{GetSystemInfo, SYSTEM_INFO},
        Threading::{
            GetExitCodeProcess, OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_OPERATION,
            PROCESS_VM_READ, PROCESS_VM_WRITE,
        },
    },
};

const STILL_ACTIVE: u32 = 259;

pub struct WindowsProcess {
    pid: u32,
    // Raw HANDLE value, kept as an integer so the type stays Send + Sync.
    handle: usize,
    module: ModuleInfo,
    max_address: u64,
}

impl WindowsProcess {
    pub fn attach(pid: u32) -> Result<Self, MemoryError> {
        let handle = unsafe {
            OpenProcess(
                PROCESS_QUERY_INFORMATION
                    | PROCESS_VM_OPERATION
                    | PROCESS_VM_READ
                    | PROCESS_VM_WRITE,
                FALSE,
                pid,
            )
        }
        .map_err(|e| MemoryError::PermissionDenied(format!("OpenProcess({}) failed: {}", pid, e)))?;

        let mut process = Self {
            pid,
            handle: handle.0 as usize,
            module: ModuleInfo { base: Address::zero(), size: 0 },
            max_address: max_application_address(),
        };
        process.module = process.find_main_module()?;

        log::debug!("Main module at {} ({:#x} bytes)", process.module.base, process.module.size);

        Ok(process)
    }

    fn handle(&self) -> HANDLE {
        HANDLE(self.handle as *mut c_void)
    }

    fn find_main_module(&self) -> Result<ModuleInfo, MemoryError> {
        let mut modules = [HMODULE::default(); 1024];
        let mut cb_needed = 0u32;
        unsafe {
            EnumProcessModules(
                self.handle(),
                modules.as_mut_ptr(),
                size_of::<[HMODULE; 1024]>() as u32,
                &mut cb_needed,
            )
        }
        .map_err(|e| MemoryError::ModuleNotFound(format!("EnumProcessModules failed: {}", e)))?;

        if (cb_needed as usize) < size_of::<HMODULE>() {
            return Err(MemoryError::ModuleNotFound("no modules loaded yet".to_string()));
        }

        let mut info = MODULEINFO::default();
        unsafe {
            GetModuleInformation(
                self.handle(),
                modules[0],
                &mut info,
                size_of::<MODULEINFO>() as u32,
            )
        }
        .map_err(|e| MemoryError::ModuleNotFound(format!("GetModuleInformation failed: {}", e)))?;

        Ok(ModuleInfo {
            base: Address::new(info.lpBaseOfDll as u64),
            size: info.SizeOfImage as u64,
        })
    }

    fn query(&self, addr: u64) -> Option<MEMORY_BASIC_INFORMATION> {
        let mut info = MEMORY_BASIC_INFORMATION::default();
        let written = unsafe {
            VirtualQueryEx(
                self.handle(),
                Some(addr as *const c_void),
                &mut info,
                size_of::<MEMORY_BASIC_INFORMATION>(),
            )
        };
        (written != 0).then_some(info)
    }
}

fn max_application_address() -> u64 {
    let mut info = SYSTEM_INFO::default();
    unsafe { GetSystemInfo(&mut info) };
    info.lpMaximumApplicationAddress as u64
}

fn describe(info: &MEMORY_BASIC_INFORMATION) -> MemoryRegion {
    let page_type = match info.Type {
        t if t == MEM_MAPPED => PageType::Mapped,
        t if t == MEM_PRIVATE => PageType::Private,
        t if t == MEM_IMAGE => PageType::Image,
        _ => PageType::Unknown,
    };
    let state = match info.State {
        s if s == MEM_COMMIT => PageState::Committed,
        s if s == MEM_RESERVE => PageState::Reserved,
        s if s == MEM_FREE => PageState::Free,
        _ => PageState::Unknown,
    };
    MemoryRegion::new(
        Address::new(info.BaseAddress as u64),
        info.RegionSize as u64,
        Protection::from_page_flags(info.Protect.0),
    )
    .with_page_type(page_type)
    .with_state(state)
}

/// Walks the address space with successive `VirtualQueryEx` calls.
pub struct VirtualQueryEnumerator<'a> {
    process: &'a WindowsProcess,
    cursor: u64,
    finished: bool,
}

impl Iterator for VirtualQueryEnumerator<'_> {
    type Item = MemoryRegion;

    fn next(&mut self) -> Option<MemoryRegion> {
        if self.finished || self.cursor > self.process.max_address {
            return None;
        }
        let info = match self.process.query(self.cursor) {
            Some(info) if info.RegionSize > 0 => info,
            _ => {
                self.finished = true;
                return None;
            }
        };
        let region = describe(&info);
        match region.end().as_u64() {
            end if end > self.cursor => self.cursor = end,
            _ => self.finished = true,
        }
        Some(region)
    }
}

impl RegionEnumerator for VirtualQueryEnumerator<'_> {
    fn reset(&mut self) {
        self.cursor = 0;
        self.finished = false;
    }
}

impl ProcessAccess for WindowsProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn is_alive(&self) -> bool {
        let mut code = 0u32;
        unsafe { GetExitCodeProcess(self.handle(), &mut code) }.is_ok() && code == STILL_ACTIVE
    }

    fn main_module(&self) -> ModuleInfo {
        self.module
    }

    fn read_bytes(&self, addr: Address, buffer: &mut [u8]) -> Result<(), MemoryError> {
        let mut read = 0usize;
        let result = unsafe {
            ReadProcessMemory(
                self.handle(),
                addr.as_usize() as *const c_void,
                buffer.as_mut_ptr() as *mut c_void,
                buffer.len(),
                Some(&mut read),
            )
        };
        if result.is_err() || read != buffer.len() {
            if !self.is_alive() {
                return Err(MemoryError::ProcessClosed);
            }
            return Err(MemoryError::ReadFailed(addr.as_u64()));
        }
        Ok(())
    }

    fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        let mut written = 0usize;
        let result = unsafe {
            WriteProcessMemory(
                self.handle(),
                addr.as_usize() as *const c_void,
                data.as_ptr() as *const c_void,
                data.len(),
                Some(&mut written),
            )
        };
        if result.is_err() || written != data.len() {
            if !self.is_alive() {
                return Err(MemoryError::ProcessClosed);
            }
            return Err(MemoryError::WriteFailed(addr.as_u64()));
        }
        Ok(())
    }

    fn regions(&self) -> Box<dyn RegionEnumerator + '_> {
        Box::new(VirtualQueryEnumerator {
            process: self,
            cursor: 0,
            finished: false,
        })
    }

    fn is_resident(&self, addr: Address) -> Option<bool> {
        let mut info = [PSAPI_WORKING_SET_EX_INFORMATION {
            VirtualAddress: addr.as_usize() as *mut c_void,
            ..Default::default()
        }];
        let queried = unsafe {
            QueryWorkingSetEx(
                self.handle(),
                info.as_mut_ptr() as *mut c_void,
                size_of::<[PSAPI_WORKING_SET_EX_INFORMATION; 1]>() as u32,
            )
        };
        if queried.is_err() {
            return Some(false);
        }
        Some(unsafe { info[0].VirtualAttributes.Flags } & 1 == 1)
    }
}

impl Drop for WindowsProcess {
    fn drop(&mut self) {
        if let Err(e) = unsafe { CloseHandle(self.handle()) } {
            log::warn!("CloseHandle for pid {} failed: {}", self.pid, e);
        }
    }
}
