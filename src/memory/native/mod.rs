// Sat Oct 17 2026 - Alex

#[cfg(target_os = "linux")]
mod linux;
#[cfg(windows)]
mod win32;

#[cfg(target_os = "linux")]
pub use linux::LinuxProcess as NativeProcess;
#[cfg(windows)]
pub use win32::{VirtualQueryEnumerator, WindowsProcess as NativeProcess};
