//! Device nodes: open-or-die plus the raw `ioctl` most drivers are poked with.

use kpwn_log::{die, ok};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

#[cfg(not(target_env = "musl"))]
type IoctlRequest = libc::c_ulong;
#[cfg(target_env = "musl")]
type IoctlRequest = libc::c_int;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("open({path}) failed: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("ioctl({request:#x}) on {path} failed: {source}")]
    Ioctl {
        path: String,
        request: u64,
        #[source]
        source: io::Error,
    },
}

/// An open device node.
#[derive(Debug)]
pub struct Device {
    path: PathBuf,
    file: File,
}

impl Device {
    /// Open `path` with `open(2)` flags (`libc::O_RDWR`, `O_NONBLOCK`, ...).
    ///
    /// # Errors
    /// The underlying `open` failed.
    pub fn open(path: impl AsRef<Path>, flags: libc::c_int) -> Result<Self, DeviceError> {
        let path = path.as_ref();
        let access = flags & libc::O_ACCMODE;
        let file = OpenOptions::new()
            .read(access == libc::O_RDONLY || access == libc::O_RDWR)
            .write(access == libc::O_WRONLY || access == libc::O_RDWR)
            .custom_flags(flags & !libc::O_ACCMODE)
            .open(path)
            .map_err(|source| DeviceError::Open {
                path: path.display().to_string(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    #[must_use]
    pub fn fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Issue `ioctl(fd, request, arg)`; `arg` is passed through untouched, so
    /// it may be a plain integer or a pointer cast to `usize`.
    ///
    /// # Safety
    /// The driver may read or write memory through `arg`; the caller vouches
    /// that whatever it points to matches what `request` expects.
    ///
    /// # Errors
    /// The call returned `-1`.
    pub unsafe fn ioctl(&self, request: u64, arg: usize) -> Result<libc::c_int, DeviceError> {
        #[allow(clippy::cast_possible_truncation)]
        let ret = unsafe { libc::ioctl(self.fd(), request as IoctlRequest, arg) };
        if ret < 0 {
            return Err(DeviceError::Ioctl {
                path: self.path.display().to_string(),
                request,
                source: io::Error::last_os_error(),
            });
        }
        Ok(ret)
    }

}

impl AsFd for Device {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl AsRawFd for Device {
    fn as_raw_fd(&self) -> RawFd {
        self.fd()
    }
}

impl Read for Device {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Read for &Device {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&self.file).read(buf)
    }
}

impl Write for Device {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Write for &Device {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&self.file).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&self.file).flush()
    }
}

/// Open a device node or die trying.
///
/// Logs `Opened <path>  →  fd <n>` on success; on failure prints the error
/// and exits with status 1 without returning.
pub fn open_dev(path: impl AsRef<Path>, flags: libc::c_int) -> Device {
    match Device::open(path, flags) {
        Ok(device) => {
            ok!("Opened {}  →  fd {}", device.path.display(), device.fd());
            device
        }
        Err(e) => die!("{e}"),
    }
}
