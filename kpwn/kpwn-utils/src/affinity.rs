//! CPU affinity of the calling thread.
//!
//! Races against per-CPU kernel state (slab freelists, RCU grace periods) are
//! far more reliable when every participating thread sits on one CPU.

use kpwn_log::{err, info};
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AffinityError {
    #[error("CPU {cpu} is outside the affinity mask (limit {limit})")]
    OutOfRange { cpu: usize, limit: usize },
    #[error("sched_setaffinity to CPU {cpu} failed: {source}")]
    SetAffinity {
        cpu: usize,
        #[source]
        source: io::Error,
    },
    #[error("sched_getaffinity failed: {0}")]
    GetAffinity(#[source] io::Error),
}

#[allow(clippy::cast_sign_loss)]
const CPU_LIMIT: usize = libc::CPU_SETSIZE as usize;

fn empty_set() -> libc::cpu_set_t {
    // SAFETY: cpu_set_t is a plain bit array; all-zero is the empty set.
    unsafe { core::mem::zeroed() }
}

/// Bind the calling thread to logical CPU `cpu`.
///
/// Failure is logged and returned; it is never fatal.
///
/// # Errors
/// `cpu` is beyond `CPU_SETSIZE`, or the kernel rejected the mask (CPU
/// offline or outside the cgroup's cpuset).
pub fn pin_cpu(cpu: usize) -> Result<(), AffinityError> {
    let result = set_affinity(cpu);
    match &result {
        Ok(()) => info!("Pinned to CPU {cpu}"),
        Err(e) => {
            err!("pin_cpu({cpu}) failed");
            log::debug!("{e}");
        }
    }
    result
}

/// [`pin_cpu`] for CPU 0.
///
/// # Errors
/// See [`pin_cpu`].
pub fn pin_cpu0() -> Result<(), AffinityError> {
    pin_cpu(0)
}

fn set_affinity(cpu: usize) -> Result<(), AffinityError> {
    if cpu >= CPU_LIMIT {
        return Err(AffinityError::OutOfRange {
            cpu,
            limit: CPU_LIMIT,
        });
    }

    let mut set = empty_set();
    let rc = unsafe {
        libc::CPU_SET(cpu, &mut set);
        libc::sched_setaffinity(0, size_of::<libc::cpu_set_t>(), &raw const set)
    };
    if rc < 0 {
        return Err(AffinityError::SetAffinity {
            cpu,
            source: io::Error::last_os_error(),
        });
    }
    Ok(())
}

/// CPUs the calling thread may currently run on, ascending.
///
/// # Errors
/// `sched_getaffinity` failed.
pub fn allowed_cpus() -> Result<Vec<usize>, AffinityError> {
    let mut set = empty_set();
    let rc = unsafe { libc::sched_getaffinity(0, size_of::<libc::cpu_set_t>(), &raw mut set) };
    if rc < 0 {
        return Err(AffinityError::GetAffinity(io::Error::last_os_error()));
    }
    Ok((0..CPU_LIMIT)
        .filter(|&cpu| unsafe { libc::CPU_ISSET(cpu, &set) })
        .collect())
}

/// The CPU the calling thread is running on right now.
#[must_use]
pub fn current_cpu() -> Option<usize> {
    let cpu = unsafe { libc::sched_getcpu() };
    usize::try_from(cpu).ok()
}
