//! # Typed `x86_64` user-state registers
//!
//! The execution-context transfer primitive of the toolkit. Everything that
//! touches raw machine state lives in this crate:
//!
//! * [`UserState`]: the four registers `iretq` needs to resume a user-mode
//!   point: `CS`, `SS`, `RSP` and `RFLAGS`.
//! * [`UserState::capture`]: reads all four in a single `asm!` block.
//! * [`restore_state`]: the one `unsafe` entry point; switches to the
//!   captured stack and returns through `iretq` into a landing function.
//! * [`Rflags`], [`SegmentSelector`], [`Ring`]: typed views of the raw words.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kpwn_registers::{UserState, restore_state};
//!
//! extern "C" fn landing() -> ! {
//!     std::process::exit(0)
//! }
//!
//! let state = UserState::capture();
//! // ... trigger the bug; later, possibly from hijacked control flow:
//! unsafe { restore_state(state, landing) }
//! ```
//!
//! ## Scope
//!
//! Only the 64-bit `iretq` convention is modeled. There is no `swapgs`
//! handling and no full register file; a restore target is "a known user
//! point with a known stack", nothing more.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod privilege;
mod rflags;
mod selector;
mod user_state;

pub use privilege::Ring;
pub use rflags::Rflags;
pub use selector::{SegmentSelector, Table};
pub use user_state::{ResumeEntry, UserState};

#[cfg(feature = "asm")]
pub use user_state::restore_state;

/// Read a register of the calling thread.
pub trait LoadRegister {
    /// It is safe to load this register from user mode.
    fn load() -> Self;
}
