//! # bridge-handoff
//!
//! Synchronous cross-thread handoff between the HTTP front end and the
//! allocator's worker threads.
//!
//! The allocator must not make scheduling decisions before the configurator
//! has supplied task label and executor environment decorations. Allocator
//! threads therefore block on [`DecorationHub::wait_for_master_launch_task_labels`]
//! (and friends) until the matching hook request arrives. The producer side
//! never blocks: posting from an HTTP handler is always cheap.
//!
//! Each decoration kind gets its own independent [`Mailbox`], so a thread
//! waiting for one kind is never woken (or starved) by traffic on another.

mod hub;
mod mailbox;

pub use hub::DecorationHub;
pub use mailbox::Mailbox;
