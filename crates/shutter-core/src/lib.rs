//! Core systems for Shutter.
//!
//! This crate provides the notification plumbing the gallery model and its
//! views are built on:
//!
//! - **Signal/Slot System**: Type-safe, synchronous notifications for view-facing events
//! - **Observer Registries**: Identity-keyed observer sets with snapshot delivery and
//!   per-observer failure isolation
//! - **Logging**: Tracing targets, performance spans and tree debug formatting
//!
//! # Signal/Slot Example
//!
//! ```
//! use shutter_core::Signal;
//!
//! let index_changed = Signal::<usize>::new();
//! let conn_id = index_changed.connect(|index| {
//!     println!("Now showing frame {}", index);
//! });
//!
//! index_changed.emit(2);
//! index_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod observer;
pub mod signal;

pub use error::{DeliveryReport, ObserverError, ObserverFailure};
pub use logging::{DebugTree, PerfSpan, TreeFormatOptions, TreeFormatter, TreeStyle};
pub use observer::{ObserverKey, ObserverSet};
pub use signal::{ConnectionId, Signal};

static_assertions::assert_impl_all!(Signal<usize>: Send, Sync);
static_assertions::assert_impl_all!(ObserverSet<dyn Fn() + Send + Sync>: Send, Sync);
static_assertions::assert_impl_all!(DeliveryReport: Send, Sync);
