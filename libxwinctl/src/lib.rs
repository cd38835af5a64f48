//! `libxwinctl` queries and controls the windows of an X11 window manager by way of the
//! [Extended Window Manager Hints (EWMH) specification](https://specifications.freedesktop.org/wm-spec/latest/)
//! and, where a window manager predates it, the older GNOME/WinWM `_WIN_*` hints. Both build on
//! the lower level Inter Client Communication Conventions Manual (ICCCM) convention of storing
//! window metadata as typed properties on the server and asking the window manager for changes
//! with client messages.
//!
//! [Root Window Properties](https://specifications.freedesktop.org/wm-spec/latest/ar01s03.html)
//! Window managers maintain a number of properties on the root window and on each client window.
//! `libxwinctl` reads those through [`Properties`] and assembles them into one
//! [`WindowMetadata`] record per managed window with [`Enumerator`]. Requests go the other way
//! through [`Dispatcher`].
//!
//! All access to the server goes through the [`XServer`] trait. [`X11Server`] implements it on
//! top of `x11rb`.
//!
//! ### Examples
//! ```ignore
//! use libxwinctl::prelude::*;
//! let server = X11Server::connect(None).unwrap();
//! for win in Enumerator::new(&server, ListOpts::default()).list_windows().unwrap() {
//!     println!("0x{:08x} {}", win.id, win.title);
//! }
//! ```
pub mod atoms;
mod decode;
mod error;
#[cfg(test)]
mod fake;
pub mod message;
mod model;
pub mod property;
pub mod server;
pub mod window;
pub use error::*;
pub use message::{ClientMessage, Dispatcher};
pub use model::*;
pub use property::{Properties, PropertyFormat, PropertyValue};
pub use server::{X11Server, XServer};
pub use window::{Enumerator, Windows};

/// All essential symbols in a simple consumable form
///
/// ### Examples
/// ```
/// use libxwinctl::prelude::*;
/// ```
pub mod prelude {
    pub use crate::*;
}
