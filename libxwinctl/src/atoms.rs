use std::{cell::RefCell, collections::HashMap};

use tracing::trace;
use x11rb::protocol::xproto::Atom;

use crate::{server::XServer, WinCtlError, WinCtlResult};

// Properties read from the server
pub const NET_CLIENT_LIST: &str = "_NET_CLIENT_LIST";
pub const WIN_CLIENT_LIST: &str = "_WIN_CLIENT_LIST";
pub const NET_CURRENT_DESKTOP: &str = "_NET_CURRENT_DESKTOP";
pub const NET_NUMBER_OF_DESKTOPS: &str = "_NET_NUMBER_OF_DESKTOPS";
pub const NET_SHOWING_DESKTOP: &str = "_NET_SHOWING_DESKTOP";
pub const NET_SUPPORTING_WM_CHECK: &str = "_NET_SUPPORTING_WM_CHECK";
pub const NET_WM_DESKTOP: &str = "_NET_WM_DESKTOP";
pub const WIN_WORKSPACE: &str = "_WIN_WORKSPACE";
pub const NET_WM_PID: &str = "_NET_WM_PID";
pub const NET_WM_NAME: &str = "_NET_WM_NAME";
pub const NET_WM_ICON_NAME: &str = "_NET_WM_ICON_NAME";
pub const WM_NAME: &str = "WM_NAME";
pub const WM_ICON_NAME: &str = "WM_ICON_NAME";
pub const WM_CLIENT_MACHINE: &str = "WM_CLIENT_MACHINE";
pub const UTF8_STRING: &str = "UTF8_STRING";

// Messages sent to the window manager
pub const NET_DESKTOP_VIEWPORT: &str = "_NET_DESKTOP_VIEWPORT";
pub const NET_DESKTOP_GEOMETRY: &str = "_NET_DESKTOP_GEOMETRY";
pub const NET_ACTIVE_WINDOW: &str = "_NET_ACTIVE_WINDOW";
pub const NET_CLOSE_WINDOW: &str = "_NET_CLOSE_WINDOW";

/// AtomResolver maps property and message names onto the server's interned atoms.
///
/// Successful lookups are remembered for the resolver's lifetime since the server never
/// un-interns an atom during a session. A miss is never remembered as another client may intern
/// the name at any time.
pub struct AtomResolver<'a, S: XServer> {
    server: &'a S,
    cache: RefCell<HashMap<String, Atom>>,
}

impl<'a, S: XServer> AtomResolver<'a, S> {
    pub fn new(server: &'a S) -> Self {
        Self { server, cache: RefCell::new(HashMap::new()) }
    }

    /// Resolve the given name to its atom
    ///
    /// ### Arguments
    /// * `name` - exact, case sensitive atom name
    /// * `create_if_missing` - intern the name when the server has never seen it. Only ever set
    ///   this for names that are our own vocabulary e.g. outgoing message types, never for probing
    ///   whether a property exists.
    pub fn resolve(&self, name: &str, create_if_missing: bool) -> WinCtlResult<Atom> {
        if let Some(atom) = self.cache.borrow().get(name) {
            return Ok(*atom);
        }
        let atom = self.server.intern_atom(name, !create_if_missing)?;
        if atom == x11rb::NONE {
            trace!("resolve: {} is not interned", name);
            return Err(WinCtlError::AtomNotFound(name.to_owned()).into());
        }
        trace!("resolve: {} => {}", name, atom);
        self.cache.borrow_mut().insert(name.to_owned(), atom);
        Ok(atom)
    }
}
