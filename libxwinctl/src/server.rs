//! `XServer` is the seam between the window metadata protocol layer and the actual X11 session.
//! Everything above it only ever talks in atoms, windows and raw property buffers so that the
//! protocol layer can be driven by a real `x11rb` connection or by an in-process stand in.
//!
//! Every operation is a single blocking round trip. Nothing here is retried.
use crate::{message::ClientMessage, ClassHint, WinCtlResult};
use tracing::{debug, trace};

use x11rb::{
    connection::Connection,
    properties::WmClass,
    protocol::xproto::{self, Atom, ConnectionExt as _, EventMask, PropMode},
    rust_connection::RustConnection,
    wrapper::ConnectionExt as _,
};

/// Raw reply of a bounded property read. `buffer` is owned by the caller and released on drop.
#[derive(Debug)]
pub struct RawProperty<B> {
    pub type_: Atom,
    pub format: u8,
    pub item_count: u32,
    pub bytes_after: u32,
    pub buffer: B,
}

/// Raw reply of a geometry query, `x` and `y` are relative to the window's parent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawGeometry {
    pub root: xproto::Window,
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub border_width: u16,
    pub depth: u8,
}

/// Operations the protocol layer needs from a window server session
pub trait XServer {
    /// Server allocated property storage, released exactly once when dropped
    type Buffer: AsRef<[u8]>;

    /// Get the root window of the default screen
    fn root(&self) -> xproto::Window;

    /// Check that the session is still usable
    fn is_open(&self) -> bool;

    /// Intern the given name, when `only_if_exists` is set a never interned name yields `NONE`
    fn intern_atom(&self, name: &str, only_if_exists: bool) -> WinCtlResult<Atom>;

    /// Read at most `long_length` 32-bit units of the given property
    fn get_property(
        &self, window: xproto::Window, property: Atom, type_: Atom, long_length: u32,
    ) -> WinCtlResult<RawProperty<Self::Buffer>>;

    /// Read `WM_CLASS` through its structured accessor, `None` when the window has no hint
    fn class_hint(&self, window: xproto::Window) -> WinCtlResult<Option<ClassHint>>;

    /// Query the geometry of the given window
    fn geometry(&self, window: xproto::Window) -> WinCtlResult<RawGeometry>;

    /// Translate the given coordinates from the `src` window's space into the `dst` window's space
    fn translate_coordinates(
        &self, src: xproto::Window, dst: xproto::Window, x: i16, y: i16,
    ) -> WinCtlResult<(i16, i16)>;

    /// Send the client message to the root window with the given event mask
    fn send_client_message(&self, msg: &ClientMessage, mask: EventMask) -> WinCtlResult<()>;

    /// Replace the given property with 8-bit data
    fn change_property8(
        &self, window: xproto::Window, property: Atom, type_: Atom, data: &[u8],
    ) -> WinCtlResult<()>;

    /// Delete the given property
    fn delete_property(&self, window: xproto::Window, property: Atom) -> WinCtlResult<()>;
}

/// X11Server implements the `XServer` seam on top of an `x11rb` connection
pub struct X11Server {
    conn: RustConnection, // x11 connection
    screen: usize,        // screen number
    root: u32,            // root window id
}

impl X11Server {
    /// Connect to the X11 server
    ///
    /// ### Arguments
    /// * `display` - display name to connect to else `$DISPLAY` will be used
    ///
    /// ### Examples
    /// ```ignore
    /// use libxwinctl::prelude::*;
    /// let server = X11Server::connect(None).unwrap();
    /// ```
    pub fn connect(display: Option<&str>) -> WinCtlResult<Self> {
        let (conn, screen) = x11rb::connect(display)?;
        let root = conn.setup().roots[screen].root;
        debug!("connect: screen: {}, root: {}", screen, root);
        Ok(X11Server { conn, screen, root })
    }

    /// Get the default screen number
    pub fn screen(&self) -> usize {
        self.screen
    }
}

impl XServer for X11Server {
    type Buffer = Vec<u8>;

    fn root(&self) -> xproto::Window {
        self.root
    }

    fn is_open(&self) -> bool {
        // A broken connection fails the flush, pending events are left queued
        self.conn.flush().is_ok()
    }

    fn intern_atom(&self, name: &str, only_if_exists: bool) -> WinCtlResult<Atom> {
        Ok(self.conn.intern_atom(only_if_exists, name.as_bytes())?.reply()?.atom)
    }

    fn get_property(
        &self, window: xproto::Window, property: Atom, type_: Atom, long_length: u32,
    ) -> WinCtlResult<RawProperty<Vec<u8>>> {
        let reply = self.conn.get_property(false, window, property, type_, 0, long_length)?.reply()?;
        trace!(
            "get_property: id: {}, property: {}, type: {}, format: {}, items: {}",
            window,
            property,
            reply.type_,
            reply.format,
            reply.value_len
        );
        Ok(RawProperty {
            type_: reply.type_,
            format: reply.format,
            item_count: reply.value_len,
            bytes_after: reply.bytes_after,
            buffer: reply.value,
        })
    }

    fn class_hint(&self, window: xproto::Window) -> WinCtlResult<Option<ClassHint>> {
        Ok(WmClass::get(&self.conn, window)?.reply()?.and_then(|x| wm_class_hint(&x)))
    }

    fn geometry(&self, window: xproto::Window) -> WinCtlResult<RawGeometry> {
        let g = self.conn.get_geometry(window)?.reply()?;
        Ok(RawGeometry {
            root: g.root,
            x: g.x,
            y: g.y,
            width: g.width,
            height: g.height,
            border_width: g.border_width,
            depth: g.depth,
        })
    }

    fn translate_coordinates(
        &self, src: xproto::Window, dst: xproto::Window, x: i16, y: i16,
    ) -> WinCtlResult<(i16, i16)> {
        let t = self.conn.translate_coordinates(src, dst, x, y)?.reply()?;
        Ok((t.dst_x, t.dst_y))
    }

    fn send_client_message(&self, msg: &ClientMessage, mask: EventMask) -> WinCtlResult<()> {
        self.conn.send_event(false, self.root, mask, msg.to_event())?.check()?;
        self.conn.flush()?;
        Ok(())
    }

    fn change_property8(
        &self, window: xproto::Window, property: Atom, type_: Atom, data: &[u8],
    ) -> WinCtlResult<()> {
        self.conn.change_property8(PropMode::REPLACE, window, property, type_, data)?.check()?;
        self.conn.flush()?;
        Ok(())
    }

    fn delete_property(&self, window: xproto::Window, property: Atom) -> WinCtlResult<()> {
        self.conn.delete_property(window, property)?.check()?;
        self.conn.flush()?;
        Ok(())
    }
}

// x11rb splits WM_CLASS at the first null only, so the halves get the same two field check as
// the raw value would
fn wm_class_hint(class: &WmClass) -> Option<ClassHint> {
    ClassHint::from_fields(class.instance(), class.class())
}

#[cfg(test)]
mod tests {
    use super::*;
    use x11rb::protocol::xproto::{AtomEnum, GetPropertyReply};

    fn wm_class(value: &[u8]) -> Option<WmClass> {
        let reply = GetPropertyReply {
            format: 8,
            sequence: 0,
            length: 0,
            type_: AtomEnum::STRING.into(),
            bytes_after: 0,
            value_len: value.len() as u32,
            value: value.to_vec(),
        };
        WmClass::from_reply(reply).unwrap()
    }

    #[test]
    fn test_class_hint_matches_raw_parse() {
        let values: [&[u8]; 5] = [b"xterm\0XTerm\0", b"navigator\0Firefox", b"instance\0", b"a\0b\0c\0", b"no-null"];
        for value in values {
            let hint = wm_class(value).and_then(|x| wm_class_hint(&x));
            assert_eq!(hint, ClassHint::from_bytes(value), "value: {:?}", value);
        }
        assert_eq!(wm_class(b"xterm\0XTerm\0").and_then(|x| wm_class_hint(&x)), Some(ClassHint::new("xterm", "XTerm")));
        assert_eq!(wm_class(b"instance\0").and_then(|x| wm_class_hint(&x)), None);
    }
}
