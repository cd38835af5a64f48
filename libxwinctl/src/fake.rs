//! In process stand in for an X server session used by the unit tests. It keeps a property store,
//! a class hint and geometry per window, records every client message sent and tracks every
//! property buffer it hands out so tests can check each one is released exactly once.
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use x11rb::{
    errors::ConnectionError,
    protocol::xproto::{Atom, EventMask, Window},
};

use crate::{
    message::ClientMessage,
    server::{RawGeometry, RawProperty, XServer},
    ClassHint, WinCtlResult,
};

const ROOT: Window = 0x0000_01e6;

// Atoms every X server predefines
const PREDEFINED: &[(&str, Atom)] = &[
    ("ATOM", 4),
    ("CARDINAL", 6),
    ("STRING", 31),
    ("WINDOW", 33),
    ("WM_CLIENT_MACHINE", 36),
    ("WM_ICON_NAME", 37),
    ("WM_NAME", 39),
    ("WM_CLASS", 67),
];

/// Property buffer that counts its own release
#[derive(Debug)]
pub(crate) struct TrackedBuffer {
    bytes: Vec<u8>,
    released: Rc<Cell<usize>>,
}

impl AsRef<[u8]> for TrackedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for TrackedBuffer {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

#[derive(Debug, Clone)]
struct FakeProperty {
    type_: Atom,
    format: u8,
    item_count: u32,
    bytes: Vec<u8>,
}

pub(crate) struct FakeServer {
    open: Cell<bool>,
    atoms: RefCell<HashMap<String, Atom>>,
    next_atom: Cell<Atom>,
    intern_calls: Cell<usize>,
    properties: RefCell<HashMap<(Window, Atom), FakeProperty>>,
    reads: RefCell<HashMap<Atom, usize>>,
    max_long_length: Cell<u32>,
    handed_out: Cell<usize>,
    released: Rc<Cell<usize>>,
    classes: RefCell<HashMap<Window, Vec<u8>>>,
    geometries: RefCell<HashMap<Window, (RawGeometry, (i16, i16))>>,
    geometry_queries: Cell<usize>,
    sent: RefCell<Vec<(ClientMessage, EventMask)>>,
    fail_sends: Cell<bool>,
}

impl FakeServer {
    pub(crate) fn new() -> Self {
        Self {
            open: Cell::new(true),
            atoms: RefCell::new(PREDEFINED.iter().map(|(name, atom)| (name.to_string(), *atom)).collect()),
            next_atom: Cell::new(300),
            intern_calls: Cell::new(0),
            properties: RefCell::new(HashMap::new()),
            reads: RefCell::new(HashMap::new()),
            max_long_length: Cell::new(0),
            handed_out: Cell::new(0),
            released: Rc::new(Cell::new(0)),
            classes: RefCell::new(HashMap::new()),
            geometries: RefCell::new(HashMap::new()),
            geometry_queries: Cell::new(0),
            sent: RefCell::new(vec![]),
            fail_sends: Cell::new(false),
        }
    }

    /// Intern the given name as some other client would
    pub(crate) fn intern(&self, name: &str) -> Atom {
        if let Some(atom) = self.atom(name) {
            return atom;
        }
        let atom = self.next_atom.get();
        self.next_atom.set(atom + 1);
        self.atoms.borrow_mut().insert(name.to_owned(), atom);
        atom
    }

    pub(crate) fn atom(&self, name: &str) -> Option<Atom> {
        self.atoms.borrow().get(name).copied()
    }

    pub(crate) fn atom_name(&self, atom: Atom) -> Option<String> {
        self.atoms.borrow().iter().find(|(_, x)| **x == atom).map(|(name, _)| name.clone())
    }

    pub(crate) fn is_interned(&self, name: &str) -> bool {
        self.atom(name).is_some()
    }

    pub(crate) fn intern_calls(&self) -> usize {
        self.intern_calls.get()
    }

    pub(crate) fn set_raw(&self, win: Window, name: &str, type_: Atom, format: u8, item_count: u32, bytes: Vec<u8>) {
        let property = self.intern(name);
        self.properties.borrow_mut().insert((win, property), FakeProperty { type_, format, item_count, bytes });
    }

    pub(crate) fn set_u32s(&self, win: Window, name: &str, type_: Atom, values: &[u32]) {
        let bytes = values.iter().flat_map(|x| x.to_ne_bytes()).collect();
        self.set_raw(win, name, type_, 32, values.len() as u32, bytes);
    }

    pub(crate) fn set_bytes(&self, win: Window, name: &str, type_: Atom, bytes: &[u8]) {
        self.set_raw(win, name, type_, 8, bytes.len() as u32, bytes.to_vec());
    }

    /// Get the type and value of the given property
    pub(crate) fn property(&self, win: Window, name: &str) -> Option<(Atom, Vec<u8>)> {
        let property = self.atom(name)?;
        self.properties.borrow().get(&(win, property)).map(|x| (x.type_, x.bytes.clone()))
    }

    /// Number of times the given property was read on any window
    pub(crate) fn property_reads(&self, name: &str) -> usize {
        self.atom(name).and_then(|x| self.reads.borrow().get(&x).copied()).unwrap_or(0)
    }

    pub(crate) fn max_long_length(&self) -> u32 {
        self.max_long_length.get()
    }

    pub(crate) fn buffers_handed_out(&self) -> usize {
        self.handed_out.get()
    }

    pub(crate) fn buffers_released(&self) -> usize {
        self.released.get()
    }

    pub(crate) fn live_buffers(&self) -> usize {
        self.handed_out.get() - self.released.get()
    }

    pub(crate) fn set_class(&self, win: Window, bytes: &[u8]) {
        self.classes.borrow_mut().insert(win, bytes.to_vec());
    }

    /// Set the geometry of the given window along with where its origin lands in root coordinates
    pub(crate) fn set_geometry(&self, win: Window, geometry: RawGeometry, translated: (i16, i16)) {
        self.geometries.borrow_mut().insert(win, (geometry, translated));
    }

    pub(crate) fn geometry_queries(&self) -> usize {
        self.geometry_queries.get()
    }

    /// Messages sent so far, as decoded back from their wire form
    pub(crate) fn sent(&self) -> Vec<(ClientMessage, EventMask)> {
        self.sent.borrow().clone()
    }

    pub(crate) fn fail_sends(&self, fail: bool) {
        self.fail_sends.set(fail);
    }

    pub(crate) fn close(&self) {
        self.open.set(false);
    }

    fn buffer(&self, bytes: Vec<u8>) -> TrackedBuffer {
        self.handed_out.set(self.handed_out.get() + 1);
        TrackedBuffer { bytes, released: self.released.clone() }
    }
}

impl XServer for FakeServer {
    type Buffer = TrackedBuffer;

    fn root(&self) -> Window {
        ROOT
    }

    fn is_open(&self) -> bool {
        self.open.get()
    }

    fn intern_atom(&self, name: &str, only_if_exists: bool) -> WinCtlResult<Atom> {
        self.intern_calls.set(self.intern_calls.get() + 1);
        match self.atom(name) {
            Some(atom) => Ok(atom),
            None if only_if_exists => Ok(x11rb::NONE),
            None => Ok(self.intern(name)),
        }
    }

    fn get_property(
        &self, window: Window, property: Atom, type_: Atom, long_length: u32,
    ) -> WinCtlResult<RawProperty<TrackedBuffer>> {
        *self.reads.borrow_mut().entry(property).or_insert(0) += 1;
        self.max_long_length.set(self.max_long_length.get().max(long_length));

        let stored = self.properties.borrow().get(&(window, property)).cloned();
        let raw = match stored {
            None => RawProperty { type_: x11rb::NONE, format: 0, item_count: 0, bytes_after: 0, buffer: self.buffer(vec![]) },

            // Like the real server a type mismatch only describes the stored value
            Some(x) if type_ != 0 && x.type_ != type_ => RawProperty {
                type_: x.type_,
                format: x.format,
                item_count: 0,
                bytes_after: x.bytes.len() as u32,
                buffer: self.buffer(vec![]),
            },
            Some(x) => {
                let limit = long_length as usize * 4;
                if x.bytes.len() > limit {
                    let size = x.format as usize / 8;
                    let bytes = x.bytes[..limit].to_vec();
                    RawProperty {
                        type_: x.type_,
                        format: x.format,
                        item_count: (limit / size) as u32,
                        bytes_after: (x.bytes.len() - limit) as u32,
                        buffer: self.buffer(bytes),
                    }
                } else {
                    RawProperty {
                        type_: x.type_,
                        format: x.format,
                        item_count: x.item_count,
                        bytes_after: 0,
                        buffer: self.buffer(x.bytes),
                    }
                }
            },
        };
        Ok(raw)
    }

    fn class_hint(&self, window: Window) -> WinCtlResult<Option<ClassHint>> {
        Ok(self.classes.borrow().get(&window).and_then(|x| ClassHint::from_bytes(x)))
    }

    fn geometry(&self, window: Window) -> WinCtlResult<RawGeometry> {
        self.geometry_queries.set(self.geometry_queries.get() + 1);
        match self.geometries.borrow().get(&window) {
            Some((geometry, _)) => Ok(*geometry),
            None => Err(ConnectionError::UnknownError.into()),
        }
    }

    fn translate_coordinates(&self, src: Window, dst: Window, _x: i16, _y: i16) -> WinCtlResult<(i16, i16)> {
        match self.geometries.borrow().get(&src) {
            Some((_, translated)) if dst == ROOT => Ok(*translated),
            _ => Err(ConnectionError::UnknownError.into()),
        }
    }

    fn send_client_message(&self, msg: &ClientMessage, mask: EventMask) -> WinCtlResult<()> {
        if self.fail_sends.get() {
            return Err(ConnectionError::UnknownError.into());
        }
        let decoded = ClientMessage::decode(&msg.encode())?;
        self.sent.borrow_mut().push((decoded, mask));
        Ok(())
    }

    fn change_property8(&self, window: Window, property: Atom, type_: Atom, data: &[u8]) -> WinCtlResult<()> {
        self.properties.borrow_mut().insert(
            (window, property),
            FakeProperty { type_, format: 8, item_count: data.len() as u32, bytes: data.to_vec() },
        );
        Ok(())
    }

    fn delete_property(&self, window: Window, property: Atom) -> WinCtlResult<()> {
        self.properties.borrow_mut().remove(&(window, property));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_at_long_length() {
        let server = FakeServer::new();
        server.set_u32s(1, "BIG", 6, &[7; 10]);
        let atom = server.atom("BIG").unwrap();
        let raw = server.get_property(1, atom, 6, 4).unwrap();
        assert_eq!(raw.item_count, 4);
        assert_eq!(raw.bytes_after, 24);
        assert_eq!(raw.buffer.as_ref().len(), 16);
        drop(raw);
        assert_eq!(server.live_buffers(), 0);
    }
}
