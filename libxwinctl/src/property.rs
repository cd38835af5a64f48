//! Generic typed property fetch against the server's property store.
//!
//! [Window Properties](https://tronche.com/gui/x/xlib/window-information/XGetWindowProperty.html)
//! Every property is a typed, variable length array of 8, 16 or 32-bit items. `Properties` resolves
//! a property name, issues a bounded read and validates the reply before handing the still
//! undecoded buffer to the caller. The type specific interpretation lives in the decoders.
use crate::{atoms::AtomResolver, server::XServer, WinCtlError, WinCtlResult};
use std::fmt;
use tracing::{debug, trace};
use x11rb::protocol::xproto::{self, Atom};

/// Ceiling in bytes for any property read. Window metadata is never legitimately larger so a
/// bigger value is truncated rather than read in pieces.
pub const MAX_PROPERTY_LEN: u32 = 4096;

/// Accept a property of any type
pub const ANY_PROPERTY_TYPE: Atom = 0;

/// Number of bits per item of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyFormat {
    Bits8,
    Bits16,
    Bits32,
}

impl PropertyFormat {
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(PropertyFormat::Bits8),
            16 => Some(PropertyFormat::Bits16),
            32 => Some(PropertyFormat::Bits32),
            _ => None,
        }
    }

    /// Size of a single item in bytes
    pub fn item_size(&self) -> usize {
        match self {
            PropertyFormat::Bits8 => 1,
            PropertyFormat::Bits16 => 2,
            PropertyFormat::Bits32 => 4,
        }
    }
}

// Implement format! support
impl fmt::Display for PropertyFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.item_size() * 8)
    }
}

/// A validated property value. The buffer is held until the value is dropped, which releases it
/// exactly once on every path.
#[derive(Debug)]
pub struct PropertyValue<B: AsRef<[u8]>> {
    type_: Atom,
    format: PropertyFormat,
    item_count: u32,
    buffer: B,
}

impl<B: AsRef<[u8]>> PropertyValue<B> {
    /// Get the type atom the server stored the property under
    pub fn type_(&self) -> Atom {
        self.type_
    }

    pub fn format(&self) -> PropertyFormat {
        self.format
    }

    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Decoded length in bytes i.e. item size times item count, which is not necessarily the
    /// transfer size of the reply.
    pub fn len(&self) -> usize {
        self.format.item_size() * self.item_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Get the raw bytes of the value
    pub fn bytes(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.len()]
    }

    /// Deserialize the value as an array of 32-bit items after checking it really is one
    ///
    /// ### Arguments
    /// * `name` - property name used for error reporting
    pub fn u32s(&self, name: &str) -> WinCtlResult<Vec<u32>> {
        let bytes = self.bytes();
        if self.format != PropertyFormat::Bits32 || bytes.len() % 4 != 0 {
            debug!("u32s: {} is format {} with {} bytes", name, self.format, bytes.len());
            return Err(WinCtlError::MalformedProperty(name.to_owned()).into());
        }
        Ok(bytes.chunks_exact(4).map(|x| u32::from_ne_bytes([x[0], x[1], x[2], x[3]])).collect())
    }
}

/// Properties provides the property store of one server session along with the atom resolver
/// used to name into it.
pub struct Properties<'a, S: XServer> {
    server: &'a S,
    atoms: AtomResolver<'a, S>,
}

impl<'a, S: XServer> Properties<'a, S> {
    pub fn new(server: &'a S) -> Self {
        Self { server, atoms: AtomResolver::new(server) }
    }

    /// Get the underlying server
    pub fn server(&self) -> &'a S {
        self.server
    }

    /// Get the atom resolver
    pub fn atoms(&self) -> &AtomResolver<'a, S> {
        &self.atoms
    }

    /// Get the given property of the given window
    ///
    /// ### Arguments
    /// * `win` - id of the window to read from
    /// * `expected_type` - type the property must be stored as or `ANY_PROPERTY_TYPE`
    /// * `name` - name of the property
    ///
    /// ### Errors
    /// * `PropertyNotFound` when the name was never interned, the property is not set, the window
    ///   is gone or the request failed
    /// * `PropertyTypeMismatch` when the property is stored under a different type
    /// * `MalformedProperty` when the reply's format or length doesn't add up
    pub fn get_property(
        &self, win: xproto::Window, expected_type: Atom, name: &str,
    ) -> WinCtlResult<PropertyValue<S::Buffer>> {
        let property = self.atoms.resolve(name, false).map_err(|_| not_found(name))?;

        // long_length is given in 32-bit multiples
        let raw = match self.server.get_property(win, property, expected_type, MAX_PROPERTY_LEN / 4) {
            Ok(raw) => raw,
            Err(err) => {
                debug!("get_property: cannot get {} of {}: {}", name, win, err);
                return Err(not_found(name));
            },
        };
        if raw.type_ == x11rb::NONE {
            trace!("get_property: {} not found on {}", name, win);
            return Err(not_found(name));
        }
        if expected_type != ANY_PROPERTY_TYPE && raw.type_ != expected_type {
            debug!("get_property: invalid type of {} on {}: {} != {}", name, win, raw.type_, expected_type);
            return Err(WinCtlError::PropertyTypeMismatch {
                name: name.to_owned(),
                expected: expected_type,
                actual: raw.type_,
            }
            .into());
        }
        if raw.bytes_after > 0 {
            trace!("get_property: {} on {} truncated, {} bytes left", name, win, raw.bytes_after);
        }

        let format = PropertyFormat::from_bits(raw.format).ok_or_else(|| malformed(name))?;
        let value = PropertyValue { type_: raw.type_, format, item_count: raw.item_count, buffer: raw.buffer };
        if value.buffer.as_ref().len() != value.len() {
            debug!(
                "get_property: {} on {} has {} bytes for {} items of {} bits",
                name,
                win,
                value.buffer.as_ref().len(),
                value.item_count,
                format
            );
            return Err(malformed(name));
        }
        Ok(value)
    }

    /// Try each property name in turn moving on only while the previous one is absent or stored
    /// under the wrong type. The first name that yields anything else, a value or a hard error,
    /// ends the chain so results of the different conventions are never mixed.
    ///
    /// ### Arguments
    /// * `names` - property names in order of preference
    /// * `fetch` - fetch and decode the given property name
    pub fn first_present<T, F>(&self, names: &[&str], mut fetch: F) -> WinCtlResult<T>
    where
        F: FnMut(&str) -> WinCtlResult<T>,
    {
        let mut last = None;
        for &name in names {
            match fetch(name) {
                Err(err) if err.is_absent() => {
                    trace!("first_present: {} absent: {}", name, err);
                    last = Some(err);
                },
                result => return result,
            }
        }
        Err(last.unwrap_or_else(|| not_found(&names.join(" or "))))
    }
}

fn not_found(name: &str) -> crate::ErrorWrapper {
    WinCtlError::PropertyNotFound(name.to_owned()).into()
}

fn malformed(name: &str) -> crate::ErrorWrapper {
    WinCtlError::MalformedProperty(name.to_owned()).into()
}
