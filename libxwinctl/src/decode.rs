//! Type specific decoders built on top of [`Properties::get_property`].
//!
//! The EWMH spec competes with the older GNOME/WinWM `_WIN_*` convention for a few values. For the
//! client list, the current desktop and a window's desktop the modern name is always tried first
//! and the legacy one only when the modern one is absent or of the wrong type.
use crate::{
    atoms::*,
    model::{latin1, ClassHint, Desktop, WmInfo, NOT_AVAILABLE},
    property::{Properties, ANY_PROPERTY_TYPE},
    server::XServer,
    ErrorWrapper, WinCtlError, WinCtlResult,
};
use tracing::debug;
use x11rb::protocol::xproto::{self, Atom, AtomEnum};

impl<'a, S: XServer> Properties<'a, S> {
    /// Get the given property as a list of window ids
    ///
    /// ### Arguments
    /// * `win` - id of the window to read from
    /// * `name` - name of the property e.g. `_NET_CLIENT_LIST`
    pub fn window_list(&self, win: xproto::Window, name: &str) -> WinCtlResult<Vec<xproto::Window>> {
        // Defined as: WINDOW[]/32
        self.get_property(win, AtomEnum::WINDOW.into(), name)?.u32s(name)
    }

    /// Get the given property as a single cardinal
    ///
    /// ### Arguments
    /// * `win` - id of the window to read from
    /// * `name` - name of the property e.g. `_NET_WM_PID`
    pub fn cardinal(&self, win: xproto::Window, name: &str) -> WinCtlResult<u32> {
        // Defined as: CARDINAL/32
        self.get_property(win, AtomEnum::CARDINAL.into(), name)?
            .u32s(name)?
            .first()
            .copied()
            .ok_or_else(|| WinCtlError::MalformedProperty(name.to_owned()).into())
    }

    /// Get the given property as text. `UTF8_STRING` values are decoded as UTF-8, anything else
    /// as Latin-1. Only the bytes up to the first null are used.
    ///
    /// ### Arguments
    /// * `win` - id of the window to read from
    /// * `expected_type` - type the text must be stored as or `ANY_PROPERTY_TYPE`
    /// * `name` - name of the property e.g. `WM_NAME`
    pub fn text(&self, win: xproto::Window, expected_type: Atom, name: &str) -> WinCtlResult<String> {
        let value = self.get_property(win, expected_type, name)?;
        let bytes = value.bytes();
        let bytes = bytes.iter().position(|x| *x == 0).map_or(bytes, |end| &bytes[..end]);
        if self.atoms().resolve(UTF8_STRING, false).ok() == Some(value.type_()) {
            std::str::from_utf8(bytes).map(ToOwned::to_owned).map_err(|err| {
                debug!("text: {} on {} is not valid utf-8: {}", name, win, err);
                WinCtlError::MalformedProperty(name.to_owned()).into()
            })
        } else {
            Ok(latin1(bytes))
        }
    }

    /// Get the given property as `UTF8_STRING` text
    pub fn utf8_text(&self, win: xproto::Window, name: &str) -> WinCtlResult<String> {
        // When UTF8_STRING isn't interned nothing can be stored under it
        let utf8 = self.atoms().resolve(UTF8_STRING, false)?;
        self.text(win, utf8, name)
    }

    /// Get the window manager's client list
    pub fn client_list(&self) -> WinCtlResult<Vec<xproto::Window>> {
        let root = self.server().root();
        self.first_present(&[NET_CLIENT_LIST, WIN_CLIENT_LIST], |name| self.window_list(root, name))
            .map_err(|err| {
                debug!("client_list: {}", err);
                if err.is_absent() {
                    ErrorWrapper::from(WinCtlError::ClientListNotFound)
                } else {
                    err
                }
            })
    }

    /// Get the current desktop
    pub fn current_desktop(&self) -> WinCtlResult<i64> {
        let root = self.server().root();
        self.first_present(&[NET_CURRENT_DESKTOP, WIN_WORKSPACE], |name| self.cardinal(root, name))
            .map(widen)
            .map_err(|err| {
                debug!("current_desktop: {}", err);
                if err.is_absent() {
                    ErrorWrapper::from(WinCtlError::CurrentDesktopNotFound)
                } else {
                    err
                }
            })
    }

    /// Get the desktop the given window is on, `-1` meaning all desktops
    pub fn window_desktop(&self, win: xproto::Window) -> Desktop {
        match self.first_present(&[NET_WM_DESKTOP, WIN_WORKSPACE], |name| self.cardinal(win, name)) {
            Ok(desktop) => Desktop::Index(widen(desktop)),
            Err(err) => {
                debug!("window_desktop: id: {}, {}", win, err);
                Desktop::Unknown
            },
        }
    }

    /// Get the process id of the given window's client or `-1` when unknown
    pub fn window_pid(&self, win: xproto::Window) -> i64 {
        // Defined as: _NET_WM_PID, CARDINAL/32
        self.cardinal(win, NET_WM_PID).map_or(-1, i64::from)
    }

    /// Get the title of the given window or the not available marker
    pub fn window_title(&self, win: xproto::Window) -> String {
        // Defined as: _NET_WM_NAME, UTF8_STRING falling back on the ICCCM WM_NAME, STRING
        let title = self.first_present(&[NET_WM_NAME, WM_NAME], |name| match name {
            WM_NAME => self.text(win, AtomEnum::STRING.into(), name),
            _ => self.utf8_text(win, name),
        });
        title.unwrap_or_else(|err| {
            debug!("window_title: id: {}, {}", win, err);
            NOT_AVAILABLE.to_owned()
        })
    }

    /// Get the name of the machine the given window's client runs on or the not available marker
    pub fn window_client_machine(&self, win: xproto::Window) -> String {
        // WM_CLIENT_MACHINE is a text property of whatever encoding the client chose
        match self.text(win, ANY_PROPERTY_TYPE, WM_CLIENT_MACHINE) {
            Ok(machine) if !machine.is_empty() => machine,
            Ok(_) => NOT_AVAILABLE.to_owned(),
            Err(err) => {
                debug!("window_client_machine: id: {}, {}", win, err);
                NOT_AVAILABLE.to_owned()
            },
        }
    }

    /// Get the `WM_CLASS` hint of the given window
    pub fn window_class(&self, win: xproto::Window) -> Option<ClassHint> {
        match self.server().class_hint(win) {
            Ok(hint) => hint,
            Err(err) => {
                debug!("window_class: id: {}, {}", win, err);
                None
            },
        }
    }

    /// Get the window manager's informational properties
    pub fn wm_info(&self) -> WinCtlResult<WmInfo> {
        let root = self.server().root();

        // The supporting window carries the window manager's name, legacy window managers have none
        let check = match self.window_list(root, NET_SUPPORTING_WM_CHECK) {
            Ok(check) => check,
            Err(err) if err.is_absent() => {
                debug!("wm_info: {}", err);
                vec![]
            },
            Err(err) => return Err(err),
        };
        let name = match check.first() {
            Some(win) => self.window_title(*win),
            None => NOT_AVAILABLE.to_owned(),
        };
        let info = WmInfo {
            name,
            desktops: self.cardinal(root, NET_NUMBER_OF_DESKTOPS).ok(),
            current_desktop: self.current_desktop().map_or(Desktop::Unknown, Desktop::Index),
            showing_desktop: self.cardinal(root, NET_SHOWING_DESKTOP).ok().map(|x| x != 0),
        };
        debug!("wm_info: {:?}", info);
        Ok(info)
    }
}

// Desktops are presented signed so that 0xFFFFFFFF reads as -1 i.e. all desktops
fn widen(desktop: u32) -> i64 {
    desktop as i32 as i64
}
