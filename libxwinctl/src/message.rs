//! Client messages are how a client asks an EWMH compliant window manager to do something on its
//! behalf. Each message is a fixed 32 byte event sent to the root window with the substructure
//! masks set so that only the window manager receives it.
//!
//! [Root Window Messages](https://specifications.freedesktop.org/wm-spec/latest/ar01s03.html)
use crate::{
    atoms::*,
    property::Properties,
    server::XServer,
    ErrorWrapper, TitleTarget, WinCtlError, WinCtlResult,
};
use tracing::debug;
use x11rb::{
    protocol::xproto::{self, Atom, AtomEnum, ClientMessageEvent, EventMask, CLIENT_MESSAGE_EVENT},
    x11_utils::TryParse,
};

/// Source indication for requests coming from pagers and other direct user actions
pub const SOURCE_INDICATION_PAGER: i64 = 2;

/// ClientMessage is a single control request. Only the 32-bit data format is ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientMessage {
    pub window: xproto::Window,
    pub message_type: Atom,
    pub data: [i64; 5],
}

impl ClientMessage {
    /// Data format of every message this crate sends
    pub const FORMAT: u8 = 32;

    pub fn new(window: xproto::Window, message_type: Atom, data: [i64; 5]) -> Self {
        Self { window, message_type, data }
    }

    /// Build the x11rb event. Data words are 32 bits on the wire so each is truncated to its low
    /// 32 bits e.g. `-1` is sent as `0xFFFFFFFF`.
    pub fn to_event(&self) -> ClientMessageEvent {
        ClientMessageEvent::new(Self::FORMAT, self.window, self.message_type, self.data.map(|x| x as u32))
    }

    /// Encode into the 32 byte wire form
    pub fn encode(&self) -> [u8; 32] {
        self.to_event().into()
    }

    /// Decode from the 32 byte wire form, data words are sign extended
    ///
    /// ### Arguments
    /// * `bytes` - wire form of a client message event
    pub fn decode(bytes: &[u8; 32]) -> WinCtlResult<Self> {
        let invalid = || ErrorWrapper::from(WinCtlError::MalformedProperty("client message".to_owned()));
        let (event, _) = ClientMessageEvent::try_parse(bytes).map_err(|_| invalid())?;
        if event.response_type & 0x7f != CLIENT_MESSAGE_EVENT || event.format != Self::FORMAT {
            return Err(invalid());
        }
        Ok(Self::new(event.window, event.type_, event.data.as_data32().map(|x| x as i32 as i64)))
    }
}

/// Dispatcher sends control requests to the window manager
pub struct Dispatcher<'a, S: XServer> {
    props: Properties<'a, S>,
}

impl<'a, S: XServer> Dispatcher<'a, S> {
    pub fn new(server: &'a S) -> Self {
        Self { props: Properties::new(server) }
    }

    fn root(&self) -> xproto::Window {
        self.props.server().root()
    }

    /// Send the named control message about the given window to the window manager
    ///
    /// ### Arguments
    /// * `win` - id of the window the message is about
    /// * `name` - message type name e.g. `_NET_CURRENT_DESKTOP`
    /// * `data` - message payload, unused trailing words should be zero
    ///
    /// ### Errors
    /// * `SendFailed` when the message could not be delivered
    ///
    /// ### Examples
    /// ```ignore
    /// use libxwinctl::prelude::*;
    /// let server = X11Server::connect(None).unwrap();
    /// let dispatcher = Dispatcher::new(&server);
    /// dispatcher.send_control(server.root(), "_NET_NUMBER_OF_DESKTOPS", [4, 0, 0, 0, 0]).unwrap();
    /// ```
    pub fn send_control(&self, win: xproto::Window, name: &str, data: [i64; 5]) -> WinCtlResult<()> {
        // The message name is our own vocabulary so interning it is fine
        let message_type = self.props.atoms().resolve(name, true).map_err(|err| {
            debug!("send_control: cannot intern {}: {}", name, err);
            ErrorWrapper::from(WinCtlError::SendFailed(name.to_owned()))
        })?;
        let msg = ClientMessage::new(win, message_type, data);
        let mask = EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY;
        self.props.server().send_client_message(&msg, mask).map_err(|err| {
            debug!("send_control: {} for {} failed: {}", name, win, err);
            ErrorWrapper::from(WinCtlError::SendFailed(name.to_owned()))
        })?;
        debug!("send_control: win: {}, msg: {}, data: {:?}", win, name, data);
        Ok(())
    }

    /// Enter or leave the window manager's show the desktop mode
    pub fn show_desktop(&self, show: bool) -> WinCtlResult<()> {
        self.send_control(self.root(), NET_SHOWING_DESKTOP, [show as i64, 0, 0, 0, 0])
    }

    /// Change the viewport origin of the current desktop
    pub fn change_viewport(&self, x: i64, y: i64) -> WinCtlResult<()> {
        self.send_control(self.root(), NET_DESKTOP_VIEWPORT, [x, y, 0, 0, 0])
    }

    /// Change the size of the desktops
    pub fn change_geometry(&self, w: i64, h: i64) -> WinCtlResult<()> {
        self.send_control(self.root(), NET_DESKTOP_GEOMETRY, [w, h, 0, 0, 0])
    }

    /// Change the number of desktops
    pub fn change_number_of_desktops(&self, n: i64) -> WinCtlResult<()> {
        self.send_control(self.root(), NET_NUMBER_OF_DESKTOPS, [n, 0, 0, 0, 0])
    }

    /// Switch to the given desktop
    pub fn switch_desktop(&self, desktop: i64) -> WinCtlResult<()> {
        self.send_control(self.root(), NET_CURRENT_DESKTOP, [desktop, 0, 0, 0, 0])
    }

    /// Move the given window to the given desktop
    ///
    /// ### Arguments
    /// * `win` - id of the window to move
    /// * `desktop` - desktop to move to, `-1` for the current desktop
    pub fn window_to_desktop(&self, win: xproto::Window, desktop: i64) -> WinCtlResult<()> {
        let desktop = match desktop {
            -1 => self.props.current_desktop()?,
            _ => desktop,
        };
        self.send_control(win, NET_WM_DESKTOP, [desktop, 0, 0, 0, 0])
    }

    /// Ask the window manager to activate the given window
    pub fn activate_window(&self, win: xproto::Window) -> WinCtlResult<()> {
        self.send_control(win, NET_ACTIVE_WINDOW, [SOURCE_INDICATION_PAGER, 0, 0, 0, 0])
    }

    /// Ask the window manager to close the given window
    pub fn close_window(&self, win: xproto::Window) -> WinCtlResult<()> {
        self.send_control(win, NET_CLOSE_WINDOW, [0, SOURCE_INDICATION_PAGER, 0, 0, 0])
    }

    /// Rename the given window. This writes the properties directly rather than going through the
    /// window manager. Both the legacy `STRING` and the `UTF8_STRING` forms are written, the legacy
    /// one is deleted when the title has characters Latin-1 can't hold.
    ///
    /// ### Arguments
    /// * `win` - id of the window to rename
    /// * `title` - new title
    /// * `target` - which of the window's names to change
    pub fn set_window_title(&self, win: xproto::Window, title: &str, target: TitleTarget) -> WinCtlResult<()> {
        let server = self.props.server();
        let atoms = self.props.atoms();
        let legacy = to_latin1(title);
        let utf8 = atoms.resolve(UTF8_STRING, true)?;

        let mut names = vec![];
        if target.name() {
            names.push((AtomEnum::WM_NAME, NET_WM_NAME));
        }
        if target.icon_name() {
            names.push((AtomEnum::WM_ICON_NAME, NET_WM_ICON_NAME));
        }
        for (legacy_name, utf8_name) in names {
            match legacy {
                Some(ref bytes) => {
                    server.change_property8(win, legacy_name.into(), AtomEnum::STRING.into(), bytes)?
                },
                None => server.delete_property(win, legacy_name.into())?,
            }
            let property = atoms.resolve(utf8_name, true)?;
            server.change_property8(win, property, utf8, title.as_bytes())?;
        }
        debug!("set_window_title: id: {}, title: {}, target: {}", win, title, target);
        Ok(())
    }
}

// Encode as Latin-1 if every character fits
fn to_latin1(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|x| u8::try_from(u32::from(x)).ok()).collect()
}
