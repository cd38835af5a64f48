use crate::{property::Properties, server::XServer, Geometry, ListOpts, WinCtlError, WinCtlResult, WindowMetadata};
use tracing::debug;
use x11rb::protocol::xproto;

/// Enumerator assembles a metadata record for every window the window manager manages
pub struct Enumerator<'a, S: XServer> {
    props: Properties<'a, S>,
    opts: ListOpts,
}

impl<'a, S: XServer> Enumerator<'a, S> {
    /// Create a new enumerator
    ///
    /// ### Arguments
    /// * `server` - server session to query
    /// * `opts` - optional fields to fetch
    ///
    /// ### Examples
    /// ```ignore
    /// use libxwinctl::prelude::*;
    /// let server = X11Server::connect(None).unwrap();
    /// let windows = Enumerator::new(&server, ListOpts::default());
    /// ```
    pub fn new(server: &'a S, opts: ListOpts) -> Self {
        Self { props: Properties::new(server), opts }
    }

    /// Get the underlying property store
    pub fn props(&self) -> &Properties<'a, S> {
        &self.props
    }

    /// List the managed windows in client list order. Records are built lazily as the iterator is
    /// consumed so a window may already be gone by the time its record is produced.
    ///
    /// ### Errors
    /// * `ConnectionClosed` when the session is no longer usable
    /// * `ClientListNotFound` when neither client list property is available
    pub fn list_windows(&self) -> WinCtlResult<Windows<'_, 'a, S>> {
        if !self.props.server().is_open() {
            return Err(WinCtlError::ConnectionClosed.into());
        }
        let ids = self.props.client_list()?;
        debug!("list_windows: {} clients", ids.len());
        Ok(Windows { enumerator: self, ids: ids.into_iter() })
    }

    /// Get the metadata of a single window. Each field is fetched on its own and one failing only
    /// degrades that field to its not available marker.
    pub fn window(&self, win: xproto::Window) -> WindowMetadata {
        let props = &self.props;
        let metadata = WindowMetadata {
            id: win,
            desktop: props.window_desktop(win),
            class: if self.opts.show_class { props.window_class(win) } else { None },
            pid: if self.opts.show_pid { props.window_pid(win) } else { -1 },
            geometry: if self.opts.show_geometry { self.geometry(win) } else { None },
            client_machine: props.window_client_machine(win),
            title: props.window_title(win),
        };
        debug!("window: {:?}", metadata);
        metadata
    }

    /// Get the geometry of the given window in root coordinates
    pub fn geometry(&self, win: xproto::Window) -> Option<Geometry> {
        // The geometry's x, y location is relative to the parent window which for a reparenting
        // window manager is the frame. Translating against the root gives screen coordinates.
        let server = self.props.server();
        let g = server
            .geometry(win)
            .map_err(|err| debug!("geometry: id: {}, {}", win, err))
            .ok()?;
        let (x, y) = server
            .translate_coordinates(win, g.root, g.x, g.y)
            .map_err(|err| debug!("geometry: id: {}, translate: {}", win, err))
            .ok()?;
        Some(Geometry {
            x: x as i32,
            y: y as i32,
            width: g.width as u32,
            height: g.height as u32,
            border: g.border_width as u32,
            depth: g.depth,
        })
    }
}

/// Windows is a one shot iterator over the window records of a single client list snapshot
pub struct Windows<'e, 'a, S: XServer> {
    enumerator: &'e Enumerator<'a, S>,
    ids: std::vec::IntoIter<xproto::Window>,
}

impl<'e, 'a, S: XServer> Iterator for Windows<'e, 'a, S> {
    type Item = WindowMetadata;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|win| self.enumerator.window(win))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<'e, 'a, S: XServer> ExactSizeIterator for Windows<'e, 'a, S> {}
