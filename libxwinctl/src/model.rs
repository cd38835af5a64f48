use std::{convert, fmt};

use x11rb::protocol::xproto::Window;

use crate::WinCtlError;

/// Marker used in place of any text value that could not be fetched or decoded
pub const NOT_AVAILABLE: &str = "N/A";

/// ClassHint is the `WM_CLASS` pair of instance and class names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHint {
    pub instance: String,
    pub class: String,
}

impl ClassHint {
    /// Create a new class hint from its two halves
    pub fn new<A: Into<String>, B: Into<String>>(instance: A, class: B) -> Self {
        Self { instance: instance.into(), class: class.into() }
    }

    /// Parse the raw `WM_CLASS` value which is two consecutive null terminated Latin-1 strings.
    /// Anything other than exactly two fields is rejected so that a partial hint never surfaces.
    ///
    /// ### Arguments
    /// * `bytes` - raw property value e.g. `b"instance\0class\0"`
    ///
    /// ### Examples
    /// ```
    /// use libxwinctl::prelude::*;
    /// let hint = ClassHint::from_bytes(b"xterm\0XTerm\0").unwrap();
    /// assert_eq!(hint.to_string(), "xterm.XTerm");
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        // The trailing null is optional in practice
        let bytes = bytes.strip_suffix(&[0]).unwrap_or(bytes);
        let mut fields = bytes.split(|x| *x == 0);
        let instance = fields.next()?;
        let class = fields.next()?;
        if fields.next().is_some() {
            return None;
        }
        Self::from_fields(instance, class)
    }

    /// Build the hint from its already split halves as the structured accessor hands them out.
    /// An empty class or a null inside either half means the value wasn't a two field hint.
    ///
    /// ### Arguments
    /// * `instance` - raw instance name
    /// * `class` - raw class name
    pub fn from_fields(instance: &[u8], class: &[u8]) -> Option<Self> {
        if class.is_empty() || instance.contains(&0) || class.contains(&0) {
            return None;
        }
        Some(Self::new(latin1(instance), latin1(class)))
    }
}

// Implement format! support
impl fmt::Display for ClassHint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.instance, self.class)
    }
}

/// Decode Latin-1 bytes which map one to one onto the first 256 unicode code points
pub(crate) fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|x| *x as char).collect()
}

/// Desktop a window lives on. A window without any desktop property is `Unknown` which is
/// deliberately kept apart from desktop 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Desktop {
    Index(i64),
    Unknown,
}

impl Desktop {
    /// Get the desktop index if known
    pub fn index(&self) -> Option<i64> {
        match self {
            Desktop::Index(x) => Some(*x),
            Desktop::Unknown => None,
        }
    }
}

// Implement format! support
impl fmt::Display for Desktop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Desktop::Index(x) => write!(f, "{}", x),
            Desktop::Unknown => write!(f, "-"),
        }
    }
}

/// Geometry of a window in root window coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub border: u32,
    pub depth: u8,
}

/// WindowMetadata is a snapshot of everything known about a single managed window. It is built
/// fresh on every listing as the server may change or destroy the window at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowMetadata {
    pub id: Window,
    pub desktop: Desktop,
    pub class: Option<ClassHint>,
    pub pid: i64,
    pub geometry: Option<Geometry>,
    pub client_machine: String,
    pub title: String,
}

impl WindowMetadata {
    /// Get the class in its dotted display form or the not available marker
    pub fn class_name(&self) -> String {
        self.class.as_ref().map_or(NOT_AVAILABLE.to_owned(), |x| x.to_string())
    }
}

/// ListOpts controls which of the optional window fields are fetched during a listing.
/// Fields that are not requested are left with their not available marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOpts {
    pub show_pid: bool,
    pub show_geometry: bool,
    pub show_class: bool,
}

impl Default for ListOpts {
    fn default() -> Self {
        Self { show_pid: true, show_geometry: true, show_class: true }
    }
}

/// TitleTarget selects which of the window's names a rename applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleTarget {
    Name,
    IconName,
    Both,
}

impl TitleTarget {
    pub fn name(&self) -> bool {
        matches!(self, TitleTarget::Name | TitleTarget::Both)
    }

    pub fn icon_name(&self) -> bool {
        matches!(self, TitleTarget::IconName | TitleTarget::Both)
    }
}

// Implement format! support
impl fmt::Display for TitleTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TitleTarget::IconName => write!(f, "icon"),
            _ => write!(f, "{}", format!("{:?}", self).to_lowercase()),
        }
    }
}

// Convert from &str to TitleTarget
impl convert::TryFrom<&str> for TitleTarget {
    type Error = WinCtlError;

    fn try_from(val: &str) -> Result<Self, Self::Error> {
        match val.to_lowercase().as_ref() {
            "name" | "n" => Ok(TitleTarget::Name),
            "icon" | "i" => Ok(TitleTarget::IconName),
            "both" | "t" => Ok(TitleTarget::Both),
            _ => Err(WinCtlError::InvalidTitleTarget(val.to_string())),
        }
    }
}

// Convert from String to TitleTarget
impl convert::TryFrom<String> for TitleTarget {
    type Error = WinCtlError;

    fn try_from(val: String) -> Result<Self, Self::Error> {
        TitleTarget::try_from(val.as_str())
    }
}

/// Information about the running window manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmInfo {
    pub name: String,
    pub desktops: Option<u32>,
    pub current_desktop: Desktop,
    pub showing_desktop: Option<bool>,
}
