//! Column formatting for the window listing and window manager information
use gory::*;
use libxwinctl::{ListOpts, WindowMetadata, WmInfo};

/// Format the header row matching the columns `rows` produces
pub fn header(windows: &[WindowMetadata], opts: &ListOpts) -> String {
    let (class_width, machine_width) = widths(windows, opts);
    let mut line = format!("{:<10} {:>2}", "ID", "DS");
    if opts.show_pid {
        line += &format!(" {:<6}", "PID");
    }
    if opts.show_geometry {
        line += &format!(" {:<4} {:<4} {:<4} {:<4}", "X", "Y", "W", "H");
    }
    if opts.show_class {
        line += &format!(" {:<1$}", "CLASS", class_width);
    }
    line += &format!(" {:>1$} {2}", "HOST", machine_width, "TITLE");
    line
}

/// Format one row per window. The class column is padded to the widest class and the client
/// machine right justified to the widest machine name.
pub fn rows(windows: &[WindowMetadata], opts: &ListOpts) -> Vec<String> {
    let (class_width, machine_width) = widths(windows, opts);
    windows
        .iter()
        .map(|win| {
            let mut line = format!("0x{:08x} {:>2}", win.id, win.desktop.to_string());
            if opts.show_pid {
                line += &format!(" {:<6}", win.pid);
            }
            if opts.show_geometry {
                line += &match win.geometry {
                    Some(g) => format!(" {:<4} {:<4} {:<4} {:<4}", g.x, g.y, g.width, g.height),
                    None => format!(" {:<4} {:<4} {:<4} {:<4}", "-", "-", "-", "-"),
                };
            }
            if opts.show_class {
                line += &format!(" {:<1$}", win.class_name(), class_width);
            }
            line += &format!(" {:>1$} {2}", win.client_machine, machine_width, win.title);
            line
        })
        .collect()
}

// Widths are counted in characters not bytes so multi-byte names line up
fn widths(windows: &[WindowMetadata], opts: &ListOpts) -> (usize, usize) {
    let class = match opts.show_class {
        true => windows.iter().map(|x| x.class_name().chars().count()).max().unwrap_or(0).max(5),
        false => 0,
    };
    let machine = windows.iter().map(|x| x.client_machine.chars().count()).max().unwrap_or(0).max(4);
    (class, machine)
}

/// Print the window listing
pub fn windows(windows: &[WindowMetadata], opts: &ListOpts) {
    let header = header(windows, opts);
    println!("{}", header.as_str().cyan());
    for row in rows(windows, opts) {
        println!("{}", row);
    }
}

/// Print the window manager's information
pub fn info(info: &WmInfo) {
    println!("{}", "Window Manager Information".cyan());
    println!("-----------------------------------------------------------------------");
    println!("Name:              {}", info.name);
    println!("Desktops:          {}", info.desktops.map_or("N/A".to_owned(), |x| x.to_string()));
    println!("Current Desktop:   {}", info.current_desktop);
    println!(
        "Showing Desktop:   {}",
        match info.showing_desktop {
            Some(true) => "on",
            Some(false) => "off",
            None => "N/A",
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use libxwinctl::{ClassHint, Desktop, Geometry};

    fn windows() -> Vec<WindowMetadata> {
        vec![
            WindowMetadata {
                id: 0x0a00_0001,
                desktop: Desktop::Index(0),
                class: Some(ClassHint::new("xterm", "XTerm")),
                pid: 1234,
                geometry: Some(Geometry { x: 10, y: 20, width: 640, height: 480, border: 0, depth: 24 }),
                client_machine: "box".to_owned(),
                title: "Terminal".to_owned(),
            },
            WindowMetadata {
                id: 0x0a00_0002,
                desktop: Desktop::Unknown,
                class: None,
                pid: -1,
                geometry: None,
                client_machine: "workstation".to_owned(),
                title: "N/A".to_owned(),
            },
        ]
    }

    #[test]
    fn test_rows_minimal() {
        let opts = ListOpts { show_pid: false, show_geometry: false, show_class: false };
        assert_eq!(
            rows(&windows(), &opts),
            vec!["0x0a000001  0         box Terminal", "0x0a000002  - workstation N/A"]
        );
    }

    #[test]
    fn test_rows_full() {
        let rows = rows(&windows(), &ListOpts::default());
        assert_eq!(rows[0], "0x0a000001  0 1234   10   20   640  480  xterm.XTerm         box Terminal");
        assert_eq!(rows[1], "0x0a000002  - -1     -    -    -    -    N/A         workstation N/A");
    }

    #[test]
    fn test_header_matches_rows() {
        let opts = ListOpts::default();
        let header = header(&windows(), &opts);
        assert!(header.starts_with(&format!("ID{}DS PID    X    Y    W    H    CLASS", " ".repeat(9))));
        assert!(header.ends_with("       HOST TITLE"));
    }
}
