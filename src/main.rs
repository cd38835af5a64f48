//! `xwinctl` lists and controls the windows of an X11 window manager through the
//! [Extended Window Manager Hints (EWMH) specification](https://specifications.freedesktop.org/wm-spec/latest/),
//! falling back on the older GNOME/WinWM `_WIN_*` hints for window managers that predate it.
//!
//! ## Command line examples
//!
//! ### List windows
//! List every managed window with its process id, geometry and class.
//! ```bash
//! xwinctl list -pGx
//! ```
//!
//! ### Switch desktops
//! Switch to the third desktop.
//! ```bash
//! xwinctl desktop switch 2
//! ```
//!
//! ### Move a window
//! Move a window to the current desktop and bring it forward.
//! ```bash
//! xwinctl window move 0x0260000a -1
//! xwinctl window activate 0x0260000a
//! ```
mod print;

use clap::{crate_description, value_parser, Arg, ArgAction, ArgMatches, Command};
use gory::*;
use libxwinctl::prelude::*;
use std::process;
use tracing::Level;
use witcher::prelude::*;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("APP_BUILD_DATE"), ")");

fn cli() -> Command {
    Command::new("xwinctl")
        .about(crate_description!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .version(VERSION)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log to stderr, repeat for more detail"),
        )
        .arg(
            Arg::new("display")
                .long("display")
                .global(true)
                .value_name("DISPLAY")
                .help("X display to connect to instead of $DISPLAY"),
        )
        .subcommand(
            Command::new("list")
                .visible_alias("l")
                .about("List out all managed windows")
                .arg(Arg::new("pid").short('p').long("pid").action(ArgAction::SetTrue).help("Show process ids"))
                .arg(
                    Arg::new("geometry")
                        .short('G')
                        .long("geometry")
                        .action(ArgAction::SetTrue)
                        .help("Show window geometry"),
                )
                .arg(Arg::new("class").short('x').long("class").action(ArgAction::SetTrue).help("Show window classes")),
        )
        .subcommand(Command::new("info").visible_alias("i").about("Show window manager information"))
        .subcommand(
            Command::new("desktop")
                .visible_alias("d")
                .about("Manage desktops (also known as workspaces)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("switch")
                        .visible_alias("s")
                        .about("Switch to a desktop")
                        .arg(number("DESKTOP", "Desktop to switch to")),
                )
                .subcommand(
                    Command::new("count")
                        .visible_alias("c")
                        .about("Change the number of desktops")
                        .arg(number("COUNT", "Number of desktops")),
                )
                .subcommand(
                    Command::new("geometry")
                        .visible_alias("g")
                        .about("Change the size of the desktops")
                        .arg(number("WIDTH", "Desktop width"))
                        .arg(number("HEIGHT", "Desktop height")),
                )
                .subcommand(
                    Command::new("viewport")
                        .visible_alias("v")
                        .about("Change the viewport of the current desktop")
                        .arg(number("X", "Viewport x origin"))
                        .arg(number("Y", "Viewport y origin")),
                )
                .subcommand(
                    Command::new("show").about("Enter or leave show the desktop mode").arg(
                        Arg::new("STATE").required(true).value_parser(["on", "off"]).help("Desktop mode state"),
                    ),
                ),
        )
        .subcommand(
            Command::new("window")
                .visible_alias("w")
                .about("Control individual windows")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("move")
                        .visible_alias("m")
                        .about("Move a window to a desktop")
                        .arg(window_id())
                        .arg(number("DESKTOP", "Desktop to move to, -1 for the current desktop")),
                )
                .subcommand(
                    Command::new("rename")
                        .visible_alias("r")
                        .about("Change the title of a window")
                        .arg(window_id())
                        .arg(Arg::new("TITLE").required(true).help("New window title"))
                        .arg(
                            Arg::new("target")
                                .short('t')
                                .long("target")
                                .value_parser(["name", "icon", "both"])
                                .default_value("name")
                                .help("Which of the window's names to change"),
                        ),
                )
                .subcommand(
                    Command::new("activate").visible_alias("a").about("Activate a window").arg(window_id()),
                )
                .subcommand(Command::new("close").visible_alias("c").about("Close a window").arg(window_id())),
        )
}

// Required integer positional, negatives allowed
fn number(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).required(true).allow_negative_numbers(true).value_parser(value_parser!(i64)).help(help)
}

fn window_id() -> Arg {
    Arg::new("WINDOW").required(true).value_parser(parse_window).help("Window id in hex (0x prefixed) or decimal")
}

/// Parse a window id given in `0x` prefixed hex or decimal
fn parse_window(val: &str) -> std::result::Result<u32, WinCtlError> {
    let parsed = match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => val.parse::<u32>(),
    };
    parsed.map_err(|_| WinCtlError::InvalidWindowId(val.to_owned()))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).with_target(false).init();
}

fn int(matches: &ArgMatches, id: &str) -> i64 {
    matches.get_one::<i64>(id).copied().unwrap_or_default()
}

fn window(matches: &ArgMatches) -> u32 {
    matches.get_one::<u32>("WINDOW").copied().unwrap_or_default()
}

fn run(matches: &ArgMatches) -> Result<()> {
    let display = matches.get_one::<String>("display").map(String::as_str);
    let server = X11Server::connect(display).wrap("failed to connect to the X server")?;
    let dispatcher = Dispatcher::new(&server);

    match matches.subcommand() {
        Some(("list", sub)) => {
            let opts = ListOpts {
                show_pid: sub.get_flag("pid"),
                show_geometry: sub.get_flag("geometry"),
                show_class: sub.get_flag("class"),
            };
            let windows: Vec<_> =
                Enumerator::new(&server, opts).list_windows().wrap("failed to list windows")?.collect();
            print::windows(&windows, &opts);
        },
        Some(("info", _)) => {
            let info = Properties::new(&server).wm_info().wrap("failed to get window manager information")?;
            print::info(&info);
        },
        Some(("desktop", sub)) => match sub.subcommand() {
            Some(("switch", m)) => dispatcher.switch_desktop(int(m, "DESKTOP")).pass()?,
            Some(("count", m)) => dispatcher.change_number_of_desktops(int(m, "COUNT")).pass()?,
            Some(("geometry", m)) => dispatcher.change_geometry(int(m, "WIDTH"), int(m, "HEIGHT")).pass()?,
            Some(("viewport", m)) => dispatcher.change_viewport(int(m, "X"), int(m, "Y")).pass()?,
            Some(("show", m)) => {
                let show = m.get_one::<String>("STATE").map_or(false, |x| x == "on");
                dispatcher.show_desktop(show).pass()?
            },
            _ => unreachable!(),
        },
        Some(("window", sub)) => match sub.subcommand() {
            Some(("move", m)) => dispatcher
                .window_to_desktop(window(m), int(m, "DESKTOP"))
                .wrap(&format!("failed to move window 0x{:08x}", window(m)))?,
            Some(("rename", m)) => {
                let target = m.get_one::<String>("target").map_or("name", String::as_str);
                let target = TitleTarget::try_from(target).pass()?;
                let title = m.get_one::<String>("TITLE").map_or("", String::as_str);
                dispatcher
                    .set_window_title(window(m), title, target)
                    .wrap(&format!("failed to rename window 0x{:08x}", window(m)))?
            },
            Some(("activate", m)) => dispatcher.activate_window(window(m)).pass()?,
            Some(("close", m)) => dispatcher.close_window(window(m)).pass()?,
            _ => unreachable!(),
        },
        _ => unreachable!(),
    }
    Ok(())
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));
    if let Err(err) = run(&matches) {
        eprintln!("{}: {}", "error".red(), err);
        process::exit(1);
    }
}
