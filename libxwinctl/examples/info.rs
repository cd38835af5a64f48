use libxwinctl::prelude::*;

fn main() {
    let server = X11Server::connect(None).unwrap();
    let info = Properties::new(&server).wm_info().unwrap();
    println!("X11 Information");
    println!("-----------------------------------------------------------------------");
    println!("Window Manager:    {}", info.name);
    println!("Root Window:       0x{:08x}", server.root());
    println!("Screen:            {}", server.screen());
    println!("Desktops:          {}", info.desktops.map_or("N/A".to_owned(), |x| x.to_string()));
    println!("Current Desktop:   {}", info.current_desktop);
    println!();
    println!("Windows");
    println!("{:-<120}", "");

    println!("{:<10} {:<3} {:<6} {:<5} {:<5} {:<4} {:<4} {:<18} {}", "ID", "DSK", "PID", "X", "Y", "W", "H", "CLASS", "NAME");
    for win in Enumerator::new(&server, ListOpts::default()).list_windows().unwrap() {
        let (x, y, w, h) = win.geometry.map_or((0, 0, 0, 0), |g| (g.x, g.y, g.width, g.height));
        println!(
            "0x{:08x} {:>3} {:<6} {:<5} {:<5} {:<4} {:<4} {:<18} {}",
            win.id,
            win.desktop.to_string(),
            win.pid,
            x,
            y,
            w,
            h,
            win.class_name(),
            win.title
        );
    }
}
