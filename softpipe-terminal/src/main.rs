/// softpipe terminal demo - drag-to-look cube
///
/// Usage: softpipe-terminal [--fov <degrees>]
/// Controls:
///   - Left drag: Look around
///   - WASD / Arrow Keys while dragging: Move
///   - Q/ESC: Quit
use log::info;
use softpipe_core::Mesh;
use softpipe_terminal::{framing_config, TerminalApp};
use std::env;
use std::io;

fn parse_fov(args: &[String]) -> io::Result<Option<f32>> {
    match args.iter().position(|a| a == "--fov") {
        None => Ok(None),
        Some(i) => args
            .get(i + 1)
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|fov| *fov > 0.0 && *fov < 180.0)
            .map(Some)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "--fov expects degrees between 0 and 180",
                )
            }),
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let cube = Mesh::cube(2.0);

    let mut config = framing_config(&cube);
    if let Some(fov) = parse_fov(&args)? {
        config = config.with_fov_degrees(fov);
    }
    info!("starting with fov {:.1} deg", config.projection.fov_y.to_degrees());

    println!("softpipe terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(cube, config)?;
    app.run()
}
