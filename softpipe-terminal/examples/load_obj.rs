/// Example: Load and render a Wavefront OBJ file in the terminal
///
/// Usage: cargo run --example load_obj -- path/to/file.obj

use softpipe_core::obj;
use softpipe_terminal::{framing_config, shade_by_normal, TerminalApp};
use std::env;
use std::fs;
use std::io;

fn main() -> io::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <obj-file>", args[0]);
        eprintln!("\nNo OBJ file provided, using default cube...");
        let cube = softpipe_core::Mesh::cube(2.0);
        let mut app = TerminalApp::new(cube.clone(), framing_config(&cube))?;
        return app.run();
    }

    let obj_path = &args[1];

    println!("Loading OBJ file: {}", obj_path);

    let text = fs::read_to_string(obj_path)
        .map_err(|e| io::Error::new(e.kind(), format!("Failed to read OBJ file: {}", e)))?;

    // OBJ faces wind counter-clockwise; the pipeline keeps clockwise faces
    let mesh = obj::parse_obj(&text)
        .map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Failed to parse OBJ: {}", e))
        })?
        .with_reversed_winding();
    let mesh = shade_by_normal(mesh);

    println!("Loaded {} triangles", mesh.triangles().len());
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let config = framing_config(&mesh);
    let mut app = TerminalApp::new(mesh, config)?;
    app.run()
}
