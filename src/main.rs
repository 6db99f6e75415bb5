use std::env;
use std::process::ExitCode;

use winit::event_loop::{ControlFlow, EventLoop};

use hearth::composite::Compositor;
use hearth::error::{RunError, SnapshotError};
use hearth::render::App;
use hearth::volume::{NoiseVolume, VolumeParams};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hearth: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), RunError> {
    let volume = NoiseVolume::generate(&VolumeParams::default());

    let args: Vec<String> = env::args().collect();
    if args.get(1).map(String::as_str) == Some("--snapshot") {
        let path = args.get(2).map(String::as_str).unwrap_or("hearth.png");
        let time = args
            .get(3)
            .and_then(|arg| arg.parse::<f32>().ok())
            .unwrap_or(1.5);
        return snapshot(&volume, path, time);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(volume);
    event_loop.run_app(&mut app)?;
    Ok(())
}

/// Render one CPU frame and write it as a PNG.
fn snapshot(volume: &NoiseVolume, path: &str, time: f32) -> Result<(), RunError> {
    let frame = Compositor::new(450, 600).render(volume, time);
    frame.save(path).map_err(SnapshotError::from)?;
    println!("wrote {} (t = {}s)", path, time);
    Ok(())
}
