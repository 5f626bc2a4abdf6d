use std::path::PathBuf;

use clap::Parser;

use spinview::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// glTF or GLB file to display
    #[arg(short, long, conflicts_with = "cube")]
    model: Option<PathBuf>,
    /// show the procedural cube instead of a file (the default)
    #[arg(long)]
    cube: bool,
    #[arg(long, default_value = "assets/def_vs.wgsl")]
    vertex_shader: PathBuf,
    #[arg(long, default_value = "assets/def_fs.wgsl")]
    fragment_shader: PathBuf,
    /// use an orthographic camera over the window's pixel extent
    #[arg(long)]
    ortho: bool,
    /// vertical field of view in degrees, exclusive range (0, 180)
    #[arg(long, default_value_t = 45.0, value_parser = parse_fov)]
    fov: f32,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// rotation speed in radians per second
    #[arg(long, default_value_t = 1.0)]
    spin: f32,
    /// recenter the model and scale it to unit size
    #[arg(long)]
    fit: bool,
    /// recompute smooth normals instead of using the file's
    #[arg(long)]
    smooth_normals: bool,
    /// present without waiting for vertical sync
    #[arg(long)]
    no_vsync: bool,
    /// log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_fov(s: &str) -> Result<f32, String> {
    let fov: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if fov > 0.0 && fov < 180.0 {
        Ok(fov)
    } else {
        Err(format!("{fov} is not between 0 and 180 degrees"))
    }
}

impl Args {
    fn config(&self) -> AppConfig {
        let config = AppConfig::new()
            .size(self.width, self.height)
            .shaders(&self.vertex_shader, &self.fragment_shader)
            .orthographic(self.ortho)
            .fov(self.fov)
            .spin_speed(self.spin)
            .vsync(!self.no_vsync)
            .load_options(LoadOptions {
                recenter: self.fit,
                normalize: self.fit,
                smooth_normals: self.smooth_normals,
            });

        match &self.model {
            Some(path) => config.model(path),
            None => config.cube(),
        }
    }
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    if let Err(err) = spinview::run(args.config()) {
        log::error!("{err}");
        std::process::exit(err.status().exit_code());
    }
}
