//! Shape Constraints CLI
//!
//! Usage:
//!   shape-constraints [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Solver tuning file (TOML format)
//!   -f, --fixed <SHAPE>  Shape to hold fixed while solving
//!   -s, --summary        Print constraint labels and satisfaction to stderr
//!   -t, --trace          Print solver diagnostics to stderr
//!   -h, --help           Print help
//!
//! Reads a TOML scene (shapes plus constraints), solves every constraint
//! in declaration order, and prints the scene with solved transforms.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use shape_constraints::{ConstraintEngine, Scene, SolverConfig};

#[derive(Parser)]
#[command(name = "shape-constraints")]
#[command(about = "Geometric constraint solver for 2D shape scenes")]
struct Cli {
    /// Input scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Solver tuning file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shape to hold fixed while solving
    #[arg(short, long)]
    fixed: Option<String>,

    /// Print constraint labels and satisfaction to stderr
    #[arg(short, long)]
    summary: bool,

    /// Print solver diagnostics to stderr
    #[arg(short, long)]
    trace: bool,
}

fn main() {
    let cli = Cli::parse();

    // If no input file and stdin is a terminal (interactive), show help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Load solver configuration
    let config = match &cli.config {
        Some(path) => match SolverConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => SolverConfig::default(),
    };
    let trace = cli.trace || config.trace;
    let config = config.with_trace(trace);

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut scene = match Scene::from_toml(&source) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut shapes = scene.shape_set();
    let mut engine = ConstraintEngine::with_config(config);

    // Register every constraint; each one solves as it is added.
    for entry in &scene.constraints {
        let (a, b) = match entry.anchor_refs() {
            Ok(refs) => refs,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        let kind = match entry.constraint_kind() {
            Ok(kind) => kind,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        let result = match kind {
            shape_constraints::ConstraintKind::Coincident => {
                engine.add_coincident(&mut shapes, a, b)
            }
            shape_constraints::ConstraintKind::Distance(d) => {
                engine.add_distance(&mut shapes, a, b, d)
            }
            shape_constraints::ConstraintKind::Horizontal => {
                engine.add_horizontal(&mut shapes, a, b)
            }
            shape_constraints::ConstraintKind::Vertical => engine.add_vertical(&mut shapes, a, b),
        };
        if let Err(e) = result {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    // Registration solves each constraint as it lands, which already
    // moves shapes around. Re-seed from the authored transforms so the
    // final enforcement pass starts from the scene as written, with the
    // requested shape held fixed there.
    let mut shapes = scene.shape_set();
    engine.apply_all(&mut shapes, cli.fixed.as_deref());

    if cli.summary {
        for label in engine.constraint_list() {
            eprintln!("{}", label);
        }
    }

    scene.update_from(&shapes);
    match scene.to_toml() {
        Ok(toml) => print!("{}", toml),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        r#"Shape Constraints - geometric constraint solver for 2D shape scenes

USAGE:
    shape-constraints [OPTIONS] [FILE]
    cat scene.toml | shape-constraints

OPTIONS:
    -c, --config <FILE>  Solver tuning file (TOML)
    -f, --fixed <SHAPE>  Shape to hold fixed while solving
    -s, --summary        Print constraint labels to stderr
    -t, --trace          Print solver diagnostics to stderr
    -h, --help           Print help

SCENE FORMAT:
    [[shapes]]
    name = "panel"
    type = "rect"             # rect, circle, ring, ellipse, polygon,
    position = [0.0, 0.0]     # triangle, arc, arrow
    rotation = 0.0
    [shapes.params]
    width = 80.0
    height = 40.0

    [[constraints]]
    type = "coincident"       # coincident, distance, horizontal, vertical
    a = "knob.center"
    b = "panel.right"

The solved scene is printed to stdout as TOML."#
    );
}
