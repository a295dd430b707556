mod document;

use document::GraphDocument;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use strata_layout::geom::{point3, size3};
use strata_layout::{
    DrawingPlane, EdgeLayoutKind, GraphRenderer, LayoutSettings, LoadedNodeLayout, RenderObject,
    RoutedEdge, Scene,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Graph(strata_graph::Error),
    Layout(strata_layout::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Graph(err) => write!(f, "{err}"),
            CliError::Layout(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<strata_graph::Error> for CliError {
    fn from(value: strata_graph::Error) -> Self {
        Self::Graph(value)
    }
}

impl From<strata_layout::Error> for CliError {
    fn from(value: strata_layout::Error) -> Self {
        Self::Layout(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Draw,
    Settings,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    graph: Option<String>,
    layout: Option<PathBuf>,
    settings: Option<PathBuf>,
    edge_layout: Option<EdgeLayoutKind>,
    pretty: bool,
    verbose: bool,
    out: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DrawOut<'a> {
    graph: &'a str,
    /// Root of the drawn node tree; the synthetic canvas when the graph had several roots.
    root: Option<&'a str>,
    plane: &'a DrawingPlane,
    edges: &'a [RoutedEdge],
    hierarchy_errors: Vec<String>,
    scene: &'a Scene,
}

fn usage() -> &'static str {
    "strata\n\
\n\
USAGE:\n\
  strata [draw] --layout <path> [--settings <path>] [--edge-layout straight|spline|bundled|none] [--pretty] [--verbose] [--out <path>] [<graph>|-]\n\
  strata settings [--pretty]\n\
\n\
NOTES:\n\
  - If <graph> is omitted or '-', the graph document is read from stdin.\n\
  - draw prints the laid-out scene as JSON to stdout by default; use --out to write a file.\n\
  - settings prints the default layout settings (JSON5 settings files may override any subset).\n\
  - Log verbosity follows the STRATA_LOG filter (default: warn); --verbose enables debug output.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "draw" => args.command = Command::Draw,
            "settings" => args.command = Command::Settings,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--layout" => args.layout = Some(PathBuf::from(next_value(&mut it)?)),
            "--settings" => args.settings = Some(PathBuf::from(next_value(&mut it)?)),
            "--out" => args.out = Some(PathBuf::from(next_value(&mut it)?)),
            "--edge-layout" => {
                let kind = next_value(&mut it)?;
                args.edge_layout = Some(
                    parse_edge_layout(kind).ok_or(CliError::Usage(usage()))?,
                );
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.graph.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.graph = Some(path.to_string());
            }
        }
    }

    if matches!(args.command, Command::Draw) && args.layout.is_none() {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn parse_edge_layout(kind: &str) -> Option<EdgeLayoutKind> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "straight" => Some(EdgeLayoutKind::Straight),
        "spline" => Some(EdgeLayoutKind::Spline),
        "bundled" => Some(EdgeLayoutKind::Bundled),
        "none" => Some(EdgeLayoutKind::None),
        _ => None,
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("STRATA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&Path>) -> Result<(), CliError> {
    match out {
        None => {
            let stdout = std::io::stdout().lock();
            if pretty {
                serde_json::to_writer_pretty(stdout, value)?;
            } else {
                serde_json::to_writer(stdout, value)?;
            }
        }
        Some(path) => {
            let text = if pretty {
                serde_json::to_string_pretty(value)?
            } else {
                serde_json::to_string(value)?
            };
            std::fs::write(path, text)?;
        }
    }
    Ok(())
}

fn load_settings(args: &Args) -> Result<LayoutSettings, CliError> {
    let mut settings = match &args.settings {
        Some(path) => LayoutSettings::load(path)?,
        None => LayoutSettings::default(),
    };
    if let Some(kind) = args.edge_layout {
        settings.edge_layout.kind = kind;
    }
    Ok(settings)
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Settings => write_json(&LayoutSettings::default(), args.pretty, None),
        Command::Draw => {
            let settings = load_settings(&args)?;
            let Some(layout_path) = args.layout.as_deref() else {
                return Err(CliError::Usage(usage()));
            };
            let layout = LoadedNodeLayout::load(layout_path)?;
            let text = read_input(args.graph.as_deref())?;
            let mut graph = GraphDocument::from_json_str(&text)?.into_graph()?;

            let footprint = settings.max_root_footprint;
            let mut scene = Scene::new();
            let world = scene.add(RenderObject::group(
                "world",
                point3(0.0, 0.0, 0.0),
                size3(footprint.width, settings.level_distance, footprint.depth),
            ));

            let renderer = GraphRenderer::new(settings);
            let drawn = renderer.draw(&mut graph, &mut scene, world, &layout)?;
            info!(
                graph = graph.name(),
                objects = scene.len(),
                edges = drawn.edges.len(),
                "drawn"
            );

            let root = drawn
                .nodes
                .keys()
                .copied()
                .find(|&n| graph.node(n).parent().is_none())
                .map(|n| graph.node(n).id());
            let out = DrawOut {
                graph: graph.name(),
                root,
                plane: &drawn.plane,
                edges: &drawn.edges,
                hierarchy_errors: drawn
                    .hierarchy
                    .errors
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                scene: &scene,
            };
            write_json(&out, args.pretty, args.out.as_deref())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
