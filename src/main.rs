use clap::{Parser, Subcommand};
use crossterm::event::{Event, KeyEventKind};
use flowgraph::config::ControllerConfig;
use flowgraph::controller::controller::FlowController;
use flowgraph::controller::info::BestPathCriterion;
use flowgraph::error::FlowError;
use flowgraph::ops::Operation;
use flowgraph::scenario::scenario::ScenarioKind;
use flowgraph::tui::app::App;
use flowgraph::tui::draw::draw_app;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flowgraph", version, about = "Path-based flow control over a capacitated network")]
struct Cli {
    /// Controller config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = ScenarioKind::Diamond)]
    scenario: ScenarioKind,

    /// Operation applied before the command runs, e.g. "set P1 3". Repeatable.
    #[arg(long = "op", value_name = "OP")]
    ops: Vec<Operation>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Complete network state with aggregate metrics
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Status of every edge
    Edges,
    /// Annotated view of one path
    Path { id: String },
    /// Annotated view of one edge
    Edge { id: String },
    /// Best path under a criterion
    Best {
        #[arg(value_enum, default_value_t = BestPathCriterion::Capacity)]
        criterion: BestPathCriterion,
    },
    /// Conservation and capacity check
    Validate,
    /// Read-only terminal monitor
    Monitor,
}

fn main() -> Result<(), FlowError> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ControllerConfig::load(path)?,
        None => ControllerConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.log.filter.as_deref().unwrap_or("flowgraph=info,warn"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let scenario = cli.scenario.scenario();
    let mut network = scenario.build()?;
    info!(scenario = scenario.name(), description = scenario.description(), "network loaded");
    let mut controller = FlowController::with_config(&mut network, &config);

    for op in &cli.ops {
        let response = op.apply(&mut controller);
        debug!(%op, success = response.success, "operation applied");
        if response.success {
            println!("ok    {op}: {}", response.message);
        } else {
            let hint = response
                .alternatives
                .map(|a| format!(" (suggested {:.2})", a.suggested_flow))
                .unwrap_or_default();
            println!("error {op}: {}{hint}", response.message);
        }
    }

    match cli.command {
        Commands::Status { json: true } => print_json(&controller.get_complete_network_state())?,
        Commands::Status { json: false } => {
            let snapshot = controller.get_complete_network_state();
            let m = &snapshot.metrics;
            println!(
                "throughput {:.2} / max flow {:.2} ({:.0}% efficient), min cut {}",
                m.total_throughput,
                m.theoretical_max_flow,
                m.network_efficiency * 100.0,
                m.min_cut.join(", ")
            );
            for path in &snapshot.paths {
                println!(
                    "{:<6} {:<24} {:>7.2} / {:<7.2} {:<10} limit {}",
                    path.path_id,
                    path.route,
                    path.current_flow,
                    path.max_safe_flow,
                    path.status,
                    path.bottleneck_edge
                );
            }
            for alert in &snapshot.alerts {
                println!("alert  {}", alert.description);
            }
        }
        Commands::Edges => {
            for edge in controller.list_edge_status() {
                println!(
                    "{:<8} {:>3} → {:<3} {:>7.2} / {:<7.2} {}",
                    edge.edge_id, edge.from, edge.to, edge.flow, edge.capacity, edge.status
                );
            }
        }
        Commands::Path { id } => print_json(&controller.get_path_info(&id)?)?,
        Commands::Edge { id } => print_json(&controller.get_edge_info(&id)?)?,
        Commands::Best { criterion } => match controller.find_best_path(criterion) {
            Some(path) => println!("{path}"),
            None => println!("no usable path"),
        },
        Commands::Validate => print_json(&controller.validate_and_report())?,
        Commands::Monitor => monitor(App::new(controller.get_complete_network_state()))?,
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), FlowError> {
    let out = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    println!("{out}");
    Ok(())
}

fn monitor(mut app: App) -> io::Result<()> {
    let mut terminal = ratatui::init();

    while app.running {
        terminal.draw(|frame| draw_app(frame, &app))?;

        if crossterm::event::poll(Duration::from_millis(16))? {
            match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key.code),
                _ => continue,
            }
        }
    }
    Ok(())
}
