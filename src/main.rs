use clap::Parser;
use cut_planner::api::PlanResponse;
use cut_planner::plan::{DEFAULT_MAX_INSTANCES, Planner};
use cut_planner::render;
use cut_planner::types::{PieceSpec, Rect};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "cut_planner",
    about = "Plan rectangular pieces onto fixed-size sheets"
)]
struct Cli {
    /// Sheet dimensions (WxH, e.g. 2440x1220)
    #[arg(long, value_parser = parse_dimensions)]
    sheet: Rect,

    /// Pieces as WxH:qty (e.g. 800x600:3 400x300:5)
    #[arg(long = "pieces", num_args = 0.., value_parser = parse_piece)]
    pieces: Vec<PieceSpec>,

    /// Refuse plans with more than this many pieces in total
    #[arg(long, default_value_t = DEFAULT_MAX_INSTANCES)]
    max_instances: usize,

    /// Show ASCII layout of each distinct plan
    #[arg(long)]
    layout: bool,

    /// Print the plan as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log engine decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_number(s: &str, what: &str, input: &str) -> Result<u32, String> {
    s.trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid {what} in '{input}'"))
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("invalid dimensions '{s}', expected WxH"))?;
    Ok(Rect::new(
        parse_number(w, "width", s)?,
        parse_number(h, "height", s)?,
    ))
}

fn parse_piece(s: &str) -> Result<PieceSpec, String> {
    let (dims, qty) = s
        .split_once(':')
        .ok_or_else(|| format!("invalid piece '{s}', expected WxH:qty"))?;
    let rect = parse_dimensions(dims)?;
    let quantity = parse_number(qty, "quantity", s)?;
    Ok(PieceSpec::new(rect.width, rect.height, quantity))
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let planner = Planner::new(cli.sheet).with_max_instances(cli.max_instances);
    let result = planner.plan(&cli.pieces).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.json {
        let response = PlanResponse::new(cli.sheet, cli.pieces, result);
        match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for (i, group) in result.plan_groups.iter().enumerate() {
        println!(
            "Plan {} (x{}), leftover area {}:",
            i + 1,
            group.repetitions,
            group.leftover_area
        );
        for p in &group.placements {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!(
                "  #{} {} @ ({}, {}){}",
                p.instance_id,
                p.footprint(),
                p.x,
                p.y,
                rot
            );
        }
        let counts: Vec<String> = group
            .piece_counts
            .iter()
            .map(|c| format!("{} x {}", c.count, c.piece))
            .collect();
        println!("  pieces: {}", counts.join(", "));
        if cli.layout {
            print!("{}", render::render_sheet(cli.sheet, &group.placements));
        }
        println!();
    }

    println!(
        "Summary: {} sheet{} used, {} utilization",
        result.total_sheets,
        if result.total_sheets == 1 { "" } else { "s" },
        result.overall_utilization,
    );
}
