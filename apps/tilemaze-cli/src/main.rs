use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tilemaze_common::{AppConfig, Direction, TextureSlot, TileCoord};
use tilemaze_kernel::{Maze, NavigationState};
use tilemaze_render::{
    Banner, BannerTable, BatchRenderer, Camera2D, DrawCommand, FrameStats, RecordingBackend,
    SceneComposer,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilemaze-cli", about = "Headless tool for inspecting the maze")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print window config, the maze and its passability table
    Info,
    /// Replay a move string and dump the resulting frame
    Walk {
        /// Moves as U/L/D/R codes, e.g. "UURDRUU"
        #[arg(short, long, default_value = "")]
        moves: String,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct DrawSummary {
    slot: TextureSlot,
    vertex_count: u32,
}

#[derive(Debug, Serialize)]
struct WalkReport {
    moves: String,
    accepted: usize,
    rejected: usize,
    position: TileCoord,
    banner: Banner,
    visited: Vec<TileCoord>,
    stats: FrameStats,
    draws: Vec<DrawSummary>,
    #[serde(skip)]
    frame: String,
}

fn walk(moves: &str, config: &AppConfig) -> anyhow::Result<WalkReport> {
    let dirs = Direction::parse_sequence(moves).context("invalid move string")?;

    let mut nav = NavigationState::default();
    let accepted = nav.apply_moves(dirs.iter().copied());

    let camera = Camera2D::default().with_aspect(config.width, config.height);
    let composer = SceneComposer::reference(&camera);
    let groups = composer.compose(&nav);

    let mut backend = RecordingBackend::new();
    let stats = BatchRenderer::new().render(&mut backend, &groups, &camera);

    let draws = backend
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Draw { slot, vertex_count } => Some(DrawSummary {
                slot: *slot,
                vertex_count: *vertex_count,
            }),
            _ => None,
        })
        .collect();

    let position = nav.current_position();
    Ok(WalkReport {
        moves: dirs.iter().map(|d| d.code()).collect(),
        accepted,
        rejected: dirs.len() - accepted,
        position,
        banner: composer.banner_for(position),
        visited: nav.visited().iter().copied().collect(),
        stats,
        draws,
        frame: backend.describe(),
    })
}

/// Box drawing of the maze. Each tile's own edges decide its top and left
/// walls, so one-way edges show as gaps from the side that allows them.
fn render_maze(maze: &Maze, banners: &BannerTable) -> String {
    let mut out = String::new();
    for row in 0..maze.rows() {
        for col in 0..maze.cols() {
            let open = maze.is_passable(TileCoord::new(row, col), Direction::Up);
            out.push_str(if open { "+   " } else { "+---" });
        }
        out.push_str("+\n");

        for col in 0..maze.cols() {
            let tile = TileCoord::new(row, col);
            let wall = if maze.is_passable(tile, Direction::Left) {
                ' '
            } else {
                '|'
            };
            let mark = if tile == maze.start() {
                'S'
            } else {
                match banners.classify(tile) {
                    Banner::Found => 'F',
                    Banner::Mine => 'M',
                    Banner::Find => ' ',
                }
            };
            out.push(wall);
            out.push(' ');
            out.push(mark);
            out.push(' ');
        }
        let last = TileCoord::new(row, maze.cols() - 1);
        out.push(if maze.is_passable(last, Direction::Right) {
            ' '
        } else {
            '|'
        });
        out.push('\n');
    }
    for col in 0..maze.cols() {
        let open = maze.is_passable(TileCoord::new(maze.rows() - 1, col), Direction::Down);
        out.push_str(if open { "+   " } else { "+---" });
    }
    out.push_str("+\n");
    out
}

fn passability_table(maze: &Maze) -> String {
    let mut out = String::from("tile     U L D R\n");
    for tile in maze.tiles() {
        let flags: Vec<String> = Direction::ALL
            .iter()
            .map(|d| {
                if maze.is_passable(tile, *d) {
                    d.code().to_string()
                } else {
                    ".".to_string()
                }
            })
            .collect();
        out.push_str(&format!("{:<8} {}\n", tile.to_string(), flags.join(" ")));
    }
    out
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = AppConfig::default();

    match cli.command {
        Commands::Info => {
            let maze = Maze::reference();
            println!("tilemaze-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "window: {:?} {}x{}",
                config.title, config.width, config.height
            );
            println!(
                "maze: {}x{}, start={}, one-way edges={}",
                maze.rows(),
                maze.cols(),
                maze.start(),
                maze.one_way_edges().len()
            );
            println!();
            print!("{}", render_maze(&maze, &BannerTable::reference()));
            println!();
            print!("{}", passability_table(&maze));
        }
        Commands::Walk { moves, json } => {
            let report = walk(&moves, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Moves: {:?} ({} accepted, {} blocked)",
                    report.moves, report.accepted, report.rejected
                );
                println!("Position: {}", report.position);
                println!("Banner: {:?}", report.banner);
                let visited: Vec<String> = report.visited.iter().map(|t| t.to_string()).collect();
                println!("Visited ({}): {}", visited.len(), visited.join(" "));
                println!(
                    "Frame: draw_calls={}, quads={}, vertices={}",
                    report.stats.draw_calls, report.stats.quads, report.stats.vertices
                );
                print!("{}", report.frame);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_to_found_tile() {
        let report = walk("UURDRUU", &AppConfig::default()).unwrap();
        assert_eq!(report.accepted, 7);
        assert_eq!(report.rejected, 0);
        assert_eq!(report.position, TileCoord::new(0, 4));
        assert_eq!(report.banner, Banner::Found);
        assert_eq!(report.visited.len(), 8);
        assert_eq!(report.draws[2].slot, TextureSlot::FoundBanner);
        assert_eq!(report.stats.draw_calls, report.draws.len() as u32);
    }

    #[test]
    fn walk_counts_blocked_moves() {
        let report = walk("D", &AppConfig::default()).unwrap();
        assert_eq!(report.accepted, 0);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.position, TileCoord::new(3, 2));
        assert_eq!(report.banner, Banner::Find);
    }

    #[test]
    fn walk_rejects_bad_codes() {
        assert!(walk("UX", &AppConfig::default()).is_err());
    }

    #[test]
    fn report_serializes_without_frame_dump() {
        let report = walk("", &AppConfig::default()).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["position"]["row"], 3);
        assert_eq!(value["stats"]["draw_calls"], 4);
        assert!(value.get("frame").is_none());
    }

    #[test]
    fn maze_drawing_has_grid_shape() {
        let maze = Maze::reference();
        let text = render_maze(&maze, &BannerTable::reference());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), maze.rows() * 2 + 1);
        assert!(lines.iter().all(|l| l.len() == maze.cols() * 4 + 1));
        // Outer boundary is closed.
        assert_eq!(lines[0], "+---+---+---+---+---+");
        assert_eq!(lines[lines.len() - 1], "+---+---+---+---+---+");
        assert_eq!(text.matches('S').count(), 1);
        assert_eq!(text.matches('F').count(), 1);
        assert_eq!(text.matches('M').count(), 4);
    }

    #[test]
    fn table_lists_every_tile() {
        let maze = Maze::reference();
        let table = passability_table(&maze);
        assert_eq!(table.lines().count(), maze.tile_count() + 1);
        assert!(table.contains("(0, 0)   . . . R"));
    }
}
