use clap::Parser;
use flow_solver::heuristics::{check_deadends, order_colors};
use flow_solver::options::SearchOptions;
use flow_solver::utils::puzzle_from_file;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Shuffle the colors instead of ranking them
    #[clap(short, long)]
    random: bool,

    /// Report that the search picks the most constrained color at each step
    #[clap(short = 'c', long)]
    most_constrained: bool,

    /// Do not log the branch-order summary
    #[clap(short, long)]
    quiet: bool,

    /// Force a color order, e.g. "RGB"; unlisted colors follow
    #[clap(short, long)]
    order: Option<String>,

    /// Path to the puzzle file
    puzzle_file: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let options = SearchOptions {
        order_random: args.random,
        order_most_constrained: args.most_constrained,
        display_quiet: args.quiet,
        user_order: args.order,
    };

    let (mut info, state) = match puzzle_from_file(&args.puzzle_file) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("Failed to load {}: {}", args.puzzle_file.display(), e);
            process::exit(1);
        }
    };

    println!("Loaded puzzle from {}\n", args.puzzle_file.display());
    println!(
        "{}x{} grid, {} colors:\n{}",
        info.width(),
        info.height(),
        info.num_colors(),
        state.render(&info)
    );

    order_colors(&mut info, &state, &options);

    let names: String = info
        .color_order()
        .iter()
        .map(|&c| info.color_name(c))
        .collect();
    println!("Branch order: {}", names);

    if check_deadends(&info, &state) {
        println!("Dead end detected in the starting position.");
    } else {
        println!("No dead end detected in the starting position.");
    }
}
