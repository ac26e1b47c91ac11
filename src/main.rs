use autosweeper::solver::{by_name, Action, SolverBoard, Strategy};
use autosweeper::{Game, Outcome};
use std::process::ExitCode;
use std::time::Instant;

// Difficulties from Microsoft Minesweeper: (height, width, mines).
const EASY: (usize, usize, usize) = (9, 9, 10);
const INTERMEDIATE: (usize, usize, usize) = (16, 16, 40);
const EXPERT: (usize, usize, usize) = (16, 30, 99);

const DEFAULT_STRATEGY: &str = "csp+deduction+enumeration";
const DEFAULT_GAMES: usize = 100;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let strategy_name = args.next().unwrap_or_else(|| DEFAULT_STRATEGY.into());
    let num_games: usize = match args.next().map(|n| n.parse()).transpose() {
        Ok(n) => n.unwrap_or(DEFAULT_GAMES),
        Err(_) => return usage(),
    };
    let difficulty = match args.next().as_deref() {
        None | Some("easy") => EASY,
        Some("intermediate") => INTERMEDIATE,
        Some("expert") => EXPERT,
        Some(_) => return usage(),
    };
    if num_games == 0 || by_name(&strategy_name).is_none() {
        return usage();
    }

    let (height, width, mines) = difficulty;
    let mut times = Vec::with_capacity(num_games);
    let mut wins = 0usize;

    for _ in 0..num_games {
        let mut game = match Game::new(height, width, mines) {
            Ok(game) => game,
            Err(e) => {
                eprintln!("failed to set up game: {e}");
                return ExitCode::FAILURE;
            }
        };
        let mut strategy = by_name(&strategy_name).expect("strategy validated above");

        let start = Instant::now();
        while game.outcome() == Outcome::InProgress {
            match strategy.next_action(&SolverBoard::new(&game)) {
                Action::Click(cell) => game.click(cell),
                Action::Flag(cell) => game.flag(cell),
            }
        }
        times.push(start.elapsed());

        if game.outcome() == Outcome::Won {
            wins += 1;
        }
        if num_games == 1 {
            println!("{game}");
        }
    }

    let minimum = times.iter().min().expect("at least one game");
    let total: std::time::Duration = times.iter().sum();
    println!(
        "Minimum time {:?}, average time {:?} (over {num_games} games)",
        minimum,
        total / num_games as u32
    );
    println!(
        "Won {wins} of {num_games} games with {strategy_name}, success rate {:.2}",
        wins as f64 / num_games as f64
    );
    ExitCode::SUCCESS
}

fn usage() -> ExitCode {
    eprintln!("usage: autosweeper [strategy] [games] [easy|intermediate|expert]");
    eprintln!("strategies: deduction, csp, csp+deduction, csp+enumeration,");
    eprintln!("            csp+deduction+enumeration, random-clicker, random-flagger");
    ExitCode::FAILURE
}
