use std::io::{BufRead, Write};

use chess_session::{
    coords::cell_to_square, Cell, Click, RulesEngine, Side, Square, TurnController, TurnState,
};
use itertools::Itertools;
use tracing::info;

use crate::config::Opts;

macro_rules! retry {
    ($e:expr) => {{
        match $e {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        }
    }};
}

fn prompt(text: impl std::fmt::Display) -> std::io::Result<()> {
    print!("{text}");
    std::io::stdout().flush()
}

pub fn main(opts: &Opts) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    let side = match opts.side {
        Some(side) => side,
        None => loop {
            prompt("play as white or black? ")?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            break retry!(line?.parse::<Side>());
        },
    };

    let mut controller = TurnController::new(opts.rules()?, opts.session(side)?);
    let mut engine = opts.engine()?;
    println!("{}", board(&controller));

    loop {
        match controller.state() {
            TurnState::GameOver => {
                let status = controller.status();
                info!(result = status.result(), "{status}");
                println!("{status} {}", status.result());
                break;
            }
            TurnState::AwaitingAutomatedReply => {
                println!("{} is thinking...", side.other());
                let mv = controller.play_automated_reply(&mut engine)?;
                println!("{} played {mv}", side.other());
                println!("{}", board(&controller));
                continue;
            }
            TurnState::WaitingForSelection => prompt(format!("{side}, pick a piece: "))?,
            TurnState::WaitingForDestination => prompt(format!("{side}, pick a square: "))?,
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line == "quit" {
            break;
        }
        let square: Square = retry!(line.parse());

        match controller.click(square) {
            Click::Ignored => eprintln!("nothing to do on {square}"),
            Click::Moved(mv) => println!("you played {mv}"),
            Click::Selected(_) | Click::Deselected => {}
        }
        println!("{}", board(&controller));
    }

    Ok(())
}

/// The board as the human sees it: their own pieces at the bottom.
///
/// `[P]` is the selected piece, `*` an empty square it can move to, `(p)` a piece it can
/// capture.
pub fn board<R: RulesEngine>(controller: &TurnController<R>) -> String {
    let orientation = controller.orientation();
    let selection = controller.selection();

    let cell = |square: Square| {
        let piece = controller.rules().piece_at(square);
        let highlighted = selection.is_highlighted(square);
        match piece {
            Some(piece) if selection.selected() == Some(square) => format!("[{piece}]"),
            Some(piece) if highlighted => format!("({piece})"),
            Some(piece) => format!(" {piece} "),
            None if highlighted => " * ".to_owned(),
            None => " . ".to_owned(),
        }
    };

    let ranks = (0..8).map(|row| {
        let label = cell_to_square(Cell::new(0, row), orientation).rank() + 1;
        let squares = (0..8)
            .map(|col| cell(cell_to_square(Cell::new(col, row), orientation)))
            .join("");
        format!("{label} {squares}").trim_end().to_owned()
    });

    let files = (0..8)
        .map(|col| {
            let file = cell_to_square(Cell::new(col, 7), orientation).file();
            format!(" {} ", (b'a' + file) as char)
        })
        .join("");

    ranks
        .chain(std::iter::once(format!("  {files}").trim_end().to_owned()))
        .join("\n")
}
