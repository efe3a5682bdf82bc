use std::{fmt::Write, sync::LazyLock};

use log::{debug, trace, warn};
use regex::Regex;

use crate::{
    board::{BOARD_SIZE, Square},
    combat::CaptureOutcome,
    events::{GameEventSink, LoggingEventSink},
    game::{ClickOutcome, Game, HighlightKind},
    piece::{Color, HealthBand},
};

static COMMAND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?P<cmd>[a-z]+)(?:\s+(?P<args>.*?))?\s*$").unwrap());
static CELL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<alg>\b[a-h][1-8]\b)|(?P<row>-?\d+)\s+(?P<col>-?\d+)").unwrap());

const HELP: &str = "commands:
  click <cell>         click a cell; <cell> is e.g. e2 or '<row> <col>'
  move <cell> <cell>   click twice
  moves <cell>         list legal destinations of the piece on <cell>
  board                print the board with health
  status               whose turn it is, the selection and the winner
  new                  start over
  version
  quit";

/// A cell as typed by the user. Raw coordinates are passed through unchecked so the engine can ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRef {
    Square(Square),
    Raw(i32, i32),
}

impl CellRef {
    fn square(self) -> Option<Square> {
        match self {
            CellRef::Square(square) => Some(square),
            CellRef::Raw(row, col) => Square::new(row, col).ok(),
        }
    }
}

pub fn parse_cells(args: &str) -> Result<Vec<CellRef>, String> {
    let mut cells = Vec::new();
    let mut consumed = String::new();

    for captures in CELL_PATTERN.captures_iter(args) {
        if let Some(alg) = captures.name("alg") {
            let square = Square::from_algebraic(alg.as_str()).map_err(|e| e.to_string())?;
            cells.push(CellRef::Square(square));
        } else if let (Some(row), Some(col)) = (captures.name("row"), captures.name("col")) {
            let row = row.as_str().parse::<i32>().map_err(|e| format!("bad row '{}': {e}", row.as_str()))?;
            let col = col.as_str().parse::<i32>().map_err(|e| format!("bad column '{}': {e}", col.as_str()))?;
            cells.push(CellRef::Raw(row, col));
        }

        if let Some(m) = captures.get(0) {
            consumed.push_str(m.as_str());
        }
    }

    let leftover: String = args.chars().filter(|c| !c.is_whitespace()).collect();
    let matched: String = consumed.chars().filter(|c| !c.is_whitespace()).collect();
    if leftover != matched {
        return Err(format!("could not read cells from '{args}'"));
    }

    Ok(cells)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Response {
    fn line(line: impl Into<String>) -> Response {
        Response {
            lines: vec![line.into()],
            quit: false,
        }
    }
}

/// Text front end standing in for the touch and rendering layers.
pub struct ConsoleInterface<S: GameEventSink = LoggingEventSink> {
    game: Game<S>,
    version: String,
}

impl<S: GameEventSink> ConsoleInterface<S> {
    pub fn new(sink: S, version: String) -> ConsoleInterface<S> {
        ConsoleInterface {
            game: Game::new(sink),
            version,
        }
    }

    pub fn game(&self) -> &Game<S> {
        &self.game
    }

    pub fn process_command(&mut self, cmd: &str) -> Response {
        debug!("Received console cmd string '{cmd}'");

        let Some(captures) = COMMAND_PATTERN.captures(cmd) else {
            if cmd.trim().is_empty() {
                return Response::default();
            }
            warn!("Could not parse console cmd '{cmd}'");
            return Response::line(format!("unknown command '{}'", cmd.trim()));
        };

        let name = captures.name("cmd").map_or("", |m| m.as_str());
        let args = captures.name("args").map_or("", |m| m.as_str());
        let cells = match parse_cells(args) {
            Ok(cells) => cells,
            Err(message) => {
                warn!("{message}");
                return Response::line(message);
            }
        };

        let response = match (name, cells.as_slice()) {
            ("click", [cell]) => Response::line(self.click(*cell)),
            ("move", [from, to]) => Response {
                lines: vec![self.click(*from), self.click(*to)],
                quit: false,
            },
            ("moves", [cell]) => Response::line(self.list_moves(*cell)),
            ("board", []) => Response {
                lines: self.render_board(),
                quit: false,
            },
            ("status", []) => Response::line(self.status()),
            ("new", []) => {
                self.game.reset();
                Response::line("ok")
            }
            ("version", []) => Response::line(self.version.clone()),
            ("help", []) => Response {
                lines: HELP.lines().map(String::from).collect(),
                quit: false,
            },
            ("quit", []) => Response {
                lines: Vec::new(),
                quit: true,
            },
            ("click" | "move" | "moves" | "board" | "status" | "new" | "version" | "help" | "quit", _) => {
                warn!("Wrong number of cells for '{name}': {:?}", cells);
                Response::line(format!("wrong arguments for '{name}', try 'help'"))
            }
            _ => {
                warn!("Unknown console cmd in '{cmd}'");
                Response::line(format!("unknown command '{name}'"))
            }
        };

        trace!("At end of command. {:#?}", self.game.board());
        response
    }

    fn click(&mut self, cell: CellRef) -> String {
        let outcome = match cell {
            CellRef::Square(square) => self.game.click(square),
            CellRef::Raw(row, col) => self.game.handle_cell_click(row, col),
        };

        match outcome {
            ClickOutcome::Ignored => String::from("ignored"),
            ClickOutcome::Selected(square) => format!("selected {square}"),
            ClickOutcome::Deselected(square) => format!("deselected {square}"),
            ClickOutcome::Committed(report) => {
                let mut line = match report.capture {
                    None => format!("moved {} {}", report.from, report.to),
                    Some(CaptureOutcome::Wounded { remaining_health }) => {
                        format!("hit {} {} health {remaining_health}", report.from, report.to)
                    }
                    Some(CaptureOutcome::Defeated { defender }) => {
                        format!("defeated {} {} {}", report.from, report.to, defender.kind)
                    }
                };
                if let Some(winner) = report.winner {
                    let _ = write!(line, " winner {winner}");
                }
                line
            }
        }
    }

    fn list_moves(&self, cell: CellRef) -> String {
        let Some(from) = cell.square() else {
            return String::from("moves: off the board");
        };

        let mut line = format!("moves {from}:");
        for to in self.game.legal_destinations(from) {
            let marker = if self.game.board().is_empty(to) { "" } else { "x" };
            let _ = write!(line, " {marker}{to}");
        }
        line
    }

    fn status(&self) -> String {
        if let Some(winner) = self.game.winner() {
            return format!("winner {winner}");
        }

        match self.game.selected_cell() {
            Some(square) => format!("turn {} selected {square}", self.game.active_color()),
            None => format!("turn {}", self.game.active_color()),
        }
    }

    /// One line per row. Pieces show letter and health, with a band marker: ' ' healthy, '~' wounded, '!' critical.
    /// Empty cells show '+' for a move target and '.' otherwise; an attackable piece is wrapped in brackets.
    fn render_board(&self) -> Vec<String> {
        let view = self.game.current_board_view();
        let highlights = self.game.highlights();
        let selected = self.game.selected_cell();
        let mut lines = Vec::with_capacity(BOARD_SIZE + 1);

        for (row, cells) in view.cells.iter().enumerate() {
            let mut line = format!("{} ", BOARD_SIZE - row);
            for (col, cell) in cells.iter().enumerate() {
                let square = Square::new(row as i32, col as i32).ok();
                let highlight = highlights.iter().find(|h| Some(h.square) == square).map(|h| h.kind);
                let text = match cell {
                    Some(piece) => {
                        let letter = match piece.color {
                            Color::White => piece.kind.letter(),
                            Color::Black => piece.kind.letter().to_ascii_lowercase(),
                        };
                        let band = match piece.health_band {
                            HealthBand::Healthy => ' ',
                            HealthBand::Wounded => '~',
                            HealthBand::Critical => '!',
                        };
                        format!("{letter}{:<2}{band}", piece.current_health)
                    }
                    None if highlight == Some(HighlightKind::Move) => String::from(" +  "),
                    None => String::from(" .  "),
                };

                if highlight == Some(HighlightKind::Capture) {
                    let _ = write!(line, "[{}]", text.trim_end());
                } else if selected.is_some() && selected == square {
                    let _ = write!(line, "*{}", text.trim_end());
                } else {
                    let _ = write!(line, " {text}");
                }
            }
            lines.push(line.trim_end().to_string());
        }

        lines.push(String::from("   a    b    c    d    e    f    g    h"));
        lines
    }
}

#[cfg(test)]
mod console_tests {
    use crate::events::RecordingEventSink;

    use super::*;

    fn console() -> ConsoleInterface<RecordingEventSink> {
        ConsoleInterface::new(RecordingEventSink::default(), String::from("health-chess test"))
    }

    fn run(console: &mut ConsoleInterface<RecordingEventSink>, cmd: &str) -> Vec<String> {
        console.process_command(cmd).lines
    }

    #[test]
    pub fn parse_algebraic_and_raw_cells() {
        assert_eq!(
            vec![
                CellRef::Square(Square::from_algebraic("e2").unwrap()),
                CellRef::Raw(4, 4)
            ],
            parse_cells("e2 4 4").unwrap()
        );
        assert_eq!(vec![CellRef::Raw(-1, 9)], parse_cells("-1 9").unwrap());
        assert!(parse_cells("e9").is_err());
        assert!(parse_cells("e2 banana").is_err());
        assert!(parse_cells("").unwrap().is_empty());
    }

    #[test]
    pub fn move_command_plays_both_clicks() {
        let mut console = console();

        assert_eq!(vec!["selected e2", "moved e2 e4"], run(&mut console, "move e2 e4"));
        assert_eq!(vec!["turn Black"], run(&mut console, "status"));
    }

    #[test]
    pub fn raw_coordinates_drive_the_engine() {
        let mut console = console();

        assert_eq!(vec!["selected g1"], run(&mut console, "click 7 6"));
        assert_eq!(vec!["turn White selected g1"], run(&mut console, "status"));
        assert_eq!(vec!["moved g1 f3"], run(&mut console, "click 5 5"));
        assert_eq!(vec!["ignored"], run(&mut console, "click 9 9"));
    }

    #[test]
    pub fn moves_lists_destinations() {
        let mut console = console();

        assert_eq!(vec!["moves b1: a3 c3"], run(&mut console, "moves b1"));
        assert_eq!(vec!["moves a1:"], run(&mut console, "moves a1"));
        assert_eq!(vec!["moves: off the board"], run(&mut console, "moves 8 0"));
    }

    #[test]
    pub fn board_marks_selection_and_targets() {
        let mut console = console();
        run(&mut console, "click e2");

        let lines = run(&mut console, "board");

        assert_eq!(9, lines.len());
        assert!(lines[0].starts_with("8  r5"));
        assert!(lines[4].contains('+'));
        assert!(lines[6].contains("*P3"));
    }

    #[test]
    pub fn unknown_and_malformed_commands_do_not_quit() {
        let mut console = console();

        let response = console.process_command("dance");
        assert_eq!(vec!["unknown command 'dance'"], response.lines);
        assert!(!response.quit);

        assert_eq!(vec!["wrong arguments for 'click', try 'help'"], run(&mut console, "click"));
        assert!(console.process_command("").lines.is_empty());
        assert!(console.process_command("quit").quit);
    }

    #[test]
    pub fn new_resets_the_game() {
        let mut console = console();
        run(&mut console, "move e2 e4");

        assert_eq!(vec!["ok"], run(&mut console, "new"));
        assert_eq!(vec!["turn White"], run(&mut console, "status"));
        assert_eq!(vec!["health-chess test"], run(&mut console, "version"));
    }
}
