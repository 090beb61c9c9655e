use std::str::FromStr;

use anyhow::{Context, bail};
use mine3d_core::{Action, Coord, Coord3, Difficulty};

pub const HELP: &str = "\
commands:
  r X Y Z         reveal a cell
  f X Y Z         toggle a flag
  n [difficulty]  new game (easy, normal, hard, expert)
  s               show the board and status
  h               this help
  q               quit

cells: blank = not visible yet, # = hidden, F = flag, . = no adjacent mines,
       1-9 then a-q = adjacent mine count (10-26), * = mine";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    /// Without a difficulty the current board setup is reused
    New(Option<Difficulty>),
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Command::Act(Action::Reveal {
                coords: parse_coords(&mut words)?,
            }),
            "f" | "flag" => Command::Act(Action::ToggleFlag {
                coords: parse_coords(&mut words)?,
            }),
            "n" | "new" => Command::New(
                words
                    .next()
                    .map(str::parse::<Difficulty>)
                    .transpose()?,
            ),
            "s" | "status" => Command::Status,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => bail!("unknown command `{other}`, try `h`"),
        };

        if let Some(extra) = words.next() {
            bail!("unexpected `{extra}` after `{verb}`");
        }
        Ok(command)
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<Coord3> {
    let mut axis = |name: &str| -> anyhow::Result<Coord> {
        let word = words
            .next()
            .with_context(|| format!("missing {name} coordinate"))?;
        word.parse()
            .with_context(|| format!("invalid {name} coordinate `{word}`"))
    };
    Ok((axis("x")?, axis("y")?, axis("z")?))
}
