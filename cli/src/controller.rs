use std::io::Write;

use chrono::{DateTime, Utc};
use mine3d_core::{
    Action, Board, BoardView, Difficulty, FlagOutcome, GameConfig, GameSession, GameStatus,
    MinefieldGenerator, RandomMinefieldGenerator, RevealOutcome,
};

use crate::command::{Command, HELP};
use crate::records::RecordStore;
use crate::render::render;

/// How new boards are made.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Setup {
    Preset(Difficulty),
    Custom(GameConfig),
}

impl Setup {
    pub fn new_session(self, seed: u64) -> mine3d_core::Result<GameSession> {
        let mut session = match self {
            Self::Preset(difficulty) => GameSession::with_difficulty(difficulty, seed)?,
            Self::Custom(config) => GameSession::new(Board::new(
                RandomMinefieldGenerator::new(seed).generate(config)?,
            )),
        };
        session.start()?;
        Ok(session)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Feeds parsed commands into the current session and prints the resulting board.
pub struct Controller {
    session: GameSession,
    setup: Setup,
    seed: u64,
    player: String,
    records: RecordStore,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Controller {
    pub fn new(
        setup: Setup,
        seed: u64,
        player: String,
        records: RecordStore,
    ) -> anyhow::Result<Self> {
        let session = setup.new_session(seed)?;
        Ok(Self::with_session(session, setup, seed, player, records))
    }

    pub fn with_session(
        session: GameSession,
        setup: Setup,
        seed: u64,
        player: String,
        records: RecordStore,
    ) -> Self {
        Self {
            session,
            setup,
            seed,
            player,
            records,
            started_at: None,
            ended_at: None,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Clock starts at the first action that changes the board and stops when the game ends.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    pub fn handle(
        &mut self,
        command: Command,
        now: DateTime<Utc>,
        out: &mut impl Write,
    ) -> anyhow::Result<Flow> {
        match command {
            Command::Act(action) => self.act(action, now, out)?,
            Command::New(difficulty) => {
                if let Some(difficulty) = difficulty {
                    self.setup = Setup::Preset(difficulty);
                }
                self.seed = self.seed.wrapping_add(1);
                self.session = self.setup.new_session(self.seed)?;
                self.started_at = None;
                self.ended_at = None;
                log::info!("New game {:?} with seed {}", self.setup, self.seed);
                self.show(out)?;
            }
            Command::Status => {
                self.show(out)?;
                writeln!(out, "time: {}s", self.elapsed_secs(now))?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    pub fn show(&self, out: &mut impl Write) -> anyhow::Result<()> {
        write!(out, "{}", render(&BoardView::from_session(&self.session)))?;
        Ok(())
    }

    fn act(
        &mut self,
        action: Action,
        now: DateTime<Utc>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let changed = match action {
            Action::Reveal { coords } => self.session.reveal(coords).map(RevealOutcome::has_update),
            Action::ToggleFlag { coords } => {
                self.session.toggle_flag(coords).map(FlagOutcome::has_update)
            }
        };
        match changed {
            Ok(true) => {}
            Ok(false) => {
                writeln!(out, "nothing to do there")?;
                return Ok(());
            }
            Err(err) if !err.is_fatal() => {
                log::debug!("Ignored {action:?}: {err}");
                writeln!(out, "ignored: {err}")?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }

        let status = self.session.status();
        self.started_at.get_or_insert(now);
        if status.is_final() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
        self.show(out)?;

        match status {
            GameStatus::Won => self.finish_won(now, out)?,
            GameStatus::Lost => {
                if let Some((x, y, z)) = self.session.triggered_mine() {
                    writeln!(out, "Boom at {x} {y} {z}. `n` starts a new game.")?;
                }
            }
            GameStatus::NotStarted | GameStatus::Playing => {}
        }
        Ok(())
    }

    fn finish_won(&mut self, now: DateTime<Utc>, out: &mut impl Write) -> anyhow::Result<()> {
        let seconds = self.elapsed_secs(now);
        writeln!(out, "Cleared in {seconds}s!")?;

        // custom boards are not ranked
        let Some(difficulty) = self.session.difficulty() else {
            return Ok(());
        };
        let date = now.date_naive();
        match self.records.submit(difficulty, &self.player, seconds, date)? {
            Some(rank) => writeln!(out, "New {difficulty} record, rank {rank}")?,
            None => writeln!(out, "Not fast enough for the {difficulty} table")?,
        }

        if let Some(board) = self.records.boards().board(difficulty) {
            for record in board.records() {
                writeln!(
                    out,
                    "{:>2}. {:<12} {:>5}s  {}",
                    record.rank, record.name, record.seconds, record.date
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mine3d_core::{CellStatus, Coord3, MineLayout};

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
    }

    fn controller(size: Coord3, mines: &[Coord3]) -> Controller {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        let mut session = GameSession::new(Board::new(layout));
        session.start().unwrap();
        let setup = Setup::Custom(GameConfig::new(size, mines.len() as u32).unwrap());
        let records = RecordStore::open(None).unwrap();
        Controller::with_session(session, setup, 1, "tester".into(), records)
    }

    fn reveal(coords: Coord3) -> Command {
        Command::Act(Action::Reveal { coords })
    }

    #[test]
    fn invalid_actions_are_reported_and_ignored() {
        let mut controller = controller((4, 4, 4), &[(0, 0, 0)]);
        let mut out = Vec::new();

        let flow = controller.handle(reveal((9, 0, 0)), t(0), &mut out).unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ignored: Coordinates are outside the grid\n"
        );
        assert_eq!(controller.session().board().count_by_status(CellStatus::Hidden), 64);
        assert_eq!(controller.elapsed_secs(t(50)), 0);
    }

    #[test]
    fn actions_without_effect_do_not_start_the_clock() {
        let layout = MineLayout::from_mine_coords((4, 4, 4), &[(0, 0, 0)]).unwrap();
        let mut session = GameSession::new(Board::new(layout));
        session.start().unwrap();
        session.toggle_flag((3, 3, 3)).unwrap();
        let setup = Setup::Custom(GameConfig::new((4, 4, 4), 1).unwrap());
        let records = RecordStore::open(None).unwrap();
        let mut controller = Controller::with_session(session, setup, 1, "tester".into(), records);
        let mut out = Vec::new();

        controller.handle(reveal((3, 3, 3)), t(10), &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "nothing to do there\n");
        assert_eq!(controller.elapsed_secs(t(50)), 0);
        assert_eq!(controller.session().board().count_by_status(CellStatus::Revealed), 0);
    }

    #[test]
    fn clock_runs_from_first_action_to_the_end() {
        let mut controller = controller((3, 1, 1), &[(0, 0, 0)]);
        let mut out = Vec::new();

        controller.handle(reveal((1, 0, 0)), t(10), &mut out).unwrap();
        assert_eq!(controller.elapsed_secs(t(15)), 5);

        controller.handle(reveal((2, 0, 0)), t(22), &mut out).unwrap();
        assert_eq!(controller.session().status(), GameStatus::Won);
        assert_eq!(controller.elapsed_secs(t(100)), 12);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Cleared in 12s!"));
        // custom board, nothing ranked
        assert!(controller.records.boards().board(Difficulty::Easy).is_none());
    }

    #[test]
    fn hitting_a_mine_names_it() {
        let mut controller = controller((2, 2, 2), &[(1, 1, 1)]);
        let mut out = Vec::new();

        controller.handle(reveal((1, 1, 1)), t(0), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Lost"));
        assert!(text.contains("Boom at 1 1 1."));
    }

    #[test]
    fn preset_wins_are_ranked() {
        let mut controller = Controller::new(
            Setup::Preset(Difficulty::Easy),
            42,
            "tester".into(),
            RecordStore::open(None).unwrap(),
        )
        .unwrap();
        let mut out = Vec::new();

        let safe: Vec<Coord3> = controller
            .session()
            .board()
            .cells()
            .iter()
            .filter(|cell| !cell.is_mine())
            .map(|cell| cell.coords())
            .collect();
        for coords in safe {
            if controller.session().is_finished() {
                break;
            }
            controller.handle(reveal(coords), t(100), &mut out).unwrap();
        }

        assert_eq!(controller.session().status(), GameStatus::Won);
        let board = controller.records.boards().board(Difficulty::Easy).unwrap();
        assert_eq!(board.records()[0].name, "tester");
        assert_eq!(board.records()[0].seconds, 0);
        assert!(String::from_utf8(out).unwrap().contains("New Easy record, rank 1"));
    }

    #[test]
    fn new_game_switches_difficulty_and_quit_stops() {
        let mut controller = controller((2, 1, 1), &[(0, 0, 0)]);
        let mut out = Vec::new();
        controller.handle(reveal((0, 0, 0)), t(0), &mut out).unwrap();

        controller
            .handle(Command::New(Some(Difficulty::Normal)), t(5), &mut out)
            .unwrap();
        assert_eq!(controller.session().status(), GameStatus::Playing);
        assert_eq!(controller.session().board().size(), (5, 6, 7));
        assert_eq!(controller.elapsed_secs(t(9)), 0);

        controller.handle(Command::New(None), t(6), &mut out).unwrap();
        assert_eq!(controller.session().difficulty(), Some(Difficulty::Normal));

        assert_eq!(
            controller.handle(Command::Quit, t(7), &mut out).unwrap(),
            Flow::Quit
        );
    }
}
