//! Frame-by-frame session driver that feeds the world from adapter input.

use outbreak_core::{Command, Event, PlayMode};
use outbreak_rendering::{FrameControl, FrameInput, GridPresentation, Hud, Scene};
use outbreak_system_placement::{Placement, PlacementInput, PlacementPreview};
use outbreak_world::{self as world, query, World};
use tracing::{debug, info};

/// When a session stops on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StopRules {
    /// Turns are no longer advanced once the counter reaches this value.
    pub(crate) turn_limit: u64,
    /// Stop after a running turn in which no agent moved.
    pub(crate) until_stable: bool,
    /// Keep the session open until a quit request, even past the limit.
    pub(crate) interactive: bool,
}

/// Owns the session and advances it once per rendered frame.
#[derive(Debug)]
pub(crate) struct Driver {
    world: World,
    placement: Placement,
    pending: Vec<Event>,
    rules: StopRules,
}

impl Driver {
    /// Wraps `world`; `pending` holds events produced before the first frame.
    pub(crate) fn new(world: World, pending: Vec<Event>, rules: StopRules) -> Self {
        Self {
            world,
            placement: Placement::new(),
            pending,
            rules,
        }
    }

    /// Scene describing the session as it currently stands.
    ///
    /// Pending start-up events are left for the first frame, which reports
    /// them together with that frame's own events.
    pub(crate) fn scene(&self) -> Scene {
        let grid = query::grid(&self.world);
        let mut hud = Hud::new(
            query::turn(&self.world),
            query::placement_counts(&self.world),
            query::play_mode(&self.world),
        );
        hud.brush = self.placement.brush();
        Scene::new(GridPresentation::from_grid(grid), hud)
    }

    /// Processes one frame of input, advancing a turn while running.
    pub(crate) fn frame(&mut self, input: FrameInput, scene: &mut Scene) -> FrameControl {
        let mut events = std::mem::take(&mut self.pending);

        if input.reset {
            world::apply(&mut self.world, Command::Reset, &mut events);
        }
        if let Some(mode) = input.play_mode {
            world::apply(&mut self.world, Command::SetPlayMode { mode }, &mut events);
        }

        let mut commands = Vec::new();
        self.placement.handle(
            &events,
            PlacementInput {
                select_brush: input.brush,
                paint: input.paint,
                erase: input.erase,
            },
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let running = query::play_mode(&self.world) == PlayMode::Running;
        let mut stalled = false;
        if (running || input.step_turn) && query::turn(&self.world) < self.rules.turn_limit {
            let start = events.len();
            world::apply(&mut self.world, Command::AdvanceTurn, &mut events);
            let turn_events = events.get(start..).unwrap_or_default();
            stalled = !turn_events
                .iter()
                .any(|event| matches!(event, Event::AgentMoved { .. }));
            for event in turn_events {
                if let Event::HumanCaught { cell } = event {
                    info!(row = cell.row(), column = cell.column(), "human caught");
                }
            }
        }

        scene.refresh_grid(query::grid(&self.world));
        scene.hud.turn = query::turn(&self.world);
        scene.hud.play_mode = query::play_mode(&self.world);
        scene.hud.brush = self.placement.brush();
        scene.absorb_events(&events);
        if let Some(cell) = input.inspect {
            scene.hud.feedback = Some(describe_preview(
                &self.placement.preview(query::grid(&self.world), cell),
            ));
        }

        let turn = query::turn(&self.world);
        if input.quit {
            info!(turn, "session closed");
            return FrameControl::Exit;
        }
        if self.rules.interactive {
            debug!(turn, events = events.len(), "frame processed");
            return FrameControl::Continue;
        }
        if turn >= self.rules.turn_limit {
            info!(turn, "turn limit reached");
            return FrameControl::Exit;
        }
        if self.rules.until_stable && running && stalled {
            info!(turn, "no agent moved; grid is stable");
            return FrameControl::Exit;
        }
        debug!(turn, events = events.len(), "frame processed");
        FrameControl::Continue
    }
}

fn describe_preview(preview: &PlacementPreview) -> String {
    let (row, column) = (preview.cell.row(), preview.cell.column());
    let brush = preview.brush.label();
    match preview.outcome {
        Ok(Some(cell)) => format!("painting ({row}, {column}) with {brush} leaves {}", cell.label()),
        Ok(None) => format!("painting ({row}, {column}) with {brush} changes nothing"),
        Err(reason) => format!("painting ({row}, {column}) with {brush} is rejected: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outbreak_core::{Cell, CellCoord, Grid};

    fn running_world(layout: &str) -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        let grid = Grid::parse(layout).expect("valid layout");
        world::apply(&mut world, Command::LoadGrid { grid }, &mut events);
        world::apply(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Running,
            },
            &mut events,
        );
        (world, events)
    }

    fn rules(turn_limit: u64, until_stable: bool) -> StopRules {
        StopRules {
            turn_limit,
            until_stable,
            interactive: false,
        }
    }

    #[test]
    fn running_session_advances_once_per_frame_until_the_limit() {
        let (world, events) = running_world(
            "
            H...S
            .....
            .....
            .....
            ....Z
            ",
        );
        let mut driver = Driver::new(world, events, rules(3, false));
        let mut scene = driver.scene();

        assert_eq!(driver.frame(FrameInput::default(), &mut scene), FrameControl::Continue);
        assert_eq!(driver.frame(FrameInput::default(), &mut scene), FrameControl::Continue);
        assert_eq!(driver.frame(FrameInput::default(), &mut scene), FrameControl::Exit);
        assert_eq!(scene.hud.turn, 3);
        assert_eq!(scene.hud.play_mode, PlayMode::Running);
    }

    #[test]
    fn until_stable_stops_once_nothing_moves() {
        let (world, events) = running_world(
            "
            HS....
            ......
            ......
            ......
            ......
            .....Z
            ",
        );
        let mut driver = Driver::new(world, events, rules(100, true));
        let mut scene = driver.scene();

        let mut frames = 0;
        while driver.frame(FrameInput::default(), &mut scene) == FrameControl::Continue {
            frames += 1;
            assert!(frames < 100, "session never settled");
        }

        assert!(scene.hud.turn < 100);
        assert_eq!(scene.hud.counts.humans, 0, "the sheltered human is eventually caught");
        assert_eq!(scene.hud.counts.zombies, 1);
    }

    #[test]
    fn paused_session_accepts_painting_and_single_steps() {
        let world = World::with_size(6);
        let mut driver = Driver::new(world, Vec::new(), rules(10, false));
        let mut scene = driver.scene();

        let _ = driver.frame(
            FrameInput {
                brush: Some(Cell::Zombie),
                paint: Some(CellCoord::new(0, 0)),
                ..FrameInput::default()
            },
            &mut scene,
        );
        assert_eq!(scene.hud.counts.zombies, 1);
        assert_eq!(scene.hud.turn, 0);

        let _ = driver.frame(
            FrameInput {
                brush: Some(Cell::Human),
                paint: Some(CellCoord::new(0, 2)),
                step_turn: true,
                ..FrameInput::default()
            },
            &mut scene,
        );
        assert_eq!(scene.hud.turn, 1);
        assert_eq!(scene.grid.cells()[1].state, Cell::Zombie);
    }

    #[test]
    fn failed_start_is_reported_in_the_hud() {
        let world = World::with_size(6);
        let mut driver = Driver::new(world, Vec::new(), rules(10, false));
        let mut scene = driver.scene();

        let control = driver.frame(
            FrameInput {
                play_mode: Some(PlayMode::Running),
                ..FrameInput::default()
            },
            &mut scene,
        );

        assert_eq!(control, FrameControl::Continue);
        assert_eq!(scene.hud.play_mode, PlayMode::Setup);
        assert_eq!(
            scene.hud.feedback.as_deref(),
            Some("cannot start: place at least one human")
        );
    }

    #[test]
    fn start_up_events_are_reported_by_the_first_frame_only() {
        let (world, events) = running_world(
            "
            H.....
            ......
            ......
            ......
            ......
            .....Z
            ",
        );
        let mut driver = Driver::new(world, events, rules(10, false));
        let mut scene = driver.scene();

        assert_eq!(scene.hud.feedback, None);
        assert_eq!(scene.hud.turn, 0);

        let _ = driver.frame(FrameInput::default(), &mut scene);
        assert_eq!(scene.hud.feedback.as_deref(), Some("simulation running"));
        assert_eq!(scene.hud.turn, 1);

        scene.hud.feedback = None;
        let _ = driver.frame(FrameInput::default(), &mut scene);
        assert_eq!(scene.hud.feedback, None, "start-up events are reported once");
        assert_eq!(scene.hud.turn, 2);
    }

    #[test]
    fn look_reports_the_placement_preview() {
        let world = World::with_size(6);
        let mut driver = Driver::new(world, Vec::new(), rules(10, false));
        let mut scene = driver.scene();

        let _ = driver.frame(
            FrameInput {
                brush: Some(Cell::Safe),
                inspect: Some(CellCoord::new(2, 3)),
                ..FrameInput::default()
            },
            &mut scene,
        );
        assert_eq!(scene.hud.brush, Cell::Safe);
        assert_eq!(
            scene.hud.feedback.as_deref(),
            Some("painting (2, 3) with S leaves S")
        );

        let _ = driver.frame(
            FrameInput {
                inspect: Some(CellCoord::new(9, 9)),
                ..FrameInput::default()
            },
            &mut scene,
        );
        assert_eq!(
            scene.hud.feedback.as_deref(),
            Some("painting (9, 9) with S is rejected: cell lies outside the grid")
        );
        assert_eq!(scene.hud.counts.safes, 0, "looking never paints");
    }

    #[test]
    fn interactive_session_outlives_the_turn_limit_until_quit() {
        let (world, events) = running_world(
            "
            H.....
            ......
            ......
            ......
            ......
            .....Z
            ",
        );
        let mut driver = Driver::new(
            world,
            events,
            StopRules {
                turn_limit: 2,
                until_stable: true,
                interactive: true,
            },
        );
        let mut scene = driver.scene();

        for _ in 0..5 {
            assert_eq!(
                driver.frame(FrameInput::default(), &mut scene),
                FrameControl::Continue
            );
        }
        assert_eq!(scene.hud.turn, 2);

        let control = driver.frame(
            FrameInput {
                quit: true,
                ..FrameInput::default()
            },
            &mut scene,
        );
        assert_eq!(control, FrameControl::Exit);
    }

    #[test]
    fn pause_then_edit_then_resume() {
        let (world, events) = running_world(
            "
            H.....
            ......
            ......
            ......
            ......
            .....Z
            ",
        );
        let mut driver = Driver::new(world, events, rules(50, false));
        let mut scene = driver.scene();

        let _ = driver.frame(
            FrameInput {
                play_mode: Some(PlayMode::Setup),
                ..FrameInput::default()
            },
            &mut scene,
        );
        assert_eq!(scene.hud.play_mode, PlayMode::Setup);
        assert_eq!(scene.hud.turn, 0);

        let _ = driver.frame(
            FrameInput {
                brush: Some(Cell::Barricade),
                paint: Some(CellCoord::new(3, 3)),
                ..FrameInput::default()
            },
            &mut scene,
        );
        assert_eq!(scene.grid.cells()[3 * 6 + 3].state, Cell::Barricade);

        let _ = driver.frame(
            FrameInput {
                play_mode: Some(PlayMode::Running),
                ..FrameInput::default()
            },
            &mut scene,
        );
        assert_eq!(scene.hud.play_mode, PlayMode::Running);
        assert_eq!(scene.hud.turn, 1);
    }
}
