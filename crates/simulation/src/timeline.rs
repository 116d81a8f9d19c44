//! Minute-by-minute playback of a day
//!
//! [`Timeline`] is the pure state machine; [`Animator`] drives it from a
//! tokio task and publishes every change on a `watch` channel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

const LAST_MINUTE: u16 = 24 * 60 - 1;

/// Minutes since midnight, `00:00` to `23:59`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Clamp a minute count into the day
    #[must_use]
    pub fn from_minutes(minutes: i64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self(minutes.clamp(0, i64::from(LAST_MINUTE)) as u16)
    }

    /// Round a fractional minute count, then clamp
    #[must_use]
    pub fn from_fractional(minutes: f64) -> Self {
        if minutes.is_finite() {
            #[allow(clippy::cast_possible_truncation)]
            Self::from_minutes(minutes.round() as i64)
        } else {
            Self::default()
        }
    }

    /// Lenient `HH:MM` parse.
    ///
    /// Non-numeric parts give midnight; values outside the day are clamped.
    /// Both cases are logged.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        let mut parts = text.trim().splitn(2, ':');
        let hours = parts.next().and_then(|h| h.trim().parse::<i64>().ok());
        let minutes = parts.next().and_then(|m| m.trim().parse::<i64>().ok());

        match (hours, minutes) {
            (Some(h), Some(m)) => {
                let total = h * 60 + m;
                if !(0..=23).contains(&h) || !(0..=59).contains(&m) {
                    warn!(time = %text, "Time out of range");
                }
                Self::from_minutes(total)
            }
            _ => {
                warn!(time = %text, "Invalid time format");
                Self::default()
            }
        }
    }

    /// Minutes since midnight
    #[must_use]
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Shift by a signed number of minutes, clamped to the day
    #[must_use]
    pub fn offset(self, delta: i64) -> Self {
        Self::from_minutes(i64::from(self.0) + delta)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for TimeOfDay {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

/// Playback rate; every tick is one simulated minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaySpeed {
    Half,
    #[default]
    Normal,
    Double,
    Fivefold,
}

impl PlaySpeed {
    /// Every supported speed, slowest first
    pub const ALL: [PlaySpeed; 4] = [Self::Half, Self::Normal, Self::Double, Self::Fivefold];

    /// Multiplier relative to one minute per second
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::Half => 0.5,
            Self::Normal => 1.0,
            Self::Double => 2.0,
            Self::Fivefold => 5.0,
        }
    }

    /// Wall-clock time between ticks
    #[must_use]
    pub fn interval(self) -> Duration {
        Duration::from_secs_f64(1.0 / self.factor())
    }
}

impl fmt::Display for PlaySpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.factor())
    }
}

impl FromStr for PlaySpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches(['x', 'X']) {
            "0.5" | ".5" => Ok(Self::Half),
            "1" | "1.0" => Ok(Self::Normal),
            "2" | "2.0" => Ok(Self::Double),
            "5" | "5.0" => Ok(Self::Fivefold),
            other => Err(format!("unsupported speed '{other}' (expected 0.5, 1, 2 or 5)")),
        }
    }
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Clock moved to this minute
    Advanced(TimeOfDay),
    /// The next minute would reach the end; playback stopped in place
    Finished,
    /// Not playing
    Idle,
}

/// Playback state over a `[start, end]` window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub current: TimeOfDay,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub speed: PlaySpeed,
    pub playing: bool,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(TimeOfDay::from_minutes(5 * 60), TimeOfDay::from_minutes(20 * 60))
    }
}

impl Timeline {
    /// Paused at noon (or the nearest edge of the window)
    #[must_use]
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        Self {
            current: TimeOfDay::from_minutes(12 * 60).clamp(start, end),
            start,
            end,
            speed: PlaySpeed::default(),
            playing: false,
        }
    }

    /// Same window, starting at `current`
    #[must_use]
    pub fn at(mut self, current: TimeOfDay) -> Self {
        self.seek(current);
        self
    }

    /// Advance one minute; stops without moving when the end is reached
    pub fn tick(&mut self) -> Tick {
        if !self.playing {
            return Tick::Idle;
        }
        let next = self.current.offset(1);
        if next >= self.end || next == self.current {
            self.playing = false;
            Tick::Finished
        } else {
            self.current = next;
            Tick::Advanced(next)
        }
    }

    /// Back one hour, not before `start`
    pub fn step_backward(&mut self) {
        self.current = self.current.offset(-60).max(self.start);
    }

    /// Forward one hour, not past `end`
    pub fn step_forward(&mut self) {
        self.current = self.current.offset(60).min(self.end);
    }

    /// Jump to a slider position within the window
    pub fn seek(&mut self, to: TimeOfDay) {
        self.current = to.clamp(self.start, self.end);
    }

    /// Back to `start`, paused
    pub fn reset(&mut self) {
        self.current = self.start;
        self.playing = false;
    }

    /// Flip play/pause; returns whether playback is now running
    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn set_speed(&mut self, speed: PlaySpeed) {
        self.speed = speed;
    }

    /// Position within the window, 0.0 to 1.0
    #[must_use]
    pub fn progress(&self) -> f64 {
        let span = f64::from(self.end.minutes()) - f64::from(self.start.minutes());
        if span <= 0.0 {
            return 1.0;
        }
        (f64::from(self.current.minutes()) - f64::from(self.start.minutes())) / span
    }
}

/// Messages accepted by a running [`Animator`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    SetSpeed(PlaySpeed),
    Seek(TimeOfDay),
    StepForward,
    StepBackward,
    Reset,
    Stop,
}

/// The animator task has ended
#[derive(Debug, Error)]
#[error("animator is no longer running")]
pub struct AnimatorStopped;

/// Control side of a running animator
#[derive(Debug, Clone)]
pub struct AnimatorHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<Timeline>,
}

impl AnimatorHandle {
    /// Send a command
    pub async fn send(&self, command: Command) -> Result<(), AnimatorStopped> {
        self.commands.send(command).await.map_err(|_| AnimatorStopped)
    }

    pub async fn play(&self) -> Result<(), AnimatorStopped> {
        self.send(Command::Play).await
    }

    pub async fn pause(&self) -> Result<(), AnimatorStopped> {
        self.send(Command::Pause).await
    }

    pub async fn stop(&self) -> Result<(), AnimatorStopped> {
        self.send(Command::Stop).await
    }

    /// Latest published state
    #[must_use]
    pub fn state(&self) -> Timeline {
        self.state.borrow().clone()
    }

    /// A receiver that sees every published state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Timeline> {
        self.state.clone()
    }
}

/// Drives a [`Timeline`] from a tokio interval
pub struct Animator;

impl Animator {
    /// Start the task. It ends on [`Command::Stop`] or when every handle is
    /// dropped, returning the final state.
    #[must_use]
    pub fn spawn(timeline: Timeline) -> (AnimatorHandle, JoinHandle<Timeline>) {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (state_tx, state_rx) = watch::channel(timeline.clone());
        let task = tokio::spawn(run(timeline, command_rx, state_tx));
        (
            AnimatorHandle {
                commands: command_tx,
                state: state_rx,
            },
            task,
        )
    }
}

fn ticker(speed: PlaySpeed) -> tokio::time::Interval {
    let period = speed.interval();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn run(
    mut timeline: Timeline,
    mut commands: mpsc::Receiver<Command>,
    state: watch::Sender<Timeline>,
) -> Timeline {
    let mut clock = ticker(timeline.speed);

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                if command == Command::Stop {
                    break;
                }
                let was_playing = timeline.playing;
                apply(&mut timeline, command);
                if matches!(command, Command::SetSpeed(_)) || (timeline.playing && !was_playing) {
                    clock = ticker(timeline.speed);
                }
                debug!(?command, current = %timeline.current, playing = timeline.playing, "Timeline command");
                state.send_replace(timeline.clone());
            }
            _ = clock.tick(), if timeline.playing => {
                if timeline.tick() == Tick::Finished {
                    debug!(current = %timeline.current, "Timeline finished");
                }
                state.send_replace(timeline.clone());
            }
        }
    }

    timeline.playing = false;
    state.send_replace(timeline.clone());
    timeline
}

fn apply(timeline: &mut Timeline, command: Command) {
    match command {
        Command::Play => timeline.playing = true,
        Command::Pause => timeline.playing = false,
        Command::Toggle => {
            timeline.toggle_play();
        }
        Command::SetSpeed(speed) => timeline.set_speed(speed),
        Command::Seek(to) => timeline.seek(to),
        Command::StepForward => timeline.step_forward(),
        Command::StepBackward => timeline.step_backward(),
        Command::Reset => timeline.reset(),
        Command::Stop => {}
    }
}
