use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use maze_chase_core::Direction;

/// Steering input applied before the tick of a given frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SteerStep {
    frame: u64,
    direction: Option<Direction>,
}

impl SteerStep {
    /// Frame the input is applied on.
    pub(crate) const fn frame(&self) -> u64 {
        self.frame
    }

    /// Held direction requested by the input; `None` releases it.
    pub(crate) const fn direction(&self) -> Option<Direction> {
        self.direction
    }
}

impl FromStr for SteerStep {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (frame, direction) = value
            .split_once(':')
            .ok_or_else(|| anyhow!("expected FRAME:DIRECTION, got '{value}'"))?;
        let frame = frame
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid frame in '{value}'"))?;
        let direction = match direction.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "none" => None,
            other => bail!("unknown direction '{other}'"),
        };
        Ok(Self { frame, direction })
    }
}
