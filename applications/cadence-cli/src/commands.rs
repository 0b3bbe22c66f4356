//! Line-oriented command parsing
//!
//! Each stdin line is one command, e.g. `play`, `seek 42`, `effect rate-up`,
//! `eq gains 3,2,0,0,0,0,0,1,2,3`.

use crate::error::{CliError, Result};
use cadence_playback::{PlayerCommand, SpecialEffect};
use std::time::Duration;

pub const HELP: &str = "\
Commands:
  play | pause | stop          transport
  next | prev                  select neighbour entry and play it
  select <index>               play a playlist entry
  seek <seconds>               jump to a position
  volume <0-100>               set volume
  mute | unmute
  spatial                      toggle the spatial echo
  effect <name|index>          one-shot effect (echo, mix-channels, reverse, side-cut,
                               center-cut, rate-up, rate-down, pitch-up, pitch-down,
                               tempo-up, tempo-down, fade-out, fade-in)
  eq on | eq off | eq load | eq reset | eq gains <g1,g2,...>
  help
  quit";

/// What the front-end should do with an input line
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Forward to the player loop
    Command(PlayerCommand),

    /// Print usage
    Help,

    /// Blank line
    Nothing,
}

/// Parse one input line
pub fn parse_line(line: &str) -> Result<Input> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(Input::Nothing);
    };
    let name = name.to_ascii_lowercase();
    let arg = words.next();

    let command = match name.as_str() {
        "help" | "?" => return Ok(Input::Help),
        "play" => PlayerCommand::Play,
        "pause" => PlayerCommand::Pause,
        "stop" => PlayerCommand::Stop,
        "next" | "n" => PlayerCommand::Next,
        "prev" | "previous" | "p" => PlayerCommand::Previous,
        "select" => PlayerCommand::SelectIndex(parse_number(&name, arg)?),
        "seek" => PlayerCommand::Seek(Duration::from_secs(parse_number(&name, arg)?)),
        "volume" | "vol" => PlayerCommand::SetVolume(parse_number(&name, arg)?),
        "mute" => PlayerCommand::SetMuted(true),
        "unmute" => PlayerCommand::SetMuted(false),
        "spatial" => PlayerCommand::ToggleSpatialEffect,
        "effect" => PlayerCommand::SetSpecialEffect(parse_effect(&name, arg)?),
        "eq" => parse_eq(arg, words.next())?,
        "quit" | "exit" | "q" => PlayerCommand::Shutdown,
        _ => return Err(CliError::UnknownCommand(name)),
    };

    Ok(Input::Command(command))
}

fn parse_number<T: std::str::FromStr>(command: &str, arg: Option<&str>) -> Result<T> {
    let arg = arg.ok_or_else(|| CliError::invalid(command, "missing number"))?;
    arg.parse()
        .map_err(|_| CliError::invalid(command, format!("not a number: {arg}")))
}

fn parse_effect(command: &str, arg: Option<&str>) -> Result<SpecialEffect> {
    let arg = arg.ok_or_else(|| CliError::invalid(command, "missing effect"))?;
    if let Ok(index) = arg.parse::<u8>() {
        return SpecialEffect::from_index(index)
            .ok_or_else(|| CliError::invalid(command, format!("no effect at index {index}")));
    }
    arg.parse().map_err(|e: String| CliError::invalid(command, e))
}

fn parse_eq(action: Option<&str>, value: Option<&str>) -> Result<PlayerCommand> {
    match action {
        Some("on") => Ok(PlayerCommand::SetEqEnabled(true)),
        Some("off") => Ok(PlayerCommand::SetEqEnabled(false)),
        Some("load") => Ok(PlayerCommand::LoadEqPresets),
        Some("reset") => Ok(PlayerCommand::ResetEq),
        Some("gains") => {
            let value = value.ok_or_else(|| CliError::invalid("eq gains", "missing gains"))?;
            let gains = value
                .split(',')
                .map(|gain| {
                    gain.trim()
                        .parse::<i32>()
                        .map_err(|_| CliError::invalid("eq gains", format!("bad gain: {gain}")))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(PlayerCommand::SetEqGains(gains))
        }
        Some(other) => Err(CliError::invalid("eq", format!("unknown action: {other}"))),
        None => Err(CliError::invalid("eq", "missing action")),
    }
}
