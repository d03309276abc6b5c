//! Scripted host events.

use std::str::FromStr;

use anyhow::{anyhow, bail, Context};

/// One scripted host event.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// `click:x,y` - pointer click in client coordinates.
    Click {
        /// Client X.
        x: f32,
        /// Client Y.
        y: f32,
    },
    /// `move:x,y` - pointer move in client coordinates.
    Move {
        /// Client X.
        x: f32,
        /// Client Y.
        y: f32,
    },
    /// `tab` or `shift-tab`.
    Tab {
        /// Shift held.
        backward: bool,
    },
    /// `focus:id` - focus the shadow element of a shape.
    Focus(String),
    /// `blur:id` - blur the shadow element of a shape.
    Blur(String),
    /// `activate:id` - click the shadow element of a shape.
    Activate(String),
}

fn parse_point(raw: &str) -> anyhow::Result<(f32, f32)> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| anyhow!("expected `x,y`, got {raw:?}"))?;
    let x = x.trim().parse::<f32>().with_context(|| format!("bad x in {raw:?}"))?;
    let y = y.trim().parse::<f32>().with_context(|| format!("bad y in {raw:?}"))?;
    Ok((x, y))
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim() {
            "tab" => return Ok(Self::Tab { backward: false }),
            "shift-tab" => return Ok(Self::Tab { backward: true }),
            _ => {}
        }
        let (kind, arg) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("unknown step {s:?}"))?;
        if arg.is_empty() {
            bail!("step {s:?} is missing its argument");
        }
        match kind.trim() {
            "click" => parse_point(arg).map(|(x, y)| Self::Click { x, y }),
            "move" => parse_point(arg).map(|(x, y)| Self::Move { x, y }),
            "focus" => Ok(Self::Focus(arg.to_string())),
            "blur" => Ok(Self::Blur(arg.to_string())),
            "activate" => Ok(Self::Activate(arg.to_string())),
            other => bail!("unknown step kind {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!("click:30, 25".parse::<Step>().unwrap(), Step::Click { x: 30.0, y: 25.0 });
        assert_eq!("move:1,2".parse::<Step>().unwrap(), Step::Move { x: 1.0, y: 2.0 });
        assert_eq!("shift-tab".parse::<Step>().unwrap(), Step::Tab { backward: true });
        assert_eq!(
            "activate:button=Próximo".parse::<Step>().unwrap(),
            Step::Activate("button=Próximo".to_string())
        );
    }

    #[test]
    fn test_reject_malformed_steps() {
        assert!("jump".parse::<Step>().is_err());
        assert!("click:30".parse::<Step>().is_err());
        assert!("click:a,b".parse::<Step>().is_err());
        assert!("focus:".parse::<Step>().is_err());
    }
}
