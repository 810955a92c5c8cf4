//! Drag script parsing.
//!
//! A script is a line-oriented description of one or more drag sessions:
//!
//! ```text
//! # comments and blank lines are skipped
//! start
//! move -30.5
//! wait 500
//! end
//! ```

use eyre::{bail, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Start,
    Move(f32),
    Wait(u64),
    End,
}

pub fn parse(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let word = parts.next().unwrap_or_default();
        let step = match word {
            "start" => Step::Start,
            "end" => Step::End,
            "move" => {
                let arg = parts
                    .next()
                    .ok_or_else(|| eyre::eyre!("line {line_no}: move needs a delta"))?;
                let delta: f32 = arg
                    .parse()
                    .map_err(|_| eyre::eyre!("line {line_no}: bad move delta '{arg}'"))?;
                Step::Move(delta)
            }
            "wait" => {
                let arg = parts
                    .next()
                    .ok_or_else(|| eyre::eyre!("line {line_no}: wait needs milliseconds"))?;
                let ms: u64 = arg
                    .parse()
                    .map_err(|_| eyre::eyre!("line {line_no}: bad wait duration '{arg}'"))?;
                Step::Wait(ms)
            }
            other => bail!("line {line_no}: unknown step '{other}'"),
        };
        if parts.next().is_some() {
            bail!("line {line_no}: trailing input after '{word}'");
        }
        steps.push(step);
    }
    if steps.is_empty() {
        bail!("script has no steps");
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::{parse, Step};

    #[test]
    fn parses_a_full_session() {
        let steps = parse("# demo\nstart\nmove -30.5\nwait 500\nmove 10\nend\n").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Start,
                Step::Move(-30.5),
                Step::Wait(500),
                Step::Move(10.0),
                Step::End,
            ]
        );
    }

    #[test]
    fn reports_the_failing_line() {
        let err = parse("start\nmove sideways\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn rejects_trailing_tokens() {
        let err = parse("start now\n").unwrap_err();
        assert!(err.to_string().contains("trailing"));
    }

    #[test]
    fn rejects_missing_arguments() {
        assert!(parse("start\nmove\n").is_err());
        assert!(parse("start\nwait\n").is_err());
    }

    #[test]
    fn rejects_empty_scripts() {
        assert!(parse("# nothing here\n\n").is_err());
    }
}
