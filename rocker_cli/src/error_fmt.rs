//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use rocker_core::error::{BuildError, RockerError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingExtent => {
                "What happened: No drag extent was provided to the rocker engine.\nLikely causes: The [extent] table is missing from the config or was not wired into the builder.\nHow to fix: Add an [extent] table (length or center/span/edge_margin) to the config, or pass one via with_extent(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Zero or out-of-range values in [rocker] or a CLI override.\nHow to fix: Use interval_count >= 1 and base_rate_ms >= 1, then rerun."
            ),
        };
    }

    if let Some(re) = err.downcast_ref::<RockerError>() {
        return match re {
            RockerError::State(msg) => format!(
                "What happened: A drag step arrived in the wrong order ({msg}).\nLikely causes: The script moves or ends a session that was never started, or starts one twice.\nHow to fix: Begin each session with 'start' and close it with 'end'."
            ),
            RockerError::Config(msg) => format!(
                "What happened: Invalid rocker setting ({msg}).\nLikely causes: A zero value passed to a runtime setter or CLI override.\nHow to fix: Use interval_count >= 1 and base_rate_ms >= 1."
            ),
            RockerError::Timer(msg) => format!(
                "What happened: The tick timer failed ({msg}).\nLikely causes: The timer thread could not be spawned or died mid-session.\nHow to fix: Retry the run; if it persists, check system thread limits."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("invalid configuration") {
        return "What happened: Configuration is invalid or incomplete.\nLikely causes: Missing [extent] table, or zero/out-of-range values in [rocker].\nHow to fix: Edit the TOML config and try again.".to_string();
    }

    if lower.contains("line ")
        && (lower.contains("move")
            || lower.contains("wait")
            || lower.contains("step")
            || lower.contains("trailing"))
    {
        return format!(
            "What happened: The drag script could not be parsed.\nLikely causes: A typo in a step keyword or a malformed argument.\nHow to fix: Each line is one of start, move <delta>, wait <ms>, end. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Map typed failures to stable exit codes so scripts can branch on them; everything else returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use rocker_core::error::{BuildError, RockerError};
    if let Some(re) = err.downcast_ref::<RockerError>() {
        return match re {
            RockerError::State(_) => 3,
            RockerError::Config(_) => 4,
            RockerError::Timer(_) => 5,
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use rocker_core::error::{BuildError, RockerError};
    use serde_json::json;

    let reason = if let Some(re) = err.downcast_ref::<RockerError>() {
        match re {
            RockerError::State(_) => "State",
            RockerError::Config(_) => "Config",
            RockerError::Timer(_) => "Timer",
        }
    } else if err.downcast_ref::<BuildError>().is_some() {
        "Build"
    } else {
        "Error"
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::Report;
    use rocker_core::error::{BuildError, RockerError};

    #[test]
    fn typed_errors_get_specific_guidance() {
        let err = Report::new(RockerError::State("move without active drag".into()));
        let text = humanize(&err);
        assert!(text.contains("wrong order"));
        assert!(text.contains("move without active drag"));
        assert_eq!(exit_code_for_error(&err), 3);
    }

    #[test]
    fn build_errors_point_at_the_extent_table() {
        let err = Report::new(BuildError::MissingExtent);
        assert!(humanize(&err).contains("[extent]"));
        assert_eq!(exit_code_for_error(&err), 2);
    }

    #[test]
    fn script_parse_errors_keep_the_line_number() {
        let err = eyre::eyre!("line 3: move needs a numeric delta, got \"sideways\"");
        let text = humanize(&err);
        assert!(text.contains("script"));
        assert!(text.contains("line 3"));
        assert_eq!(exit_code_for_error(&err), 1);
    }

    #[test]
    fn json_errors_carry_the_reason() {
        let err = Report::new(RockerError::Timer("worker died".into()));
        let parsed: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(parsed["reason"], "Timer");
        assert!(parsed["message"].as_str().unwrap().contains("timer"));
    }

    #[test]
    fn unknown_errors_fall_back_to_a_generic_block() {
        let err = eyre::eyre!("something else entirely");
        let text = humanize(&err);
        assert!(text.contains("Something went wrong"));
        assert!(text.contains("--log-level=debug"));
        assert_eq!(exit_code_for_error(&err), 1);
    }
}
