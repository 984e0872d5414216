use std::fmt;
use std::str::FromStr;

/// Priority tier of a scheduled task.
///
/// Ordering follows urgency: `High > Normal > Low`, so a descending sort puts
/// the most urgent work first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Normal,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            other => Err(format!(
                "invalid priority: {other} (expected \"high\", \"normal\" or \"low\")"
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        };
        f.write_str(s)
    }
}

/// How the scheduler drains its queue.
///
/// - `Idle`: run tasks inside idle slices handed out by the host, as long as
///   the slice has time left.
/// - `Fallback`: run a fixed-size batch, yield back to the runtime, repeat.
///   Also used automatically when the host has no idle primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainMode {
    Idle,
    Fallback,
}

impl Default for DrainMode {
    fn default() -> Self {
        DrainMode::Idle
    }
}

impl FromStr for DrainMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "idle" => Ok(DrainMode::Idle),
            "fallback" | "batch" => Ok(DrainMode::Fallback),
            other => Err(format!(
                "invalid drain mode: {other} (expected \"idle\" or \"fallback\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ordering() {
        assert!(Priority::High > Priority::Normal);
        assert!(Priority::Normal > Priority::Low);
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!(" HIGH ".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn drain_mode_accepts_batch_alias() {
        assert_eq!("batch".parse::<DrainMode>(), Ok(DrainMode::Fallback));
        assert_eq!("idle".parse::<DrainMode>(), Ok(DrainMode::Idle));
        assert!("eager".parse::<DrainMode>().is_err());
    }
}
