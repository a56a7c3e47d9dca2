use strum::Display;

pub const START_TOKEN: &str = "GAME START";
pub const STOP_TOKEN: &str = "GAME STOP";
pub const HIT_TOKEN: &str = "HIT";
pub const MISS_TOKEN: &str = "MISS";

/// One classified line from the target board
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum Event {
    #[strum(serialize = "START")]
    Start,
    #[strum(serialize = "STOP")]
    Stop,
    #[strum(serialize = "HIT")]
    Hit,
    #[strum(serialize = "MISS")]
    Miss,
    #[strum(serialize = "UNRECOGNIZED")]
    Unrecognized(String),
}

impl Event {
    /// Classify a device line.
    ///
    /// Matching is case-sensitive and by substring. Tokens are checked in
    /// priority order (`GAME START`, `GAME STOP`, `HIT`, `MISS`) and the first
    /// match wins, so `"GAME START HIT"` is a start.
    pub fn classify(line: &str) -> Self {
        if line.contains(START_TOKEN) {
            Self::Start
        } else if line.contains(STOP_TOKEN) {
            Self::Stop
        } else if line.contains(HIT_TOKEN) {
            Self::Hit
        } else if line.contains(MISS_TOKEN) {
            Self::Miss
        } else {
            Self::Unrecognized(line.to_string())
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_tokens() {
        assert_eq!(Event::classify("GAME START"), Event::Start);
        assert_eq!(Event::classify("GAME STOP"), Event::Stop);
        assert_eq!(Event::classify("HIT"), Event::Hit);
        assert_eq!(Event::classify("MISS"), Event::Miss);
    }

    #[test]
    fn test_classify_substring() {
        assert_eq!(Event::classify(">> GAME START <<"), Event::Start);
        assert_eq!(Event::classify("target 3 HIT"), Event::Hit);
        assert_eq!(Event::classify("MISSED"), Event::Miss);
    }

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(Event::classify("GAME START HIT"), Event::Start);
        assert_eq!(Event::classify("HIT GAME STOP"), Event::Stop);
        assert_eq!(Event::classify("MISS HIT"), Event::Hit);
        assert_eq!(Event::classify("GAME START GAME STOP"), Event::Start);
    }

    #[test]
    fn test_classify_case_sensitive() {
        assert_eq!(Event::classify("hit"), Event::Unrecognized("hit".to_string()));
        assert_eq!(
            Event::classify("game start"),
            Event::Unrecognized("game start".to_string())
        );
    }

    #[test]
    fn test_classify_unrecognized_keeps_text() {
        let event = Event::classify("sensor calibrated");
        assert_eq!(event, Event::Unrecognized("sensor calibrated".to_string()));
        assert!(!event.is_recognized());
    }

    #[test]
    fn test_classify_is_pure() {
        let lines = ["noise", "GAME START", "HIT", "MISS", "GAME STOP", "HIT"];
        let first: Vec<Event> = lines.iter().map(|l| Event::classify(l)).collect();
        let second: Vec<Event> = lines.iter().map(|l| Event::classify(l)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Event::Hit.to_string(), "HIT");
        assert_eq!(Event::Unrecognized("x".to_string()).to_string(), "UNRECOGNIZED");
    }
}
