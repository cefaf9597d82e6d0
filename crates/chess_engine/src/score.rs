use std::fmt::Display;

use regex::Regex;

/// Evaluation reported by the engine, from the point of view of the side to move
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Score {
    /// advantage in centipawns, negative if the side to move is worse
    Centipawns(i64),
    /// mate in {0} moves, negative if the side to move is getting mated
    Mate(i64),
}

impl Score {
    /// Parses the `score` part of an `info` line, if it has one
    pub(crate) fn parse(pattern: &Regex, line: &str) -> Option<Score> {
        let cap = pattern.captures(line)?;
        let value: i64 = cap.get(2)?.as_str().parse().ok()?;
        match cap.get(1)?.as_str() {
            "cp" => Some(Score::Centipawns(value)),
            "mate" => Some(Score::Mate(value)),
            _ => None,
        }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Centipawns(cp) => write!(f, "{:+.2}", *cp as f64 / 100.0),
            Score::Mate(n) => write!(f, "#{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pattern() -> Regex {
        Regex::new(crate::SCORE).unwrap()
    }

    #[test]
    fn parses_centipawns() {
        let line = "info depth 12 seldepth 15 multipv 1 score cp -25 nodes 1234 pv e7e5";
        assert_eq!(Score::parse(&pattern(), line), Some(Score::Centipawns(-25)));
    }

    #[test]
    fn parses_mate() {
        let line = "info depth 5 score mate 3 nodes 99 pv d8h4";
        assert_eq!(Score::parse(&pattern(), line), Some(Score::Mate(3)));
        let line = "info depth 5 score mate -2 pv a2a3";
        assert_eq!(Score::parse(&pattern(), line), Some(Score::Mate(-2)));
    }

    #[test]
    fn lines_without_score() {
        assert_eq!(Score::parse(&pattern(), "info string NNUE enabled"), None);
        assert_eq!(Score::parse(&pattern(), "bestmove e2e4"), None);
    }

    #[test]
    fn display() {
        assert_eq!(Score::Centipawns(31).to_string(), "+0.31");
        assert_eq!(Score::Centipawns(-150).to_string(), "-1.50");
        assert_eq!(Score::Mate(-2).to_string(), "#-2");
    }
}
