use std::fmt;
use std::str::FromStr;

use crate::domain::flow::StepKind;
use crate::domain::session::SessionError;

/// Step names a caller may submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepName {
    SelectTopic,
    SelectSpread,
    DrawCards,
    GetInterpretation,
    GetAdvice,
}

impl StepName {
    pub const ALL: [StepName; 5] = [
        StepName::SelectTopic,
        StepName::SelectSpread,
        StepName::DrawCards,
        StepName::GetInterpretation,
        StepName::GetAdvice,
    ];

    /// The step unit this name runs.
    pub fn target(&self) -> StepKind {
        match self {
            StepName::SelectTopic => StepKind::ProcessTopic,
            StepName::SelectSpread => StepKind::ProcessSpread,
            StepName::DrawCards => StepKind::CardDrawing,
            StepName::GetInterpretation => StepKind::Interpretation,
            StepName::GetAdvice => StepKind::Advice,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepName::SelectTopic => "select_topic",
            StepName::SelectSpread => "select_spread",
            StepName::DrawCards => "draw_cards",
            StepName::GetInterpretation => "get_interpretation",
            StepName::GetAdvice => "get_advice",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepName {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| SessionError::unknown_step(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_name() {
        for name in StepName::ALL {
            assert_eq!(name.as_str().parse::<StepName>().unwrap(), name);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            "shuffle".parse::<StepName>().unwrap_err(),
            SessionError::unknown_step("shuffle")
        );
    }

    #[test]
    fn selections_target_the_processing_steps() {
        assert_eq!(StepName::SelectTopic.target(), StepKind::ProcessTopic);
        assert_eq!(StepName::GetAdvice.target(), StepKind::Advice);
    }
}
