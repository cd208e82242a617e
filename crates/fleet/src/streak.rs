//! Consecutive on-time submission streak messaging.

/// Encouragement tier for a streak length in weeks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum StreakTier {
    Nice,
    GreatConsistency,
    AwesomeWork,
    UnrealConsistency,
}

impl StreakTier {
    /// No tier below two weeks.
    pub fn for_weeks(weeks: u32) -> Option<Self> {
        match weeks {
            0 | 1 => None,
            2 => Some(Self::Nice),
            3 => Some(Self::GreatConsistency),
            4..=7 => Some(Self::AwesomeWork),
            _ => Some(Self::UnrealConsistency),
        }
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            Self::Nice => "Nice!",
            Self::GreatConsistency => "Great consistency!",
            Self::AwesomeWork => "Awesome work!",
            Self::UnrealConsistency => "Unreal consistency!",
        }
    }
}

pub fn streak_message(weeks: u32) -> Option<String> {
    StreakTier::for_weeks(weeks)
        .map(|tier| format!("{weeks} weeks in a row on time. {}", tier.phrase()))
}
