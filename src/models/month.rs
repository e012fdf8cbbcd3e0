use chrono::Datelike;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::January => "JANUARY",
            Self::February => "FEBRUARY",
            Self::March => "MARCH",
            Self::April => "APRIL",
            Self::May => "MAY",
            Self::June => "JUNE",
            Self::July => "JULY",
            Self::August => "AUGUST",
            Self::September => "SEPTEMBER",
            Self::October => "OCTOBER",
            Self::November => "NOVEMBER",
            Self::December => "DECEMBER",
        }
    }

    /// Accepts full names, three-letter abbreviations (any case) and `1`..`12`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u32>() {
            return Self::from_number(n);
        }
        let upper = s.to_uppercase();
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == upper || (upper.len() == 3 && m.as_str().starts_with(&upper)))
    }

    pub fn from_number(n: u32) -> Option<Self> {
        Self::all().get(n.checked_sub(1)? as usize).copied()
    }

    /// 1-based month number.
    pub fn number(&self) -> u32 {
        Self::all()
            .iter()
            .position(|m| m == self)
            .map_or(1, |i| i as u32 + 1)
    }

    pub fn current() -> (Self, i32) {
        let today = chrono::Local::now().date_naive();
        let month = Self::from_number(today.month()).unwrap_or(Self::January);
        (month, today.year())
    }

    pub fn all() -> &'static [Month] {
        &[
            Self::January,
            Self::February,
            Self::March,
            Self::April,
            Self::May,
            Self::June,
            Self::July,
            Self::August,
            Self::September,
            Self::October,
            Self::November,
            Self::December,
        ]
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
