//! Ranking method selection.

use super::RankVoteCounter;
use super::baldwin::Baldwin;
use super::borda::Borda;
use super::instant_runoff::InstantRunoff;
use super::schulze::Schulze;
use super::wilson::Wilson;
use serde::{Deserialize, Serialize};

/// Named ranked-vote algorithms
///
/// - `Schulze`: Condorcet winner by widest beatpaths (default)
/// - `Baldwin`: repeatedly drop the lowest Borda score
/// - `Borda`: 10 - rank points per ballot
/// - `InstantRunoff`: repeatedly drop the fewest first preferences
/// - `Wilson`: Wilson lower bound of pairwise win share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RankingMethod {
    #[default]
    Schulze,
    Baldwin,
    Borda,
    InstantRunoff,
    Wilson,
}

impl RankingMethod {
    pub const ALL: [RankingMethod; 5] = [
        RankingMethod::Schulze,
        RankingMethod::Baldwin,
        RankingMethod::Borda,
        RankingMethod::InstantRunoff,
        RankingMethod::Wilson,
    ];

    /// Look a method up by name, falling back to the default.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMethod::Schulze => "schulze",
            RankingMethod::Baldwin => "baldwin",
            RankingMethod::Borda => "borda",
            RankingMethod::InstantRunoff => "instant_runoff",
            RankingMethod::Wilson => "wilson",
        }
    }

    /// The strategy implementing this method.
    pub fn counter(&self) -> Box<dyn RankVoteCounter> {
        match self {
            RankingMethod::Schulze => Box::new(Schulze),
            RankingMethod::Baldwin => Box::new(Baldwin),
            RankingMethod::Borda => Box::new(Borda),
            RankingMethod::InstantRunoff => Box::new(InstantRunoff),
            RankingMethod::Wilson => Box::new(Wilson),
        }
    }
}

impl std::fmt::Display for RankingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RankingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "schulze" => Ok(RankingMethod::Schulze),
            "baldwin" => Ok(RankingMethod::Baldwin),
            "borda" => Ok(RankingMethod::Borda),
            "instant_runoff" | "irv" | "rirv" => Ok(RankingMethod::InstantRunoff),
            "wilson" => Ok(RankingMethod::Wilson),
            _ => Err(format!(
                "Unknown ranking method: {}. Valid: schulze, baldwin, borda, instant_runoff, wilson",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::test_support::{condorcet_storage, order};

    #[test]
    fn test_unknown_name_falls_back_to_schulze() {
        assert_eq!(RankingMethod::from_name("coin-flip"), RankingMethod::Schulze);
        assert_eq!(RankingMethod::from_name(""), RankingMethod::Schulze);
    }

    #[test]
    fn test_parse_is_strict() {
        assert!("coin-flip".parse::<RankingMethod>().is_err());
        assert_eq!("IRV".parse::<RankingMethod>().unwrap(), RankingMethod::InstantRunoff);
        assert_eq!(
            "instant-runoff".parse::<RankingMethod>().unwrap(),
            RankingMethod::InstantRunoff
        );
    }

    #[test]
    fn test_counter_names_match() {
        for method in RankingMethod::ALL {
            assert_eq!(method.counter().name(), method.as_str());
            assert_eq!(RankingMethod::from_name(method.as_str()), method);
        }
    }

    #[test]
    fn test_every_method_finds_the_condorcet_winner() {
        let storage = condorcet_storage();
        let task_votes = storage.votes_for_task("");
        for method in RankingMethod::ALL {
            let ranked = method.counter().count_votes_for_task(&task_votes);
            assert_eq!(order(&ranked), ["Bravo", "Alpha", "Charlie"], "{method}");
        }
    }
}
