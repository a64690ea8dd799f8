use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Continent {
    Africa,
    Asia,
    Europe,
    Oceania,
    NorthAmerica,
    SouthAmerica,
}

impl Continent {
    pub fn name(self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::Oceania => "Oceania",
            Continent::NorthAmerica => "North America",
            Continent::SouthAmerica => "South America",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Curated by hand, not exhaustive. Countries missing here get no continent.
const BUILTIN: &[(&str, Continent)] = &[
    ("Finland", Continent::Europe),
    ("Denmark", Continent::Europe),
    ("Switzerland", Continent::Europe),
    ("Iceland", Continent::Europe),
    ("Netherlands", Continent::Europe),
    ("Norway", Continent::Europe),
    ("Sweden", Continent::Europe),
    ("Luxembourg", Continent::Europe),
    ("Austria", Continent::Europe),
    ("Germany", Continent::Europe),
    ("Ireland", Continent::Europe),
    ("United Kingdom", Continent::Europe),
    ("Belgium", Continent::Europe),
    ("France", Continent::Europe),
    ("Spain", Continent::Europe),
    ("Italy", Continent::Europe),
    ("Poland", Continent::Europe),
    ("Portugal", Continent::Europe),
    ("Greece", Continent::Europe),
    ("Ukraine", Continent::Europe),
    ("New Zealand", Continent::Oceania),
    ("Australia", Continent::Oceania),
    ("Canada", Continent::NorthAmerica),
    ("United States", Continent::NorthAmerica),
    ("Mexico", Continent::NorthAmerica),
    ("Costa Rica", Continent::NorthAmerica),
    ("Guatemala", Continent::NorthAmerica),
    ("Jamaica", Continent::NorthAmerica),
    ("Haiti", Continent::NorthAmerica),
    ("Brazil", Continent::SouthAmerica),
    ("Argentina", Continent::SouthAmerica),
    ("Chile", Continent::SouthAmerica),
    ("Uruguay", Continent::SouthAmerica),
    ("Colombia", Continent::SouthAmerica),
    ("Peru", Continent::SouthAmerica),
    ("Ecuador", Continent::SouthAmerica),
    ("Bolivia", Continent::SouthAmerica),
    ("Paraguay", Continent::SouthAmerica),
    ("Venezuela", Continent::SouthAmerica),
    ("Israel", Continent::Asia),
    ("Japan", Continent::Asia),
    ("China", Continent::Asia),
    ("India", Continent::Asia),
    ("Indonesia", Continent::Asia),
    ("Philippines", Continent::Asia),
    ("Thailand", Continent::Asia),
    ("Vietnam", Continent::Asia),
    ("Singapore", Continent::Asia),
    ("South Korea", Continent::Asia),
    ("Saudi Arabia", Continent::Asia),
    ("United Arab Emirates", Continent::Asia),
    ("Pakistan", Continent::Asia),
    ("Bangladesh", Continent::Asia),
    ("Sri Lanka", Continent::Asia),
    ("Afghanistan", Continent::Asia),
    ("Nigeria", Continent::Africa),
    ("South Africa", Continent::Africa),
    ("Egypt", Continent::Africa),
    ("Kenya", Continent::Africa),
    ("Ghana", Continent::Africa),
    ("Morocco", Continent::Africa),
    ("Ethiopia", Continent::Africa),
    ("Uganda", Continent::Africa),
    ("Tanzania", Continent::Africa),
    ("Rwanda", Continent::Africa),
    ("Zimbabwe", Continent::Africa),
    ("Botswana", Continent::Africa),
    ("Lesotho", Continent::Africa),
    ("Malawi", Continent::Africa),
];

/// Immutable country name to continent lookup.
#[derive(Debug, Clone, Default)]
pub struct ContinentTable {
    entries: HashMap<String, Continent>,
}

impl ContinentTable {
    /// The hand-curated table shipped with the binary.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN.iter().map(|&(country, continent)| (country, continent)))
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Continent)>,
        S: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(country, continent)| (country.into(), continent))
                .collect(),
        }
    }

    pub fn lookup(&self, country: &str) -> Option<Continent> {
        self.entries.get(country.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
