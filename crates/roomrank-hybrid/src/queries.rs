//! The four canned room queries: a semantic phrasing plus keyword groups
//! over the captioner's structured fields.

use std::fmt;
use std::str::FromStr;

use roomrank_core::error::Error;
use roomrank_core::types::KeywordGroups;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamedQuery {
    DoubleSeaView,
    BalconyAcCityView,
    TripleWithDesk,
    CapacityFour,
}

impl NamedQuery {
    pub const ALL: [NamedQuery; 4] = [Self::DoubleSeaView, Self::BalconyAcCityView, Self::TripleWithDesk, Self::CapacityFour];

    pub fn label(self) -> &'static str {
        match self {
            Self::DoubleSeaView => "Query 1: Double rooms with sea view",
            Self::BalconyAcCityView => "Query 2: Balcony + AC + City view",
            Self::TripleWithDesk => "Query 3: Triple room with desk",
            Self::CapacityFour => "Query 4: Capacity of 4",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::DoubleSeaView => "double-sea-view",
            Self::BalconyAcCityView => "balcony-ac-city-view",
            Self::TripleWithDesk => "triple-desk",
            Self::CapacityFour => "capacity-4",
        }
    }

    pub fn semantic_query(self) -> &'static str {
        match self {
            Self::DoubleSeaView => "Double room with sea view",
            Self::BalconyAcCityView => "Room with balcony, air conditioning, and city view",
            Self::TripleWithDesk => "Triple room with a desk",
            Self::CapacityFour => "Room with a maximum capacity of 4 people",
        }
    }

    pub fn keyword_groups(self) -> KeywordGroups {
        match self {
            Self::DoubleSeaView => KeywordGroups::new([["max_guest_capacity: 2"], ["view: sea"]]),
            Self::BalconyAcCityView => KeywordGroups::new([["balcony"], ["view: city"], ["air conditioning"]]),
            Self::TripleWithDesk => KeywordGroups::new([["max_guest_capacity: 3"], ["desk"]]),
            Self::CapacityFour => KeywordGroups::new([["max_guest_capacity: 4"]]),
        }
    }
}

impl fmt::Display for NamedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the full label, `q1`..`q4`, `1`..`4` or the slug.
impl FromStr for NamedQuery {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .enumerate()
            .find(|(i, q)| {
                let n = (i + 1).to_string();
                wanted == q.label()
                    || wanted.eq_ignore_ascii_case(q.slug())
                    || wanted == n
                    || wanted.eq_ignore_ascii_case(&format!("q{n}"))
            })
            .map(|(_, q)| q)
            .ok_or_else(|| Error::UnknownQuery(s.to_string()))
    }
}
