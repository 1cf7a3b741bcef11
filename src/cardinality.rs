use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// How many counterparts an element on one side of a mapping may have.
///
/// A [crate::mapping_type::MappingType] pairs two of these: one bounding the sources of each
/// target, and one bounding the targets of each source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, enum_iterator::Sequence,
)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Cardinality {
    /// Exactly one.
    One,
    /// Zero or one.
    AtMostOne,
    /// One or more.
    AtLeastOne,
    /// Zero or more.
    Any,
}

/// One of the two index domains related by a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Domain {
    Source,
    Target,
}

impl Cardinality {
    pub const fn from_flags(optional: bool, multiple: bool) -> Self {
        match (optional, multiple) {
            (false, false) => Cardinality::One,
            (true, false) => Cardinality::AtMostOne,
            (false, true) => Cardinality::AtLeastOne,
            (true, true) => Cardinality::Any,
        }
    }

    /// Whether an element may have no counterpart at all.
    pub const fn is_optional(&self) -> bool {
        matches!(self, Cardinality::AtMostOne | Cardinality::Any)
    }

    /// Whether an element may have more than one counterpart.
    pub const fn is_multiple(&self) -> bool {
        matches!(self, Cardinality::AtLeastOne | Cardinality::Any)
    }

    /// Returns `true` if an element with `count` counterparts satisfies this constraint.
    pub const fn admits(&self, count: usize) -> bool {
        match self {
            Cardinality::One => count == 1,
            Cardinality::AtMostOne => count <= 1,
            Cardinality::AtLeastOne => count >= 1,
            Cardinality::Any => true,
        }
    }

    /// Returns `true` if every count admitted by `self` is also admitted by `other`.
    pub const fn refines(&self, other: &Cardinality) -> bool {
        (!self.is_optional() || other.is_optional()) && (!self.is_multiple() || other.is_multiple())
    }

    /// The strictest [Cardinality] admitting every count in `counts`.
    pub fn tightest<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let (optional, multiple) = counts
            .into_iter()
            .fold((false, false), |(o, m), c| (o || c == 0, m || c > 1));
        Cardinality::from_flags(optional, multiple)
    }
}

impl Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cardinality::One => write!(f, "1"),
            Cardinality::AtMostOne => write!(f, "<=1"),
            Cardinality::AtLeastOne => write!(f, ">=1"),
            Cardinality::Any => write!(f, "any"),
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Domain::Source => write!(f, "source"),
            Domain::Target => write!(f, "target"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_admits_matches_table() {
        let expected = [
            (Cardinality::One, [false, true, false]),
            (Cardinality::AtMostOne, [true, true, false]),
            (Cardinality::AtLeastOne, [false, true, true]),
            (Cardinality::Any, [true, true, true]),
        ];
        for (cardinality, admitted) in expected {
            for (count, &should_admit) in admitted.iter().enumerate() {
                assert_eq!(
                    cardinality.admits(count),
                    should_admit,
                    "{cardinality} admitting {count}"
                );
            }
        }
    }

    #[test]
    fn test_tightest_of_no_counts_is_one() {
        assert_eq!(Cardinality::tightest([]), Cardinality::One);
    }

    #[test]
    fn test_tightest_picks_up_zero_and_many() {
        assert_eq!(Cardinality::tightest([1, 1, 1]), Cardinality::One);
        assert_eq!(Cardinality::tightest([1, 0]), Cardinality::AtMostOne);
        assert_eq!(Cardinality::tightest([3, 1]), Cardinality::AtLeastOne);
        assert_eq!(Cardinality::tightest([0, 2]), Cardinality::Any);
    }

    #[test]
    fn test_display() {
        let rendered = enum_iterator::all::<Cardinality>()
            .map(|c| c.to_string())
            .collect::<Vec<_>>();
        assert_eq!(rendered, ["1", "<=1", ">=1", "any"]);
    }

    proptest! {
        #[test]
        fn test_from_flags_agrees_with_flag_accessors(optional in any::<bool>(), multiple in any::<bool>()) {
            let c = Cardinality::from_flags(optional, multiple);
            prop_assert_eq!(c.is_optional(), optional);
            prop_assert_eq!(c.is_multiple(), multiple);
        }

        #[test]
        fn test_refines_means_admitted_counts_are_a_subset(
            a in any::<Cardinality>(), b in any::<Cardinality>(), count in 0usize..4
        ) {
            if a.refines(&b) && a.admits(count) {
                prop_assert!(b.admits(count));
            }
        }

        #[test]
        fn test_tightest_admits_all_counts(counts in proptest::collection::vec(0usize..4, 0..8)) {
            let c = Cardinality::tightest(counts.iter().copied());
            for &count in &counts {
                prop_assert!(c.admits(count));
            }
            for other in enum_iterator::all::<Cardinality>() {
                if counts.iter().all(|&n| other.admits(n)) {
                    prop_assert!(c.refines(&other));
                }
            }
        }
    }
}
