use crate::bimap::{BiMap, SwapBimap};
use crate::cardinality::Cardinality;

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Describes the type of a mapping between a source and a target domain, from the most
/// general [MappingType::MultiFunction] (every element of either domain may take part in
/// any number of pairs) to the most restricted [MappingType::Bijection] (every element of
/// either domain is paired with exactly one element of the other).
///
/// Each variant is a pair of [Cardinality] constraints:
/// - the *source cardinality* bounds how many sources a given target may have, and
/// - the *target cardinality* bounds how many targets a given source may have.
///
/// Some common types:
/// - A *function* has exactly one target for every source.
/// - A *partial function* has at most one target for every source.
/// - A *surjection* is a function where every target has at least one source; also known
///   as an "onto" mapping.
/// - An *injection* is a function where no target has more than one source; somewhat
///   confusingly, also known as a "one-to-one" mapping.
/// - A *bijection* is both a surjection and an injection.
///
/// The discriminant of each variant is its ordinal. Bit 0 is set when a target may have no
/// source, bit 1 when a target may have several sources, bit 2 when a source may have no
/// target, and bit 3 when a source may have several targets. Combinations 10, 11, and 14
/// have no conventional name and are called [MappingType::Ten], [MappingType::Eleven], and
/// [MappingType::Fourteen]. Code consuming a [MappingType] should branch on the predicates
/// (e.g., [MappingType::is_partial_function]) rather than on those names.
///
/// Note that the names of the function variants are the traditional ones, while the
/// predicates are defined on the flags. [MappingType::Surjection] allows a target without a
/// source, so it is not [MappingType::is_surjection]; likewise [MappingType::Injection]
/// allows a target with several sources and is not [MappingType::is_injection].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    enum_iterator::Sequence,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum MappingType {
    /// 1 source per target, 1 target per source.
    Bijection = 0,
    /// `<=1` source per target, 1 target per source.
    Surjection = 1,
    /// `>=1` source per target, 1 target per source.
    Injection = 2,
    /// Any number of sources per target, 1 target per source.
    Function = 3,
    /// A source for every target, and no source has more than one target.
    InverseSurjection = 4,
    /// No more than one source for any target, and no more than one target for any source.
    PartialSurjection = 5,
    PartialInjection = 6,
    PartialFunction = 7,
    InverseInjection = 8,
    InversePartialInjection = 9,
    /// `>=1` source per target, `>=1` target per source.
    Ten = 10,
    /// Any number of sources per target, `>=1` target per source.
    Eleven = 11,
    /// An inverse function has a source for every target, but a source may have any number
    /// of targets. [MappingType::InverseSurjection] is stronger (a source may not have
    /// multiple targets) and [MappingType::InversePartialFunction] is weaker (a target may
    /// have no source).
    InverseFunction = 12,
    InversePartialFunction = 13,
    /// `>=1` source per target, any number of targets per source.
    Fourteen = 14,
    MultiFunction = 15,
}

/// Converts between a [MappingType] and its (source, target) [Cardinality] pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingTypeBimap;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingTypeError {
    #[error("{0} is not a mapping type ordinal (expected 0 through 15)")]
    InvalidOrdinal(u8),
    #[error("Unknown mapping type: {0:?}")]
    UnknownName(String),
}

impl MappingType {
    /// Iterates over all 16 mapping types in ordinal order.
    pub fn all() -> impl Iterator<Item = MappingType> {
        enum_iterator::all::<MappingType>()
    }

    pub fn from_cardinalities(source: Cardinality, target: Cardinality) -> Self {
        MappingTypeBimap.apply_inverse(&(source, target))
    }

    /// Bounds the number of sources each target may have.
    pub fn source_cardinality(&self) -> Cardinality {
        MappingTypeBimap.apply(self).0
    }

    /// Bounds the number of targets each source may have.
    pub fn target_cardinality(&self) -> Cardinality {
        MappingTypeBimap.apply(self).1
    }

    /// The identifying integer of this type: the OR of its constraint flags.
    pub const fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// The type of the mapping obtained by exchanging the roles of source and target.
    pub fn inverse(&self) -> MappingType {
        let sides = MappingTypeBimap.apply(self);
        MappingTypeBimap.apply_inverse(&SwapBimap::<Cardinality>::new().apply(&sides))
    }

    /// A mapping is a (total) function if every source has precisely one target.
    pub fn is_function(&self) -> bool {
        self.target_cardinality() == Cardinality::One
    }

    /// A mapping is a partial function if every source has at most one target.
    pub fn is_partial_function(&self) -> bool {
        !self.is_multiple_target()
    }

    /// A mapping is a surjection if it is a function and every target has at least one
    /// source.
    pub fn is_surjection(&self) -> bool {
        self.is_function() && !self.is_optional_source()
    }

    /// A mapping is an injection if it is a function and no target has more than one
    /// source.
    pub fn is_injection(&self) -> bool {
        self.is_function() && !self.is_multiple_source()
    }

    /// A mapping is a bijection if it is both a surjection and an injection.
    pub fn is_bijection(&self) -> bool {
        self.is_function() && self.source_cardinality() == Cardinality::One
    }

    pub fn is_optional_target(&self) -> bool {
        self.target_cardinality().is_optional()
    }

    pub fn is_multiple_target(&self) -> bool {
        self.target_cardinality().is_multiple()
    }

    pub fn is_optional_source(&self) -> bool {
        self.source_cardinality().is_optional()
    }

    pub fn is_multiple_source(&self) -> bool {
        self.source_cardinality().is_multiple()
    }

    /// Returns `true` if every correspondence admitted by `self` is admitted by `other`.
    ///
    /// This is a partial order with [MappingType::Bijection] at the bottom and
    /// [MappingType::MultiFunction] at the top.
    pub fn refines(&self, other: &MappingType) -> bool {
        self.source_cardinality()
            .refines(&other.source_cardinality())
            && self
                .target_cardinality()
                .refines(&other.target_cardinality())
    }
}

impl BiMap for MappingTypeBimap {
    type Domain = MappingType;
    type Codomain = (Cardinality, Cardinality);

    fn apply(&self, t: &MappingType) -> (Cardinality, Cardinality) {
        use Cardinality::*;
        match t {
            MappingType::Bijection => (One, One),
            MappingType::Surjection => (AtMostOne, One),
            MappingType::Injection => (AtLeastOne, One),
            MappingType::Function => (Any, One),
            MappingType::InverseSurjection => (One, AtMostOne),
            MappingType::PartialSurjection => (AtMostOne, AtMostOne),
            MappingType::PartialInjection => (AtLeastOne, AtMostOne),
            MappingType::PartialFunction => (Any, AtMostOne),
            MappingType::InverseInjection => (One, AtLeastOne),
            MappingType::InversePartialInjection => (AtMostOne, AtLeastOne),
            MappingType::Ten => (AtLeastOne, AtLeastOne),
            MappingType::Eleven => (Any, AtLeastOne),
            MappingType::InverseFunction => (One, Any),
            MappingType::InversePartialFunction => (AtMostOne, Any),
            MappingType::Fourteen => (AtLeastOne, Any),
            MappingType::MultiFunction => (Any, Any),
        }
    }

    fn apply_inverse(&self, i: &(Cardinality, Cardinality)) -> MappingType {
        use Cardinality::*;
        match i {
            (One, One) => MappingType::Bijection,
            (AtMostOne, One) => MappingType::Surjection,
            (AtLeastOne, One) => MappingType::Injection,
            (Any, One) => MappingType::Function,
            (One, AtMostOne) => MappingType::InverseSurjection,
            (AtMostOne, AtMostOne) => MappingType::PartialSurjection,
            (AtLeastOne, AtMostOne) => MappingType::PartialInjection,
            (Any, AtMostOne) => MappingType::PartialFunction,
            (One, AtLeastOne) => MappingType::InverseInjection,
            (AtMostOne, AtLeastOne) => MappingType::InversePartialInjection,
            (AtLeastOne, AtLeastOne) => MappingType::Ten,
            (Any, AtLeastOne) => MappingType::Eleven,
            (One, Any) => MappingType::InverseFunction,
            (AtMostOne, Any) => MappingType::InversePartialFunction,
            (AtLeastOne, Any) => MappingType::Fourteen,
            (Any, Any) => MappingType::MultiFunction,
        }
    }
}

impl TryFrom<u8> for MappingType {
    type Error = MappingTypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        MappingType::all()
            .find(|t| t.ordinal() == value)
            .ok_or(MappingTypeError::InvalidOrdinal(value))
    }
}

impl From<MappingType> for u8 {
    fn from(t: MappingType) -> Self {
        t.ordinal()
    }
}

impl Display for MappingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{name}")
    }
}

/// Parses a [MappingType] from either its name (ignoring ASCII case) or its ordinal.
pub fn parse_mapping_type(s: &str) -> Result<MappingType, MappingTypeError> {
    let s = s.trim();
    if let Ok(ordinal) = s.parse::<u8>() {
        return MappingType::try_from(ordinal);
    }
    MappingType::from_str(s).map_err(|_| MappingTypeError::UnknownName(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cardinality::Cardinality::*;
    use itertools::Itertools;
    use proptest::prelude::*;

    const OPTIONAL_SOURCE: u8 = 1;
    const MULTIPLE_SOURCE: u8 = 2;
    const OPTIONAL_TARGET: u8 = 4;
    const MULTIPLE_TARGET: u8 = 8;

    #[test]
    fn test_there_are_exactly_sixteen_distinct_types() {
        assert_eq!(enum_iterator::cardinality::<MappingType>(), 16);
        let ordinals = MappingType::all().map(|t| t.ordinal()).collect::<Vec<_>>();
        assert_eq!(ordinals, (0..16).collect::<Vec<u8>>());
        assert_eq!(MappingType::all().unique().count(), 16);
    }

    #[test]
    fn test_cardinalities_match_table() {
        let expected = [
            (MappingType::Bijection, One, One),
            (MappingType::Surjection, AtMostOne, One),
            (MappingType::Injection, AtLeastOne, One),
            (MappingType::Function, Any, One),
            (MappingType::InverseSurjection, One, AtMostOne),
            (MappingType::PartialSurjection, AtMostOne, AtMostOne),
            (MappingType::PartialInjection, AtLeastOne, AtMostOne),
            (MappingType::PartialFunction, Any, AtMostOne),
            (MappingType::InverseInjection, One, AtLeastOne),
            (MappingType::InversePartialInjection, AtMostOne, AtLeastOne),
            (MappingType::Ten, AtLeastOne, AtLeastOne),
            (MappingType::Eleven, Any, AtLeastOne),
            (MappingType::InverseFunction, One, Any),
            (MappingType::InversePartialFunction, AtMostOne, Any),
            (MappingType::Fourteen, AtLeastOne, Any),
            (MappingType::MultiFunction, Any, Any),
        ];
        for (ordinal, (t, source, target)) in expected.into_iter().enumerate() {
            assert_eq!(usize::from(t.ordinal()), ordinal);
            assert_eq!(t.source_cardinality(), source, "source of {t}");
            assert_eq!(t.target_cardinality(), target, "target of {t}");
            assert_eq!(MappingType::from_cardinalities(source, target), t);
        }
    }

    #[test]
    fn test_ordinal_is_or_of_flags() {
        for t in MappingType::all() {
            let mut flags = 0;
            if t.is_optional_source() {
                flags |= OPTIONAL_SOURCE;
            }
            if t.is_multiple_source() {
                flags |= MULTIPLE_SOURCE;
            }
            if t.is_optional_target() {
                flags |= OPTIONAL_TARGET;
            }
            if t.is_multiple_target() {
                flags |= MULTIPLE_TARGET;
            }
            assert_eq!(t.ordinal(), flags, "{t}");
        }
    }

    #[test]
    fn test_inverse_swaps_flag_pairs() {
        for t in MappingType::all() {
            let o = t.ordinal();
            let swapped = ((o & 3) << 2) | ((o & 12) >> 2);
            assert_eq!(t.inverse().ordinal(), swapped, "{t}");
        }
    }

    #[test]
    fn test_named_inverses() {
        let pairs = [
            (MappingType::Surjection, MappingType::InverseSurjection),
            (MappingType::Injection, MappingType::InverseInjection),
            (MappingType::Function, MappingType::InverseFunction),
            (MappingType::PartialInjection, MappingType::InversePartialInjection),
            (MappingType::PartialFunction, MappingType::InversePartialFunction),
            (MappingType::Eleven, MappingType::Fourteen),
        ];
        for (a, b) in pairs {
            assert_eq!(a.inverse(), b);
            assert_eq!(b.inverse(), a);
        }
    }

    #[test]
    fn test_self_inverse_types() {
        let self_inverse = MappingType::all()
            .filter(|t| t.inverse() == *t)
            .collect::<Vec<_>>();
        assert_eq!(
            self_inverse,
            [
                MappingType::Bijection,
                MappingType::PartialSurjection,
                MappingType::Ten,
                MappingType::MultiFunction
            ]
        );
    }

    #[test]
    fn test_bijection_is_only_type_without_flags() {
        let flagless = MappingType::all()
            .filter(|t| {
                !t.is_optional_target()
                    && !t.is_multiple_target()
                    && !t.is_optional_source()
                    && !t.is_multiple_source()
            })
            .collect::<Vec<_>>();
        assert_eq!(flagless, [MappingType::Bijection]);
    }

    #[test]
    fn test_multifunction_is_only_type_with_all_flags() {
        let flagful = MappingType::all()
            .filter(|t| {
                t.is_optional_target()
                    && t.is_multiple_target()
                    && t.is_optional_source()
                    && t.is_multiple_source()
            })
            .collect::<Vec<_>>();
        assert_eq!(flagful, [MappingType::MultiFunction]);
    }

    #[test]
    fn test_function_predicates_by_ordinal() {
        let functions = MappingType::all()
            .filter(MappingType::is_function)
            .map(|t| t.ordinal())
            .collect::<Vec<_>>();
        assert_eq!(functions, [0, 1, 2, 3]);
        let partial = MappingType::all()
            .filter(MappingType::is_partial_function)
            .map(|t| t.ordinal())
            .collect::<Vec<_>>();
        assert_eq!(partial, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_surjection_and_injection_predicates_follow_flags() {
        let surjections = MappingType::all()
            .filter(MappingType::is_surjection)
            .collect::<Vec<_>>();
        assert_eq!(surjections, [MappingType::Bijection, MappingType::Injection]);
        let injections = MappingType::all()
            .filter(MappingType::is_injection)
            .collect::<Vec<_>>();
        assert_eq!(injections, [MappingType::Bijection, MappingType::Surjection]);
    }

    #[test]
    fn test_try_from_rejects_large_ordinals() {
        for value in 16..=u8::MAX {
            assert_eq!(
                MappingType::try_from(value),
                Err(MappingTypeError::InvalidOrdinal(value))
            );
        }
    }

    #[test]
    fn test_parse_mapping_type() {
        assert_eq!(parse_mapping_type("Bijection"), Ok(MappingType::Bijection));
        assert_eq!(
            parse_mapping_type("inversepartialfunction"),
            Ok(MappingType::InversePartialFunction)
        );
        assert_eq!(parse_mapping_type(" 14 "), Ok(MappingType::Fourteen));
        assert_eq!(parse_mapping_type("ten"), Ok(MappingType::Ten));
        assert_eq!(
            parse_mapping_type("16"),
            Err(MappingTypeError::InvalidOrdinal(16))
        );
        assert_eq!(
            parse_mapping_type("Homomorphism"),
            Err(MappingTypeError::UnknownName("Homomorphism".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for t in MappingType::all() {
            assert_eq!(parse_mapping_type(&t.to_string()), Ok(t));
        }
    }

    #[test]
    fn test_bincode_encodes_one_small_tag() {
        let encoded = bincode::serialize(&MappingType::Eleven).unwrap();
        let decoded: MappingType = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded, MappingType::Eleven);
        assert!(encoded.len() <= 4);
    }

    #[test]
    fn test_refines_bounds() {
        for t in MappingType::all() {
            assert!(MappingType::Bijection.refines(&t));
            assert!(t.refines(&MappingType::MultiFunction));
        }
        assert!(MappingType::Function.refines(&MappingType::PartialFunction));
        assert!(!MappingType::PartialFunction.refines(&MappingType::Function));
        assert!(!MappingType::Surjection.refines(&MappingType::Injection));
    }

    proptest! {
        #[test]
        fn test_inverse_is_an_involution(t in any::<MappingType>()) {
            prop_assert_eq!(t.inverse().inverse(), t);
        }

        #[test]
        fn test_inverse_swaps_cardinalities(t in any::<MappingType>()) {
            prop_assert_eq!(t.inverse().source_cardinality(), t.target_cardinality());
            prop_assert_eq!(t.inverse().target_cardinality(), t.source_cardinality());
        }

        #[test]
        fn test_bijection_iff_surjection_and_injection(t in any::<MappingType>()) {
            prop_assert_eq!(t.is_bijection(), t.is_surjection() && t.is_injection());
        }

        #[test]
        fn test_predicate_implications(t in any::<MappingType>()) {
            if t.is_surjection() {
                prop_assert!(t.is_function());
            }
            if t.is_injection() {
                prop_assert!(t.is_function());
            }
            if t.is_function() {
                prop_assert!(t.is_partial_function());
            }
        }

        #[test]
        fn test_ordinal_round_trips(t in any::<MappingType>()) {
            prop_assert_eq!(MappingType::try_from(t.ordinal()), Ok(t));
            prop_assert_eq!(MappingType::try_from(u8::from(t)), Ok(t));
        }

        #[test]
        fn test_refines_is_a_partial_order(
            a in any::<MappingType>(), b in any::<MappingType>(), c in any::<MappingType>()
        ) {
            prop_assert!(a.refines(&a));
            if a.refines(&b) && b.refines(&a) {
                prop_assert_eq!(a, b);
            }
            if a.refines(&b) && b.refines(&c) {
                prop_assert!(a.refines(&c));
            }
        }

        #[test]
        fn test_inverse_is_monotone(a in any::<MappingType>(), b in any::<MappingType>()) {
            prop_assert_eq!(a.refines(&b), a.inverse().refines(&b.inverse()));
        }
    }
}
