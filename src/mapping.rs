use crate::cardinality::{Cardinality, Domain};
use crate::mapping_type::MappingType;

use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt::Display;
use std::iter;

type Adjacent = SmallVec<[usize; 4]>;

/// The backing store a [Mapping] uses, selected from its [MappingType].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Representation {
    /// A pair of mutually inverse arrays. Every source has one target and vice versa.
    Permutation,
    /// One optional target per source.
    FunctionArray,
    /// One optional source per target.
    InverseFunctionArray,
    /// Lists of targets per source and of sources per target.
    Adjacency,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Source {index} is out of range for a source domain of size {count}")]
    SourceOutOfRange { index: usize, count: usize },
    #[error("Target {index} is out of range for a target domain of size {count}")]
    TargetOutOfRange { index: usize, count: usize },
    #[error("A bijection needs domains of equal size, got {source_count} sources and {target_count} targets")]
    UnequalDomains {
        source_count: usize,
        target_count: usize,
    },
    #[error("A {0} mapping may have more than one target per source")]
    MultipleTargets(MappingType),
    #[error("A {0} mapping may have more than one source per target")]
    MultipleSources(MappingType),
    #[error("{domain} {index} has {count} counterparts, but {mapping_type} requires {cardinality}")]
    ConstraintViolation {
        mapping_type: MappingType,
        domain: Domain,
        index: usize,
        count: usize,
        cardinality: Cardinality,
    },
    #[error("Pairs form a {observed} mapping, which is not a {mapping_type}")]
    Unrepresentable {
        mapping_type: MappingType,
        observed: MappingType,
    },
}

/// A correspondence between `0..source_count` and `0..target_count`, stored in the
/// [Representation] best suited to its [MappingType].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    mapping_type: MappingType,
    source_count: usize,
    target_count: usize,
    store: Store,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Store {
    Permutation {
        targets: Vec<usize>,
        sources: Vec<usize>,
    },
    FunctionArray(Vec<Option<usize>>),
    InverseFunctionArray(Vec<Option<usize>>),
    Adjacency {
        targets: Vec<Adjacent>,
        sources: Vec<Adjacent>,
    },
}

impl Representation {
    /// Chooses the most compact [Representation] able to hold any mapping of type
    /// `mapping_type`.
    pub fn for_type(mapping_type: MappingType) -> Self {
        if mapping_type.is_bijection() {
            Representation::Permutation
        } else if mapping_type.is_partial_function() {
            Representation::FunctionArray
        } else if !mapping_type.is_multiple_source() {
            Representation::InverseFunctionArray
        } else {
            Representation::Adjacency
        }
    }

    /// Returns `true` if this representation can store every mapping of type `mapping_type`.
    pub fn holds(&self, mapping_type: MappingType) -> bool {
        match self {
            Representation::Permutation => mapping_type.is_bijection(),
            Representation::FunctionArray => mapping_type.is_partial_function(),
            Representation::InverseFunctionArray => !mapping_type.is_multiple_source(),
            Representation::Adjacency => true,
        }
    }

    /// The representation of the inverse of a mapping stored in this one.
    pub fn inverse(&self) -> Self {
        match self {
            Representation::Permutation => Representation::Permutation,
            Representation::FunctionArray => Representation::InverseFunctionArray,
            Representation::InverseFunctionArray => Representation::FunctionArray,
            Representation::Adjacency => Representation::Adjacency,
        }
    }
}

impl Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Representation::Permutation => write!(f, "permutation"),
            Representation::FunctionArray => write!(f, "function array"),
            Representation::InverseFunctionArray => write!(f, "inverse function array"),
            Representation::Adjacency => write!(f, "adjacency"),
        }
    }
}

impl Mapping {
    /// Creates a mapping of the given type over `0..source_count` and `0..target_count`.
    ///
    /// A [Representation::Permutation] starts as the identity; every other representation
    /// starts with no pairs.
    pub fn create(
        mapping_type: MappingType,
        source_count: usize,
        target_count: usize,
    ) -> Result<Self, MappingError> {
        let representation = Representation::for_type(mapping_type);
        debug!(
            "Creating {mapping_type} mapping from {source_count} sources to {target_count} \
            targets backed by {representation}"
        );
        if representation == Representation::Permutation && source_count != target_count {
            return Err(MappingError::UnequalDomains {
                source_count,
                target_count,
            });
        }
        Ok(Mapping {
            mapping_type,
            source_count,
            target_count,
            store: Store::empty(representation, source_count, target_count),
        })
    }

    /// Creates a mapping of the given type holding exactly `pairs`.
    ///
    /// Fails if `pairs` is out of range or is not admitted by `mapping_type`.
    pub fn from_pairs<I>(
        mapping_type: MappingType,
        source_count: usize,
        target_count: usize,
        pairs: I,
    ) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let pairs = pairs.into_iter().collect::<Vec<_>>();
        let observed = classify(source_count, target_count, pairs.iter().copied())?;
        if !observed.refines(&mapping_type) {
            return Err(MappingError::Unrepresentable {
                mapping_type,
                observed,
            });
        }
        let mut mapping = Mapping::create(mapping_type, source_count, target_count)?;
        for (source, target) in pairs {
            mapping.set(source, target)?;
        }
        Ok(mapping)
    }

    pub fn mapping_type(&self) -> MappingType {
        self.mapping_type
    }

    pub fn source_count(&self) -> usize {
        self.source_count
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn representation(&self) -> Representation {
        match &self.store {
            Store::Permutation { .. } => Representation::Permutation,
            Store::FunctionArray(_) => Representation::FunctionArray,
            Store::InverseFunctionArray(_) => Representation::InverseFunctionArray,
            Store::Adjacency { .. } => Representation::Adjacency,
        }
    }

    /// Pairs `source` with `target`.
    ///
    /// When the [MappingType] allows at most one counterpart for an element, the new pair
    /// replaces the previous one, so a mapping never holds more counterparts per element
    /// than its type allows. It may still hold fewer; see [Mapping::validate]. A
    /// permutation also moves the displaced source to the displaced target, so it remains
    /// a bijection.
    pub fn set(&mut self, source: usize, target: usize) -> Result<(), MappingError> {
        self.check_source(source)?;
        self.check_target(target)?;
        self.store.insert(self.mapping_type, source, target);
        Ok(())
    }

    /// The target of `source`, if it has one.
    ///
    /// Only defined for partial functions; other types may have several targets. Since
    /// [Mapping::set] replaces rather than adds a second target, there is never more than
    /// one to return.
    pub fn target(&self, source: usize) -> Result<Option<usize>, MappingError> {
        if !self.mapping_type.is_partial_function() {
            return Err(MappingError::MultipleTargets(self.mapping_type));
        }
        self.check_source(source)?;
        Ok(self.targets(source)?.next())
    }

    /// The source of `target`, if it has one.
    ///
    /// Only defined when no target may have more than one source. As with
    /// [Mapping::target], [Mapping::set] keeps at most one.
    pub fn source(&self, target: usize) -> Result<Option<usize>, MappingError> {
        if self.mapping_type.is_multiple_source() {
            return Err(MappingError::MultipleSources(self.mapping_type));
        }
        self.check_target(target)?;
        Ok(self.sources(target)?.next())
    }

    /// Iterates over the targets of `source` in ascending order.
    pub fn targets(
        &self,
        source: usize,
    ) -> Result<Box<dyn Iterator<Item = usize> + '_>, MappingError> {
        self.check_source(source)?;
        let targets: Box<dyn Iterator<Item = usize> + '_> = match &self.store {
            Store::Permutation { targets, .. } => Box::new(iter::once(targets[source])),
            Store::FunctionArray(targets) => Box::new(targets[source].into_iter()),
            Store::InverseFunctionArray(sources) => Box::new(
                sources
                    .iter()
                    .positions(move |s| *s == Some(source)),
            ),
            Store::Adjacency { targets, .. } => Box::new(targets[source].iter().copied()),
        };
        Ok(targets)
    }

    /// Iterates over the sources of `target` in ascending order.
    pub fn sources(
        &self,
        target: usize,
    ) -> Result<Box<dyn Iterator<Item = usize> + '_>, MappingError> {
        self.check_target(target)?;
        let sources: Box<dyn Iterator<Item = usize> + '_> = match &self.store {
            Store::Permutation { sources, .. } => Box::new(iter::once(sources[target])),
            Store::FunctionArray(targets) => Box::new(
                targets
                    .iter()
                    .positions(move |t| *t == Some(target)),
            ),
            Store::InverseFunctionArray(sources) => Box::new(sources[target].into_iter()),
            Store::Adjacency { sources, .. } => Box::new(sources[target].iter().copied()),
        };
        Ok(sources)
    }

    /// All (source, target) pairs, sorted.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        match &self.store {
            Store::Permutation { targets, .. } => targets.iter().copied().enumerate().collect(),
            Store::FunctionArray(targets) => targets
                .iter()
                .enumerate()
                .filter_map(|(s, t)| t.map(|t| (s, t)))
                .collect(),
            Store::InverseFunctionArray(sources) => sources
                .iter()
                .enumerate()
                .filter_map(|(t, s)| s.map(|s| (s, t)))
                .sorted()
                .collect(),
            Store::Adjacency { targets, .. } => targets
                .iter()
                .enumerate()
                .flat_map(|(s, ts)| ts.iter().map(move |&t| (s, t)))
                .collect(),
        }
    }

    /// The number of pairs.
    pub fn len(&self) -> usize {
        match &self.store {
            Store::Permutation { targets, .. } => targets.len(),
            Store::FunctionArray(entries) | Store::InverseFunctionArray(entries) => {
                entries.iter().flatten().count()
            }
            Store::Adjacency { targets, .. } => targets.iter().map(|ts| ts.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the mapping with the roles of source and target exchanged.
    ///
    /// The result is stored in the [Representation] chosen for the inverted type, so it
    /// equals the mapping [Mapping::from_pairs] builds from the transposed pairs.
    pub fn inverse(&self) -> Mapping {
        let mapping_type = self.mapping_type.inverse();
        let mut store = Store::empty(
            Representation::for_type(mapping_type),
            self.target_count,
            self.source_count,
        );
        for (source, target) in self.pairs() {
            store.insert(mapping_type, target, source);
        }
        let inverted = Mapping {
            mapping_type,
            source_count: self.target_count,
            target_count: self.source_count,
            store,
        };
        debug!(
            "Inverted {} mapping into {} mapping backed by {}",
            self.mapping_type,
            inverted.mapping_type,
            inverted.representation()
        );
        inverted
    }

    /// Checks that every element of both domains has a number of counterparts admitted by
    /// this mapping's [MappingType].
    pub fn validate(&self) -> Result<(), MappingError> {
        trace!(
            "Validating {} mapping with {} pairs",
            self.mapping_type,
            self.len()
        );
        let (source_counts, target_counts) = self.counterpart_counts();
        let checks = [
            (
                Domain::Source,
                self.mapping_type.target_cardinality(),
                source_counts,
            ),
            (
                Domain::Target,
                self.mapping_type.source_cardinality(),
                target_counts,
            ),
        ];
        for (domain, cardinality, counts) in checks {
            if let Some((index, &count)) = counts
                .iter()
                .enumerate()
                .find(|(_, c)| !cardinality.admits(**c))
            {
                return Err(MappingError::ConstraintViolation {
                    mapping_type: self.mapping_type,
                    domain,
                    index,
                    count,
                    cardinality,
                });
            }
        }
        Ok(())
    }

    /// The number of targets of each source and the number of sources of each target.
    fn counterpart_counts(&self) -> (Vec<usize>, Vec<usize>) {
        let mut source_counts = vec![0; self.source_count];
        let mut target_counts = vec![0; self.target_count];
        for (s, t) in self.pairs() {
            source_counts[s] += 1;
            target_counts[t] += 1;
        }
        (source_counts, target_counts)
    }

    fn check_source(&self, source: usize) -> Result<(), MappingError> {
        if source >= self.source_count {
            return Err(MappingError::SourceOutOfRange {
                index: source,
                count: self.source_count,
            });
        }
        Ok(())
    }

    fn check_target(&self, target: usize) -> Result<(), MappingError> {
        if target >= self.target_count {
            return Err(MappingError::TargetOutOfRange {
                index: target,
                count: self.target_count,
            });
        }
        Ok(())
    }
}

impl Store {
    /// An identity permutation, or a store with no pairs.
    fn empty(representation: Representation, source_count: usize, target_count: usize) -> Self {
        match representation {
            Representation::Permutation => Store::Permutation {
                targets: (0..source_count).collect(),
                sources: (0..target_count).collect(),
            },
            Representation::FunctionArray => Store::FunctionArray(vec![None; source_count]),
            Representation::InverseFunctionArray => {
                Store::InverseFunctionArray(vec![None; target_count])
            }
            Representation::Adjacency => Store::Adjacency {
                targets: vec![Adjacent::new(); source_count],
                sources: vec![Adjacent::new(); target_count],
            },
        }
    }

    /// Adds a pair. Indices must be in range.
    fn insert(&mut self, mapping_type: MappingType, source: usize, target: usize) {
        match self {
            Store::Permutation { targets, sources } => {
                let old_target = targets[source];
                let old_source = sources[target];
                if old_target != target {
                    trace!(
                        "Setting {source} -> {target} in a permutation also moves {old_source} \
                        -> {old_target}"
                    );
                }
                targets[source] = target;
                sources[target] = source;
                targets[old_source] = old_target;
                sources[old_target] = old_source;
            }
            Store::FunctionArray(targets) => {
                if !mapping_type.is_multiple_source() {
                    for previous in targets.iter_mut().filter(|t| **t == Some(target)) {
                        *previous = None;
                    }
                }
                targets[source] = Some(target);
            }
            Store::InverseFunctionArray(sources) => sources[target] = Some(source),
            Store::Adjacency { targets, sources } => {
                if let Err(pos) = targets[source].binary_search(&target) {
                    targets[source].insert(pos, target);
                }
                if let Err(pos) = sources[target].binary_search(&source) {
                    sources[target].insert(pos, source);
                }
            }
        }
    }
}

/// Returns the strictest [MappingType] admitting the correspondence given by `pairs` between
/// `0..source_count` and `0..target_count`. Repeated pairs count once.
pub fn classify<I>(
    source_count: usize,
    target_count: usize,
    pairs: I,
) -> Result<MappingType, MappingError>
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let mut source_counts = vec![0; source_count];
    let mut target_counts = vec![0; target_count];
    for (s, t) in pairs.into_iter().sorted_unstable().dedup() {
        if s >= source_count {
            return Err(MappingError::SourceOutOfRange {
                index: s,
                count: source_count,
            });
        }
        if t >= target_count {
            return Err(MappingError::TargetOutOfRange {
                index: t,
                count: target_count,
            });
        }
        source_counts[s] += 1;
        target_counts[t] += 1;
    }
    Ok(MappingType::from_cardinalities(
        Cardinality::tightest(target_counts),
        Cardinality::tightest(source_counts),
    ))
}
