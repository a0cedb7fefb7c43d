// Copyright 2025 DMS Restoration Contributors
// SPDX-License-Identifier: Apache-2.0

//! Decoding of simulator optimization variants into short labels.
//!
//! The simulator names its configuration by implementation type
//! (`SortedStateIndexer`, `FilterOnWay<PermutationalActions>`, ...). Action
//! sets and action appliers form a closed vocabulary: each known name maps to
//! zero or more one-letter codes and anything else is rejected.
//!
//! | Code | Optimization                                   |
//! |------|------------------------------------------------|
//! | `S`  | sorted state indexer                           |
//! | `P`  | permutational actions                          |
//! | `O`  | on-way filtering (plain or energized-only)     |
//! | `V`  | timed transitions until team arrival           |
//! | `W`  | timed transitions until energization           |

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Indexer names starting with this prefix contribute the `S` code.
pub const SORTED_INDEXER_PREFIX: &str = "Sorted";

/// Label used when a descriptor enables no optimization at all.
pub const NO_OPTIMIZATION_LABEL: &str = "-";

/// Errors that can occur while decoding a variant descriptor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The name is not part of the closed simulator vocabulary.
    #[error("Unknown {kind} variant: {value}")]
    UnknownVariant {
        /// Which descriptor field held the name.
        kind: &'static str,
        /// The unrecognized name.
        value: String,
    },
}

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// The simulator configuration triple attached to an optimization benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDescriptor {
    /// State indexer implementation.
    pub indexer: String,
    /// Action set implementation.
    pub actions: String,
    /// Action applier (transition) implementation.
    pub transitions: String,
}

impl VariantDescriptor {
    /// Create a descriptor from its three names.
    pub fn new(
        indexer: impl Into<String>,
        actions: impl Into<String>,
        transitions: impl Into<String>,
    ) -> Self {
        Self {
            indexer: indexer.into(),
            actions: actions.into(),
            transitions: transitions.into(),
        }
    }
}

/// State indexer variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indexer {
    /// Any sorted-index variant.
    Sorted,
    /// Every other indexer.
    Plain,
}

impl Indexer {
    /// Classify an indexer name. Indexers are open-ended: only the sorted
    /// prefix matters.
    pub fn classify(name: &str) -> Self {
        if name.starts_with(SORTED_INDEXER_PREFIX) {
            Self::Sorted
        } else {
            Self::Plain
        }
    }

    /// Label codes contributed by this indexer.
    pub fn codes(&self) -> &'static [&'static str] {
        match self {
            Self::Sorted => &["S"],
            Self::Plain => &[],
        }
    }
}

/// Action set variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSet {
    /// `NaiveActions`
    Naive,
    /// `PermutationalActions`
    Permutational,
    /// `FilterOnWay<NaiveActions>`
    FilterOnWayNaive,
    /// `FilterOnWay<PermutationalActions>`
    FilterOnWayPermutational,
    /// `FilterEnergizedOnWay<NaiveActions>`
    FilterEnergizedOnWayNaive,
    /// `FilterEnergizedOnWay<PermutationalActions>`
    FilterEnergizedOnWayPermutational,
}

impl ActionSet {
    /// Every known action set.
    pub const ALL: [ActionSet; 6] = [
        Self::Naive,
        Self::Permutational,
        Self::FilterEnergizedOnWayNaive,
        Self::FilterEnergizedOnWayPermutational,
        Self::FilterOnWayNaive,
        Self::FilterOnWayPermutational,
    ];

    /// Simulator type name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Naive => "NaiveActions",
            Self::Permutational => "PermutationalActions",
            Self::FilterOnWayNaive => "FilterOnWay<NaiveActions>",
            Self::FilterOnWayPermutational => "FilterOnWay<PermutationalActions>",
            Self::FilterEnergizedOnWayNaive => "FilterEnergizedOnWay<NaiveActions>",
            Self::FilterEnergizedOnWayPermutational => {
                "FilterEnergizedOnWay<PermutationalActions>"
            }
        }
    }

    /// Label codes contributed by this action set.
    pub fn codes(&self) -> &'static [&'static str] {
        match self {
            Self::Naive => &[],
            Self::Permutational => &["P"],
            Self::FilterOnWayNaive | Self::FilterEnergizedOnWayNaive => &["O"],
            Self::FilterOnWayPermutational | Self::FilterEnergizedOnWayPermutational => {
                &["P", "O"]
            }
        }
    }
}

impl FromStr for ActionSet {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.name() == s)
            .ok_or_else(|| DecodeError::UnknownVariant {
                kind: "actions",
                value: s.to_string(),
            })
    }
}

/// Action applier variants, i.e. how transitions are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionApplier {
    /// `NaiveActionApplier`
    Naive,
    /// `TimedActionApplier<ConstantTime>`
    TimedConstant,
    /// `TimedActionApplier<TimeUntilArrival>`
    TimedUntilArrival,
    /// `TimedActionApplier<TimeUntilEnergization>`
    TimedUntilEnergization,
}

impl ActionApplier {
    /// Every known action applier.
    pub const ALL: [ActionApplier; 4] = [
        Self::Naive,
        Self::TimedConstant,
        Self::TimedUntilArrival,
        Self::TimedUntilEnergization,
    ];

    /// Simulator type name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Naive => "NaiveActionApplier",
            Self::TimedConstant => "TimedActionApplier<ConstantTime>",
            Self::TimedUntilArrival => "TimedActionApplier<TimeUntilArrival>",
            Self::TimedUntilEnergization => "TimedActionApplier<TimeUntilEnergization>",
        }
    }

    /// Label codes contributed by this action applier.
    pub fn codes(&self) -> &'static [&'static str] {
        match self {
            Self::Naive | Self::TimedConstant => &[],
            Self::TimedUntilArrival => &["V"],
            Self::TimedUntilEnergization => &["W"],
        }
    }
}

impl FromStr for ActionApplier {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.name() == s)
            .ok_or_else(|| DecodeError::UnknownVariant {
                kind: "transitions",
                value: s.to_string(),
            })
    }
}

/// Decode a descriptor into its label, e.g. `"S + P + O + W"`.
///
/// Codes are ordered indexer, actions, transitions. A descriptor without any
/// optimization decodes to [`NO_OPTIMIZATION_LABEL`].
pub fn decode(descriptor: &VariantDescriptor) -> Result<String> {
    let indexer = Indexer::classify(&descriptor.indexer);
    let actions: ActionSet = descriptor.actions.parse()?;
    let transitions: ActionApplier = descriptor.transitions.parse()?;

    let codes: Vec<&str> = indexer
        .codes()
        .iter()
        .chain(actions.codes())
        .chain(transitions.codes())
        .copied()
        .collect();

    if codes.is_empty() {
        Ok(NO_OPTIMIZATION_LABEL.to_string())
    } else {
        Ok(codes.join(" + "))
    }
}

/// Indexers benchmarked by the simulator's "benchmark all" task.
pub const BENCHMARK_INDEXERS: [&str; 2] = ["NaiveStateIndexer", "SortedStateIndexer"];

/// Every descriptor of the simulator's "benchmark all" cross product, in the
/// order the simulator emits them.
pub fn all_descriptors() -> Vec<VariantDescriptor> {
    let appliers = [
        ActionApplier::Naive,
        ActionApplier::TimedUntilArrival,
        ActionApplier::TimedUntilEnergization,
    ];
    let mut descriptors = Vec::new();
    for indexer in BENCHMARK_INDEXERS {
        for actions in ActionSet::ALL {
            for applier in appliers {
                descriptors.push(VariantDescriptor::new(
                    indexer,
                    actions.name(),
                    applier.name(),
                ));
            }
        }
    }
    descriptors
}
