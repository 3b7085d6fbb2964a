//! Field narrowing.
//!
//! Everything here is pure: it takes the declared field names plus the parsed
//! include/exclude names and returns the names to drop. The serializer applies
//! the drop set afterwards, so the field map is never mutated while it is
//! being iterated.

use std::collections::{BTreeSet, HashSet};

use crate::config::SelectorConfig;
use crate::fields::ForcedFields;
use crate::params::QueryParams;

/// The only method for which request-driven selection runs.
pub const SELECTABLE_METHOD: &str = "GET";

/// What a selection pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Forced fields were given; everything else was dropped.
    Forced { dropped: BTreeSet<String> },
    /// No request was available, nothing was filtered.
    NoRequest,
    /// The request method is not `GET` (or is missing), nothing was filtered.
    MethodNotFiltered { method: Option<String> },
    /// The request named no fields to include or exclude.
    NoPreference,
    /// Include/exclude parameters were applied.
    Filtered { dropped: BTreeSet<String> },
}

impl Selection {
    /// Names removed by this pass.
    pub fn dropped(&self) -> Option<&BTreeSet<String>> {
        match self {
            Selection::Forced { dropped } | Selection::Filtered { dropped } => Some(dropped),
            _ => None,
        }
    }

    /// True when the pass left the field set untouched.
    pub fn is_unchanged(&self) -> bool {
        self.dropped().is_none_or(BTreeSet::is_empty)
    }
}

/// Include and exclude names parsed from one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpec {
    pub include: HashSet<String>,
    pub exclude: HashSet<String>,
}

impl FieldSpec {
    /// Read both parameters out of `params` using the names in `config`.
    pub fn from_params(params: &QueryParams, config: &SelectorConfig) -> Self {
        Self {
            include: parse_field_names(
                params.get_list(&config.include_arg_name),
                &config.delimiter,
            ),
            exclude: parse_field_names(
                params.get_list(&config.exclude_arg_name),
                &config.delimiter,
            ),
        }
    }

    /// True when the caller expressed no preference.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// Split each raw parameter value on `delimiter` and collect the non-empty names.
pub fn parse_field_names<S: AsRef<str>>(values: &[S], delimiter: &str) -> HashSet<String> {
    values
        .iter()
        .flat_map(|value| value.as_ref().split(delimiter))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Names to drop so that only forced fields remain.
pub fn forced_drop_set<'a, I>(declared: I, forced: &ForcedFields) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    declared
        .into_iter()
        .filter(|name| !forced.contains(name))
        .map(str::to_string)
        .collect()
}

/// Names to drop for the given include/exclude spec.
///
/// Excluded names are always dropped, even when they are also included. When
/// any include name is given, every declared name outside it is dropped too.
/// Names that are not declared are ignored.
pub fn compute_drop_set<'a, I>(declared: I, spec: &FieldSpec) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    declared
        .into_iter()
        .filter(|name| {
            spec.exclude.contains(*name)
                || (!spec.include.is_empty() && !spec.include.contains(*name))
        })
        .map(str::to_string)
        .collect()
}
