//! Compact encoding of which legend symbols of a layer are rendered.
//!
//! The server expects a list of closed index intervals (`["2-4", "7"]`), or
//! the `["-1"]` sentinel when nothing should be rendered. A missing value
//! means "no filter": every symbol renders according to its server-side
//! default.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::LegendSymbol;
use crate::error::TreeError;

/// Text form of the "render nothing" sentinel.
pub const NOTHING_SENTINEL: &str = "-1";

/// Closed interval of legend symbol indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolRange {
    pub start: u32,
    pub end: u32,
}

impl SymbolRange {
    pub fn single(index: u32) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    pub fn contains(&self, index: u32) -> bool {
        self.start <= index && index <= self.end
    }

    /// The parts of this interval left after taking `index` out.
    fn without(self, index: u32) -> [Option<Self>; 2] {
        if !self.contains(index) {
            return [Some(self), None];
        }
        let below = index
            .checked_sub(1)
            .filter(|end| *end >= self.start)
            .map(|end| Self {
                start: self.start,
                end,
            });
        let above = index
            .checked_add(1)
            .filter(|start| *start <= self.end)
            .map(|start| Self {
                start,
                end: self.end,
            });
        [below, above]
    }
}

/// Sort intervals and merge the ones that overlap or touch.
fn merge_ranges(mut ranges: Vec<SymbolRange>) -> Vec<SymbolRange> {
    ranges.sort_by_key(|range| range.start);
    let mut merged: Vec<SymbolRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last)
                if u64::from(range.start) <= u64::from(last.end) + 1 =>
            {
                last.end = last.end.max(range.end);
            },
            _ => merged.push(range),
        }
    }
    merged
}

impl fmt::Display for SymbolRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for SymbolRange {
    type Err = TreeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || TreeError::InvalidSymbolRange(raw.to_string());
        let trimmed = raw.trim();
        let (start, end) = match trimmed.split_once('-') {
            Some((start, end)) => (start, end),
            None => (trimmed, trimmed),
        };
        let start: u32 = start.parse().map_err(|_| invalid())?;
        let end: u32 = end.parse().map_err(|_| invalid())?;
        if start > end {
            return Err(invalid());
        }

        Ok(Self { start, end })
    }
}

/// Render filter for the legend symbols of one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SymbolFilter {
    /// No filter, the server decides per symbol.
    #[default]
    All,
    /// Render nothing (`["-1"]`).
    Nothing,
    /// Render exactly the indices covered by these intervals.
    Ranges(Vec<SymbolRange>),
}

impl SymbolFilter {
    /// Compact a set of indices into the minimal list of intervals.
    ///
    /// An empty set becomes [`SymbolFilter::Nothing`].
    pub fn from_indices<I>(indices: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let sorted: BTreeSet<u32> = indices.into_iter().collect();
        let mut ranges: Vec<SymbolRange> = Vec::new();
        for index in sorted {
            match ranges.last_mut() {
                Some(last) if last.end.checked_add(1) == Some(index) => {
                    last.end = index;
                },
                _ => ranges.push(SymbolRange::single(index)),
            }
        }

        Self::from_ranges(ranges)
    }

    /// Build a filter from already parsed intervals; an empty list means
    /// nothing renders.
    pub fn from_ranges(ranges: Vec<SymbolRange>) -> Self {
        if ranges.is_empty() {
            Self::Nothing
        } else {
            Self::Ranges(ranges)
        }
    }

    /// Parse the wire representation.
    pub fn parse<S: AsRef<str>>(intervals: &[S]) -> Result<Self, TreeError> {
        if let [single] = intervals
            && single.as_ref().trim() == NOTHING_SENTINEL
        {
            return Ok(Self::Nothing);
        }

        let ranges = intervals
            .iter()
            .map(|raw| raw.as_ref().parse())
            .collect::<Result<Vec<SymbolRange>, _>>()?;
        Ok(Self::from_ranges(ranges))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Wire representation; empty for [`SymbolFilter::All`].
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            Self::All => Vec::new(),
            Self::Nothing => vec![NOTHING_SENTINEL.to_string()],
            Self::Ranges(ranges) => {
                ranges.iter().map(ToString::to_string).collect()
            },
        }
    }

    /// Rendered indices as sorted, merged intervals.
    ///
    /// Resolving [`SymbolFilter::All`] needs the legend symbols of the
    /// layer; `None` is returned while they are unknown.
    pub fn enabled_ranges(
        &self,
        symbols: Option<&[LegendSymbol]>,
    ) -> Option<Vec<SymbolRange>> {
        match self {
            Self::All => symbols.map(|symbols| {
                let singles = symbols
                    .iter()
                    .filter(|symbol| symbol.renders_by_default())
                    .map(|symbol| SymbolRange::single(symbol.index))
                    .collect();
                merge_ranges(singles)
            }),
            Self::Nothing => Some(Vec::new()),
            Self::Ranges(ranges) => Some(merge_ranges(ranges.clone())),
        }
    }

    /// Whether the symbol at `index` renders.
    ///
    /// Under [`SymbolFilter::All`] the fetched symbols decide; while they are
    /// unknown every index is assumed to render.
    pub fn renders_index(
        &self,
        index: u32,
        symbols: Option<&[LegendSymbol]>,
    ) -> bool {
        match self {
            Self::All => symbols.is_none_or(|symbols| {
                symbols.iter().any(|symbol| {
                    symbol.index == index && symbol.renders_by_default()
                })
            }),
            Self::Nothing => false,
            Self::Ranges(ranges) => {
                ranges.iter().any(|range| range.contains(index))
            },
        }
    }

    /// Filter with the symbol at `index` switched on or off.
    ///
    /// Edits the intervals in place of expanding them. `None` when
    /// [`SymbolFilter::All`] cannot be resolved.
    pub fn with_index(
        &self,
        index: u32,
        render: bool,
        symbols: Option<&[LegendSymbol]>,
    ) -> Option<Self> {
        let mut ranges = self.enabled_ranges(symbols)?;
        let ranges = if render {
            ranges.push(SymbolRange::single(index));
            merge_ranges(ranges)
        } else {
            ranges
                .into_iter()
                .flat_map(|range| range.without(index))
                .flatten()
                .collect()
        };
        Some(Self::from_ranges(ranges))
    }

    /// Whether the symbol renders; for [`SymbolFilter::All`] the server
    /// default decides.
    pub fn renders(&self, symbol: &LegendSymbol) -> bool {
        match self {
            Self::All => symbol.renders_by_default(),
            Self::Nothing => false,
            Self::Ranges(ranges) => {
                ranges.iter().any(|range| range.contains(symbol.index))
            },
        }
    }
}

impl Serialize for SymbolFilter {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_none(),
            _ => self.to_strings().serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSymbols {
    Text(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for SymbolFilter {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let raw = Option::<RawSymbols>::deserialize(deserializer)?;
        let parsed = match raw {
            None => return Ok(Self::All),
            Some(RawSymbols::Text(text)) => Self::parse(&[text]),
            Some(RawSymbols::List(list)) => Self::parse(&list),
        };
        parsed.map_err(D::Error::custom)
    }
}
