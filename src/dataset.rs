//! Derived Record computation: extends the source table with a per-group
//! proportional share and four per-group descriptive statistics before any
//! sampling happens. Computed once; the result is read-only downstream.

use anyhow::{anyhow, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Which columns drive the two derived computations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichRules {
    /// Value column for the proportional share.
    pub share_value: String,
    /// Group key the share is computed within.
    pub share_group: String,
    /// Quantity column for the per-group statistics.
    pub stats_value: String,
    /// Group key the statistics are computed over and joined back on.
    pub stats_group: String,
}

impl Default for EnrichRules {
    fn default() -> Self {
        Self {
            share_value: "distance".to_string(),
            share_group: "carrier".to_string(),
            stats_value: "arr_delay".to_string(),
            stats_group: "dest".to_string(),
        }
    }
}

impl EnrichRules {
    pub fn share_alias(&self) -> String {
        format!("{}_share", self.share_value)
    }

    pub fn stats_alias(&self, stat: &str) -> String {
        format!("{}_{}", self.stats_value, stat)
    }
}

/// Append the derived columns to the source frame.
///
/// The share is a window expression (value over the group-wise sum); the
/// statistics are a group_by aggregation joined back on the stats group key.
pub fn enrich(lf: LazyFrame, rules: &EnrichRules) -> Result<LazyFrame> {
    let value = col(&rules.share_value).cast(DataType::Float64);
    let share = (value.clone() / value.sum().over([col(&rules.share_group)]))
        .alias(rules.share_alias());

    let with_share = lf.clone().with_columns([share]);

    let stats_value = col(&rules.stats_value).cast(DataType::Float64);
    let stats = lf
        .select([col(&rules.stats_group), stats_value.clone()])
        .group_by([col(&rules.stats_group)])
        .agg([
            stats_value.clone().mean().alias(rules.stats_alias("mean")),
            stats_value.clone().std(1).alias(rules.stats_alias("std")),
            stats_value.clone().min().alias(rules.stats_alias("min")),
            stats_value.max().alias(rules.stats_alias("max")),
        ]);

    Ok(with_share.join(
        stats,
        [col(&rules.stats_group)],
        [col(&rules.stats_group)],
        JoinArgs::new(JoinType::Left),
    ))
}

/// Collect the enriched frame, checking that the rule columns exist first so
/// the failure names the missing column instead of surfacing as a plan error.
pub fn enrich_collected(lf: LazyFrame, rules: &EnrichRules) -> Result<DataFrame> {
    let schema = lf
        .clone()
        .collect_schema()
        .map_err(|e| anyhow!("Failed to resolve input schema: {}", e))?;
    for name in [
        &rules.share_value,
        &rules.share_group,
        &rules.stats_value,
        &rules.stats_group,
    ] {
        if !schema.iter_names().any(|n| n.as_str() == name.as_str()) {
            return Err(anyhow!("Input table has no column '{}'", name));
        }
    }
    Ok(enrich(lf, rules)?.collect()?)
}
