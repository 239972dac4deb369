use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tally_core::{Category, SystemClock, time::DEFAULT_TIMEZONE};
use tally_finance::aggregate::{
    AggregateOptions, BudgetPolicy, DEFAULT_BUDGET_HEADROOM, DEFAULT_DAILY_WINDOW,
};
use tally_finance::{Benchmarks, Pipeline};

use crate::state::ensure_tally_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisSection,
    /// Monthly budget per category display name, e.g. `"Food & Groceries" = 4500.0`
    pub budgets: BTreeMap<String, f64>,
    pub benchmarks: Benchmarks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Most recent expense days kept in the daily series
    pub daily_window: usize,
    /// Budget = spent * headroom for categories without an explicit budget
    pub budget_headroom: f64,
    /// IANA zone used for "today" when generating sample data
    pub timezone: String,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            daily_window: DEFAULT_DAILY_WINDOW,
            budget_headroom: DEFAULT_BUDGET_HEADROOM,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl Config {
    pub fn aggregate_options(&self) -> Result<AggregateOptions> {
        if self.analysis.daily_window == 0 {
            bail!("analysis.daily_window must be at least 1");
        }
        if self.analysis.budget_headroom.is_nan() || self.analysis.budget_headroom <= 0.0 {
            bail!(
                "analysis.budget_headroom must be positive, got {}",
                self.analysis.budget_headroom
            );
        }

        let mut budgets = BudgetPolicy {
            headroom: self.analysis.budget_headroom,
            ..BudgetPolicy::default()
        };
        for (name, amount) in &self.budgets {
            let category: Category = name.parse().map_err(|e: String| anyhow!(e))?;
            if category == Category::Income {
                bail!("Income cannot have a budget");
            }
            if amount.is_nan() || *amount <= 0.0 {
                bail!("budget for {} must be positive, got {}", category, amount);
            }
            budgets = budgets.with_budget(category, *amount);
        }

        Ok(AggregateOptions {
            budgets,
            daily_window: self.analysis.daily_window,
        })
    }

    pub fn clock(&self) -> Result<SystemClock> {
        SystemClock::from_name(&self.analysis.timezone)
            .with_context(|| format!("analysis.timezone = {:?}", self.analysis.timezone))
    }

    pub fn pipeline(&self) -> Result<Pipeline> {
        Ok(Pipeline::new(
            self.aggregate_options()?,
            self.benchmarks.clone(),
        ))
    }
}

/// `--config` if given, else `~/.tally/config.toml`.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(ensure_tally_home()?.join("config.toml")),
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = config_path(explicit)?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = config_path(explicit)?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
