//! Per-bar trading decisions.
//!
//! A [`SignalEngine`] is an ordered list of [`SignalRule`]s. Rules are tried
//! in order and the first one that produces a decision wins; if none fires the
//! decision is HOLD. The engine keeps no state between bars, so identical
//! inputs always give identical decisions.

use std::fmt;

use super::position::Position;

pub const DEFAULT_STOP_LOSS: f64 = 0.9;
pub const DEFAULT_OVERBOUGHT: f64 = 80.0;
pub const DEFAULT_ENTRY_CEILING: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Buy => write!(f, "BUY"),
            Decision::Sell => write!(f, "SELL"),
            Decision::Hold => write!(f, "HOLD"),
        }
    }
}

/// Market and position state at one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalInputs<'a> {
    pub short_trend: Option<f64>,
    pub long_trend: Option<f64>,
    pub momentum: Option<f64>,
    pub price: f64,
    pub position: &'a Position,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalRule {
    /// HOLD unless both trends and momentum are defined.
    RequireInputs,
    /// HOLD unless both trends are defined.
    RequireTrends,
    /// SELL an open position trading below `avg_cost * fraction`.
    StopLoss(f64),
    /// SELL when the short trend is below the long trend.
    TrendReversal,
    /// SELL when momentum is above the threshold.
    Overbought(f64),
    /// BUY when the short trend is above the long trend and momentum is
    /// below the ceiling.
    TrendEntry(f64),
    /// BUY when the short trend is above the long trend.
    CrossAbove,
}

impl SignalRule {
    pub fn evaluate(&self, inputs: &SignalInputs<'_>) -> Option<Decision> {
        let trends = inputs.short_trend.zip(inputs.long_trend);
        match *self {
            SignalRule::RequireInputs => {
                if trends.is_none() || inputs.momentum.is_none() {
                    Some(Decision::Hold)
                } else {
                    None
                }
            }
            SignalRule::RequireTrends => trends.is_none().then_some(Decision::Hold),
            SignalRule::StopLoss(fraction) => inputs
                .position
                .breaches_stop(inputs.price, fraction)
                .then_some(Decision::Sell),
            SignalRule::TrendReversal => trends
                .filter(|(short, long)| short < long)
                .map(|_| Decision::Sell),
            SignalRule::Overbought(threshold) => inputs
                .momentum
                .filter(|&m| m > threshold)
                .map(|_| Decision::Sell),
            SignalRule::TrendEntry(ceiling) => match (trends, inputs.momentum) {
                (Some((short, long)), Some(m)) if short > long && m < ceiling => {
                    Some(Decision::Buy)
                }
                _ => None,
            },
            SignalRule::CrossAbove => trends
                .filter(|(short, long)| short > long)
                .map(|_| Decision::Buy),
        }
    }
}

impl fmt::Display for SignalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalRule::RequireInputs => write!(f, "require-inputs"),
            SignalRule::RequireTrends => write!(f, "require-trends"),
            SignalRule::StopLoss(fraction) => write!(f, "stop-loss({fraction})"),
            SignalRule::TrendReversal => write!(f, "trend-reversal"),
            SignalRule::Overbought(t) => write!(f, "overbought({t})"),
            SignalRule::TrendEntry(c) => write!(f, "trend-entry({c})"),
            SignalRule::CrossAbove => write!(f, "cross-above"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyVariant {
    /// Trend crossover filtered by the momentum oscillator.
    #[default]
    TrendMomentum,
    /// Plain moving-average crossover, momentum ignored.
    Crossover,
}

impl StrategyVariant {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "trend_momentum" => Some(StrategyVariant::TrendMomentum),
            "crossover" => Some(StrategyVariant::Crossover),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyVariant::TrendMomentum => write!(f, "trend_momentum"),
            StrategyVariant::Crossover => write!(f, "crossover"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub variant: StrategyVariant,
    /// `None` disables the stop-loss rule.
    pub stop_loss: Option<f64>,
    pub overbought: f64,
    pub entry_ceiling: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            variant: StrategyVariant::TrendMomentum,
            stop_loss: Some(DEFAULT_STOP_LOSS),
            overbought: DEFAULT_OVERBOUGHT,
            entry_ceiling: DEFAULT_ENTRY_CEILING,
        }
    }
}

/// Result of running the rule list on one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub decision: Decision,
    /// The rule that fired, `None` when the fallback HOLD applied.
    pub rule: Option<SignalRule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalEngine {
    rules: Vec<SignalRule>,
}

impl SignalEngine {
    pub fn new(config: &SignalConfig) -> Self {
        let mut rules = Vec::with_capacity(5);
        match config.variant {
            StrategyVariant::TrendMomentum => {
                rules.push(SignalRule::RequireInputs);
                rules.extend(config.stop_loss.map(SignalRule::StopLoss));
                rules.push(SignalRule::TrendReversal);
                rules.push(SignalRule::Overbought(config.overbought));
                rules.push(SignalRule::TrendEntry(config.entry_ceiling));
            }
            StrategyVariant::Crossover => {
                rules.push(SignalRule::RequireTrends);
                rules.extend(config.stop_loss.map(SignalRule::StopLoss));
                rules.push(SignalRule::TrendReversal);
                rules.push(SignalRule::CrossAbove);
            }
        }
        SignalEngine { rules }
    }

    pub fn from_rules(rules: Vec<SignalRule>) -> Self {
        SignalEngine { rules }
    }

    pub fn rules(&self) -> &[SignalRule] {
        &self.rules
    }

    pub fn evaluate(&self, inputs: &SignalInputs<'_>) -> Evaluation {
        self.rules
            .iter()
            .find_map(|rule| {
                rule.evaluate(inputs).map(|decision| Evaluation {
                    decision,
                    rule: Some(*rule),
                })
            })
            .unwrap_or(Evaluation {
                decision: Decision::Hold,
                rule: None,
            })
    }

    pub fn decide(&self, inputs: &SignalInputs<'_>) -> Decision {
        self.evaluate(inputs).decision
    }
}
