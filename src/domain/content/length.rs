use serde::{Deserialize, Serialize};

/// Target podcast length bucket, ordered from shortest to longest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthTier {
    Short,
    Medium,
    Long,
    Extended,
    Comprehensive,
}

impl LengthTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthTier::Short => "short",
            LengthTier::Medium => "medium",
            LengthTier::Long => "long",
            LengthTier::Extended => "extended",
            LengthTier::Comprehensive => "comprehensive",
        }
    }
}

impl std::fmt::Display for LengthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Instruction used when the whole document goes to the backend in one pass
pub const SINGLE_PASS_INSTRUCTION: &str =
    "Create a podcast that is as long as it needs to be to cover every important aspect of the content. Do not cut it short.";

/// One step of the planner: a tier, its output budget and its prompt wording
#[derive(Debug, Clone, PartialEq)]
pub struct TierSpec {
    pub tier: LengthTier,
    pub max_tokens: u32,
    pub instruction: &'static str,
}

/// The plan chosen for a given content length
#[derive(Debug, Clone, PartialEq)]
pub struct LengthPlan {
    pub tier: LengthTier,
    pub max_tokens: u32,
    pub instruction: &'static str,
}

/// Which breakpoint table to use. Tied to the generation backend's context and output limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthProfile {
    Standard,
    HighContext,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LengthPlanError {
    #[error("expected {expected} breakpoints, got {actual}")]
    BreakpointCount { expected: usize, actual: usize },
    #[error("breakpoints must be strictly increasing")]
    NotIncreasing,
}

/// Monotonic step function from content length to a `LengthPlan`.
///
/// `breakpoints[i]` is the exclusive upper bound of `tiers[i]`; lengths at or
/// above the last breakpoint map to the last tier.
#[derive(Debug, Clone)]
pub struct LengthPlanner {
    breakpoints: Vec<usize>,
    tiers: Vec<TierSpec>,
}

impl LengthPlanner {
    /// Build a planner from explicit breakpoints and tiers.
    pub fn new(breakpoints: Vec<usize>, tiers: Vec<TierSpec>) -> Result<Self, LengthPlanError> {
        let expected = tiers.len().saturating_sub(1);
        if breakpoints.len() != expected {
            return Err(LengthPlanError::BreakpointCount {
                expected,
                actual: breakpoints.len(),
            });
        }
        if breakpoints.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(LengthPlanError::NotIncreasing);
        }

        Ok(Self { breakpoints, tiers })
    }

    /// Four tiers sized for a backend with a modest context window
    pub fn standard() -> Self {
        Self {
            breakpoints: vec![2_000, 10_000, 30_000],
            tiers: standard_tiers(),
        }
    }

    /// Five tiers with breakpoints raised for a large-context backend
    pub fn high_context() -> Self {
        Self {
            breakpoints: vec![10_000, 50_000, 150_000, 300_000],
            tiers: high_context_tiers(),
        }
    }

    /// Build the planner for a profile, optionally overriding its breakpoints
    pub fn for_profile(
        profile: LengthProfile,
        breakpoints: Option<Vec<usize>>,
    ) -> Result<Self, LengthPlanError> {
        let base = match profile {
            LengthProfile::Standard => Self::standard(),
            LengthProfile::HighContext => Self::high_context(),
        };

        match breakpoints {
            Some(custom) => Self::new(custom, base.tiers),
            None => Ok(base),
        }
    }

    pub fn plan(&self, content_length: usize) -> LengthPlan {
        let index = self
            .breakpoints
            .iter()
            .position(|&limit| content_length < limit)
            .unwrap_or(self.breakpoints.len());
        let spec = &self.tiers[index];

        LengthPlan {
            tier: spec.tier,
            max_tokens: spec.max_tokens,
            instruction: spec.instruction,
        }
    }

    /// Largest budget in the table, used for single-pass generation
    pub fn max_budget(&self) -> u32 {
        self.tiers.iter().map(|t| t.max_tokens).max().unwrap_or(0)
    }
}

fn standard_tiers() -> Vec<TierSpec> {
    vec![
        TierSpec {
            tier: LengthTier::Short,
            max_tokens: 3_000,
            instruction: "Create a 3-4 minute podcast covering all important aspects.",
        },
        TierSpec {
            tier: LengthTier::Medium,
            max_tokens: 6_000,
            instruction: "Create a 6-8 minute podcast with thorough analysis and context.",
        },
        TierSpec {
            tier: LengthTier::Long,
            max_tokens: 12_000,
            instruction: "Create a 12-15 minute in-depth podcast covering all major aspects comprehensively.",
        },
        TierSpec {
            tier: LengthTier::Extended,
            max_tokens: 20_000,
            instruction: "Create a 20-25 minute comprehensive, detailed podcast with thorough exploration of all aspects.",
        },
    ]
}

fn high_context_tiers() -> Vec<TierSpec> {
    vec![
        TierSpec {
            tier: LengthTier::Short,
            max_tokens: 4_000,
            instruction: "Create a 4-6 minute podcast covering all important aspects.",
        },
        TierSpec {
            tier: LengthTier::Medium,
            max_tokens: 8_000,
            instruction: "Create a 8-12 minute podcast with thorough analysis and context.",
        },
        TierSpec {
            tier: LengthTier::Long,
            max_tokens: 16_000,
            instruction: "Create a 15-20 minute in-depth podcast covering all major aspects comprehensively.",
        },
        TierSpec {
            tier: LengthTier::Extended,
            max_tokens: 32_000,
            instruction: "Create a 25-35 minute comprehensive podcast with thorough exploration of all aspects.",
        },
        TierSpec {
            tier: LengthTier::Comprehensive,
            max_tokens: 64_000,
            instruction: "Create a 40-60 minute comprehensive deep-dive podcast that leaves nothing important out.",
        },
    ]
}
