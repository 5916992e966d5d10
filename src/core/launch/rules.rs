// ─── Rule Evaluation ───
// Decides whether rule-gated arguments and libraries apply to this launch.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::{debug, warn};

use crate::core::error::LaunchWarning;
use crate::core::platform::{Arch, Platform};
use crate::core::version::{ArgumentValue, LibraryEntry, OsRule, Rule, RuleAction};

const CUSTOM_RESOLUTION: &str = "has_custom_resolution";

/// Feature flags a rule can ask about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSet {
    pub has_custom_resolution: bool,
}

impl FeatureSet {
    /// Unknown features are never active.
    pub fn is_active(&self, name: &str) -> bool {
        match name {
            CUSTOM_RESOLUTION => self.has_custom_resolution,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleEnvironment {
    pub platform: Platform,
    pub arch: Arch,
    pub os_release: String,
    pub features: FeatureSet,
    pub fullscreen: bool,
}

/// Outcome of evaluating a rule set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleVerdict {
    pub activates: bool,
    /// Replacement for the conditional element's value, if any rule asked for one.
    pub value_override: Option<ArgumentValue>,
    pub warnings: Vec<LaunchWarning>,
}

impl RuleEnvironment {
    /// Evaluate a rule set with conjunctive semantics: the element activates
    /// only when every rule is individually satisfied.
    ///
    /// An empty rule set never activates.
    pub fn evaluate(&self, rules: &[Rule]) -> RuleVerdict {
        let mut verdict = RuleVerdict::default();
        let mut satisfied = 0usize;

        for rule in rules {
            let matched = match (&rule.os, &rule.features) {
                (Some(os), _) => self.os_matches(os, &mut verdict.warnings),
                (None, Some(features)) => {
                    let matched = self.features_match(features);
                    if matched
                        && self.fullscreen
                        && features.get(CUSTOM_RESOLUTION).copied() == Some(true)
                    {
                        verdict.value_override = Some(ArgumentValue::Many(vec![
                            "--fullscreen".into(),
                            "true".into(),
                        ]));
                    }
                    matched
                }
                (None, None) => true,
            };

            if matched == (rule.action == RuleAction::Allow) {
                satisfied += 1;
            }
        }

        verdict.activates = !rules.is_empty() && satisfied == rules.len();
        verdict
    }

    /// Whether a vendor library applies to this platform.
    ///
    /// Native-classified libraries additionally need a classifier for the
    /// current platform. A library without rules is unconditional.
    pub fn library_applies(&self, lib: &LibraryEntry, warnings: &mut Vec<LaunchWarning>) -> bool {
        if let Some(natives) = &lib.natives {
            if !natives.contains_key(self.platform.mojang_name()) {
                debug!("Skipping {} (no natives for {})", lib.name, self.platform);
                return false;
            }
        }

        if lib.rules.is_empty() {
            return true;
        }

        let verdict = self.evaluate(&lib.rules);
        warnings.extend(verdict.warnings);
        if !verdict.activates {
            debug!("Skipping library (rules): {}", lib.name);
        }
        verdict.activates
    }

    fn os_matches(&self, os: &OsRule, warnings: &mut Vec<LaunchWarning>) -> bool {
        if let Some(name) = &os.name {
            if name != self.platform.mojang_name() {
                return false;
            }
        }

        if let Some(arch) = &os.arch {
            if arch != self.arch.mojang_name() {
                return false;
            }
        }

        match &os.version {
            None => true,
            Some(pattern) => match Regex::new(pattern) {
                Ok(re) => re.is_match(&self.os_release),
                Err(e) => {
                    warn!("Invalid OS version pattern {:?}: {}", pattern, e);
                    warnings.push(LaunchWarning::InvalidOsPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    });
                    false
                }
            },
        }
    }

    fn features_match(&self, features: &BTreeMap<String, bool>) -> bool {
        !features.is_empty()
            && features
                .iter()
                .all(|(name, wanted)| self.features.is_active(name) == *wanted)
    }
}
