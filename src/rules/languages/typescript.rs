use crate::rules::RuleLevel;
use crate::rules::static_analysis::StaticAnalyzer;
use crate::rules::takeuntil::{RuleOptions, TakeUntilRule};

/// Returns the set of static analyzers for TypeScript files.
pub fn analyzers(options: RuleOptions, level: RuleLevel) -> Vec<Box<dyn StaticAnalyzer + Send + Sync>> {
    vec![Box::new(TakeUntilRule::new(options, level))]
}
