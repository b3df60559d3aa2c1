use crate::service::models::SafetyVerdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Permitted,
    EmptyStatement,
    NeedsAcknowledgment,
}

/// Decides whether `sql` may run given the latest verdict.
///
/// With no verdict at all (hand-typed SQL, nothing generated yet) execution
/// is permitted. An unsafe verdict blocks until acknowledged.
pub fn evaluate(verdict: Option<&SafetyVerdict>, acknowledged: bool, sql: &str) -> GateDecision {
    if sql.trim().is_empty() {
        return GateDecision::EmptyStatement;
    }
    match verdict {
        Some(verdict) if !verdict.is_safe() && !acknowledged => GateDecision::NeedsAcknowledgment,
        _ => GateDecision::Permitted,
    }
}

pub fn is_execution_permitted(
    verdict: Option<&SafetyVerdict>,
    acknowledged: bool,
    sql: &str,
) -> bool {
    evaluate(verdict, acknowledged, sql) == GateDecision::Permitted
}
