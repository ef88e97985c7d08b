//! Constructor selection policy
//!
//! Picks exactly one construction path out of a type's candidates:
//!
//! 1. A constructor marked as the dependency constructor wins outright.
//! 2. Otherwise candidates are tried from the most parameters to the fewest,
//!    falling back whenever one cannot be satisfied.
//! 3. Two candidates with the same parameter count are a configuration error.

use tracing::{debug, trace};

use crate::constructor::Signature;
use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Outcome of trying one candidate
#[derive(Debug)]
pub enum Attempt<T> {
    /// Every parameter resolved and the value was built
    Built(T),
    /// Some parameter could not be satisfied; try the next candidate
    Unsatisfied(DiError),
}

/// Order in which candidates will be tried
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// The dependency constructor at this index, with no fallback
    Forced(usize),
    /// Candidate indices by descending arity
    Ranked(Vec<usize>),
}

/// Work out the plan for `service`'s candidates without attempting any
pub fn plan(service: Key, candidates: &[&Signature]) -> DiResult<Plan> {
    let marked: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, signature)| signature.is_dependency())
        .map(|(index, _)| index)
        .collect();

    match marked.as_slice() {
        [index] => return Ok(Plan::Forced(*index)),
        [] => {}
        _ => {
            return Err(DiError::AmbiguousDependencyConstructor {
                service: service.type_name(),
                count: marked.len(),
            })
        }
    }

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    // Stable, so equal arities stay adjacent for the ambiguity check
    order.sort_by(|&a, &b| candidates[b].arity().cmp(&candidates[a].arity()));
    Ok(Plan::Ranked(order))
}

/// Select and build one candidate.
///
/// `attempt` is called with a candidate index and either builds the value
/// or reports why the candidate is unsatisfied. Errors returned by
/// `attempt` itself are not retried.
pub fn select<T, F>(service: Key, candidates: &[&Signature], mut attempt: F) -> DiResult<T>
where
    F: FnMut(usize) -> DiResult<Attempt<T>>,
{
    match plan(service, candidates)? {
        Plan::Forced(index) => {
            trace!("Using dependency constructor #{} of {}", index, service);
            match attempt(index)? {
                Attempt::Built(value) => Ok(value),
                Attempt::Unsatisfied(reason) => Err(reason),
            }
        }
        Plan::Ranked(order) => {
            for (position, &index) in order.iter().enumerate() {
                let arity = candidates[index].arity();
                if let Some(&next) = order.get(position + 1) {
                    if candidates[next].arity() == arity {
                        return Err(DiError::AmbiguousConstructors {
                            service: service.type_name(),
                            arity,
                        });
                    }
                }

                trace!("Trying constructor #{} of {} ({} params)", index, service, arity);
                match attempt(index)? {
                    Attempt::Built(value) => return Ok(value),
                    Attempt::Unsatisfied(reason) => {
                        debug!("Constructor #{} of {} rejected: {}", index, service, reason);
                    }
                }
            }

            Err(DiError::NotRegisteredImplementation {
                service: service.type_name(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Target;

    fn signature(arity: usize) -> Signature {
        Signature::new(vec![Key::of::<u8>(); arity])
    }

    fn missing() -> DiError {
        DiError::NotRegisteredImplementation { service: "u8" }
    }

    fn run(signatures: &[Signature], satisfiable: &[usize]) -> DiResult<usize> {
        let candidates: Vec<&Signature> = signatures.iter().collect();
        select(Key::of::<Target>(), &candidates, |index| {
            Ok(if satisfiable.contains(&index) {
                Attempt::Built(index)
            } else {
                Attempt::Unsatisfied(missing())
            })
        })
    }

    #[test]
    fn test_plan_orders_by_descending_arity() {
        let signatures = [signature(0), signature(2), signature(1)];
        let candidates: Vec<&Signature> = signatures.iter().collect();
        assert_eq!(
            plan(Key::of::<Target>(), &candidates).unwrap(),
            Plan::Ranked(vec![1, 2, 0])
        );
    }

    #[test]
    fn test_richest_satisfiable_constructor_wins() {
        let signatures = [signature(0), signature(1), signature(2)];
        assert_eq!(run(&signatures, &[0, 1, 2]).unwrap(), 2);
        assert_eq!(run(&signatures, &[0, 1]).unwrap(), 1);
        assert_eq!(run(&signatures, &[0]).unwrap(), 0);
    }

    #[test]
    fn test_dependency_constructor_is_forced() {
        let signatures = [signature(0).into_dependency(), signature(1)];
        assert_eq!(run(&signatures, &[0, 1]).unwrap(), 0);

        // No fallback even when the marked constructor cannot be satisfied
        let err = run(&signatures, &[1]).unwrap_err();
        assert_eq!(err, missing());
    }

    #[test]
    fn test_two_dependency_constructors() {
        let signatures = [signature(0).into_dependency(), signature(1).into_dependency()];
        let err = run(&signatures, &[0, 1]).unwrap_err();
        assert!(matches!(
            err,
            DiError::AmbiguousDependencyConstructor { count: 2, .. }
        ));
    }

    #[test]
    fn test_equal_arity_is_ambiguous() {
        let signatures = [signature(1), signature(1)];
        let err = run(&signatures, &[0, 1]).unwrap_err();
        assert!(matches!(err, DiError::AmbiguousConstructors { arity: 1, .. }));
    }

    #[test]
    fn test_tie_below_a_satisfied_candidate_is_never_reached() {
        let signatures = [signature(1), signature(1), signature(2)];
        assert_eq!(run(&signatures, &[2]).unwrap(), 2);
    }

    #[test]
    fn test_no_candidates() {
        let err = run(&[], &[]).unwrap_err();
        assert!(err.is_unsatisfied());

        let err = run(&[signature(1)], &[]).unwrap_err();
        assert!(matches!(err, DiError::NotRegisteredImplementation { .. }));
    }

    #[test]
    fn test_attempt_errors_are_not_retried() {
        let signatures = [signature(0), signature(1)];
        let candidates: Vec<&Signature> = signatures.iter().collect();
        let mut tried = Vec::new();
        let err = select::<(), _>(Key::of::<Target>(), &candidates, |index| {
            tried.push(index);
            Err(DiError::CyclicDependency {
                path: "Target -> Target".into(),
            })
        })
        .unwrap_err();

        assert!(matches!(err, DiError::CyclicDependency { .. }));
        assert_eq!(tried, vec![1]);
    }
}
