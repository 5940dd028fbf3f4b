//! Analyze many methods at once.
//!
//! Methods share no facts, so each one is analyzed start to finish by a
//! single worker thread. Workers pull the next unclaimed method from a shared
//! counter, which keeps them busy when method sizes vary.

use crate::il::Method;
use crate::Error;
use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Run `analysis` over every method in `methods` on `threads` worker
/// threads, and return one result per method in the order of `methods`.
///
/// When `threads` is 0, one thread is started per available core. An error
/// from one method is returned in that method's slot, wrapped in
/// `Error::Method`, and does not stop the analysis of the others.
pub fn analyze_methods<T, F>(methods: &[Method], threads: usize, analysis: F) -> Vec<Result<T, Error>>
where
    T: Send,
    F: Fn(&Method) -> Result<T, Error> + Sync,
{
    let threads = match threads {
        0 => thread::available_parallelism()
            .map(|threads| threads.get())
            .unwrap_or(1),
        threads => threads,
    }
    .min(methods.len())
    .max(1);

    debug!(
        "analyzing {} methods on {} threads",
        methods.len(),
        threads
    );

    let next = AtomicUsize::new(0);

    let mut results: Vec<(usize, Result<T, Error>)> = thread::scope(|scope| {
        let workers = (0..threads)
            .map(|_| {
                scope.spawn(|| {
                    let mut results = Vec::new();
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let method = match methods.get(index) {
                            Some(method) => method,
                            None => break,
                        };
                        let result = analysis(method).map_err(|error| {
                            if error.is_contract_violation() {
                                error!("analysis of {} failed: {}", method.name(), error);
                            }
                            error.in_method(method.name())
                        });
                        results.push((index, result));
                    }
                    results
                })
            })
            .collect::<Vec<_>>();

        workers
            .into_iter()
            .flat_map(|worker| {
                worker
                    .join()
                    .unwrap_or_else(|payload| panic::resume_unwind(payload))
            })
            .collect()
    });

    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::il::ControlFlowGraph;

    fn methods(count: usize) -> Vec<Method> {
        (0..count)
            .map(|i| Method::new(format!("M{}", i), ControlFlowGraph::new()))
            .collect()
    }

    #[test]
    fn results_keep_method_order() {
        let methods = methods(33);

        let names = analyze_methods(&methods, 4, |method| Ok(method.name().to_string()));

        assert_eq!(names.len(), 33);
        for (i, name) in names.into_iter().enumerate() {
            assert_eq!(name.unwrap(), format!("M{}", i));
        }
    }

    #[test]
    fn failures_stay_with_their_method() {
        let methods = methods(5);

        let results = analyze_methods(&methods, 0, |method| {
            if method.name() == "M3" {
                Err(Error::IterationBudgetExceeded {
                    point: crate::il::ProgramPoint::empty_block(0),
                    budget: 1,
                })
            } else {
                Ok(())
            }
        });

        for (i, result) in results.iter().enumerate() {
            if i == 3 {
                let error = result.as_ref().unwrap_err();
                assert!(error.is_contract_violation());
                assert!(matches!(error, Error::Method { method, .. } if method == "M3"));
            } else {
                assert!(result.is_ok());
            }
        }
    }

    #[test]
    fn no_methods() {
        let results: Vec<Result<(), Error>> = analyze_methods(&[], 8, |_| Ok(()));
        assert!(results.is_empty());
    }
}
