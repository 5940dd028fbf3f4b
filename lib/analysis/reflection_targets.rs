//! Resolve the members named at reflection call sites.
//!
//! A method annotated `ReflectionAccess { argument }` looks up a member by
//! the name passed as its `argument`-th argument. Trimming may only remove
//! members which no such call can name, so every call site must be resolved
//! to the finite set of names that may reach it, or reported as unresolvable.
//!
//! This is a forward may-analysis. Each local maps to the bounded set of
//! values which may be stored in it. A local which may hold too many values
//! collapses to `ValueSet::Unknown`.

use crate::analysis::{fixed_point, FixedPointAnalysis, Options};
use crate::il::{Local, Method, Operand, Operation, ProgramPoint, RefProgramPoint};
use crate::lattice::{DeepCopy, Lattice, MapFact, MapLattice, UnionLattice, ValueSet};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A value a local may hold.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum SymbolicValue {
    /// A string literal.
    Str(String),
    /// A type token.
    Type(String),
    Null,
    /// A value computed somewhere this method cannot see.
    Opaque,
}

impl SymbolicValue {
    /// The member or type name this value denotes, if it is a literal.
    pub fn name(&self) -> Option<&str> {
        match self {
            SymbolicValue::Str(name) | SymbolicValue::Type(name) => Some(name),
            SymbolicValue::Null | SymbolicValue::Opaque => None,
        }
    }
}

impl DeepCopy for SymbolicValue {}

impl fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolicValue::Str(value) => write!(f, "{:?}", value),
            SymbolicValue::Type(type_name) => write!(f, "typeof({})", type_name),
            SymbolicValue::Null => write!(f, "null"),
            SymbolicValue::Opaque => write!(f, "opaque"),
        }
    }
}

/// What a reflection call site may access.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Resolution {
    /// The call can never execute.
    Unreachable,
    /// The call accesses one of these names, and nothing else.
    Resolved(BTreeSet<String>),
    /// The call may access a name this analysis cannot enumerate.
    Unresolvable,
}

/// One call to a method annotated `ReflectionAccess`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ReflectionSite {
    point: ProgramPoint,
    callee: String,
    argument: usize,
    resolution: Resolution,
}

impl ReflectionSite {
    pub fn point(&self) -> ProgramPoint {
        self.point
    }

    pub fn callee(&self) -> &str {
        &self.callee
    }

    /// The position of the argument holding the accessed name.
    pub fn argument(&self) -> usize {
        self.argument
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Get the names this site accesses, if they could be resolved.
    pub fn targets(&self) -> Option<&BTreeSet<String>> {
        match self.resolution {
            Resolution::Resolved(ref targets) => Some(targets),
            Resolution::Unreachable | Resolution::Unresolvable => None,
        }
    }
}

type LocalValues = MapFact<Local, ValueSet<SymbolicValue>>;

struct LocalValuesAnalysis {
    lattice: MapLattice<Local, UnionLattice<SymbolicValue>>,
}

impl LocalValuesAnalysis {
    fn new(bound: usize) -> LocalValuesAnalysis {
        LocalValuesAnalysis {
            lattice: MapLattice::new(UnionLattice::new(bound)),
        }
    }

    fn values(&self) -> &UnionLattice<SymbolicValue> {
        self.lattice.value_lattice()
    }

    /// The values `operand` may evaluate to under `fact`.
    fn eval(&self, fact: &LocalValues, operand: &Operand) -> ValueSet<SymbolicValue> {
        match operand {
            Operand::Local(local) => self.lattice.get_or_top(fact, local),
            Operand::Str(value) => self.values().singleton(SymbolicValue::Str(value.clone())),
            Operand::Type(type_name) => self
                .values()
                .singleton(SymbolicValue::Type(type_name.clone())),
            Operand::Null => self.values().singleton(SymbolicValue::Null),
        }
    }
}

impl FixedPointAnalysis for LocalValuesAnalysis {
    type Lattice = MapLattice<Local, UnionLattice<SymbolicValue>>;

    fn lattice(&self) -> &Self::Lattice {
        &self.lattice
    }

    fn trans(&self, location: RefProgramPoint, fact: &LocalValues) -> Result<LocalValues, Error> {
        let mut fact = fact.deep_copy();

        match location.operation() {
            Some(Operation::Assign { dst, src }) => {
                let values = self.eval(&fact, src);
                self.lattice.insert(&mut fact, *dst, values);
            }
            Some(Operation::Load { dst })
            | Some(Operation::Call {
                dst: Some(dst), ..
            }) => {
                let opaque = self.values().singleton(SymbolicValue::Opaque);
                self.lattice.insert(&mut fact, *dst, opaque);
            }
            Some(Operation::Call { dst: None, .. })
            | Some(Operation::Assume { .. })
            | Some(Operation::Return { .. })
            | Some(Operation::Nop)
            | None => {}
        }

        Ok(fact)
    }
}

/// Resolve the names reaching every reflection call in `method`.
///
/// Sets of values are bounded by `options.set_cardinality_bound()`.
pub fn reflection_targets(method: &Method, options: &Options) -> Result<Vec<ReflectionSite>, Error> {
    let control_flow_graph = method.control_flow_graph();
    let analysis = LocalValuesAnalysis::new(options.set_cardinality_bound());

    let initial = analysis.lattice().top();
    let facts = fixed_point::fixed_point_forward(&analysis, control_flow_graph, initial, options)?;

    let mut sites = Vec::new();
    for point in facts.points() {
        let (callee, args) = match control_flow_graph.point(*point)?.operation() {
            Some(Operation::Call { callee, args, .. }) => (callee, args),
            _ => continue,
        };
        let argument = match callee.reflection_argument() {
            Some(argument) => argument,
            None => continue,
        };

        let resolution = if !facts.is_reachable(*point)? {
            Resolution::Unreachable
        } else {
            match args.get(argument) {
                Some(operand) => resolve(&analysis.eval(facts.fact_before(*point)?, operand)),
                None => Resolution::Unresolvable,
            }
        };

        if resolution == Resolution::Unresolvable {
            debug!(
                "{} in {}: {} argument {} is unresolvable",
                point,
                method.name(),
                callee,
                argument
            );
        }

        sites.push(ReflectionSite {
            point: *point,
            callee: callee.name().to_string(),
            argument,
            resolution,
        });
    }

    Ok(sites)
}

fn resolve(values: &ValueSet<SymbolicValue>) -> Resolution {
    let values = match values.values() {
        Some(values) if !values.is_empty() => values,
        _ => return Resolution::Unresolvable,
    };
    let mut names = BTreeSet::new();
    for value in values {
        match value.name() {
            Some(name) => names.insert(name.to_string()),
            None => return Resolution::Unresolvable,
        };
    }
    Resolution::Resolved(names)
}
