//! Transfer functions keyed by the kind of operation they apply to.

use crate::analysis::FixedPointAnalysis;
use crate::il::{OperationKind, RefProgramPoint};
use crate::lattice::{DeepCopy, Lattice, SemiLattice};
use crate::Error;
use rustc_hash::FxHashMap;

type Transfer<E> = Box<dyn Fn(RefProgramPoint, &E) -> Result<E, Error> + Send + Sync>;

/// A `FixedPointAnalysis` assembled from one transfer function per
/// `OperationKind`.
///
/// Kinds without a transfer function use the default transfer, and points in
/// empty blocks use the empty block transfer. Both are the identity unless
/// replaced.
pub struct TransferTable<L: Lattice> {
    lattice: L,
    transfers: FxHashMap<OperationKind, Transfer<L::Element>>,
    default: Option<Transfer<L::Element>>,
    empty_block: Option<Transfer<L::Element>>,
}

impl<L: Lattice> TransferTable<L> {
    pub fn new(lattice: L) -> TransferTable<L> {
        TransferTable {
            lattice,
            transfers: FxHashMap::default(),
            default: None,
            empty_block: None,
        }
    }

    /// Use `transfer` for every operation of kind `kind`.
    pub fn with<F>(mut self, kind: OperationKind, transfer: F) -> TransferTable<L>
    where
        F: Fn(RefProgramPoint, &L::Element) -> Result<L::Element, Error> + Send + Sync + 'static,
    {
        self.transfers.insert(kind, Box::new(transfer));
        self
    }

    /// Use `transfer` for every operation kind without its own transfer.
    pub fn with_default<F>(mut self, transfer: F) -> TransferTable<L>
    where
        F: Fn(RefProgramPoint, &L::Element) -> Result<L::Element, Error> + Send + Sync + 'static,
    {
        self.default = Some(Box::new(transfer));
        self
    }

    /// Use `transfer` for empty blocks.
    pub fn with_empty_block<F>(mut self, transfer: F) -> TransferTable<L>
    where
        F: Fn(RefProgramPoint, &L::Element) -> Result<L::Element, Error> + Send + Sync + 'static,
    {
        self.empty_block = Some(Box::new(transfer));
        self
    }

    /// Returns `true` if `kind` has its own transfer function.
    pub fn handles(&self, kind: OperationKind) -> bool {
        self.transfers.contains_key(&kind)
    }
}

impl<L: Lattice> FixedPointAnalysis for TransferTable<L> {
    type Lattice = L;

    fn lattice(&self) -> &L {
        &self.lattice
    }

    fn trans(
        &self,
        location: RefProgramPoint,
        fact: &<L as SemiLattice>::Element,
    ) -> Result<<L as SemiLattice>::Element, Error> {
        let transfer = match location.instruction() {
            Some(instruction) => self
                .transfers
                .get(&instruction.kind())
                .or(self.default.as_ref()),
            None => self.empty_block.as_ref(),
        };
        match transfer {
            Some(transfer) => transfer(location, fact),
            None => Ok(fact.deep_copy()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{fixed_point, Options};
    use crate::il::*;
    use crate::lattice::{Constant, ConstantLattice, Maybe, MaybeLattice};

    type StringLattice = MaybeLattice<ConstantLattice<String>>;

    fn table() -> TransferTable<StringLattice> {
        TransferTable::new(MaybeLattice::new(ConstantLattice::new()))
            .with(OperationKind::Assign, |location, fact| {
                match location.operation() {
                    Some(Operation::Assign {
                        src: Operand::Str(value),
                        ..
                    }) => Ok(Maybe::present(Constant::Value(value.clone()))),
                    _ => Ok(fact.deep_copy()),
                }
            })
            .with(OperationKind::Load, |_, _| {
                Ok(Maybe::present(Constant::Unknown))
            })
    }

    #[test]
    fn dispatch_by_kind() {
        let mut control_flow_graph = ControlFlowGraph::new();
        let index = {
            let block = control_flow_graph.new_block().unwrap();
            block.assign(local(0), operand_str("Run"));
            block.nop();
            block.load(local(1));
            block.index()
        };
        let empty = control_flow_graph.new_block().unwrap().index();
        control_flow_graph.unconditional_edge(index, empty).unwrap();
        control_flow_graph.set_entry(index).unwrap();

        let table = table();
        assert!(table.handles(OperationKind::Assign));
        assert!(!table.handles(OperationKind::Nop));

        let facts = fixed_point(&table, &control_flow_graph, Maybe::absent(), &Options::new())
            .unwrap();

        let run = Maybe::present(Constant::Value("Run".to_string()));
        assert_eq!(
            facts.fact_after(ProgramPoint::instruction(index, 0)).unwrap(),
            &run
        );
        // nop falls through to the identity
        assert_eq!(
            facts.fact_after(ProgramPoint::instruction(index, 1)).unwrap(),
            &run
        );
        assert_eq!(
            facts.fact_after(ProgramPoint::empty_block(empty)).unwrap(),
            &Maybe::present(Constant::Unknown)
        );
    }

    #[test]
    fn default_and_empty_block_transfers() {
        let mut control_flow_graph = ControlFlowGraph::new();
        let index = {
            let block = control_flow_graph.new_block().unwrap();
            block.nop();
            block.index()
        };
        let empty = control_flow_graph.new_block().unwrap().index();
        control_flow_graph.unconditional_edge(index, empty).unwrap();
        control_flow_graph.set_entry(index).unwrap();

        let table = table()
            .with_default(|_, _| Ok(Maybe::present(Constant::Value("default".to_string()))))
            .with_empty_block(|_, fact| match fact.value() {
                Some(Constant::Value(value)) => {
                    Ok(Maybe::present(Constant::Value(format!("{}!", value))))
                }
                _ => Ok(fact.deep_copy()),
            });

        let facts = fixed_point(&table, &control_flow_graph, Maybe::absent(), &Options::new())
            .unwrap();

        assert_eq!(
            facts.fact_after(ProgramPoint::empty_block(empty)).unwrap(),
            &Maybe::present(Constant::Value("default!".to_string()))
        );
    }
}
