//! DAG-based circuit representation.
//!
//! Every qubit and classical bit is a wire running from an input node to an
//! output node. Applying an instruction splices a new operation node into
//! each wire it touches, directly before the output node, so edge order
//! along a wire is program order. A barrier touches all of its qubits at
//! once and therefore pins everything before it ahead of everything after it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Start of a wire.
    In(WireId),
    /// End of a wire.
    Out(WireId),
    /// An operation.
    Op(Instruction),
}

impl DagNode {
    /// The instruction, if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// An edge in the circuit DAG, labelled with the wire it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge belongs to.
    pub wire: WireId,
}

#[derive(Debug, Clone, Copy)]
struct WireEnds {
    input: NodeIndex,
    output: NodeIndex,
    /// Last node on the wire before `output`.
    front: NodeIndex,
}

/// Directed acyclic graph of circuit operations.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<DagNode, DagEdge, u32>,
    wires: FxHashMap<WireId, WireEnds>,
    num_qubits: usize,
    num_clbits: usize,
}

impl CircuitDag {
    /// Create an empty DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a quantum wire. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.add_wire(WireId::Qubit(qubit)) {
            self.num_qubits += 1;
        }
    }

    /// Add a classical wire. Adding an existing bit is a no-op.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if self.add_wire(WireId::Clbit(clbit)) {
            self.num_clbits += 1;
        }
    }

    fn add_wire(&mut self, wire: WireId) -> bool {
        if self.wires.contains_key(&wire) {
            return false;
        }
        let input = self.graph.add_node(DagNode::In(wire));
        let output = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(input, output, DagEdge { wire });
        self.wires.insert(
            wire,
            WireEnds {
                input,
                output,
                front: input,
            },
        );
        true
    }

    /// Append an instruction at the end of its wires.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        self.validate(&instruction)?;

        let wires: Vec<WireId> = instruction
            .qubits
            .iter()
            .copied()
            .map(WireId::from)
            .chain(instruction.clbits.iter().copied().map(WireId::from))
            .collect();

        let op_node = self.graph.add_node(DagNode::Op(instruction));

        for wire in wires {
            let ends = self.wires.get_mut(&wire).ok_or_else(|| {
                IrError::InvalidDag(format!("wire {wire:?} vanished during apply"))
            })?;
            let edge = self
                .graph
                .edges_directed(ends.front, Direction::Outgoing)
                .find(|e| e.weight().wire == wire && e.target() == ends.output)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!("missing front edge on wire {wire:?}"))
                })?;
            self.graph.remove_edge(edge);
            self.graph.add_edge(ends.front, op_node, DagEdge { wire });
            self.graph.add_edge(op_node, ends.output, DagEdge { wire });
            ends.front = op_node;
        }

        Ok(op_node)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = instruction.as_gate().map(|g| g.name().to_string());

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let got = instruction.qubits.len() as u32;
            if gate.num_qubits() != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
        }

        if instruction.is_measure() && instruction.qubits.len() != instruction.clbits.len() {
            return Err(IrError::MeasureMismatch {
                qubits: instruction.qubits.len(),
                clbits: instruction.clbits.len(),
            });
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !self.wires.contains_key(&WireId::Qubit(qubit)) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        for &clbit in &instruction.clbits {
            if !self.wires.contains_key(&WireId::Clbit(clbit)) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Operations in a topological order. Ready nodes are taken in
    /// insertion order, so a circuit built sequentially replays in the
    /// order it was written.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        let mut indegree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|n| self.graph.edges_directed(n, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<NodeIndex>> = self
            .graph
            .node_indices()
            .filter(|n| indegree[n.index()] == 0)
            .map(Reverse)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(node)) = ready.pop() {
            if let DagNode::Op(inst) = &self.graph[node] {
                order.push((node, inst));
            }
            for succ in self.graph.neighbors_directed(node, Direction::Outgoing) {
                // Parallel edges (one per shared wire) each count once.
                indegree[succ.index()] -= 1;
                if indegree[succ.index()] == 0 {
                    ready.push(Reverse(succ));
                }
            }
        }

        order.into_iter()
    }

    /// Longest chain of operations along any wire path. Barriers do not
    /// count towards depth but still order what surrounds them.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());
        let mut max_depth = 0;

        let ops: Vec<NodeIndex> = self.topological_ops().map(|(n, _)| n).collect();
        for node in ops {
            let pred_depth = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .map(|p| depths.get(&p).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);
            let is_barrier = matches!(
                &self.graph[node],
                DagNode::Op(inst) if inst.is_barrier()
            );
            let depth = if is_barrier { pred_depth } else { pred_depth + 1 };
            max_depth = max_depth.max(depth);
            depths.insert(node, depth);
        }

        max_depth
    }

    /// Number of operation nodes.
    pub fn num_ops(&self) -> usize {
        self.graph.node_weights().filter(|n| n.instruction().is_some()).count()
    }

    /// Operation counts keyed by instruction name.
    pub fn count_ops(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for inst in self.graph.node_weights().filter_map(DagNode::instruction) {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of quantum wires.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of classical wires.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Input node of a wire.
    pub fn input_node(&self, wire: WireId) -> Option<NodeIndex> {
        self.wires.get(&wire).map(|w| w.input)
    }

    /// Instruction at a node.
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    fn dag_with(qubits: u32, clbits: u32) -> CircuitDag {
        let mut dag = CircuitDag::new();
        for q in 0..qubits {
            dag.add_qubit(QubitId(q));
        }
        for c in 0..clbits {
            dag.add_clbit(ClbitId(c));
        }
        dag
    }

    #[test]
    fn test_add_wires_idempotent() {
        let mut dag = dag_with(2, 1);
        dag.add_qubit(QubitId(0));
        assert_eq!(dag.num_qubits(), 2);
        assert_eq!(dag.num_clbits(), 1);
        assert!(dag.input_node(WireId::Qubit(QubitId(1))).is_some());
        assert!(dag.input_node(WireId::Clbit(ClbitId(3))).is_none());
    }

    #[test]
    fn test_apply_rejects_bad_operands() {
        let mut dag = dag_with(2, 0);

        let err = dag
            .apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(5)))
            .unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { .. }));

        let err = dag
            .apply(Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(0)))
            .unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));

        let err = dag
            .apply(Instruction::gate(StandardGate::CX, [QubitId(0)]))
            .unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch { expected: 2, got: 1, .. }
        ));

        let err = dag
            .apply(Instruction::measure(QubitId(0), ClbitId(0)))
            .unwrap_err();
        assert!(matches!(err, IrError::ClbitNotFound { .. }));

        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_topological_order_follows_insertion() {
        let mut dag = dag_with(3, 0);
        for q in 0..3 {
            dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(q)))
                .unwrap();
        }
        dag.apply(Instruction::barrier([QubitId(0), QubitId(1), QubitId(2)]))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::X, QubitId(2)))
            .unwrap();

        let names: Vec<_> = dag.topological_ops().map(|(_, i)| i.name().to_string()).collect();
        assert_eq!(names, vec!["h", "h", "h", "barrier", "x"]);
    }

    #[test]
    fn test_barrier_orders_but_adds_no_depth() {
        let mut dag = dag_with(2, 0);
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::barrier([QubitId(0), QubitId(1)]))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)))
            .unwrap();

        // Without the barrier both H gates would sit in one layer.
        assert_eq!(dag.depth(), 2);
    }

    #[test]
    fn test_count_ops() {
        let mut dag = dag_with(2, 2);
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)))
            .unwrap();
        dag.apply(
            Instruction::measure_many([QubitId(0), QubitId(1)], [ClbitId(0), ClbitId(1)])
                .unwrap(),
        )
        .unwrap();

        let counts = dag.count_ops();
        assert_eq!(counts.get("h"), Some(&2));
        assert_eq!(counts.get("measure"), Some(&1));
        assert_eq!(dag.num_ops(), 3);
    }
}
