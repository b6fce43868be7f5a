use fnv::FnvHashSet;

use super::expression::Expression;
use super::tuple_table::TupleTable;

/// An undirected adjacency structure over the column indices of a table, with an edge for
/// every pair of columns related by a column-relating expression anywhere in the table.
///
/// Built once when the propagator is constructed and read-only afterwards; used to spread
/// dirtiness between interdependent columns, since a column-relating cell can evaluate
/// differently even when its own column did not change.
#[derive(Debug, Clone)]
pub(crate) struct ColumnGraph {
    neighbours: Vec<Vec<usize>>,
}

impl ColumnGraph {
    pub(crate) fn new(table: &TupleTable, num_columns: usize) -> Self {
        let mut edges: FnvHashSet<(usize, usize)> = FnvHashSet::default();
        for tuple in table.tuples() {
            for (column, cell) in tuple.cells().iter().enumerate() {
                collect_edges(cell, column, &mut edges);
            }
        }

        let mut neighbours = vec![Vec::new(); num_columns];
        for &(from, to) in &edges {
            neighbours[from].push(to);
        }
        for list in &mut neighbours {
            list.sort_unstable();
        }

        ColumnGraph { neighbours }
    }

    pub(crate) fn neighbours(&self, column: usize) -> &[usize] {
        &self.neighbours[column]
    }
}

fn collect_edges(cell: &Expression, column: usize, edges: &mut FnvHashSet<(usize, usize)>) {
    match cell {
        Expression::EqCol { column: other, .. }
        | Expression::NeCol { column: other, .. }
        | Expression::GeCol { column: other, .. }
        | Expression::LeCol { column: other, .. } => {
            let _ = edges.insert((column, *other));
            let _ = edges.insert((*other, column));
        }
        Expression::Conjunction(members) => {
            for member in members.iter() {
                collect_edges(member, column, edges);
            }
        }
        Expression::Any
        | Expression::EqConst(_)
        | Expression::NeConst(_)
        | Expression::GeConst(_)
        | Expression::LeConst(_)
        | Expression::InSet(_)
        | Expression::NotInSet(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagators::table::any;
    use crate::propagators::table::col;
    use crate::propagators::table::eq;
    use crate::propagators::table::ge;
    use crate::propagators::table::le;

    #[test]
    fn edges_come_from_column_relating_cells() {
        let mut table = TupleTable::default();
        table
            .add(vec![any(), eq(col(0)), any()])
            .expect("tuple is well formed");
        table
            .add(vec![any(), any(), ge(col(1).plus(1))])
            .expect("tuple is well formed");

        let graph = ColumnGraph::new(&table, 3);
        assert_eq!(graph.neighbours(0), &[1]);
        assert_eq!(graph.neighbours(1), &[0, 2]);
        assert_eq!(graph.neighbours(2), &[1]);
    }

    #[test]
    fn edges_inside_conjunctions_are_found() {
        let mut table = TupleTable::default();
        // Column 0 ends up with a conjunction of a constant bound and a relation to column 1.
        table
            .add(vec![ge(2), le(col(0).plus(3))])
            .expect("tuple is well formed");

        let graph = ColumnGraph::new(&table, 2);
        assert_eq!(graph.neighbours(0), &[1]);
        assert_eq!(graph.neighbours(1), &[0]);
    }

    #[test]
    fn constant_only_tables_have_no_edges() {
        let mut table = TupleTable::default();
        table
            .add(vec![eq(1), ge(2)])
            .expect("tuple is well formed");

        let graph = ColumnGraph::new(&table, 2);
        assert!(graph.neighbours(0).is_empty());
        assert!(graph.neighbours(1).is_empty());
    }
}
