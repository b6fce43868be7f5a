use super::expression::Expression;
use crate::engine::cp::propagation::PropagationContext;
use crate::engine::cp::propagation::ReadDomains;
use crate::engine::variables::IntegerVariable;
use crate::smart_table_assert_moderate;

/// Receives the values an [`Expression`] marks as supported.
///
/// Callers only mark values which are currently in the domain of the column.
pub(crate) trait SupportSink {
    fn mark_supported(&mut self, value: i32);

    /// Treat every remaining domain value as supported, without materialising every bit.
    fn mark_all_supported(&mut self);
}

/// The supported-value bookkeeping of one column during a propagation sweep.
///
/// A bitset over the column's current domain span, offset-relative to the lower bound at reset
/// time, plus a counter of domain values not yet proven supported. Once `remaining` hits zero
/// the column cannot be filtered any further this sweep.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnSupport {
    offset: i32,
    span: usize,
    remaining: usize,
    all: bool,
    words: Vec<u64>,
}

impl ColumnSupport {
    /// Clear the bookkeeping and size it to the live domain of `var`.
    pub(crate) fn reset<Var: IntegerVariable>(
        &mut self,
        context: PropagationContext<'_>,
        var: &Var,
    ) {
        self.offset = context.lower_bound(var);
        self.span = (context.upper_bound(var) - self.offset + 1) as usize;
        self.remaining = context.domain_size(var);
        self.all = false;
        self.words.clear();
        self.words.resize((self.span + 63) / 64, 0);
    }

    pub(crate) fn is_fully_supported(&self) -> bool {
        self.remaining == 0
    }

    pub(crate) fn is_supported(&self, value: i32) -> bool {
        if self.all {
            return true;
        }
        let index = (value - self.offset) as usize;
        smart_table_assert_moderate!(index < self.span);
        self.words[index / 64] & (1 << (index % 64)) != 0
    }
}

impl SupportSink for ColumnSupport {
    fn mark_supported(&mut self, value: i32) {
        if self.all {
            return;
        }
        let index = (value - self.offset) as usize;
        smart_table_assert_moderate!(index < self.span);
        let mask = 1 << (index % 64);
        if self.words[index / 64] & mask == 0 {
            self.words[index / 64] |= mask;
            self.remaining -= 1;
        }
    }

    fn mark_all_supported(&mut self) {
        self.all = true;
        self.remaining = 0;
    }
}

/// The intersection accumulator backing a [`Expression::Conjunction`] cell.
///
/// [`AndSupport::refresh`] recomputes the set of column values every member supports;
/// [`AndSupport::is_non_empty`] then answers satisfiability, and [`AndSupport::copy_into`]
/// transfers the intersection into the column's real [`ColumnSupport`]. Keeping these three
/// steps separate means asking for satisfiability never mutates state behind the caller's back.
#[derive(Debug, Clone, Default)]
pub(crate) struct AndSupport {
    offset: i32,
    intersection: Vec<u64>,
    scratch: ScratchRow,
}

impl AndSupport {
    /// Recompute the intersection of the members' supported values over the live domain of
    /// `columns[column]`.
    pub(crate) fn refresh<Var: IntegerVariable>(
        &mut self,
        context: PropagationContext<'_>,
        columns: &[Var],
        column: usize,
        members: &[Expression],
    ) {
        let var = &columns[column];
        self.offset = context.lower_bound(var);
        let span = (context.upper_bound(var) - self.offset + 1) as usize;

        // Seed with the live domain so the accumulator never contains removed values.
        self.intersection.clear();
        self.intersection.resize((span + 63) / 64, 0);
        for value in context.iterate_domain(var) {
            let index = (value - self.offset) as usize;
            self.intersection[index / 64] |= 1 << (index % 64);
        }

        for member in members {
            self.scratch.reset(self.offset, span);
            member.mark_support(context, columns, column, &mut self.scratch);
            if !self.scratch.all {
                for (accumulated, marked) in
                    self.intersection.iter_mut().zip(self.scratch.words.iter())
                {
                    *accumulated &= *marked;
                }
            }
            if !self.is_non_empty() {
                break;
            }
        }
    }

    pub(crate) fn is_non_empty(&self) -> bool {
        self.intersection.iter().any(|&word| word != 0)
    }

    pub(crate) fn copy_into(&self, sink: &mut impl SupportSink) {
        for (word_index, &word) in self.intersection.iter().enumerate() {
            let mut bits = word;
            while bits != 0 {
                let bit = bits.trailing_zeros() as usize;
                sink.mark_supported(self.offset + (word_index * 64 + bit) as i32);
                bits &= bits - 1;
            }
        }
    }
}

/// Scratch bitset one member expression marks into before it is intersected into the
/// accumulator. A member which supports everything only raises `all`, which makes the
/// intersection step a no-op.
#[derive(Debug, Clone, Default)]
struct ScratchRow {
    offset: i32,
    span: usize,
    all: bool,
    words: Vec<u64>,
}

impl ScratchRow {
    fn reset(&mut self, offset: i32, span: usize) {
        self.offset = offset;
        self.span = span;
        self.all = false;
        self.words.clear();
        self.words.resize((span + 63) / 64, 0);
    }
}

impl SupportSink for ScratchRow {
    fn mark_supported(&mut self, value: i32) {
        if self.all {
            return;
        }
        let index = (value - self.offset) as usize;
        smart_table_assert_moderate!(index < self.span);
        self.words[index / 64] |= 1 << (index % 64);
    }

    fn mark_all_supported(&mut self) {
        self.all = true;
    }
}
