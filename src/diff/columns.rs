use crate::catalog::column::Column;

/// How one column moved between the recorded and the declared table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDiff<'a> {
    Added(&'a Column),
    Changed { old: &'a Column, new: &'a Column },
    Unchanged { old: &'a Column, new: &'a Column },
    Dropped(&'a Column),
    Absent,
}

/// Diff a single column. Columns are matched by name; structure is compared on type and
/// properties.
pub fn diff<'a>(old: Option<&'a Column>, new: Option<&'a Column>) -> ColumnDiff<'a> {
    match (old, new) {
        (None, Some(n)) => ColumnDiff::Added(n),
        (Some(o), None) => ColumnDiff::Dropped(o),
        (Some(o), Some(n)) if o.equals(n) => ColumnDiff::Unchanged { old: o, new: n },
        (Some(o), Some(n)) => ColumnDiff::Changed { old: o, new: n },
        (None, None) => ColumnDiff::Absent,
    }
}
