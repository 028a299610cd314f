use std::marker::PhantomData;

use prettytable::{format, row, Row, Table};

use crate::routes::RouteRecord;
use crate::utils::maybe_string;

pub trait ToRow {
    fn columns() -> Row;
    fn to_row(&self) -> Row;
}

impl ToRow for RouteRecord {
    fn columns() -> Row {
        row![
            "Session",
            "Neighbor",
            "Family",
            "Source",
            "Destination",
            "SrcPort",
            "DstPort",
            "Action",
            "Argument"
        ]
    }

    fn to_row(&self) -> Row {
        row![
            self.session.session_name,
            self.session.neighbor_address.to_string(),
            self.family.to_string(),
            maybe_string(self.matches.source.as_ref()),
            maybe_string(self.matches.destination.as_ref()),
            maybe_string(self.matches.source_port.as_ref()),
            maybe_string(self.matches.destination_port.as_ref()),
            self.action.code.to_string(),
            self.action.argument.to_string(),
        ]
    }
}

pub struct OutputTable<T: ToRow> {
    inner: Table,
    row_type: PhantomData<T>,
}

impl<T> OutputTable<T>
where
    T: ToRow,
{
    pub fn new() -> Self {
        let format = format::FormatBuilder::new()
            .padding(1, 1)
            .separator(
                format::LinePosition::Title,
                format::LineSeparator::new('-', '+', '+', '+'),
            )
            .build();
        let mut table = Table::new();
        table.set_format(format);
        table.set_titles(T::columns());
        Self {
            inner: table,
            row_type: PhantomData,
        }
    }

    pub fn add_row(&mut self, row: &T) {
        self.inner.add_row(row.to_row());
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn print(&self) {
        self.inner.printstd();
    }
}

impl<T: ToRow> Default for OutputTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ToRow> std::fmt::Display for OutputTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::MatchPolicy;

    #[test]
    fn test_route_table() {
        let record = RouteRecord::parse(
            "flow4 { dst 203.0.113.0/24; dport 80; } [flowspec1 2024-01-01 from 192.0.2.1]
\tBGP.ext_community: (generic, 0x80060000, 0x0)",
            MatchPolicy::Strict,
        )
        .unwrap();
        let mut table: OutputTable<RouteRecord> = OutputTable::new();
        assert!(table.is_empty());
        table.add_row(&record);
        assert_eq!(table.len(), 1);

        let rendered = table.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].contains("Session"));
        assert!(lines[0].contains("Argument"));
        assert!(lines[1].starts_with("-"));
        assert!(lines[2].contains("flowspec1"));
        assert!(lines[2].contains("203.0.113.0/24"));
        assert!(lines[2].contains("traffic-rate"));
        table.print();
    }
}
