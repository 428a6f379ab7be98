//! Plain-text tables for CLI listings.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Column {
    header: String,
    align: Align,
    width: usize,
}

impl Column {
    pub fn new(header: &str) -> Self {
        Self {
            header: header.to_string(),
            align: Align::Left,
            width: header.chars().count(),
        }
    }

    /// Right-align the column (ids, counts).
    pub fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    fn pad(&self, cell: &str) -> String {
        match self.align {
            Align::Left => format!("{:<w$}", cell, w = self.width),
            Align::Right => format!("{:>w$}", cell, w = self.width),
        }
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row, widening columns to fit. Missing cells render empty.
    pub fn add_row(&mut self, row: Vec<String>) {
        for (col, cell) in self.columns.iter_mut().zip(&row) {
            col.width = col.width.max(cell.chars().count());
        }
        self.rows.push(row);
    }

    fn line<'a>(&self, cells: impl Iterator<Item = &'a str>) -> String {
        let parts: Vec<String> = self
            .columns
            .iter()
            .zip(cells.chain(std::iter::repeat("")))
            .map(|(col, cell)| col.pad(cell))
            .collect();
        format!("{}\n", parts.join("  ").trim_end())
    }

    pub fn render(&self) -> String {
        let mut out = self.line(self.columns.iter().map(|c| c.header.as_str()));

        let rule: Vec<String> = self.columns.iter().map(|c| "-".repeat(c.width)).collect();
        out.push_str(&format!("{}\n", rule.join("  ")));

        for row in &self.rows {
            out.push_str(&self.line(row.iter().map(String::as_str)));
        }

        out
    }
}
