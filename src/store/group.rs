use std::collections::BTreeMap;
use std::fmt::Write as _;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Group – one node of a session's record tree
// ---------------------------------------------------------------------------

/// A node in the hierarchical container: scalar attributes, named float
/// series, named 2-D tables, and child groups. One root `Group` per session
/// per modality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Record-level scalars (e.g. ring `baseline`).
    pub attrs: BTreeMap<String, f64>,
    /// 1-D float series, all co-indexed with `intervals`.
    pub series: BTreeMap<String, Vec<f64>>,
    /// 2-D tables, one row per frame (mat raw data).
    pub tables: BTreeMap<String, Array2<f64>>,
    /// Nested sensor groups (e.g. imu `lh` / `rh` / `trunk`).
    pub children: BTreeMap<String, Group>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: f64) {
        self.attrs.insert(name.into(), value);
    }

    pub fn set_series(&mut self, name: impl Into<String>, data: Vec<f64>) {
        self.series.insert(name.into(), data);
    }

    pub fn set_table(&mut self, name: impl Into<String>, data: Array2<f64>) {
        self.tables.insert(name.into(), data);
    }

    pub fn add_child(&mut self, name: impl Into<String>, child: Group) {
        self.children.insert(name.into(), child);
    }

    pub fn attr(&self, name: &str) -> Option<f64> {
        self.attrs.get(name).copied()
    }

    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn table(&self, name: &str) -> Option<&Array2<f64>> {
        self.tables.get(name)
    }

    pub fn child(&self, name: &str) -> Option<&Group> {
        self.children.get(name)
    }

    /// Indented rendering of the tree layout, leaf lengths included.
    /// Diagnostic output for the `inspect` binary.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_into(&mut out, 0);
        out
    }

    fn describe_into(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        for (name, value) in &self.attrs {
            let _ = writeln!(out, "{pad}|{name} (attr = {value})");
        }
        for (name, data) in &self.series {
            let _ = writeln!(out, "{pad}|{name} [{}]", data.len());
        }
        for (name, data) in &self.tables {
            let _ = writeln!(out, "{pad}|{name} [{} x {}]", data.nrows(), data.ncols());
        }
        for (name, child) in &self.children {
            let _ = writeln!(out, "{pad}|{name}/");
            child.describe_into(out, depth + 1);
        }
    }

    /// All leaf series lengths in the tree, for the co-indexing check.
    pub fn series_lengths(&self) -> Vec<usize> {
        let mut lens: Vec<usize> = self.series.values().map(|v| v.len()).collect();
        lens.extend(self.tables.values().map(|t| t.nrows()));
        for child in self.children.values() {
            lens.extend(child.series_lengths());
        }
        lens
    }
}
