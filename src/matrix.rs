//! Borrowed row-major views with an explicit row stride, in elements.

/// Matmul dimensions: `i` output rows, `j` output columns, `k` reduction length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dims {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl Dims {
    pub fn new(i: usize, j: usize, k: usize) -> Self { Self { i, j, k } }
}

#[derive(Clone, Copy, Debug)]
pub struct MatrixRef<'a, T> {
    pub data: &'a [T],
    pub stride: usize,
}

impl<'a, T> MatrixRef<'a, T> {
    pub fn new(data: &'a [T], stride: usize) -> Self { Self { data, stride } }

    /// Packed view: rows laid out back to back, `cols` wide.
    pub fn packed(data: &'a [T], cols: usize) -> Self { Self { data, stride: cols } }

    /// Whether `rows x cols` elements are addressable at this stride.
    pub fn covers(&self, rows: usize, cols: usize) -> bool { covers(self.data.len(), self.stride, rows, cols) }
}

#[derive(Debug)]
pub struct MatrixMut<'a, T> {
    pub data: &'a mut [T],
    pub stride: usize,
}

impl<'a, T> MatrixMut<'a, T> {
    pub fn new(data: &'a mut [T], stride: usize) -> Self { Self { data, stride } }

    pub fn packed(data: &'a mut [T], cols: usize) -> Self { Self { data, stride: cols } }

    pub fn covers(&self, rows: usize, cols: usize) -> bool { covers(self.data.len(), self.stride, rows, cols) }
}

fn covers(len: usize, stride: usize, rows: usize, cols: usize) -> bool {
    if rows == 0 || cols == 0 {
        return true;
    }
    if rows == 1 {
        return cols <= len;
    }
    if stride < cols {
        return false;
    }
    match (rows - 1).checked_mul(stride).and_then(|v| v.checked_add(cols)) {
        Some(needed) => needed <= len,
        None => false,
    }
}
