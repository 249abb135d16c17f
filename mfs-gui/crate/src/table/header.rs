// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

/// Span of one header cell.
#[derive(Clone, Copy, Debug)]
pub struct Span {
    pub cols: u32,
    pub rows: u32,
}

/// Computes the body column each header cell sits above.
///
/// Cells spanning several header rows push the cells of the rows below them
/// to the right, the same way the browser lays them out.
pub fn columns(rows: &[Vec<Span>]) -> Vec<Vec<usize>> {
    // Header row index at which each column becomes free again.
    let mut busy_until: Vec<usize> = vec![];

    rows.iter()
        .enumerate()
        .map(|(i, cells)| {
            let mut p = 0;

            cells
                .iter()
                .map(|cell| {
                    while p < busy_until.len() && busy_until[p] > i {
                        p += 1;
                    }

                    let cols = cell.cols.max(1) as usize;
                    let until = i + cell.rows.max(1) as usize;

                    if busy_until.len() < p + cols {
                        busy_until.resize(p + cols, 0);
                    }

                    for x in &mut busy_until[p..p + cols] {
                        *x = until;
                    }

                    let col = p;
                    p += cols;

                    col
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(cols: u32, rows: u32) -> Span {
        Span { cols, rows }
    }

    #[test]
    fn test_single_row() {
        assert_eq!(columns(&[vec![span(1, 1), span(1, 1), span(1, 1)]]), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_grouped_header() {
        // | ip (2 rows) | chunks (3 cols)      | version (2 rows) |
        //               | total | valid | lost |
        let rows = vec![
            vec![span(1, 2), span(3, 1), span(1, 2)],
            vec![span(1, 1), span(1, 1), span(1, 1)],
        ];

        assert_eq!(columns(&rows), vec![vec![0, 1, 4], vec![1, 2, 3]]);
    }

    #[test]
    fn test_three_row_span() {
        let rows = vec![
            vec![span(1, 3), span(2, 1)],
            vec![span(1, 1), span(1, 2)],
            vec![span(1, 1)],
        ];

        assert_eq!(columns(&rows), vec![vec![0, 1], vec![1, 2], vec![1]]);
    }
}
