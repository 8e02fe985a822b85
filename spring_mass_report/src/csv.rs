use std::io::Write;

use nalgebra::DMatrix;
use spring_mass_lib::{beats::BeatSignal, ComparisonReport, Trajectory};

use crate::{ReportError, Result};

/// Column-oriented numeric data that can be dumped as CSV.
pub trait CsvTable {
    fn headers(&self) -> Vec<String>;

    fn row_count(&self) -> usize;

    fn row(&self, index: usize) -> Vec<f64>;
}

impl CsvTable for Trajectory {
    fn headers(&self) -> Vec<String> {
        ["time", "position", "velocity"].map(String::from).to_vec()
    }

    fn row_count(&self) -> usize {
        self.len()
    }

    fn row(&self, i: usize) -> Vec<f64> {
        vec![self.time()[i], self.position()[i], self.velocity()[i]]
    }
}

impl CsvTable for ComparisonReport {
    fn headers(&self) -> Vec<String> {
        [
            "time",
            "euler_position",
            "euler_velocity",
            "reference_position",
            "reference_velocity",
        ]
        .map(String::from)
        .to_vec()
    }

    fn row_count(&self) -> usize {
        self.len()
    }

    fn row(&self, i: usize) -> Vec<f64> {
        let (e, r) = (self.euler(), self.reference());
        vec![
            e.time()[i],
            e.position()[i],
            e.velocity()[i],
            r.position()[i],
            r.velocity()[i],
        ]
    }
}

impl CsvTable for BeatSignal {
    fn headers(&self) -> Vec<String> {
        ["time", "wave1", "wave2", "superposed"]
            .map(String::from)
            .to_vec()
    }

    fn row_count(&self) -> usize {
        self.time.len()
    }

    fn row(&self, i: usize) -> Vec<f64> {
        vec![self.time[i], self.wave1[i], self.wave2[i], self.superposed[i]]
    }
}

fn write_row<W: Write>(writer: &mut W, values: &[f64]) -> Result<()> {
    let line = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{line}")?;
    Ok(())
}

/// Header line followed by one line per row.
pub fn write_csv<W: Write, T: CsvTable>(writer: &mut W, table: &T) -> Result<()> {
    let headers = table.headers();
    writeln!(writer, "{}", headers.join(","))?;

    for i in 0..table.row_count() {
        let row = table.row(i);
        if row.len() != headers.len() {
            return Err(ReportError::RowLength {
                row: i,
                expected: headers.len(),
                got: row.len(),
            });
        }
        write_row(writer, &row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Bare matrix, one CSV line per matrix row, no header.
pub fn write_matrix_csv<W: Write>(writer: &mut W, matrix: &DMatrix<f64>) -> Result<()> {
    for row in matrix.row_iter() {
        let values: Vec<f64> = row.iter().copied().collect();
        write_row(writer, &values)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spring_mass_lib::compare;

    struct Ragged;

    impl CsvTable for Ragged {
        fn headers(&self) -> Vec<String> {
            vec!["a".to_string(), "b".to_string()]
        }

        fn row_count(&self) -> usize {
            1
        }

        fn row(&self, _: usize) -> Vec<f64> {
            vec![1.0]
        }
    }

    #[test]
    fn comparison_csv_layout() {
        let report = compare(4).unwrap();
        let mut out = Vec::new();
        write_csv(&mut out, &report).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "time,euler_position,euler_velocity,reference_position,reference_velocity"
        );
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "0,0,1,0,1");
        assert!(lines.iter().skip(1).all(|l| l.split(',').count() == 5));
    }

    #[test]
    fn values_round_trip_through_text() {
        let trajectory = spring_mass_lib::run_euler(7).unwrap();
        let mut out = Vec::new();
        write_csv(&mut out, &trajectory).unwrap();

        let text = String::from_utf8(out).unwrap();
        let last: Vec<f64> = text
            .lines()
            .last()
            .unwrap()
            .split(',')
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(last, trajectory.row(7));
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = write_csv(&mut Vec::new(), &Ragged).unwrap_err();
        assert!(matches!(
            err,
            ReportError::RowLength {
                row: 0,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn matrix_csv() {
        let m = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.5]);
        let mut out = Vec::new();
        write_matrix_csv(&mut out, &m).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1,2,3\n4,5,6.5\n");
    }
}
