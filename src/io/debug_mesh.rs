//! Plain-text dump of integrated sub-elements.
//!
//! Only planar elements are supported. Every record is one closed polygon: a line `x y ` per vertex, the first vertex repeated, and
//! a blank line. Coordinates are printed like the C `%g` conversion so that existing plotting
//! scripts (for example gnuplot's `plot 'mesh.txt' with lines`) read the file unchanged.
use nalgebra::allocator::Allocator;
use nalgebra::{try_convert, DefaultAllocator, DimName, OPoint};
use parking_lot::Mutex;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use crate::Real;

/// A debug mesh writer shared between assembler instances.
pub type DebugMeshSink = Arc<Mutex<DebugMeshWriter<Box<dyn Write + Send>>>>;

pub struct DebugMeshWriter<W: Write> {
    writer: W,
    num_records: usize,
}

impl<W: Write> fmt::Debug for DebugMeshWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugMeshWriter")
            .field("num_records", &self.num_records)
            .finish_non_exhaustive()
    }
}

impl DebugMeshWriter<BufWriter<File>> {
    /// Opens `path` for appending, creating it if necessary.
    pub fn append_to_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> DebugMeshWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, num_records: 0 }
    }

    /// Writes one closed polygon through `vertices`.
    ///
    /// Fails with [`io::ErrorKind::InvalidInput`] unless the vertices are two-dimensional.
    pub fn write_polygon<T, D>(&mut self, vertices: &[OPoint<T, D>]) -> io::Result<()>
    where
        T: Real,
        D: DimName,
        DefaultAllocator: Allocator<T, D>,
    {
        if D::dim() != 2 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("debug mesh polygons are planar, got {}-dimensional vertices", D::dim()),
            ));
        }
        // Assemble the record first so that a shared writer never interleaves partial records
        let mut record = String::new();
        for vertex in vertices.iter().chain(vertices.first()) {
            for &x in vertex.coords.iter() {
                record.push_str(&format_general(try_convert(x).unwrap_or(f64::NAN)));
                record.push(' ');
            }
            record.push('\n');
        }
        record.push('\n');
        self.writer.write_all(record.as_bytes())?;
        self.num_records += 1;
        Ok(())
    }

    /// Number of polygons written so far.
    pub fn num_records(&self) -> usize {
        self.num_records
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + 'static> DebugMeshWriter<W> {
    /// Wraps the writer so it can be handed to assemblers on several threads.
    pub fn into_sink(self) -> DebugMeshSink {
        let DebugMeshWriter { writer, num_records } = self;
        let writer: Box<dyn Write + Send> = Box::new(writer);
        Arc::new(Mutex::new(DebugMeshWriter { writer, num_records }))
    }
}

/// Formats `x` like the C `%g` conversion with the default precision of 6 significant digits.
pub fn format_general(x: f64) -> String {
    const PRECISION: i32 = 6;

    if x.is_nan() {
        return String::from(if x.is_sign_negative() { "-nan" } else { "nan" });
    }
    if x.is_infinite() {
        return String::from(if x < 0.0 { "-inf" } else { "inf" });
    }
    if x == 0.0 {
        return String::from(if x.is_sign_negative() { "-0" } else { "0" });
    }

    // The exponent after rounding to the requested number of significant digits
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, x);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .expect("Rust scientific formatting always contains an exponent");
    let exponent: i32 = exponent
        .parse()
        .expect("Rust scientific formatting produces an integer exponent");

    if exponent < -4 || exponent >= PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_trailing_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, x)).to_string()
    }
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
