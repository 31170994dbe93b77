//! Bit-exact binary file formats for corpora and ground-truth neighbors.
//!
//! Both formats are little-endian and row-major:
//!
//! ```text
//! vectors:    u64 count, u64 dimension,      f32 data[count][dimension]
//! neighbors:  u64 count, u64 neighbor_count, u64 ids[count][neighbor_count]
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Read a vector corpus file. Returns the rows and the recorded dimension.
pub fn read_vectors(path: impl AsRef<Path>) -> io::Result<(Vec<Vec<f32>>, usize)> {
    let mut reader = BufReader::new(File::open(path)?);
    let count = read_u64(&mut reader)? as usize;
    let dimension = read_u64(&mut reader)? as usize;

    let mut vectors = Vec::with_capacity(count);
    for _ in 0..count {
        let mut row = Vec::with_capacity(dimension);
        for _ in 0..dimension {
            row.push(read_f32(&mut reader)?);
        }
        vectors.push(row);
    }
    Ok((vectors, dimension))
}

/// Write a vector corpus file. All rows must share one dimension.
pub fn write_vectors(path: impl AsRef<Path>, vectors: &[Vec<f32>]) -> io::Result<()> {
    let dimension = vectors.first().map_or(0, Vec::len);
    if let Some(row) = vectors.iter().find(|row| row.len() != dimension) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("ragged corpus: row of length {} in a {dimension}-dimensional file", row.len()),
        ));
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&(vectors.len() as u64).to_le_bytes())?;
    writer.write_all(&(dimension as u64).to_le_bytes())?;
    for row in vectors {
        for &value in row {
            writer.write_all(&value.to_le_bytes())?;
        }
    }
    writer.flush()
}

/// Read a ground-truth neighbors file.
pub fn read_neighbors(path: impl AsRef<Path>) -> io::Result<Vec<Vec<u64>>> {
    let mut reader = BufReader::new(File::open(path)?);
    let count = read_u64(&mut reader)? as usize;
    let neighbor_count = read_u64(&mut reader)? as usize;

    let mut neighbors = Vec::with_capacity(count);
    for _ in 0..count {
        let mut row = Vec::with_capacity(neighbor_count);
        for _ in 0..neighbor_count {
            row.push(read_u64(&mut reader)?);
        }
        neighbors.push(row);
    }
    Ok(neighbors)
}

/// Write a ground-truth neighbors file. All rows must share one length.
pub fn write_neighbors(path: impl AsRef<Path>, neighbors: &[Vec<u64>]) -> io::Result<()> {
    let neighbor_count = neighbors.first().map_or(0, Vec::len);
    if neighbors.iter().any(|row| row.len() != neighbor_count) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "ragged neighbor lists",
        ));
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&(neighbors.len() as u64).to_le_bytes())?;
    writer.write_all(&(neighbor_count as u64).to_le_bytes())?;
    for row in neighbors {
        for &id in row {
            writer.write_all(&id.to_le_bytes())?;
        }
    }
    writer.flush()
}

fn read_u64(reader: &mut impl Read) -> io::Result<u64> {
    let mut buffer = [0u8; 8];
    reader.read_exact(&mut buffer)?;
    Ok(u64::from_le_bytes(buffer))
}

fn read_f32(reader: &mut impl Read) -> io::Result<f32> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(f32::from_le_bytes(buffer))
}
