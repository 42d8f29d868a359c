//! File input and output helpers for profile data.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};

use crate::profile::Profile;

pub mod json;

/// Reads a file to string.
pub fn read_to_string(path: &str) -> io::Result<String> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Reads all lines of a file.
pub fn read_lines(path: &str) -> io::Result<Vec<String>> {
    BufReader::new(File::open(path)?).lines().collect()
}

/// Writes a string to a file, replacing its contents.
pub fn write_string(path: &str, contents: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())
}

fn is_skipped(line: &str) -> bool {
    let t = line.trim();
    t.is_empty() || t.starts_with('#')
}

fn parse_field(field: &str, line_no: usize) -> io::Result<f64> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("line {}: {}", line_no, e)))
}

/// Reads a CSV file of `chainage,value` pairs.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn read_profile_csv(path: &str, name: &str, unit: &str) -> io::Result<Profile> {
    let lines = read_lines(path)?;
    let mut chainages = Vec::new();
    let mut values = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if is_skipped(line) {
            continue;
        }
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() != 2 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {}: expected chainage,value", idx + 1),
            ));
        }
        chainages.push(parse_field(parts[0], idx + 1)?);
        values.push(parse_field(parts[1], idx + 1)?);
    }
    Profile::new(name, unit, chainages, values)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Writes a profile as `chainage,value` lines.
pub fn write_profile_csv(path: &str, profile: &Profile) -> io::Result<()> {
    let mut file = File::create(path)?;
    for (c, v) in profile.points() {
        writeln!(file, "{},{}", c, v)?;
    }
    Ok(())
}

/// Reads chainages listed one per line or comma separated.
pub fn read_chainages(path: &str) -> io::Result<Vec<f64>> {
    let lines = read_lines(path)?;
    let mut chainages = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if is_skipped(line) {
            continue;
        }
        for field in line.split(',').filter(|f| !f.trim().is_empty()) {
            chainages.push(parse_field(field, idx + 1)?);
        }
    }
    Ok(chainages)
}
