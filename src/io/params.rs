use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::scaling::inputs::{Field, PhysicalInputs};

/// Write parameters as `key=value` lines in canonical order.
pub fn write_params<W: Write>(writer: &mut W, inputs: &PhysicalInputs) -> std::io::Result<()> {
    for field in Field::ALL {
        writeln!(writer, "{}={}", field.key(), inputs.get(field))?;
    }
    Ok(())
}

pub fn write_params_file(path: &Path, inputs: &PhysicalInputs) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    write_params(&mut file, inputs)
}

/// Read `key=value` lines and validate them.
///
/// Blank lines and `#` comments are skipped, unknown keys ignored, and only
/// the first `=` splits a line. Later duplicates win.
pub fn read_params<R: Read>(reader: R) -> Result<PhysicalInputs> {
    let mut fields = HashMap::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            debug!("skipping parameter line without '=': {:?}", line);
            continue;
        };
        let key = key.trim();
        if Field::from_key(key).is_none() {
            debug!("ignoring unknown parameter key {:?}", key);
            continue;
        }
        fields.insert(key.to_string(), value.trim().to_string());
    }
    Ok(PhysicalInputs::from_fields(&fields)?)
}

pub fn read_params_file(path: &Path) -> Result<PhysicalInputs> {
    read_params(File::open(path)?)
}
