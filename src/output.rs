use std::fs::File;
use std::io::{self, BufWriter, Write};

use flate2::{write::GzEncoder, Compression};

use crate::count::BarcodeKey;
use crate::errors::*;

/// Write one `<sgID>,<barcode>,<count>` line per key, in the given order.
pub fn write_counts(writer: &mut impl Write, counts: &[(BarcodeKey, usize)]) -> io::Result<()> {
    for (key, count) in counts {
        writeln!(writer, "{},{}", key, count)?;
    }
    Ok(())
}

/// Write the counts to a file, gzip compressed if the file name ends with `.gz`.
pub fn write_counts_file(file: impl AsRef<str>, counts: &[(BarcodeKey, usize)]) -> Result<()> {
    let file_name = file.as_ref();
    let io_err = |e: io::Error| Error::FileIo {
        file: file_name.to_owned(),
        source: Box::new(e),
    };

    if let Some(parent) = std::path::Path::new(file_name).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let writer = BufWriter::new(File::create(file_name).map_err(io_err)?);

    if file_name.ends_with(".gz") {
        let mut writer = GzEncoder::new(writer, Compression::default());
        write_counts(&mut writer, counts).map_err(io_err)?;
        writer.finish().map_err(io_err)?.flush().map_err(io_err)
    } else {
        let mut writer = writer;
        write_counts(&mut writer, counts).map_err(io_err)?;
        writer.flush().map_err(io_err)
    }
}
