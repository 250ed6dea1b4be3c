//! A small companion binary that dumps header fields and per-page slot
//! occupancy for an existing rangekv file, for debugging a
//! `ConfigurationInfeasible` build or confirming a file's shape.

use std::env;
use std::process::ExitCode;

use format::header::{HeaderRef, HEADER_SIZE};
use format::table::{TableRef, SENTINEL};
use io::DiskSource;
use reader::ByteSource;

fn main() -> ExitCode {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: rangekv-inspect <file>");
        return ExitCode::FAILURE;
    };

    match inspect(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn inspect(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let source = DiskSource::open(path)?;

    let header_bytes = source.read_at(0, HEADER_SIZE as u64)?;
    let header = HeaderRef::new(&header_bytes)?;

    let page_count = header.page_count()?;
    let heap_bytes = header.heap_bytes()?;
    let table_slots = header.table_slots()?;
    let page_size = header.page_size()?;

    println!("magic: {:?}", header.magic());
    println!("version_flags: {}", header.version_flags()?);
    println!("page_count: {page_count}");
    println!("heap_bytes: {heap_bytes}");
    println!("table_slots: {table_slots}");
    println!("page_size: {page_size}");
    println!();

    for page_index in 0..page_count {
        let page_offset = page_index * page_size;
        let page_bytes = source.read_at(page_offset, page_size)?;
        let table = TableRef::new(&page_bytes[heap_bytes as usize..], table_slots)?;

        let mut occupied = 0u32;
        for slot in 0..table_slots {
            if table.get(slot)? != SENTINEL {
                occupied += 1;
            }
        }

        println!(
            "page {page_index}: {occupied}/{table_slots} slots occupied ({:.1}% load)",
            100.0 * occupied as f64 / table_slots as f64
        );
    }

    Ok(())
}
