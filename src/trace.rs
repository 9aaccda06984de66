//! Trace driver: feeds `(op, addr)` pairs into the cache engine,
//! maintains [`Stats`], and emits per-event telemetry rows.

use rand::Rng;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::address::decode;
use crate::bdi::CompressionDescriptor;
use crate::cache::Cache;
use crate::error::SimError;
use crate::geometry::{INDEX_BITS, OFFSET_BITS};
use crate::stats::Stats;
use crate::telemetry::{TelemetryRow, TelemetryWriter};

/// Reconstruct an approximate address for an evicted line: offset bits are
/// unknown at eviction time (the cache never stores them) and are left 0.
fn reassemble_address(tag: u32, index: u32) -> u32 {
    (tag << (OFFSET_BITS + INDEX_BITS)) | (index << OFFSET_BITS)
}

fn select_miss_descriptor(descriptors: &[CompressionDescriptor; 5], rng: &mut impl Rng) -> CompressionDescriptor {
    descriptors[rng.gen_range(0..5)]
}

fn parse_trace_line(line: &str) -> Result<(char, u32), String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err("blank line".into());
    }
    let mut parts = trimmed.split_whitespace();
    let op = parts.next().ok_or("missing opcode")?;
    let op_char = op.chars().next().ok_or("empty opcode")?;
    if op_char != 'l' && op_char != 's' {
        return Err(format!("unrecognized opcode {op_char:?}"));
    }
    let addr_field = parts.next().ok_or("missing address field")?;
    let digits = addr_field
        .strip_prefix("0x")
        .or_else(|| addr_field.strip_prefix("0X"))
        .ok_or_else(|| format!("address {addr_field:?} missing 0x prefix"))?;
    let addr = u32::from_str_radix(digits, 16).map_err(|e| e.to_string())?;
    Ok((op_char, addr))
}

/// Run an entire trace file through `cache`, writing telemetry rows and
/// updating `stats`. A miss-sample RNG is threaded separately from the
/// cache's own RNG (used for RANDOM eviction) to mirror the independent
/// random draws in the source.
pub fn run_trace(
    trace_path: &Path,
    cache: &mut Cache,
    seed_descriptors: &[CompressionDescriptor; 5],
    telemetry: &mut TelemetryWriter,
    stats: &mut Stats,
    miss_rng: &mut impl Rng,
) -> Result<(), SimError> {
    let file = std::fs::File::open(trace_path)?;
    let reader = BufReader::new(file);

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let (op, addr) = match parse_trace_line(&line) {
            Ok(parsed) => parsed,
            Err(msg) => {
                eprintln!("{}:{}: skipping unparsable trace line: {msg}", trace_path.display(), lineno + 1);
                continue;
            }
        };

        let parts = decode(addr);
        let outcome =
            cache.access(parts.index, parts.tag, || select_miss_descriptor(seed_descriptors, &mut *miss_rng))?;

        for evicted in &outcome.evicted {
            telemetry.write_row(&TelemetryRow {
                addr: reassemble_address(evicted.tag, parts.index),
                if_hit: false,
                if_evict: true,
                rounded_comp_size: evicted.rounded_comp_size,
                timestamp: evicted.timestamp,
                descriptor: evicted.comp_result,
            })?;
        }

        telemetry.write_row(&TelemetryRow {
            addr,
            if_hit: outcome.hit,
            if_evict: false,
            rounded_comp_size: outcome.rounded_comp_size,
            timestamp: outcome.timestamp,
            descriptor: outcome.resulting_line,
        })?;

        match op {
            'l' => stats.tick_load(outcome.hit),
            's' => stats.tick_store(outcome.hit),
            _ => unreachable!("parse_trace_line rejects other opcodes"),
        }

        cache.tick_camp_training();
    }

    Ok(())
}
