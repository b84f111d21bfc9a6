//! # Control Flow
//!
//! An opcode dispatcher written as a dense `match` (which the compiler may
//! lower to a jump table) against the same dispatcher written as an
//! `if`/`else if` chain.

use std::hint::black_box;

use rand::Rng;

use crate::error::Result;
use crate::harness::Harness;
use crate::registry::BenchmarkArea;

/// Number of opcodes dispatched per measured call
pub const OPCODE_COUNT: usize = 256;

/// Multiplies `value` by `opcode + 1` for opcodes 0..=7; any other opcode yields 0.
#[inline(never)]
pub fn dispatch_match(opcode: u8, value: u32) -> u32 {
    match opcode {
        0 => value,
        1 => value.wrapping_mul(2),
        2 => value.wrapping_mul(3),
        3 => value.wrapping_mul(4),
        4 => value.wrapping_mul(5),
        5 => value.wrapping_mul(6),
        6 => value.wrapping_mul(7),
        7 => value.wrapping_mul(8),
        _ => 0,
    }
}

#[inline(never)]
pub fn dispatch_if_chain(opcode: u8, value: u32) -> u32 {
    if opcode == 0 {
        value
    } else if opcode == 1 {
        value.wrapping_mul(2)
    } else if opcode == 2 {
        value.wrapping_mul(3)
    } else if opcode == 3 {
        value.wrapping_mul(4)
    } else if opcode == 4 {
        value.wrapping_mul(5)
    } else if opcode == 5 {
        value.wrapping_mul(6)
    } else if opcode == 6 {
        value.wrapping_mul(7)
    } else if opcode == 7 {
        value.wrapping_mul(8)
    } else {
        0
    }
}

/// Random opcodes in 0..9 (8 is invalid) paired with values.
pub fn random_program(len: usize) -> Vec<(u8, u32)> {
    let mut rng = super::data_rng();
    (0..len)
        .map(|_| (rng.random_range(0..9u8), rng.random_range(0..1024u32)))
        .collect()
}

fn run_program(program: &[(u8, u32)], dispatch: fn(u8, u32) -> u32) -> u32 {
    program
        .iter()
        .fold(0u32, |acc, &(op, value)| acc.wrapping_add(dispatch(op, value)))
}

pub struct ControlFlowArea;

impl BenchmarkArea for ControlFlowArea {
    fn name(&self) -> &'static str {
        "ControlFlow"
    }

    fn description(&self) -> &'static str {
        "match jump table vs if/else chain on random opcodes"
    }

    fn run(&self, harness: &mut Harness) -> Result<()> {
        let program = random_program(OPCODE_COUNT);
        let timer = harness.timer100();

        // Scale by the opcode count so results are per dispatch.
        let scale = OPCODE_COUNT as f32;
        timer.measure_scaled("match dispatch", scale, || {
            black_box(run_program(black_box(&program), dispatch_match));
        })?;
        timer.measure_scaled("if/else dispatch", scale, || {
            black_box(run_program(black_box(&program), dispatch_if_chain));
        })?;

        let mut sorted = program.clone();
        sorted.sort_unstable_by_key(|&(op, _)| op);
        timer.measure_scaled("match dispatch (sorted opcodes)", scale, || {
            black_box(run_program(black_box(&sorted), dispatch_match));
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatchers_agree() {
        for opcode in 0..=u8::MAX {
            for value in [0u32, 1, 17, 1023, u32::MAX] {
                assert_eq!(
                    dispatch_match(opcode, value),
                    dispatch_if_chain(opcode, value),
                    "opcode {opcode}, value {value}"
                );
            }
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(dispatch_match(0, 5), 5);
        assert_eq!(dispatch_match(7, 5), 40);
        assert_eq!(dispatch_match(8, 5), 0);
    }

    #[test]
    fn test_program_totals_agree() {
        let program = random_program(OPCODE_COUNT);
        assert_eq!(program.len(), OPCODE_COUNT);
        assert!(program.iter().all(|&(op, _)| op < 9));
        assert_eq!(
            run_program(&program, dispatch_match),
            run_program(&program, dispatch_if_chain)
        );
    }
}
