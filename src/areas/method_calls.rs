//! # Method Calls
//!
//! Cost of the different ways Rust can call a function: direct calls kept
//! out of line with `#[inline(never)]`, generic and trait-object dispatch,
//! function pointers and boxed closures.

use std::hint::black_box;

use crate::error::Result;
use crate::harness::Harness;
use crate::registry::BenchmarkArea;
use crate::ten;

/// The baseline operation: an out-of-line call to a function that does nothing.
#[inline(never)]
pub fn empty_function() {
    black_box(());
}

#[inline(never)]
pub fn empty_function_5_args(a: u32, b: u32, c: u32, d: u32, e: u32) {
    black_box((a, b, c, d, e));
}

/// Helper function - doubles the value (forced to not inline)
#[inline(never)]
fn double(x: u32) -> u32 {
    x.wrapping_mul(2)
}

/// Helper function - adds 10 (forced to not inline)
#[inline(never)]
fn add_ten(x: u32) -> u32 {
    x.wrapping_add(10)
}

/// Helper function - squares the value (forced to not inline)
#[inline(never)]
fn square(x: u32) -> u32 {
    x.wrapping_mul(x)
}

/// `square(add_ten(double(value)))` as three separate calls.
#[inline(never)]
pub fn process_with_calls(value: u32) -> u32 {
    square(add_ten(double(value)))
}

/// The same computation with everything in one body.
#[inline(never)]
pub fn process_inline(value: u32) -> u32 {
    let step = value.wrapping_mul(2).wrapping_add(10);
    step.wrapping_mul(step)
}

pub trait Operation {
    fn apply(&self, value: u32) -> u32;
}

/// Monomorphised call site for comparison with the `dyn Operation` one.
#[inline(never)]
pub fn apply_generic<O: Operation>(op: &O, value: u32) -> u32 {
    op.apply(value)
}

pub struct Doubler;

impl Operation for Doubler {
    #[inline(never)]
    fn apply(&self, value: u32) -> u32 {
        value.wrapping_mul(2)
    }
}

pub struct Squarer;

impl Operation for Squarer {
    #[inline(never)]
    fn apply(&self, value: u32) -> u32 {
        value.wrapping_mul(value)
    }
}

pub struct Widget {
    offset: u32,
}

impl Widget {
    #[inline(never)]
    pub fn empty_method(&self) {
        black_box(self.offset);
    }
}

pub struct MethodCallsArea;

impl BenchmarkArea for MethodCallsArea {
    fn name(&self) -> &'static str {
        "MethodCalls"
    }

    fn description(&self) -> &'static str {
        "Direct, trait-object, function-pointer and closure calls"
    }

    fn run(&self, harness: &mut Harness) -> Result<()> {
        let timer = harness.timer1000();

        timer.measure_scaled("EmptyStaticFunction(arg1,...arg5)", 10.0, || {
            ten!(empty_function_5_args(1, 2, 3, 4, 5));
        })?;

        let widget = Widget { offset: 7 };
        timer.measure_scaled("widget.empty_method()", 10.0, || {
            ten!(widget.empty_method());
        })?;

        let ops: [Box<dyn Operation>; 2] = [Box::new(Doubler), Box::new(Squarer)];
        let op: &dyn Operation = black_box(ops[0].as_ref());
        timer.measure_scaled("dyn Operation::apply()", 10.0, || {
            ten!(black_box(op.apply(black_box(3))));
        })?;

        let doubler = Doubler;
        timer.measure_scaled("Doubler::apply() (static dispatch)", 10.0, || {
            ten!(black_box(doubler.apply(black_box(3))));
        })?;

        timer.measure_scaled("apply_generic::<Doubler>()", 10.0, || {
            ten!(black_box(apply_generic(&doubler, black_box(3))));
        })?;

        let func: fn(u32) -> u32 = black_box(process_inline);
        timer.measure_scaled("fn pointer call", 10.0, || {
            ten!(black_box(func(black_box(3))));
        })?;

        let closure: Box<dyn Fn(u32) -> u32> = Box::new(|x| x.wrapping_add(1));
        timer.measure_scaled("boxed closure call", 10.0, || {
            ten!(black_box(closure(black_box(3))));
        })?;

        let timer = harness.timer100();
        timer.measure_scaled("process_with_calls()", 10.0, || {
            ten!(black_box(process_with_calls(black_box(11))));
        })?;
        timer.measure_scaled("process_inline()", 10.0, || {
            ten!(black_box(process_inline(black_box(11))));
        })?;

        Ok(())
    }
}
